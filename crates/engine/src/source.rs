use async_trait::async_trait;
use platform::error::PlatformError;
use platform::filter::QueryFilter;

/// Paged access to one platform collection. Implementations return the raw
/// items of `current_page` (pages start at 1); a page shorter than
/// `page_size` marks the end of the collection.
#[async_trait]
pub trait ItemPages: Send + Sync {
    type Item: Send;

    async fn fetch_page(
        &self,
        filter: &QueryFilter,
        page_size: u32,
        current_page: u32,
    ) -> Result<Vec<Self::Item>, PlatformError>;
}
