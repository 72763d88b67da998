use chrono::Utc;
use model::fetch::{FetchReport, RowBudget, TimeRange};
use model::table::TableSchema;
use platform::filter::QueryFilter;
use tracing::{debug, error, info, warn};

use crate::context::FetchContext;
use crate::error::{FetchError, root_cause};
use crate::profile::ReaderProfile;
use crate::selection::SourceSelection;
use crate::sink::RowSink;
use crate::source::ItemPages;

/// What one fetch run should read: which sources, which time window and how
/// many rows at most.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    pub selection: SourceSelection,
    pub range: TimeRange,
    pub budget: RowBudget,
}

enum SourceOutcome {
    /// The collection ran out of items for this source.
    Drained,
    /// The row budget was hit; no further source may run.
    BudgetExhausted,
    Cancelled,
}

/// Drives one bounded fetch over a paged collection: sources in selection
/// order, pages within a source in remote order, a strict row cap across
/// all of it.
pub struct BoundedFetcher<T> {
    profile: ReaderProfile<T>,
}

impl<T: Send + Sync> BoundedFetcher<T> {
    pub fn new(profile: ReaderProfile<T>) -> Self {
        Self { profile }
    }

    pub fn schema(&self) -> TableSchema {
        (self.profile.schema)()
    }

    /// Runs the fetch. The sink is opened before the first row and closed on
    /// every exit path. A source failing after rows were already emitted
    /// turns into a partial result carried in the report; a failure before
    /// the first row is an error.
    pub async fn run<P, S>(
        &self,
        pages: &P,
        request: FetchRequest,
        sink: &mut S,
        ctx: &FetchContext,
    ) -> Result<FetchReport, FetchError>
    where
        P: ItemPages<Item = T>,
        S: RowSink,
    {
        if self.profile.source_required && request.selection.is_all() {
            return Err(FetchError::SourceRequired(self.profile.entity_plural));
        }

        sink.open(&(self.profile.schema)())?;
        let outcome = self.run_inner(pages, request, sink, ctx).await;
        let closed = sink.close();
        let report = outcome?;
        closed?;

        info!(
            run_id = %ctx.run_id(),
            "Read data of {} {}.",
            report.rows_emitted,
            self.profile.entity_plural
        );
        Ok(report)
    }

    async fn run_inner<P, S>(
        &self,
        pages: &P,
        request: FetchRequest,
        sink: &mut S,
        ctx: &FetchContext,
    ) -> Result<FetchReport, FetchError>
    where
        P: ItemPages<Item = T>,
        S: RowSink,
    {
        let FetchRequest {
            selection,
            range,
            mut budget,
        } = request;

        let mut report = FetchReport::default();
        // Resolved once so every source sees the same window.
        let window = range.resolve(Utc::now());

        for source in selection.filters() {
            if ctx.is_cancelled() {
                return Err(FetchError::Cancelled);
            }
            if budget.is_exhausted() {
                self.log_budget_stop(&budget);
                break;
            }

            let filter = QueryFilter::new(source, window);
            let outcome = match self
                .fetch_source(pages, &filter, &mut budget, sink, &mut report, ctx)
                .await
            {
                Ok(outcome) => outcome,
                Err(FetchError::Platform(err)) => {
                    if report.rows_emitted == 0 {
                        error!("Failed to retrieve any {}!", self.profile.entity_plural);
                        return Err(FetchError::Platform(err));
                    }
                    warn!(
                        "Retrieved only {} {}, but there might be more!",
                        report.rows_emitted, self.profile.entity_plural
                    );
                    warn!("Root cause: {}", root_cause(&err));
                    report.failure = Some(root_cause(&err));
                    break;
                }
                Err(other) => return Err(other),
            };

            report.sources_visited += 1;
            match outcome {
                SourceOutcome::Drained => {}
                SourceOutcome::BudgetExhausted => {
                    self.log_budget_stop(&budget);
                    break;
                }
                SourceOutcome::Cancelled => return Err(FetchError::Cancelled),
            }
        }

        Ok(report)
    }

    async fn fetch_source<P, S>(
        &self,
        pages: &P,
        filter: &QueryFilter,
        budget: &mut RowBudget,
        sink: &mut S,
        report: &mut FetchReport,
        ctx: &FetchContext,
    ) -> Result<SourceOutcome, FetchError>
    where
        P: ItemPages<Item = T>,
        S: RowSink,
    {
        let page_size = self.profile.page_size;
        let mut current_page: u32 = 1;

        loop {
            if ctx.is_cancelled() {
                return Ok(SourceOutcome::Cancelled);
            }

            let items = pages.fetch_page(filter, page_size, current_page).await?;
            ctx.metrics().record_page();
            debug!(
                source = %filter.source(),
                page = current_page,
                items = items.len(),
                "Fetched {} page.",
                self.profile.entity
            );
            let short_page = (items.len() as u32) < page_size;

            for item in &items {
                if ctx.is_cancelled() {
                    return Ok(SourceOutcome::Cancelled);
                }

                let rows = (self.profile.rows)(item);
                if rows.is_empty() {
                    report.items_ignored += 1;
                    ctx.metrics().record_ignored();
                    debug!(
                        "Ignoring empty {}: {}",
                        self.profile.entity,
                        (self.profile.label)(item)
                    );
                    continue;
                }

                for row in rows {
                    if budget.is_exhausted() {
                        return Ok(SourceOutcome::BudgetExhausted);
                    }
                    sink.add_row(row)?;
                    budget.record_emitted();
                    report.rows_emitted += 1;
                    ctx.metrics().record_row();
                }
            }

            if short_page {
                return Ok(SourceOutcome::Drained);
            }
            if budget.is_exhausted() {
                return Ok(SourceOutcome::BudgetExhausted);
            }
            current_page += 1;
        }
    }

    fn log_budget_stop(&self, budget: &RowBudget) {
        info!(
            "Retrieved maximal number ({}) of {} to retrieve, will stop.",
            budget.emitted(),
            self.profile.entity_plural
        );
    }
}
