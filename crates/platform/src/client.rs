use reqwest::{Client, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::{ConnectionSettings, Credentials};
use crate::dto::{
    AlarmDto, AlarmPage, EventDto, EventPage, ManagedObjectDto, ManagedObjectPage, MeasurementDto,
    MeasurementPage, NewAlarmDto, NewEventDto, NewMeasurementDto,
};
use crate::error::PlatformError;
use crate::filter::QueryFilter;

const ERROR_BODY_LIMIT: usize = 300;

/// Authenticated handle to one Cumulocity / Cloud of Things tenant.
pub struct CotClient {
    http: Client,
    base: String,
    tenant: String,
    credentials: Credentials,
}

impl CotClient {
    pub fn connect(settings: &ConnectionSettings) -> Result<Self, PlatformError> {
        settings.validate()?;
        let credentials = settings.resolve_credentials()?;
        Ok(Self::from_parts(&settings.url, &settings.tenant, credentials))
    }

    /// Like [`connect`](Self::connect), but never fails: unusable settings
    /// fall back to a dummy tenant so the caller can still be constructed.
    pub fn connect_lenient(settings: &ConnectionSettings) -> Self {
        match Self::connect(settings) {
            Ok(client) => client,
            Err(err) => {
                warn!(
                    error = %err,
                    "Failed to process stored connection info. Will use dummy defaults!"
                );
                Self::dummy()
            }
        }
    }

    pub fn dummy() -> Self {
        Self::from_parts(
            "https://demo.cumulocity.com",
            "demo",
            Credentials {
                username: "dummy".into(),
                password: "dummy".into(),
            },
        )
    }

    fn from_parts(url: &str, tenant: &str, credentials: Credentials) -> Self {
        Self {
            http: Client::new(),
            base: url.trim().trim_end_matches('/').to_string(),
            tenant: tenant.to_string(),
            credentials,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base
    }

    pub fn tenant(&self) -> &str {
        &self.tenant
    }

    pub async fn managed_objects(
        &self,
        filter: &QueryFilter,
        page_size: u32,
        current_page: u32,
    ) -> Result<Vec<ManagedObjectDto>, PlatformError> {
        let page: ManagedObjectPage = self
            .collection_page("/inventory/managedObjects", filter, page_size, current_page)
            .await?;
        Ok(page.managed_objects)
    }

    pub async fn measurements(
        &self,
        filter: &QueryFilter,
        page_size: u32,
        current_page: u32,
    ) -> Result<Vec<MeasurementDto>, PlatformError> {
        let page: MeasurementPage = self
            .collection_page("/measurement/measurements", filter, page_size, current_page)
            .await?;
        Ok(page.measurements)
    }

    pub async fn events(
        &self,
        filter: &QueryFilter,
        page_size: u32,
        current_page: u32,
    ) -> Result<Vec<EventDto>, PlatformError> {
        let page: EventPage = self
            .collection_page("/event/events", filter, page_size, current_page)
            .await?;
        Ok(page.events)
    }

    pub async fn alarms(
        &self,
        filter: &QueryFilter,
        page_size: u32,
        current_page: u32,
    ) -> Result<Vec<AlarmDto>, PlatformError> {
        let page: AlarmPage = self
            .collection_page("/alarm/alarms", filter, page_size, current_page)
            .await?;
        Ok(page.alarms)
    }

    pub async fn create_event(&self, event: &NewEventDto) -> Result<(), PlatformError> {
        self.post("/event/events", event).await
    }

    pub async fn create_alarm(&self, alarm: &NewAlarmDto) -> Result<(), PlatformError> {
        self.post("/alarm/alarms", alarm).await
    }

    pub async fn create_measurement(
        &self,
        measurement: &NewMeasurementDto,
    ) -> Result<(), PlatformError> {
        self.post("/measurement/measurements", measurement).await
    }

    /// Cheapest request that proves url, tenant and credentials work.
    pub async fn ping(&self) -> Result<(), PlatformError> {
        let _: ManagedObjectPage = self
            .collection_page("/inventory/managedObjects", &QueryFilter::unfiltered(), 1, 1)
            .await?;
        Ok(())
    }

    async fn collection_page<P: DeserializeOwned>(
        &self,
        path: &str,
        filter: &QueryFilter,
        page_size: u32,
        current_page: u32,
    ) -> Result<P, PlatformError> {
        debug!(path, page = current_page, "Requesting collection page.");
        let response = self
            .authorized(self.http.get(self.url(path)))
            .query(&filter.params(page_size, current_page))
            .send()
            .await?;
        let response = Self::check(response).await?;
        Ok(response.json().await?)
    }

    async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<(), PlatformError> {
        let response = self
            .authorized(self.http.post(self.url(path)))
            .json(body)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    // Cumulocity expects "tenant/user" as the basic auth user name; without a
    // tenant the bare user name addresses the default tenant.
    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        let user = if self.tenant.is_empty() {
            self.credentials.username.clone()
        } else {
            format!("{}/{}", self.tenant, self.credentials.username)
        };
        request.basic_auth(user, Some(&self.credentials.password))
    }

    async fn check(response: Response) -> Result<Response, PlatformError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body: String = response
            .text()
            .await
            .unwrap_or_default()
            .chars()
            .take(ERROR_BODY_LIMIT)
            .collect();
        Err(PlatformError::Api {
            status: status.as_u16(),
            body,
        })
    }
}
