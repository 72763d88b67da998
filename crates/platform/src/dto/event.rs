use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::dto::SourceRef;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EventDto {
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub creation_time: Option<DateTime<Utc>>,
    pub time: Option<DateTime<Utc>>,
    pub text: Option<String>,
    pub source: Option<SourceRef>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EventPage {
    pub events: Vec<EventDto>,
}

/// Payload for creating one event.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEventDto {
    #[serde(rename = "type")]
    pub kind: String,
    pub time: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    pub source: SourceRef,
}
