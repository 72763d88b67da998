use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::dto::SourceRef;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AlarmDto {
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub severity: Option<String>,
    pub status: Option<String>,
    pub text: Option<String>,
    pub count: Option<i64>,
    pub time: Option<DateTime<Utc>>,
    pub creation_time: Option<DateTime<Utc>>,
    pub first_occurrence_time: Option<DateTime<Utc>>,
    pub source: Option<SourceRef>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AlarmPage {
    pub alarms: Vec<AlarmDto>,
}

/// Payload for raising one alarm.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAlarmDto {
    #[serde(rename = "type")]
    pub kind: String,
    pub severity: String,
    pub status: String,
    pub time: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    pub source: SourceRef,
}
