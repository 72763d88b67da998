use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use crate::dto::SourceRef;

/// One measurement document. Everything that is not one of the fixed fields
/// is collected into `fragments`, keyed by fragment name. The map is sorted
/// by key, which fixes the order series rows are produced in.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MeasurementDto {
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub time: Option<DateTime<Utc>>,
    pub source: Option<SourceRef>,
    #[serde(flatten)]
    pub fragments: Map<String, JsonValue>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MeasurementPage {
    pub measurements: Vec<MeasurementDto>,
}

/// Payload for creating one measurement with a single series:
/// `{ "<subtype>": { "<series>": { "value": …, "unit": … } } }`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMeasurementDto {
    #[serde(rename = "type")]
    pub kind: String,
    pub time: DateTime<Utc>,
    pub source: SourceRef,
    #[serde(flatten)]
    pub fragments: Map<String, JsonValue>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_unknown_keys_as_fragments() {
        let measurement: MeasurementDto = serde_json::from_value(serde_json::json!({
            "id": "1001",
            "type": "c8y_TemperatureMeasurement",
            "time": "2024-03-01T12:30:00.000Z",
            "source": {"id": "4711"},
            "self": "https://acme.cumulocity.com/measurement/measurements/1001",
            "c8y_Temperature": {"T": {"value": 21.5, "unit": "C"}}
        }))
        .unwrap();

        assert_eq!(measurement.fragments.len(), 2);
        assert!(measurement.fragments.contains_key("self"));
        let fragment = &measurement.fragments["c8y_Temperature"];
        assert_eq!(fragment["T"]["value"], serde_json::json!(21.5));
    }
}
