//! Journal entities and request payloads
//!
//! Entities serialize with camelCase field names. Payloads accept loosely typed
//! JSON (numbers are taken as their decimal text) and are turned into
//! validated field sets before reaching the data access layer.

use crate::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Directional market view attached to a note
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sentiment {
    Bullish,
    Bearish,
    Neutral,
}

impl Sentiment {
    pub const ALL: [Sentiment; 3] = [Sentiment::Bullish, Sentiment::Bearish, Sentiment::Neutral];

    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Bullish => "Bullish",
            Sentiment::Bearish => "Bearish",
            Sentiment::Neutral => "Neutral",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sentiment {
    type Err = Error;

    /// Exact, case-sensitive match
    fn from_str(s: &str) -> Result<Self> {
        Sentiment::ALL
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| Error::InvalidInput("Invalid sentiment".to_string()))
    }
}

/// A named security or benchmark
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Instrument {
    pub id: i64,
    pub name: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Observation joined with its instrument's name
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: i64,
    pub instrument_id: i64,
    pub instrument_name: String,
    pub data_point: String,
    pub actual_value: String,
    pub expected_value: String,
    pub observed_on: String,
    pub sentiment: Sentiment,
    pub commentary: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Free-text knowledge-base entry
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct StudyNote {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Accept strings, numbers and booleans as text; null and absent are `None`
fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

/// Trimmed value, or `None` when absent or blank
fn required(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Body of `POST /api/instruments`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InstrumentPayload {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
}

/// Body of note create/update requests
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotePayload {
    #[serde(default, deserialize_with = "lenient_string")]
    pub instrument_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub data_point: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub actual_value: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub expected_value: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub observed_on: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub sentiment: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub commentary: Option<String>,
}

/// Validated, trimmed note fields
#[derive(Debug, Clone, PartialEq)]
pub struct NoteFields {
    pub instrument_name: String,
    pub data_point: String,
    pub actual_value: String,
    pub expected_value: String,
    pub observed_on: String,
    pub sentiment: Sentiment,
    pub commentary: String,
}

impl NotePayload {
    /// Every text field must be non-empty after trimming and the sentiment
    /// must be one of the three allowed values
    pub fn validate(&self) -> Result<NoteFields> {
        let missing = || Error::InvalidInput("All manual entry fields are required".to_string());

        let instrument_name = required(&self.instrument_name).ok_or_else(missing)?;
        let data_point = required(&self.data_point).ok_or_else(missing)?;
        let actual_value = required(&self.actual_value).ok_or_else(missing)?;
        let expected_value = required(&self.expected_value).ok_or_else(missing)?;
        let observed_on = required(&self.observed_on).ok_or_else(missing)?;
        let commentary = required(&self.commentary).ok_or_else(missing)?;

        let sentiment = self
            .sentiment
            .as_deref()
            .map(str::trim)
            .unwrap_or_default()
            .parse::<Sentiment>()?;

        Ok(NoteFields {
            instrument_name,
            data_point,
            actual_value,
            expected_value,
            observed_on,
            sentiment,
            commentary,
        })
    }
}

/// Query string of `GET /api/notes`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteFilter {
    pub sentiment: Option<String>,
    pub instrument_id: Option<String>,
}

/// Parsed note list filter; `None` means "don't filter on this"
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NoteQuery {
    pub sentiment: Option<Sentiment>,
    pub instrument_id: Option<i64>,
}

impl NoteFilter {
    /// Unknown sentiments are ignored; a non-numeric instrument id is rejected
    pub fn parse(&self) -> Result<NoteQuery> {
        let sentiment = self
            .sentiment
            .as_deref()
            .and_then(|s| s.trim().parse::<Sentiment>().ok());

        let instrument_id = match self.instrument_id.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(raw.parse::<i64>().map_err(|_| {
                Error::InvalidInput(format!("Invalid instrumentId: {}", raw))
            })?),
        };

        Ok(NoteQuery {
            sentiment,
            instrument_id,
        })
    }
}

/// Body of study note create/update requests
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StudyNotePayload {
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub content: Option<String>,
}

/// Validated study note fields
#[derive(Debug, Clone, PartialEq)]
pub struct StudyNoteFields {
    pub title: String,
    pub content: String,
}

impl StudyNotePayload {
    /// Title required after trimming; content defaults to empty and is kept
    /// verbatim
    pub fn validate(&self) -> Result<StudyNoteFields> {
        let title = required(&self.title)
            .ok_or_else(|| Error::InvalidInput("Title is required".to_string()))?;

        Ok(StudyNoteFields {
            title,
            content: self.content.clone().unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_payload() -> NotePayload {
        serde_json::from_value(json!({
            "instrumentName": "  UST 10Y ",
            "dataPoint": "CPI YoY",
            "actualValue": "3.4%",
            "expectedValue": "3.2%",
            "observedOn": "2024-01-11",
            "sentiment": "Bearish",
            "commentary": "Hot print, curve bear-flattened"
        }))
        .unwrap()
    }

    #[test]
    fn test_sentiment_parse_is_exact() {
        assert_eq!("Bullish".parse::<Sentiment>().unwrap(), Sentiment::Bullish);
        assert!("bullish".parse::<Sentiment>().is_err());
        assert!("Sideways".parse::<Sentiment>().is_err());
    }

    #[test]
    fn test_sentiment_serializes_as_name() {
        assert_eq!(serde_json::to_value(Sentiment::Neutral).unwrap(), json!("Neutral"));
    }

    #[test]
    fn test_note_payload_trims_fields() {
        let fields = valid_payload().validate().unwrap();
        assert_eq!(fields.instrument_name, "UST 10Y");
        assert_eq!(fields.sentiment, Sentiment::Bearish);
    }

    #[test]
    fn test_note_payload_rejects_blank_commentary() {
        let mut payload = valid_payload();
        payload.commentary = Some("   ".to_string());
        assert!(matches!(payload.validate(), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_note_payload_rejects_missing_field() {
        let mut payload = valid_payload();
        payload.observed_on = None;
        assert!(matches!(payload.validate(), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_note_payload_rejects_unknown_sentiment() {
        let mut payload = valid_payload();
        payload.sentiment = Some("Sideways".to_string());
        let err = payload.validate().unwrap_err();
        assert!(err.to_string().contains("Invalid sentiment"));
    }

    #[test]
    fn test_note_payload_accepts_numeric_values() {
        let payload: NotePayload = serde_json::from_value(json!({
            "instrumentName": "Bund",
            "dataPoint": "Yield",
            "actualValue": 2.31,
            "expectedValue": 2,
            "observedOn": "2024-02-01",
            "sentiment": "Neutral",
            "commentary": "Flat"
        }))
        .unwrap();

        let fields = payload.validate().unwrap();
        assert_eq!(fields.actual_value, "2.31");
        assert_eq!(fields.expected_value, "2");
    }

    #[test]
    fn test_filter_ignores_invalid_sentiment() {
        let filter = NoteFilter {
            sentiment: Some("Sideways".to_string()),
            instrument_id: None,
        };
        assert_eq!(filter.parse().unwrap(), NoteQuery::default());
    }

    #[test]
    fn test_filter_parses_instrument_id() {
        let filter = NoteFilter {
            sentiment: Some("Bullish".to_string()),
            instrument_id: Some("7".to_string()),
        };
        let query = filter.parse().unwrap();
        assert_eq!(query.sentiment, Some(Sentiment::Bullish));
        assert_eq!(query.instrument_id, Some(7));
    }

    #[test]
    fn test_filter_empty_instrument_id_is_ignored() {
        let filter = NoteFilter {
            sentiment: None,
            instrument_id: Some(String::new()),
        };
        assert_eq!(filter.parse().unwrap().instrument_id, None);
    }

    #[test]
    fn test_filter_rejects_non_numeric_instrument_id() {
        let filter = NoteFilter {
            sentiment: None,
            instrument_id: Some("abc".to_string()),
        };
        assert!(matches!(filter.parse(), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_study_payload_defaults_content() {
        let payload: StudyNotePayload = serde_json::from_value(json!({ "title": " CPI " })).unwrap();
        let fields = payload.validate().unwrap();
        assert_eq!(fields.title, "CPI");
        assert_eq!(fields.content, "");
    }

    #[test]
    fn test_study_payload_requires_title() {
        let payload: StudyNotePayload = serde_json::from_value(json!({ "title": "  " })).unwrap();
        assert!(matches!(payload.validate(), Err(Error::InvalidInput(_))));
    }
}
