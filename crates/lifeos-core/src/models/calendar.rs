use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

use crate::timefmt::{hhmm, timestamp};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub event_date: NaiveDate,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
    #[serde(default)]
    pub is_recurring: bool,
    /// Either the literal `"weekly"` or a JSON object with `days_of_week`
    #[serde(default)]
    pub recurrence_pattern: Option<String>,
    #[serde(default)]
    pub recurrence_end_date: Option<NaiveDate>,
    /// Shared by every occurrence materialized from one rule
    #[serde(default)]
    pub series_id: Option<Uuid>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CalendarEventList {
    pub events: Vec<CalendarEvent>,
    #[serde(default)]
    pub total: usize,
}

/// Body of `POST /api/v1/calendar/events`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewEventData {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub event_date: NaiveDate,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
    pub is_recurring: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recurrence_pattern: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recurrence_end_date: Option<NaiveDate>,
    /// ISO weekdays, 1 = Monday through 7 = Sunday
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recurrence_days: Option<Vec<u32>>,
}

/// Body of `PATCH /api/v1/calendar/events/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventChanges {
    pub title: String,
    pub description: Option<String>,
    pub event_date: NaiveDate,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recurrence_end_date: Option<NaiveDate>,
}

/// Which occurrences of a recurring event an edit or delete applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditScope {
    /// Only the selected occurrence
    #[default]
    Single,
    /// The selected occurrence and every later one in the series
    Future,
    /// Every occurrence in the series
    All,
}

impl EditScope {
    pub const ALL: [EditScope; 3] = [EditScope::Single, EditScope::Future, EditScope::All];

    pub fn as_str(&self) -> &'static str {
        match self {
            EditScope::Single => "single",
            EditScope::Future => "future",
            EditScope::All => "all",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EditScope::Single => "This event only",
            EditScope::Future => "This and future events",
            EditScope::All => "All events in series",
        }
    }
}

impl std::fmt::Display for EditScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EditScope {
    type Err = ParseEditScopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "single" | "this" | "occurrence" => Ok(EditScope::Single),
            "future" | "this_and_future" => Ok(EditScope::Future),
            "all" | "series" | "entire" => Ok(EditScope::All),
            _ => Err(ParseEditScopeError(s.to_string())),
        }
    }
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid edit scope: {0} (expected single, future or all)")]
pub struct ParseEditScopeError(String);

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("single", EditScope::Single)]
    #[case("THIS", EditScope::Single)]
    #[case("future", EditScope::Future)]
    #[case("this_and_future", EditScope::Future)]
    #[case("all", EditScope::All)]
    #[case("series", EditScope::All)]
    fn parses_scope_aliases(#[case] input: &str, #[case] expected: EditScope) {
        assert_eq!(input.parse::<EditScope>().unwrap(), expected);
    }

    #[test]
    fn rejects_unknown_scope() {
        assert!("everything".parse::<EditScope>().is_err());
    }

    #[test]
    fn decodes_backend_event_with_seconds_and_nulls() {
        let json = serde_json::json!({
            "id": "6f1c1d4e-8a0e-4b8e-9a57-0d3f0e5e1a11",
            "title": "Standup",
            "description": null,
            "event_date": "2025-01-06",
            "start_time": "09:00:00",
            "end_time": "09:15:00",
            "is_recurring": true,
            "recurrence_pattern": "weekly",
            "recurrence_end_date": "2025-03-01",
            "series_id": "0a4b1f55-7a43-4c0b-a0a8-2c4e0e8fbe01",
            "created_at": "2025-01-01T08:00:00.000000",
            "updated_at": "2025-01-01T08:00:00Z"
        });
        let event: CalendarEvent = serde_json::from_value(json).unwrap();
        assert!(event.is_recurring);
        assert_eq!(event.start_time, NaiveTime::from_hms_opt(9, 0, 0).unwrap());
        assert!(event.series_id.is_some());
    }

    #[test]
    fn new_event_omits_recurrence_fields_when_not_recurring() {
        let data = NewEventData {
            title: "Dentist".to_string(),
            description: None,
            event_date: NaiveDate::from_ymd_opt(2025, 2, 3).unwrap(),
            start_time: NaiveTime::from_hms_opt(14, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(15, 0, 0).unwrap(),
            is_recurring: false,
            recurrence_pattern: None,
            recurrence_end_date: None,
            recurrence_days: None,
        };
        let value = serde_json::to_value(&data).unwrap();
        assert_eq!(value["start_time"], "14:00");
        assert!(value.get("recurrence_days").is_none());
        assert!(value.get("recurrence_pattern").is_none());
        assert!(value.get("description").is_none());
    }
}
