use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

use crate::timefmt::timestamp;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryType {
    MorningPages,
    DailyReflection,
    WeeklyReview,
}

impl EntryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryType::MorningPages => "morning_pages",
            EntryType::DailyReflection => "daily_reflection",
            EntryType::WeeklyReview => "weekly_review",
        }
    }

    /// Content keys the backend expects for this entry type, with their prompts.
    pub fn prompts(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            EntryType::MorningPages => &[("content", "Morning pages")],
            EntryType::DailyReflection => &[
                ("went_well", "What went well today?"),
                ("improve", "What could be improved?"),
                ("grateful", "What am I grateful for?"),
            ],
            EntryType::WeeklyReview => &[
                ("wins", "Big wins this week"),
                ("challenges", "Challenges faced"),
                ("learnings", "Key learnings"),
                ("focus", "Focus for next week"),
            ],
        }
    }
}

impl std::fmt::Display for EntryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntryType {
    type Err = ParseEntryTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "morning_pages" | "morning" | "pages" => Ok(EntryType::MorningPages),
            "daily_reflection" | "reflection" => Ok(EntryType::DailyReflection),
            "weekly_review" | "review" => Ok(EntryType::WeeklyReview),
            _ => Err(ParseEntryTypeError(s.to_string())),
        }
    }
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid journal entry type: {0}")]
pub struct ParseEntryTypeError(String);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: Uuid,
    pub entry_type: EntryType,
    pub entry_date: NaiveDate,
    /// Free-form object whose keys depend on `entry_type`
    pub content: Map<String, Value>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}

impl JournalEntry {
    /// Content field as text, empty when missing or not a string.
    pub fn field(&self, key: &str) -> &str {
        self.content.get(key).and_then(Value::as_str).unwrap_or("")
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct JournalEntryList {
    pub entries: Vec<JournalEntry>,
    #[serde(default)]
    pub total: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewJournalEntry {
    pub entry_type: EntryType,
    pub entry_date: NaiveDate,
    pub content: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JournalStatus {
    pub morning_pages_streak: u32,
    pub daily_reflection_streak: u32,
    pub entries_this_week: u32,
    pub weekly_review_completed: bool,
}

/// Filters for listing entries
#[derive(Debug, Clone, Default)]
pub struct JournalQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub entry_type: Option<EntryType>,
}

impl JournalQuery {
    pub(crate) fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(start) = self.start_date {
            pairs.push(("start_date", start.to_string()));
        }
        if let Some(end) = self.end_date {
            pairs.push(("end_date", end.to_string()));
        }
        if let Some(entry_type) = self.entry_type {
            pairs.push(("entry_type", entry_type.to_string()));
        }
        pairs
    }
}
