use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CoreError;
use crate::timefmt::timestamp;

pub const MAX_CAPTURE_LEN: usize = 5000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Capture {
    pub id: Uuid,
    pub text: String,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub processed: bool,
    #[serde(default)]
    pub deleted: bool,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CaptureList {
    pub captures: Vec<Capture>,
    #[serde(default)]
    pub total: usize,
    #[serde(default)]
    pub unprocessed_count: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CaptureCount {
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewCapture {
    pub text: String,
    pub source: String,
}

impl NewCapture {
    /// Trimmed capture text, rejecting empty and oversized notes.
    pub fn new(text: &str, source: impl Into<String>) -> Result<Self, CoreError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(CoreError::InvalidInput("Capture text is required".to_string()));
        }
        if text.chars().count() > MAX_CAPTURE_LEN {
            return Err(CoreError::InvalidInput(format!(
                "Capture text must be {} characters or less",
                MAX_CAPTURE_LEN
            )));
        }
        Ok(Self {
            text: text.to_string(),
            source: source.into(),
        })
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateCapture {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processed: Option<bool>,
}
