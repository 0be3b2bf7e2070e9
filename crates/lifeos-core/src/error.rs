use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Malformed response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{detail}")]
    Api {
        status: u16,
        code: String,
        detail: String,
    },

    #[error("Session expired. Please log in again.")]
    SessionExpired,

    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Another operation is already in progress")]
    Busy,

    #[error("{context}: {source}")]
    Failed {
        context: &'static str,
        #[source]
        source: Box<CoreError>,
    },

    #[error("An unknown error has occurred.")]
    Unknown,
}

impl CoreError {
    /// HTTP status of an API error, if this is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            CoreError::Api { status, .. } => Some(*status),
            CoreError::Failed { source, .. } => source.status(),
            _ => None,
        }
    }

    pub(crate) fn with_context(self, context: &'static str) -> Self {
        CoreError::Failed {
            context,
            source: Box::new(self),
        }
    }
}

/// Per-field validation messages, keyed by form field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.0.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// `Ok(())` when no field failed, otherwise a `CoreError::Validation`.
    pub fn into_result(self) -> Result<(), CoreError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(CoreError::Validation(self))
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in &self.0 {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{}: {}", field, message)?;
            first = false;
        }
        Ok(())
    }
}
