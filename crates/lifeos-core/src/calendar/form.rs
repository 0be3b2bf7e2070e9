use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};

use super::recurrence::{days_from_pattern, iso_days};
use crate::error::{CoreError, FieldErrors};
use crate::models::{CalendarEvent, EventChanges, NewEventData};

pub const MAX_TITLE_LEN: usize = 255;
pub const WEEKLY_PATTERN: &str = "weekly";

/// Editable fields of an event, before validation.
///
/// Optional fields model inputs the user may have cleared.
#[derive(Debug, Clone, PartialEq)]
pub struct EventForm {
    pub title: String,
    pub description: String,
    pub event_date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub is_recurring: bool,
    pub recurrence_days: Vec<Weekday>,
    pub recurrence_end_date: Option<NaiveDate>,
}

impl EventForm {
    /// Defaults for a new event: one hour from 09:00, not recurring.
    pub fn new(date: NaiveDate) -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            event_date: Some(date),
            start_time: NaiveTime::from_hms_opt(9, 0, 0),
            end_time: NaiveTime::from_hms_opt(10, 0, 0),
            is_recurring: false,
            recurrence_days: Vec::new(),
            recurrence_end_date: None,
        }
    }

    pub fn from_event(event: &CalendarEvent) -> Self {
        let recurrence_days = if event.is_recurring {
            days_from_pattern(event.recurrence_pattern.as_deref())
                .unwrap_or_else(|| vec![event.event_date.weekday()])
        } else {
            Vec::new()
        };
        Self {
            title: event.title.clone(),
            description: event.description.clone().unwrap_or_default(),
            event_date: Some(event.event_date),
            start_time: Some(event.start_time),
            end_time: Some(event.end_time),
            is_recurring: event.is_recurring,
            recurrence_days,
            recurrence_end_date: event.recurrence_end_date,
        }
    }

    pub fn toggle_day(&mut self, day: Weekday) {
        match self.recurrence_days.iter().position(|d| *d == day) {
            Some(index) => {
                self.recurrence_days.remove(index);
            }
            None => self.recurrence_days.push(day),
        }
    }

    /// Per-field messages; empty when the form can be submitted.
    pub fn errors(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();

        if self.title.trim().is_empty() {
            errors.insert("title", "Title is required");
        } else if self.title.chars().count() > MAX_TITLE_LEN {
            errors.insert("title", "Title must be 255 characters or less");
        }

        if self.event_date.is_none() {
            errors.insert("event_date", "Date is required");
        }

        if self.start_time.is_none() {
            errors.insert("start_time", "Start time is required");
        }

        match (self.start_time, self.end_time) {
            (_, None) => errors.insert("end_time", "End time is required"),
            (Some(start), Some(end)) if start >= end => {
                errors.insert("end_time", "End time must be after start time")
            }
            _ => {}
        }

        if self.is_recurring {
            if self.recurrence_days.is_empty() {
                errors.insert("recurrence_days", "Select at least one day");
            }
            match (self.recurrence_end_date, self.event_date) {
                (None, _) => errors.insert(
                    "recurrence_end_date",
                    "End date is required for recurring events",
                ),
                (Some(end), Some(date)) if end <= date => {
                    errors.insert("recurrence_end_date", "End date must be after event date")
                }
                _ => {}
            }
        }

        errors
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        self.errors().into_result()
    }

    fn description(&self) -> Option<String> {
        let trimmed = self.description.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }

    /// Validated creation payload.
    pub fn to_new_event(&self) -> Result<NewEventData, CoreError> {
        self.validate()?;
        let (event_date, start_time, end_time) = self.required()?;
        let recurring = self.is_recurring;
        Ok(NewEventData {
            title: self.title.trim().to_string(),
            description: self.description(),
            event_date,
            start_time,
            end_time,
            is_recurring: recurring,
            recurrence_pattern: recurring.then(|| WEEKLY_PATTERN.to_string()),
            recurrence_end_date: if recurring { self.recurrence_end_date } else { None },
            recurrence_days: recurring.then(|| iso_days(&self.recurrence_days)),
        })
    }

    /// Validated update payload.
    pub fn to_changes(&self) -> Result<EventChanges, CoreError> {
        self.validate()?;
        let (event_date, start_time, end_time) = self.required()?;
        Ok(EventChanges {
            title: self.title.trim().to_string(),
            description: self.description(),
            event_date,
            start_time,
            end_time,
            recurrence_end_date: if self.is_recurring {
                self.recurrence_end_date
            } else {
                None
            },
        })
    }

    fn required(&self) -> Result<(NaiveDate, NaiveTime, NaiveTime), CoreError> {
        match (self.event_date, self.start_time, self.end_time) {
            (Some(date), Some(start), Some(end)) => Ok((date, start, end)),
            _ => Err(CoreError::Unknown),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn time(h: u32, m: u32) -> Option<NaiveTime> {
        NaiveTime::from_hms_opt(h, m, 0)
    }

    fn filled() -> EventForm {
        let mut form = EventForm::new(date("2025-01-06"));
        form.title = "Standup".to_string();
        form
    }

    #[test]
    fn new_form_defaults_to_nine_to_ten() {
        let form = EventForm::new(date("2025-01-06"));
        assert_eq!(form.start_time, time(9, 0));
        assert_eq!(form.end_time, time(10, 0));
        assert!(!form.is_recurring);
        assert_eq!(form.errors().get("title"), Some("Title is required"));
    }

    #[rstest]
    #[case(time(9, 0), time(8, 0))]
    #[case(time(9, 0), time(9, 0))]
    fn end_must_follow_start(#[case] start: Option<NaiveTime>, #[case] end: Option<NaiveTime>) {
        let mut form = filled();
        form.start_time = start;
        form.end_time = end;
        assert_eq!(
            form.errors().get("end_time"),
            Some("End time must be after start time")
        );
    }

    #[test]
    fn missing_fields_each_get_one_message() {
        let mut form = filled();
        form.title = "   ".to_string();
        form.event_date = None;
        form.start_time = None;
        form.end_time = None;
        let errors = form.errors();
        assert_eq!(errors.len(), 4);
        assert_eq!(errors.get("event_date"), Some("Date is required"));
        assert_eq!(errors.get("start_time"), Some("Start time is required"));
        assert_eq!(errors.get("end_time"), Some("End time is required"));
    }

    #[test]
    fn long_titles_are_rejected() {
        let mut form = filled();
        form.title = "x".repeat(256);
        assert_eq!(
            form.errors().get("title"),
            Some("Title must be 255 characters or less")
        );
        form.title = "x".repeat(255);
        assert!(form.validate().is_ok());
    }

    #[rstest]
    #[case(None, "End date is required for recurring events")]
    #[case(Some("2025-01-06"), "End date must be after event date")]
    #[case(Some("2025-01-01"), "End date must be after event date")]
    fn recurring_end_date_rules(#[case] end: Option<&str>, #[case] message: &str) {
        let mut form = filled();
        form.is_recurring = true;
        form.recurrence_days = vec![Weekday::Mon];
        form.recurrence_end_date = end.map(date);
        assert_eq!(form.errors().get("recurrence_end_date"), Some(message));
        assert!(matches!(form.to_new_event(), Err(CoreError::Validation(_))));
    }

    #[test]
    fn recurring_needs_a_day() {
        let mut form = filled();
        form.is_recurring = true;
        form.recurrence_end_date = Some(date("2025-02-01"));
        assert_eq!(
            form.errors().get("recurrence_days"),
            Some("Select at least one day")
        );
        form.toggle_day(Weekday::Sun);
        assert!(form.validate().is_ok());
        form.toggle_day(Weekday::Sun);
        assert!(form.validate().is_err());
    }

    #[test]
    fn recurring_payload_uses_iso_days() {
        let mut form = filled();
        form.description = "  ".to_string();
        form.is_recurring = true;
        form.recurrence_days = vec![Weekday::Sun, Weekday::Mon];
        form.recurrence_end_date = Some(date("2025-03-01"));
        let data = form.to_new_event().unwrap();
        assert_eq!(data.recurrence_pattern.as_deref(), Some("weekly"));
        assert_eq!(data.recurrence_days, Some(vec![1, 7]));
        assert_eq!(data.description, None);
    }

    #[test]
    fn one_off_payload_drops_recurrence_fields() {
        let mut form = filled();
        form.recurrence_end_date = Some(date("2025-03-01"));
        let data = form.to_new_event().unwrap();
        assert!(data.recurrence_pattern.is_none());
        assert!(data.recurrence_end_date.is_none());
        assert!(data.recurrence_days.is_none());
    }
}
