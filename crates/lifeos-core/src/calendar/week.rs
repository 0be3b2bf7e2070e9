use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::{Datelike, Duration, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::models::CalendarEvent;
use crate::timefmt::format_date_range;

/// First day of a displayed week
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    #[default]
    Monday,
    Sunday,
}

impl FromStr for WeekStart {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "monday" | "mon" => Ok(WeekStart::Monday),
            "sunday" | "sun" => Ok(WeekStart::Sunday),
            other => Err(CoreError::InvalidInput(format!("Invalid week start: {}", other))),
        }
    }
}

/// Seven consecutive days, `start..=end()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WeekRange {
    start: NaiveDate,
}

impl WeekRange {
    pub fn containing(date: NaiveDate, week_start: WeekStart) -> Self {
        let offset = match week_start {
            WeekStart::Monday => date.weekday().num_days_from_monday(),
            WeekStart::Sunday => date.weekday().num_days_from_sunday(),
        };
        Self {
            start: date - Duration::days(i64::from(offset)),
        }
    }

    pub fn current(week_start: WeekStart) -> Self {
        Self::containing(Local::now().date_naive(), week_start)
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.start + Duration::days(6)
    }

    pub fn prev(&self) -> Self {
        Self {
            start: self.start - Duration::days(7),
        }
    }

    pub fn next(&self) -> Self {
        Self {
            start: self.start + Duration::days(7),
        }
    }

    /// The week `weeks` weeks away, or `None` past the last representable date.
    pub fn offset(&self, weeks: i32) -> Option<Self> {
        let start = self
            .start
            .checked_add_signed(Duration::weeks(i64::from(weeks)))?;
        start.checked_add_signed(Duration::days(6))?;
        Some(Self { start })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end()
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let start = self.start;
        (0..7).map(move |offset| start + Duration::days(offset))
    }

    pub fn label(&self) -> String {
        format_date_range(self.start, self.end())
    }
}

/// Events keyed by date, each day sorted by start time.
pub fn group_by_date(events: &[CalendarEvent]) -> BTreeMap<NaiveDate, Vec<CalendarEvent>> {
    let mut grouped: BTreeMap<NaiveDate, Vec<CalendarEvent>> = BTreeMap::new();
    for event in events {
        grouped.entry(event.event_date).or_default().push(event.clone());
    }
    for day in grouped.values_mut() {
        day.sort_by_key(|event| event.start_time);
    }
    grouped
}
