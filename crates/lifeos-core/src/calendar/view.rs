use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::debug;

use super::week::{group_by_date, WeekRange, WeekStart};
use crate::api::CalendarApi;
use crate::cache::Cached;
use crate::error::CoreError;
use crate::models::CalendarEvent;

/// One displayed week of events, cached per week.
pub struct CalendarView<B> {
    backend: B,
    week_start: WeekStart,
    week: WeekRange,
    cache: Cached<WeekRange, Vec<CalendarEvent>>,
}

impl<B: CalendarApi + Send + Sync> CalendarView<B> {
    pub fn new(backend: B, week_start: WeekStart) -> Self {
        Self::at(backend, WeekRange::current(week_start), week_start)
    }

    pub fn at(backend: B, week: WeekRange, week_start: WeekStart) -> Self {
        Self {
            backend,
            week_start,
            week,
            cache: Cached::new(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn week(&self) -> WeekRange {
        self.week
    }

    pub fn show_date(&mut self, date: NaiveDate) {
        self.week = WeekRange::containing(date, self.week_start);
    }

    pub fn prev_week(&mut self) {
        self.week = self.week.prev();
    }

    pub fn next_week(&mut self) {
        self.week = self.week.next();
    }

    /// Step `weeks` weeks forward, or back when negative.
    pub fn shift_weeks(&mut self, weeks: i32) -> Result<(), CoreError> {
        self.week = self.week.offset(weeks).ok_or_else(|| {
            CoreError::InvalidInput(format!("Week offset {} is out of range", weeks))
        })?;
        Ok(())
    }

    pub fn today(&mut self) {
        self.week = WeekRange::current(self.week_start);
    }

    /// Events of the displayed week, fetched when not cached.
    pub async fn load(&mut self) -> Result<&[CalendarEvent], CoreError> {
        let backend = &self.backend;
        let events = self
            .cache
            .load(self.week, |week| async move {
                backend.list_events(week.start(), week.end()).await
            })
            .await?;
        Ok(events.as_slice())
    }

    /// Re-fetch the displayed week regardless of what is cached.
    pub async fn refresh(&mut self) -> Result<&[CalendarEvent], CoreError> {
        debug!(week = %self.week.label(), "refreshing calendar week");
        self.cache.invalidate();
        self.load().await
    }

    /// Cached events of the displayed week; empty until loaded.
    pub fn events(&self) -> &[CalendarEvent] {
        match (self.cache.key(), self.cache.data()) {
            (Some(key), Some(events)) if *key == self.week => events.as_slice(),
            _ => &[],
        }
    }

    pub fn events_by_date(&self) -> BTreeMap<NaiveDate, Vec<CalendarEvent>> {
        group_by_date(self.events())
    }
}
