//! Create/edit/delete flow for a single calendar event.
//!
//! Recurring events carry a scope (`single`, `future`, `all`) that is sent to
//! the backend verbatim; the backend decides which occurrences it touches.
//! Non-recurring events never expose a scope and always use `single`.

use chrono::{Local, NaiveDate};
use tracing::{info, warn};

use super::form::EventForm;
use super::view::CalendarView;
use crate::api::CalendarApi;
use crate::error::{CoreError, FieldErrors};
use crate::models::{CalendarEvent, EditScope};

pub const SAVE_FAILED: &str = "Failed to save event. Please try again.";
pub const DELETE_FAILED: &str = "Failed to delete event. Please try again.";

#[derive(Debug)]
pub struct EventEditor {
    event: Option<CalendarEvent>,
    form: EventForm,
    scope: EditScope,
    errors: FieldErrors,
    is_open: bool,
    is_submitting: bool,
}

impl EventEditor {
    /// Editor for a new event on `date`, or today.
    pub fn open_new(date: Option<NaiveDate>) -> Self {
        let date = date.unwrap_or_else(|| Local::now().date_naive());
        Self {
            event: None,
            form: EventForm::new(date),
            scope: EditScope::Single,
            errors: FieldErrors::new(),
            is_open: true,
            is_submitting: false,
        }
    }

    pub fn open_edit(event: CalendarEvent) -> Self {
        Self {
            form: EventForm::from_event(&event),
            event: Some(event),
            scope: EditScope::Single,
            errors: FieldErrors::new(),
            is_open: true,
            is_submitting: false,
        }
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn is_editing(&self) -> bool {
        self.event.is_some()
    }

    pub fn is_submitting(&self) -> bool {
        self.is_submitting
    }

    pub fn event(&self) -> Option<&CalendarEvent> {
        self.event.as_ref()
    }

    pub fn form(&self) -> &EventForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut EventForm {
        &mut self.form
    }

    /// Messages from the last rejected submission.
    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Only existing recurring events offer a scope choice.
    pub fn shows_scope_selector(&self) -> bool {
        self.event.as_ref().is_some_and(|event| event.is_recurring)
    }

    /// Choose a scope; ignored unless the scope selector is shown.
    pub fn set_scope(&mut self, scope: EditScope) {
        if self.shows_scope_selector() {
            self.scope = scope;
        }
    }

    pub fn scope(&self) -> EditScope {
        if self.shows_scope_selector() {
            self.scope
        } else {
            EditScope::Single
        }
    }

    /// Close unless a request is in flight.
    pub fn close(&mut self) -> bool {
        if self.is_submitting {
            return false;
        }
        self.is_open = false;
        true
    }

    fn begin(&mut self) -> Result<(), CoreError> {
        if !self.is_open {
            return Err(CoreError::InvalidInput("Editor is closed".to_string()));
        }
        if self.is_submitting {
            return Err(CoreError::Busy);
        }
        Ok(())
    }

    /// Validate, then create or update the event.
    ///
    /// On success the editor closes and the displayed week is re-fetched. On
    /// failure the editor stays open with the form untouched.
    pub async fn submit<B: CalendarApi + Send + Sync>(
        &mut self,
        view: &mut CalendarView<B>,
    ) -> Result<CalendarEvent, CoreError> {
        self.begin()?;

        self.errors = self.form.errors();
        if !self.errors.is_empty() {
            return Err(CoreError::Validation(self.errors.clone()));
        }

        self.is_submitting = true;
        let scope = self.scope();
        let result = match &self.event {
            Some(event) => match self.form.to_changes() {
                Ok(changes) => view.backend().update_event(event.id, changes, scope).await,
                Err(err) => Err(err),
            },
            None => match self.form.to_new_event() {
                Ok(data) => view.backend().create_event(data).await,
                Err(err) => Err(err),
            },
        };
        self.is_submitting = false;

        let saved = result.map_err(|err| err.with_context(SAVE_FAILED))?;
        info!(id = %saved.id, %scope, "event saved");
        self.finish(view).await;
        Ok(saved)
    }

    /// Delete the event being edited with the current scope.
    pub async fn delete<B: CalendarApi + Send + Sync>(
        &mut self,
        view: &mut CalendarView<B>,
    ) -> Result<(), CoreError> {
        self.begin()?;
        let id = match &self.event {
            Some(event) => event.id,
            None => return Err(CoreError::InvalidInput("No event to delete".to_string())),
        };

        self.is_submitting = true;
        let scope = self.scope();
        let result = view.backend().delete_event(id, scope).await;
        self.is_submitting = false;

        result.map_err(|err| err.with_context(DELETE_FAILED))?;
        info!(%id, %scope, "event deleted");
        self.finish(view).await;
        Ok(())
    }

    async fn finish<B: CalendarApi + Send + Sync>(&mut self, view: &mut CalendarView<B>) {
        self.is_open = false;
        if let Err(err) = view.refresh().await {
            warn!(error = %err, "calendar refresh after save failed");
        }
    }
}
