//! Typed access to the backend, one trait per domain.
//!
//! Controllers are generic over the narrowest trait they need so tests can
//! substitute fakes; [`HttpBackend`] implements all of them over an
//! [`ApiClient`].

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::error::CoreError;
use crate::models::{
    ActiveSession, CalendarEvent, Capture, CaptureList, ClearCompletedResponse, EditScope, EntryType,
    EventChanges, ExerciseList, FitnessSummary, HistoryPage, JournalEntry, JournalQuery,
    JournalStatus, LogSetRequest, LoginResponse, MoveTaskRequest, NewCapture, NewEventData,
    NewJournalEntry, NewProjectData, NewTaskData, Note, ProgramDetail, ProgramList, Project,
    ProjectDetail, ReorderTasksRequest, SessionCancelled, SessionComplete, Task,
    UpdateCapture, UpdateProjectData, UpdateTaskData, WorkoutLog,
};

pub mod client;
pub mod session;

mod auth;
mod calendar;
mod captures;
mod fitness;
mod journal;
mod projects;

pub use client::ApiClient;
pub use session::SessionStore;

/// Domain-specific trait for authentication
#[async_trait]
pub trait AuthApi {
    async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, CoreError>;
    async fn refresh(&self) -> Result<bool, CoreError>;
    async fn logout(&self) -> Result<(), CoreError>;
}

/// Domain-specific trait for calendar events
#[async_trait]
pub trait CalendarApi {
    /// Events whose date falls in `start..=end`, recurring series expanded.
    async fn list_events(&self, start: NaiveDate, end: NaiveDate)
        -> Result<Vec<CalendarEvent>, CoreError>;
    async fn get_event(&self, id: Uuid) -> Result<CalendarEvent, CoreError>;
    async fn create_event(&self, data: NewEventData) -> Result<CalendarEvent, CoreError>;
    async fn update_event(
        &self,
        id: Uuid,
        changes: EventChanges,
        scope: EditScope,
    ) -> Result<CalendarEvent, CoreError>;
    async fn delete_event(&self, id: Uuid, scope: EditScope) -> Result<(), CoreError>;
}

/// Domain-specific trait for projects, their tasks and notes
#[async_trait]
pub trait ProjectApi {
    async fn list_projects(&self) -> Result<Vec<ProjectDetail>, CoreError>;
    async fn create_project(&self, data: NewProjectData) -> Result<Project, CoreError>;
    async fn get_project(&self, id: Uuid) -> Result<ProjectDetail, CoreError>;
    async fn get_project_by_slug(&self, slug: &str) -> Result<ProjectDetail, CoreError>;
    async fn update_project(&self, id: Uuid, data: UpdateProjectData) -> Result<Project, CoreError>;

    async fn create_task(&self, project_id: Uuid, data: NewTaskData) -> Result<Task, CoreError>;
    async fn get_task(&self, id: Uuid) -> Result<Task, CoreError>;
    async fn update_task(&self, id: Uuid, data: UpdateTaskData) -> Result<Task, CoreError>;
    async fn delete_task(&self, id: Uuid) -> Result<(), CoreError>;
    async fn move_task(&self, id: Uuid, request: MoveTaskRequest) -> Result<Task, CoreError>;
    async fn reorder_tasks(
        &self,
        project_id: Uuid,
        request: ReorderTasksRequest,
    ) -> Result<(), CoreError>;
    async fn clear_completed(&self, project_id: Uuid) -> Result<ClearCompletedResponse, CoreError>;

    async fn create_note(&self, project_id: Uuid, content: &str) -> Result<Note, CoreError>;
    async fn update_note(&self, id: Uuid, content: &str) -> Result<Note, CoreError>;
    async fn delete_note(&self, id: Uuid) -> Result<(), CoreError>;
}

/// Domain-specific trait for the capture inbox
#[async_trait]
pub trait CaptureApi {
    async fn list_captures(&self, include_processed: bool) -> Result<CaptureList, CoreError>;
    async fn create_capture(&self, data: NewCapture) -> Result<Capture, CoreError>;
    async fn update_capture(&self, id: Uuid, data: UpdateCapture) -> Result<Capture, CoreError>;
    async fn delete_capture(&self, id: Uuid) -> Result<(), CoreError>;
    async fn unprocessed_count(&self) -> Result<usize, CoreError>;
}

/// Domain-specific trait for journal entries
#[async_trait]
pub trait JournalApi {
    async fn list_entries(&self, query: &JournalQuery) -> Result<Vec<JournalEntry>, CoreError>;
    async fn create_entry(&self, data: NewJournalEntry) -> Result<JournalEntry, CoreError>;
    async fn get_entry(&self, id: Uuid) -> Result<JournalEntry, CoreError>;
    async fn find_entry(
        &self,
        entry_type: EntryType,
        date: NaiveDate,
    ) -> Result<Option<JournalEntry>, CoreError>;
    async fn update_entry(
        &self,
        id: Uuid,
        content: serde_json::Map<String, serde_json::Value>,
    ) -> Result<JournalEntry, CoreError>;
    async fn delete_entry(&self, id: Uuid) -> Result<(), CoreError>;
    async fn journal_status(&self) -> Result<JournalStatus, CoreError>;
}

/// Domain-specific trait for workouts
#[async_trait]
pub trait FitnessApi {
    async fn list_exercises(&self, muscle_group: Option<&str>) -> Result<ExerciseList, CoreError>;
    async fn list_programs(&self) -> Result<ProgramList, CoreError>;
    async fn get_program(&self, id: Uuid) -> Result<ProgramDetail, CoreError>;
    async fn start_session(
        &self,
        program_id: Option<Uuid>,
        day_label: Option<String>,
    ) -> Result<ActiveSession, CoreError>;
    async fn active_session(&self) -> Result<Option<ActiveSession>, CoreError>;
    async fn log_set(&self, session_id: Uuid, set: LogSetRequest) -> Result<WorkoutLog, CoreError>;
    async fn complete_session(
        &self,
        session_id: Uuid,
        notes: Option<String>,
    ) -> Result<SessionComplete, CoreError>;
    async fn cancel_session(&self, session_id: Uuid) -> Result<SessionCancelled, CoreError>;
    async fn history(&self, page: u32, per_page: u32) -> Result<HistoryPage, CoreError>;
    async fn fitness_summary(&self) -> Result<FitnessSummary, CoreError>;
}

/// Main backend trait that composes all domain traits
pub trait Backend: AuthApi + CalendarApi + ProjectApi + CaptureApi + JournalApi + FitnessApi {}

/// HTTP implementation of every domain trait
pub struct HttpBackend {
    client: ApiClient,
}

impl HttpBackend {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }
}

impl Backend for HttpBackend {}
