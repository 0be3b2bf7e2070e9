//! Wire models shared with the Life OS backend.
//!
//! Field names follow the JSON the backend speaks; request payloads skip
//! absent optionals so partial updates only touch what was set.

pub mod auth;
pub mod calendar;
pub mod captures;
pub mod fitness;
pub mod journal;
pub mod projects;

pub use auth::{LoginRequest, LoginResponse, MessageResponse};
pub use calendar::{
    CalendarEvent, CalendarEventList, EditScope, EventChanges, NewEventData,
    ParseEditScopeError,
};
pub use captures::{Capture, CaptureCount, CaptureList, NewCapture, UpdateCapture};
pub use fitness::{
    ActiveSession, CompleteSessionRequest, Exercise, ExerciseList, ExerciseSummary,
    FitnessSummary, HistoryItem, HistoryPage, LogSetRequest, ProgramDetail,
    ProgramExerciseEntry, ProgramList, ProgramListItem, SessionCancelled, SessionComplete,
    SessionExerciseInfo, StartSessionRequest, WorkoutLog,
};
pub use journal::{
    EntryType, JournalEntry, JournalEntryList, JournalQuery, JournalStatus, NewJournalEntry,
    ParseEntryTypeError,
};
pub use projects::{
    ClearCompletedResponse, MoveTaskRequest, NewProjectData, NewTaskData, Note,
    ParseTaskStatusError, Project, ProjectDetail, ReorderTasksRequest, Task, TaskStatus,
    TasksByStatus, UpdateProjectData, UpdateTaskData,
};
