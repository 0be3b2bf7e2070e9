use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

use crate::timefmt::{timestamp, timestamp_opt};

/// Kanban lane a task sits in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Backlog,
    InProgress,
    Completed,
}

impl TaskStatus {
    /// Lanes in board order
    pub const LANES: [TaskStatus; 3] = [
        TaskStatus::Backlog,
        TaskStatus::InProgress,
        TaskStatus::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Backlog => "backlog",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            TaskStatus::Backlog => "Backlog",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Completed => "Completed",
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = ParseTaskStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "backlog" | "todo" => Ok(TaskStatus::Backlog),
            "in_progress" | "doing" | "wip" => Ok(TaskStatus::InProgress),
            "completed" | "done" => Ok(TaskStatus::Completed),
            _ => Err(ParseTaskStatusError(s.to_string())),
        }
    }
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid task status: {0} (expected backlog, in_progress or completed)")]
pub struct ParseTaskStatusError(String);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub project_id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub status: TaskStatus,
    /// Position within the task's lane
    pub sort_order: i32,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
    /// Only set once the task reaches the completed lane
    #[serde(default, with = "timestamp_opt")]
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub objective: Option<String>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: Uuid,
    pub project_id: Uuid,
    pub content: String,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}

/// Tasks grouped by lane, as the backend returns them with a project
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TasksByStatus {
    #[serde(default)]
    pub backlog: Vec<Task>,
    #[serde(default)]
    pub in_progress: Vec<Task>,
    #[serde(default)]
    pub completed: Vec<Task>,
}

impl TasksByStatus {
    pub fn lane(&self, status: TaskStatus) -> &Vec<Task> {
        match status {
            TaskStatus::Backlog => &self.backlog,
            TaskStatus::InProgress => &self.in_progress,
            TaskStatus::Completed => &self.completed,
        }
    }

    pub fn lane_mut(&mut self, status: TaskStatus) -> &mut Vec<Task> {
        match status {
            TaskStatus::Backlog => &mut self.backlog,
            TaskStatus::InProgress => &mut self.in_progress,
            TaskStatus::Completed => &mut self.completed,
        }
    }

    pub fn total(&self) -> usize {
        self.backlog.len() + self.in_progress.len() + self.completed.len()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectDetail {
    #[serde(flatten)]
    pub project: Project,
    #[serde(default)]
    pub tasks: TasksByStatus,
    #[serde(default)]
    pub notes: Vec<Note>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewProjectData {
    pub name: String,
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub objective: Option<String>,
}

impl NewProjectData {
    /// Build a project with a slug derived from its name.
    pub fn named(name: impl Into<String>, objective: Option<String>) -> Self {
        let name = name.into();
        let slug = slugify(&name);
        Self { name, slug, objective }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateProjectData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub objective: Option<Option<String>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewTaskData {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: TaskStatus,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateTaskData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<i32>,
}

/// Body of `PATCH /api/v1/projects/tasks/{id}/move`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveTaskRequest {
    pub new_status: TaskStatus,
    pub sort_order: i32,
}

/// Body of `POST /api/v1/projects/{id}/tasks/reorder`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReorderTasksRequest {
    pub status: TaskStatus,
    pub task_order: Vec<Uuid>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClearCompletedResponse {
    pub deleted_count: u64,
}

/// Lowercase, ASCII alphanumerics joined by single dashes, at most 50 chars.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug.truncate(50);
    slug.trim_end_matches('-').to_string()
}
