//! # Life OS Core Library
//!
//! Client-side logic for the Life OS personal productivity backend: journal,
//! fitness, projects, calendar and quick capture.
//!
//! ## Core Modules
//!
//! - [`api`]: HTTP client with cookie session and one-shot refresh on `401`,
//!   plus one trait per backend domain
//! - [`models`]: Wire types shared with the backend
//! - [`calendar`]: Week views, event form validation, the recurring event
//!   editor and local weekly-rule expansion
//! - [`kanban`]: Lane arithmetic and the optimistic move/reorder controller
//! - [`cache`]: Keyed revalidate-on-demand query cache
//! - [`stores`]: Capture modal and workout timer state
//! - [`error`]: Error types
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use lifeos_core::{
//!     api::{ApiClient, HttpBackend},
//!     kanban::{DragOutcome, KanbanController},
//!     models::TaskStatus,
//! };
//! use uuid::Uuid;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), lifeos_core::error::CoreError> {
//!     let backend = HttpBackend::new(ApiClient::new("http://localhost:8000")?);
//!     let project_id = Uuid::new_v4();
//!
//!     let mut board = KanbanController::new(backend, project_id);
//!     board.load().await?;
//!
//!     let first = board.lane(TaskStatus::Backlog)[0].id;
//!     match board.move_task(first, TaskStatus::InProgress).await? {
//!         DragOutcome::Moved(task) => println!("moved {}", task.title),
//!         DragOutcome::RolledBack(err) => eprintln!("reverted: {}", err),
//!         _ => {}
//!     }
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cache;
pub mod calendar;
pub mod error;
pub mod kanban;
pub mod models;
pub mod stores;
pub mod timefmt;
