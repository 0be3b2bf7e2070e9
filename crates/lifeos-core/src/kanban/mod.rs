//! Kanban board: three ordered lanes, drag to move or reorder.

pub mod board;
pub mod controller;

pub use board::{DropPlan, DropTarget};
pub use controller::{DragOutcome, KanbanController};
