//! Calendar week views and the recurring event editor.

pub mod editor;
pub mod form;
pub mod recurrence;
pub mod view;
pub mod week;

pub use editor::EventEditor;
pub use form::EventForm;
pub use recurrence::{Occurrences, WeeklyRule};
pub use view::CalendarView;
pub use week::{WeekRange, WeekStart};
