use clap::{Args, Parser, Subcommand};
use lifeos_core::models::{EditScope, EntryType, TaskStatus};
use uuid::Uuid;

/// Largest `calendar week --offset`, about a hundred years.
pub const MAX_WEEK_OFFSET: i64 = 5200;

/// Life OS from the terminal: calendar, project boards, inbox, journal and workouts
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Sign in and keep the session for later commands
    Login(LoginCommand),
    /// Sign out and forget the stored session
    Logout,
    /// Weekly calendar and recurring events
    Calendar(CalendarCommand),
    /// Projects and their kanban boards
    Project(ProjectCommand),
    /// Tasks on a project board
    Task(TaskCommand),
    /// Quick captures in the inbox
    Capture(CaptureCommand),
    /// Morning pages, daily reflections and weekly reviews
    Journal(JournalCommand),
    /// Workout programs and sessions
    Fitness(FitnessCommand),
}

#[derive(Args, Debug, Clone)]
pub struct LoginCommand {
    #[arg(short, long)]
    pub username: Option<String>,
    /// Read from a prompt when omitted
    #[arg(long)]
    pub password: Option<String>,
}

// ---------------------------------------------------------------- calendar

#[derive(Args, Debug, Clone)]
pub struct CalendarCommand {
    #[command(subcommand)]
    pub command: CalendarSubcommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum CalendarSubcommand {
    /// Show the events of one week
    Week(WeekCommand),
    /// Add an event, optionally repeating weekly
    Add(AddEventCommand),
    /// Edit an event
    Edit(EditEventCommand),
    /// Delete an event
    Delete(DeleteEventCommand),
    /// List upcoming dates of a recurring event
    Occurrences(OccurrencesCommand),
}

#[derive(Args, Debug, Clone)]
pub struct WeekCommand {
    /// Any day in the week to show (e.g. '2025-01-06', 'next monday')
    #[arg(long)]
    pub date: Option<String>,
    /// Weeks to step forward (or back, when negative), about a hundred years at most
    #[arg(
        long,
        default_value_t = 0,
        allow_negative_numbers = true,
        value_parser = clap::value_parser!(i32).range(-MAX_WEEK_OFFSET..=MAX_WEEK_OFFSET)
    )]
    pub offset: i32,
}

#[derive(Args, Debug, Clone)]
pub struct AddEventCommand {
    pub title: String,
    /// Defaults to today
    #[arg(long)]
    pub date: Option<String>,
    /// Start time, e.g. '09:00' or '2:30 PM'
    #[arg(long)]
    pub start: Option<String>,
    /// End time; one hour after the start when omitted
    #[arg(long)]
    pub end: Option<String>,
    #[arg(short, long)]
    pub description: Option<String>,
    /// Repeat weekly on these days (e.g. 'mon,wed,fri' or '1,3,5')
    #[arg(long)]
    pub repeat: Option<String>,
    /// Last date of a repeating event
    #[arg(long, requires = "repeat")]
    pub until: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct EditEventCommand {
    pub id: Uuid,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub date: Option<String>,
    #[arg(long)]
    pub start: Option<String>,
    #[arg(long)]
    pub end: Option<String>,
    #[arg(short, long)]
    pub description: Option<String>,
    #[arg(long, conflicts_with = "description")]
    pub description_clear: bool,
    /// Replace the repeat days of a recurring event
    #[arg(long)]
    pub repeat: Option<String>,
    #[arg(long)]
    pub until: Option<String>,
    /// Which occurrences to change (single|future|all)
    #[arg(long)]
    pub scope: Option<EditScope>,
    /// Use 'single' for recurring events instead of prompting
    #[arg(long, conflicts_with = "scope")]
    pub no_prompt: bool,
}

#[derive(Args, Debug, Clone)]
pub struct DeleteEventCommand {
    pub id: Uuid,
    /// Which occurrences to delete (single|future|all)
    #[arg(long)]
    pub scope: Option<EditScope>,
    /// Use 'single' for recurring events instead of prompting
    #[arg(long, conflicts_with = "scope")]
    pub no_prompt: bool,
    /// Skip the confirmation
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Args, Debug, Clone)]
pub struct OccurrencesCommand {
    pub id: Uuid,
    #[arg(long, short, default_value_t = 10)]
    pub count: usize,
}

// ---------------------------------------------------------------- projects

#[derive(Args, Debug, Clone)]
pub struct ProjectCommand {
    #[command(subcommand)]
    pub command: ProjectSubcommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ProjectSubcommand {
    /// List projects
    List,
    /// Create a project
    Add(AddProjectCommand),
    /// Show a project's board
    Show(ShowProjectCommand),
    /// Rename a project or change its objective
    Edit(EditProjectCommand),
    /// Delete every completed task on a board
    ClearCompleted(ClearCompletedCommand),
    /// Add a note to a project
    Note(NoteCommand),
}

#[derive(Args, Debug, Clone)]
pub struct AddProjectCommand {
    pub name: String,
    #[arg(long)]
    pub objective: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct ShowProjectCommand {
    /// Project slug or id
    pub project: String,
}

#[derive(Args, Debug, Clone)]
pub struct EditProjectCommand {
    /// Project slug or id
    pub project: String,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub objective: Option<String>,
    #[arg(long, conflicts_with = "objective")]
    pub objective_clear: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ClearCompletedCommand {
    /// Project slug or id
    pub project: String,
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Args, Debug, Clone)]
pub struct NoteCommand {
    /// Project slug or id
    pub project: String,
    pub content: String,
}

// ---------------------------------------------------------------- tasks

#[derive(Args, Debug, Clone)]
pub struct TaskCommand {
    #[command(subcommand)]
    pub command: TaskSubcommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum TaskSubcommand {
    /// Add a task to the bottom of a lane
    Add(AddTaskCommand),
    /// Move a task to another lane
    Move(MoveTaskCommand),
    /// Change a task's position within its lane
    Reorder(ReorderTaskCommand),
    /// Edit a task's title or description
    Edit(EditTaskCommand),
    /// Delete a task
    Delete(DeleteTaskCommand),
}

#[derive(Args, Debug, Clone)]
pub struct AddTaskCommand {
    /// Project slug or id
    pub project: String,
    pub title: String,
    /// Lane (backlog|in_progress|completed)
    #[arg(long, default_value = "backlog")]
    pub status: TaskStatus,
    #[arg(short, long)]
    pub description: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct MoveTaskCommand {
    /// Project slug or id
    pub project: String,
    /// Task title or id prefix
    pub task: String,
    /// Destination lane (backlog|in_progress|completed)
    pub status: TaskStatus,
}

#[derive(Args, Debug, Clone)]
pub struct ReorderTaskCommand {
    /// Project slug or id
    pub project: String,
    /// Task title or id prefix
    pub task: String,
    /// New 1-based position in the lane
    #[arg(value_parser = clap::value_parser!(u32).range(1..))]
    pub position: u32,
}

#[derive(Args, Debug, Clone)]
pub struct EditTaskCommand {
    /// Project slug or id
    pub project: String,
    /// Task title or id prefix
    pub task: String,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(short, long)]
    pub description: Option<String>,
    #[arg(long, conflicts_with = "description")]
    pub description_clear: bool,
}

#[derive(Args, Debug, Clone)]
pub struct DeleteTaskCommand {
    /// Project slug or id
    pub project: String,
    /// Task title or id prefix
    pub task: String,
    #[arg(short, long)]
    pub force: bool,
}

// ---------------------------------------------------------------- captures

#[derive(Args, Debug, Clone)]
pub struct CaptureCommand {
    #[command(subcommand)]
    pub command: CaptureSubcommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum CaptureSubcommand {
    /// Capture a thought to the inbox
    Add(AddCaptureCommand),
    /// Show the inbox
    List(ListCapturesCommand),
    /// Mark a capture as processed
    Done(CaptureRefCommand),
    /// Delete a capture
    Delete(CaptureRefCommand),
    /// Number of unprocessed captures
    Count,
}

#[derive(Args, Debug, Clone)]
pub struct AddCaptureCommand {
    /// Prompted for when omitted
    pub text: Option<String>,
    /// Overrides the configured capture source
    #[arg(long)]
    pub source: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct ListCapturesCommand {
    /// Include processed captures
    #[arg(long)]
    pub all: bool,
}

#[derive(Args, Debug, Clone)]
pub struct CaptureRefCommand {
    /// Capture id prefix
    pub id: String,
}

// ---------------------------------------------------------------- journal

#[derive(Args, Debug, Clone)]
pub struct JournalCommand {
    #[command(subcommand)]
    pub command: JournalSubcommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum JournalSubcommand {
    /// Streaks and this week's progress
    Status,
    /// List entries
    List(ListEntriesCommand),
    /// Write or update the entry of a given type and day
    Write(WriteEntryCommand),
    /// Show the entry of a given type and day
    Show(EntryRefCommand),
    /// Delete the entry of a given type and day
    Delete(DeleteEntryCommand),
}

#[derive(Args, Debug, Clone)]
pub struct ListEntriesCommand {
    #[arg(long)]
    pub from: Option<String>,
    #[arg(long)]
    pub to: Option<String>,
    /// morning_pages|daily_reflection|weekly_review
    #[arg(long = "type")]
    pub entry_type: Option<EntryType>,
}

#[derive(Args, Debug, Clone)]
pub struct WriteEntryCommand {
    /// morning_pages|daily_reflection|weekly_review
    pub entry_type: EntryType,
    /// Defaults to today
    #[arg(long)]
    pub date: Option<String>,
    /// Set one prompt without asking, as key=value; repeatable
    #[arg(long = "field", value_name = "KEY=VALUE")]
    pub fields: Vec<String>,
}

#[derive(Args, Debug, Clone)]
pub struct EntryRefCommand {
    /// morning_pages|daily_reflection|weekly_review
    pub entry_type: EntryType,
    /// Defaults to today
    #[arg(long)]
    pub date: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct DeleteEntryCommand {
    #[command(flatten)]
    pub entry: EntryRefCommand,
    #[arg(short, long)]
    pub force: bool,
}

// ---------------------------------------------------------------- fitness

#[derive(Args, Debug, Clone)]
pub struct FitnessCommand {
    #[command(subcommand)]
    pub command: FitnessSubcommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum FitnessSubcommand {
    /// Active program, next day and this week's workouts
    Summary,
    /// Exercise library
    Exercises(ExercisesCommand),
    /// Workout programs
    Programs,
    /// One program, day by day
    Program(ProgramCommand),
    /// Start a workout session
    Start(StartSessionCommand),
    /// Show the active session
    Status,
    /// Log a set in the active session
    Log(LogSetCommand),
    /// Complete the active session
    Finish(FinishSessionCommand),
    /// Cancel the active session
    Cancel(CancelSessionCommand),
    /// Past sessions
    History(HistoryCommand),
    /// Live elapsed-time display for the active session
    Timer(TimerCommand),
}

#[derive(Args, Debug, Clone)]
pub struct ExercisesCommand {
    #[arg(long)]
    pub muscle_group: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct ProgramCommand {
    pub id: Uuid,
}

#[derive(Args, Debug, Clone)]
pub struct StartSessionCommand {
    #[arg(long)]
    pub program: Option<Uuid>,
    /// Program day, e.g. 'Push'
    #[arg(long, requires = "program")]
    pub day: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct LogSetCommand {
    /// Exercise name or id prefix
    pub exercise: String,
    #[arg(long)]
    pub reps: u32,
    #[arg(long)]
    pub weight: Option<f64>,
    /// Defaults to the next set for this exercise
    #[arg(long)]
    pub set: Option<u32>,
}

#[derive(Args, Debug, Clone)]
pub struct FinishSessionCommand {
    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct CancelSessionCommand {
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Args, Debug, Clone)]
pub struct HistoryCommand {
    #[arg(long, default_value_t = 1)]
    pub page: u32,
    #[arg(long, default_value_t = 20)]
    pub per_page: u32,
}

#[derive(Args, Debug, Clone)]
pub struct TimerCommand {
    /// Stop after this many seconds instead of waiting for Ctrl-C
    #[arg(long = "for", value_name = "SECONDS")]
    pub duration: Option<u64>,
}
