use anyhow::Result;
use chrono::{Datelike, Duration, NaiveDate};
use lifeos_core::api::{CalendarApi, HttpBackend};
use lifeos_core::calendar::recurrence::{days_from_pattern, parse_days};
use lifeos_core::calendar::{CalendarView, EventEditor, EventForm, WeekRange, WeekStart, WeeklyRule};
use lifeos_core::models::CalendarEvent;
use lifeos_core::timefmt::format_time_range;
use owo_colors::{OwoColorize, Style};
use uuid::Uuid;

use crate::cli::{
    AddEventCommand, CalendarCommand, CalendarSubcommand, DeleteEventCommand, EditEventCommand,
    OccurrencesCommand, WeekCommand,
};
use crate::parser::{parse_date, parse_time, today};
use crate::util::{choose_scope, confirm};
use crate::views::table::display_week;

/// Recurring events without an end date repeat for a year.
const DEFAULT_SERIES_DAYS: i64 = 365;

pub async fn calendar_command(
    backend: HttpBackend,
    command: CalendarCommand,
    week_start: WeekStart,
) -> Result<()> {
    match command.command {
        CalendarSubcommand::Week(command) => show_week(backend, command, week_start).await,
        CalendarSubcommand::Add(command) => add_event(backend, command, week_start).await,
        CalendarSubcommand::Edit(command) => edit_event(backend, command, week_start).await,
        CalendarSubcommand::Delete(command) => delete_event(backend, command, week_start).await,
        CalendarSubcommand::Occurrences(command) => show_occurrences(&backend, command).await,
    }
}

async fn show_week(backend: HttpBackend, command: WeekCommand, week_start: WeekStart) -> Result<()> {
    let mut view = CalendarView::new(backend, week_start);
    if let Some(date) = &command.date {
        view.show_date(parse_date(date)?);
    }
    view.shift_weeks(command.offset)?;

    view.load().await?;
    display_week(view.week(), &view.events_by_date());
    Ok(())
}

/// Copy the optional time/description flags onto a form. A start without an
/// end keeps the previous duration.
fn apply_times(
    form: &mut EventForm,
    start: Option<&str>,
    end: Option<&str>,
    description: Option<String>,
) -> Result<()> {
    if let Some(start) = start {
        let start = parse_time(start)?;
        if end.is_none() {
            let length = match (form.start_time, form.end_time) {
                (Some(s), Some(e)) if e > s => e - s,
                _ => Duration::hours(1),
            };
            form.end_time = Some(start + length);
        }
        form.start_time = Some(start);
    }
    if let Some(end) = end {
        form.end_time = Some(parse_time(end)?);
    }
    if let Some(description) = description {
        form.description = description;
    }
    Ok(())
}

async fn add_event(backend: HttpBackend, command: AddEventCommand, week_start: WeekStart) -> Result<()> {
    let date = match &command.date {
        Some(date) => parse_date(date)?,
        None => today(),
    };

    let mut editor = EventEditor::open_new(Some(date));
    let form = editor.form_mut();
    form.title = command.title;
    apply_times(
        form,
        command.start.as_deref(),
        command.end.as_deref(),
        command.description,
    )?;
    if let Some(days) = &command.repeat {
        form.is_recurring = true;
        form.recurrence_days = parse_days(days)?;
        form.recurrence_end_date = command.until.as_deref().map(parse_date).transpose()?;
    }

    let mut view = CalendarView::at(backend, WeekRange::containing(date, week_start), week_start);
    let event = editor.submit(&mut view).await?;

    println!(
        "{} Added {}{} on {} at {}",
        "✓".style(Style::new().green().bold()),
        event.title.bold(),
        if event.is_recurring { " (weekly)" } else { "" },
        event.event_date.format("%a %b %-d"),
        format_time_range(event.start_time, event.end_time)
    );
    display_week(view.week(), &view.events_by_date());
    Ok(())
}

async fn edit_event(backend: HttpBackend, command: EditEventCommand, week_start: WeekStart) -> Result<()> {
    let event = backend.get_event(command.id).await?;
    let week = WeekRange::containing(event.event_date, week_start);
    let mut view = CalendarView::at(backend, week, week_start);

    let mut editor = EventEditor::open_edit(event);
    let description = if command.description_clear {
        Some(String::new())
    } else {
        command.description
    };
    let form = editor.form_mut();
    if let Some(title) = command.title {
        form.title = title;
    }
    if let Some(date) = &command.date {
        form.event_date = Some(parse_date(date)?);
    }
    apply_times(form, command.start.as_deref(), command.end.as_deref(), description)?;
    if form.is_recurring {
        if let Some(days) = &command.repeat {
            form.recurrence_days = parse_days(days)?;
        }
        if let Some(until) = &command.until {
            form.recurrence_end_date = Some(parse_date(until)?);
        }
    }

    if editor.shows_scope_selector() {
        let scope = choose_scope(command.scope, command.no_prompt, "Apply changes to")?;
        editor.set_scope(scope);
    }
    let scope = editor.scope();
    let event = editor.submit(&mut view).await?;

    println!(
        "{} Updated {} ({})",
        "✓".style(Style::new().green().bold()),
        event.title.bold(),
        scope.label().to_lowercase()
    );
    Ok(())
}

async fn delete_event(
    backend: HttpBackend,
    command: DeleteEventCommand,
    week_start: WeekStart,
) -> Result<()> {
    let event = backend.get_event(command.id).await?;
    if !confirm(&format!("Delete event '{}'?", event.title), command.force)? {
        return Ok(());
    }

    let week = WeekRange::containing(event.event_date, week_start);
    let mut view = CalendarView::at(backend, week, week_start);
    let mut editor = EventEditor::open_edit(event);
    if editor.shows_scope_selector() {
        let scope = choose_scope(command.scope, command.no_prompt, "Delete")?;
        editor.set_scope(scope);
    }
    let scope = editor.scope();
    editor.delete(&mut view).await?;

    println!("Deleted ({}).", scope.label().to_lowercase());
    Ok(())
}

async fn show_occurrences(backend: &HttpBackend, command: OccurrencesCommand) -> Result<()> {
    let event = backend.get_event(command.id).await?;
    if !event.is_recurring {
        println!("'{}' does not repeat.", event.title);
        return Ok(());
    }

    let from = today().max(event.event_date);
    let until = event
        .recurrence_end_date
        .unwrap_or(event.event_date + Duration::days(DEFAULT_SERIES_DAYS))
        .max(event.event_date);

    let (dates, truncated) = match event.series_id {
        // the backend already materialized the series; read it back
        Some(series_id) if from <= until => {
            let events = backend.list_events(from, until).await?;
            println!("{} {}", event.title.bold(), "(series)".dimmed());
            (series_dates(&events, series_id), false)
        }
        Some(_) => {
            println!("{} {}", event.title.bold(), "(series)".dimmed());
            (Vec::new(), false)
        }
        None => {
            let days = days_from_pattern(event.recurrence_pattern.as_deref())
                .unwrap_or_else(|| vec![event.event_date.weekday()]);
            let rule = WeeklyRule::new(days, event.event_date, until)?;
            let occurrences = rule.occurrences()?;
            println!("{} {}", event.title.bold(), rule.to_rrule().replace('\n', " ").dimmed());
            (occurrences.dates, occurrences.truncated)
        }
    };

    let upcoming: Vec<_> = dates
        .into_iter()
        .filter(|date| *date >= from)
        .take(command.count)
        .collect();

    if upcoming.is_empty() {
        println!("No upcoming occurrences.");
    }
    for date in &upcoming {
        println!(
            "  {}  {}",
            date.format("%a %Y-%m-%d"),
            format_time_range(event.start_time, event.end_time)
        );
    }
    if truncated && upcoming.len() < command.count {
        println!("{}", "The series is too long to expand completely.".yellow());
    }
    Ok(())
}

/// Sorted, distinct dates of the events belonging to `series_id`.
fn series_dates(events: &[CalendarEvent], series_id: Uuid) -> Vec<NaiveDate> {
    let mut dates: Vec<NaiveDate> = events
        .iter()
        .filter(|event| event.series_id == Some(series_id))
        .map(|event| event.event_date)
        .collect();
    dates.sort_unstable();
    dates.dedup();
    dates
}
