use std::collections::BTreeMap;

use chrono::NaiveDate;
use chrono_humanize::Humanize;
use comfy_table::{Attribute, Cell, Color, Row, Table};
use lifeos_core::calendar::WeekRange;
use lifeos_core::models::{
    ActiveSession, CalendarEvent, Capture, Exercise, HistoryPage, JournalEntry, ProgramDetail,
    ProgramListItem, ProjectDetail, Task, TaskStatus,
};
use lifeos_core::stores::format_elapsed;
use lifeos_core::timefmt::format_time_range;

use crate::util::short_id;

pub fn display_week(week: WeekRange, events: &BTreeMap<NaiveDate, Vec<CalendarEvent>>) {
    println!("Week of {}", week.label());

    let mut table = Table::new();
    table.set_header(vec!["Day", "Time", "Event", "ID"]);

    for day in week.days() {
        let day_label = day.format("%a %-d").to_string();
        let Some(day_events) = events.get(&day).filter(|e| !e.is_empty()) else {
            table.add_row(vec![
                Cell::new(day_label),
                Cell::new(""),
                Cell::new("-").fg(Color::DarkGrey),
                Cell::new(""),
            ]);
            continue;
        };
        for (index, event) in day_events.iter().enumerate() {
            let mut row = Row::new();
            row.add_cell(Cell::new(if index == 0 { day_label.as_str() } else { "" }));
            row.add_cell(Cell::new(format_time_range(event.start_time, event.end_time)));

            let mut title = String::new();
            if event.is_recurring {
                title.push_str("↻ ");
            }
            title.push_str(&event.title);
            row.add_cell(Cell::new(title).add_attribute(Attribute::Bold));
            row.add_cell(Cell::new(event.id.to_string()).fg(Color::DarkGrey));
            table.add_row(row);
        }
    }

    println!("{table}");
}

/// Lanes side by side; row `n` holds the `n`-th task of every lane.
pub fn board_rows(detail: &ProjectDetail) -> Vec<[Option<&Task>; 3]> {
    let depth = TaskStatus::LANES
        .iter()
        .map(|status| detail.tasks.lane(*status).len())
        .max()
        .unwrap_or(0);
    (0..depth)
        .map(|index| TaskStatus::LANES.map(|status| detail.tasks.lane(status).get(index)))
        .collect()
}

pub fn display_board(detail: &ProjectDetail) {
    let project = &detail.project;
    println!("{} ({})", project.name, project.slug);
    if let Some(objective) = &project.objective {
        println!("{}", objective);
    }

    let mut table = Table::new();
    table.set_header(
        TaskStatus::LANES
            .iter()
            .map(|status| format!("{} ({})", status.title(), detail.tasks.lane(*status).len()))
            .collect::<Vec<_>>(),
    );

    for lanes in board_rows(detail) {
        let mut row = Row::new();
        for task in lanes {
            let cell = match task {
                Some(task) => {
                    let cell = Cell::new(format!("{} {}", short_id(task.id), task.title));
                    match task.status {
                        TaskStatus::Completed => cell
                            .add_attribute(Attribute::CrossedOut)
                            .fg(Color::DarkGrey),
                        TaskStatus::InProgress => cell.fg(Color::Yellow),
                        TaskStatus::Backlog => cell,
                    }
                }
                None => Cell::new(""),
            };
            row.add_cell(cell);
        }
        table.add_row(row);
    }

    println!("{table}");

    if !detail.notes.is_empty() {
        println!("Notes:");
        for note in &detail.notes {
            println!("  - {} ({})", note.content, note.created_at.humanize());
        }
    }
}

pub fn display_projects(projects: &[ProjectDetail]) {
    if projects.is_empty() {
        println!("No projects found.");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec!["Name", "Slug", "Objective", "Open", "Done", "Updated"]);

    for detail in projects {
        let project = &detail.project;
        let done = detail.tasks.completed.len();
        table.add_row(vec![
            Cell::new(&project.name).add_attribute(Attribute::Bold),
            Cell::new(&project.slug),
            Cell::new(project.objective.as_deref().unwrap_or("None")),
            Cell::new(detail.tasks.total() - done),
            Cell::new(done).fg(Color::Green),
            Cell::new(project.updated_at.humanize()),
        ]);
    }

    println!("{table}");
}

pub fn display_captures(captures: &[Capture]) {
    if captures.is_empty() {
        println!("Inbox is empty.");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "Capture", "Source", "Captured"]);

    for capture in captures {
        let mut text = Cell::new(&capture.text);
        if capture.processed {
            text = text.add_attribute(Attribute::CrossedOut).fg(Color::DarkGrey);
        }
        table.add_row(vec![
            Cell::new(short_id(capture.id)),
            text,
            Cell::new(capture.source.as_deref().unwrap_or("-")),
            Cell::new(capture.created_at.humanize()),
        ]);
    }

    println!("{table}");
}

pub fn display_entries(entries: &[JournalEntry]) {
    if entries.is_empty() {
        println!("No journal entries found.");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec!["Date", "Type", "Preview"]);

    for entry in entries {
        let (first_key, _) = entry.entry_type.prompts()[0];
        let preview: String = entry.field(first_key).chars().take(60).collect();
        table.add_row(vec![
            Cell::new(entry.entry_date),
            Cell::new(entry.entry_type),
            Cell::new(preview),
        ]);
    }

    println!("{table}");
}

pub fn display_exercises(exercises: &[Exercise]) {
    if exercises.is_empty() {
        println!("No exercises found.");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "Exercise", "Muscle group"]);
    for exercise in exercises {
        table.add_row(vec![
            Cell::new(short_id(exercise.id)),
            Cell::new(&exercise.name),
            Cell::new(exercise.muscle_group.as_deref().unwrap_or("-")),
        ]);
    }
    println!("{table}");
}

pub fn display_programs(programs: &[ProgramListItem]) {
    if programs.is_empty() {
        println!("No programs found.");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "Program", "Days", "Exercises", ""]);
    for program in programs {
        let mut name = Cell::new(&program.name);
        if program.is_active {
            name = name.fg(Color::Green).add_attribute(Attribute::Bold);
        }
        table.add_row(vec![
            Cell::new(program.id),
            name,
            Cell::new(program.day_labels.join(", ")),
            Cell::new(program.exercise_count),
            Cell::new(if program.is_active { "active" } else { "" }),
        ]);
    }
    println!("{table}");
}

pub fn display_program(program: &ProgramDetail) {
    println!("{}", program.name);
    if let Some(description) = &program.description {
        println!("{}", description);
    }
    for (day, entries) in &program.days {
        let mut table = Table::new();
        table.set_header(vec![day.as_str(), "Sets", "Reps", "Rest"]);
        for entry in entries {
            table.add_row(vec![
                Cell::new(&entry.exercise.name),
                Cell::new(entry.target_sets),
                Cell::new(format!("{}-{}", entry.target_reps_min, entry.target_reps_max)),
                Cell::new(format!("{}s", entry.rest_seconds)),
            ]);
        }
        println!("{table}");
    }
}

pub fn display_session(session: &ActiveSession, elapsed_seconds: u64) {
    println!(
        "{} {} - {}",
        session.program_name.as_deref().unwrap_or("Free workout"),
        session.day_label.as_deref().unwrap_or(""),
        format_elapsed(elapsed_seconds)
    );

    let mut table = Table::new();
    table.set_header(vec!["Exercise", "Target", "Logged"]);
    for exercise in &session.exercises {
        let logged: Vec<String> = session
            .logs
            .iter()
            .filter(|log| log.exercise_id == exercise.exercise_id)
            .map(|log| match log.weight_kg {
                Some(kg) => format!("{}x{}kg", log.reps, kg),
                None => log.reps.to_string(),
            })
            .collect();
        let done = logged.len() as u32 >= exercise.target_sets;
        let mut name = Cell::new(&exercise.exercise_name);
        if done {
            name = name.fg(Color::Green);
        }
        table.add_row(vec![
            name,
            Cell::new(format!(
                "{} x {}-{}",
                exercise.target_sets, exercise.target_reps_min, exercise.target_reps_max
            )),
            Cell::new(logged.join(", ")),
        ]);
    }
    println!("{table}");
}

pub fn display_history(page: &HistoryPage) {
    if page.items.is_empty() {
        println!("No workouts yet.");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec!["Started", "Program", "Day", "Duration", "Exercises", "Status"]);
    for item in &page.items {
        let status = match item.status.as_str() {
            "completed" => Cell::new(&item.status).fg(Color::Green),
            "cancelled" => Cell::new(&item.status).fg(Color::DarkGrey),
            _ => Cell::new(&item.status).fg(Color::Yellow),
        };
        table.add_row(vec![
            Cell::new(item.started_at.format("%Y-%m-%d %H:%M")),
            Cell::new(item.program_name.as_deref().unwrap_or("-")),
            Cell::new(item.day_label.as_deref().unwrap_or("-")),
            Cell::new(item.duration_seconds.map(format_elapsed).unwrap_or_default()),
            Cell::new(item.exercise_count),
            status,
        ]);
    }
    println!("{table}");
    println!("Page {} ({} workouts)", page.page, page.total);
}
