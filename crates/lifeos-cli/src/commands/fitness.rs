use std::io::Write;
use std::time::Duration;

use anyhow::Result;
use chrono::{DateTime, Utc};
use lifeos_core::api::{FitnessApi, HttpBackend};
use lifeos_core::error::CoreError;
use lifeos_core::models::{ActiveSession, LogSetRequest};
use lifeos_core::stores::{format_elapsed, WorkoutTimer};
use owo_colors::{OwoColorize, Style};

use crate::cli::{FitnessCommand, FitnessSubcommand, TimerCommand};
use crate::util::{confirm, resolve};
use crate::views::table::{
    display_exercises, display_history, display_program, display_programs, display_session,
};

pub async fn fitness_command(backend: HttpBackend, command: FitnessCommand) -> Result<()> {
    let success = Style::new().green().bold();

    match command.command {
        FitnessSubcommand::Summary => {
            let summary = backend.fitness_summary().await?;
            println!(
                "Program:    {}",
                summary.active_program_name.as_deref().unwrap_or("none")
            );
            println!(
                "Next day:   {}",
                summary.next_day_label.as_deref().unwrap_or("-")
            );
            println!("This week:  {} workout(s)", summary.workouts_this_week.len().bold());
            if summary.has_active_session {
                println!("{}", "A workout is in progress.".yellow());
            }
        }
        FitnessSubcommand::Exercises(command) => {
            let list = backend.list_exercises(command.muscle_group.as_deref()).await?;
            display_exercises(&list.items);
        }
        FitnessSubcommand::Programs => {
            let list = backend.list_programs().await?;
            display_programs(&list.items);
        }
        FitnessSubcommand::Program(command) => {
            let program = backend.get_program(command.id).await?;
            display_program(&program);
        }
        FitnessSubcommand::Start(command) => {
            let session = backend.start_session(command.program, command.day).await?;
            println!("{} Workout started", "✓".style(success));
            display_session(&session, 0);
        }
        FitnessSubcommand::Status => match backend.active_session().await? {
            Some(session) => display_session(&session, elapsed_since(session.started_at)),
            None => println!("No active workout."),
        },
        FitnessSubcommand::Log(command) => {
            let session = require_active(&backend).await?;
            let exercise = resolve(&session.exercises, &command.exercise, "Exercise", |e| {
                (e.exercise_id, e.exercise_name.as_str())
            })?;
            let set_number = command
                .set
                .unwrap_or_else(|| session.next_set_number(exercise.exercise_id));
            let log = backend
                .log_set(
                    session.id,
                    LogSetRequest {
                        exercise_id: exercise.exercise_id,
                        set_number,
                        reps: command.reps,
                        weight_kg: command.weight,
                    },
                )
                .await?;
            let weight = log.weight_kg.map(|kg| format!(" @ {}kg", kg)).unwrap_or_default();
            println!(
                "{} {} set {}: {} reps{}",
                "✓".style(success),
                exercise.exercise_name.bold(),
                log.set_number,
                log.reps,
                weight
            );
        }
        FitnessSubcommand::Finish(command) => {
            let session = require_active(&backend).await?;
            let done = backend.complete_session(session.id, command.notes).await?;
            println!(
                "{} Workout complete in {}",
                "✓".style(success),
                format_elapsed(done.duration_seconds).bold()
            );
            for exercise in &done.summary {
                let reps: Vec<String> = exercise.reps_per_set.iter().map(u32::to_string).collect();
                println!(
                    "  {}: {} set(s) ({})",
                    exercise.exercise_name,
                    exercise.sets_completed,
                    reps.join(", ")
                );
            }
        }
        FitnessSubcommand::Cancel(command) => {
            let session = require_active(&backend).await?;
            if !confirm("Cancel the active workout? Logged sets are kept.", command.force)? {
                return Ok(());
            }
            let cancelled = backend.cancel_session(session.id).await?;
            println!("{}", cancelled.message);
        }
        FitnessSubcommand::History(command) => {
            let page = backend.history(command.page, command.per_page).await?;
            display_history(&page);
        }
        FitnessSubcommand::Timer(command) => run_timer(&backend, command).await?,
    }

    Ok(())
}

async fn require_active(backend: &HttpBackend) -> Result<ActiveSession> {
    let session = backend
        .active_session()
        .await?
        .ok_or_else(|| CoreError::NotFound("No active workout session".to_string()))?;
    Ok(session)
}

fn elapsed_since(started_at: DateTime<Utc>) -> u64 {
    u64::try_from((Utc::now() - started_at).num_seconds()).unwrap_or(0)
}

/// Redraw the session clock once a second until Ctrl-C or `--for` runs out.
async fn run_timer(backend: &HttpBackend, command: TimerCommand) -> Result<()> {
    let session = require_active(backend).await?;
    let timer = WorkoutTimer::new();
    timer.resume(session.id, elapsed_since(session.started_at));

    let deadline = async {
        match command.duration {
            Some(seconds) => tokio::time::sleep(Duration::from_secs(seconds)).await,
            None => std::future::pending::<()>().await,
        }
    };
    tokio::pin!(deadline);
    let mut redraw = tokio::time::interval(Duration::from_secs(1));

    loop {
        tokio::select! {
            _ = &mut deadline => break,
            result = tokio::signal::ctrl_c() => {
                result?;
                break;
            }
            _ = redraw.tick() => {
                print!("\r{}  {}", "⏱".cyan(), format_elapsed(timer.elapsed_seconds()).bold());
                std::io::stdout().flush()?;
            }
        }
    }

    timer.stop();
    println!("\r{}  {}", "⏱".cyan(), format_elapsed(timer.elapsed_seconds()));
    Ok(())
}
