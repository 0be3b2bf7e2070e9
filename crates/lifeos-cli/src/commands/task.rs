use anyhow::{Context, Result};
use lifeos_core::api::HttpBackend;
use lifeos_core::kanban::{DragOutcome, KanbanController};
use lifeos_core::models::UpdateTaskData;
use owo_colors::{OwoColorize, Style};

use crate::cli::{TaskCommand, TaskSubcommand};
use crate::util::{confirm, find_project, resolve_task};
use crate::views::table::display_board;

pub async fn task_command(backend: HttpBackend, command: TaskCommand) -> Result<()> {
    let project = match &command.command {
        TaskSubcommand::Add(c) => &c.project,
        TaskSubcommand::Move(c) => &c.project,
        TaskSubcommand::Reorder(c) => &c.project,
        TaskSubcommand::Edit(c) => &c.project,
        TaskSubcommand::Delete(c) => &c.project,
    };
    let project_id = find_project(&backend, project).await?.project.id;

    let mut board = KanbanController::new(backend, project_id);
    board.load().await?;
    let success = Style::new().green().bold();

    match command.command {
        TaskSubcommand::Add(command) => {
            let task = board
                .add_task(command.status, &command.title, command.description)
                .await?;
            println!(
                "{} Added {} to {}",
                "✓".style(success),
                task.title.bold(),
                task.status.title()
            );
        }
        TaskSubcommand::Move(command) => {
            let task_id = current(&board, &command.task)?;
            let outcome = board.move_task(task_id, command.status).await?;
            report(&board, outcome)?;
        }
        TaskSubcommand::Reorder(command) => {
            let task_id = current(&board, &command.task)?;
            let index = usize::try_from(command.position.saturating_sub(1))?;
            let outcome = board.reorder_task(task_id, index).await?;
            report(&board, outcome)?;
        }
        TaskSubcommand::Edit(command) => {
            let task_id = current(&board, &command.task)?;
            let description = if command.description_clear {
                Some(None)
            } else {
                command.description.map(Some)
            };
            let update = UpdateTaskData {
                title: command.title,
                description,
                ..Default::default()
            };
            let task = board.edit_task(task_id, update).await?;
            println!("{} Updated {}", "✓".style(success), task.title.bold());
        }
        TaskSubcommand::Delete(command) => {
            let (task_id, title) = {
                let detail = board.board().context("Board is not loaded")?;
                let task = resolve_task(detail, &command.task)?;
                (task.id, task.title.clone())
            };
            if !confirm(&format!("Delete task '{}'?", title), command.force)? {
                return Ok(());
            }
            board.delete_task(task_id).await?;
            println!("{} Deleted {}", "✓".style(success), title.bold());
        }
    }

    Ok(())
}

fn current(board: &KanbanController<HttpBackend>, reference: &str) -> Result<uuid::Uuid> {
    let detail = board.board().context("Board is not loaded")?;
    Ok(resolve_task(detail, reference)?.id)
}

/// Print the board after a drop; a rolled-back drop is an error once the
/// restored board has been shown.
fn report(board: &KanbanController<HttpBackend>, outcome: DragOutcome) -> Result<()> {
    let success = Style::new().green().bold();
    match outcome {
        DragOutcome::Moved(task) => println!(
            "{} Moved {} to {}",
            "✓".style(success),
            task.title.bold(),
            task.status.title()
        ),
        DragOutcome::Reordered(_) => println!("{} Reordered lane", "✓".style(success)),
        DragOutcome::NoOp => println!("Nothing to change."),
        DragOutcome::RolledBack(err) => {
            if let Some(detail) = board.board() {
                display_board(detail);
            }
            return Err(anyhow::Error::new(err).context("The board was restored"));
        }
    }
    if let Some(detail) = board.board() {
        display_board(detail);
    }
    Ok(())
}
