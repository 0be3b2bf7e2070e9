use anyhow::Result;
use lifeos_core::api::{HttpBackend, ProjectApi};
use lifeos_core::kanban::KanbanController;
use lifeos_core::models::{NewProjectData, UpdateProjectData};
use owo_colors::{OwoColorize, Style};

use crate::cli::{ProjectCommand, ProjectSubcommand};
use crate::util::{confirm, find_project};
use crate::views::table::{display_board, display_projects};

pub async fn project_command(backend: HttpBackend, command: ProjectCommand) -> Result<()> {
    let success = Style::new().green().bold();

    match command.command {
        ProjectSubcommand::List => {
            let projects = backend.list_projects().await?;
            display_projects(&projects);
        }
        ProjectSubcommand::Add(command) => {
            let project = backend
                .create_project(NewProjectData::named(command.name, command.objective))
                .await?;
            println!(
                "{} Created project {} ({})",
                "✓".style(success),
                project.name.bold(),
                project.slug.yellow()
            );
        }
        ProjectSubcommand::Show(command) => {
            let detail = find_project(&backend, &command.project).await?;
            display_board(&detail);
        }
        ProjectSubcommand::Edit(command) => {
            let detail = find_project(&backend, &command.project).await?;
            let objective = if command.objective_clear {
                Some(None)
            } else {
                command.objective.map(Some)
            };
            let update = UpdateProjectData {
                name: command.name,
                objective,
            };
            let project = backend.update_project(detail.project.id, update).await?;
            println!("{} Updated project {}", "✓".style(success), project.name.bold());
        }
        ProjectSubcommand::ClearCompleted(command) => {
            let detail = find_project(&backend, &command.project).await?;
            let done = detail.tasks.completed.len();
            if done == 0 {
                println!("No completed tasks on {}.", detail.project.name);
                return Ok(());
            }
            let prompt = format!("Delete {} completed task(s) from '{}'?", done, detail.project.name);
            if !confirm(&prompt, command.force)? {
                return Ok(());
            }

            let mut board = KanbanController::new(backend, detail.project.id);
            let cleared = board.clear_completed().await?;
            println!("{} Cleared {} completed task(s)", "✓".style(success), cleared);
            if let Some(detail) = board.board() {
                display_board(detail);
            }
        }
        ProjectSubcommand::Note(command) => {
            let detail = find_project(&backend, &command.project).await?;
            backend.create_note(detail.project.id, &command.content).await?;
            println!("{} Note added to {}", "✓".style(success), detail.project.name.bold());
        }
    }

    Ok(())
}
