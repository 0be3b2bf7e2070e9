use anyhow::Result;
use dialoguer::Input;
use lifeos_core::api::{CaptureApi, HttpBackend};
use lifeos_core::models::UpdateCapture;
use lifeos_core::stores::CaptureModal;
use owo_colors::{OwoColorize, Style};

use crate::cli::{CaptureCommand, CaptureSubcommand};
use crate::util::resolve;
use crate::views::table::display_captures;

pub async fn capture_command(
    backend: HttpBackend,
    command: CaptureCommand,
    default_source: &str,
) -> Result<()> {
    let success = Style::new().green().bold();

    match command.command {
        CaptureSubcommand::Add(command) => {
            let text = match command.text {
                Some(text) => text,
                None => Input::<String>::new()
                    .with_prompt("Capture")
                    .allow_empty(true)
                    .interact_text()?,
            };
            let source = command.source.as_deref().unwrap_or(default_source);

            let mut modal = CaptureModal::new();
            modal.open();
            modal.set_draft(text);
            let capture = modal.submit(&backend, source).await?;
            println!("{} Captured: {}", "✓".style(success), capture.text);

            let waiting = backend.unprocessed_count().await?;
            println!("  {} unprocessed in inbox", waiting);
        }
        CaptureSubcommand::List(command) => {
            let list = backend.list_captures(command.all).await?;
            display_captures(&list.captures);
            println!("{} unprocessed", list.unprocessed_count);
        }
        CaptureSubcommand::Done(command) => {
            let list = backend.list_captures(false).await?;
            let capture = resolve(&list.captures, &command.id, "Capture", |c| (c.id, c.text.as_str()))?;
            let update = UpdateCapture {
                processed: Some(true),
                ..Default::default()
            };
            backend.update_capture(capture.id, update).await?;
            println!("{} Processed: {}", "✓".style(success), capture.text);
        }
        CaptureSubcommand::Delete(command) => {
            let list = backend.list_captures(true).await?;
            let capture = resolve(&list.captures, &command.id, "Capture", |c| (c.id, c.text.as_str()))?;
            backend.delete_capture(capture.id).await?;
            println!("Deleted: {}", capture.text);
        }
        CaptureSubcommand::Count => {
            println!("{}", backend.unprocessed_count().await?);
        }
    }

    Ok(())
}
