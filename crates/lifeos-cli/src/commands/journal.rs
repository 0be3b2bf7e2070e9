use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use dialoguer::Input;
use lifeos_core::api::{HttpBackend, JournalApi};
use lifeos_core::error::CoreError;
use lifeos_core::models::{EntryType, JournalQuery, NewJournalEntry};
use owo_colors::{OwoColorize, Style};
use serde_json::{Map, Value};

use crate::cli::{JournalCommand, JournalSubcommand, WriteEntryCommand};
use crate::parser::{parse_date, today};
use crate::util::confirm;
use crate::views::table::display_entries;

pub async fn journal_command(backend: HttpBackend, command: JournalCommand) -> Result<()> {
    match command.command {
        JournalSubcommand::Status => {
            let status = backend.journal_status().await?;
            println!("Morning pages streak:    {} day(s)", status.morning_pages_streak.bold());
            println!("Daily reflection streak: {} day(s)", status.daily_reflection_streak.bold());
            println!("Entries this week:       {}", status.entries_this_week);
            let review = if status.weekly_review_completed {
                "done".green().to_string()
            } else {
                "pending".yellow().to_string()
            };
            println!("Weekly review:           {}", review);
        }
        JournalSubcommand::List(command) => {
            let query = JournalQuery {
                start_date: command.from.as_deref().map(parse_date).transpose()?,
                end_date: command.to.as_deref().map(parse_date).transpose()?,
                entry_type: command.entry_type,
            };
            let entries = backend.list_entries(&query).await?;
            display_entries(&entries);
        }
        JournalSubcommand::Write(command) => write_entry(&backend, command).await?,
        JournalSubcommand::Show(command) => {
            let date = entry_date(command.date.as_deref())?;
            match backend.find_entry(command.entry_type, date).await? {
                Some(entry) => {
                    println!("{} {}", entry.entry_type.bold(), entry.entry_date);
                    for (key, prompt) in entry.entry_type.prompts() {
                        println!("\n{}", prompt.cyan());
                        println!("{}", entry.field(key));
                    }
                }
                None => println!("No {} entry for {}.", command.entry_type, date),
            }
        }
        JournalSubcommand::Delete(command) => {
            let entry_type = command.entry.entry_type;
            let date = entry_date(command.entry.date.as_deref())?;
            let entry = backend.find_entry(entry_type, date).await?.ok_or_else(|| {
                CoreError::NotFound(format!("No {} entry for {}", entry_type, date))
            })?;
            if !confirm(&format!("Delete {} for {}?", entry_type, date), command.force)? {
                return Ok(());
            }
            backend.delete_entry(entry.id).await?;
            println!("Deleted {} for {}.", entry_type, date);
        }
    }

    Ok(())
}

fn entry_date(input: Option<&str>) -> Result<NaiveDate> {
    input.map(parse_date).transpose().map(|d| d.unwrap_or_else(today))
}

/// Turn `key=value` flags into entry content, rejecting keys the entry type
/// has no prompt for.
fn parse_fields(entry_type: EntryType, fields: &[String]) -> Result<Map<String, Value>> {
    let mut content = Map::new();
    for field in fields {
        let (key, value) = field
            .split_once('=')
            .ok_or_else(|| anyhow!("Invalid field '{}': expected KEY=VALUE", field))?;
        let key = key.trim();
        if !entry_type.prompts().iter().any(|(k, _)| *k == key) {
            let known: Vec<&str> = entry_type.prompts().iter().map(|(k, _)| *k).collect();
            return Err(anyhow!(CoreError::InvalidInput(format!(
                "Unknown field '{}' for {}; expected one of: {}",
                key,
                entry_type,
                known.join(", ")
            ))));
        }
        content.insert(key.to_string(), Value::String(value.trim().to_string()));
    }
    Ok(content)
}

async fn write_entry(backend: &HttpBackend, command: WriteEntryCommand) -> Result<()> {
    let entry_type = command.entry_type;
    let date = entry_date(command.date.as_deref())?;
    let existing = backend.find_entry(entry_type, date).await?;

    let mut content = existing
        .as_ref()
        .map(|entry| entry.content.clone())
        .unwrap_or_default();
    if command.fields.is_empty() {
        for (key, prompt) in entry_type.prompts() {
            let current = content.get(*key).and_then(Value::as_str).unwrap_or("").to_string();
            let answer: String = Input::new()
                .with_prompt(*prompt)
                .with_initial_text(current)
                .allow_empty(true)
                .interact_text()?;
            content.insert(key.to_string(), Value::String(answer));
        }
    } else {
        content.extend(parse_fields(entry_type, &command.fields)?);
    }

    let entry = match existing {
        Some(entry) => backend.update_entry(entry.id, content).await?,
        None => {
            backend
                .create_entry(NewJournalEntry {
                    entry_type,
                    entry_date: date,
                    content,
                })
                .await?
        }
    };
    println!(
        "{} Saved {} for {}",
        "✓".style(Style::new().green().bold()),
        entry.entry_type,
        entry.entry_date
    );
    Ok(())
}
