use anyhow::{anyhow, Result};
use dialoguer::{Confirm, Select};
use lifeos_core::api::ProjectApi;
use lifeos_core::error::CoreError;
use lifeos_core::models::{EditScope, ProjectDetail, Task, TaskStatus};
use owo_colors::OwoColorize;
use uuid::Uuid;

/// Pick one item by id prefix or case-insensitive name.
///
/// A full id or an exact name wins outright; otherwise the reference must
/// match exactly one id prefix.
pub fn resolve<'a, T>(
    items: impl IntoIterator<Item = &'a T>,
    reference: &str,
    what: &str,
    key: impl Fn(&T) -> (Uuid, &str),
) -> Result<&'a T> {
    let reference = reference.trim();
    if reference.len() < 2 {
        return Err(anyhow!(CoreError::InvalidInput(format!(
            "{} reference must be at least 2 characters long.",
            what
        ))));
    }
    let needle = reference.to_lowercase();

    let mut matches = Vec::new();
    for item in items {
        let (id, name) = key(item);
        let id = id.to_string();
        if id == needle || name.to_lowercase() == needle {
            return Ok(item);
        }
        if id.starts_with(&needle) {
            matches.push((item, id, name.to_string()));
        }
    }

    match matches.len() {
        1 => Ok(matches.remove(0).0),
        0 => Err(anyhow!(CoreError::NotFound(format!(
            "No {} matches '{}'",
            what.to_lowercase(),
            reference
        )))),
        _ => {
            let candidates: Vec<String> = matches
                .iter()
                .map(|(_, id, name)| format!("  {} ({})", &id[..8], name))
                .collect();
            Err(anyhow!(
                "Ambiguous {} '{}'. Did you mean one of these?\n{}",
                what.to_lowercase(),
                reference,
                candidates.join("\n")
            ))
        }
    }
}

pub fn resolve_task<'a>(detail: &'a ProjectDetail, reference: &str) -> Result<&'a Task> {
    let tasks = TaskStatus::LANES
        .iter()
        .flat_map(|status| detail.tasks.lane(*status).iter());
    resolve(tasks, reference, "Task", |t| (t.id, t.title.as_str()))
}

/// A project by id or slug.
pub async fn find_project(backend: &impl ProjectApi, reference: &str) -> Result<ProjectDetail> {
    let detail = match reference.parse::<Uuid>() {
        Ok(id) => backend.get_project(id).await?,
        Err(_) => backend.get_project_by_slug(reference).await?,
    };
    Ok(detail)
}

pub fn short_id(id: Uuid) -> String {
    id.to_string()[..8].to_string()
}

/// Ask before a destructive action unless `force` is set.
pub fn confirm(prompt: &str, force: bool) -> Result<bool> {
    if force {
        return Ok(true);
    }
    let confirmed = Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .unwrap_or(false);
    if !confirmed {
        println!("Cancelled.");
    }
    Ok(confirmed)
}

/// Scope for a change to a recurring event: the flag if given, `single`
/// when prompting is suppressed, otherwise an interactive choice.
pub fn choose_scope(explicit: Option<EditScope>, no_prompt: bool, prompt: &str) -> Result<EditScope> {
    if let Some(scope) = explicit {
        return Ok(scope);
    }
    if no_prompt {
        return Ok(EditScope::Single);
    }
    println!("{}", "This event is part of a recurring series.".yellow());
    let labels: Vec<&str> = EditScope::ALL.iter().map(EditScope::label).collect();
    let selection = Select::new()
        .with_prompt(prompt)
        .items(&labels)
        .default(0)
        .interact()?;
    EditScope::ALL
        .get(selection)
        .copied()
        .ok_or_else(|| anyhow!(CoreError::Unknown))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    struct Item {
        id: Uuid,
        name: &'static str,
    }

    fn items() -> Vec<Item> {
        vec![
            Item {
                id: "a1b2c3d4-0000-4000-8000-000000000001".parse().unwrap(),
                name: "Bench press",
            },
            Item {
                id: "a1b2ffff-0000-4000-8000-000000000002".parse().unwrap(),
                name: "Squat",
            },
            Item {
                id: "0c0c0c0c-0000-4000-8000-000000000003".parse().unwrap(),
                name: "Deadlift",
            },
        ]
    }

    fn find(reference: &str) -> Result<&'static str> {
        let items = items();
        resolve(&items, reference, "Exercise", |i| (i.id, i.name)).map(|i| i.name)
    }

    #[rstest]
    #[case("a1b2c3", "Bench press")]
    #[case("0c0c", "Deadlift")]
    #[case("squat", "Squat")]
    #[case("BENCH PRESS", "Bench press")]
    #[case("a1b2ffff-0000-4000-8000-000000000002", "Squat")]
    fn test_resolve_matches(#[case] reference: &str, #[case] expected: &str) {
        assert_eq!(find(reference).unwrap(), expected);
    }

    #[test]
    fn test_resolve_ambiguous_prefix_lists_candidates() {
        let err = find("a1b2").unwrap_err().to_string();
        assert!(err.contains("Ambiguous"));
        assert!(err.contains("Bench press"));
        assert!(err.contains("Squat"));
    }

    #[rstest]
    #[case("a")]
    #[case("zz")]
    fn test_resolve_rejects(#[case] reference: &str) {
        let err = find(reference).unwrap_err();
        assert!(err.downcast_ref::<CoreError>().is_some());
    }

    #[test]
    fn test_short_id() {
        let id: Uuid = "a1b2c3d4-0000-4000-8000-000000000001".parse().unwrap();
        assert_eq!(short_id(id), "a1b2c3d4");
    }

    #[test]
    fn test_forced_confirmation_skips_prompt() {
        assert!(confirm("Delete?", true).unwrap());
    }

    #[test]
    fn test_scope_flag_wins() {
        assert_eq!(
            choose_scope(Some(EditScope::Future), false, "Apply to").unwrap(),
            EditScope::Future
        );
        assert_eq!(choose_scope(None, true, "Apply to").unwrap(), EditScope::Single);
    }
}
