use chrono::{DateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::timefmt::{timestamp, timestamp_opt};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub muscle_group: Option<String>,
    #[serde(default)]
    pub demo_url: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExerciseList {
    pub items: Vec<Exercise>,
    #[serde(default)]
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramListItem {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub is_active: bool,
    #[serde(default)]
    pub day_labels: Vec<String>,
    #[serde(default)]
    pub exercise_count: usize,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProgramList {
    pub items: Vec<ProgramListItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramExerciseEntry {
    pub id: Uuid,
    pub exercise: Exercise,
    pub sort_order: i32,
    pub target_sets: u32,
    pub target_reps_min: u32,
    pub target_reps_max: u32,
    pub rest_seconds: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramDetail {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub is_active: bool,
    /// Day label -> exercises for that day
    #[serde(default)]
    pub days: BTreeMap<String, Vec<ProgramExerciseEntry>>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionExerciseInfo {
    pub exercise_id: Uuid,
    pub exercise_name: String,
    pub target_sets: u32,
    pub target_reps_min: u32,
    pub target_reps_max: u32,
    pub rest_seconds: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutLog {
    pub id: Uuid,
    pub session_id: Uuid,
    pub exercise_id: Uuid,
    pub set_number: u32,
    pub reps: u32,
    #[serde(default, deserialize_with = "decimal_opt")]
    pub weight_kg: Option<f64>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

/// Decimals arrive either as JSON numbers or as strings like `"82.5"`.
fn decimal_opt<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }
    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Number(n)) => Ok(Some(n)),
        Some(Raw::Text(text)) => text
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| de::Error::custom(format!("invalid decimal: {}", text))),
    }
}

/// A session in progress; the start response carries no logs yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveSession {
    pub id: Uuid,
    #[serde(default)]
    pub program_name: Option<String>,
    #[serde(default)]
    pub day_label: Option<String>,
    pub status: String,
    #[serde(with = "timestamp")]
    pub started_at: DateTime<Utc>,
    #[serde(default)]
    pub exercises: Vec<SessionExerciseInfo>,
    #[serde(default)]
    pub logs: Vec<WorkoutLog>,
}

impl ActiveSession {
    /// Next set number for an exercise, counting sets already logged.
    pub fn next_set_number(&self, exercise_id: Uuid) -> u32 {
        self.logs
            .iter()
            .filter(|log| log.exercise_id == exercise_id)
            .map(|log| log.set_number)
            .max()
            .unwrap_or(0)
            + 1
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseSummary {
    pub exercise_name: String,
    pub sets_completed: u32,
    #[serde(default)]
    pub reps_per_set: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionComplete {
    pub id: Uuid,
    #[serde(default)]
    pub program_name: Option<String>,
    #[serde(default)]
    pub day_label: Option<String>,
    pub status: String,
    #[serde(with = "timestamp")]
    pub started_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub completed_at: DateTime<Utc>,
    pub duration_seconds: u64,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub summary: Vec<ExerciseSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryItem {
    pub id: Uuid,
    #[serde(default)]
    pub program_name: Option<String>,
    #[serde(default)]
    pub day_label: Option<String>,
    pub status: String,
    #[serde(with = "timestamp")]
    pub started_at: DateTime<Utc>,
    #[serde(default, with = "timestamp_opt")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub duration_seconds: Option<u64>,
    #[serde(default)]
    pub exercise_count: usize,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistoryPage {
    pub items: Vec<HistoryItem>,
    #[serde(default)]
    pub total: usize,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub per_page: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FitnessSummary {
    #[serde(default)]
    pub active_program_name: Option<String>,
    #[serde(default)]
    pub active_program_id: Option<Uuid>,
    #[serde(default)]
    pub next_day_label: Option<String>,
    /// Start timestamps of this week's workouts
    #[serde(default)]
    pub workouts_this_week: Vec<String>,
    #[serde(default)]
    pub has_active_session: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionCancelled {
    pub id: Uuid,
    pub status: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct StartSessionRequest {
    pub program_id: Option<Uuid>,
    pub day_label: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LogSetRequest {
    pub exercise_id: Uuid,
    pub set_number: u32,
    pub reps: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight_kg: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CompleteSessionRequest {
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn log(exercise_id: Uuid, set_number: u32) -> WorkoutLog {
        WorkoutLog {
            id: Uuid::new_v4(),
            session_id: Uuid::new_v4(),
            exercise_id,
            set_number,
            reps: 8,
            weight_kg: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn weight_accepts_decimal_strings() {
        let raw = serde_json::json!({
            "id": Uuid::new_v4(),
            "session_id": Uuid::new_v4(),
            "exercise_id": Uuid::new_v4(),
            "set_number": 1,
            "reps": 5,
            "weight_kg": "82.50",
            "created_at": "2025-01-06T09:00:00Z"
        });
        let log: WorkoutLog = serde_json::from_value(raw).unwrap();
        assert_eq!(log.weight_kg, Some(82.5));
    }

    #[test]
    fn next_set_number_counts_per_exercise() {
        let squat = Uuid::new_v4();
        let bench = Uuid::new_v4();
        let session = ActiveSession {
            id: Uuid::new_v4(),
            program_name: None,
            day_label: Some("A".to_string()),
            status: "active".to_string(),
            started_at: Utc::now(),
            exercises: vec![],
            logs: vec![log(squat, 1), log(squat, 2), log(bench, 1)],
        };
        assert_eq!(session.next_set_number(squat), 3);
        assert_eq!(session.next_set_number(bench), 2);
        assert_eq!(session.next_set_number(Uuid::new_v4()), 1);
    }
}
