use async_trait::async_trait;
use uuid::Uuid;

use super::HttpBackend;
use crate::error::CoreError;
use crate::models::{
    ActiveSession, CompleteSessionRequest, ExerciseList, FitnessSummary, HistoryPage,
    LogSetRequest, ProgramDetail, ProgramList, SessionCancelled, SessionComplete,
    StartSessionRequest, WorkoutLog,
};

const SESSIONS: &str = "/api/v1/workouts/sessions";

#[async_trait]
impl super::FitnessApi for HttpBackend {
    async fn list_exercises(&self, muscle_group: Option<&str>) -> Result<ExerciseList, CoreError> {
        let query: Vec<(&str, String)> = muscle_group
            .map(|group| vec![("muscle_group", group.to_string())])
            .unwrap_or_default();
        self.client().get("/api/v1/exercises", &query).await
    }

    async fn list_programs(&self) -> Result<ProgramList, CoreError> {
        self.client().get("/api/v1/programs", &[]).await
    }

    async fn get_program(&self, id: Uuid) -> Result<ProgramDetail, CoreError> {
        self.client()
            .get(&format!("/api/v1/programs/{}", id), &[])
            .await
    }

    async fn start_session(
        &self,
        program_id: Option<Uuid>,
        day_label: Option<String>,
    ) -> Result<ActiveSession, CoreError> {
        let request = StartSessionRequest {
            program_id,
            day_label,
        };
        self.client().post(SESSIONS, &request).await
    }

    async fn active_session(&self) -> Result<Option<ActiveSession>, CoreError> {
        let active: Result<ActiveSession, CoreError> = self
            .client()
            .get(&format!("{}/active", SESSIONS), &[])
            .await;
        match active {
            Ok(session) => Ok(Some(session)),
            Err(err) if err.status() == Some(404) => Ok(None),
            Err(err) => Err(err),
        }
    }

    async fn log_set(&self, session_id: Uuid, set: LogSetRequest) -> Result<WorkoutLog, CoreError> {
        self.client()
            .post(&format!("{}/{}/logs", SESSIONS, session_id), &set)
            .await
    }

    async fn complete_session(
        &self,
        session_id: Uuid,
        notes: Option<String>,
    ) -> Result<SessionComplete, CoreError> {
        self.client()
            .patch(
                &format!("{}/{}/complete", SESSIONS, session_id),
                &[],
                &CompleteSessionRequest { notes },
            )
            .await
    }

    async fn cancel_session(&self, session_id: Uuid) -> Result<SessionCancelled, CoreError> {
        self.client()
            .patch(
                &format!("{}/{}/cancel", SESSIONS, session_id),
                &[],
                &serde_json::json!({}),
            )
            .await
    }

    async fn history(&self, page: u32, per_page: u32) -> Result<HistoryPage, CoreError> {
        let query = [("page", page.to_string()), ("per_page", per_page.to_string())];
        self.client().get("/api/v1/workouts/history", &query).await
    }

    async fn fitness_summary(&self) -> Result<FitnessSummary, CoreError> {
        self.client().get("/api/v1/workouts/summary", &[]).await
    }
}
