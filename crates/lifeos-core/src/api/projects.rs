use async_trait::async_trait;
use serde_json::json;
use uuid::Uuid;

use super::HttpBackend;
use crate::error::CoreError;
use crate::models::{
    ClearCompletedResponse, MoveTaskRequest, NewProjectData, NewTaskData, Note, Project,
    ProjectDetail, ReorderTasksRequest, Task, UpdateProjectData, UpdateTaskData,
};

const PROJECTS: &str = "/api/v1/projects";

#[async_trait]
impl super::ProjectApi for HttpBackend {
    async fn list_projects(&self) -> Result<Vec<ProjectDetail>, CoreError> {
        self.client().get(PROJECTS, &[]).await
    }

    async fn create_project(&self, data: NewProjectData) -> Result<Project, CoreError> {
        self.client().post(PROJECTS, &data).await
    }

    async fn get_project(&self, id: Uuid) -> Result<ProjectDetail, CoreError> {
        self.client().get(&format!("{}/{}", PROJECTS, id), &[]).await
    }

    async fn get_project_by_slug(&self, slug: &str) -> Result<ProjectDetail, CoreError> {
        self.client()
            .get(&format!("{}/slug/{}", PROJECTS, slug), &[])
            .await
    }

    async fn update_project(&self, id: Uuid, data: UpdateProjectData) -> Result<Project, CoreError> {
        self.client()
            .patch(&format!("{}/{}", PROJECTS, id), &[], &data)
            .await
    }

    async fn create_task(&self, project_id: Uuid, data: NewTaskData) -> Result<Task, CoreError> {
        self.client()
            .post(&format!("{}/{}/tasks", PROJECTS, project_id), &data)
            .await
    }

    async fn get_task(&self, id: Uuid) -> Result<Task, CoreError> {
        self.client().get(&format!("{}/tasks/{}", PROJECTS, id), &[]).await
    }

    async fn update_task(&self, id: Uuid, data: UpdateTaskData) -> Result<Task, CoreError> {
        self.client()
            .patch(&format!("{}/tasks/{}", PROJECTS, id), &[], &data)
            .await
    }

    async fn delete_task(&self, id: Uuid) -> Result<(), CoreError> {
        self.client()
            .delete(&format!("{}/tasks/{}", PROJECTS, id), &[])
            .await
    }

    async fn move_task(&self, id: Uuid, request: MoveTaskRequest) -> Result<Task, CoreError> {
        self.client()
            .patch(&format!("{}/tasks/{}/move", PROJECTS, id), &[], &request)
            .await
    }

    async fn reorder_tasks(
        &self,
        project_id: Uuid,
        request: ReorderTasksRequest,
    ) -> Result<(), CoreError> {
        self.client()
            .post(&format!("{}/{}/tasks/reorder", PROJECTS, project_id), &request)
            .await
    }

    async fn clear_completed(&self, project_id: Uuid) -> Result<ClearCompletedResponse, CoreError> {
        self.client()
            .delete(&format!("{}/{}/tasks/completed", PROJECTS, project_id), &[])
            .await
    }

    async fn create_note(&self, project_id: Uuid, content: &str) -> Result<Note, CoreError> {
        self.client()
            .post(
                &format!("{}/{}/notes", PROJECTS, project_id),
                &json!({ "content": content }),
            )
            .await
    }

    async fn update_note(&self, id: Uuid, content: &str) -> Result<Note, CoreError> {
        self.client()
            .patch(
                &format!("{}/notes/{}", PROJECTS, id),
                &[],
                &json!({ "content": content }),
            )
            .await
    }

    async fn delete_note(&self, id: Uuid) -> Result<(), CoreError> {
        self.client()
            .delete(&format!("{}/notes/{}", PROJECTS, id), &[])
            .await
    }
}
