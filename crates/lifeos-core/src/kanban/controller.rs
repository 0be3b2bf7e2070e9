use tracing::{debug, info, warn};
use uuid::Uuid;

use super::board::{apply_move, apply_reorder, locate, plan_drop, sort_lanes, DropPlan, DropTarget};
use crate::api::ProjectApi;
use crate::cache::Cached;
use crate::error::CoreError;
use crate::models::{
    MoveTaskRequest, NewTaskData, ProjectDetail, ReorderTasksRequest, Task, TaskStatus,
    TasksByStatus, UpdateTaskData,
};

/// Result of one drag gesture
#[derive(Debug)]
pub enum DragOutcome {
    /// Status changed; holds the task as the backend stored it
    Moved(Task),
    /// Lane order changed; holds the ids in their new order
    Reordered(Vec<Uuid>),
    /// Nothing to send
    NoOp,
    /// The backend refused; lanes were re-fetched
    RolledBack(CoreError),
}

/// Drives drag gestures and lane edits for one project board.
///
/// Each gesture is `begin_drag` followed by `drop`. A drop is applied to the
/// cached lanes first, then confirmed with the backend; a failed confirmation
/// discards the local edit by re-fetching the project.
pub struct KanbanController<B> {
    backend: B,
    project_id: Uuid,
    board: Cached<Uuid, ProjectDetail>,
    dragging: Option<Uuid>,
    is_moving: bool,
}

impl<B: ProjectApi + Send + Sync> KanbanController<B> {
    pub fn new(backend: B, project_id: Uuid) -> Self {
        Self {
            backend,
            project_id,
            board: Cached::new(),
            dragging: None,
            is_moving: false,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn project_id(&self) -> Uuid {
        self.project_id
    }

    pub fn board(&self) -> Option<&ProjectDetail> {
        self.board.data()
    }

    pub fn lane(&self, status: TaskStatus) -> &[Task] {
        self.board
            .data()
            .map(|detail| detail.tasks.lane(status).as_slice())
            .unwrap_or(&[])
    }

    pub fn dragging(&self) -> Option<Uuid> {
        self.dragging
    }

    pub fn is_moving(&self) -> bool {
        self.is_moving
    }

    pub async fn load(&mut self) -> Result<&ProjectDetail, CoreError> {
        let backend = &self.backend;
        self.board
            .load(self.project_id, |id| async move { fetch_board(backend, id).await })
            .await
    }

    /// Re-fetch the project, overwriting any local edits.
    pub async fn refresh(&mut self) -> Result<&ProjectDetail, CoreError> {
        self.board.invalidate();
        self.load().await
    }

    pub fn begin_drag(&mut self, task_id: Uuid) -> Result<(), CoreError> {
        if self.dragging.is_some() || self.is_moving {
            return Err(CoreError::Busy);
        }
        let lanes = self.lanes()?;
        if locate(lanes, task_id).is_none() {
            return Err(CoreError::NotFound(format!("Task {} is not on this board", task_id)));
        }
        self.dragging = Some(task_id);
        Ok(())
    }

    pub fn cancel_drag(&mut self) {
        self.dragging = None;
    }

    /// Finish the current gesture.
    pub async fn drop(&mut self, target: DropTarget) -> Result<DragOutcome, CoreError> {
        let task_id = self
            .dragging
            .take()
            .ok_or_else(|| CoreError::InvalidInput("No task is being dragged".to_string()))?;

        let plan = plan_drop(self.lanes()?, task_id, target);
        debug!(%task_id, ?target, ?plan, "drop");

        match plan {
            DropPlan::NoOp => Ok(DragOutcome::NoOp),
            DropPlan::Move { task_id, to, .. } => self.commit_move(task_id, to).await,
            DropPlan::Reorder {
                status,
                from_index,
                to_index,
                ..
            } => self.commit_reorder(status, from_index, to_index).await,
        }
    }

    /// Move a task to the end of another lane.
    pub async fn move_task(&mut self, task_id: Uuid, to: TaskStatus) -> Result<DragOutcome, CoreError> {
        self.begin_drag(task_id)?;
        self.drop(DropTarget::Column(to)).await
    }

    /// Move a task to `index` within its own lane.
    pub async fn reorder_task(&mut self, task_id: Uuid, index: usize) -> Result<DragOutcome, CoreError> {
        let lanes = self.lanes()?;
        let (status, _) = locate(lanes, task_id)
            .ok_or_else(|| CoreError::NotFound(format!("Task {} is not on this board", task_id)))?;
        let lane = lanes.lane(status);
        let over = lane
            .get(index.min(lane.len().saturating_sub(1)))
            .map(|task| task.id)
            .ok_or(CoreError::Unknown)?;
        self.begin_drag(task_id)?;
        self.drop(DropTarget::Task(over)).await
    }

    async fn commit_move(&mut self, task_id: Uuid, to: TaskStatus) -> Result<DragOutcome, CoreError> {
        let mut sort_order = None;
        self.board.mutate(|detail| sort_order = apply_move(&mut detail.tasks, task_id, to));
        let sort_order = sort_order.ok_or(CoreError::Unknown)?;

        self.is_moving = true;
        let request = MoveTaskRequest {
            new_status: to,
            sort_order,
        };
        let result = self.backend.move_task(task_id, request).await;
        self.is_moving = false;

        match result {
            Ok(task) => {
                info!(%task_id, status = %to, sort_order, "task moved");
                let stored = task.clone();
                self.board.mutate(|detail| {
                    if let Some((status, index)) = locate(&detail.tasks, stored.id) {
                        detail.tasks.lane_mut(status)[index] = stored;
                    }
                });
                Ok(DragOutcome::Moved(task))
            }
            Err(err) => Ok(self.roll_back(err).await),
        }
    }

    async fn commit_reorder(
        &mut self,
        status: TaskStatus,
        from_index: usize,
        to_index: usize,
    ) -> Result<DragOutcome, CoreError> {
        let mut task_order = Vec::new();
        self.board.mutate(|detail| {
            task_order = apply_reorder(&mut detail.tasks, status, from_index, to_index)
        });

        self.is_moving = true;
        let request = ReorderTasksRequest {
            status,
            task_order: task_order.clone(),
        };
        let result = self.backend.reorder_tasks(self.project_id, request).await;
        self.is_moving = false;

        match result {
            Ok(()) => {
                info!(%status, from_index, to_index, "lane reordered");
                Ok(DragOutcome::Reordered(task_order))
            }
            Err(err) => Ok(self.roll_back(err).await),
        }
    }

    async fn roll_back(&mut self, err: CoreError) -> DragOutcome {
        warn!(error = %err, "drop rejected, re-fetching board");
        if let Err(refetch) = self.refresh().await {
            warn!(error = %refetch, "re-fetch after failed drop also failed");
        }
        DragOutcome::RolledBack(err)
    }

    pub async fn add_task(
        &mut self,
        status: TaskStatus,
        title: &str,
        description: Option<String>,
    ) -> Result<Task, CoreError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(CoreError::InvalidInput("Task title is required".to_string()));
        }
        let data = NewTaskData {
            title: title.to_string(),
            description,
            status,
        };
        let task = self.backend.create_task(self.project_id, data).await?;
        self.after_edit().await;
        Ok(task)
    }

    pub async fn edit_task(&mut self, task_id: Uuid, data: UpdateTaskData) -> Result<Task, CoreError> {
        let task = self.backend.update_task(task_id, data).await?;
        self.after_edit().await;
        Ok(task)
    }

    pub async fn delete_task(&mut self, task_id: Uuid) -> Result<(), CoreError> {
        self.backend.delete_task(task_id).await?;
        self.after_edit().await;
        Ok(())
    }

    /// Delete every completed task; returns how many went.
    pub async fn clear_completed(&mut self) -> Result<u64, CoreError> {
        let cleared = self.backend.clear_completed(self.project_id).await?;
        self.after_edit().await;
        Ok(cleared.deleted_count)
    }

    async fn after_edit(&mut self) {
        if let Err(err) = self.refresh().await {
            warn!(error = %err, "board refresh after edit failed");
        }
    }

    fn lanes(&self) -> Result<&TasksByStatus, CoreError> {
        self.board
            .data()
            .map(|detail| &detail.tasks)
            .ok_or_else(|| CoreError::InvalidInput("Board is not loaded".to_string()))
    }
}

async fn fetch_board<B: ProjectApi + Send + Sync>(
    backend: &B,
    project_id: Uuid,
) -> Result<ProjectDetail, CoreError> {
    let mut detail = backend.get_project(project_id).await?;
    sort_lanes(&mut detail.tasks);
    Ok(detail)
}
