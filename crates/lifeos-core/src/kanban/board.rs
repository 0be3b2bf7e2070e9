//! Pure lane arithmetic for the kanban board.
//!
//! Lanes are rendered in `sort_order`. Every function here edits a
//! [`TasksByStatus`] in place and returns what the backend must be told.

use uuid::Uuid;

use crate::models::{TaskStatus, TasksByStatus};

/// Where a dragged task was released
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropTarget {
    /// Empty space in a lane
    Column(TaskStatus),
    /// On top of another task card
    Task(Uuid),
    /// Anywhere that is not a lane
    Outside,
}

/// What a drop resolves to, before anything is applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropPlan {
    Move {
        task_id: Uuid,
        from: TaskStatus,
        to: TaskStatus,
    },
    Reorder {
        task_id: Uuid,
        status: TaskStatus,
        from_index: usize,
        to_index: usize,
    },
    NoOp,
}

pub fn sort_lanes(lanes: &mut TasksByStatus) {
    for status in TaskStatus::LANES {
        lanes.lane_mut(status).sort_by_key(|task| task.sort_order);
    }
}

/// Lane and index of a task.
pub fn locate(lanes: &TasksByStatus, task_id: Uuid) -> Option<(TaskStatus, usize)> {
    TaskStatus::LANES.into_iter().find_map(|status| {
        lanes
            .lane(status)
            .iter()
            .position(|task| task.id == task_id)
            .map(|index| (status, index))
    })
}

/// Resolve a drop. A task dropped on a card in another lane moves to that lane.
pub fn plan_drop(lanes: &TasksByStatus, task_id: Uuid, target: DropTarget) -> DropPlan {
    let Some((from, from_index)) = locate(lanes, task_id) else {
        return DropPlan::NoOp;
    };
    match target {
        DropTarget::Outside => DropPlan::NoOp,
        DropTarget::Column(to) if to == from => DropPlan::NoOp,
        DropTarget::Column(to) => DropPlan::Move { task_id, from, to },
        DropTarget::Task(over_id) => match locate(lanes, over_id) {
            None => DropPlan::NoOp,
            Some((to, _)) if to != from => DropPlan::Move { task_id, from, to },
            Some((_, to_index)) if to_index == from_index => DropPlan::NoOp,
            Some((status, to_index)) => DropPlan::Reorder {
                task_id,
                status,
                from_index,
                to_index,
            },
        },
    }
}

/// Append the task to `to` and return its new `sort_order`, the index of the
/// last slot in the destination lane.
pub fn apply_move(lanes: &mut TasksByStatus, task_id: Uuid, to: TaskStatus) -> Option<i32> {
    let (from, index) = locate(lanes, task_id)?;
    let mut task = lanes.lane_mut(from).remove(index);
    let destination = lanes.lane_mut(to);
    let sort_order = i32::try_from(destination.len()).ok()?;
    task.status = to;
    task.sort_order = sort_order;
    destination.push(task);
    Some(sort_order)
}

/// Splice a task to `to_index` within its lane and return the new id order.
pub fn apply_reorder(
    lanes: &mut TasksByStatus,
    status: TaskStatus,
    from_index: usize,
    to_index: usize,
) -> Vec<Uuid> {
    let lane = lanes.lane_mut(status);
    if from_index < lane.len() && to_index < lane.len() {
        let task = lane.remove(from_index);
        lane.insert(to_index, task);
    }
    for (position, task) in lane.iter_mut().enumerate() {
        task.sort_order = position as i32;
    }
    lane.iter().map(|task| task.id).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Task;
    use chrono::Utc;
    use proptest::prelude::*;

    fn task(title: &str, status: TaskStatus, sort_order: i32) -> Task {
        Task {
            id: Uuid::new_v4(),
            project_id: Uuid::nil(),
            title: title.to_string(),
            description: None,
            status,
            sort_order,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            completed_at: None,
        }
    }

    fn board() -> TasksByStatus {
        TasksByStatus {
            backlog: vec![
                task("Write report", TaskStatus::Backlog, 0),
                task("Book flights", TaskStatus::Backlog, 1),
                task("Renew passport", TaskStatus::Backlog, 2),
            ],
            in_progress: vec![task("Fix bike", TaskStatus::InProgress, 0)],
            completed: vec![],
        }
    }

    #[test]
    fn lanes_sort_by_sort_order() {
        let mut lanes = board();
        lanes.backlog.reverse();
        sort_lanes(&mut lanes);
        assert_eq!(lanes.backlog[0].title, "Write report");
    }

    #[test]
    fn column_drop_in_other_lane_is_a_move() {
        let lanes = board();
        let id = lanes.backlog[0].id;
        assert_eq!(
            plan_drop(&lanes, id, DropTarget::Column(TaskStatus::InProgress)),
            DropPlan::Move {
                task_id: id,
                from: TaskStatus::Backlog,
                to: TaskStatus::InProgress
            }
        );
    }

    #[test]
    fn card_drop_in_other_lane_is_a_move() {
        let lanes = board();
        let id = lanes.backlog[1].id;
        let over = lanes.in_progress[0].id;
        assert!(matches!(
            plan_drop(&lanes, id, DropTarget::Task(over)),
            DropPlan::Move { to: TaskStatus::InProgress, .. }
        ));
    }

    #[test]
    fn unchanged_drops_are_noops() {
        let lanes = board();
        let id = lanes.backlog[0].id;
        assert_eq!(plan_drop(&lanes, id, DropTarget::Outside), DropPlan::NoOp);
        assert_eq!(
            plan_drop(&lanes, id, DropTarget::Column(TaskStatus::Backlog)),
            DropPlan::NoOp
        );
        assert_eq!(plan_drop(&lanes, id, DropTarget::Task(id)), DropPlan::NoOp);
        assert_eq!(
            plan_drop(&lanes, Uuid::new_v4(), DropTarget::Column(TaskStatus::Completed)),
            DropPlan::NoOp
        );
    }

    #[test]
    fn move_appends_and_reports_last_index() {
        let mut lanes = board();
        let id = lanes.backlog[0].id;
        assert_eq!(apply_move(&mut lanes, id, TaskStatus::InProgress), Some(1));
        assert_eq!(lanes.backlog.len(), 2);
        let moved = &lanes.in_progress[1];
        assert_eq!(moved.id, id);
        assert_eq!(moved.status, TaskStatus::InProgress);
    }

    #[test]
    fn moving_back_restores_status() {
        let mut lanes = board();
        let id = lanes.backlog[0].id;
        apply_move(&mut lanes, id, TaskStatus::InProgress);
        apply_move(&mut lanes, id, TaskStatus::Backlog);
        assert_eq!(locate(&lanes, id).map(|(s, _)| s), Some(TaskStatus::Backlog));
    }

    #[test]
    fn reorder_splices_to_target_index() {
        let mut lanes = board();
        let ids: Vec<Uuid> = lanes.backlog.iter().map(|t| t.id).collect();
        let order = apply_reorder(&mut lanes, TaskStatus::Backlog, 0, 1);
        assert_eq!(order, vec![ids[1], ids[0], ids[2]]);
        assert_eq!(lanes.backlog[0].sort_order, 0);
        assert_eq!(lanes.backlog[1].id, ids[0]);
    }

    proptest! {
        #[test]
        fn reorder_is_a_permutation(len in 1usize..12, from in 0usize..12, to in 0usize..12) {
            let from = from % len;
            let to = to % len;
            let mut lanes = TasksByStatus {
                backlog: (0..len).map(|i| task("t", TaskStatus::Backlog, i as i32)).collect(),
                ..Default::default()
            };
            let before: Vec<Uuid> = lanes.backlog.iter().map(|t| t.id).collect();
            let order = apply_reorder(&mut lanes, TaskStatus::Backlog, from, to);

            prop_assert_eq!(order.len(), len);
            prop_assert_eq!(order[to], before[from]);
            let mut sorted_before = before.clone();
            let mut sorted_after = order.clone();
            sorted_before.sort();
            sorted_after.sort();
            prop_assert_eq!(sorted_before, sorted_after);
            for (i, task) in lanes.backlog.iter().enumerate() {
                prop_assert_eq!(task.sort_order, i as i32);
            }
        }
    }
}
