use crate::domain::{DeleteOutcome, UpdateOutcome};
use async_graphql::SimpleObject;

fn clamp_count(count: i64) -> Option<i32> {
    Some(i32::try_from(count).unwrap_or(i32::MAX))
}

/// Counts reported by `updateTodo`
#[derive(Debug, Clone, Copy, SimpleObject)]
#[graphql(name = "UpdateTodoType")]
pub struct UpdateTodoResult {
    /// Number of todos whose fields changed
    pub modified_count: Option<i32>,
    /// Number of todos matched by id
    pub result: Option<i32>,
}

impl From<UpdateOutcome> for UpdateTodoResult {
    fn from(outcome: UpdateOutcome) -> Self {
        Self {
            modified_count: clamp_count(outcome.modified_count),
            result: clamp_count(outcome.matched_count),
        }
    }
}

/// Count reported by `deleteTodo`
#[derive(Debug, Clone, Copy, SimpleObject)]
#[graphql(name = "DeleteTodoType")]
pub struct DeleteTodoResult {
    pub deleted_count: Option<i32>,
}

impl From<DeleteOutcome> for DeleteTodoResult {
    fn from(outcome: DeleteOutcome) -> Self {
        Self {
            deleted_count: clamp_count(outcome.deleted_count),
        }
    }
}
