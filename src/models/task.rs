use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single to-do item owned by a user.
///
/// Tasks stay in the store until the user deletes them; the only mutation
/// after creation is the completion toggle. `id` is assigned once at
/// creation and is stable for the task's lifetime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    /// Owner key; every lookup joins on this address.
    pub email: String,
    pub description: String,
    pub completed: bool,
}

/// Input for creating a new task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTaskInput {
    pub email: String,
    pub description: String,
}

/// Input for toggling a task's completion state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateTaskInput {
    pub completed: bool,
}
