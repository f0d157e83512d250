use crate::models::Task;

/// Descriptions of `email`'s incomplete tasks, in creation order.
///
/// Pure function of the snapshot: running it twice over the same data
/// yields the same list. Returns an empty vec (never an error) when the
/// user has nothing pending; the driver skips dispatch entirely in that
/// case so no one gets an empty reminder.
pub fn pending_descriptions(tasks: &[Task], email: &str) -> Vec<String> {
    tasks
        .iter()
        .filter(|task| task.email == email && !task.completed)
        .map(|task| task.description.clone())
        .collect()
}
