//! In-memory ordered task collection.
//!
//! The store is the only place task records are created or dropped.
//! Persisting after a mutation is the caller's job (see `PracticeApp`).

use super::{Task, TaskId};
use crate::error::ValidationError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskStore {
    tasks: Vec<Task>,
    last_id: Option<TaskId>,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a store from persisted records, keeping their order.
    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        let last_id = tasks.iter().map(|t| t.id).max();
        Self { tasks, last_id }
    }

    /// Create a pending task and append it.
    ///
    /// `now_ms` seeds the id; ids never repeat within one store even when
    /// two tasks are created in the same millisecond.
    ///
    /// # Errors
    /// Returns a [`ValidationError`] and leaves the store untouched when any
    /// field is empty or malformed.
    pub fn add(
        &mut self,
        name: &str,
        category: &str,
        time: &str,
        duration: u32,
        now_ms: i64,
    ) -> Result<Task, ValidationError> {
        let id = self.next_id(now_ms);
        let task = Task::new(id, name, category, time, duration)?;
        self.last_id = Some(id);
        self.tasks.push(task.clone());
        Ok(task)
    }

    /// Remove a task by id. Unknown ids are a no-op and return `None`.
    pub fn remove(&mut self, id: TaskId) -> Option<Task> {
        let index = self.tasks.iter().position(|t| t.id == id)?;
        Some(self.tasks.remove(index))
    }

    pub fn find_by_id(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn find_by_id_mut(&mut self, id: TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    /// All tasks in insertion order.
    pub fn all(&self) -> &[Task] {
        &self.tasks
    }

    pub(crate) fn iter_mut(&mut self) -> std::slice::IterMut<'_, Task> {
        self.tasks.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    fn next_id(&self, now_ms: i64) -> TaskId {
        match self.last_id {
            Some(TaskId(last)) if now_ms <= last => TaskId(last + 1),
            _ => TaskId(now_ms),
        }
    }
}
