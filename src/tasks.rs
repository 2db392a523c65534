use std::collections::HashMap;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{Task, TaskInput};

/// In-memory task collection behind the `/tasks` routes.
#[derive(Debug, Default)]
pub struct TaskStore {
    tasks: RwLock<HashMap<Uuid, Task>>,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All tasks, most recently created first.
    pub async fn list(&self) -> Vec<Task> {
        let mut tasks: Vec<Task> = self.tasks.read().await.values().cloned().collect();
        tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        tasks
    }

    pub async fn get(&self, id: Uuid) -> Result<Task, AppError> {
        self.tasks
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound("Task not found".into()))
    }

    pub async fn create(&self, input: TaskInput, created_by: &str) -> Task {
        let task = Task::new(input, created_by);
        self.tasks.write().await.insert(task.id, task.clone());
        task
    }

    pub async fn update(&self, id: Uuid, input: TaskInput) -> Result<Task, AppError> {
        let mut tasks = self.tasks.write().await;
        let task = tasks
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound("Task not found".into()))?;
        task.apply(input);
        Ok(task.clone())
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        self.tasks
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound("Task not found".into()))
    }
}
