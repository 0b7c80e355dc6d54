//! Task management for paco.
//!
//! Tasks live in `projects/<name>/tasks.ndjson`, one JSON record per line.
//! New tasks are appended; a status change rewrites the whole file. Tasks
//! are never deleted.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::project::{local_now, normalize_tags, Project};

pub const STATUS_ACTIVE: &str = "active";
pub const STATUS_COMPLETED: &str = "completed";
pub const DEFAULT_TASK_PRIORITY: &str = "medium";
pub const TASK_PRIORITIES: [&str; 3] = ["high", "medium", "low"];

fn default_task_priority() -> String {
    DEFAULT_TASK_PRIORITY.to_string()
}

fn default_task_status() -> String {
    STATUS_ACTIVE.to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: u64,
    pub title: String,
    #[serde(default = "default_task_status")]
    pub status: String,
    #[serde(default = "default_task_priority")]
    pub priority: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Missing timestamps read as the epoch, so such tasks sort as oldest
    #[serde(default)]
    pub created: NaiveDateTime,
    #[serde(default)]
    pub updated: NaiveDateTime,
    /// Keys paco does not model; written back unchanged on rewrite
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Task {
    pub fn is_active(&self) -> bool {
        self.status == STATUS_ACTIVE
    }
}

/// Rank used to order tasks: high=0, medium=1, low=2.
///
/// Matching is exact; anything else, including `"HIGH"`, ranks with medium.
pub fn priority_rank(priority: &str) -> usize {
    TASK_PRIORITIES
        .iter()
        .position(|entry| *entry == priority)
        .unwrap_or(1)
}

/// Validate a user-supplied priority and return its canonical spelling
pub fn normalize_priority(priority: &str) -> Result<String> {
    let trimmed = priority.trim();
    TASK_PRIORITIES
        .iter()
        .find(|entry| entry.eq_ignore_ascii_case(trimmed))
        .map(|entry| entry.to_string())
        .ok_or_else(|| {
            Error::InvalidArgument(format!(
                "invalid priority '{}': must be high, medium, or low",
                priority
            ))
        })
}

/// Task persistence for one project
#[derive(Debug, Clone)]
pub struct TaskStore {
    project: Project,
}

impl TaskStore {
    pub fn new(project: Project) -> Self {
        Self { project }
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    /// Create a task with the next id and append it.
    ///
    /// Id allocation and the append happen under the project lock, so two
    /// cooperating processes never hand out the same id.
    pub fn add(&self, title: &str, priority: &str, tags: &[String]) -> Result<Task> {
        let title = title.trim();
        if title.is_empty() {
            return Err(Error::InvalidArgument("title cannot be empty".to_string()));
        }

        self.project.init(&[])?;
        let lock = self.project.lock()?;
        let id = self.project.allocate_task_id(&lock)?;

        let now = local_now();
        let task = Task {
            id,
            title: title.to_string(),
            status: STATUS_ACTIVE.to_string(),
            priority: priority.to_string(),
            tags: normalize_tags(tags),
            created: now,
            updated: now,
            extra: Map::new(),
        };

        self.project
            .storage()
            .append_jsonl(&self.project.tasks_file(), &task)?;
        tracing::debug!(project = %self.project.name(), id, "task added");
        Ok(task)
    }

    /// All tasks in file order, optionally only those with `status`
    pub fn list(&self, status: Option<&str>) -> Result<Vec<Task>> {
        let mut tasks: Vec<Task> = self
            .project
            .storage()
            .read_jsonl(&self.project.tasks_file())?;
        if let Some(status) = status {
            tasks.retain(|task| task.status == status);
        }
        Ok(tasks)
    }

    pub fn find(&self, id: u64) -> Result<Option<Task>> {
        Ok(self.list(None)?.into_iter().find(|task| task.id == id))
    }

    /// Set the status of task `id` and bump its `updated` time.
    ///
    /// Returns `false` without touching the file when no task has that id.
    pub fn update_status(&self, id: u64, status: &str) -> Result<bool> {
        let status = status.trim();
        if status.is_empty() {
            return Err(Error::InvalidArgument("status cannot be empty".to_string()));
        }

        let tasks_file = self.project.tasks_file();
        if !tasks_file.exists() {
            return Ok(false);
        }

        let _lock = self.project.lock()?;
        let mut tasks = self.list(None)?;
        let mut found = false;
        for task in tasks.iter_mut().filter(|task| task.id == id) {
            task.status = status.to_string();
            task.updated = local_now();
            found = true;
        }

        if !found {
            tracing::debug!(project = %self.project.name(), id, "status update for unknown task ignored");
            return Ok(false);
        }

        self.project.storage().write_jsonl(&tasks_file, &tasks)?;
        tracing::debug!(project = %self.project.name(), id, status, "task status updated");
        Ok(true)
    }
}
