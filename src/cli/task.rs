//! paco task command implementations.

use serde::Serialize;

use crate::cli::Globals;
use crate::error::Result;
use crate::output::{emit_success, HumanOutput};
use crate::task::{normalize_priority, Task, TaskStore, STATUS_ACTIVE};

pub struct AddOptions {
    pub project: String,
    pub title: String,
    pub priority: String,
    pub tags: Vec<String>,
}

pub struct ListOptions {
    pub project: String,
    pub status: Option<String>,
    pub all: bool,
}

pub struct StatusOptions {
    pub project: String,
    pub id: u64,
    pub status: String,
    pub command: &'static str,
}

#[derive(Serialize)]
struct TaskListOutput {
    project: String,
    total: usize,
    tasks: Vec<Task>,
}

#[derive(Serialize)]
struct StatusOutput {
    project: String,
    id: u64,
    status: String,
    updated: bool,
}

pub fn run_add(globals: &Globals, options: AddOptions) -> Result<()> {
    let priority = normalize_priority(&options.priority)?;
    let store = TaskStore::new(globals.project(&options.project)?);
    let task = store.add(&options.title, &priority, &options.tags)?;

    let mut human = HumanOutput::new(format!("paco task add: {}", task.id));
    human.push_summary("project", store.project().name());
    human.push_summary("title", task.title.clone());
    human.push_summary("priority", task.priority.clone());
    if !task.tags.is_empty() {
        human.push_summary("tags", task.tags.join(", "));
    }

    emit_success(globals.output(), "task add", &task, Some(&human))
}

pub fn run_list(globals: &Globals, options: ListOptions) -> Result<()> {
    let store = TaskStore::new(globals.project(&options.project)?);
    let status = if options.all {
        None
    } else {
        Some(options.status.as_deref().unwrap_or(STATUS_ACTIVE))
    };
    let tasks = store.list(status)?;

    let mut human = HumanOutput::new(format!("Tasks for {}", store.project().name()));
    human.push_summary("Total", tasks.len().to_string());
    if let Some(status) = status {
        human.push_summary("Status", status);
    }
    for task in &tasks {
        human.push_detail(format!(
            "[{}][{}] {} {}",
            task.status, task.priority, task.id, task.title
        ));
    }

    let output = TaskListOutput {
        project: store.project().name().to_string(),
        total: tasks.len(),
        tasks,
    };
    emit_success(globals.output(), "task list", &output, Some(&human))
}

pub fn run_status(globals: &Globals, options: StatusOptions) -> Result<()> {
    let store = TaskStore::new(globals.project(&options.project)?);
    let updated = store.update_status(options.id, &options.status)?;

    let header = if updated {
        format!("paco {}: {} -> {}", options.command, options.id, options.status.trim())
    } else {
        format!("paco {}: nothing to do", options.command)
    };
    let mut human = HumanOutput::new(header);
    human.push_summary("project", store.project().name());
    if !updated {
        human.push_warning(format!(
            "no task with id {} in {}",
            options.id,
            store.project().name()
        ));
        human.push_next_step(format!("paco task list {} --all", store.project().name()));
    }

    let output = StatusOutput {
        project: store.project().name().to_string(),
        id: options.id,
        status: options.status.trim().to_string(),
        updated,
    };
    emit_success(globals.output(), options.command, &output, Some(&human))
}
