//! paco project command implementations.

use serde::Serialize;

use crate::cli::Globals;
use crate::error::{Error, Result};
use crate::output::{emit_success, HumanOutput};
use crate::project::{list_projects, ProjectIndex};
use crate::task::TaskStore;

pub struct NewOptions {
    pub name: String,
    pub tags: Vec<String>,
}

#[derive(Serialize)]
struct NewReport {
    project: String,
    created: bool,
    index: ProjectIndex,
}

#[derive(Serialize)]
struct ListReport {
    total: usize,
    projects: Vec<String>,
}

#[derive(Serialize)]
struct ShowReport {
    index: ProjectIndex,
    tasks_total: usize,
    tasks_active: usize,
}

pub fn run_new(globals: &Globals, options: NewOptions) -> Result<()> {
    let storage = globals.storage()?;
    storage.init_dirs()?;
    let project = crate::project::Project::open(&storage, &options.name)?;
    let init = project.init(&options.tags)?;
    let index = project.index()?;

    let header = if init.created_anything() {
        format!("paco project new: created {}", project.name())
    } else {
        format!("paco project new: {} already exists", project.name())
    };
    let mut human = HumanOutput::new(header);
    human.push_summary("path", project.dir().display().to_string());
    if !index.tags.is_empty() {
        human.push_summary("tags", index.tags.join(", "));
    }
    human.push_next_step(format!("paco task add {} <title>", project.name()));

    let report = NewReport {
        project: project.name().to_string(),
        created: init.created_anything(),
        index,
    };
    emit_success(globals.output(), "project new", &report, Some(&human))
}

pub fn run_list(globals: &Globals) -> Result<()> {
    let storage = globals.storage()?;
    let projects = list_projects(&storage)?;

    let mut human = HumanOutput::new("Projects");
    human.push_summary("Total", projects.len().to_string());
    for name in &projects {
        human.push_detail(name.clone());
    }
    if projects.is_empty() {
        human.push_next_step("paco project new <name>");
    }

    let report = ListReport {
        total: projects.len(),
        projects,
    };
    emit_success(globals.output(), "project list", &report, Some(&human))
}

pub fn run_show(globals: &Globals, name: &str) -> Result<()> {
    let project = globals.project(name)?;
    if !project.exists() {
        return Err(Error::InvalidArgument(format!(
            "project '{}' does not exist",
            project.name()
        )));
    }

    let index = project.index()?;
    let tasks = TaskStore::new(project.clone()).list(None)?;
    let tasks_active = tasks.iter().filter(|task| task.is_active()).count();

    let mut human = HumanOutput::new(format!("Project {}", project.name()));
    human.push_summary("created", index.created.format("%Y-%m-%d %H:%M").to_string());
    human.push_summary("next task id", index.next_task_id.to_string());
    human.push_summary(
        "tasks",
        format!("{} active, {} total", tasks_active, tasks.len()),
    );
    if !index.tags.is_empty() {
        human.push_summary("tags", index.tags.join(", "));
    }

    let report = ShowReport {
        index,
        tasks_total: tasks.len(),
        tasks_active,
    };
    emit_success(globals.output(), "project show", &report, Some(&human))
}
