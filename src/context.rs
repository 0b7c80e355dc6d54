//! Bounded context assembly.
//!
//! Builds the single prompt text handed to the local model from a project's
//! summary, recent daily notes, active tasks and log tail. Each section is
//! capped by a guardrail (fixed note window, `max_tasks`, `max_log_lines`);
//! the result is then measured against `max_prompt_kb`. The size check is
//! reported, never enforced here: an over-limit context is still returned in
//! full and the caller decides what to do with it.
//!
//! Section order is fixed. A section with nothing to render is omitted
//! entirely, except the summary which is always present.
//!
//! ```text
//! ## Project Summary
//! <summary>
//!
//! ## Recent Daily Notes
//! <notes>
//!
//! ## Active Tasks
//! - [ID:<id>] [<priority>] <title>
//!
//! ## Recent Log
//! <log tail>
//! ```

use serde::Serialize;

use crate::config::Config;
use crate::error::Result;
use crate::journal::Journal;
use crate::project::Project;
use crate::task::{priority_rank, Task, TaskStore, STATUS_ACTIVE};

/// Daily notes window, in note files
pub const RECENT_NOTES_DAYS: usize = 3;

pub const SUMMARY_HEADER: &str = "## Project Summary";
pub const NOTES_HEADER: &str = "## Recent Daily Notes";
pub const TASKS_HEADER: &str = "## Active Tasks";
pub const LOG_HEADER: &str = "## Recent Log";

/// Everything the assembler reads from the record store
pub trait ContextSource {
    /// Summary text, or a placeholder when absent
    fn summary(&self) -> Result<String>;

    /// Tasks whose status is `active`, in store order
    fn active_tasks(&self) -> Result<Vec<Task>>;

    /// Up to `max_lines` trailing log lines; empty when there is no log
    fn log_tail(&self, max_lines: usize) -> Result<String>;

    /// Rendered daily notes of the newest `max_days` files; empty when none
    fn recent_notes(&self, max_days: usize) -> Result<String>;
}

impl ContextSource for Project {
    fn summary(&self) -> Result<String> {
        Journal::new(self.clone()).summary()
    }

    fn active_tasks(&self) -> Result<Vec<Task>> {
        TaskStore::new(self.clone()).list(Some(STATUS_ACTIVE))
    }

    fn log_tail(&self, max_lines: usize) -> Result<String> {
        Journal::new(self.clone()).log_tail(max_lines)
    }

    fn recent_notes(&self, max_days: usize) -> Result<String> {
        Journal::new(self.clone()).recent_daily_notes(max_days)
    }
}

/// One assembled prompt and its guardrail report
#[derive(Debug, Clone, Serialize)]
pub struct AssembledContext {
    pub text: String,
    pub size_kb: f64,
    pub max_prompt_kb: f64,
    pub within_limit: bool,
    /// Active tasks rendered into `text`
    pub tasks_included: usize,
    /// Active tasks before truncation to `max_tasks`
    pub tasks_total: usize,
}

/// Assemble the bounded context for one project.
///
/// Deterministic for a given store state and config. Missing summary, notes
/// or log never produce an error; only genuine I/O or record corruption
/// does.
pub fn assemble(source: &impl ContextSource, config: &Config) -> Result<AssembledContext> {
    let mut text = String::new();

    text.push_str(SUMMARY_HEADER);
    text.push('\n');
    text.push_str(&source.summary()?);
    text.push('\n');

    let notes = source.recent_notes(RECENT_NOTES_DAYS)?;
    if !notes.is_empty() {
        push_section(&mut text, NOTES_HEADER, &notes);
    }

    let active = source.active_tasks()?;
    let tasks_total = active.len();
    let selected = select_tasks(active, config.max_tasks);
    if !selected.is_empty() {
        text.push_str(TASKS_HEADER);
        text.push('\n');
        for task in &selected {
            text.push_str(&render_task_line(task));
            text.push('\n');
        }
        text.push('\n');
    }

    let log_tail = source.log_tail(config.max_log_lines)?;
    if !log_tail.is_empty() {
        push_section(&mut text, LOG_HEADER, &log_tail);
    }

    let (within_limit, size_kb) = check_size(&text, config.max_prompt_kb);
    tracing::debug!(
        size_kb,
        max_prompt_kb = config.max_prompt_kb,
        within_limit,
        tasks_total,
        tasks_included = selected.len(),
        "context assembled"
    );

    Ok(AssembledContext {
        text,
        size_kb,
        max_prompt_kb: config.max_prompt_kb,
        within_limit,
        tasks_included: selected.len(),
        tasks_total,
    })
}

fn push_section(text: &mut String, header: &str, body: &str) {
    text.push_str(header);
    text.push('\n');
    text.push_str(body);
    text.push('\n');
}

/// Order active tasks for the context: high priority first, then the most
/// recently updated first. Equal keys keep their store order.
pub fn sort_active_tasks(tasks: &mut [Task]) {
    tasks.sort_by(|left, right| {
        priority_rank(&left.priority)
            .cmp(&priority_rank(&right.priority))
            .then_with(|| right.updated.cmp(&left.updated))
    });
}

/// Sort and keep the first `max_tasks`
pub fn select_tasks(mut tasks: Vec<Task>, max_tasks: usize) -> Vec<Task> {
    sort_active_tasks(&mut tasks);
    tasks.truncate(max_tasks);
    tasks
}

/// `- [ID:<id>] [<priority>] <title>`
pub fn render_task_line(task: &Task) -> String {
    format!("- [ID:{}] [{}] {}", task.id, task.priority, task.title)
}

/// UTF-8 byte length in KB (1024 bytes)
pub fn estimate_size_kb(text: &str) -> f64 {
    text.len() as f64 / 1024.0
}

/// `(size_kb <= max_prompt_kb, size_kb)`
pub fn check_size(text: &str, max_prompt_kb: f64) -> (bool, f64) {
    let size_kb = estimate_size_kb(text);
    (size_kb <= max_prompt_kb, size_kb)
}
