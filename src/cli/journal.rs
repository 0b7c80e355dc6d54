//! paco log, note and summary command implementations.

use serde::Serialize;

use crate::cli::Globals;
use crate::error::Result;
use crate::journal::{parse_date, Journal, DATE_FORMAT};
use crate::output::{emit_success, emit_text, HumanOutput};
use crate::project::local_now;

#[derive(Serialize)]
struct AppendOutput<'a> {
    project: &'a str,
    path: String,
}

#[derive(Serialize)]
struct TextOutput<'a> {
    project: &'a str,
    text: &'a str,
}

#[derive(Serialize)]
struct NoteOutput<'a> {
    project: &'a str,
    date: String,
    text: &'a str,
}

fn journal(globals: &Globals, project: &str) -> Result<Journal> {
    Ok(Journal::new(globals.project(project)?))
}

pub fn run_log_add(globals: &Globals, project: &str, text: &str) -> Result<()> {
    let journal = journal(globals, project)?;
    journal.append_log(text)?;

    let path = journal.project().log_file().display().to_string();
    let mut human = HumanOutput::new(format!("paco log add: {}", journal.project().name()));
    human.push_summary("path", path.clone());

    let output = AppendOutput {
        project: journal.project().name(),
        path,
    };
    emit_success(globals.output(), "log add", &output, Some(&human))
}

pub fn run_log_tail(globals: &Globals, project: &str, lines: Option<usize>) -> Result<()> {
    let journal = journal(globals, project)?;
    let lines = match lines {
        Some(lines) => lines,
        None => globals.config()?.max_log_lines,
    };
    let tail = journal.log_tail(lines)?;

    let output = TextOutput {
        project: journal.project().name(),
        text: &tail,
    };
    emit_text(globals.output(), "log tail", &output, &tail)
}

pub fn run_note_add(globals: &Globals, project: &str, text: &str) -> Result<()> {
    let journal = journal(globals, project)?;
    let now = local_now();
    journal.write_daily_note_at(text, now)?;

    let path = journal.daily_file(now.date()).display().to_string();
    let mut human = HumanOutput::new(format!("paco note add: {}", journal.project().name()));
    human.push_summary("date", now.format(DATE_FORMAT).to_string());
    human.push_summary("path", path.clone());

    let output = AppendOutput {
        project: journal.project().name(),
        path,
    };
    emit_success(globals.output(), "note add", &output, Some(&human))
}

pub fn run_note_show(globals: &Globals, project: &str, date: Option<&str>) -> Result<()> {
    let journal = journal(globals, project)?;
    let date = match date {
        Some(value) => parse_date(value)?,
        None => local_now().date(),
    };
    let text = journal.daily_note(date)?;

    let output = NoteOutput {
        project: journal.project().name(),
        date: date.format(DATE_FORMAT).to_string(),
        text: &text,
    };
    emit_text(globals.output(), "note show", &output, &text)
}

pub fn run_note_recent(globals: &Globals, project: &str, days: usize) -> Result<()> {
    let journal = journal(globals, project)?;
    let text = journal.recent_daily_notes(days)?;

    let output = TextOutput {
        project: journal.project().name(),
        text: &text,
    };
    emit_text(globals.output(), "note recent", &output, &text)
}

pub fn run_summary_show(globals: &Globals, project: &str) -> Result<()> {
    let journal = journal(globals, project)?;
    let text = journal.summary()?;

    let output = TextOutput {
        project: journal.project().name(),
        text: &text,
    };
    emit_text(globals.output(), "summary show", &output, &text)
}

pub fn run_summary_set(globals: &Globals, project: &str, text: &str) -> Result<()> {
    let journal = journal(globals, project)?;
    journal.set_summary(text)?;

    let mut human = HumanOutput::new(format!("paco summary set: {}", journal.project().name()));
    human.push_summary("path", journal.project().summary_file().display().to_string());

    let output = TextOutput {
        project: journal.project().name(),
        text,
    };
    emit_success(globals.output(), "summary set", &output, Some(&human))
}
