//! Free-text records of a project: the log, daily notes and the summary.
//!
//! Log and daily notes are append-only markdown made of timestamped
//! entries (`**[<stamp>]** <text>` followed by a blank line).

use std::path::PathBuf;

use chrono::{NaiveDate, NaiveDateTime};

use crate::error::{Error, Result};
use crate::project::{local_now, Project};

/// Date format of daily-note file names
pub const DATE_FORMAT: &str = "%Y-%m-%d";

const LOG_STAMP_FORMAT: &str = "%Y-%m-%d %H:%M";
const NOTE_STAMP_FORMAT: &str = "%H:%M";

/// Parse a `YYYY-MM-DD` date argument
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| {
        Error::InvalidArgument(format!("invalid date '{}': expected YYYY-MM-DD", value))
    })
}

fn format_entry(stamp: &str, text: &str) -> String {
    format!("**[{}]** {}\n\n", stamp, text)
}

/// Log, daily-note and summary access for one project
#[derive(Debug, Clone)]
pub struct Journal {
    project: Project,
}

impl Journal {
    pub fn new(project: Project) -> Self {
        Self { project }
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    // =========================================================================
    // Log
    // =========================================================================

    pub fn append_log(&self, message: &str) -> Result<()> {
        self.append_log_at(message, local_now())
    }

    pub fn append_log_at(&self, message: &str, at: NaiveDateTime) -> Result<()> {
        self.project.init(&[])?;
        let entry = format_entry(&at.format(LOG_STAMP_FORMAT).to_string(), message);
        self.project
            .storage()
            .append_text(&self.project.log_file(), &entry)
    }

    /// The last `max_lines` lines of the trimmed log, newline-joined.
    ///
    /// Empty when the log is missing or `max_lines` is zero.
    pub fn log_tail(&self, max_lines: usize) -> Result<String> {
        let content = match self.project.storage().read_text(&self.project.log_file())? {
            Some(content) => content,
            None => return Ok(String::new()),
        };
        Ok(tail_lines(&content, max_lines))
    }

    // =========================================================================
    // Daily notes
    // =========================================================================

    pub fn daily_file(&self, date: NaiveDate) -> PathBuf {
        self.project
            .daily_dir()
            .join(format!("{}.md", date.format(DATE_FORMAT)))
    }

    pub fn write_daily_note(&self, note: &str) -> Result<()> {
        self.write_daily_note_at(note, local_now())
    }

    pub fn write_daily_note_at(&self, note: &str, at: NaiveDateTime) -> Result<()> {
        self.project.init(&[])?;
        let entry = format_entry(&at.format(NOTE_STAMP_FORMAT).to_string(), note);
        self.project
            .storage()
            .append_text(&self.daily_file(at.date()), &entry)
    }

    /// Raw content of one day's note, empty if there is none
    pub fn daily_note(&self, date: NaiveDate) -> Result<String> {
        Ok(self
            .project
            .storage()
            .read_text(&self.daily_file(date))?
            .unwrap_or_default())
    }

    /// The newest `days` daily-note files, newest first.
    ///
    /// Each non-empty file renders as `## <date>\n<content>\n`; sections are
    /// separated by a blank line. Empty files still count towards `days`.
    pub fn recent_daily_notes(&self, days: usize) -> Result<String> {
        let daily_dir = self.project.daily_dir();
        if !daily_dir.is_dir() {
            return Ok(String::new());
        }

        let pattern = format!(
            "{}/*.md",
            glob::Pattern::escape(&daily_dir.to_string_lossy())
        );
        let entries = glob::glob(&pattern)
            .map_err(|err| Error::OperationFailed(format!("bad daily-note pattern: {err}")))?;

        let mut files = Vec::new();
        for entry in entries {
            match entry {
                Ok(path) => files.push(path),
                Err(err) => {
                    tracing::warn!(error = %err, "skipping unreadable daily note");
                }
            }
        }
        files.sort_by(|a, b| b.file_name().cmp(&a.file_name()));

        let mut sections = Vec::new();
        for path in files.into_iter().take(days) {
            let date = path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default();
            let content = self.project.storage().read_text(&path)?.unwrap_or_default();
            let content = content.trim();
            if content.is_empty() {
                continue;
            }
            sections.push(format!("## {}\n{}\n", date, content));
        }

        Ok(sections.join("\n"))
    }

    // =========================================================================
    // Summary
    // =========================================================================

    /// The summary text, or a placeholder when the project has none
    pub fn summary(&self) -> Result<String> {
        Ok(self
            .project
            .storage()
            .read_text(&self.project.summary_file())?
            .unwrap_or_else(|| format!("No summary yet for {}", self.project.name())))
    }

    /// Replace the summary
    pub fn set_summary(&self, text: &str) -> Result<()> {
        self.project.init(&[])?;
        let mut body = text.to_string();
        if !body.ends_with('\n') {
            body.push('\n');
        }
        crate::lock::write_atomic_str(self.project.summary_file(), &body)
    }
}

fn tail_lines(content: &str, max_lines: usize) -> String {
    let trimmed = content.trim();
    if trimmed.is_empty() || max_lines == 0 {
        return String::new();
    }
    let lines: Vec<&str> = trimmed.split('\n').collect();
    let start = lines.len().saturating_sub(max_lines);
    lines[start..].join("\n")
}
