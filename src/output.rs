//! Output for paco commands.
//!
//! Every command ends in one of three shapes: a [`HumanOutput`] report, raw
//! record text (summaries, notes, log tails, context), or with `--json` a
//! `paco.v1` envelope on stdout. Errors use the same envelope with
//! `status: "error"`, or `error:`/`hint:` lines on stderr.

use std::fmt;

use serde::Serialize;

use crate::error::{exit_codes, Error, Result};

pub const SCHEMA_VERSION: &str = "paco.v1";

#[derive(Debug, Clone, Copy)]
pub struct OutputOptions {
    pub json: bool,
    pub quiet: bool,
}

/// Human-readable command report.
///
/// Renders as the header followed by whichever of `Summary`, `Details`,
/// `Warnings` and `Next steps` are non-empty. Warnings and next steps are
/// also carried into the JSON envelope.
#[derive(Debug, Clone, Default)]
pub struct HumanOutput {
    header: String,
    summary: Vec<(String, String)>,
    details: Vec<String>,
    warnings: Vec<String>,
    next_steps: Vec<String>,
}

impl HumanOutput {
    pub fn new(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            ..Self::default()
        }
    }

    /// `- key: value`, or `- key` when the value is empty
    pub fn push_summary(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.summary.push((key.into(), value.into()));
    }

    pub fn push_detail(&mut self, value: impl Into<String>) {
        self.details.push(value.into());
    }

    pub fn push_warning(&mut self, value: impl Into<String>) {
        self.warnings.push(value.into());
    }

    pub fn push_next_step(&mut self, value: impl Into<String>) {
        self.next_steps.push(value.into());
    }
}

impl fmt::Display for HumanOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.header)?;

        if !self.summary.is_empty() {
            f.write_str("\n\nSummary:")?;
            for (key, value) in &self.summary {
                if value.is_empty() {
                    write!(f, "\n- {key}")?;
                } else {
                    write!(f, "\n- {key}: {value}")?;
                }
            }
        }

        let sections = [
            ("Details", &self.details),
            ("Warnings", &self.warnings),
            ("Next steps", &self.next_steps),
        ];
        for (title, items) in sections {
            if items.is_empty() {
                continue;
            }
            write!(f, "\n\n{title}:")?;
            for item in items {
                write!(f, "\n- {item}")?;
            }
        }
        Ok(())
    }
}

#[derive(Serialize)]
#[serde(rename_all = "lowercase")]
enum Status {
    Success,
    Error,
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
    code: i32,
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

/// The `paco.v1` JSON envelope; exactly one of `data` and `error` is set
#[derive(Serialize)]
struct Envelope<'a, T: Serialize> {
    schema_version: &'static str,
    command: &'a str,
    status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<&'a T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<ErrorBody>,
    #[serde(skip_serializing_if = "<[String]>::is_empty")]
    warnings: &'a [String],
    #[serde(skip_serializing_if = "<[String]>::is_empty")]
    next_steps: &'a [String],
}

impl<T: Serialize> Envelope<'_, T> {
    fn print(&self) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(self)?);
        Ok(())
    }
}

/// Report a successful command
pub fn emit_success<T: Serialize>(
    options: OutputOptions,
    command: &str,
    data: &T,
    human: Option<&HumanOutput>,
) -> Result<()> {
    if options.json {
        return Envelope {
            schema_version: SCHEMA_VERSION,
            command,
            status: Status::Success,
            data: Some(data),
            error: None,
            warnings: human.map(|h| h.warnings.as_slice()).unwrap_or_default(),
            next_steps: human.map(|h| h.next_steps.as_slice()).unwrap_or_default(),
        }
        .print();
    }

    if let (false, Some(human)) = (options.quiet, human) {
        println!("{human}");
    }
    Ok(())
}

/// Report a command whose human output is record text printed verbatim.
///
/// Nothing is printed for empty text.
pub fn emit_text<T: Serialize>(
    options: OutputOptions,
    command: &str,
    data: &T,
    text: &str,
) -> Result<()> {
    if options.json {
        return emit_success(options, command, data, None);
    }
    if !options.quiet && !text.is_empty() {
        println!("{}", text.trim_end());
    }
    Ok(())
}

/// Report a failed command. The caller exits with `err.exit_code()`.
pub fn emit_error(command: &str, err: &Error, json: bool) -> Result<()> {
    let next_steps = error_next_steps(err);

    if json {
        return Envelope::<()> {
            schema_version: SCHEMA_VERSION,
            command,
            status: Status::Error,
            data: None,
            error: Some(ErrorBody {
                message: err.to_string(),
                code: err.exit_code(),
                kind: error_kind(err),
                details: err.details(),
            }),
            warnings: &[],
            next_steps: &next_steps,
        }
        .print();
    }

    eprintln!("error: {err}");
    if let Some(hint) = next_steps.first() {
        eprintln!("hint: {hint}");
    }
    Ok(())
}

/// Command name for error envelopes, e.g. `task add`
pub fn infer_command_name_from_args() -> String {
    command_name_from(std::env::args().skip(1))
}

fn command_name_from(args: impl IntoIterator<Item = String>) -> String {
    let mut positional = Vec::with_capacity(2);
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        // `--root <dir>` takes a separate value
        if arg == "--root" {
            args.next();
            continue;
        }
        if arg.starts_with('-') {
            continue;
        }
        positional.push(arg);
        if positional.len() == 2 {
            break;
        }
    }

    match positional.as_slice() {
        [] => "paco".to_string(),
        [group, sub] if is_command_group(group) => format!("{group} {sub}"),
        [command, ..] => command.clone(),
    }
}

fn is_command_group(command: &str) -> bool {
    matches!(
        command,
        "project" | "task" | "log" | "note" | "summary" | "config"
    )
}

fn error_kind(err: &Error) -> &'static str {
    match err.exit_code() {
        exit_codes::USER_ERROR => "user_error",
        exit_codes::GUARDRAIL_BLOCKED => "guardrail_blocked",
        _ => "operation_failed",
    }
}

fn error_next_steps(err: &Error) -> Vec<String> {
    let steps: &[&str] = match err {
        Error::PromptTooLarge { .. } => &[
            "paco config set max_tasks <smaller>",
            "paco ask <project> <question> --force",
        ],
        Error::HomeNotFound => &["paco --root <dir> init"],
        Error::InvalidProjectName(_) => &["use a plain name without '/' or a leading '.'"],
        Error::InvalidConfig(_) => &["paco config show"],
        Error::LockFailed(_) => &["retry once the other paco process finishes"],
        _ => &[],
    };
    steps.iter().map(|step| step.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn command_name_includes_subcommand_for_groups() {
        assert_eq!(command_name_from(args(&["task", "add", "demo", "x"])), "task add");
        assert_eq!(
            command_name_from(args(&["--json", "--root", "/tmp/p", "config", "set"])),
            "config set"
        );
        assert_eq!(command_name_from(args(&["context", "demo"])), "context");
        assert_eq!(command_name_from(args(&["task"])), "task");
        assert_eq!(command_name_from(args(&["--quiet"])), "paco");
    }

    #[test]
    fn guardrail_errors_get_their_own_kind() {
        let err = Error::PromptTooLarge {
            size_kb: 20.0,
            max_kb: 15.0,
        };
        assert_eq!(error_kind(&err), "guardrail_blocked");
        assert_eq!(error_next_steps(&err).len(), 2);
        assert_eq!(error_kind(&Error::HomeNotFound), "user_error");
    }
}
