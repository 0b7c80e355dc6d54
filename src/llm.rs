//! Local LLM invocation.
//!
//! Runs `<binary> run <model>` (ollama by default), feeds the prompt on
//! stdin and returns stdout. Failures never propagate as errors: a missing
//! binary, a non-zero exit or a timeout come back as a readable
//! `Error...` string in place of the response.

use std::io::{Read, Write};
use std::process::{Command, Stdio};
use std::thread;
use std::time::Duration;

use thiserror::Error;
use wait_timeout::ChildExt;

/// Binary invoked when none is configured
pub const DEFAULT_LLM_BINARY: &str = "ollama";

/// Upper bound on one model call
pub const LLM_TIMEOUT_SECS: u64 = 120;

/// System prompt used by `paco ask`; the assembled context is appended.
pub const ASK_SYSTEM_PROMPT: &str = "You are PACO, a personal assistant that runs fully offline. \
Answer using the project context below. Be concise, and refer to tasks by their ID.";

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Error: {binary} not found. Please install {binary} first.")]
    NotFound { binary: String },

    #[error("Error: LLM request timed out.")]
    TimedOut,

    #[error("Error calling {binary}: {stderr}")]
    Failed { binary: String, stderr: String },

    #[error("Error: {0}")]
    Io(#[from] std::io::Error),
}

/// Blocking client for a local model binary
#[derive(Debug, Clone)]
pub struct LlmClient {
    binary: String,
    timeout: Duration,
}

impl Default for LlmClient {
    fn default() -> Self {
        Self::new(DEFAULT_LLM_BINARY)
    }
}

impl LlmClient {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            timeout: Duration::from_secs(LLM_TIMEOUT_SECS),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Run the model and return its trimmed output, or an error string.
    pub fn generate(&self, prompt: &str, model: &str, system_prompt: Option<&str>) -> String {
        match self.try_generate(prompt, model, system_prompt) {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!(binary = %self.binary, model, error = %err, "llm call failed");
                err.to_string()
            }
        }
    }

    pub fn try_generate(
        &self,
        prompt: &str,
        model: &str,
        system_prompt: Option<&str>,
    ) -> Result<String, LlmError> {
        let input = compose_prompt(prompt, system_prompt).into_bytes();
        tracing::debug!(binary = %self.binary, model, bytes = input.len(), "invoking llm");

        let mut child = match Command::new(&self.binary)
            .arg("run")
            .arg(model)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
        {
            Ok(child) => child,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(LlmError::NotFound {
                    binary: self.binary.clone(),
                })
            }
            Err(err) => return Err(err.into()),
        };

        // Feed stdin and drain both pipes on their own threads so a chatty
        // child cannot deadlock against a full pipe.
        let stdin = child.stdin.take();
        let writer = thread::spawn(move || {
            if let Some(mut stdin) = stdin {
                let _ = stdin.write_all(&input);
            }
        });
        let stdout = child.stdout.take();
        let stdout_reader = thread::spawn(move || read_pipe(stdout));
        let stderr = child.stderr.take();
        let stderr_reader = thread::spawn(move || read_pipe(stderr));

        let status = match child.wait_timeout(self.timeout)? {
            Some(status) => status,
            None => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(LlmError::TimedOut);
            }
        };

        let _ = writer.join();
        let stdout = stdout_reader.join().unwrap_or_default();
        let stderr = stderr_reader.join().unwrap_or_default();

        if !status.success() {
            return Err(LlmError::Failed {
                binary: self.binary.clone(),
                stderr: stderr.trim_end().to_string(),
            });
        }

        Ok(stdout.trim().to_string())
    }
}

/// System prompt and user prompt separated by a blank line
pub fn compose_prompt(prompt: &str, system_prompt: Option<&str>) -> String {
    match system_prompt {
        Some(system) if !system.is_empty() => format!("{}\n\n{}", system, prompt),
        _ => prompt.to_string(),
    }
}

/// System prompt for a question about a project
pub fn ask_system_prompt(context: &str) -> String {
    format!("{}\n\n{}", ASK_SYSTEM_PROMPT, context)
}

fn read_pipe<R: Read>(pipe: Option<R>) -> String {
    let mut buf = Vec::new();
    if let Some(mut pipe) = pipe {
        let _ = pipe.read_to_end(&mut buf);
    }
    String::from_utf8_lossy(&buf).into_owned()
}
