//! paco - Personal AI assistant, Contextual and Offline
//!
//! This library provides the core functionality for the paco CLI tool:
//! a plain-file store of per-project records and a bounded context
//! assembler for a local language model.
//!
//! # Core Concepts
//!
//! - **Projects**: Named directories holding tasks, log, daily notes and a summary
//! - **Tasks**: Append-only NDJSON records with sequential per-project IDs
//! - **Guardrails**: `max_tasks`, `max_log_lines` and `max_prompt_kb` bound the context
//! - **Context**: Summary, recent notes, active tasks and log tail in one prompt
//!
//! # Module Organization
//!
//! - `cli`: Command-line interface using clap
//! - `config`: Guardrail configuration in `config.json`
//! - `context`: Bounded context assembly and size check
//! - `error`: Error types and result aliases
//! - `journal`: Log, daily notes and summary
//! - `llm`: Local model subprocess invocation
//! - `lock`: File locking and atomic writes
//! - `output`: Human and JSON output
//! - `project`: Project layout, index and ID allocation
//! - `storage`: Root resolution and file I/O helpers
//! - `task`: Task records and persistence

pub mod cli;
pub mod config;
pub mod context;
pub mod error;
pub mod journal;
pub mod llm;
pub mod lock;
pub mod output;
pub mod project;
pub mod storage;
pub mod task;

pub use error::{Error, Result};
