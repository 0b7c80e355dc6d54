//! Command-line interface for paco
//!
//! This module defines the CLI structure using clap derive macros.
//! Each command group is implemented in its own submodule.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{Config, ConfigStore};
use crate::error::Result;
use crate::output::OutputOptions;
use crate::project::Project;
use crate::storage::Storage;

mod config;
mod context;
mod init;
mod journal;
mod project;
mod task;

/// paco - Personal AI assistant, Contextual and Offline
///
/// Keeps per-project tasks, logs, daily notes and summaries in plain files
/// and assembles a size-bounded context for a local language model.
#[derive(Parser, Debug)]
#[command(name = "paco")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Root directory for paco data (defaults to ~/paco)
    #[arg(long, global = true, env = "PACO_HOME")]
    pub root: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the paco root directory and default config
    Init,

    /// Project management
    #[command(subcommand)]
    Project(ProjectCommands),

    /// Task management
    #[command(subcommand)]
    Task(TaskCommands),

    /// Project log
    #[command(subcommand)]
    Log(LogCommands),

    /// Daily notes
    #[command(subcommand)]
    Note(NoteCommands),

    /// Project summary
    #[command(subcommand)]
    Summary(SummaryCommands),

    /// Configuration (guardrails and model)
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Print the bounded LLM context for a project
    Context {
        /// Project name
        project: String,
    },

    /// Ask the local model a question about a project
    Ask {
        /// Project name
        project: String,

        /// Question for the model
        question: String,

        /// Model to use instead of the configured one
        #[arg(long)]
        model: Option<String>,

        /// Send the context even when it exceeds max_prompt_kb
        #[arg(long)]
        force: bool,

        /// LLM binary to invoke
        #[arg(long, env = "PACO_LLM_BIN", default_value = crate::llm::DEFAULT_LLM_BINARY)]
        llm_bin: String,
    },
}

/// Project subcommands
#[derive(Subcommand, Debug)]
pub enum ProjectCommands {
    /// Create a project
    New {
        /// Project name
        name: String,

        /// Tags recorded in the project index
        #[arg(long = "tag")]
        tags: Vec<String>,
    },

    /// List projects
    List,

    /// Show project metadata and task counts
    Show {
        /// Project name
        name: String,
    },
}

/// Task subcommands
#[derive(Subcommand, Debug)]
pub enum TaskCommands {
    /// Add a task
    Add {
        /// Project name
        project: String,

        /// Task title
        title: String,

        /// Priority: high, medium, low
        #[arg(long, default_value = crate::task::DEFAULT_TASK_PRIORITY)]
        priority: String,

        /// Tags for the task
        #[arg(long = "tag")]
        tags: Vec<String>,
    },

    /// List tasks (active by default)
    List {
        /// Project name
        project: String,

        /// Only tasks with this status
        #[arg(long, conflicts_with = "all")]
        status: Option<String>,

        /// All tasks regardless of status
        #[arg(long)]
        all: bool,
    },

    /// Mark a task completed
    Done {
        /// Project name
        project: String,

        /// Task ID
        id: u64,
    },

    /// Set a task's status
    Status {
        /// Project name
        project: String,

        /// Task ID
        id: u64,

        /// New status (free-form)
        status: String,
    },
}

/// Log subcommands
#[derive(Subcommand, Debug)]
pub enum LogCommands {
    /// Append a timestamped log entry
    Add {
        /// Project name
        project: String,

        /// Log text
        text: String,
    },

    /// Show the end of the log
    Tail {
        /// Project name
        project: String,

        /// Number of lines (defaults to max_log_lines)
        #[arg(long)]
        lines: Option<usize>,
    },
}

/// Daily note subcommands
#[derive(Subcommand, Debug)]
pub enum NoteCommands {
    /// Append to today's note
    Add {
        /// Project name
        project: String,

        /// Note text
        text: String,
    },

    /// Show one day's note
    Show {
        /// Project name
        project: String,

        /// Date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,
    },

    /// Show the most recent notes
    Recent {
        /// Project name
        project: String,

        /// Number of note files
        #[arg(long, default_value = "7")]
        days: usize,
    },
}

/// Summary subcommands
#[derive(Subcommand, Debug)]
pub enum SummaryCommands {
    /// Print the summary
    Show {
        /// Project name
        project: String,
    },

    /// Replace the summary
    Set {
        /// Project name
        project: String,

        /// New summary text
        text: String,
    },
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show,

    /// Print one value
    Get {
        /// Config key
        key: String,
    },

    /// Set one value (parsed as JSON, else stored as a string)
    Set {
        /// Config key
        key: String,

        /// New value
        value: String,
    },
}

/// Flags shared by every command
#[derive(Debug, Clone)]
pub struct Globals {
    pub root: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

impl Globals {
    pub fn output(&self) -> OutputOptions {
        OutputOptions {
            json: self.json,
            quiet: self.quiet,
        }
    }

    pub fn storage(&self) -> Result<Storage> {
        Storage::resolve(self.root.clone())
    }

    pub fn config_store(&self) -> Result<ConfigStore> {
        Ok(ConfigStore::for_storage(&self.storage()?))
    }

    pub fn config(&self) -> Result<Config> {
        Ok(self.config_store()?.load())
    }

    pub fn project(&self, name: &str) -> Result<Project> {
        Project::open(&self.storage()?, name)
    }
}

impl Cli {
    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        let globals = Globals {
            root: self.root,
            json: self.json,
            quiet: self.quiet,
        };

        match self.command {
            Commands::Init => init::run(&globals),
            Commands::Project(cmd) => match cmd {
                ProjectCommands::New { name, tags } => {
                    project::run_new(&globals, project::NewOptions { name, tags })
                }
                ProjectCommands::List => project::run_list(&globals),
                ProjectCommands::Show { name } => project::run_show(&globals, &name),
            },
            Commands::Task(cmd) => match cmd {
                TaskCommands::Add {
                    project,
                    title,
                    priority,
                    tags,
                } => task::run_add(
                    &globals,
                    task::AddOptions {
                        project,
                        title,
                        priority,
                        tags,
                    },
                ),
                TaskCommands::List {
                    project,
                    status,
                    all,
                } => task::run_list(
                    &globals,
                    task::ListOptions {
                        project,
                        status,
                        all,
                    },
                ),
                TaskCommands::Done { project, id } => task::run_status(
                    &globals,
                    task::StatusOptions {
                        project,
                        id,
                        status: crate::task::STATUS_COMPLETED.to_string(),
                        command: "task done",
                    },
                ),
                TaskCommands::Status { project, id, status } => task::run_status(
                    &globals,
                    task::StatusOptions {
                        project,
                        id,
                        status,
                        command: "task status",
                    },
                ),
            },
            Commands::Log(cmd) => match cmd {
                LogCommands::Add { project, text } => journal::run_log_add(&globals, &project, &text),
                LogCommands::Tail { project, lines } => {
                    journal::run_log_tail(&globals, &project, lines)
                }
            },
            Commands::Note(cmd) => match cmd {
                NoteCommands::Add { project, text } => {
                    journal::run_note_add(&globals, &project, &text)
                }
                NoteCommands::Show { project, date } => {
                    journal::run_note_show(&globals, &project, date.as_deref())
                }
                NoteCommands::Recent { project, days } => {
                    journal::run_note_recent(&globals, &project, days)
                }
            },
            Commands::Summary(cmd) => match cmd {
                SummaryCommands::Show { project } => journal::run_summary_show(&globals, &project),
                SummaryCommands::Set { project, text } => {
                    journal::run_summary_set(&globals, &project, &text)
                }
            },
            Commands::Config(cmd) => match cmd {
                ConfigCommands::Show => config::run_show(&globals),
                ConfigCommands::Get { key } => config::run_get(&globals, &key),
                ConfigCommands::Set { key, value } => config::run_set(&globals, &key, &value),
            },
            Commands::Context { project } => context::run_context(&globals, &project),
            Commands::Ask {
                project,
                question,
                model,
                force,
                llm_bin,
            } => context::run_ask(
                &globals,
                context::AskOptions {
                    project,
                    question,
                    model,
                    force,
                    llm_bin,
                },
            ),
        }
    }
}
