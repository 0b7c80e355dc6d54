//! Storage layer for paco
//!
//! All state lives under one root directory (default `~/paco`).
//!
//! # Directory Structure
//!
//! ```text
//! <root>/
//!   config.json                 # Guardrails and model name
//!   projects/
//!     <name>/
//!       index.json              # Project metadata and task-id counter
//!       tasks.ndjson            # One task record per line
//!       log.md                  # Append-only timestamped log
//!       summary.md              # Free-text project summary
//!       daily/<YYYY-MM-DD>.md   # One daily note file per date
//!       archive/                # Reserved
//!       .lock                   # Advisory lock for read-modify-write
//! ```

use std::fs::{self, File};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};

use crate::error::{Error, Result};
use crate::lock;

/// Default root directory name under the user's home
pub const DEFAULT_ROOT_DIR: &str = "paco";

/// Name of the config file within the root
pub const CONFIG_FILE: &str = "config.json";

/// Name of the projects directory within the root
pub const PROJECTS_DIR: &str = "projects";

/// Storage manager for a paco root directory
#[derive(Debug, Clone)]
pub struct Storage {
    root: PathBuf,
}

impl Storage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve the root directory: explicit path first, then `~/paco`.
    ///
    /// The CLI feeds `--root` / `PACO_HOME` into `explicit`.
    pub fn resolve(explicit: Option<PathBuf>) -> Result<Self> {
        if let Some(root) = explicit {
            return Ok(Self::new(root));
        }
        let dirs = directories::BaseDirs::new().ok_or(Error::HomeNotFound)?;
        Ok(Self::new(dirs.home_dir().join(DEFAULT_ROOT_DIR)))
    }

    // =========================================================================
    // Path accessors
    // =========================================================================

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_file(&self) -> PathBuf {
        self.root.join(CONFIG_FILE)
    }

    pub fn projects_dir(&self) -> PathBuf {
        self.root.join(PROJECTS_DIR)
    }

    /// Directory for a project. The name must already be validated.
    pub fn project_dir(&self, name: &str) -> PathBuf {
        self.projects_dir().join(name)
    }

    // =========================================================================
    // Directory initialization
    // =========================================================================

    /// Create the root and `projects/` directories
    pub fn init_dirs(&self) -> Result<()> {
        fs::create_dir_all(&self.root)?;
        fs::create_dir_all(self.projects_dir())?;
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.projects_dir().is_dir()
    }

    // =========================================================================
    // File I/O helpers
    // =========================================================================

    /// Write pretty JSON atomically
    pub fn write_json<T: Serialize>(&self, path: &Path, data: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(data)?;
        lock::write_atomic(path, json.as_bytes())
    }

    /// Read JSON from a file
    pub fn read_json<T: DeserializeOwned>(&self, path: &Path) -> Result<T> {
        let content = fs::read_to_string(path)?;
        let data: T = serde_json::from_str(&content)?;
        Ok(data)
    }

    /// Append one record as a line of NDJSON.
    ///
    /// Not atomic with respect to other writers; callers that also rewrite
    /// the file hold the project lock.
    pub fn append_jsonl<T: Serialize>(&self, path: &Path, record: &T) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string(record)?;
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;

        writeln!(file, "{}", json)?;
        file.sync_all()?;

        Ok(())
    }

    /// Read all records from an NDJSON file; blank lines are skipped and a
    /// missing file reads as empty.
    pub fn read_jsonl<T: DeserializeOwned>(&self, path: &Path) -> Result<Vec<T>> {
        if !path.exists() {
            return Ok(Vec::new());
        }

        let reader = BufReader::new(File::open(path)?);
        let mut records = Vec::new();

        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            let record: T = serde_json::from_str(trimmed).map_err(|err| {
                Error::OperationFailed(format!(
                    "{}:{}: invalid record: {}",
                    path.display(),
                    idx + 1,
                    err
                ))
            })?;
            records.push(record);
        }

        Ok(records)
    }

    /// Replace an NDJSON file with `records`, atomically
    pub fn write_jsonl<T: Serialize>(&self, path: &Path, records: &[T]) -> Result<()> {
        let mut buf = String::new();
        for record in records {
            buf.push_str(&serde_json::to_string(record)?);
            buf.push('\n');
        }
        lock::write_atomic(path, buf.as_bytes())
    }

    /// Append raw text, creating the file if missing
    pub fn append_text(&self, path: &Path, text: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        file.write_all(text.as_bytes())?;
        Ok(())
    }

    /// Read a text file; `None` when it does not exist
    pub fn read_text(&self, path: &Path) -> Result<Option<String>> {
        match fs::read_to_string(path) {
            Ok(content) => Ok(Some(content)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    /// Write a text file only if it does not exist yet.
    ///
    /// Returns whether the file was created.
    pub fn write_text_if_missing(&self, path: &Path, text: &str) -> Result<bool> {
        if path.exists() {
            return Ok(false);
        }
        lock::write_atomic_str(path, text)?;
        Ok(true)
    }
}
