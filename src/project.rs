//! Projects for paco.
//!
//! A project is a directory under `<root>/projects/<name>/` that owns a task
//! list, a log, a summary and daily notes. `index.json` carries the project
//! metadata and the monotonic task-id counter.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime, SubsecRound};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::lock::{FileLock, DEFAULT_LOCK_TIMEOUT_MS};
use crate::storage::Storage;

pub const INDEX_FILE: &str = "index.json";
pub const TASKS_FILE: &str = "tasks.ndjson";
pub const LOG_FILE: &str = "log.md";
pub const SUMMARY_FILE: &str = "summary.md";
pub const DAILY_DIR: &str = "daily";
pub const ARCHIVE_DIR: &str = "archive";
const LOCK_FILE: &str = ".lock";

/// Current local wall-clock time, as persisted in task and index records.
///
/// Truncated to microseconds so records serialise as `...SS.ffffff`.
pub fn local_now() -> NaiveDateTime {
    Local::now().naive_local().trunc_subsecs(6)
}

fn default_next_task_id() -> u64 {
    1
}

/// Contents of `index.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectIndex {
    pub project_name: String,
    pub created: NaiveDateTime,
    #[serde(default = "default_next_task_id")]
    pub next_task_id: u64,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl ProjectIndex {
    pub fn new(project_name: impl Into<String>, tags: Vec<String>) -> Self {
        Self {
            project_name: project_name.into(),
            created: local_now(),
            next_task_id: default_next_task_id(),
            tags,
        }
    }
}

/// What `Project::init` had to create
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct ProjectInit {
    pub dir: bool,
    pub index: bool,
    pub log: bool,
    pub summary: bool,
}

impl ProjectInit {
    pub fn created_anything(&self) -> bool {
        self.dir || self.index || self.log || self.summary
    }
}

/// Handle to one project directory
#[derive(Debug, Clone)]
pub struct Project {
    storage: Storage,
    name: String,
}

impl Project {
    /// Open a handle for `name`; the directory need not exist yet.
    pub fn open(storage: &Storage, name: &str) -> Result<Self> {
        validate_project_name(name)?;
        Ok(Self {
            storage: storage.clone(),
            name: name.to_string(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    pub fn dir(&self) -> PathBuf {
        self.storage.project_dir(&self.name)
    }

    pub fn index_file(&self) -> PathBuf {
        self.dir().join(INDEX_FILE)
    }

    pub fn tasks_file(&self) -> PathBuf {
        self.dir().join(TASKS_FILE)
    }

    pub fn log_file(&self) -> PathBuf {
        self.dir().join(LOG_FILE)
    }

    pub fn summary_file(&self) -> PathBuf {
        self.dir().join(SUMMARY_FILE)
    }

    pub fn daily_dir(&self) -> PathBuf {
        self.dir().join(DAILY_DIR)
    }

    pub fn archive_dir(&self) -> PathBuf {
        self.dir().join(ARCHIVE_DIR)
    }

    pub fn exists(&self) -> bool {
        self.dir().is_dir()
    }

    /// Create the project layout. Existing files are left untouched, so this
    /// is safe to call before every write.
    ///
    /// Takes the project lock; must not be called while holding it.
    pub fn init(&self, tags: &[String]) -> Result<ProjectInit> {
        let mut report = ProjectInit {
            dir: !self.dir().is_dir(),
            ..ProjectInit::default()
        };
        let _lock = self.lock()?;

        fs::create_dir_all(self.archive_dir())?;
        fs::create_dir_all(self.daily_dir())?;

        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.tasks_file())?;

        report.log = self
            .storage
            .write_text_if_missing(&self.log_file(), &format!("# {} - Log\n\n", self.name))?;
        report.summary = self.storage.write_text_if_missing(
            &self.summary_file(),
            &format!("# {} - Summary\n\nProject initialized.\n", self.name),
        )?;

        let index_file = self.index_file();
        if !index_file.exists() {
            let index = ProjectIndex::new(self.name.clone(), normalize_tags(tags));
            self.storage.write_json(&index_file, &index)?;
            report.index = true;
        }

        if report.created_anything() {
            tracing::debug!(project = %self.name, ?report, "project initialized");
        }
        Ok(report)
    }

    /// Read `index.json`; a missing index reads as a fresh one.
    pub fn index(&self) -> Result<ProjectIndex> {
        let path = self.index_file();
        if !path.exists() {
            return Ok(ProjectIndex::new(self.name.clone(), Vec::new()));
        }
        self.storage.read_json(&path)
    }

    /// Take the project's advisory lock.
    ///
    /// Every read-modify-write of the index or task list happens while the
    /// returned guard is alive.
    pub fn lock(&self) -> Result<FileLock> {
        FileLock::acquire(self.dir().join(LOCK_FILE), DEFAULT_LOCK_TIMEOUT_MS)
    }

    /// Hand out the next task id and persist the incremented counter.
    ///
    /// The guard argument ties the call to a held project lock.
    pub(crate) fn allocate_task_id(&self, _lock: &FileLock) -> Result<u64> {
        let mut index = self.index()?;
        let task_id = index.next_task_id.max(1);
        index.next_task_id = task_id + 1;
        self.storage.write_json(&self.index_file(), &index)?;
        Ok(task_id)
    }
}

/// Names of all project directories, sorted. Empty when the root is missing.
pub fn list_projects(storage: &Storage) -> Result<Vec<String>> {
    let dir = storage.projects_dir();
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut names = Vec::new();
    for entry in fs::read_dir(&dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            names.push(name.to_string());
        }
    }
    names.sort();
    Ok(names)
}

/// A project name becomes a single directory component under `projects/`.
pub fn validate_project_name(name: &str) -> Result<()> {
    let invalid = name.trim().is_empty()
        || name != name.trim()
        || name.starts_with('.')
        || name.contains(['/', '\\', '\0'])
        || Path::new(name).components().count() != 1;
    if invalid {
        return Err(Error::InvalidProjectName(name.to_string()));
    }
    Ok(())
}

/// Trim, drop empties and duplicates, keep first-seen order
pub fn normalize_tags(tags: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for tag in tags {
        let tag = tag.trim();
        if tag.is_empty() || out.iter().any(|seen| seen == tag) {
            continue;
        }
        out.push(tag.to_string());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (tempfile::TempDir, Storage) {
        let dir = tempfile::tempdir().expect("tempdir");
        let storage = Storage::new(dir.path());
        storage.init_dirs().expect("init dirs");
        (dir, storage)
    }

    #[test]
    fn init_creates_layout_once() {
        let (_dir, storage) = setup();
        let project = Project::open(&storage, "demo").unwrap();
        assert!(!project.exists());

        let report = project.init(&["work".to_string()]).unwrap();
        assert!(report.dir && report.index && report.log && report.summary);

        assert!(project.archive_dir().is_dir());
        assert!(project.daily_dir().is_dir());
        assert!(project.tasks_file().exists());
        assert_eq!(
            fs::read_to_string(project.log_file()).unwrap(),
            "# demo - Log\n\n"
        );
        assert_eq!(
            fs::read_to_string(project.summary_file()).unwrap(),
            "# demo - Summary\n\nProject initialized.\n"
        );

        let index = project.index().unwrap();
        assert_eq!(index.project_name, "demo");
        assert_eq!(index.next_task_id, 1);
        assert_eq!(index.tags, vec!["work".to_string()]);

        fs::write(project.summary_file(), "custom").unwrap();
        let again = project.init(&[]).unwrap();
        assert!(!again.created_anything());
        assert_eq!(fs::read_to_string(project.summary_file()).unwrap(), "custom");
    }

    #[test]
    fn index_reads_microsecond_timestamps() {
        let (_dir, storage) = setup();
        let project = Project::open(&storage, "legacy").unwrap();
        fs::create_dir_all(project.dir()).unwrap();
        fs::write(
            project.index_file(),
            r#"{"project_name": "legacy", "created": "2024-03-01T09:15:42.123456", "tags": []}"#,
        )
        .unwrap();

        let index = project.index().unwrap();
        assert_eq!(index.next_task_id, 1);
        assert_eq!(index.created.to_string(), "2024-03-01 09:15:42.123456");
    }

    #[test]
    fn local_now_has_microsecond_precision() {
        use chrono::Timelike;

        let now = local_now();
        assert_eq!(now.nanosecond() % 1_000, 0);

        let json = serde_json::to_string(&now).unwrap();
        let fraction = json.trim_matches('"').rsplit('.').next().unwrap_or("");
        assert!(fraction.len() <= 6, "{json}");
    }

    #[test]
    fn allocate_task_id_increments_counter() {
        let (_dir, storage) = setup();
        let project = Project::open(&storage, "demo").unwrap();
        project.init(&[]).unwrap();

        let lock = project.lock().unwrap();
        assert_eq!(project.allocate_task_id(&lock).unwrap(), 1);
        assert_eq!(project.allocate_task_id(&lock).unwrap(), 2);
        drop(lock);

        assert_eq!(project.index().unwrap().next_task_id, 3);
    }

    #[test]
    fn list_projects_is_sorted_and_ignores_files() {
        let (_dir, storage) = setup();
        assert!(list_projects(&storage).unwrap().is_empty());

        for name in ["zeta", "alpha", "mid"] {
            Project::open(&storage, name).unwrap().init(&[]).unwrap();
        }
        fs::write(storage.projects_dir().join("stray.txt"), "x").unwrap();

        assert_eq!(
            list_projects(&storage).unwrap(),
            vec!["alpha".to_string(), "mid".to_string(), "zeta".to_string()]
        );
    }

    #[test]
    fn list_projects_missing_root_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::new(dir.path().join("absent"));
        assert!(list_projects(&storage).unwrap().is_empty());
    }

    #[test]
    fn project_names_are_single_components() {
        for ok in ["demo", "my-project", "Project 2", "a.b"] {
            assert!(validate_project_name(ok).is_ok(), "{ok}");
        }
        for bad in ["", "  ", "..", ".", ".hidden", "a/b", "a\\b", " padded"] {
            assert!(
                matches!(validate_project_name(bad), Err(Error::InvalidProjectName(_))),
                "{bad:?}"
            );
        }
    }

    #[test]
    fn tags_are_deduplicated_in_order() {
        let tags = vec![
            " rust ".to_string(),
            "".to_string(),
            "cli".to_string(),
            "rust".to_string(),
        ];
        assert_eq!(normalize_tags(&tags), vec!["rust".to_string(), "cli".to_string()]);
    }
}
