//! paco init command implementation
//!
//! Creates the root directory layout and a default `config.json`.

use std::path::PathBuf;

use crate::cli::Globals;
use crate::config::ConfigStore;
use crate::error::Result;
use crate::output::{emit_success, HumanOutput};

#[derive(serde::Serialize)]
struct InitReport {
    root: PathBuf,
    created: InitCreated,
}

#[derive(serde::Serialize)]
struct InitCreated {
    root: bool,
    config: bool,
}

pub fn run(globals: &Globals) -> Result<()> {
    let storage = globals.storage()?;
    let created_root = !storage.is_initialized();
    storage.init_dirs()?;
    let created_config = ConfigStore::for_storage(&storage).init()?;

    let report = InitReport {
        root: storage.root().to_path_buf(),
        created: InitCreated {
            root: created_root,
            config: created_config,
        },
    };

    let mut created_items = Vec::new();
    if created_root {
        created_items.push("projects/");
    }
    if created_config {
        created_items.push(crate::storage::CONFIG_FILE);
    }

    let header = if created_items.is_empty() {
        "paco init: nothing to do"
    } else {
        "paco init: initialized"
    };

    let mut human = HumanOutput::new(header);
    human.push_summary("root", storage.root().display().to_string());
    human.push_summary(
        "created",
        if created_items.is_empty() {
            "none".to_string()
        } else {
            created_items.join(", ")
        },
    );
    human.push_next_step("paco project new <name>");

    emit_success(globals.output(), "init", &report, Some(&human))
}
