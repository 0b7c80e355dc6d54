//! paco config command implementations.

use serde::Serialize;
use serde_json::Value;

use crate::cli::Globals;
use crate::config::parse_cli_value;
use crate::error::{Error, Result};
use crate::output::{emit_success, emit_text, HumanOutput};

#[derive(Serialize)]
struct ValueOutput<'a> {
    key: &'a str,
    value: Value,
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

pub fn run_show(globals: &Globals) -> Result<()> {
    let store = globals.config_store()?;
    let effective = store.effective();

    let mut human = HumanOutput::new("Config");
    human.push_summary("path", store.path().display().to_string());
    for (key, value) in &effective {
        human.push_detail(format!("{} = {}", key, display_value(value)));
    }
    if !store.path().exists() {
        human.push_warning("no config file, showing defaults");
        human.push_next_step("paco init");
    }

    emit_success(globals.output(), "config show", &effective, Some(&human))
}

pub fn run_get(globals: &Globals, key: &str) -> Result<()> {
    let store = globals.config_store()?;
    let value = store
        .get(key)
        .ok_or_else(|| Error::InvalidArgument(format!("unknown config key '{}'", key)))?;

    let text = display_value(&value);
    let output = ValueOutput { key, value };
    emit_text(globals.output(), "config get", &output, &text)
}

pub fn run_set(globals: &Globals, key: &str, raw: &str) -> Result<()> {
    let store = globals.config_store()?;
    let value = parse_cli_value(raw);
    store.set(key, value.clone())?;

    let mut human = HumanOutput::new(format!("paco config set: {}", key.trim()));
    human.push_summary("value", display_value(&value));
    human.push_summary("path", store.path().display().to_string());

    let output = ValueOutput {
        key: key.trim(),
        value,
    };
    emit_success(globals.output(), "config set", &output, Some(&human))
}
