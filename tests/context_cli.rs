mod support;

use predicates::prelude::*;
use predicates::str::contains;

use support::TestHome;

fn seed(home: &TestHome) {
    for (title, priority) in [("A", "high"), ("B", "medium"), ("C", "low")] {
        home.cmd()
            .args(["task", "add", "demo", title, "--priority", priority])
            .assert()
            .success();
    }
    home.cmd()
        .args(["log", "add", "demo", "Kicked off"])
        .assert()
        .success();
}

#[test]
fn context_prints_sections_and_reports_size_on_stderr() {
    let home = TestHome::new();
    seed(&home);

    home.cmd()
        .args(["context", "demo"])
        .assert()
        .success()
        .stdout(contains("## Project Summary\n# demo - Summary"))
        .stdout(contains(
            "## Active Tasks\n- [ID:1] [high] A\n- [ID:2] [medium] B\n- [ID:3] [low] C\n\n## Recent Log\n",
        ))
        .stdout(contains("Kicked off"))
        .stderr(contains("3/3 active tasks"));
}

#[test]
fn context_json_reports_limit() {
    let home = TestHome::new();
    seed(&home);
    home.cmd()
        .args(["config", "set", "max_prompt_kb", "0.01"])
        .assert()
        .success();

    let out = home.json(&["context", "demo"]);
    assert_eq!(out["data"]["within_limit"], false);
    assert_eq!(out["data"]["max_prompt_kb"], 0.01);
    let text = out["data"]["text"].as_str().unwrap_or_default();
    assert!(text.contains("- [ID:3] [low] C"));
}

#[test]
fn context_respects_max_tasks() {
    let home = TestHome::new();
    seed(&home);
    home.cmd()
        .args(["config", "set", "max_tasks", "1"])
        .assert()
        .success();

    home.cmd()
        .args(["context", "demo"])
        .assert()
        .success()
        .stdout(contains("- [ID:1] [high] A"))
        .stdout(contains("[ID:2]").not())
        .stderr(contains("1/3 active tasks"));
}

#[test]
fn ask_refuses_over_limit_context() {
    let home = TestHome::new();
    seed(&home);
    home.cmd()
        .args(["config", "set", "max_prompt_kb", "0.01"])
        .assert()
        .success();

    home.cmd()
        .args(["ask", "demo", "What next?", "--llm-bin", "paco-test-missing-llm"])
        .assert()
        .code(3)
        .stderr(contains("Prompt too large"))
        .stderr(contains("hint: paco config set max_tasks <smaller>"));

    home.cmd()
        .args([
            "--json",
            "ask",
            "demo",
            "What next?",
            "--llm-bin",
            "paco-test-missing-llm",
        ])
        .assert()
        .code(3)
        .stdout(contains("\"kind\": \"guardrail_blocked\""));
}

#[test]
fn ask_reports_missing_llm_as_text() {
    let home = TestHome::new();
    seed(&home);

    home.cmd()
        .args(["ask", "demo", "What next?"])
        .env("PACO_LLM_BIN", "paco-test-missing-llm")
        .assert()
        .success()
        .stdout(contains(
            "Error: paco-test-missing-llm not found. Please install paco-test-missing-llm first.",
        ));
}

#[cfg(unix)]
mod unix {
    use super::*;
    use std::os::unix::fs::PermissionsExt;

    fn fake_llm(home: &TestHome) -> String {
        let path = home
            .write_file("bin/fake-llm", "#!/bin/sh\necho \"model=$2\"\ncat\n")
            .expect("write script");
        let mut perms = std::fs::metadata(&path).expect("metadata").permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&path, perms).expect("chmod");
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn ask_sends_context_and_question_to_model() {
        let home = TestHome::new();
        seed(&home);
        let bin = fake_llm(&home);

        home.cmd()
            .args(["ask", "demo", "What next?", "--llm-bin", &bin])
            .assert()
            .success()
            .stdout(contains("model=llama3.2"))
            .stdout(contains("You are PACO"))
            .stdout(contains("- [ID:1] [high] A"))
            .stdout(contains("\n\nWhat next?"));
    }

    #[test]
    fn ask_force_and_model_override() {
        let home = TestHome::new();
        seed(&home);
        let bin = fake_llm(&home);
        home.cmd()
            .args(["config", "set", "max_prompt_kb", "0.01"])
            .assert()
            .success();

        let out = home.json(&[
            "ask",
            "demo",
            "Summarize",
            "--force",
            "--model",
            "mistral",
            "--llm-bin",
            &bin,
        ]);
        assert_eq!(out["data"]["model"], "mistral");
        assert_eq!(out["data"]["forced"], true);
        let response = out["data"]["response"].as_str().unwrap_or_default();
        assert!(response.starts_with("model=mistral"));
        assert!(response.ends_with("Summarize"));
    }
}
