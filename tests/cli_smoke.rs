use assert_cmd::Command;
use predicates::str::contains;

#[test]
fn paco_help_works() {
    Command::cargo_bin("paco")
        .expect("binary")
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("Personal AI assistant"));
}

#[test]
fn subcommand_help_works() {
    let subcommands = [
        "init", "project", "task", "log", "note", "summary", "config", "context", "ask",
    ];

    for cmd in subcommands {
        Command::cargo_bin("paco")
            .expect("binary")
            .arg(cmd)
            .arg("--help")
            .assert()
            .success();
    }
}

#[test]
fn missing_subcommand_fails() {
    Command::cargo_bin("paco")
        .expect("binary")
        .assert()
        .failure();
}
