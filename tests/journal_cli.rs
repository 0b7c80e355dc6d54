mod support;

use predicates::str::contains;

use support::TestHome;

#[test]
fn log_add_and_tail() -> Result<(), Box<dyn std::error::Error>> {
    let home = TestHome::new();
    for i in 0..5 {
        home.cmd()
            .args(["log", "add", "demo", &format!("entry {i}")])
            .assert()
            .success();
    }

    let log = home.read_file("projects/demo/log.md")?;
    assert!(log.starts_with("# demo - Log\n\n**["));
    assert!(log.ends_with("** entry 4\n\n"));

    let tail = home.json(&["log", "tail", "demo", "--lines", "3"]);
    let text = tail["data"]["text"].as_str().unwrap_or_default();
    assert_eq!(text.lines().count(), 3);
    assert!(text.ends_with("entry 4"));
    Ok(())
}

#[test]
fn log_tail_defaults_to_max_log_lines() {
    let home = TestHome::new();
    home.cmd()
        .args(["config", "set", "max_log_lines", "1"])
        .assert()
        .success();
    home.cmd()
        .args(["log", "add", "demo", "last words"])
        .assert()
        .success();

    let tail = home.json(&["log", "tail", "demo"]);
    let text = tail["data"]["text"].as_str().unwrap_or_default();
    assert_eq!(text.lines().count(), 1);
    assert!(text.contains("last words"));
}

#[test]
fn note_add_show_recent() -> Result<(), Box<dyn std::error::Error>> {
    let home = TestHome::new();
    home.cmd()
        .args(["note", "add", "demo", "Standup went fine"])
        .assert()
        .success();
    home.write_file(
        "projects/demo/daily/2020-01-01.md",
        "**[08:00]** Old note\n\n",
    )?;

    home.cmd()
        .args(["note", "show", "demo"])
        .assert()
        .success()
        .stdout(contains("Standup went fine"));

    home.cmd()
        .args(["note", "show", "demo", "--date", "2020-01-01"])
        .assert()
        .success()
        .stdout(contains("Old note"));

    home.cmd()
        .args(["note", "show", "demo", "--date", "not-a-date"])
        .assert()
        .code(2);

    let recent = home.json(&["note", "recent", "demo", "--days", "1"]);
    let text = recent["data"]["text"].as_str().unwrap_or_default();
    assert!(text.contains("Standup went fine"));
    assert!(!text.contains("Old note"));

    home.cmd()
        .args(["note", "recent", "demo"])
        .assert()
        .success()
        .stdout(contains("## 2020-01-01"));
    Ok(())
}

#[test]
fn summary_show_and_set() -> Result<(), Box<dyn std::error::Error>> {
    let home = TestHome::new();
    home.cmd()
        .args(["summary", "show", "fresh"])
        .assert()
        .success()
        .stdout(contains("No summary yet for fresh"));

    home.cmd()
        .args(["summary", "set", "fresh", "Ship v1 by June"])
        .assert()
        .success();
    assert_eq!(home.read_file("projects/fresh/summary.md")?, "Ship v1 by June\n");

    home.cmd()
        .args(["summary", "show", "fresh"])
        .assert()
        .success()
        .stdout("Ship v1 by June\n");
    Ok(())
}
