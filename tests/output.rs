use paco::output::HumanOutput;

#[test]
fn human_output_includes_sections() {
    let mut human = HumanOutput::new("paco task add: 3");
    human.push_summary("project", "demo");
    human.push_detail("[active][high] 3 Write docs");
    human.push_warning("no task with id 9 in demo");
    human.push_next_step("paco task list demo --all");

    let rendered = human.to_string();
    assert!(rendered.contains("paco task add: 3"));
    assert!(rendered.contains("Summary:"));
    assert!(rendered.contains("- project: demo"));
    assert!(rendered.contains("Details:"));
    assert!(rendered.contains("- [active][high] 3 Write docs"));
    assert!(rendered.contains("Warnings:"));
    assert!(rendered.contains("- no task with id 9 in demo"));
    assert!(rendered.contains("Next steps:"));
    assert!(rendered.contains("- paco task list demo --all"));
}

#[test]
fn human_output_omits_empty_sections() {
    let human = HumanOutput::new("paco init: nothing to do");
    let rendered = human.to_string();
    assert_eq!(rendered, "paco init: nothing to do");
}

#[test]
fn human_output_summary_without_value() {
    let mut human = HumanOutput::new("Config");
    human.push_summary("defaults", "");
    assert_eq!(human.to_string(), "Config\n\nSummary:\n- defaults");
}
