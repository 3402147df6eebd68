//! E2E tests for `fsdeploy status`

mod common;

use common::*;

#[test]
fn status_without_config_has_no_target() {
    let env = TestEnv::builder().with_file("index.html", "<html>").build();

    let result = env.run(&["status"]);

    assert!(result.is_success(), "{}", result.combined_output());
    assert_output_contains!(result, "Workspace doesn't have a deployment target");
}

#[test]
fn status_lists_workspace_rules() {
    let env = TestEnv::builder()
        .with_file("index.html", "<html>")
        .with_rule(".", "{out}", "")
        .build();

    let result = env.run(&["status"]);

    assert!(result.is_success(), "{}", result.combined_output());
    assert_output_contains!(result, "Workspace has a deployment target");
    let expected = format!(
        "'{}' to '{}'",
        env.workspace_root().display(),
        env.output.path().display()
    );
    assert_output_contains!(result, &expected);
}

#[test]
fn status_for_file_outside_every_rule() {
    let env = TestEnv::builder()
        .with_file("index.html", "<html>")
        .with_file("notes.md", "# notes")
        .with_rule(".", "{out}", "include = '*.html'")
        .build();

    let result = env.run(&["status", "notes.md"]);

    assert_output_contains!(result, "Workspace has a deployment target but file isn't in scope");
}

#[test]
fn status_for_file_under_nested_rule() {
    let env = TestEnv::builder()
        .with_file("src/app.js", "app")
        .with_rule("src", "{out}", "")
        .build();

    let result = env.run(&["status", "--json", "src/app.js"]);

    assert!(result.is_success(), "{}", result.combined_output());
    let lines = result.json_lines();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["event"], "status");
    assert_eq!(lines[0]["status"], "file_only");
    assert_eq!(lines[0]["workspace_rules"].as_array().unwrap().len(), 0);
    assert_eq!(lines[0]["file_rules"].as_array().unwrap().len(), 1);
}
