//! E2E tests for `fsdeploy watch`

mod common;

use std::thread;
use std::time::{Duration, Instant};

use common::*;

fn wait_for(timeout: Duration, mut check: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if check() {
            return true;
        }
        thread::sleep(Duration::from_millis(100));
    }
    false
}

#[test]
fn watch_produces_json_start_event() {
    let env = TestEnv::builder()
        .with_file("index.html", "<html>")
        .with_rule(".", "{out}", "")
        .build();

    let mut child = env.spawn(&["watch", "--json"]);
    thread::sleep(Duration::from_millis(800));

    let _ = child.kill();
    let output = to_result(child.wait_with_output().expect("Failed to get output"));

    assert!(
        output.stdout.contains("\"event\":\"watch_started\""),
        "Expected a watch_started event. Got: {}",
        output.combined_output()
    );
}

#[test]
fn watch_deploys_saved_file() {
    let env = TestEnv::builder()
        .with_file("src/app.js", "v1")
        .with_rule("src", "{out}", "")
        .build();

    let mut child = env.spawn(&["watch", "--json"]);
    // Past the startup cooldown
    thread::sleep(Duration::from_millis(1200));

    env.write_workspace_file("src/app.js", "v2");
    let deployed = wait_for(Duration::from_secs(10), || {
        std::fs::read_to_string(env.output_path("app.js")).ok().as_deref() == Some("v2")
    });

    let _ = child.kill();
    let output = to_result(child.wait_with_output().expect("Failed to get output"));

    assert!(deployed, "app.js was not deployed. Output: {}", output.combined_output());
    assert!(
        output.stdout.contains("\"event\":\"deployed\""),
        "Expected a deployed event. Got: {}",
        output.stdout
    );
}

#[test]
fn watch_rejects_invalid_config() {
    let env = TestEnv::builder().build();
    env.write_config("[[nodes]]\nsource = 'src'\ntarget = ''\n");

    let result = env.run(&["watch"]);

    assert_eq!(result.exit_code, 1);
    assert_output_contains!(result, "target must not be empty");
}
