use std::process::{Command, Output};

fn scavenger(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_scavenger"))
        .args(args)
        .output()
        .expect("failed to launch the scavenger binary")
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).expect("stdout is utf8")
}

#[test]
fn exported_layout_code_can_be_replayed() {
    let export = scavenger(&["--seed", "5", "--level", "3", "--export-layout"]);
    assert!(export.status.success(), "export failed: {export:?}");
    let code = stdout(&export);
    assert!(code.starts_with("scav:v1:8x8:"), "unexpected code {code}");

    let replay = scavenger(&["--import-layout", code.trim(), "--frames", "10"]);
    assert!(replay.status.success(), "replay failed: {replay:?}");
    assert!(stdout(&replay).contains("Day 1"));
}

#[test]
fn scripted_session_prints_the_board() {
    let output = scavenger(&["--seed", "2", "--script", "NE", "--frames", "80"]);
    assert!(output.status.success(), "session failed: {output:?}");

    let text = stdout(&output);
    assert!(text.starts_with("Day 1\nFood: 100\n"));
    assert!(text.contains('@'));
    assert!(text.contains('E'));
}

#[test]
fn malformed_inputs_fail_cleanly() {
    assert!(!scavenger(&["--script", "NXQ"]).status.success());
    assert!(!scavenger(&["--import-layout", "dungeon:v1:8x8:e30"]).status.success());
    assert!(!scavenger(&["--script", "N", "--autopilot"]).status.success());
}
