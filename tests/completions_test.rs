use std::process::Command;

mod common;

// ============================================================================
// Completions command tests
// ============================================================================

fn completions(shell: &str) -> std::process::Output {
    Command::new(common::pasteleria_binary())
        .args(["completions", shell])
        .output()
        .expect("Failed to execute command")
}

#[test]
fn test_completions_bash() {
    let output = completions("bash");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("_pasteleria"));
    assert!(stdout.contains("orders"));
}

#[test]
fn test_completions_zsh() {
    let output = completions("zsh");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("#compdef pasteleria"));
}

#[test]
fn test_completions_fish() {
    let output = completions("fish");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("complete -c pasteleria"));
}

#[test]
fn test_completions_invalid_shell() {
    assert!(!completions("invalid").status.success());
}
