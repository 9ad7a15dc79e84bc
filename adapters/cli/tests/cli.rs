use std::{fs, process::Command};

fn paper_snake() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_paper-snake"));
    let _ = command.env_remove("RUST_LOG");
    command
}

#[test]
fn headless_run_prints_summary() {
    let output = paper_snake()
        .args([
            "--no-persist",
            "--frames",
            "900",
            "--seed",
            "3",
            "--log-level",
            "warn",
        ])
        .output()
        .expect("failed to launch paper-snake");

    assert!(output.status.success(), "paper-snake exited with {:?}", output.status);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("Welcome to Paper Snake."));
    assert!(stdout.contains("games: "));
    assert!(stdout.contains("best score:"));
}

#[test]
fn best_score_file_is_written() {
    let dir = std::env::temp_dir().join(format!("paper-snake-cli-{}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    let best_file = dir.join("best.json");

    let output = paper_snake()
        .args(["--frames", "3000", "--seed", "8", "--log-level", "error", "--best-file"])
        .arg(&best_file)
        .output()
        .expect("failed to launch paper-snake");

    assert!(output.status.success());
    let contents = fs::read_to_string(&best_file).expect("best score persisted");
    assert!(contents.contains("paperSnakeBest"));
}

#[test]
fn missing_config_file_is_reported() {
    let output = paper_snake()
        .args(["--config", "/definitely/not/here.toml", "--no-persist"])
        .output()
        .expect("failed to launch paper-snake");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to read settings"));
}

#[test]
fn undersized_board_is_rejected() {
    let output = paper_snake()
        .args(["--columns", "5", "--no-persist"])
        .output()
        .expect("failed to launch paper-snake");

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("invalid board dimensions"));
}
