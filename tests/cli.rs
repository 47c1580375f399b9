use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

fn tkb(dir: &Path) -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_tkb"));
    command.current_dir(dir);
    command
}

#[test]
fn ticket_command_writes_a_well_formed_document() {
    let tmp = TempDir::new().expect("tempdir");

    let output = tkb(tmp.path())
        .args([
            "ticket",
            "Fix login flow",
            "--priority",
            "high",
            "--tags",
            "auth,ui",
        ])
        .output()
        .expect("run ticket");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Created 1: Fix login flow"), "{stdout}");

    let raw = fs::read_to_string(tmp.path().join("tickets/1.md")).expect("read ticket");
    assert!(raw.starts_with("---\n"));
    assert!(raw.contains("id: 1"));
    assert!(raw.contains("priority: high"));
    assert!(raw.contains("- auth"));
}

#[test]
fn ticket_command_picks_up_the_board_prefix() {
    let tmp = TempDir::new().expect("tempdir");
    fs::write(
        tmp.path().join("board.md"),
        "---\nboard: true\nticketPrefix: PROJ\n---\n",
    )
    .expect("write board");

    let output = tkb(tmp.path())
        .args(["ticket", "Prefixed"])
        .output()
        .expect("run ticket");
    assert!(output.status.success());
    assert!(tmp.path().join("tickets/PROJ-1.md").is_file());
}

#[test]
fn list_json_reports_created_tickets() {
    let tmp = TempDir::new().expect("tempdir");
    let status = tkb(tmp.path())
        .args(["ticket", "Only one"])
        .status()
        .expect("run ticket");
    assert!(status.success());

    let output = tkb(tmp.path())
        .args(["list", "--json"])
        .output()
        .expect("run list");
    assert!(output.status.success());
    let tickets: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("parse list json");
    let tickets = tickets.as_array().expect("tickets array");
    assert_eq!(tickets.len(), 1);
    assert_eq!(tickets[0]["title"], "Only one");
    assert_eq!(tickets[0]["url"], "/tickets/1.html");
}

#[test]
fn validate_fails_until_fix_has_run() {
    let tmp = TempDir::new().expect("tempdir");
    let dir = tmp.path().join("tickets");
    fs::create_dir_all(&dir).expect("create tickets dir");
    fs::write(dir.join("broken.md"), "---\ntitle: No id\n---\n\n").expect("write broken");

    let status = tkb(tmp.path()).arg("validate").status().expect("validate");
    assert!(!status.success());

    let status = tkb(tmp.path()).arg("fix").status().expect("fix");
    assert!(status.success());

    let status = tkb(tmp.path())
        .arg("validate")
        .status()
        .expect("revalidate");
    assert!(status.success());
    assert!(dir.join("1.md").is_file());
}

#[test]
fn export_writes_a_snapshot_per_board() {
    let tmp = TempDir::new().expect("tempdir");
    fs::write(
        tmp.path().join("board.md"),
        "---\nboard: true\nticketsDir: tickets\n---\n",
    )
    .expect("write board");
    fs::create_dir_all(tmp.path().join("tickets")).expect("create tickets dir");
    fs::write(
        tmp.path().join("tickets/1.md"),
        "---\nid: 1\ntitle: Exported\n---\n\nbody\n",
    )
    .expect("write ticket");

    let status = tkb(tmp.path())
        .args(["export", "--root", ".", "--out", "dist/data"])
        .status()
        .expect("run export");
    assert!(status.success());

    let raw =
        fs::read_to_string(tmp.path().join("dist/data/tickets.json")).expect("read snapshot");
    let tickets: serde_json::Value = serde_json::from_str(&raw).expect("snapshot json");
    assert_eq!(tickets[0]["title"], "Exported");
}
