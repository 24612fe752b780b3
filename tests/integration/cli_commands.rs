//! End-to-end tests of the gat binary

use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

/// Run the binary against `workspace` with an isolated home and config dir.
fn gat(home: &Path, workspace: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_gat"))
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join("config"))
        .env_remove("GAT_LOG")
        .env_remove("GAT_LOG_OUTPUT")
        .arg("--workspace")
        .arg(workspace)
        .arg("--no-color")
        .args(args)
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

fn setup() -> (TempDir, std::path::PathBuf, std::path::PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let home = temp_dir.path().join("home");
    let workspace = temp_dir.path().join("ws");
    fs::create_dir_all(&home).unwrap();
    fs::create_dir_all(&workspace).unwrap();
    (temp_dir, home, workspace)
}

#[test]
fn test_commit_log_and_revert_via_cli() {
    let (_temp_dir, home, ws) = setup();
    fs::write(ws.join("a.txt"), "hello").unwrap();

    let out = gat(&home, &ws, &["commit", "-m", "first"]);
    assert!(out.status.success(), "stderr={}", String::from_utf8_lossy(&out.stderr));
    let first = stdout(&out).rsplit(' ').next().unwrap().to_string();
    assert_eq!(first.len(), 64);

    fs::write(ws.join("a.txt"), "changed").unwrap();
    fs::write(ws.join("b.txt"), "new").unwrap();
    assert!(gat(&home, &ws, &["commit", "-m", "second"]).status.success());

    let log = gat(&home, &ws, &["log", "--format", "json"]);
    let entries: serde_json::Value = serde_json::from_slice(&log.stdout).unwrap();
    assert_eq!(entries.as_array().unwrap().len(), 2);
    assert_eq!(entries[0]["message"], "second");
    assert_eq!(entries[1]["id"], first.as_str());

    let out = gat(&home, &ws, &["revert", &first]);
    assert!(out.status.success(), "stderr={}", String::from_utf8_lossy(&out.stderr));
    assert_eq!(fs::read_to_string(ws.join("a.txt")).unwrap(), "hello");
    assert!(!ws.join("b.txt").exists());
}

#[test]
fn test_branch_and_checkout_via_cli() {
    let (_temp_dir, home, ws) = setup();
    fs::write(ws.join("a.txt"), "main").unwrap();
    assert!(gat(&home, &ws, &["commit", "-m", "main"]).status.success());

    let out = gat(&home, &ws, &["branch", "feature"]);
    assert_eq!(stdout(&out), "Switched to a new branch 'feature'");

    let out = gat(&home, &ws, &["branch", "feature"]);
    assert!(out.status.success());
    assert_eq!(stdout(&out), "Branch 'feature' already exists");

    fs::write(ws.join("f.txt"), "feature").unwrap();
    assert!(gat(&home, &ws, &["commit", "-m", "feature"]).status.success());

    assert!(gat(&home, &ws, &["checkout", "main"]).status.success());
    assert!(!ws.join("f.txt").exists());

    let status = gat(&home, &ws, &["status", "--format", "json"]);
    let report: serde_json::Value = serde_json::from_slice(&status.stdout).unwrap();
    assert_eq!(report["branch"], "main");
    assert_eq!(report["branches"].as_array().unwrap().len(), 2);
}

#[test]
fn test_failures_exit_with_status_one() {
    let (_temp_dir, home, ws) = setup();

    let out = gat(&home, &ws, &["checkout", "nowhere"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("error:"));

    let out = gat(&home, &ws, &["revert", "not-a-hash"]);
    assert_eq!(out.status.code(), Some(1));

    let out = gat(&home, &ws, &["cat-object", &"0".repeat(64)]);
    assert_eq!(out.status.code(), Some(1));
}

#[test]
fn test_cat_object_by_path() {
    let (_temp_dir, home, ws) = setup();
    fs::write(ws.join("a.txt"), "hello").unwrap();
    assert!(gat(&home, &ws, &["commit", "-m", "first"]).status.success());

    let objects = ws.join(".gat").join("objects");
    let mut contents = Vec::new();
    for dir in fs::read_dir(&objects).unwrap() {
        for file in fs::read_dir(dir.unwrap().path()).unwrap() {
            let path = file.unwrap().path();
            let out = gat(&home, &ws, &["cat-object", "--path", path.to_str().unwrap()]);
            assert!(out.status.success());
            contents.push(stdout(&out));
        }
    }
    assert!(contents.iter().any(|c| c == "hello"));
    assert!(contents.iter().any(|c| c.starts_with("gat-commit 1")));
}

#[test]
fn test_workspace_config_controls_entry_order() {
    let (_temp_dir, home, ws) = setup();
    fs::create_dir_all(ws.join(".gat")).unwrap();
    fs::write(
        ws.join(".gat").join("config.toml"),
        "[snapshot]\nentry_order = \"name\"\n",
    )
    .unwrap();
    for name in ["z.txt", "m.txt", "a.txt"] {
        fs::write(ws.join(name), name).unwrap();
    }
    assert!(gat(&home, &ws, &["commit", "-m", "sorted"]).status.success());

    let head = fs::read_to_string(ws.join(".gat").join("refs").join("heads").join("main")).unwrap();
    let commit = stdout(&gat(&home, &ws, &["cat-object", head.trim()]));
    let tree_hash = commit.lines().nth(1).unwrap().trim_start_matches("tree ");
    let tree = stdout(&gat(&home, &ws, &["cat-object", tree_hash]));
    let names: Vec<_> = tree.lines().map(|l| l.rsplit('\t').next().unwrap()).collect();
    assert_eq!(names, vec!["a.txt", "m.txt", "z.txt"]);
}

#[test]
fn test_verify_clean_store() {
    let (_temp_dir, home, ws) = setup();
    fs::write(ws.join("a.txt"), "hello").unwrap();
    assert!(gat(&home, &ws, &["commit", "-m", "first"]).status.success());

    let out = gat(&home, &ws, &["verify"]);
    assert!(out.status.success());
    assert_eq!(stdout(&out), "Verified 3 object(s): all intact");
}

#[test]
fn test_verify_tampered_store_fails_without_argument_error() {
    let (_temp_dir, home, ws) = setup();
    fs::write(ws.join("a.txt"), "hello").unwrap();
    assert!(gat(&home, &ws, &["commit", "-m", "first"]).status.success());

    let objects = ws.join(".gat").join("objects");
    let fan_out = fs::read_dir(&objects).unwrap().next().unwrap().unwrap().path();
    let object = fs::read_dir(fan_out).unwrap().next().unwrap().unwrap().path();
    fs::write(&object, b"not zlib at all").unwrap();

    let out = gat(&home, &ws, &["verify"]);
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("error: object store verification failed"));
    assert!(!stderr.contains("Invalid argument"));
}
