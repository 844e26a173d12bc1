//! End-to-end tests driving the compiled `planter` binary.

use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const LAYOUT: &str = "\
@ROOT {{App}}

{{App}}/
    src/
        main.rs
    README.md

@@@FILE_BEGIN src/main.rs
fn main() {}
@@@FILE_END
";

/// Binary under test, with ambient overrides stripped for hermetic runs.
fn planter() -> Command {
    let mut cmd = Command::cargo_bin("planter").unwrap();
    for var in [
        "PLANTER_ALIAS",
        "PLANTER_FORCE",
        "PLANTER_DRY_RUN",
        "PLANTER_SCAN_MAX_FILES",
        "PLANTER_SIMILARITY_THRESHOLD",
        "PLANTER_LOG_TO_FILE",
        "PLANTER_LOG_DIR",
        "PLANTER_NO_COLOR",
        "RUST_LOG",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

/// Temp workspace with the layout file next to (not inside) the root.
fn setup() -> (TempDir, PathBuf, PathBuf) {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("app");
    fs::create_dir(&root).unwrap();
    let layout = temp.path().join("layout.txt");
    fs::write(&layout, LAYOUT).unwrap();
    (temp, layout, root)
}

// ── surface ───────────────────────────────────────────────────────────────────

#[test]
fn help_lists_subcommands() {
    planter()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("plan"))
        .stdout(predicate::str::contains("apply"))
        .stdout(predicate::str::contains("tree"))
        .stdout(predicate::str::contains("check"));
}

#[test]
fn version_prints_package_version() {
    planter()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn no_arguments_fails_with_usage() {
    planter()
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Usage"));
}

// ── plan ──────────────────────────────────────────────────────────────────────

#[test]
fn plan_previews_a_fresh_structure() {
    let (_temp, layout, root) = setup();

    planter()
        .arg("plan")
        .arg(&layout)
        .arg("--root")
        .arg(&root)
        .assert()
        .success()
        .stdout(predicate::str::contains("src/ [new]"))
        .stdout(predicate::str::contains("main.rs [new]"))
        .stdout(predicate::str::contains("README.md [new]"))
        .stdout(predicate::str::contains("3 new"));

    // Previewing never touches the filesystem.
    assert!(!root.join("src").exists());
    assert!(!root.join("README.md").exists());
}

#[test]
fn plan_marks_existing_entries() {
    let (_temp, layout, root) = setup();
    fs::create_dir(root.join("src")).unwrap();

    planter()
        .arg("plan")
        .arg(&layout)
        .arg("--root")
        .arg(&root)
        .assert()
        .success()
        .stdout(predicate::str::contains("src/ [exists]"))
        .stdout(predicate::str::contains("2 new"))
        .stdout(predicate::str::contains("1 existing"));
}

#[test]
fn plan_records_conflicts_and_exits_zero() {
    let (_temp, layout, root) = setup();
    // A file where the tree plans a directory.
    fs::write(root.join("src"), "in the way").unwrap();

    planter()
        .arg("plan")
        .arg(&layout)
        .arg("--root")
        .arg(&root)
        .assert()
        .success()
        .stdout(predicate::str::contains("src/ [conflict]"))
        .stdout(predicate::str::contains("1 conflicting"))
        .stdout(predicate::str::contains("--force"));
}

#[test]
fn plan_warns_about_unmatched_content() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("app");
    fs::create_dir(&root).unwrap();
    let layout = temp.path().join("layout.txt");
    fs::write(
        &layout,
        "@ROOT {{App}}\n\
         {{App}}/\n\
         \tsrc/\n\
         @@@FILE_BEGIN src/phantom.rs\n\
         lost\n\
         @@@FILE_END\n",
    )
    .unwrap();

    planter()
        .arg("plan")
        .arg(&layout)
        .arg("--root")
        .arg(&root)
        .assert()
        .success()
        .stdout(predicate::str::contains("matches no planned file"));
}

#[test]
fn plan_missing_input_exits_not_found() {
    planter()
        .args(["plan", "definitely-not-here.txt"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Cannot read structure file"));
}

#[test]
fn plan_missing_root_exits_not_found() {
    let (_temp, layout, root) = setup();

    planter()
        .arg("plan")
        .arg(&layout)
        .arg("--root")
        .arg(root.join("missing"))
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Root directory does not exist"));
}

#[test]
fn plan_parse_errors_carry_line_numbers() {
    let temp = TempDir::new().unwrap();
    let bad = temp.path().join("bad.txt");
    fs::write(&bad, "@ROOT {{App}}\n{{App}}/\n   src/\n").unwrap();

    planter()
        .arg("plan")
        .arg(&bad)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("line 3"));
}

#[test]
fn plan_json_document_is_parseable() {
    let (_temp, layout, root) = setup();

    let output = planter()
        .arg("plan")
        .arg(&layout)
        .arg("--root")
        .arg(&root)
        .args(["--output-format", "json"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["summary"]["new"], 3);
    assert_eq!(value["summary"]["conflicts"], 0);

    let src_key = root.join("src").display().to_string();
    assert_eq!(value["path_states"][src_key.as_str()], "new");
}

#[test]
fn quiet_plan_prints_nothing() {
    let (_temp, layout, root) = setup();

    planter()
        .arg("-q")
        .arg("plan")
        .arg(&layout)
        .arg("--root")
        .arg(&root)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

// ── apply ─────────────────────────────────────────────────────────────────────

#[test]
fn apply_creates_dirs_files_and_content() {
    let (_temp, layout, root) = setup();

    planter()
        .arg("apply")
        .arg(&layout)
        .arg("--root")
        .arg(&root)
        .arg("--yes")
        .assert()
        .success()
        .stdout(predicate::str::contains("[MKDIR]"))
        .stdout(predicate::str::contains("[CREATE]"));

    assert!(root.join("src").is_dir());
    assert_eq!(
        fs::read_to_string(root.join("src/main.rs")).unwrap(),
        "fn main() {}\n"
    );
    // Planned file without a content block lands empty.
    assert_eq!(fs::read_to_string(root.join("README.md")).unwrap(), "");
}

#[test]
fn apply_rerun_is_a_noop() {
    let (_temp, layout, root) = setup();

    planter()
        .arg("apply")
        .arg(&layout)
        .arg("--root")
        .arg(&root)
        .arg("--yes")
        .assert()
        .success();

    planter()
        .arg("apply")
        .arg(&layout)
        .arg("--root")
        .arg(&root)
        .arg("--yes")
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing to do"));
}

#[test]
fn apply_without_force_refuses_conflicts() {
    let (_temp, layout, root) = setup();
    // A directory where the tree plans a file.
    fs::create_dir(root.join("README.md")).unwrap();

    planter()
        .arg("apply")
        .arg(&layout)
        .arg("--root")
        .arg(&root)
        .arg("--yes")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("conflict"))
        .stderr(predicate::str::contains("--force"));

    // Refusal happens before any write.
    assert!(!root.join("src").exists());
}

#[test]
fn apply_force_skips_conflicts_and_creates_the_rest() {
    let (_temp, layout, root) = setup();
    fs::create_dir(root.join("README.md")).unwrap();

    planter()
        .arg("apply")
        .arg(&layout)
        .arg("--root")
        .arg(&root)
        .args(["--yes", "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[CONFLICT]"));

    assert!(root.join("src/main.rs").is_file());
    // The conflicting path itself stays exactly as it was.
    assert!(root.join("README.md").is_dir());
}

#[test]
fn apply_overwrites_only_with_force() {
    let (_temp, layout, root) = setup();
    fs::create_dir(root.join("src")).unwrap();
    fs::write(root.join("src/main.rs"), "old").unwrap();

    planter()
        .arg("apply")
        .arg(&layout)
        .arg("--root")
        .arg(&root)
        .arg("--yes")
        .assert()
        .success();
    assert_eq!(fs::read_to_string(root.join("src/main.rs")).unwrap(), "old");

    planter()
        .arg("apply")
        .arg(&layout)
        .arg("--root")
        .arg(&root)
        .args(["--yes", "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[OVERWRITE]"));
    assert_eq!(
        fs::read_to_string(root.join("src/main.rs")).unwrap(),
        "fn main() {}\n"
    );
}

#[test]
fn apply_dry_run_writes_nothing() {
    let (_temp, layout, root) = setup();

    planter()
        .arg("apply")
        .arg(&layout)
        .arg("--root")
        .arg(&root)
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("Dry run"));

    assert!(!root.join("src").exists());
    assert!(!root.join("README.md").exists());
}

// ── tree ──────────────────────────────────────────────────────────────────────

fn sample_project(temp: &TempDir) -> PathBuf {
    let root = temp.path().join("game");
    fs::create_dir_all(root.join("assets")).unwrap();
    fs::create_dir_all(root.join("src")).unwrap();
    fs::write(root.join("src/main.rs"), "x").unwrap();
    root
}

#[test]
fn tree_prints_canonical_text() {
    let temp = TempDir::new().unwrap();
    let root = sample_project(&temp);

    let output = planter()
        .arg("tree")
        .arg(&root)
        .args(["--alias", "Game"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let text = String::from_utf8(output.stdout).unwrap();
    assert!(text.starts_with("@ROOT Game\n"), "got: {text}");
    assert!(text.contains("\nGame/\n"));
    assert!(text.contains("    assets/\n"));
    assert!(text.contains("    src/\n"));
    assert!(text.contains("        main.rs\n"));
}

#[test]
fn tree_alias_flag_wins_over_env() {
    let temp = TempDir::new().unwrap();
    let root = sample_project(&temp);

    let output = planter()
        .env("PLANTER_ALIAS", "FromEnv")
        .arg("tree")
        .arg(&root)
        .output()
        .unwrap();
    let text = String::from_utf8(output.stdout).unwrap();
    assert!(text.starts_with("@ROOT FromEnv\n"));

    let output = planter()
        .env("PLANTER_ALIAS", "FromEnv")
        .arg("tree")
        .arg(&root)
        .args(["--alias", "FromFlag"])
        .output()
        .unwrap();
    let text = String::from_utf8(output.stdout).unwrap();
    assert!(text.starts_with("@ROOT FromFlag\n"));
}

#[test]
fn tree_round_trips_through_plan() {
    let temp = TempDir::new().unwrap();
    let root = sample_project(&temp);

    let output = planter()
        .arg("tree")
        .arg(&root)
        .args(["--alias", "Game"])
        .output()
        .unwrap();
    let layout = temp.path().join("generated.txt");
    fs::write(&layout, &output.stdout).unwrap();

    // Everything the walk saw already exists, so the plan is all-exists.
    planter()
        .arg("plan")
        .arg(&layout)
        .arg("--root")
        .arg(&root)
        .assert()
        .success()
        .stdout(predicate::str::contains("0 new"))
        .stdout(predicate::str::contains("3 existing"))
        .stdout(predicate::str::contains("0 conflicting"));
}

#[test]
fn tree_missing_directory_exits_not_found() {
    let temp = TempDir::new().unwrap();

    planter()
        .arg("tree")
        .arg(temp.path().join("nope"))
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Directory not found"));
}

// ── check ─────────────────────────────────────────────────────────────────────

#[test]
fn check_approves_a_project_directory() {
    let temp = TempDir::new().unwrap();

    planter()
        .arg("check")
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("safe to plan into"));
}

#[test]
fn check_blocks_system_directories() {
    planter()
        .arg("check")
        .arg("/etc")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Refusing to use"));
}

#[test]
fn check_json_verdict_is_parseable() {
    let temp = TempDir::new().unwrap();

    let output = planter()
        .arg("check")
        .arg(temp.path())
        .args(["--output-format", "json"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(value["blocked"].is_null());
    assert!(value["warnings"].as_array().unwrap().is_empty());
}

// ── completions / config ──────────────────────────────────────────────────────

#[test]
fn completions_emit_a_bash_script() {
    planter()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("planter"));
}

#[test]
fn config_show_path_prints_a_location() {
    planter()
        .args(["config", "--show-path"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn config_json_reflects_env_overrides() {
    let output = planter()
        .env("PLANTER_SCAN_MAX_FILES", "123")
        .args(["config", "--output-format", "json"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["scan"]["max_files"], 123);
}

// ── sanity ────────────────────────────────────────────────────────────────────

#[test]
fn plan_applies_relative_roots() {
    let (temp, layout, root) = setup();

    planter()
        .current_dir(temp.path())
        .arg("plan")
        .arg(&layout)
        .args(["--root", "app"])
        .assert()
        .success()
        .stdout(predicate::str::contains("3 new"));

    // Still nothing written.
    assert!(fs::read_dir(&root).unwrap().next().is_none());
}
