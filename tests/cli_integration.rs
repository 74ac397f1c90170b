//! CLI integration tests
//!
//! These tests drive the binary against saved course pages in a temporary
//! directory, from building a course through profile updates to the
//! eligibility queries.

use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const VIEW_PAGE: &str = r#"<html><body>
<h1>Cursos <small>Curso: 1906 Ciência da Computação - Bacharelado</small></h1>
</body></html>"#;

const TABLE_PAGE: &str = r#"<html><body>
<table>
  <thead><tr><th>Disciplina</th><th>Carga Horária</th><th>Pré-requisito</th></tr></thead>
  <tbody>
    <tr><td colspan="3">1º Semestre</td></tr>
    <tr><td>Cálculo I (OBR)</td><td>60h</td><td>Nenhum</td></tr>
    <tr><td>Cálculo II (OPT)</td><td>60h</td><td>Cálculo I</td></tr>
    <tr><td>Algoritmos (OPT)</td><td>60h</td><td>Nenhum</td></tr>
    <tr><td>Algoritmos (OPT)</td><td>68h</td><td>Nenhum</td></tr>
    <tr><td>Compiladores (OPT)</td><td>68h</td><td>Autômatos</td></tr>
    <tr><td>Ética (OPT)</td><td>muitas</td><td>Nenhum</td></tr>
  </tbody>
</table>
</body></html>"#;

/// Get a command instance for the curriculum binary, isolated from user config
fn curriculum_cmd(dir: &Path) -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::new(assert_cmd::cargo::cargo_bin!("curriculum"));
    cmd.current_dir(dir)
        .env("HOME", dir)
        .env("XDG_CONFIG_HOME", dir.join(".config"))
        .env_remove("CURRICULUM_SOURCE")
        .env_remove("CURRICULUM_PROFILE")
        .env_remove("CURRICULUM_LOG");
    cmd
}

/// Create a temporary directory with the saved pages of course 1906
fn setup_pages() -> TempDir {
    let dir = TempDir::new().unwrap();
    let pages = dir.path().join("pages");
    fs::create_dir_all(pages.join("view")).unwrap();
    fs::create_dir_all(pages.join("prerequisito")).unwrap();
    fs::write(pages.join("view").join("1906.html"), VIEW_PAGE).unwrap();
    fs::write(pages.join("prerequisito").join("1906.html"), TABLE_PAGE).unwrap();
    dir
}

fn setup_profile() -> TempDir {
    let dir = setup_pages();
    curriculum_cmd(dir.path())
        .args(["profile", "new", "Ana", "1906"])
        .assert()
        .success();
    dir
}

fn json_stdout(cmd: &mut assert_cmd::Command) -> serde_json::Value {
    let output = cmd.assert().success();
    let stdout = String::from_utf8_lossy(&output.get_output().stdout);
    serde_json::from_str(&stdout).unwrap()
}

// =============================================================================
// Course Tests
// =============================================================================

#[test]
fn test_course_show_lists_units() {
    let dir = setup_pages();

    curriculum_cmd(dir.path())
        .args(["course", "show", "1906"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(1906) Ciência da Computação - Bacharelado"))
        .stdout(predicate::str::contains("Cálculo II"))
        .stdout(predicate::str::contains("Skipped row 5: Duplicate unit name: Algoritmos"))
        .stdout(predicate::str::contains("Unlinked prerequisite of 'Compiladores'"));
}

#[test]
fn test_course_show_json() {
    let dir = setup_pages();

    let json = json_stdout(curriculum_cmd(dir.path()).args(["course", "show", "1906", "--format", "json"]));

    let units = json["units"].as_array().unwrap();
    let names: Vec<&str> = units.iter().map(|u| u["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["Cálculo I", "Cálculo II", "Algoritmos", "Compiladores"]);
    assert_eq!(units[1]["prerequisite"], "Cálculo I");
    assert_eq!(json["report"]["skipped"], 1);
    assert_eq!(json["report"]["rejected"].as_array().unwrap().len(), 2);
    assert_eq!(json["report"]["unresolved"][0]["reason"], "not_in_matrix");
}

#[test]
fn test_course_show_study_order() {
    let dir = setup_pages();

    let json = json_stdout(curriculum_cmd(dir.path()).args(["course", "show", "1906", "--order", "-f", "json"]));

    let names: Vec<&str> = json["units"]
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["name"].as_str().unwrap())
        .collect();
    let pos = |n: &str| names.iter().position(|x| *x == n).unwrap();
    assert!(pos("Cálculo I") < pos("Cálculo II"));
}

#[test]
fn test_course_optional() {
    let dir = setup_pages();

    curriculum_cmd(dir.path())
        .args(["course", "optional", "1906"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Optional units of (1906)"))
        .stdout(predicate::str::contains("Compiladores"))
        .stdout(predicate::str::contains("OBR").not());
}

#[test]
fn test_unknown_course_fails() {
    let dir = setup_pages();

    curriculum_cmd(dir.path())
        .args(["course", "show", "9999"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Course 9999 does not exist"));
}

#[test]
fn test_source_flag_overrides_default() {
    let dir = setup_pages();
    let elsewhere = TempDir::new().unwrap();

    curriculum_cmd(elsewhere.path())
        .args(["course", "show", "1906", "--source"])
        .arg(dir.path().join("pages"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Cálculo I"));
}

#[test]
fn test_decoration_only_table_fails() {
    let dir = setup_pages();
    fs::write(
        dir.path().join("pages").join("prerequisito").join("1906.html"),
        "<tbody><tr><td>1º Semestre</td></tr></tbody>",
    )
    .unwrap();

    curriculum_cmd(dir.path())
        .args(["course", "show", "1906"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No usable rows"));
}

// =============================================================================
// Profile Tests
// =============================================================================

#[test]
fn test_profile_new_creates_file() {
    let dir = setup_pages();

    curriculum_cmd(dir.path())
        .args(["profile", "new", "Ana", "1906"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created profile for Ana"));

    assert!(dir.path().join("profile.json").is_file());
}

#[test]
fn test_profile_new_refuses_overwrite() {
    let dir = setup_profile();

    curriculum_cmd(dir.path())
        .args(["profile", "new", "Bia", "1906"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));

    curriculum_cmd(dir.path())
        .args(["profile", "new", "Bia", "1906", "--force"])
        .assert()
        .success();
}

#[test]
fn test_profile_complete_and_show() {
    let dir = setup_profile();

    curriculum_cmd(dir.path())
        .args(["profile", "complete", "Cálculo I"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Marked 1 unit(s)"));

    let json = json_stdout(curriculum_cmd(dir.path()).args(["profile", "show", "--format", "json"]));
    assert_eq!(json["student"], "Ana");
    assert_eq!(json["completed"], serde_json::json!(["Cálculo I"]));
    assert_eq!(json["completed_hours"], 60);
}

#[test]
fn test_profile_complete_unknown_unit_fails() {
    let dir = setup_profile();

    curriculum_cmd(dir.path())
        .args(["profile", "complete", "Topologia"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unit not in course: Topologia"));
}

#[test]
fn test_profile_undo() {
    let dir = setup_profile();

    curriculum_cmd(dir.path())
        .args(["profile", "complete", "Cálculo I", "Algoritmos"])
        .assert()
        .success();

    curriculum_cmd(dir.path())
        .args(["profile", "undo", "Algoritmos", "Redes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed 1 unit(s)"));
}

#[test]
fn test_missing_profile_fails() {
    let dir = setup_pages();

    curriculum_cmd(dir.path())
        .args(["eligible"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to open profile"));
}

// =============================================================================
// Query Tests
// =============================================================================

#[test]
fn test_eligible_from_profile() {
    let dir = setup_profile();

    let json = json_stdout(curriculum_cmd(dir.path()).args(["eligible", "--format", "json"]));
    assert_eq!(json["eligible"], serde_json::json!(["Algoritmos", "Compiladores"]));

    curriculum_cmd(dir.path())
        .args(["profile", "complete", "Cálculo I"])
        .assert()
        .success();

    let json = json_stdout(curriculum_cmd(dir.path()).args(["eligible", "--format", "json"]));
    assert_eq!(
        json["eligible"],
        serde_json::json!(["Cálculo II", "Algoritmos", "Compiladores"])
    );
}

#[test]
fn test_blocked_from_profile() {
    let dir = setup_profile();

    curriculum_cmd(dir.path())
        .args(["blocked"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Cálculo II"));
}

#[test]
fn test_eligible_with_course_flag() {
    let dir = setup_pages();

    let json = json_stdout(curriculum_cmd(dir.path()).args([
        "eligible",
        "--course",
        "1906",
        "--completed",
        "Cálculo I",
        "--completed",
        "Algoritmos",
        "--format",
        "json",
    ]));

    assert_eq!(json["course"], 1906);
    assert_eq!(json["eligible"], serde_json::json!(["Cálculo II", "Compiladores"]));
}

// =============================================================================
// Config Tests
// =============================================================================

#[test]
fn test_config_init_and_rule_change() {
    let dir = setup_pages();

    curriculum_cmd(dir.path())
        .args(["config", "init"])
        .assert()
        .success();
    assert!(dir.path().join("curriculum.toml").is_file());

    // Under the obr_marker rule, units without (OBR) are optional
    let config = fs::read_to_string(dir.path().join("curriculum.toml")).unwrap();
    fs::write(
        dir.path().join("curriculum.toml"),
        config.replace("opt_marker", "obr_marker"),
    )
    .unwrap();

    curriculum_cmd(dir.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("obr_marker"));
}

#[test]
fn test_config_show_json_reflects_overrides() {
    let dir = setup_pages();

    let json = json_stdout(curriculum_cmd(dir.path()).args([
        "config",
        "show",
        "--source",
        "saved",
        "--profile",
        "ana.json",
        "--format",
        "json",
    ]));

    assert_eq!(json["source"]["documents_dir"], "saved");
    assert_eq!(json["profile"], "ana.json");
    assert_eq!(json["parse"]["optional_rule"], "opt_marker");
}

#[test]
fn test_verbose_logs_to_stderr() {
    let dir = setup_pages();

    curriculum_cmd(dir.path())
        .args(["--verbose", "course", "show", "1906"])
        .assert()
        .success()
        .stderr(predicate::str::contains("rejecting row"));
}
