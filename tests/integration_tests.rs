//! Integration tests for the sqlwire CLI
//!
//! These tests exercise the CLI commands end-to-end using assert_cmd against
//! a throwaway harness database.

use assert_cmd::Command;
use predicates::prelude::*;
use rusqlite::Connection;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Helper to get a sqlwire command with no ambient overrides
fn sqlwire() -> Command {
    let mut cmd = Command::cargo_bin("sqlwire").unwrap();
    cmd.env_remove("SQLWIRE_CONFIG")
        .env_remove("SQLWIRE_DB_PATH")
        .env_remove("SQLWIRE_RENDERER");
    cmd
}

fn create_database(path: &Path) {
    let conn = Connection::open(path).unwrap();
    conn.execute_batch(
        r#"
        CREATE TABLE NetTable (cable_des TEXT, comp_des_1 TEXT, conn_des_1 TEXT, pin_1,
                               comp_des_2 TEXT, conn_des_2 TEXT, pin_2, net_name TEXT);
        CREATE TABLE DesignatorTable (comp_des TEXT, conn_des TEXT, conn_mpn TEXT);
        CREATE TABLE ConnectorTable (mpn TEXT, pincount INTEGER, mate_mpn TEXT, pin_mpn TEXT,
                                     description TEXT, manufacturer TEXT);
        CREATE TABLE CableTable (cable_des TEXT, wire_gauge REAL, length REAL, note TEXT);

        INSERT INTO NetTable VALUES ('W001', 'J10', 'X1', 1, 'J2', '', 1, '+24V');
        INSERT INTO NetTable VALUES ('W001', 'J10', 'X1', 2, 'J2', '', 2, 'gnd');
        INSERT INTO NetTable VALUES ('W002', 'J3', '', 'A', 'J4', 'X2', 'B', 'CAN_H');

        INSERT INTO DesignatorTable VALUES ('J10', 'X1', 'HDR-4'), ('J2', '', 'HDR-2'),
                                           ('J3', '', 'HDR-2'), ('J4', 'X2', 'UNKNOWN');
        INSERT INTO ConnectorTable VALUES
            ('HDR-2', 2, 'PLUG-2', 'PIN-1', 'Plug housing 2p', 'Molex'),
            ('HDR-4', 4, 'PLUG-4', 'PIN-1', 'Plug housing 4p', 'Molex');
        INSERT INTO CableTable VALUES ('W001', 0.5, 1000, 'Power'), ('W002', 0.25, 500, NULL);
        "#,
    )
    .unwrap();
}

/// Helper to create a harness project: database, config and one image
fn setup_project() -> TempDir {
    let tmp = TempDir::new().unwrap();
    create_database(&tmp.path().join("harness.db"));
    fs::create_dir_all(tmp.path().join("resources")).unwrap();
    fs::write(tmp.path().join("resources/PLUG-2.png"), b"png").unwrap();

    let config = format!(
        r#"base_repo_path: {}
db_path: harness.db
output_path: output
drawings_path: output/drawings
attachments_path: output/attachments
renderer: sqlwire-test-no-such-renderer
cables:
  from: 1
  to: 3
  exclude: []
"#,
        tmp.path().display()
    );
    fs::write(tmp.path().join("sqlwire.yaml"), config).unwrap();
    tmp
}

// ============================================================================
// Basic commands
// ============================================================================

#[test]
fn test_help_displays() {
    sqlwire()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("build"))
        .stdout(predicate::str::contains("labels"));
}

#[test]
fn test_version_displays() {
    sqlwire()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("sqlwire"));
}

#[test]
fn test_init_writes_starter_config() {
    let tmp = TempDir::new().unwrap();
    sqlwire()
        .current_dir(tmp.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("sqlwire.yaml"));

    let contents = fs::read_to_string(tmp.path().join("sqlwire.yaml")).unwrap();
    assert!(contents.contains("attachments_path"));
}

#[test]
fn test_init_does_not_overwrite_without_force() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("sqlwire.yaml"), "# mine\n").unwrap();
    sqlwire()
        .current_dir(tmp.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
    assert_eq!(fs::read_to_string(tmp.path().join("sqlwire.yaml")).unwrap(), "# mine\n");
}

#[test]
fn test_completions_bash() {
    sqlwire()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("sqlwire"));
}

// ============================================================================
// Configuration errors
// ============================================================================

#[test]
fn test_missing_config_fails() {
    let tmp = TempDir::new().unwrap();
    sqlwire()
        .current_dir(tmp.path())
        .arg("bom")
        .assert()
        .failure()
        .stderr(predicate::str::contains("configuration file not found"));
}

#[test]
fn test_missing_required_key_fails() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("sqlwire.yaml"), "base_repo_path: .\ndb_path: x.db\n").unwrap();
    sqlwire()
        .current_dir(tmp.path())
        .arg("bom")
        .assert()
        .failure()
        .stderr(predicate::str::contains("output_path"));
}

// ============================================================================
// Documents and reports
// ============================================================================

#[test]
fn test_yaml_for_one_cable() {
    let tmp = setup_project();
    sqlwire()
        .current_dir(tmp.path())
        .args(["yaml", "W001"])
        .assert()
        .success()
        .stdout(predicate::str::contains("J10-X1"))
        .stdout(predicate::str::contains("../resources/PLUG-2.png"))
        .stdout(predicate::str::contains("W001"))
        .stdout(predicate::str::contains("J3").not());
}

#[test]
fn test_yaml_for_cable_without_nets_is_skipped() {
    let tmp = setup_project();
    let out = tmp.path().join("out/W999.yaml");
    sqlwire()
        .current_dir(tmp.path())
        .args(["-v", "yaml", "W999", "-o"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("no net rows"))
        .stderr(predicate::str::contains("CABLE_HAS_NO_NETS"));
    assert!(!out.exists());
}

#[test]
fn test_yaml_sorts_zero_padded_designators_by_value() {
    let tmp = setup_project();
    let conn = Connection::open(tmp.path().join("harness.db")).unwrap();
    conn.execute_batch(
        r#"
        INSERT INTO NetTable VALUES ('W003', 'J010', '', 1, 'J9', '', 1, 'a');
        INSERT INTO NetTable VALUES ('W003', 'J02', '', 1, 'J9', '', 2, 'b');
        INSERT INTO DesignatorTable VALUES ('J010', '', 'HDR-2'), ('J9', '', 'HDR-2'),
                                           ('J02', '', 'HDR-2'), ('J02', '', 'HDR-4');
        "#,
    )
    .unwrap();
    drop(conn);

    let output = sqlwire()
        .current_dir(tmp.path())
        .args(["yaml", "W003"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let yaml = String::from_utf8_lossy(&output.stdout);

    // connector keys are the only lines of the form `  <name>:`
    let key_line = |key: &str| format!("  {}:", key);
    let pos = |key: &str| yaml.lines().position(|l| l == key_line(key)).unwrap();
    assert!(pos("J02") < pos("J9"));
    assert!(pos("J9") < pos("J010"));
    assert_eq!(yaml.lines().filter(|l| *l == key_line("J02")).count(), 1);
    assert!(String::from_utf8_lossy(&output.stderr).contains("DUPLICATE_DESIGNATOR"));
}

#[test]
fn test_yaml_to_file() {
    let tmp = setup_project();
    let out = tmp.path().join("out/W002.yaml");
    sqlwire()
        .current_dir(tmp.path())
        .args(["yaml", "W002", "-o"])
        .arg(&out)
        .assert()
        .success();

    let contents = fs::read_to_string(&out).unwrap();
    assert!(contents.contains("NotFound"));
    assert!(contents.contains("J4-X2"));
}

#[test]
fn test_bom_csv() {
    let tmp = setup_project();
    sqlwire()
        .current_dir(tmp.path())
        .args(["bom", "--format", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("description,mpn,manufacturer,quantity,unit"))
        .stdout(predicate::str::contains("Plug housing 2p,PLUG-2,Molex,2,pcs"))
        .stdout(predicate::str::contains("0.5mm2-Red"))
        .stdout(predicate::str::contains("0.25mm2-White"));
}

#[test]
fn test_bom_warns_on_unknown_part() {
    let tmp = setup_project();
    sqlwire()
        .current_dir(tmp.path())
        .args(["bom", "--cable", "W002"])
        .assert()
        .success()
        .stderr(predicate::str::contains("BOM_PART_NOT_IN_CATALOG"));
}

#[test]
fn test_bom_xlsx() {
    let tmp = setup_project();
    let out = tmp.path().join("bom.xlsx");
    sqlwire()
        .current_dir(tmp.path())
        .args(["bom", "-o"])
        .arg(&out)
        .assert()
        .success();
    assert!(out.is_file());
}

#[test]
fn test_labels_to_stdout() {
    let tmp = setup_project();
    sqlwire()
        .current_dir(tmp.path())
        .arg("labels")
        .assert()
        .success()
        .stdout(predicate::str::contains("Cable and Connector Labels:"))
        .stdout(predicate::str::contains("Wire Labels:"))
        .stdout(predicate::str::contains("J10-X1:1 - J2:1"));
}

// ============================================================================
// Build
// ============================================================================

#[test]
fn test_build_without_renderer_still_succeeds() {
    let tmp = setup_project();
    sqlwire()
        .current_dir(tmp.path())
        .arg("build")
        .assert()
        .success()
        .stderr(predicate::str::contains("RENDERER_NOT_FOUND"));

    let attachments = tmp.path().join("output/attachments");
    assert!(attachments.join("BOM.xlsx").is_file());
    assert!(attachments.join("CableLabels.xlsx").is_file());
    assert!(attachments.join("WireLabels.xlsx").is_file());
    assert!(tmp.path().join("output/W001.yaml").is_file());
    assert!(tmp.path().join("output/W002.yaml").is_file());
    assert!(!tmp.path().join("output/W003.yaml").exists());
}

#[test]
fn test_build_is_reproducible() {
    let tmp = setup_project();
    let files = ["output/attachments/BOM.xlsx", "output/W001.yaml"];

    sqlwire().current_dir(tmp.path()).args(["build", "-q"]).assert().success();
    let first: Vec<_> = files.iter().map(|f| fs::read(tmp.path().join(f)).unwrap()).collect();

    sqlwire().current_dir(tmp.path()).args(["build", "-q"]).assert().success();
    let second: Vec<_> = files.iter().map(|f| fs::read(tmp.path().join(f)).unwrap()).collect();

    assert_eq!(first, second);
}

#[test]
fn test_build_respects_skip_flags() {
    let tmp = setup_project();
    sqlwire()
        .current_dir(tmp.path())
        .args(["build", "--no-bom", "--no-drawings", "--cable", "W002"])
        .assert()
        .success();

    let attachments = tmp.path().join("output/attachments");
    assert!(!attachments.join("BOM.xlsx").exists());
    assert!(attachments.join("WireLabels.xlsx").is_file());
    assert!(!tmp.path().join("output/W002.yaml").exists());
}

#[test]
fn test_missing_database_fails() {
    let tmp = setup_project();
    sqlwire()
        .current_dir(tmp.path())
        .env("SQLWIRE_DB_PATH", tmp.path().join("nope.db"))
        .arg("bom")
        .assert()
        .failure();
}
