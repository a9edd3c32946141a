//! The `transmigrate` binary.

use assert_cmd::Command;
use tempfile::TempDir;

const POINT: &str = r#"{ "classes": [ { "name": "Point", "is_struct": true,
    "fields": [ { "name": "x", "type": "int" }, { "name": "y", "type": "int" } ] } ] }"#;

/// Run in `dir` with an isolated global config.
fn transmigrate(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("transmigrate").unwrap();
    cmd.current_dir(dir.path())
        .env("XDG_CONFIG_HOME", dir.path().join("xdg"))
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_writes_next_to_input() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("point.json"), POINT).unwrap();

    transmigrate(&dir).arg("point.json").assert().success();

    let code = std::fs::read_to_string(dir.path().join("point.rs")).unwrap();
    assert!(code.contains("pub struct Point {\n    pub x: i32,\n    pub y: i32,\n}"));
}

#[test]
fn test_stdout_go() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("point.json"), POINT).unwrap();

    let output = transmigrate(&dir)
        .args(["point.json", "--target", "go", "--package", "geo", "--stdout"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("package geo\n"));
    assert!(stdout.contains("type Point struct {\n\tX int32\n\tY int32\n}"));
    assert!(!dir.path().join("point.go").exists());
}

#[test]
fn test_project_config_and_flag_precedence() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(dir.path().join(".transmigrate")).unwrap();
    std::fs::write(
        dir.path().join(".transmigrate/config.toml"),
        "target = \"go\"\n",
    )
    .unwrap();
    std::fs::write(dir.path().join("point.json"), POINT).unwrap();

    transmigrate(&dir).arg("point.json").assert().success();
    assert!(dir.path().join("point.go").exists());

    transmigrate(&dir)
        .args(["point.json", "-t", "rust", "-o", "out/point.rs"])
        .assert()
        .success();
    assert!(dir.path().join("out/point.rs").exists());
}

#[test]
fn test_failure_exits_nonzero() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("broken.json"), "{ \"classes\": 1 }").unwrap();

    let output = transmigrate(&dir).arg("broken.json").output().unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("broken.json"), "{stderr}");
    assert!(stderr.contains("classes"), "{stderr}");
}

#[test]
fn test_manifest_flag() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("point.json"), POINT).unwrap();

    transmigrate(&dir)
        .args(["point.json", "--stdout", "--manifest", "diag.json"])
        .assert()
        .success();
    let manifest = std::fs::read_to_string(dir.path().join("diag.json")).unwrap();
    assert!(manifest.contains("\"unit\": \"point.json\""));
}

#[test]
fn test_batch_failure_keeps_earlier_output() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("a.json"), POINT).unwrap();
    std::fs::write(dir.path().join("b.json"), "{ \"classes\": 1 }").unwrap();
    std::fs::write(dir.path().join("c.json"), POINT).unwrap();

    let output = transmigrate(&dir)
        .args(["a.json", "b.json", "c.json", "--manifest", "diag.json"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("b.json failed after 1 unit(s) completed"), "{stderr}");

    assert!(dir.path().join("a.rs").exists());
    assert!(!dir.path().join("c.rs").exists());
    let manifest = std::fs::read_to_string(dir.path().join("diag.json")).unwrap();
    assert!(manifest.contains("\"unit\": \"a.json\""));
    assert!(!manifest.contains("c.json"));
}
