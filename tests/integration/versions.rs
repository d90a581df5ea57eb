use facade_cli::test_utils::{LockGraphFixture, ProjectFixture};
use predicates::prelude::*;

use super::facade_cmd;

fn project() -> ProjectFixture {
    ProjectFixture::with_lock_graph(&LockGraphFixture::with_engines()).unwrap()
}

#[test]
fn test_versions_text() {
    let project = project();
    facade_cmd(&project)
        .arg("versions")
        .assert()
        .success()
        .stdout(predicate::str::contains("lib 1.0.0, 1.2.0"))
        .stdout(predicate::str::contains("@ui/button 2.0.0"))
        .stdout(predicate::str::contains("neuron 4.2.0"));
}

#[test]
fn test_versions_single_package_json() {
    let project = project();
    let output = facade_cmd(&project)
        .args(["versions", "lib", "--format", "json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(value, serde_json::json!({ "lib": ["1.0.0", "1.2.0"] }));
}

#[test]
fn test_versions_respects_configured_lockfile() {
    let project = ProjectFixture::new().unwrap();
    project
        .add_file(
            "locks/deps.json",
            r#"{"name":"site","version":"1.0.0","dependencies":{"only":{"version":"3.0.0"}}}"#,
        )
        .unwrap();
    project.write_config(r#"lockfile = "locks/deps.json""#).unwrap();

    facade_cmd(&project)
        .args(["versions", "only"])
        .assert()
        .success()
        .stdout("only 3.0.0\n");
}

#[test]
fn test_versions_unknown_package() {
    let project = project();
    facade_cmd(&project)
        .args(["versions", "libb"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Module 'libb' not found"))
        .stderr(predicate::str::contains("Did you mean 'lib'?"));
}
