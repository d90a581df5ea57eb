use facade_cli::test_utils::{LockGraphFixture, ProjectFixture};
use predicates::prelude::*;

use super::facade_cmd;

#[test]
fn test_missing_lockfile() {
    let project = ProjectFixture::new().unwrap();
    project.add_file("index.html", "{{ version() }}").unwrap();

    facade_cmd(&project)
        .args(["render", "index.html"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("error: Lockfile not found"));
}

#[test]
fn test_invalid_lockfile() {
    let project = ProjectFixture::new().unwrap();
    LockGraphFixture::invalid_json().write_to(project.path()).unwrap();

    facade_cmd(&project)
        .arg("versions")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid lockfile syntax"));
}

#[test]
fn test_failing_directive_names_directive_and_argument() {
    let project = ProjectFixture::with_lock_graph(&LockGraphFixture::basic()).unwrap();
    project.add_file("index.html", "ok\n{{ modfile(id=\"bar@^2.0.0\") }}\n").unwrap();

    facade_cmd(&project)
        .args(["render", "index.html"])
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains(r#"modfile("bar@^2.0.0") failed"#))
        .stderr(predicate::str::contains("No installed version of 'bar' satisfies '^2.0.0'"))
        .stderr(predicate::str::contains("Installed versions: 1.0.0"));
}

#[test]
fn test_path_escape_is_rejected() {
    let project = ProjectFixture::with_lock_graph(&LockGraphFixture::basic()).unwrap();
    project.add_file("index.html", r#"{{ static(id="../../secret.css") }}"#).unwrap();

    facade_cmd(&project)
        .args(["render", "index.html"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("resolves outside the project root"));
}

#[test]
fn test_template_syntax_error() {
    let project = ProjectFixture::with_lock_graph(&LockGraphFixture::basic()).unwrap();
    project.add_file("index.html", "{{ modfile(id=\"bar\" }}").unwrap();

    facade_cmd(&project)
        .args(["render", "index.html"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Template error"))
        .stderr(predicate::str::contains("__tera_one_off").not());
}

#[test]
fn test_unknown_directive() {
    let project = ProjectFixture::with_lock_graph(&LockGraphFixture::basic()).unwrap();
    facade_cmd(&project)
        .args(["resolve", "statik", "./a.css"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Did you mean 'static'?"));
}

#[test]
fn test_malformed_config() {
    let project = ProjectFixture::with_lock_graph(&LockGraphFixture::basic()).unwrap();
    project.write_config("hosts = [").unwrap();

    facade_cmd(&project)
        .arg("versions")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse config file"));
}

#[test]
fn test_missing_explicit_config() {
    let project = ProjectFixture::with_lock_graph(&LockGraphFixture::basic()).unwrap();
    facade_cmd(&project)
        .args(["--config", "nope.toml", "versions"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Config file not found"));
}

#[test]
fn test_verbose_and_quiet_conflict() {
    let project = ProjectFixture::with_lock_graph(&LockGraphFixture::basic()).unwrap();
    facade_cmd(&project).args(["-v", "-q", "versions"]).assert().failure().code(2);
}
