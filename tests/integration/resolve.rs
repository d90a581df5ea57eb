use facade_cli::test_utils::{LockGraphFixture, ProjectFixture};
use predicates::prelude::*;

use super::facade_cmd;

fn project() -> ProjectFixture {
    ProjectFixture::with_lock_graph(&LockGraphFixture::with_engines()).unwrap()
}

#[test]
fn test_resolve_modfile() {
    let project = project();
    facade_cmd(&project)
        .args(["resolve", "modfile", "lib@~1.0.0/util"])
        .assert()
        .success()
        .stdout("../../lib/1.0.0/util.js\n");
}

#[test]
fn test_resolve_scoped_package() {
    let project = project();
    facade_cmd(&project)
        .args(["resolve", "modfile", "@ui/button@^2/index.js"])
        .assert()
        .success()
        .stdout("../../@ui/button/2.0.0/index.js\n");
}

#[test]
fn test_resolve_relative_to_template() {
    let project = project();
    facade_cmd(&project)
        .args(["resolve", "modfile", "bar", "--template", "views/index.html"])
        .assert()
        .success()
        .stdout("../../../bar/1.4.2/bar.js\n");
}

#[test]
fn test_resolve_facade_emits_bootstrap() {
    let project = project();
    facade_cmd(&project)
        .args(["resolve", "facade", "bar"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            r#"<script src="../../neuron/4.2.0/neuron.js"></script>"#,
        ))
        .stdout(predicate::str::contains(r#""app@0.2.0":{"#))
        .stdout(predicate::str::contains(r#"<script>facade({"entry":"bar@1.4.2"});</script>"#));
}

#[test]
fn test_resolve_version() {
    let project = project();
    facade_cmd(&project).args(["resolve", "version"]).assert().success().stdout("0.2.0\n");
}

#[test]
fn test_resolve_timestamp() {
    let project = project();
    facade_cmd(&project)
        .args(["resolve", "timestamp"])
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"^\d{13}\n$").unwrap());
}
