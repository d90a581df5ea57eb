use facade_cli::test_utils::{LockGraphFixture, ProjectFixture};
use predicates::prelude::*;
use serial_test::serial;
use std::fs;

use super::facade_cmd;

const PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
  <link rel="stylesheet" href="{{ static(id="./css/site.css") }}">
  <link rel="stylesheet" href="{{ combo(id="./a.css,lib@1.0.0/b.js") }}">
</head>
<body>
  <a href="{{ href(id="./about.html") }}">About</a>
  <script src="{{ modfile(id="bar/x.js") }}"></script>
  {{ facade() }}
  <!-- {{ version() }} -->
</body>
</html>
"#;

fn project() -> ProjectFixture {
    let project = ProjectFixture::with_lock_graph(&LockGraphFixture::with_engines()).unwrap();
    project
        .write_config(
            r#"
            hybrid_link_root = "https://example.com/"

            [extensions]
            css = ".min.css"
            "#,
        )
        .unwrap();
    project.add_file("views/index.html", PAGE).unwrap();
    project
}

#[test]
fn test_render_page_to_stdout() {
    let project = project();
    let output = facade_cmd(&project)
        .args(["render", "views/index.html"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let html = String::from_utf8(output).unwrap();

    assert!(html.contains(r#"href="css/site.min.css""#), "{html}");
    assert!(html.contains("../../../concat/~app~0.2.0~views~a.min.css,~lib~1.0.0~b.js"), "{html}");
    assert!(html.contains(r#"href="https://example.com/app/views/about.html""#), "{html}");
    assert!(html.contains(r#"src="../../../bar/1.4.2/x.js""#), "{html}");
    assert!(html.contains(r#"<script src="../../../neuron/4.2.0/neuron.js"></script>"#), "{html}");
    assert!(html.contains("<script>neuron.config("), "{html}");
    assert!(html.contains(r#"<script>facade({"entry":"app@0.2.0"});</script>"#), "{html}");
    assert!(html.contains("<!-- 0.2.0 -->"), "{html}");
}

#[test]
fn test_render_to_file() {
    let project = project();
    facade_cmd(&project)
        .args(["render", "views/index.html", "-o", "dist/index.html"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Rendered"));

    let html = fs::read_to_string(project.join("dist/index.html")).unwrap();
    assert!(html.contains("bar/1.4.2/x.js"));
}

#[test]
fn test_quiet_suppresses_status() {
    let project = project();
    facade_cmd(&project)
        .args(["-q", "render", "views/index.html", "-o", "out.html"])
        .assert()
        .success()
        .stderr(predicate::str::is_empty());
}

#[test]
fn test_render_with_hosts() {
    let project = project();
    let output = facade_cmd(&project)
        .args(["render", "views/index.html", "--host", "s1.cdn.com", "--host", "s2.cdn.com"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let html = String::from_utf8(output).unwrap();

    assert!(html.contains(r#"src="//s1.cdn.com/bar/1.4.2/x.js""#), "{html}");
    assert!(html.contains(r#""hosts":["s1.cdn.com","s2.cdn.com"]"#), "{html}");
}

#[test]
fn test_render_from_other_directory() {
    let project = project();
    let elsewhere = tempfile::TempDir::new().unwrap();
    let mut cmd = facade_cmd(&project);
    cmd.current_dir(elsewhere.path())
        .arg("-C")
        .arg(project.path())
        .args(["render", "views/index.html"])
        .assert()
        .success()
        .stdout(predicate::str::contains("bar/1.4.2/x.js"));
}

#[test]
#[serial]
fn test_cache_busting_from_env() {
    let project = ProjectFixture::with_lock_graph(&LockGraphFixture::basic()).unwrap();
    project.add_hash_manifest(".", "foo", "0.2.0", &[("foo.js", "f00d")]).unwrap();
    project.add_file("index.html", "{{ modfile() }}").unwrap();

    facade_cmd(&project)
        .args(["render", "index.html"])
        .assert()
        .success()
        .stdout("../../foo/0.2.0/foo.js");

    facade_cmd(&project)
        .env("FACADE_CACHE_BUSTING", "1")
        .args(["render", "index.html"])
        .assert()
        .success()
        .stdout("../../foo/0.2.0/foo_f00d.js");

    // The environment wins over the flag.
    facade_cmd(&project)
        .env("FACADE_CACHE_BUSTING", "off")
        .args(["render", "index.html", "--cache-busting"])
        .assert()
        .success()
        .stdout("../../foo/0.2.0/foo.js");
}
