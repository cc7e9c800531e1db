//! Failure modes: missing files, malformed syntax, ancestor failures.

use loadtmpl::{DirSource, FunctionMap, LoadError, Loader};
use tera::Context;

use crate::common::fixture_dir;

#[test]
fn missing_file_is_not_found_and_nothing_is_cached() {
    let dir = fixture_dir(&[]);
    let loader = Loader::new(DirSource::new(dir.path()), FunctionMap::new());

    let err = loader.load("/late.html").unwrap_err();
    assert!(matches!(err, LoadError::NotFound { .. }), "got {err:?}");

    // No negative entry was cached: once the file exists the same loader
    // serves it.
    std::fs::write(dir.path().join("late.html"), "late").unwrap();
    let template = loader.load("/late.html").unwrap();
    assert_eq!(template.render(&Context::new()).unwrap(), "late");
}

#[test]
fn malformed_root_is_a_parse_error_and_nothing_is_cached() {
    let dir = fixture_dir(&[("bad.html", "{% block a %}unclosed")]);
    let loader = Loader::new(DirSource::new(dir.path()), FunctionMap::new());

    let err = loader.load("/bad.html").unwrap_err();
    match &err {
        LoadError::Parse { name, .. } => assert_eq!(name, "/bad.html"),
        other => panic!("expected parse error, got {other:?}"),
    }

    // No partial entry: fixing the file makes the same name loadable.
    std::fs::write(
        dir.path().join("bad.html"),
        "{% block a %}closed{% endblock %}",
    )
    .unwrap();
    let template = loader.load("/bad.html").unwrap();
    assert_eq!(template.render(&Context::new()).unwrap(), "closed");
}

#[test]
fn missing_parent_surfaces_ancestor_context() {
    let dir = fixture_dir(&[(
        "b.html",
        "{# extends \"a.html\" #}{% block a %}b{% endblock %}",
    )]);
    let loader = Loader::new(DirSource::new(dir.path()), FunctionMap::new());

    let err = loader.load("/b.html").unwrap_err();
    match &err {
        LoadError::Ancestor { name, parent, source } => {
            assert_eq!(name, "/b.html");
            assert_eq!(parent, "a.html");
            assert!(matches!(source.as_ref(), LoadError::NotFound { .. }));
        }
        other => panic!("expected ancestor error, got {other:?}"),
    }
    assert!(err.is_not_found());
    assert!(err.to_string().contains("a.html"));
}

#[test]
fn malformed_ancestor_fails_the_whole_chain() {
    let dir = fixture_dir(&[
        ("a.html", "{% block a %}unclosed"),
        (
            "b.html",
            "{# extends \"a.html\" #}{% block a %}b{% endblock %}",
        ),
    ]);
    let loader = Loader::new(DirSource::new(dir.path()), FunctionMap::new());

    let err = loader.load("/b.html").unwrap_err();
    match &err {
        LoadError::Ancestor { parent, source, .. } => {
            assert_eq!(parent, "a.html");
            assert!(matches!(source.as_ref(), LoadError::Parse { .. }));
        }
        other => panic!("expected ancestor error, got {other:?}"),
    }
}

#[test]
fn loader_stays_usable_after_failures() {
    let dir = fixture_dir(&[("good.html", "fine")]);
    let loader = Loader::new(DirSource::new(dir.path()), FunctionMap::new());

    assert!(loader.load("/missing.html").is_err());
    let template = loader.load("/good.html").unwrap();
    assert_eq!(template.render(&Context::new()).unwrap(), "fine");
}
