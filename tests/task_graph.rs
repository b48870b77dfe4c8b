mod common;
use crate::common::{graph_from_yaml, init_tracing};

use std::error::Error;

use cigraph::config::parse_document;
use cigraph::dag::{GraphOptions, TaskGraph};
use cigraph::errors::CigraphError;
use cigraph_test_utils::builders::{DocumentBuilder, TaskBuilder};

type TestResult = Result<(), Box<dyn Error>>;

fn names<'a>(tasks: impl IntoIterator<Item = &'a cigraph::dag::Task>) -> Vec<&'a str> {
    tasks.into_iter().map(|t| t.name()).collect()
}

#[test]
fn task_keys_are_stripped_and_other_keys_ignored() -> TestResult {
    init_tracing();

    let graph = graph_from_yaml(
        r#"
env:
  FOO: bar
container:
  image: fedora
lint_task:
  script: make lint
image_docker_builder:
  script: make image
gcp_credentials: ENCRYPTED[abc]
"#,
    )?;

    assert_eq!(names(graph.tasks()), vec!["image", "lint"]);
    assert_eq!(graph.get("lint").map(|t| t.key()), Some("lint_task"));
    assert_eq!(graph.env().get("FOO").map(String::as_str), Some("bar"));
    Ok(())
}

#[test]
fn start_nodes_are_tasks_without_dependencies_sorted_by_name() -> TestResult {
    init_tracing();

    let graph = DocumentBuilder::new()
        .with_task("zeta_task", TaskBuilder::new().build())
        .with_task("mid_task", TaskBuilder::new().depends_on("alpha").build())
        .with_task("alpha_task", TaskBuilder::new().build())
        .graph();

    assert_eq!(names(graph.start_nodes()), vec!["alpha", "zeta"]);

    let mid = graph.find("mid")?;
    assert!(!mid.is_start_node());
    assert_eq!(names(mid.depends_on(&graph)?), vec!["alpha"]);
    Ok(())
}

#[test]
fn dependents_are_sorted_and_resolved() -> TestResult {
    init_tracing();

    let graph = DocumentBuilder::new()
        .with_task("lint_task", TaskBuilder::new().build())
        .with_task("unit_task", TaskBuilder::new().depends_on("lint").build())
        .with_task("docs_task", TaskBuilder::new().depends_on("lint").build())
        .with_task("build_task", TaskBuilder::new().depends_on("lint").build())
        .graph();

    let lint = graph.find("lint")?;
    assert_eq!(names(lint.depended_on_by(&graph)?), vec!["build", "docs", "unit"]);
    assert_eq!(graph.dependents_of("lint"), ["build", "docs", "unit"]);
    assert!(graph.dependents_of("unit").is_empty());
    Ok(())
}

#[test]
fn alias_references_resolve_both_ways() -> TestResult {
    init_tracing();

    let graph = DocumentBuilder::new()
        .with_task("validate_task", TaskBuilder::new().alias("X").build())
        .with_task("build_task", TaskBuilder::new().depends_on("X").build())
        .with_task("test_task", TaskBuilder::new().depends_on("validate").build())
        .graph();

    let validate = graph.find("X")?;
    assert_eq!(validate.name(), "validate");
    assert_eq!(
        names(validate.depended_on_by(&graph)?),
        vec!["build", "test"]
    );

    let build = graph.find("build")?;
    assert_eq!(names(build.depends_on(&graph)?), vec!["validate"]);
    Ok(())
}

#[test]
fn name_match_wins_over_alias_match() -> TestResult {
    init_tracing();

    let graph = DocumentBuilder::new()
        .with_task("lint_task", TaskBuilder::new().build())
        .with_task("other_task", TaskBuilder::new().alias("lint").build())
        .with_task("build_task", TaskBuilder::new().depends_on("lint").build())
        .graph();

    assert_eq!(graph.find("lint")?.name(), "lint");
    assert_eq!(names(graph.find("lint")?.depended_on_by(&graph)?), vec!["build"]);
    assert!(graph.find("other")?.depended_on_by(&graph)?.is_empty());
    Ok(())
}

#[test]
fn shared_alias_is_ambiguous() {
    init_tracing();

    let graph = DocumentBuilder::new()
        .with_task("a_task", TaskBuilder::new().alias("X").build())
        .with_task("b_task", TaskBuilder::new().alias("X").build())
        .graph();

    match graph.find("X") {
        Err(CigraphError::AmbiguousReference {
            identifier,
            candidates,
            referrer,
        }) => {
            assert_eq!(identifier, "X");
            assert_eq!(candidates, vec!["a".to_string(), "b".to_string()]);
            assert_eq!(referrer, None);
        }
        other => panic!("expected AmbiguousReference, got {other:?}"),
    }
}

#[test]
fn ambiguous_dependency_aborts_construction() {
    init_tracing();

    let doc = DocumentBuilder::new()
        .with_task("a_task", TaskBuilder::new().alias("X").build())
        .with_task("b_task", TaskBuilder::new().alias("X").build())
        .with_task("c_task", TaskBuilder::new().depends_on("X").build())
        .build();

    let err = TaskGraph::from_document(&doc, &GraphOptions::default()).unwrap_err();
    assert!(
        matches!(
            &err,
            CigraphError::AmbiguousReference { identifier, referrer: Some(r), .. }
                if identifier == "X" && r == "c"
        ),
        "unexpected error: {err:?}"
    );
}

#[test]
fn unknown_dependency_aborts_construction_naming_identifier() {
    init_tracing();

    let doc = DocumentBuilder::new()
        .with_task("lint_task", TaskBuilder::new().build())
        .with_task("build_task", TaskBuilder::new().depends_on("nope").build())
        .build();

    let err = TaskGraph::from_document(&doc, &GraphOptions::default()).unwrap_err();
    match &err {
        CigraphError::UnresolvedReference {
            identifier,
            referrer,
        } => {
            assert_eq!(identifier, "nope");
            assert_eq!(referrer.as_deref(), Some("build"));
        }
        other => panic!("expected UnresolvedReference, got {other:?}"),
    }
    let msg = err.to_string();
    assert!(msg.contains("'nope'"), "message was: {msg}");
    assert!(msg.contains("'build'"), "message was: {msg}");
}

#[test]
fn find_unknown_identifier_is_unresolved() {
    init_tracing();

    let graph = DocumentBuilder::new()
        .with_task("lint_task", TaskBuilder::new().build())
        .graph();

    assert!(matches!(
        graph.find("missing"),
        Err(CigraphError::UnresolvedReference { referrer: None, .. })
    ));
}

#[test]
fn placeholder_key_takes_alias_then_name() -> TestResult {
    init_tracing();

    let graph = graph_from_yaml(
        r#"
task:
  alias: setup
  name: Set things up
docker_builder:
  name: image
"#,
    )?;

    assert_eq!(names(graph.tasks()), vec!["image", "setup"]);
    assert_eq!(graph.find("setup")?.display_name(), "Set things up");
    Ok(())
}

#[test]
fn duplicate_names_are_rejected() {
    init_tracing();

    let doc = DocumentBuilder::new()
        .with_task("foo_task", TaskBuilder::new().build())
        .with_task("task", TaskBuilder::new().alias("foo").build())
        .build();

    let err = TaskGraph::from_document(&doc, &GraphOptions::default()).unwrap_err();
    assert!(
        matches!(&err, CigraphError::DuplicateTask(name) if name == "foo"),
        "unexpected error: {err:?}"
    );
}

#[test]
fn depends_on_accepts_a_single_string_and_empty_tasks() -> TestResult {
    init_tracing();

    let graph = graph_from_yaml(
        r#"
lint_task:
build_task:
  depends_on: lint
"#,
    )?;

    assert_eq!(graph.find("build")?.raw_depends_on(), ["lint"]);
    assert_eq!(names(graph.start_nodes()), vec!["lint"]);
    Ok(())
}

#[test]
fn yaml_merge_keys_are_applied() -> TestResult {
    init_tracing();

    let graph = graph_from_yaml(
        r#"
common: &common
  depends_on:
    - lint
lint_task:
  alias: lint
unit_task:
  <<: *common
integration_task:
  <<: *common
"#,
    )?;

    assert_eq!(names(graph.start_nodes()), vec!["lint"]);
    assert_eq!(graph.dependents_of("lint"), ["integration", "unit"]);
    Ok(())
}

#[test]
fn cycles_warn_by_default_and_fail_when_rejected() {
    init_tracing();

    let doc = DocumentBuilder::new()
        .with_task("a_task", TaskBuilder::new().depends_on("b").build())
        .with_task("b_task", TaskBuilder::new().depends_on("a").build())
        .build();

    let graph = TaskGraph::from_document(&doc, &GraphOptions::default())
        .expect("cycles are tolerated by default");
    assert!(graph.start_nodes().is_empty());

    let err = TaskGraph::from_document(&doc, &GraphOptions { reject_cycles: true }).unwrap_err();
    assert!(
        matches!(err, CigraphError::DagCycle(_)),
        "unexpected error: {err:?}"
    );
}

#[test]
fn non_mapping_document_is_a_config_error() -> TestResult {
    init_tracing();

    let doc = parse_document("- just\n- a list\n")?;
    let err = TaskGraph::from_document(&doc, &GraphOptions::default()).unwrap_err();
    assert!(matches!(err, CigraphError::ConfigError(_)));
    Ok(())
}

#[test]
fn empty_document_is_an_empty_graph() -> TestResult {
    init_tracing();

    for text in ["", "# nothing here yet\n"] {
        let graph = graph_from_yaml(text)?;
        assert!(graph.is_empty());
        assert_eq!(graph.len(), 0);
        assert!(graph.start_nodes().is_empty());
        assert_eq!(graph.name(), None);
    }
    Ok(())
}

#[test]
fn scalar_depends_on_entries_are_identifiers() -> TestResult {
    init_tracing();

    let graph = graph_from_yaml(
        r#"
"42_task":
  alias: answer
build_task:
  depends_on: [42, ~, [nested]]
test_task:
  depends_on: answer
"#,
    )?;

    assert_eq!(graph.find("build")?.raw_depends_on(), ["42"]);
    assert_eq!(
        names(graph.find("42")?.depended_on_by(&graph)?),
        vec!["build", "test"]
    );
    assert_eq!(names(graph.start_nodes()), vec!["42"]);
    Ok(())
}
