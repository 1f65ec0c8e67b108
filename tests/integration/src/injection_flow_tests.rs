//! End-to-end injection flow
//!
//! Template config file -> resolved chunks -> batch run against a real
//! project directory.

use std::collections::HashSet;

use pretty_assertions::assert_eq;
use scaffold_config::{ChunkResolver, TemplateConfig, replacements};
use scaffold_fs::NormalizedPath;
use scaffold_inject::{
    BatchOptions, BatchRunner, FsTargetStore, InjectReport, ProjectSourceFetcher, Replacements,
};
use scaffold_test_utils::{TEMPLATE_CONTENT, TestProject};

const TEMPLATE_FILES: [&str; 3] = ["test/test.md", "test/test.txt", "test/test.html"];

fn project_with(config: &str) -> TestProject {
    let mut project = TestProject::new().with_file(".scaffold.yml", config);
    for file in TEMPLATE_FILES {
        project = project.with_file(file, TEMPLATE_CONTENT);
    }
    project
}

fn run(project: &TestProject, base_url: &str, options: BatchOptions) -> InjectReport {
    run_with(project, base_url, options, Replacements::new())
}

fn run_with(
    project: &TestProject,
    base_url: &str,
    options: BatchOptions,
    replacements: Replacements,
) -> InjectReport {
    let config =
        TemplateConfig::load(&NormalizedPath::new(project.path(".scaffold.yml"))).unwrap();
    let chunks = ChunkResolver::new(&config)
        .with_base_url(base_url)
        .resolve(&config);
    let store = FsTargetStore::new(project.root());
    let fetcher = ProjectSourceFetcher::new(project.root())
        .unwrap()
        .with_replacements(replacements);
    BatchRunner::new(&store, &fetcher, options).run(&chunks)
}

fn doubled(pattern: &str) -> String {
    format!("{TEMPLATE_CONTENT}\n\n{pattern}\n\n{TEMPLATE_CONTENT}\n\n{pattern}")
}

#[test]
fn test_file_source_injected_into_target() {
    let project = project_with(
        r#"
inject:
  - id: support
    file: test/test.md
    target: test/test.html
    pattern: "<!-- auto-support -->"
"#,
    );

    let report = run(&project, "http://unused/", BatchOptions::default());

    assert_eq!(report.summary(), "1 chunk(s) injected, 0 skipped, 0 failed");
    project.assert_file_content("test/test.html", &doubled("<!-- auto-support -->"));
    project.assert_file_content("test/test.txt", TEMPLATE_CONTENT);
}

#[test]
fn test_wrongly_configured_entry_is_not_injected() {
    let project = project_with(
        r#"
inject:
  - id: support
    file: test/test.md
    target: test/test.html
    pattern: "<!-- auto-support -->"
  - id: hello
    target: [test/test.txt]
"#,
    );

    let report = run(&project, "http://unused/", BatchOptions::default());

    assert_eq!(report.outcomes.len(), 1);
    project.assert_file_content("test/test.txt", TEMPLATE_CONTENT);
}

#[test]
fn test_ignored_file_source_fetched_from_template() {
    let mut server = mockito::Server::new();
    let _m = server
        .mock("GET", "/test/test/master/test/test.md")
        .with_status(200)
        .with_body(TEMPLATE_CONTENT)
        .create();
    let project = project_with(
        r#"
inject:
  - id: support
    file: test/test.md
    target: test/test.html
    pattern: "<!-- auto-support -->"
ignore: [test/test.md]
"#,
    );
    std::fs::remove_file(project.path("test/test.md")).unwrap();

    let report = run(
        &project,
        &format!("{}/test/test/master/", server.url()),
        BatchOptions::default(),
    );

    assert_eq!(report.injected().len(), 1);
    project.assert_file_content("test/test.html", &doubled("<!-- auto-support -->"));
    project.assert_missing("test/test.md");
}

#[test]
fn test_wrap_after_only() {
    let project = project_with(
        r#"
inject:
  - id: support
    file: test/test.md
    target: test/test.html
    pattern: "<!-- auto-support -->"
    wrap: [after]
"#,
    );

    run(&project, "http://unused/", BatchOptions::default());

    project.assert_file_content(
        "test/test.html",
        &format!("{TEMPLATE_CONTENT}\n\n{TEMPLATE_CONTENT}\n\n<!-- auto-support -->"),
    );
}

#[test]
fn test_second_run_skips_until_forced() {
    let project = project_with(
        r#"
inject:
  - id: support
    file: test/test.md
    target: test/test.html
"#,
    );

    run(&project, "http://unused/", BatchOptions::default());
    let first = project.read("test/test.html");
    let second = run(&project, "http://unused/", BatchOptions::default());
    let forced = run(
        &project,
        "http://unused/",
        BatchOptions {
            force: true,
            ..Default::default()
        },
    );

    assert_eq!(second.skipped().len(), 1);
    assert_eq!(forced.injected().len(), 1);
    assert_eq!(project.read("test/test.html"), first);
}

#[test]
fn test_conditions_filter_targets() {
    let project = project_with(
        r#"
inject:
  - id: fresh
    file: test/test.md
    target: [test/test.html, test/new.md]
    if: no-file
"#,
    );

    let report = run(&project, "http://unused/", BatchOptions::default());

    assert_eq!(
        InjectReport::display(&report.injected()),
        vec!["test/new.md (test/test.md)"]
    );
    assert_eq!(
        InjectReport::display(&report.skipped()),
        vec!["test/test.html (test/test.md)"]
    );
    project.assert_file_content("test/test.html", TEMPLATE_CONTENT);
}

#[test]
fn test_only_fresh_targets_are_touched() {
    let project = project_with(
        r#"
inject:
  - id: x
    file: test/test.md
    target: [test/test.html, test/test.txt]
"#,
    );
    let options = BatchOptions {
        fresh_targets: Some(HashSet::from([NormalizedPath::new("test/test.txt")])),
        ..Default::default()
    };

    let report = run(&project, "http://unused/", options);

    assert_eq!(report.summary(), "1 chunk(s) injected, 1 skipped, 0 failed");
    project.assert_file_content("test/test.html", TEMPLATE_CONTENT);
}

#[test]
fn test_placeholders_replaced_in_file_sources() {
    let project = project_with(
        r#"
replace_filter: '\.md$'
inject:
  - id: name
    file: test/test.md
    target: out.md
  - id: name
    file: test/test.txt
    target: out.txt
"#,
    );
    let config =
        TemplateConfig::load(&NormalizedPath::new(project.path(".scaffold.yml"))).unwrap();
    let replacements = replacements(&config, [("project_name", "hello world")]).unwrap();

    run_with(&project, "http://unused/", BatchOptions::default(), replacements);

    assert!(project.read("out.md").contains("# hello world"));
    assert!(project.read("out.txt").contains("# {{project_name}}"));
}

#[cfg(not(windows))]
#[test]
fn test_command_sources_and_anchors() {
    let project = project_with(
        r###"
inject:
  - id: hello
    command: echo "hello world"
    target: [test/test.md, test/test.txt]
    before: "## Options"
  - id: broken
    command: ls /definitely/not/here
    target: test/test.html
"###,
    );

    let report = run(&project, "http://unused/", BatchOptions::default());

    assert_eq!(report.injected().len(), 2);
    assert_eq!(report.failed().len(), 1);
    let expected = TEMPLATE_CONTENT.replace(
        "## Options",
        "<!-- hello -->\n\nhello world\n\n<!-- hello -->\n## Options",
    );
    project.assert_file_content("test/test.md", &expected);
    project.assert_file_content("test/test.txt", &expected);
    project.assert_file_content("test/test.html", TEMPLATE_CONTENT);
    let failed_var = report
        .env_vars()
        .into_iter()
        .find(|(name, _)| name == "SCAFFOLD_FAILED_CHUNKS")
        .unwrap();
    assert!(failed_var.1.starts_with("test/test.html (ls /definitely/not/here)"));
}
