//! End-to-end tests: real directory tree, file system adapters, full pipeline.

mod common;

use std::time::Duration;

use common::fixtures::{project, sample_app, write};
use depscan::app::engine::AnalysisEngine;
use depscan::domain::error::AnalysisError;
use depscan::{AnalysisOptions, build_dependency_graph};

#[test]
fn test_sample_app_report() {
    let dir = sample_app();
    let result = build_dependency_graph(dir.path(), &AnalysisOptions::default()).unwrap();

    let ids: Vec<&str> = result.nodes.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(
        ids,
        vec![
            "src/app.tsx",
            "src/index.ts",
            "src/legacy/old.js",
            "src/services/api.ts",
            "src/services/store.ts",
        ]
    );
    assert_eq!(result.edge_count, 4);
    assert_eq!(result.external_packages, vec!["lodash", "react", "react-dom"]);
    assert_eq!(
        result.cycles,
        vec![vec![
            "src/services/api.ts",
            "src/services/store.ts",
            "src/services/api.ts"
        ]]
    );
    assert_eq!(result.orphans, vec!["src/legacy/old.js"]);
    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(
        result.diagnostics[0].specifier.as_deref(),
        Some("../config/missing")
    );
    assert!(!result.truncated);
}

#[test]
fn test_gitignore_and_custom_ignore_patterns() {
    let dir = sample_app();
    write(dir.path(), ".gitignore", "src/legacy/\n");
    let result = build_dependency_graph(dir.path(), &AnalysisOptions::default()).unwrap();
    assert!(result.node("src/legacy/old.js").is_none());
    assert!(result.orphans.is_empty());

    let options = AnalysisOptions::default().with_ignore_patterns(["services", "node_modules"]);
    let result = build_dependency_graph(dir.path(), &options).unwrap();
    assert_eq!(result.node_count, 2);
    assert!(result.node("node_modules/react/index.js").is_none());

    // custom patterns replace the defaults
    let options = AnalysisOptions::default().with_ignore_patterns(["services"]);
    let result = build_dependency_graph(dir.path(), &options).unwrap();
    assert_eq!(result.node_count, 3);
    assert!(result.node("node_modules/react/index.js").is_some());
    assert!(result.cycles.is_empty());
    assert_eq!(result.node("src/app.tsx").unwrap().imports, Vec::<String>::new());
}

#[test]
fn test_unreadable_files_stay_in_graph() {
    let dir = project(&[("index.js", "import './big';\nimport './bin';\n")]);
    write(dir.path(), "big.js", &"// padding\n".repeat(100));
    std::fs::write(dir.path().join("bin.js"), [0u8, 1, 2, 3]).unwrap();

    let options = AnalysisOptions {
        max_file_bytes: 256,
        ..AnalysisOptions::default()
    };
    let result = build_dependency_graph(dir.path(), &options).unwrap();

    assert_eq!(result.node_count, 3);
    assert_eq!(result.node("index.js").unwrap().imports, vec!["big.js", "bin.js"]);
    let kinds: Vec<(&str, &str)> = result
        .diagnostics
        .iter()
        .map(|d| (d.file.as_str(), d.kind.as_str()))
        .collect();
    assert_eq!(
        kinds,
        vec![("big.js", "unreadable_file"), ("bin.js", "unreadable_file")]
    );
}

#[test]
fn test_max_files_and_deadline() {
    let dir = sample_app();

    let options = AnalysisOptions::default().with_max_files(2);
    let result = build_dependency_graph(dir.path(), &options).unwrap();
    assert!(result.truncated);
    assert_eq!(result.node_count, 2);

    let options = AnalysisOptions::default().with_deadline(Duration::ZERO);
    let result = build_dependency_graph(dir.path(), &options).unwrap();
    assert_eq!(result.node_count, 5);
    assert_eq!(result.edge_count, 0);
    assert!(
        result
            .diagnostics
            .iter()
            .all(|d| d.kind == "read_deadline_exceeded")
    );
}

#[test]
fn test_file_query_on_disk() {
    let dir = sample_app();
    let deps = AnalysisEngine::filesystem()
        .file(dir.path(), "src/services/store.ts", None)
        .unwrap();
    assert_eq!(deps.imports.len(), 1);
    assert_eq!(deps.imports[0].target, "src/services/api.ts");
    assert_eq!(deps.imported_by, vec!["src/services/api.ts"]);
    assert_eq!(deps.cycles.len(), 1);
    assert!(!deps.is_orphan);
    assert!(!deps.is_entry_point);
}

#[test]
fn test_missing_root_is_an_error() {
    let dir = project(&[]);
    let err = build_dependency_graph(&dir.path().join("absent"), &AnalysisOptions::default())
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<AnalysisError>(),
        Some(AnalysisError::Discovery { .. })
    ));
}

#[test]
fn test_discovered_files_are_resolvable() {
    let dir = project(&[
        ("main.ts", "import './Comp';\nimport './Other';\n"),
        ("Comp.tsx", ""),
        ("Other.TSX", ""),
    ]);
    let result = build_dependency_graph(dir.path(), &AnalysisOptions::default()).unwrap();

    let ids: Vec<&str> = result.nodes.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, vec!["Comp.tsx", "main.ts"]);
    assert_eq!(result.node("main.ts").unwrap().imports, vec!["Comp.tsx"]);
    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(result.diagnostics[0].specifier.as_deref(), Some("./Other"));
}
