//! On-disk project fixtures for integration tests.
#![allow(dead_code)]

use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Write `files` (root-relative path, contents) under a fresh temporary root.
pub fn project(files: &[(&str, &str)]) -> TempDir {
    let dir = tempfile::tempdir().expect("create temp dir");
    for (path, contents) in files {
        write(dir.path(), path, contents);
    }
    dir
}

pub fn write(root: &Path, rel: &str, contents: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dirs");
    }
    fs::write(path, contents).expect("write fixture file");
}

/// A small TypeScript app: entry, a two-file cycle, one orphan, one
/// unresolved import and two external packages.
pub fn sample_app() -> TempDir {
    project(&[
        (
            "src/index.ts",
            "import { render } from 'react-dom';\nimport { App } from './app';\nrender(App);\n",
        ),
        (
            "src/app.tsx",
            "import React from 'react';\nimport { api } from './services/api';\nexport const App = () => api;\n",
        ),
        (
            "src/services/api.ts",
            "import { store } from './store';\nexport const api = store;\n",
        ),
        (
            "src/services/store.ts",
            "import { api } from './api';\nimport { cfg } from '../config/missing';\nexport const store = {};\n",
        ),
        ("src/legacy/old.js", "module.exports = require('lodash/merge');\n"),
        ("node_modules/react/index.js", "module.exports = {};\n"),
        ("README.md", "import x from './not-code';\n"),
    ])
}
