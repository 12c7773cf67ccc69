//! In-memory ports for integration tests.
#![allow(dead_code)]

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use depscan::app::engine::AnalysisEngine;
use depscan::domain::error::{AnalysisError, ReadError};
use depscan::domain::node::SourceFileId;
use depscan::domain::options::AnalysisOptions;
use depscan::domain::ports::{FileDiscovery, SourceReader};

/// A project held in memory. `None` contents read as an I/O failure.
#[derive(Default)]
pub struct MockProject {
    files: BTreeMap<String, Option<String>>,
}

impl MockProject {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: &str, contents: &str) -> Self {
        self.files.insert(path.to_string(), Some(contents.to_string()));
        self
    }

    pub fn with_unreadable(mut self, path: &str) -> Self {
        self.files.insert(path.to_string(), None);
        self
    }

    pub fn engine(self) -> AnalysisEngine {
        let project = Arc::new(self);
        AnalysisEngine::new(project.clone(), project)
    }
}

impl FileDiscovery for MockProject {
    fn discover(
        &self,
        _root: &Path,
        options: &AnalysisOptions,
    ) -> Result<Vec<SourceFileId>, AnalysisError> {
        let extensions = options.normalized_extensions();
        Ok(self
            .files
            .keys()
            .filter(|path| {
                path.rsplit_once('.')
                    .is_some_and(|(_, ext)| extensions.iter().any(|known| known == ext))
            })
            .map(|path| SourceFileId::new(path.as_str()))
            .collect())
    }
}

impl SourceReader for MockProject {
    fn read(&self, _root: &Path, file: &SourceFileId, _max_bytes: u64) -> Result<String, ReadError> {
        match self.files.get(file.as_str()) {
            Some(Some(contents)) => Ok(contents.clone()),
            _ => Err(ReadError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "permission denied",
            ))),
        }
    }
}
