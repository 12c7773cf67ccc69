use crate::domain::diagnostics::Diagnostic;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::BTreeSet;
use std::fmt;
use std::path::{Component, Path};

/// Root-relative, `/`-separated path of a discovered source file.
///
/// Uniquely keys a node for the lifetime of one analysis run.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceFileId(String);

impl SourceFileId {
    /// Builds an id from a path-like string, normalizing separators and a leading `./`.
    pub fn new(path: impl Into<String>) -> Self {
        let raw: String = path.into();
        let unified = raw.replace('\\', "/");
        let trimmed = unified.trim_start_matches("./").trim_start_matches('/');
        Self(trimmed.to_string())
    }

    /// Builds an id from a path already relative to the analysis root.
    pub fn from_relative_path(path: &Path) -> Self {
        let parts: Vec<String> = path
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect();
        Self(parts.join("/"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Directory part of the id (`""` for files at the root).
    pub fn directory(&self) -> &str {
        self.0.rfind('/').map(|pos| &self.0[..pos]).unwrap_or("")
    }

    pub fn file_name(&self) -> &str {
        self.0.rfind('/').map(|pos| &self.0[pos + 1..]).unwrap_or(&self.0)
    }

    /// File name without its last extension (`src/app.tsx` -> `app`).
    pub fn stem(&self) -> &str {
        let name = self.file_name();
        match name.rfind('.') {
            Some(0) | None => name,
            Some(pos) => &name[..pos],
        }
    }
}

impl fmt::Display for SourceFileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SourceFileId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for SourceFileId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SourceFileId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Node weight stored in the dependency graph arena.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileNode {
    pub id: SourceFileId,
    /// Recoverable problems found while reading or resolving this file.
    pub diagnostics: Vec<Diagnostic>,
}

impl FileNode {
    pub fn new(id: SourceFileId) -> Self {
        Self {
            id,
            diagnostics: Vec::new(),
        }
    }
}

/// Owned view of one node and both of its edge sets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyNode {
    pub id: SourceFileId,
    pub imports: BTreeSet<SourceFileId>,
    pub imported_by: BTreeSet<SourceFileId>,
}
