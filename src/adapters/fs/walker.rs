use crate::domain::error::AnalysisError;
use crate::domain::node::SourceFileId;
use crate::domain::options::AnalysisOptions;
use crate::domain::ports::FileDiscovery;
use glob::Pattern;
use ignore::WalkBuilder;
use std::path::{Component, Path};

/// File system discovery backed by `ignore::WalkBuilder`.
///
/// `.gitignore` files are honored; hidden files are not skipped by default so
/// that only the configured ignore patterns decide what is pruned.
pub struct FsDiscovery;

impl Default for FsDiscovery {
    fn default() -> Self {
        Self::new()
    }
}

impl FsDiscovery {
    pub fn new() -> Self {
        Self
    }
}

impl FileDiscovery for FsDiscovery {
    fn discover(
        &self,
        root: &Path,
        options: &AnalysisOptions,
    ) -> Result<Vec<SourceFileId>, AnalysisError> {
        let metadata = std::fs::metadata(root).map_err(|e| AnalysisError::Discovery {
            root: root.to_path_buf(),
            reason: e.to_string(),
        })?;
        if !metadata.is_dir() {
            return Err(AnalysisError::Discovery {
                root: root.to_path_buf(),
                reason: "not a directory".to_string(),
            });
        }

        let matcher = IgnoreMatcher::new(&options.ignore_patterns)?;
        let extensions = options.normalized_extensions();

        let filter_root = root.to_path_buf();
        let filter_matcher = matcher.clone();
        let walker = WalkBuilder::new(root)
            .hidden(false)
            .git_ignore(true)
            .git_global(false)
            .git_exclude(false)
            .require_git(false)
            .follow_links(false)
            .filter_entry(move |entry| match entry.path().strip_prefix(&filter_root) {
                Ok(rel) if rel.as_os_str().is_empty() => true,
                Ok(rel) => !filter_matcher.is_ignored(rel),
                Err(_) => true,
            })
            .build();

        let mut files = Vec::new();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::warn!(error = %err, "skipping unreadable directory entry");
                    continue;
                }
            };
            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                continue;
            }
            let path = entry.path();
            // Exact match: the resolver only tries these spellings.
            let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
                continue;
            };
            if !extensions.iter().any(|known| known == ext) {
                continue;
            }
            let Ok(rel) = path.strip_prefix(root) else {
                continue;
            };
            files.push(SourceFileId::from_relative_path(rel));
        }

        files.sort();
        files.dedup();
        tracing::debug!(root = %root.display(), files = files.len(), "discovery finished");
        Ok(files)
    }
}

/// Glob patterns matched against each path segment and the whole relative path.
#[derive(Debug, Clone)]
struct IgnoreMatcher {
    patterns: Vec<Pattern>,
}

impl IgnoreMatcher {
    fn new(patterns: &[String]) -> Result<Self, AnalysisError> {
        let patterns = patterns
            .iter()
            .map(|p| {
                Pattern::new(p).map_err(|e| AnalysisError::InvalidPattern {
                    pattern: p.clone(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    fn is_ignored(&self, rel: &Path) -> bool {
        let full = SourceFileId::from_relative_path(rel);
        let segment_hit = rel.components().any(|c| match c {
            Component::Normal(part) => {
                let part = part.to_string_lossy();
                self.patterns.iter().any(|p| p.matches(&part))
            }
            _ => false,
        });
        segment_hit || self.patterns.iter().any(|p| p.matches(full.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    #[test]
    fn test_discovers_sorted_source_files() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "src/b.ts");
        touch(dir.path(), "src/a.js");
        touch(dir.path(), "README.md");
        touch(dir.path(), "index.tsx");

        let files = FsDiscovery::new()
            .discover(dir.path(), &AnalysisOptions::default())
            .unwrap();
        let ids: Vec<&str> = files.iter().map(|f| f.as_str()).collect();
        assert_eq!(ids, vec!["index.tsx", "src/a.js", "src/b.ts"]);
    }

    #[test]
    fn test_extension_match_is_case_sensitive() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "main.ts");
        touch(dir.path(), "Comp.TSX");
        touch(dir.path(), "Widget.tsx");

        let options = AnalysisOptions::default().with_extensions([".TSX", "ts"]);
        let files = FsDiscovery::new().discover(dir.path(), &options).unwrap();
        let ids: Vec<&str> = files.iter().map(|f| f.as_str()).collect();
        assert_eq!(ids, vec!["Widget.tsx", "main.ts"]);
    }

    #[test]
    fn test_default_ignores_dependency_and_build_dirs() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "src/a.ts");
        touch(dir.path(), "node_modules/react/index.js");
        touch(dir.path(), "dist/bundle.js");
        touch(dir.path(), "packages/x/node_modules/y/index.js");
        touch(dir.path(), ".git/hooks/pre-commit.js");

        let files = FsDiscovery::new()
            .discover(dir.path(), &AnalysisOptions::default())
            .unwrap();
        let ids: Vec<&str> = files.iter().map(|f| f.as_str()).collect();
        assert_eq!(ids, vec!["src/a.ts"]);
    }

    #[test]
    fn test_custom_patterns_and_extensions() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "src/a.ts");
        touch(dir.path(), "src/a.test.ts");
        touch(dir.path(), "src/legacy/old.ts");
        touch(dir.path(), "src/b.js");

        let options = AnalysisOptions::default()
            .with_extensions(["ts"])
            .with_ignore_patterns(["*.test.ts", "src/legacy"]);
        let files = FsDiscovery::new().discover(dir.path(), &options).unwrap();
        let ids: Vec<&str> = files.iter().map(|f| f.as_str()).collect();
        assert_eq!(ids, vec!["src/a.ts"]);
    }

    #[test]
    fn test_missing_root_is_discovery_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = FsDiscovery::new()
            .discover(&dir.path().join("nope"), &AnalysisOptions::default())
            .unwrap_err();
        assert!(matches!(err, AnalysisError::Discovery { .. }));
    }

    #[test]
    fn test_file_root_is_discovery_error() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "a.ts");
        let err = FsDiscovery::new()
            .discover(&dir.path().join("a.ts"), &AnalysisOptions::default())
            .unwrap_err();
        assert!(matches!(err, AnalysisError::Discovery { .. }));
    }

    #[test]
    fn test_invalid_glob_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let options = AnalysisOptions::default().with_ignore_patterns(["[unclosed"]);
        let err = FsDiscovery::new().discover(dir.path(), &options).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidPattern { .. }));
    }
}
