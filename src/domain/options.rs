use anyhow::{Context as _, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Source extensions in resolver priority order.
pub const DEFAULT_EXTENSIONS: &[&str] = &["ts", "tsx", "js", "jsx", "mjs", "cjs"];

/// Version-control, build output and package-manager directories.
pub const DEFAULT_IGNORE_PATTERNS: &[&str] = &[
    ".git",
    ".hg",
    ".svn",
    "node_modules",
    "bower_components",
    "dist",
    "build",
    "out",
    "target",
    "coverage",
    ".next",
    ".turbo",
    ".cache",
];

/// File stems that are never reported as orphans.
pub const DEFAULT_ENTRY_POINTS: &[&str] = &["index", "main", "app"];

pub const DEFAULT_MAX_FILES: usize = 10_000;
pub const DEFAULT_MAX_FILE_BYTES: u64 = 1024 * 1024;

/// Options for one analysis request.
///
/// Every field has a default, so a partial JSON object (or `{}`) is a valid
/// configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AnalysisOptions {
    /// Recognized source extensions without the leading dot. Order is the
    /// resolver's lookup priority.
    pub extensions: Vec<String>,
    /// Directory or file names (glob syntax) pruned during discovery. Also
    /// matched against the whole root-relative path.
    pub ignore_patterns: Vec<String>,
    /// Upper bound on analyzed files; extra files are dropped in sorted order.
    pub max_files: usize,
    /// File stems exempt from orphan reporting.
    pub entry_points: Vec<String>,
    /// Extra regular expressions matched against the root-relative id to mark
    /// entry points.
    pub entry_patterns: Vec<String>,
    /// Files larger than this are reported as unreadable.
    pub max_file_bytes: u64,
    /// Deadline for the read phase in milliseconds, measured from request start.
    pub deadline_ms: Option<u64>,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            extensions: DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            ignore_patterns: DEFAULT_IGNORE_PATTERNS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            max_files: DEFAULT_MAX_FILES,
            entry_points: DEFAULT_ENTRY_POINTS.iter().map(|s| s.to_string()).collect(),
            entry_patterns: Vec::new(),
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
            deadline_ms: None,
        }
    }
}

impl AnalysisOptions {
    /// Load options from a JSON file. Missing fields keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_ignore_patterns<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignore_patterns = patterns.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_entry_points<I, S>(mut self, entry_points: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entry_points = entry_points.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_max_files(mut self, max_files: usize) -> Self {
        self.max_files = max_files;
        self
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline_ms = Some(deadline.as_millis() as u64);
        self
    }

    /// Extensions with any leading dot removed, lowercased, duplicates dropped
    /// (first occurrence keeps its priority).
    pub fn normalized_extensions(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::with_capacity(self.extensions.len());
        for ext in &self.extensions {
            let ext = ext.trim().trim_start_matches('.').to_ascii_lowercase();
            if !ext.is_empty() && !out.contains(&ext) {
                out.push(ext);
            }
        }
        out
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.deadline_ms.map(Duration::from_millis)
    }
}
