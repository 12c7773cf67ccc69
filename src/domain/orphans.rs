use crate::domain::error::AnalysisError;
use crate::domain::graph::DependencyGraph;
use crate::domain::node::SourceFileId;
use crate::domain::options::{AnalysisOptions, DEFAULT_ENTRY_POINTS};
use regex::Regex;
use std::collections::BTreeSet;

/// Entry-point allow-list.
///
/// A file is an entry point when its stem (file name without the last
/// extension) is one of `stems` at any depth, or when its id matches one of the
/// regular expressions.
#[derive(Debug, Clone)]
pub struct EntryPointPolicy {
    stems: Vec<String>,
    patterns: Vec<Regex>,
}

impl Default for EntryPointPolicy {
    fn default() -> Self {
        Self {
            stems: DEFAULT_ENTRY_POINTS.iter().map(|s| s.to_string()).collect(),
            patterns: Vec::new(),
        }
    }
}

impl EntryPointPolicy {
    pub fn new(stems: &[String], patterns: &[String]) -> Result<Self, AnalysisError> {
        let patterns = patterns
            .iter()
            .map(|p| {
                Regex::new(p).map_err(|e| AnalysisError::InvalidPattern {
                    pattern: p.clone(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            stems: stems.to_vec(),
            patterns,
        })
    }

    pub fn from_options(options: &AnalysisOptions) -> Result<Self, AnalysisError> {
        Self::new(&options.entry_points, &options.entry_patterns)
    }

    pub fn is_entry_point(&self, id: &SourceFileId) -> bool {
        let stem = id.stem();
        self.stems.iter().any(|s| s == stem)
            || self.patterns.iter().any(|re| re.is_match(id.as_str()))
    }
}

/// Orphan detector - files nothing imports, minus entry points.
pub struct OrphanDetector<'a> {
    policy: &'a EntryPointPolicy,
}

impl<'a> OrphanDetector<'a> {
    pub fn new(policy: &'a EntryPointPolicy) -> Self {
        Self { policy }
    }

    pub fn detect(&self, graph: &DependencyGraph) -> BTreeSet<SourceFileId> {
        graph
            .node_indices()
            .filter(|&idx| graph.imported_by(idx).is_empty())
            .map(|idx| &graph.node(idx).id)
            .filter(|id| !self.policy.is_entry_point(id))
            .cloned()
            .collect()
    }
}
