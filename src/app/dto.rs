use crate::domain::edge::ImportSyntax;
use crate::domain::options::AnalysisOptions;
use rmcp::schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct HealthResponse {
    pub root: String,
    pub status: String,
}

/// Options override for one request; `None` uses the engine defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub options: Option<AnalysisOptions>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FileRequest {
    /// Root-relative path of the file, e.g. `src/index.ts`.
    pub file: String,
    #[serde(default)]
    pub options: Option<AnalysisOptions>,
}

/// Full result of one analysis run. Every collection is sorted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AnalysisResult {
    pub root: String,
    pub node_count: usize,
    /// Internal (file-to-file) edges.
    pub edge_count: usize,
    pub external_packages: Vec<String>,
    /// Closed paths; the first id repeats as the last.
    pub cycles: Vec<Vec<String>>,
    pub orphans: Vec<String>,
    pub nodes: Vec<NodeDto>,
    pub diagnostics: Vec<DiagnosticDto>,
    /// True when discovery found more files than `max_files`.
    pub truncated: bool,
}

impl AnalysisResult {
    pub fn summary(&self) -> SummaryCounts {
        SummaryCounts {
            files: self.node_count,
            internal_edges: self.edge_count,
            external_packages: self.external_packages.len(),
            cycles: self.cycles.len(),
            orphans: self.orphans.len(),
            diagnostics: self.diagnostics.len(),
        }
    }

    pub fn node(&self, id: &str) -> Option<&NodeDto> {
        self.nodes
            .binary_search_by(|n| n.id.as_str().cmp(id))
            .ok()
            .map(|pos| &self.nodes[pos])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SummaryCounts {
    pub files: usize,
    pub internal_edges: usize,
    pub external_packages: usize,
    pub cycles: usize,
    pub orphans: usize,
    pub diagnostics: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct NodeDto {
    pub id: String,
    pub imports: Vec<String>,
    pub imported_by: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DiagnosticDto {
    pub file: String,
    /// `unreadable_file`, `unresolved_import` or `read_deadline_exceeded`
    pub kind: String,
    pub specifier: Option<String>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CyclesResponse {
    pub cycle_count: usize,
    pub cycles: Vec<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct OrphansResponse {
    pub orphan_count: usize,
    pub orphans: Vec<String>,
}

impl From<&AnalysisResult> for CyclesResponse {
    fn from(result: &AnalysisResult) -> Self {
        Self {
            cycle_count: result.cycles.len(),
            cycles: result.cycles.clone(),
        }
    }
}

impl From<&AnalysisResult> for OrphansResponse {
    fn from(result: &AnalysisResult) -> Self {
        Self {
            orphan_count: result.orphans.len(),
            orphans: result.orphans.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ImportEdgeDto {
    pub target: String,
    pub syntax: ImportSyntax,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FileDependencies {
    pub file: String,
    pub imports: Vec<ImportEdgeDto>,
    pub imported_by: Vec<String>,
    pub diagnostics: Vec<DiagnosticDto>,
    pub is_entry_point: bool,
    pub is_orphan: bool,
    /// Cycles passing through this file.
    pub cycles: Vec<Vec<String>>,
}
