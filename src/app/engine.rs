use crate::adapters::fs::reader::FileSourceReader;
use crate::adapters::fs::walker::FsDiscovery;
use crate::app::dto::*;
use crate::domain::builder::{GraphBuilder, LoadedFile};
use crate::domain::cycles::{CycleDetector, CycleReport};
use crate::domain::diagnostics::{Diagnostic, DiagnosticKind};
use crate::domain::error::AnalysisError;
use crate::domain::graph::DependencyGraph;
use crate::domain::node::SourceFileId;
use crate::domain::options::AnalysisOptions;
use crate::domain::orphans::{EntryPointPolicy, OrphanDetector};
use crate::domain::ports::{FileDiscovery, SourceReader};
use anyhow::{Context as _, Result};
use rayon::prelude::*;
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

/// Runs the discovery, read, build and detection pipeline for one root.
///
/// The engine holds no per-request state; every call builds a fresh graph.
#[derive(Clone)]
pub struct AnalysisEngine {
    discovery: Arc<dyn FileDiscovery>,
    reader: Arc<dyn SourceReader>,
    defaults: AnalysisOptions,
}

/// Everything computed for one request, before conversion to DTOs.
struct Analysis {
    graph: DependencyGraph,
    cycles: Vec<CycleReport>,
    orphans: BTreeSet<SourceFileId>,
    policy: EntryPointPolicy,
    truncated: bool,
}

impl AnalysisEngine {
    pub fn new(discovery: Arc<dyn FileDiscovery>, reader: Arc<dyn SourceReader>) -> Self {
        Self {
            discovery,
            reader,
            defaults: AnalysisOptions::default(),
        }
    }

    /// Engine over the local file system.
    pub fn filesystem() -> Self {
        Self::new(Arc::new(FsDiscovery::new()), Arc::new(FileSourceReader::new()))
    }

    /// Options used when a request does not carry its own.
    pub fn with_defaults(mut self, defaults: AnalysisOptions) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn defaults(&self) -> &AnalysisOptions {
        &self.defaults
    }

    pub fn analyze(&self, root: &Path, options: Option<&AnalysisOptions>) -> Result<AnalysisResult> {
        let analysis = self.run(root, options)?;
        Ok(to_result(root, &analysis))
    }

    pub fn cycles(&self, root: &Path, options: Option<&AnalysisOptions>) -> Result<CyclesResponse> {
        let analysis = self.run(root, options)?;
        let cycles = cycle_paths(&analysis.cycles);
        Ok(CyclesResponse {
            cycle_count: cycles.len(),
            cycles,
        })
    }

    pub fn orphans(
        &self,
        root: &Path,
        options: Option<&AnalysisOptions>,
    ) -> Result<OrphansResponse> {
        let analysis = self.run(root, options)?;
        let orphans: Vec<String> = analysis.orphans.iter().map(|id| id.to_string()).collect();
        Ok(OrphansResponse {
            orphan_count: orphans.len(),
            orphans,
        })
    }

    /// Dependencies of a single file. Fails with [`AnalysisError::UnknownFile`]
    /// when `file` is not a node of the graph.
    pub fn file(
        &self,
        root: &Path,
        file: &str,
        options: Option<&AnalysisOptions>,
    ) -> Result<FileDependencies> {
        let analysis = self.run(root, options)?;
        let id = SourceFileId::new(file);
        let graph = &analysis.graph;
        let idx = graph
            .get_node_by_id(id.as_str())
            .ok_or_else(|| AnalysisError::UnknownFile(id.to_string()))?;

        let imports = graph
            .outgoing(idx)
            .into_iter()
            .map(|(target, syntax)| ImportEdgeDto {
                target: graph.node(target).id.to_string(),
                syntax,
            })
            .collect();
        let imported_by = graph
            .imported_by(idx)
            .into_iter()
            .map(|source| graph.node(source).id.to_string())
            .collect();
        let mut diagnostics: Vec<&Diagnostic> = graph.node(idx).diagnostics.iter().collect();
        diagnostics.sort();
        let cycles = analysis
            .cycles
            .iter()
            .filter(|c| c.contains(&id))
            .map(|c| c.path().iter().map(|p| p.to_string()).collect())
            .collect();

        Ok(FileDependencies {
            file: id.to_string(),
            imports,
            imported_by,
            diagnostics: diagnostics.into_iter().map(diagnostic_dto).collect(),
            is_entry_point: analysis.policy.is_entry_point(&id),
            is_orphan: analysis.orphans.contains(&id),
            cycles,
        })
    }

    fn run(&self, root: &Path, options: Option<&AnalysisOptions>) -> Result<Analysis> {
        let started = Instant::now();
        let options = options.unwrap_or(&self.defaults);
        let policy = EntryPointPolicy::from_options(options)?;

        let mut files = self
            .discovery
            .discover(root, options)
            .with_context(|| format!("Failed to discover source files in {}", root.display()))?;
        let truncated = files.len() > options.max_files;
        if truncated {
            tracing::warn!(
                discovered = files.len(),
                max_files = options.max_files,
                "file limit reached, analyzing the first files in sorted order"
            );
            files.truncate(options.max_files);
        }

        let loaded = self.read_all(root, files, options, started);
        let graph = GraphBuilder::new(options.normalized_extensions()).build(loaded);
        let cycles = CycleDetector::new().detect(&graph);
        let orphans = OrphanDetector::new(&policy).detect(&graph);

        tracing::info!(
            root = %root.display(),
            files = graph.node_count(),
            edges = graph.edge_count(),
            cycles = cycles.len(),
            orphans = orphans.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "analysis finished"
        );
        Ok(Analysis {
            graph,
            cycles,
            orphans,
            policy,
            truncated,
        })
    }

    /// Parallel read phase. One slot per file, in input order.
    fn read_all(
        &self,
        root: &Path,
        files: Vec<SourceFileId>,
        options: &AnalysisOptions,
        started: Instant,
    ) -> Vec<LoadedFile> {
        let deadline = options.deadline().map(|d| started + d);
        let max_bytes = options.max_file_bytes;
        let reader = self.reader.as_ref();

        files
            .into_par_iter()
            .map(|id| {
                if deadline.is_some_and(|at| Instant::now() >= at) {
                    return LoadedFile::deadline_exceeded(id);
                }
                match reader.read(root, &id, max_bytes) {
                    Ok(text) => LoadedFile::text(id, text),
                    Err(err) => {
                        tracing::debug!(file = %id, error = %err, "unreadable source file");
                        LoadedFile::unreadable(id, err.to_string())
                    }
                }
            })
            .collect()
    }
}

/// Analyze `root` on the local file system.
pub fn build_dependency_graph(root: &Path, options: &AnalysisOptions) -> Result<AnalysisResult> {
    AnalysisEngine::filesystem().analyze(root, Some(options))
}

fn to_result(root: &Path, analysis: &Analysis) -> AnalysisResult {
    let graph = &analysis.graph;
    let nodes = graph
        .node_indices()
        .map(|idx| {
            let node = graph.dependency_node(idx);
            NodeDto {
                id: node.id.to_string(),
                imports: node.imports.iter().map(|i| i.to_string()).collect(),
                imported_by: node.imported_by.iter().map(|i| i.to_string()).collect(),
            }
        })
        .collect();

    AnalysisResult {
        root: root.to_string_lossy().to_string(),
        node_count: graph.node_count(),
        edge_count: graph.edge_count(),
        external_packages: graph.external_packages().iter().cloned().collect(),
        cycles: cycle_paths(&analysis.cycles),
        orphans: analysis.orphans.iter().map(|id| id.to_string()).collect(),
        nodes,
        diagnostics: graph.diagnostics().into_iter().map(diagnostic_dto).collect(),
        truncated: analysis.truncated,
    }
}

fn cycle_paths(cycles: &[CycleReport]) -> Vec<Vec<String>> {
    cycles
        .iter()
        .map(|c| c.path().iter().map(|id| id.to_string()).collect())
        .collect()
}

fn diagnostic_dto(diagnostic: &Diagnostic) -> DiagnosticDto {
    let specifier = match &diagnostic.kind {
        DiagnosticKind::UnresolvedImport { specifier } => Some(specifier.clone()),
        _ => None,
    };
    DiagnosticDto {
        file: diagnostic.file.to_string(),
        kind: diagnostic.kind_label().to_string(),
        specifier,
        message: diagnostic.message(),
    }
}
