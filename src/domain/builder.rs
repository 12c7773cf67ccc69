use crate::domain::diagnostics::Diagnostic;
use crate::domain::edge::ImportSyntax;
use crate::domain::graph::DependencyGraph;
use crate::domain::imports::{ImportKind, extract_imports};
use crate::domain::node::{FileNode, SourceFileId};
use crate::domain::resolver::ModuleResolver;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Outcome of the read phase for one discovered file.
#[derive(Debug, Clone)]
pub struct LoadedFile {
    pub id: SourceFileId,
    /// File text, or the diagnostic explaining why there is none.
    pub source: Result<String, Diagnostic>,
}

impl LoadedFile {
    pub fn text(id: impl Into<SourceFileId>, source: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source: Ok(source.into()),
        }
    }

    pub fn unreadable(id: impl Into<SourceFileId>, reason: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            source: Err(Diagnostic::unreadable(id.clone(), reason)),
            id,
        }
    }

    /// The read deadline passed before this file was reached.
    pub fn deadline_exceeded(id: impl Into<SourceFileId>) -> Self {
        let id = id.into();
        Self {
            source: Err(Diagnostic::deadline_exceeded(id.clone())),
            id,
        }
    }
}

/// Edges, packages and diagnostics computed for one node in pass 2.
#[derive(Debug, Default)]
struct ResolvedImports {
    targets: BTreeMap<usize, ImportSyntax>,
    external_packages: BTreeSet<String>,
    diagnostics: Vec<Diagnostic>,
}

/// Graph builder - two-pass construction of a [`DependencyGraph`].
pub struct GraphBuilder {
    extensions: Vec<String>,
}

impl GraphBuilder {
    /// `extensions` is the resolver's lookup priority (no leading dots).
    pub fn new(extensions: Vec<String>) -> Self {
        Self { extensions }
    }

    /// Two-pass build strategy.
    ///
    /// Pass 1 fixes the node set and its index. Pass 2 resolves every file's
    /// imports against the complete index. The graph is assembled once at the
    /// end, so no partially built graph is ever observable.
    pub fn build(&self, mut files: Vec<LoadedFile>) -> DependencyGraph {
        // Pass 1: Node Index
        files.sort_by(|a, b| a.id.cmp(&b.id));
        files.dedup_by(|a, b| a.id == b.id);
        let index: HashMap<SourceFileId, usize> = files
            .iter()
            .enumerate()
            .map(|(pos, file)| (file.id.clone(), pos))
            .collect();

        // Pass 2: Import Resolution
        let resolver = ModuleResolver::new(&index, &self.extensions);
        let resolved: Vec<ResolvedImports> = files
            .iter()
            .map(|file| resolve_file(file, &resolver))
            .collect();

        let mut nodes = Vec::with_capacity(files.len());
        let mut edges = Vec::new();
        let mut external_packages = BTreeSet::new();
        for (pos, (file, imports)) in files.into_iter().zip(resolved).enumerate() {
            for (target, syntax) in imports.targets {
                edges.push((pos, target, syntax));
            }
            external_packages.extend(imports.external_packages);
            nodes.push(FileNode {
                id: file.id,
                diagnostics: imports.diagnostics,
            });
        }

        tracing::debug!(
            nodes = nodes.len(),
            edges = edges.len(),
            external_packages = external_packages.len(),
            "dependency graph assembled"
        );
        DependencyGraph::assemble(nodes, edges, external_packages)
    }
}

fn resolve_file(file: &LoadedFile, resolver: &ModuleResolver<'_>) -> ResolvedImports {
    let mut out = ResolvedImports::default();

    let source = match &file.source {
        Ok(text) => text,
        Err(diagnostic) => {
            out.diagnostics.push(diagnostic.clone());
            return out;
        }
    };

    let mut unresolved: BTreeSet<&str> = BTreeSet::new();
    let references = extract_imports(&file.id, source);
    for reference in &references {
        match reference.kind {
            ImportKind::External => {
                if let Some(package) = reference.package_name() {
                    out.external_packages.insert(package.to_string());
                }
            }
            ImportKind::Internal => match resolver.resolve(&file.id, &reference.specifier) {
                Some(target) => {
                    out.targets.entry(target).or_insert(reference.syntax);
                }
                None => {
                    unresolved.insert(reference.specifier.as_str());
                }
            },
        }
    }

    for specifier in unresolved {
        tracing::debug!(file = %file.id, specifier, "unresolved internal import");
        out.diagnostics
            .push(Diagnostic::unresolved(file.id.clone(), specifier));
    }
    out
}
