use crate::app::dto::{AnalysisResult, CyclesResponse, FileDependencies, OrphansResponse};
use crate::domain::options::AnalysisOptions;
use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::fmt::Write as _;
use std::net::SocketAddr;
use std::path::PathBuf;

/// depscan - import dependency analysis for JavaScript/TypeScript projects
#[derive(Parser, Debug)]
#[command(name = "depscan", version, about)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Full report: graph summary, external packages, cycles, orphans, diagnostics
    Analyze(ReportArgs),
    /// List circular import chains
    Cycles(ReportArgs),
    /// List files nothing imports (entry points excluded)
    Orphans(ReportArgs),
    /// Imports and importers of a single file
    File {
        #[command(flatten)]
        target: TargetArgs,
        /// Root-relative path of the file
        file: String,
    },
    /// Serve the analysis over HTTP
    Serve {
        #[command(flatten)]
        target: TargetArgs,
        #[arg(long, default_value = "127.0.0.1:8118")]
        addr: SocketAddr,
    },
    /// Serve the analysis as an MCP server over stdio
    Mcp {
        #[command(flatten)]
        target: TargetArgs,
    },
}

#[derive(Args, Debug)]
pub struct ReportArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Exit with status 1 when at least one cycle is found
    #[arg(long)]
    pub fail_on_cycles: bool,
}

/// Project root plus option overrides shared by every subcommand.
#[derive(Args, Debug)]
pub struct TargetArgs {
    /// Project root directory
    pub root: PathBuf,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// JSON options file; flags below override its fields
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Source extension (repeatable), e.g. --ext ts --ext vue
    #[arg(long = "ext", value_name = "EXT")]
    pub extensions: Vec<String>,

    /// Ignore glob (repeatable), replaces the default list
    #[arg(long = "ignore", value_name = "GLOB")]
    pub ignore_patterns: Vec<String>,

    /// Entry-point stem (repeatable), replaces the default list
    #[arg(long = "entry", value_name = "STEM")]
    pub entry_points: Vec<String>,

    /// Entry-point regex matched against the root-relative path (repeatable)
    #[arg(long = "entry-pattern", value_name = "REGEX")]
    pub entry_patterns: Vec<String>,

    #[arg(long)]
    pub max_files: Option<usize>,

    #[arg(long)]
    pub max_file_bytes: Option<u64>,

    /// Read deadline in milliseconds
    #[arg(long)]
    pub deadline_ms: Option<u64>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl TargetArgs {
    /// Defaults, then the `--config` file, then explicit flags.
    pub fn options(&self) -> Result<AnalysisOptions> {
        let mut options = match &self.config {
            Some(path) => AnalysisOptions::from_json_file(path)?,
            None => AnalysisOptions::default(),
        };
        if !self.extensions.is_empty() {
            options.extensions = self.extensions.clone();
        }
        if !self.ignore_patterns.is_empty() {
            options.ignore_patterns = self.ignore_patterns.clone();
        }
        if !self.entry_points.is_empty() {
            options.entry_points = self.entry_points.clone();
        }
        if !self.entry_patterns.is_empty() {
            options.entry_patterns = self.entry_patterns.clone();
        }
        if let Some(max_files) = self.max_files {
            options.max_files = max_files;
        }
        if let Some(max_file_bytes) = self.max_file_bytes {
            options.max_file_bytes = max_file_bytes;
        }
        if self.deadline_ms.is_some() {
            options.deadline_ms = self.deadline_ms;
        }
        Ok(options)
    }
}

pub fn to_json<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

pub fn render_report(result: &AnalysisResult) -> String {
    let summary = result.summary();
    let mut out = String::new();
    let _ = writeln!(out, "Dependency report for {}", result.root);
    let _ = writeln!(out, "{}", "=".repeat(60));
    let _ = writeln!(out, "  Files:             {}", summary.files);
    let _ = writeln!(out, "  Internal imports:  {}", summary.internal_edges);
    let _ = writeln!(out, "  External packages: {}", summary.external_packages);
    let _ = writeln!(out, "  Cycles:            {}", summary.cycles);
    let _ = writeln!(out, "  Orphans:           {}", summary.orphans);
    let _ = writeln!(out, "  Diagnostics:       {}", summary.diagnostics);
    if result.truncated {
        let _ = writeln!(out, "  (file limit reached, results are partial)");
    }

    if !result.external_packages.is_empty() {
        let _ = writeln!(out, "\nExternal packages:");
        for package in &result.external_packages {
            let _ = writeln!(out, "  {}", package);
        }
    }
    if !result.cycles.is_empty() {
        let _ = writeln!(out, "\nCycles:");
        write_cycles(&mut out, &result.cycles);
    }
    if !result.orphans.is_empty() {
        let _ = writeln!(out, "\nOrphans:");
        for orphan in &result.orphans {
            let _ = writeln!(out, "  {}", orphan);
        }
    }
    if !result.diagnostics.is_empty() {
        let _ = writeln!(out, "\nDiagnostics:");
        for diagnostic in &result.diagnostics {
            let _ = writeln!(out, "  [{}] {}", diagnostic.kind, diagnostic.message);
        }
    }
    out
}

pub fn render_cycles(response: &CyclesResponse) -> String {
    let mut out = String::new();
    if response.cycles.is_empty() {
        let _ = writeln!(out, "No circular imports found.");
        return out;
    }
    let _ = writeln!(out, "Found {} cycle(s):", response.cycle_count);
    write_cycles(&mut out, &response.cycles);
    out
}

pub fn render_orphans(response: &OrphansResponse) -> String {
    let mut out = String::new();
    if response.orphans.is_empty() {
        let _ = writeln!(out, "No orphan files found.");
        return out;
    }
    let _ = writeln!(out, "Found {} orphan file(s):", response.orphan_count);
    for orphan in &response.orphans {
        let _ = writeln!(out, "  {}", orphan);
    }
    out
}

pub fn render_file(deps: &FileDependencies) -> String {
    let mut out = String::new();
    let mut flags = Vec::new();
    if deps.is_entry_point {
        flags.push("entry point");
    }
    if deps.is_orphan {
        flags.push("orphan");
    }
    if !deps.cycles.is_empty() {
        flags.push("in cycle");
    }
    if flags.is_empty() {
        let _ = writeln!(out, "{}", deps.file);
    } else {
        let _ = writeln!(out, "{} ({})", deps.file, flags.join(", "));
    }

    let _ = writeln!(out, "\nImports ({}):", deps.imports.len());
    for edge in &deps.imports {
        let _ = writeln!(out, "  {} [{}]", edge.target, edge.syntax.as_str());
    }
    let _ = writeln!(out, "\nImported by ({}):", deps.imported_by.len());
    for importer in &deps.imported_by {
        let _ = writeln!(out, "  {}", importer);
    }
    if !deps.cycles.is_empty() {
        let _ = writeln!(out, "\nCycles:");
        write_cycles(&mut out, &deps.cycles);
    }
    if !deps.diagnostics.is_empty() {
        let _ = writeln!(out, "\nDiagnostics:");
        for diagnostic in &deps.diagnostics {
            let _ = writeln!(out, "  [{}] {}", diagnostic.kind, diagnostic.message);
        }
    }
    out
}

fn write_cycles(out: &mut String, cycles: &[Vec<String>]) {
    for (i, cycle) in cycles.iter().enumerate() {
        let _ = writeln!(out, "  {}. {}", i + 1, cycle.join(" -> "));
    }
}
