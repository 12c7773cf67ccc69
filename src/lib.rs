//! depscan library: import dependency graphs, cycles and orphans for
//! JavaScript/TypeScript projects.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod domain;
pub mod logger;
pub mod server;

pub use app::dto::AnalysisResult;
pub use app::engine::{AnalysisEngine, build_dependency_graph};
pub use domain::options::AnalysisOptions;
