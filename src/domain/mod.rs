pub mod node;
pub mod edge;
pub mod graph;
pub mod builder;
pub mod imports;
pub mod resolver;
pub mod cycles;
pub mod orphans;
pub mod diagnostics;
pub mod error;
pub mod options;
pub mod ports;
