use crate::domain::error::{AnalysisError, ReadError};
use crate::domain::node::SourceFileId;
use crate::domain::options::AnalysisOptions;
use std::path::Path;

/// File discovery port (implemented by Infrastructure)
///
/// Returns a sorted, deduplicated, finite list of root-relative ids. A missing
/// or unreadable root is an [`AnalysisError::Discovery`].
pub trait FileDiscovery: Send + Sync {
    fn discover(
        &self,
        root: &Path,
        options: &AnalysisOptions,
    ) -> Result<Vec<SourceFileId>, AnalysisError>;
}

/// Source code reader port
pub trait SourceReader: Send + Sync {
    /// Read `file` (relative to `root`) as UTF-8 text, refusing files over `max_bytes`.
    fn read(&self, root: &Path, file: &SourceFileId, max_bytes: u64) -> Result<String, ReadError>;
}
