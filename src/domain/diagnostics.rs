use crate::domain::node::SourceFileId;

/// What went wrong for one file or one import attempt.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiagnosticKind {
    /// The file could not be loaded as text; its node has no outgoing edges.
    UnreadableFile { reason: String },
    /// An internal-looking specifier matched no discovered file.
    UnresolvedImport { specifier: String },
    /// The request deadline passed before the file was read.
    ReadDeadlineExceeded,
}

/// A recoverable problem attached to a node. Never aborts a run.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Diagnostic {
    pub file: SourceFileId,
    pub kind: DiagnosticKind,
}

impl Diagnostic {
    pub fn unreadable(file: SourceFileId, reason: impl Into<String>) -> Self {
        Self {
            file,
            kind: DiagnosticKind::UnreadableFile {
                reason: reason.into(),
            },
        }
    }

    pub fn unresolved(file: SourceFileId, specifier: impl Into<String>) -> Self {
        Self {
            file,
            kind: DiagnosticKind::UnresolvedImport {
                specifier: specifier.into(),
            },
        }
    }

    pub fn deadline_exceeded(file: SourceFileId) -> Self {
        Self {
            file,
            kind: DiagnosticKind::ReadDeadlineExceeded,
        }
    }

    /// Stable snake_case label used by reports.
    pub fn kind_label(&self) -> &'static str {
        match self.kind {
            DiagnosticKind::UnreadableFile { .. } => "unreadable_file",
            DiagnosticKind::UnresolvedImport { .. } => "unresolved_import",
            DiagnosticKind::ReadDeadlineExceeded => "read_deadline_exceeded",
        }
    }

    pub fn message(&self) -> String {
        match &self.kind {
            DiagnosticKind::UnreadableFile { reason } => {
                format!("{}: unreadable file ({})", self.file, reason)
            }
            DiagnosticKind::UnresolvedImport { specifier } => {
                format!("{}: cannot resolve import \"{}\"", self.file, specifier)
            }
            DiagnosticKind::ReadDeadlineExceeded => {
                format!("{}: skipped, analysis deadline exceeded", self.file)
            }
        }
    }
}
