use crate::domain::error::ReadError;
use crate::domain::node::SourceFileId;
use crate::domain::ports::SourceReader;
use std::path::Path;

/// Bytes inspected for NUL when sniffing binary content.
const BINARY_SNIFF_LEN: usize = 8000;

/// File system source reader implementation
pub struct FileSourceReader;

impl Default for FileSourceReader {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSourceReader {
    pub fn new() -> Self {
        Self
    }
}

impl SourceReader for FileSourceReader {
    fn read(&self, root: &Path, file: &SourceFileId, max_bytes: u64) -> Result<String, ReadError> {
        let path = root.join(file.as_str());
        let size = std::fs::metadata(&path)?.len();
        if size > max_bytes {
            return Err(ReadError::TooLarge {
                size,
                limit: max_bytes,
            });
        }

        let bytes = std::fs::read(&path)?;
        if bytes.iter().take(BINARY_SNIFF_LEN).any(|&b| b == 0) {
            return Err(ReadError::Binary);
        }
        let text = String::from_utf8(bytes).map_err(|_| ReadError::NotUtf8)?;
        Ok(match text.strip_prefix('\u{feff}') {
            Some(stripped) => stripped.to_string(),
            None => text,
        })
    }
}
