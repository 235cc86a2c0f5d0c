//! Single-file record: name, source path and buffered content.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::spec::RecordError;
use crate::util::{absolutize_path, derive_base_name};

/// Bytes of one file captured at read time.
///
/// Clones share the content buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    name_base: String,
    path_abs: PathBuf,
    content: Arc<[u8]>,
}

impl FileRecord {
    /// Read the whole file at `path` into memory.
    ///
    /// `path` may be relative; the stored path is absolute and lexically
    /// normalized, without resolving symlinks.
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self, RecordError> {
        let path_file = path.as_ref();
        let path_abs = absolutize_path(path_file).map_err(|e| RecordError::read(path_file, e))?;
        let content = fs::read(&path_abs).map_err(|e| RecordError::read(&path_abs, e))?;
        debug!(path = %path_abs.display(), n_bytes = content.len(), "file read");

        Ok(Self {
            name_base: derive_base_name(&path_abs),
            path_abs,
            content: content.into(),
        })
    }

    /// Create or truncate `destination` and write the buffered bytes.
    ///
    /// The parent directory must already exist.
    pub fn copy_to<P: AsRef<Path>>(&self, destination: P) -> Result<(), RecordError> {
        let path_dst = destination.as_ref();
        fs::write(path_dst, &*self.content).map_err(|e| RecordError::write(path_dst, e))?;
        debug!(
            src = %self.path_abs.display(),
            dst = %path_dst.display(),
            n_bytes = self.content.len(),
            "file written"
        );
        Ok(())
    }

    pub fn base_name(&self) -> &str {
        &self.name_base
    }

    pub fn absolute_path(&self) -> &Path {
        &self.path_abs
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}
