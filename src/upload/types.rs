use derivative::Derivative;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use uuid::Uuid;

/// Opaque identifier handed out when a file is queued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UploadId(Uuid);

impl UploadId {
    pub(crate) fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for UploadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum UploadStatus {
    Pending,
    Uploading,
    Complete,
    Error(String),
}

impl UploadStatus {
    /// Complete and Error records never change again.
    pub fn is_terminal(&self) -> bool {
        matches!(self, UploadStatus::Complete | UploadStatus::Error(_))
    }

    /// Pending and Uploading records still show a remove control.
    pub fn is_active(&self) -> bool {
        matches!(self, UploadStatus::Pending | UploadStatus::Uploading)
    }
}

#[derive(Derivative, Clone)]
#[derivative(Debug)]
pub enum FileSource {
    Path(PathBuf),
    Bytes(#[derivative(Debug = "ignore")] Arc<[u8]>),
}

/// Caller-owned handle to a file payload. The queue only reads `name` and `size`.
#[derive(Debug, Clone)]
pub struct FileRef {
    name: String,
    size: u64,
    source: FileSource,
}

impl FileRef {
    pub fn new(name: impl Into<String>, size: u64, source: FileSource) -> Self {
        Self {
            name: name.into(),
            size,
            source,
        }
    }

    pub fn from_bytes(name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        let bytes = bytes.into();
        Self::new(name, bytes.len() as u64, FileSource::Bytes(bytes))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn source(&self) -> &FileSource {
        &self.source
    }

    pub fn path(&self) -> Option<&Path> {
        match &self.source {
            FileSource::Path(path) => Some(path),
            FileSource::Bytes(_) => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct QueuedUpload {
    pub id: UploadId,
    pub file: FileRef,
    pub progress: f32,
    pub status: UploadStatus,
}

impl QueuedUpload {
    pub(crate) fn pending(file: FileRef) -> Self {
        Self {
            id: UploadId::new(),
            file,
            progress: 0.0,
            status: UploadStatus::Pending,
        }
    }

    pub fn name(&self) -> &str {
        self.file.name()
    }

    pub fn size(&self) -> u64 {
        self.file.size()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_omits_file_content() {
        let file = FileRef::from_bytes("secret.txt", b"hunter2".to_vec());
        let rendered = format!("{:?}", file);
        assert!(rendered.contains("secret.txt"));
        assert!(!rendered.contains("104"));
        assert_eq!(file.size(), 7);
        assert!(file.path().is_none());
    }

    #[test]
    fn ids_are_unique() {
        let a = QueuedUpload::pending(FileRef::from_bytes("a", Vec::new()));
        let b = QueuedUpload::pending(FileRef::from_bytes("a", Vec::new()));
        assert_ne!(a.id, b.id);
        assert_eq!(a.id.to_string().len(), 32);
    }

    #[test]
    fn status_classification() {
        assert!(UploadStatus::Pending.is_active());
        assert!(UploadStatus::Uploading.is_active());
        assert!(UploadStatus::Complete.is_terminal());
        assert!(UploadStatus::Error("boom".into()).is_terminal());
        assert!(!UploadStatus::Error("boom".into()).is_active());
    }
}
