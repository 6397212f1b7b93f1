use anyhow::{Context, Result};
use bytes::Bytes;
use std::fmt;
use std::path::{Path, PathBuf};

/// Where the bytes of a candidate live.
#[derive(Clone, PartialEq, Eq)]
pub enum Content {
    /// Bytes already held in memory (e.g. a dropped file). Clones share
    /// the buffer.
    Memory(Bytes),
    /// A file on disk, read lazily when previewed or uploaded.
    File(PathBuf),
}

impl fmt::Debug for Content {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Content::Memory(bytes) => write!(f, "Memory({} bytes)", bytes.len()),
            Content::File(path) => write!(f, "File({})", path.display()),
        }
    }
}

/// The file currently selected or dropped by the user, before submission.
///
/// The media type is the declared one, never sniffed from the bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadCandidate {
    file_name: String,
    media_type: String,
    byte_len: u64,
    content: Content,
}

impl UploadCandidate {
    pub fn from_bytes(
        file_name: impl Into<String>,
        media_type: impl Into<String>,
        bytes: impl Into<Bytes>,
    ) -> Self {
        let bytes: Bytes = bytes.into();
        Self {
            file_name: file_name.into(),
            media_type: media_type.into(),
            byte_len: bytes.len() as u64,
            content: Content::Memory(bytes),
        }
    }

    /// Build a candidate for a file on disk. The media type is declared from
    /// the extension, the way a browser file picker would.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let meta = std::fs::metadata(path)
            .with_context(|| format!("cannot read file metadata: {}", path.display()))?;
        if !meta.is_file() {
            anyhow::bail!("Path is not a file: {}", path.display());
        }
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self {
            file_name,
            media_type: declared_media_type(path).to_string(),
            byte_len: meta.len(),
            content: Content::File(path.to_path_buf()),
        })
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn byte_len(&self) -> u64 {
        self.byte_len
    }

    pub fn content(&self) -> &Content {
        &self.content
    }

    /// Read the full content. In-memory content is shared, not copied.
    /// Disk-backed candidates may fail here if the file moved or became
    /// unreadable after selection.
    pub async fn read_bytes(&self) -> std::io::Result<Bytes> {
        match &self.content {
            Content::Memory(bytes) => Ok(bytes.clone()),
            Content::File(path) => tokio::fs::read(path).await.map(Bytes::from),
        }
    }
}

/// Media type a browser would declare for a file with this extension.
pub fn declared_media_type(path: &Path) -> &'static str {
    match path.extension().and_then(|s| s.to_str()) {
        Some(ext) => match ext.to_ascii_lowercase().as_str() {
            "png" => "image/png",
            "jpg" | "jpeg" => "image/jpeg",
            "gif" => "image/gif",
            "webp" => "image/webp",
            "bmp" => "image/bmp",
            _ => "application/octet-stream",
        },
        None => "application/octet-stream",
    }
}
