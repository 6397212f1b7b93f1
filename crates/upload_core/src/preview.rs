//! Best-effort image previews for accepted candidates.

use crate::candidate::UploadCandidate;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// A displayable rendition of a candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preview {
    pub media_type: String,
    pub data_url: String,
}

impl Preview {
    pub fn from_bytes(media_type: &str, bytes: &[u8]) -> Self {
        Self {
            media_type: media_type.to_string(),
            data_url: format!("data:{};base64,{}", media_type, BASE64.encode(bytes)),
        }
    }
}

/// A running preview read. Completion is signalled separately from the
/// validation verdict so a failed read cannot look like a rejection.
#[derive(Debug)]
pub struct PreviewTask {
    handle: JoinHandle<Option<Preview>>,
}

impl PreviewTask {
    /// Wait for the read to finish. `None` means the preview is unavailable.
    pub async fn wait(self) -> Option<Preview> {
        match self.handle.await {
            Ok(preview) => preview,
            Err(e) if e.is_cancelled() => None,
            Err(e) => {
                tracing::warn!("preview task failed: {e}");
                None
            }
        }
    }

    /// Drop a preview that is no longer wanted.
    pub fn abort(&self) {
        self.handle.abort();
    }
}

/// Start reading `candidate` into a preview on the current runtime.
/// Returns `None` when no runtime is available.
pub fn spawn(candidate: UploadCandidate) -> Option<PreviewTask> {
    let handle = match Handle::try_current() {
        Ok(handle) => handle,
        Err(_) => {
            tracing::debug!("no async runtime; skipping preview");
            return None;
        }
    };
    let handle = handle.spawn(async move {
        match candidate.read_bytes().await {
            Ok(bytes) => Some(Preview::from_bytes(candidate.media_type(), &bytes)),
            Err(e) => {
                tracing::warn!(
                    "could not read {} for preview: {e}",
                    candidate.file_name()
                );
                None
            }
        }
    });
    Some(PreviewTask { handle })
}

/// The page's image slot and the container toggled to show it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreviewSlot {
    source: Option<String>,
    visible: bool,
}

impl PreviewSlot {
    pub fn show(&mut self, preview: &Preview) {
        self.source = Some(preview.data_url.clone());
        self.visible = true;
    }

    pub fn clear(&mut self) {
        self.source = None;
        self.visible = false;
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }
}
