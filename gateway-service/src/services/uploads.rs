//! Request-scoped temp files for multipart uploads.
//!
//! Every uploaded payload is spooled to local disk for the duration of one
//! request and must be gone before the handler returns, on every exit path.

use crate::services::providers::InlinePart;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// A spooled upload that removes its backing file when the request is done.
///
/// Handlers call [`TempUpload::remove`] explicitly after the upstream call;
/// the `Drop` impl is the backstop for early returns and panics.
#[derive(Debug)]
pub struct TempUpload {
    path: PathBuf,
    mime_type: String,
    removed: bool,
}

impl TempUpload {
    /// Write `data` to a fresh uuid-named file under `upload_dir`.
    pub async fn spool(
        upload_dir: &str,
        data: &[u8],
        mime_type: impl Into<String>,
    ) -> std::io::Result<Self> {
        tokio::fs::create_dir_all(upload_dir).await?;

        let path = Path::new(upload_dir).join(Uuid::new_v4().to_string());
        tokio::fs::write(&path, data).await?;

        Ok(Self {
            path,
            mime_type: mime_type.into(),
            removed: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Declared MIME type of the upload.
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Read the spooled file back and base64-encode it as an inline part.
    pub async fn to_inline_part(&self) -> std::io::Result<InlinePart> {
        let bytes = tokio::fs::read(&self.path).await?;
        Ok(InlinePart {
            data: BASE64.encode(bytes),
            mime_type: self.mime_type.clone(),
        })
    }

    /// Delete the backing file. Failure to delete is logged, never
    /// propagated: cleanup must not change the response outcome.
    pub async fn remove(mut self) {
        self.removed = true;
        if let Err(e) = tokio::fs::remove_file(&self.path).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(path = %self.path.display(), error = %e, "Failed to remove temp upload");
            }
        }
    }
}

impl Drop for TempUpload {
    fn drop(&mut self) {
        if !self.removed {
            let _ = std::fs::remove_file(&self.path);
        }
    }
}
