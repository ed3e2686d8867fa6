//! Asynchronous file read for uploads.

use crate::media::{encode_image, validate_mime_type, AttachError, ImageRef};
use log::{debug, warn};
use std::path::Path;

/// Reads a local file and encodes it as an image reference.
///
/// The MIME type is checked before any IO, so rejected files are never
/// read. Each call owns its own file handle; concurrent calls for
/// different events do not interact.
pub async fn load_image(path: impl AsRef<Path>, mime_type: &str) -> Result<ImageRef, AttachError> {
    let path = path.as_ref();
    validate_mime_type(mime_type)?;

    let bytes = tokio::fs::read(path).await.map_err(|err| {
        warn!(
            "event=image_read module=media status=error kind={:?}",
            err.kind()
        );
        AttachError::Read {
            reason: format!("{}: {err}", path.display()),
        }
    })?;
    debug!(
        "event=image_read module=media status=ok size_bytes={}",
        bytes.len()
    );

    encode_image(&bytes, mime_type)
}
