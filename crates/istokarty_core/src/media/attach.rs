//! Pure image attachment over an event table.

use crate::catalog::EventTable;
use crate::media::{encode_image, AttachError};
use log::{info, warn};

/// Returns a copy of `events` with the target event's `map_image` set to the
/// encoded upload.
///
/// # Contract
/// - Length, order and every other field of every event are preserved.
/// - On error the caller's table is untouched and no copy is produced.
///
/// # Errors
/// - `UnsupportedFileType` when `mime_type` does not start with `image/`.
/// - `Read` when `bytes` cannot be used as an image.
/// - `EventNotFound` when `event_id` is unknown.
pub fn attach_image(
    events: &EventTable,
    event_id: &str,
    bytes: &[u8],
    mime_type: &str,
) -> Result<EventTable, AttachError> {
    if !events.contains(event_id) {
        warn!(
            "event=image_attach module=media status=error code=event_not_found event_id={}",
            event_id
        );
        return Err(AttachError::EventNotFound(event_id.to_string()));
    }

    let image = encode_image(bytes, mime_type).map_err(|err| {
        warn!(
            "event=image_attach module=media status=error code={} event_id={} mime_type={}",
            err.code(),
            event_id,
            mime_type
        );
        err
    })?;

    let mut updated = events.clone();
    updated.replace_map_image(event_id, image.into_string());
    info!(
        "event=image_attach module=media status=ok event_id={} mime_type={} size_bytes={}",
        event_id,
        mime_type,
        bytes.len()
    );
    Ok(updated)
}
