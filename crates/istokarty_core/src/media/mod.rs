//! Local image uploads attached to map events.
//!
//! # Responsibility
//! - Validate the declared MIME type of a user-selected file.
//! - Turn raw file bytes into a displayable `data:` URI.
//! - Produce an updated event table with one image replaced.
//!
//! # Invariants
//! - Rejected uploads never modify event data.
//! - Payload bytes are never written to logs.

mod attach;
mod read;

pub use attach::attach_image;
pub use read::load_image;

use crate::model::event::EventId;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Required MIME type prefix for uploads.
pub const IMAGE_MIME_PREFIX: &str = "image/";

/// Known leading byte signatures per MIME type.
const IMAGE_SIGNATURES: &[(&str, &[&[u8]])] = &[
    ("image/png", &[b"\x89PNG\r\n\x1a\n"]),
    ("image/jpeg", &[b"\xff\xd8\xff"]),
    ("image/jpg", &[b"\xff\xd8\xff"]),
    ("image/gif", &[b"GIF87a", b"GIF89a"]),
    ("image/bmp", &[b"BM"]),
];

/// Upload failures surfaced to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttachError {
    /// Declared type does not start with `image/`. User picks another file.
    UnsupportedFileType { mime_type: String },
    /// File could not be read or its content is not a usable image.
    Read { reason: String },
    /// Target event does not exist.
    EventNotFound(EventId),
}

impl AttachError {
    fn read(reason: impl Into<String>) -> Self {
        Self::Read {
            reason: reason.into(),
        }
    }

    /// Stable short code for logs and UI envelopes.
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnsupportedFileType { .. } => "unsupported_file_type",
            Self::Read { .. } => "read_failed",
            Self::EventNotFound(_) => "event_not_found",
        }
    }
}

impl Display for AttachError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedFileType { mime_type } => {
                write!(f, "unsupported file type `{mime_type}`; please choose an image")
            }
            Self::Read { reason } => write!(f, "could not read image file: {reason}"),
            Self::EventNotFound(id) => write!(f, "event not found: {id}"),
        }
    }
}

impl Error for AttachError {}

/// Displayable in-memory image reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    mime_type: String,
    data_uri: String,
}

impl ImageRef {
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// `data:<mime>;base64,<payload>` form.
    pub fn as_str(&self) -> &str {
        &self.data_uri
    }

    pub fn into_string(self) -> String {
        self.data_uri
    }
}

/// Checks the declared MIME type against the `image/` prefix.
///
/// The comparison is literal and case-sensitive.
pub fn validate_mime_type(mime_type: &str) -> Result<(), AttachError> {
    if mime_type.starts_with(IMAGE_MIME_PREFIX) {
        Ok(())
    } else {
        Err(AttachError::UnsupportedFileType {
            mime_type: mime_type.to_string(),
        })
    }
}

/// Encodes validated image bytes into a `data:` URI.
///
/// # Errors
/// - `UnsupportedFileType` when `mime_type` is not an image type.
/// - `Read` when `bytes` is empty or does not match the signature of a
///   well-known format declared by `mime_type`.
pub fn encode_image(bytes: &[u8], mime_type: &str) -> Result<ImageRef, AttachError> {
    validate_mime_type(mime_type)?;
    if bytes.is_empty() {
        return Err(AttachError::read("file is empty"));
    }
    if !matches_signature(bytes, mime_type) {
        return Err(AttachError::read(format!(
            "content does not look like {mime_type}"
        )));
    }

    Ok(ImageRef {
        mime_type: mime_type.to_string(),
        data_uri: format!("data:{mime_type};base64,{}", STANDARD.encode(bytes)),
    })
}

fn matches_signature(bytes: &[u8], mime_type: &str) -> bool {
    if mime_type == "image/webp" {
        return bytes.len() >= 12 && &bytes[..4] == b"RIFF" && &bytes[8..12] == b"WEBP";
    }
    match IMAGE_SIGNATURES
        .iter()
        .find(|(known, _)| *known == mime_type)
    {
        Some((_, signatures)) => signatures
            .iter()
            .any(|signature| bytes.starts_with(signature)),
        None => true,
    }
}
