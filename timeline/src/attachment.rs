//! Pre-upload attachment checks.

#[cfg(test)]
#[path = "attachment_test.rs"]
mod attachment_test;

use crate::error::TimelineError;
use crate::message::MessageKind;

const MIB: u64 = 1024 * 1024;

pub const MAX_IMAGE_BYTES: u64 = 10 * MIB;
pub const MAX_VIDEO_BYTES: u64 = 50 * MIB;
pub const MAX_VOICE_BYTES: u64 = 10 * MIB;
pub const MAX_FILE_BYTES: u64 = 25 * MIB;

const BLOCKED_EXTENSIONS: [&str; 5] = ["exe", "bat", "cmd", "msi", "scr"];

/// Decide which message kind an upload becomes, or reject it.
///
/// # Errors
///
/// Returns [`TimelineError::Validation`] for empty files, blocked executable
/// extensions, and files over the limit for their kind.
pub fn validate_attachment(file_name: &str, mime: &str, size: u64) -> Result<MessageKind, TimelineError> {
    if size == 0 {
        return Err(TimelineError::Validation(format!("{file_name} is empty")));
    }

    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    if BLOCKED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(TimelineError::Validation(format!(
            "{file_name}: .{extension} files are not allowed"
        )));
    }

    let mime = mime.to_ascii_lowercase();
    let (kind, limit) = if mime == "image/gif" {
        (MessageKind::Gif, MAX_IMAGE_BYTES)
    } else if mime.starts_with("image/") {
        (MessageKind::Image, MAX_IMAGE_BYTES)
    } else if mime.starts_with("video/") {
        (MessageKind::Video, MAX_VIDEO_BYTES)
    } else if mime.starts_with("audio/") {
        (MessageKind::Voice, MAX_VOICE_BYTES)
    } else {
        (MessageKind::File, MAX_FILE_BYTES)
    };

    if size > limit {
        return Err(TimelineError::Validation(format!(
            "{file_name} is {size} bytes; {} uploads are limited to {} MiB",
            kind.as_str(),
            limit / MIB
        )));
    }
    Ok(kind)
}
