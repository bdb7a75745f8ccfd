use super::*;

#[test]
fn picks_kind_from_mime() {
    assert_eq!(validate_attachment("a.png", "image/png", 10).unwrap(), MessageKind::Image);
    assert_eq!(validate_attachment("a.gif", "image/gif", 10).unwrap(), MessageKind::Gif);
    assert_eq!(validate_attachment("a.mp4", "video/mp4", 10).unwrap(), MessageKind::Video);
    assert_eq!(validate_attachment("a.webm", "audio/webm", 10).unwrap(), MessageKind::Voice);
    assert_eq!(validate_attachment("a.pdf", "application/pdf", 10).unwrap(), MessageKind::File);
}

#[test]
fn rejects_empty_and_blocked_files() {
    assert!(matches!(validate_attachment("a.png", "image/png", 0), Err(TimelineError::Validation(_))));
    let err = validate_attachment("setup.EXE", "application/octet-stream", 100).unwrap_err();
    assert!(err.to_string().contains(".exe"));
}

#[test]
fn enforces_per_kind_limits() {
    assert!(validate_attachment("a.png", "image/png", MAX_IMAGE_BYTES).is_ok());
    assert!(validate_attachment("a.png", "image/png", MAX_IMAGE_BYTES + 1).is_err());
    assert!(validate_attachment("a.mp4", "video/mp4", MAX_IMAGE_BYTES + 1).is_ok());
    assert!(validate_attachment("a.zip", "application/zip", MAX_FILE_BYTES + 1).is_err());
}
