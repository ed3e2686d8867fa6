use istokarty_core::{load_image, Action, AppState, AttachError};
use std::io::Write;
use tempfile::NamedTempFile;

const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";
const JPEG_BYTES: &[u8] = b"\xff\xd8\xff\xe0\0\x10JFIF\0";

fn write_temp(bytes: &[u8]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(bytes).unwrap();
    file.flush().unwrap();
    file
}

#[tokio::test]
async fn load_image_reads_file_into_data_uri() {
    let file = write_temp(PNG_BYTES);
    let image = load_image(file.path(), "image/png").await.unwrap();
    assert_eq!(image.mime_type(), "image/png");
    assert!(image.as_str().starts_with("data:image/png;base64,"));
}

#[tokio::test]
async fn load_image_rejects_non_image_type_before_reading() {
    let err = load_image("/definitely/missing/notes.txt", "text/plain")
        .await
        .unwrap_err();
    assert_eq!(
        err,
        AttachError::UnsupportedFileType {
            mime_type: "text/plain".to_string()
        }
    );
}

#[tokio::test]
async fn load_image_reports_missing_file_as_read_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_image(dir.path().join("missing.png"), "image/png")
        .await
        .unwrap_err();
    assert!(matches!(err, AttachError::Read { .. }));
}

#[tokio::test]
async fn concurrent_loads_complete_independently() {
    let png = write_temp(PNG_BYTES);
    let jpeg = write_temp(JPEG_BYTES);
    let mut state = AppState::with_builtin_catalog().unwrap();
    state.dispatch(Action::BeginUpload("2".to_string())).unwrap();

    let (first, second) = tokio::join!(
        load_image(png.path(), "image/png"),
        load_image(jpeg.path(), "image/jpeg")
    );

    // Completion order is independent of start order.
    let updated = state.finish_upload("30", second).unwrap();
    assert!(updated
        .map_image
        .as_deref()
        .unwrap()
        .starts_with("data:image/jpeg;base64,"));
    assert_eq!(state.selection().upload_target.as_deref(), Some("2"));

    state.finish_upload("2", first).unwrap();
    assert_eq!(state.selection().upload_target, None);
    assert!(state
        .events()
        .get("2")
        .unwrap()
        .map_image
        .as_deref()
        .unwrap()
        .starts_with("data:image/png;base64,"));
    assert_eq!(
        state
            .events()
            .iter()
            .filter(|event| event.map_image.is_some())
            .count(),
        2
    );
}

#[tokio::test]
async fn failed_read_leaves_event_untouched() {
    let corrupt = write_temp(b"plain text pretending to be png");
    let mut state = AppState::with_builtin_catalog().unwrap();
    state.dispatch(Action::BeginUpload("5".to_string())).unwrap();

    let outcome = load_image(corrupt.path(), "image/png").await;
    let err = state.finish_upload("5", outcome).unwrap_err();

    assert!(matches!(err, AttachError::Read { .. }));
    assert!(state.events().get("5").unwrap().map_image.is_none());
    assert_eq!(state.selection().upload_target.as_deref(), Some("5"));
}

#[test]
fn attach_upload_swaps_table_and_preserves_identity() {
    let mut state = AppState::with_builtin_catalog().unwrap();
    state.dispatch(Action::BeginUpload("1".to_string())).unwrap();
    let ids_before = state
        .events()
        .iter()
        .map(|event| event.id.clone())
        .collect::<Vec<_>>();

    let updated = state.attach_upload("1", PNG_BYTES, "image/png").unwrap();
    assert_eq!(updated.title, "Объединение Египта");
    assert!(updated.map_image.is_some());

    let ids_after = state
        .events()
        .iter()
        .map(|event| event.id.clone())
        .collect::<Vec<_>>();
    assert_eq!(ids_before, ids_after);
    assert_eq!(state.selection().upload_target, None);
}

#[test]
fn attach_upload_with_text_file_keeps_target_for_retry() {
    let mut state = AppState::with_builtin_catalog().unwrap();
    state.dispatch(Action::BeginUpload("1".to_string())).unwrap();

    let err = state.attach_upload("1", b"hello", "text/plain").unwrap_err();
    assert_eq!(err.code(), "unsupported_file_type");
    assert_eq!(state.selection().upload_target.as_deref(), Some("1"));
    assert!(state.events().iter().all(|event| event.map_image.is_none()));
}
