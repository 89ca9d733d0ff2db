use std::time::Duration;

use axum::Router;
use axum::response::IntoResponse;
use axum::routing::post;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use skopun::application::ports::{BlobStore, BlobStoreError};
use skopun::infrastructure::drive::GoogleDriveStore;

async fn start_mock_drive_server(
    response_status: u16,
    response_body: &'static str,
) -> (String, oneshot::Sender<()>) {
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let app = Router::new().route(
        "/upload/drive/v3/files",
        post(move || async move {
            let status = axum::http::StatusCode::from_u16(response_status).unwrap();
            (status, response_body).into_response()
        }),
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let upload_url = format!("http://{}/upload/drive/v3/files", addr);

    tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            })
            .await
            .ok();
    });

    (upload_url, shutdown_tx)
}

fn store(upload_url: &str) -> GoogleDriveStore {
    GoogleDriveStore::new("test-token".to_string(), Duration::from_secs(5))
        .with_upload_url(upload_url)
}

#[tokio::test]
async fn given_successful_upload_when_storing_then_returns_file_id_and_link() {
    let response_body =
        r#"{"id": "file-123", "webViewLink": "https://drive.google.com/file/d/file-123"}"#;
    let (upload_url, shutdown_tx) = start_mock_drive_server(200, response_body).await;

    let result = store(&upload_url)
        .upload(b"transcript text", "lecture.txt", Some("folder-1"))
        .await
        .unwrap();

    assert_eq!(result.id, "file-123");
    assert_eq!(
        result.web_link.as_deref(),
        Some("https://drive.google.com/file/d/file-123")
    );
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_response_without_link_when_storing_then_link_is_absent() {
    let (upload_url, shutdown_tx) = start_mock_drive_server(200, r#"{"id": "file-456"}"#).await;

    let result = store(&upload_url)
        .upload(b"transcript text", "lecture.txt", None)
        .await
        .unwrap();

    assert_eq!(result.id, "file-456");
    assert!(result.web_link.is_none());
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_expired_token_when_storing_then_returns_unauthorized() {
    let (upload_url, shutdown_tx) =
        start_mock_drive_server(401, r#"{"error": {"message": "Invalid Credentials"}}"#).await;

    let result = store(&upload_url)
        .upload(b"transcript text", "lecture.txt", None)
        .await;

    assert!(matches!(result, Err(BlobStoreError::Unauthorized(_))));
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_server_error_when_storing_then_returns_upload_failed() {
    let (upload_url, shutdown_tx) = start_mock_drive_server(500, "internal error").await;

    let result = store(&upload_url)
        .upload(b"transcript text", "lecture.txt", None)
        .await;

    assert!(matches!(result, Err(BlobStoreError::UploadFailed(_))));
    shutdown_tx.send(()).ok();
}
