use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use axum::response::IntoResponse;
use axum::routing::post;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use skopun::application::ports::{ProviderError, TranscriptionProvider};
use skopun::infrastructure::providers::OpenAiProvider;

async fn start_mock_whisper_server(
    response_status: u16,
    response_body: &'static str,
) -> (String, oneshot::Sender<()>) {
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let app = Router::new().route(
        "/audio/transcriptions",
        post(move || async move {
            let status = axum::http::StatusCode::from_u16(response_status).unwrap();
            (status, response_body).into_response()
        }),
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let base_url = format!("http://{}", addr);

    tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            })
            .await
            .ok();
    });

    (base_url, shutdown_tx)
}

async fn start_capturing_whisper_server()
-> (String, Arc<Mutex<String>>, oneshot::Sender<()>) {
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let captured = Arc::new(Mutex::new(String::new()));
    let captured_by_handler = Arc::clone(&captured);

    let app = Router::new().route(
        "/audio/transcriptions",
        post(move |body: axum::body::Bytes| {
            let captured = Arc::clone(&captured_by_handler);
            async move {
                *captured.lock().unwrap() = String::from_utf8_lossy(&body).to_string();
                "ok"
            }
        }),
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let base_url = format!("http://{}", addr);

    tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            })
            .await
            .ok();
    });

    (base_url, captured, shutdown_tx)
}

fn provider(base_url: &str) -> OpenAiProvider {
    OpenAiProvider::new(
        "test-key".to_string(),
        Some(base_url.to_string()),
        None,
        Duration::from_secs(5),
    )
}

fn write_audio_file(dir: &tempfile::TempDir) -> std::path::PathBuf {
    let path = dir.path().join("segment_000.mp3");
    std::fs::write(&path, b"fake mp3 bytes").unwrap();
    path
}

#[tokio::test]
async fn given_valid_audio_file_when_transcribing_then_returns_trimmed_text() {
    let (base_url, shutdown_tx) = start_mock_whisper_server(200, "Hello from Whisper\n").await;
    let dir = tempfile::tempdir().unwrap();
    let audio = write_audio_file(&dir);

    let result = provider(&base_url).transcribe(&audio, None).await;

    assert_eq!(result.unwrap(), "Hello from Whisper");
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_context_prompt_when_transcribing_then_request_still_succeeds() {
    let (base_url, shutdown_tx) = start_mock_whisper_server(200, "continued text").await;
    let dir = tempfile::tempdir().unwrap();
    let audio = write_audio_file(&dir);

    let result = provider(&base_url)
        .transcribe(&audio, Some("tail of the previous segment"))
        .await;

    assert_eq!(result.unwrap(), "continued text");
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_api_error_status_when_transcribing_then_returns_request_failed_with_status() {
    let response_body = r#"{"error": {"message": "Invalid file format"}}"#;
    let (base_url, shutdown_tx) = start_mock_whisper_server(400, response_body).await;
    let dir = tempfile::tempdir().unwrap();
    let audio = write_audio_file(&dir);

    let result = provider(&base_url).transcribe(&audio, None).await;

    match result {
        Err(ProviderError::RequestFailed { status, message }) => {
            assert_eq!(status, Some(400));
            assert!(message.contains("Invalid file format"));
        }
        other => panic!("expected RequestFailed, got {:?}", other),
    }
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_missing_audio_file_when_transcribing_then_returns_io_error() {
    let (base_url, shutdown_tx) = start_mock_whisper_server(200, "unused").await;

    let result = provider(&base_url)
        .transcribe(std::path::Path::new("/nonexistent/audio.mp3"), None)
        .await;

    assert!(matches!(result, Err(ProviderError::Io(_))));
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_wav_file_when_transcribing_then_file_part_is_labeled_as_wav() {
    let (base_url, captured, shutdown_tx) = start_capturing_whisper_server().await;
    let dir = tempfile::tempdir().unwrap();
    let audio = dir.path().join("source.wav");
    std::fs::write(&audio, b"fake wav bytes").unwrap();

    provider(&base_url).transcribe(&audio, None).await.unwrap();

    let body = captured.lock().unwrap().clone();
    assert!(body.contains("audio/wav"));
    assert!(!body.contains("audio/mpeg"));
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_mp3_file_when_transcribing_then_file_part_is_labeled_as_mpeg() {
    let (base_url, captured, shutdown_tx) = start_capturing_whisper_server().await;
    let dir = tempfile::tempdir().unwrap();
    let audio = dir.path().join("segment_000.mp3");
    std::fs::write(&audio, b"fake mp3 bytes").unwrap();

    provider(&base_url).transcribe(&audio, None).await.unwrap();

    let body = captured.lock().unwrap().clone();
    assert!(body.contains("audio/mpeg"));
    shutdown_tx.send(()).ok();
}

#[test]
fn given_openai_provider_when_asked_for_encoding_then_prefers_compressed_mp3() {
    let provider = OpenAiProvider::new(
        "key".to_string(),
        None,
        None,
        Duration::from_secs(5),
    );

    let encoding = provider.preferred_encoding();
    assert_eq!(encoding.container_extension, "mp3");
    assert_eq!(encoding.channels, 1);
    assert_eq!(provider.name(), "openai");
}
