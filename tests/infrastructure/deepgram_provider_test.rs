use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use axum::response::IntoResponse;
use axum::routing::post;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use skopun::application::ports::{ProviderError, TranscriptionProvider};
use skopun::infrastructure::providers::DeepgramProvider;

async fn start_mock_deepgram_server(
    response_status: u16,
    response_body: &'static str,
) -> (String, oneshot::Sender<()>) {
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let app = Router::new().route(
        "/v1/listen",
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

async fn start_header_capturing_deepgram_server()
-> (String, Arc<Mutex<String>>, oneshot::Sender<()>) {
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let captured = Arc::new(Mutex::new(String::new()));
    let captured_by_handler = Arc::clone(&captured);

    let app = Router::new().route(
        "/v1/listen",
        post(move |headers: axum::http::HeaderMap| {
            let captured = Arc::clone(&captured_by_handler);
            async move {
                let content_type = headers
                    .get(axum::http::header::CONTENT_TYPE)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("")
                    .to_string();
                *captured.lock().unwrap() = content_type;
                r#"{"results": {"channels": [{"alternatives": [{"transcript": "ok"}]}]}}"#
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

fn provider(base_url: &str) -> DeepgramProvider {
    DeepgramProvider::new(
        "test-key".to_string(),
        Some(base_url.to_string()),
        None,
        Duration::from_secs(5),
    )
}

fn write_audio_file(dir: &tempfile::TempDir) -> std::path::PathBuf {
    let path = dir.path().join("segment_000.wav");
    std::fs::write(&path, b"fake wav bytes").unwrap();
    path
}

#[tokio::test]
async fn given_valid_audio_file_when_transcribing_then_extracts_first_alternative() {
    let response_body = r#"{
        "results": {
            "channels": [
                {"alternatives": [{"transcript": "Hello from Deepgram"}]}
            ]
        }
    }"#;
    let (base_url, shutdown_tx) = start_mock_deepgram_server(200, response_body).await;
    let dir = tempfile::tempdir().unwrap();
    let audio = write_audio_file(&dir);

    let result = provider(&base_url).transcribe(&audio, None).await;

    assert_eq!(result.unwrap(), "Hello from Deepgram");
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_api_error_status_when_transcribing_then_returns_request_failed() {
    let (base_url, shutdown_tx) =
        start_mock_deepgram_server(401, r#"{"err_msg": "invalid credentials"}"#).await;
    let dir = tempfile::tempdir().unwrap();
    let audio = write_audio_file(&dir);

    let result = provider(&base_url).transcribe(&audio, None).await;

    assert!(matches!(
        result,
        Err(ProviderError::RequestFailed {
            status: Some(401),
            ..
        })
    ));
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_non_json_body_when_transcribing_then_returns_malformed_response() {
    let (base_url, shutdown_tx) = start_mock_deepgram_server(200, "not json at all").await;
    let dir = tempfile::tempdir().unwrap();
    let audio = write_audio_file(&dir);

    let result = provider(&base_url).transcribe(&audio, None).await;

    assert!(matches!(result, Err(ProviderError::MalformedResponse(_))));
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_response_without_channels_when_transcribing_then_returns_malformed_response() {
    let (base_url, shutdown_tx) =
        start_mock_deepgram_server(200, r#"{"results": {"channels": []}}"#).await;
    let dir = tempfile::tempdir().unwrap();
    let audio = write_audio_file(&dir);

    let result = provider(&base_url).transcribe(&audio, None).await;

    assert!(matches!(result, Err(ProviderError::MalformedResponse(_))));
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_mp3_file_when_transcribing_then_content_type_follows_the_file() {
    let (base_url, captured, shutdown_tx) = start_header_capturing_deepgram_server().await;
    let dir = tempfile::tempdir().unwrap();
    let audio = dir.path().join("compressed.mp3");
    std::fs::write(&audio, b"fake mp3 bytes").unwrap();

    provider(&base_url).transcribe(&audio, None).await.unwrap();

    assert_eq!(captured.lock().unwrap().as_str(), "audio/mpeg");
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_wav_file_when_transcribing_then_content_type_is_wav() {
    let (base_url, captured, shutdown_tx) = start_header_capturing_deepgram_server().await;
    let dir = tempfile::tempdir().unwrap();
    let audio = write_audio_file(&dir);

    provider(&base_url).transcribe(&audio, None).await.unwrap();

    assert_eq!(captured.lock().unwrap().as_str(), "audio/wav");
    shutdown_tx.send(()).ok();
}

#[test]
fn given_deepgram_provider_when_asked_for_encoding_then_prefers_wav() {
    let provider = DeepgramProvider::new(
        "key".to_string(),
        None,
        None,
        Duration::from_secs(5),
    );

    let encoding = provider.preferred_encoding();
    assert_eq!(encoding.container_extension, "wav");
    assert_eq!(encoding.sample_rate_hz, 16_000);
    assert_eq!(provider.name(), "deepgram");
}
