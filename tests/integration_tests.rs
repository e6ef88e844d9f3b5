//! End-to-end tests of the client flows against an in-process mock backend

use axum::{
    extract::{Multipart, State},
    http::{HeaderMap, StatusCode},
    response::Json,
    routing::post,
    Router,
};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

use pdfchat::{
    config::Config,
    handlers::{ChatOutcome, ClientHandler, UploadOutcome, View},
    models::{SelectedFile, PDF_MIME_TYPE},
    mount, HttpTransport, SessionToken,
};

const VALID_TOKEN: &str = "valid-session";

#[derive(Debug, Clone)]
struct ReceivedUpload {
    field: String,
    file_name: Option<String>,
    content_type: Option<String>,
    bytes: Vec<u8>,
}

#[derive(Default)]
struct Backend {
    uploads: Mutex<Vec<ReceivedUpload>>,
    chats: Mutex<Vec<Value>>,
    chat_content_types: Mutex<Vec<String>>,
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|h| h.to_str().ok())
        .map(|h| h == format!("Bearer {}", VALID_TOKEN))
        .unwrap_or(false)
}

async fn upload_route(
    State(backend): State<Arc<Backend>>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> (StatusCode, Json<Value>) {
    if !authorized(&headers) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "detail": "Not logged in or session expired" })),
        );
    }

    let mut received = None;
    while let Ok(Some(field)) = multipart.next_field().await {
        let upload = ReceivedUpload {
            field: field.name().unwrap_or("").to_string(),
            file_name: field.file_name().map(str::to_string),
            content_type: field.content_type().map(str::to_string),
            bytes: field.bytes().await.map(|b| b.to_vec()).unwrap_or_default(),
        };
        received = Some(upload);
    }

    let Some(upload) = received else {
        return (StatusCode::UNPROCESSABLE_ENTITY, Json(json!({ "detail": "file required" })));
    };
    backend.uploads.lock().unwrap().push(upload.clone());

    if upload.content_type.as_deref() != Some("application/pdf") {
        return (StatusCode::BAD_REQUEST, Json(json!({ "detail": "Only PDF files allowed." })));
    }
    (
        StatusCode::OK,
        Json(json!({ "status": "success", "filename": upload.file_name })),
    )
}

async fn chat_route(
    State(backend): State<Arc<Backend>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    if !authorized(&headers) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "detail": "Not logged in or session expired" })),
        );
    }
    let content_type = headers
        .get("content-type")
        .and_then(|h| h.to_str().ok())
        .unwrap_or("")
        .to_string();
    backend.chat_content_types.lock().unwrap().push(content_type);
    backend.chats.lock().unwrap().push(body.clone());

    let message = body["message"].as_str().unwrap_or("");
    if message.trim().is_empty() {
        return (StatusCode::BAD_REQUEST, Json(json!({ "detail": "Empty message" })));
    }
    (StatusCode::OK, Json(json!({ "response": format!("echo: {}", message) })))
}

async fn start_backend() -> (String, Arc<Backend>) {
    let backend = Arc::new(Backend::default());
    let app = Router::new()
        .route("/upload", post(upload_route))
        .route("/chat", post(chat_route))
        .with_state(Arc::clone(&backend));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}", addr), backend)
}

#[derive(Default)]
struct CapturedView {
    alerts: Mutex<Vec<String>>,
    navigations: Mutex<Vec<String>>,
    output: Mutex<Option<String>>,
}

impl View for CapturedView {
    fn alert(&self, message: &str) {
        self.alerts.lock().unwrap().push(message.to_string());
    }

    fn navigate(&self, path: &str) {
        self.navigations.lock().unwrap().push(path.to_string());
    }

    fn render_chat_output(&self, text: &str) {
        *self.output.lock().unwrap() = Some(text.to_string());
    }
}

fn client(
    base_url: &str,
    token: Option<&str>,
) -> (ClientHandler<HttpTransport, Arc<CapturedView>>, Arc<CapturedView>) {
    let config = Config {
        base_url: base_url.to_string(),
        ..Config::default()
    };
    let view = Arc::new(CapturedView::default());
    let handler = ClientHandler::new(
        config,
        HttpTransport::new(base_url),
        Arc::clone(&view),
        token.map(SessionToken::new),
    );
    (handler, view)
}

fn pdf(name: &str) -> SelectedFile {
    SelectedFile::new(name, b"%PDF-1.7\n%test document".to_vec()).with_mime_type(PDF_MIME_TYPE)
}

#[tokio::test]
async fn test_upload_sends_multipart_file_field() {
    let (base_url, backend) = start_backend().await;
    let (handler, view) = client(&base_url, Some(VALID_TOKEN));

    let outcome = handler.submit_upload(vec![pdf("policy.pdf")]).await.unwrap();
    match outcome {
        UploadOutcome::Uploaded(body) => {
            assert_eq!(body.status(), Some("success"));
            assert_eq!(body.filename(), Some("policy.pdf"));
        }
        other => panic!("Expected upload success, got {:?}", other),
    }

    let uploads = backend.uploads.lock().unwrap().clone();
    assert_eq!(uploads.len(), 1);
    assert_eq!(uploads[0].field, "file");
    assert_eq!(uploads[0].file_name.as_deref(), Some("policy.pdf"));
    assert_eq!(uploads[0].content_type.as_deref(), Some("application/pdf"));
    assert_eq!(uploads[0].bytes, b"%PDF-1.7\n%test document".to_vec());
    assert_eq!(*view.alerts.lock().unwrap(), vec!["PDF uploaded successfully.".to_string()]);
}

#[tokio::test]
async fn test_upload_rejected_locally_never_reaches_backend() {
    let (base_url, backend) = start_backend().await;
    let (handler, view) = client(&base_url, Some(VALID_TOKEN));

    let text = SelectedFile::new("notes.txt", b"plain".to_vec()).with_mime_type("text/plain");
    let outcome = handler.submit_upload(vec![text]).await.unwrap();

    assert!(matches!(outcome, UploadOutcome::Rejected { .. }));
    assert!(backend.uploads.lock().unwrap().is_empty());
    assert_eq!(*view.alerts.lock().unwrap(), vec!["Please upload a valid PDF.".to_string()]);
}

#[tokio::test]
async fn test_upload_without_session_redirects_to_login() {
    let (base_url, backend) = start_backend().await;
    let (handler, view) = client(&base_url, Some("stale-token"));

    let outcome = handler.submit_upload(vec![pdf("policy.pdf")]).await.unwrap();

    assert!(matches!(outcome, UploadOutcome::LoginRequired));
    assert!(backend.uploads.lock().unwrap().is_empty());
    assert_eq!(*view.alerts.lock().unwrap(), vec!["Please log in to upload.".to_string()]);
    assert_eq!(*view.navigations.lock().unwrap(), vec!["/auth/login".to_string()]);
}

#[tokio::test]
async fn test_chat_round_trip_renders_answer() {
    let (base_url, backend) = start_backend().await;
    let (handler, view) = client(&base_url, Some(VALID_TOKEN));

    let outcome = handler.submit_chat("What is covered?".to_string()).await.unwrap();

    assert_eq!(outcome, ChatOutcome::Answered("echo: What is covered?".to_string()));
    assert_eq!(
        view.output.lock().unwrap().as_deref(),
        Some("AI: echo: What is covered?")
    );
    assert_eq!(
        *backend.chats.lock().unwrap(),
        vec![json!({ "message": "What is covered?" })]
    );
    assert_eq!(
        *backend.chat_content_types.lock().unwrap(),
        vec!["application/json".to_string()]
    );
}

#[tokio::test]
async fn test_empty_chat_message_is_sent_as_is() {
    let (base_url, backend) = start_backend().await;
    let (handler, view) = client(&base_url, Some(VALID_TOKEN));

    let outcome = handler.submit_chat(String::new()).await.unwrap();

    assert_eq!(
        outcome,
        ChatOutcome::Failed { status: 400, detail: "Empty message".to_string() }
    );
    assert_eq!(*backend.chats.lock().unwrap(), vec![json!({ "message": "" })]);
    assert_eq!(*view.alerts.lock().unwrap(), vec!["Chat failed: Empty message".to_string()]);
    assert!(view.output.lock().unwrap().is_none());
}

#[tokio::test]
async fn test_mounted_client_over_http() {
    let (base_url, backend) = start_backend().await;
    let (handler, view) = client(&base_url, Some(VALID_TOKEN));

    let mounted = mount(handler).unwrap();
    mounted.submit_upload(vec![pdf("a.pdf")]).unwrap();
    mounted.submit_chat("first").unwrap();
    mounted.dispose().await;

    assert_eq!(backend.uploads.lock().unwrap().len(), 1);
    assert_eq!(backend.chats.lock().unwrap().len(), 1);
    assert_eq!(view.output.lock().unwrap().as_deref(), Some("AI: echo: first"));
}

#[tokio::test]
async fn test_unreachable_backend_surfaces_transport_error() {
    // Bind and drop to get a port nothing listens on.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let (handler, view) = client(&format!("http://{}", addr), Some(VALID_TOKEN));
    let err = handler.submit_chat("hello".to_string()).await.unwrap_err();

    assert_eq!(err.error_code(), "TRANSPORT_ERROR");
    assert!(view.alerts.lock().unwrap().is_empty());
}
