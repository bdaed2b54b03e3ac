#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::{Body, Bytes};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use formgate::config::AppConfig;
use formgate::mailer::{DeliveryReceipt, MailError, Mailer, Outgoing};
use formgate::state::AppState;
use formgate::store::MemoryStore;

pub const ADMIN_KEY: &str = "test-admin-key";

/// Recording mailer: captures every outgoing message instead of touching a
/// transport, and can be flipped into a failing mode.
#[derive(Default)]
pub struct MockMailer {
    pub sent: Mutex<Vec<Outgoing>>,
    fail: AtomicBool,
}

impl MockMailer {
    pub fn fail_next_sends(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    pub fn last_sent(&self) -> Outgoing {
        self.sent
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no mail was sent")
    }
}

#[async_trait]
impl Mailer for MockMailer {
    async fn send(&self, mail: Outgoing) -> Result<DeliveryReceipt, MailError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(MailError::Transport("mock transport down".to_string()));
        }
        self.sent.lock().unwrap().push(mail);
        Ok(DeliveryReceipt {
            code: "250".to_string(),
        })
    }

    async fn verify(&self) -> Result<(), MailError> {
        Ok(())
    }
}

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub mailer: Arc<MockMailer>,
    pub upload_dir: PathBuf,
}

/// Default test configuration: admin key set, write gates on, uploads in a
/// fresh temp directory.
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::development();
    config.security.admin_api_key = Some(ADMIN_KEY.to_string());
    config.upload.dir = std::env::temp_dir().join(format!("formgate-test-{}", Uuid::new_v4()));
    config
}

pub fn spawn_app() -> TestApp {
    spawn_app_with(test_config())
}

pub fn spawn_app_with(config: AppConfig) -> TestApp {
    std::fs::create_dir_all(&config.upload.dir).expect("create upload dir");
    let upload_dir = config.upload.dir.clone();
    let store = Arc::new(MemoryStore::new());
    let mailer = Arc::new(MockMailer::default());
    let state = AppState::with_parts(config, store.clone(), mailer.clone());
    TestApp {
        router: formgate::app(state),
        store,
        mailer,
        upload_dir,
    }
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Bytes) {
    let response = router
        .clone()
        .oneshot(request)
        .await
        .expect("infallible router");
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    (status, body)
}

async fn send_json_body(
    router: &Router,
    method: Method,
    path: &str,
    body: Option<&Value>,
    headers: &[(&str, &str)],
) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method(method)
        .uri(path)
        .header(header::HOST, "test.local");
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let (status, bytes) = send(router, request).await;
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

pub async fn get_json(router: &Router, path: &str) -> (StatusCode, Value) {
    send_json_body(router, Method::GET, path, None, &[]).await
}

pub async fn get_raw(router: &Router, path: &str) -> (StatusCode, Bytes) {
    let request = Request::builder()
        .method(Method::GET)
        .uri(path)
        .header(header::HOST, "test.local")
        .body(Body::empty())
        .unwrap();
    send(router, request).await
}

pub async fn post_json(
    router: &Router,
    path: &str,
    body: &Value,
    headers: &[(&str, &str)],
) -> (StatusCode, Value) {
    send_json_body(router, Method::POST, path, Some(body), headers).await
}

pub async fn put_json(
    router: &Router,
    path: &str,
    body: &Value,
    headers: &[(&str, &str)],
) -> (StatusCode, Value) {
    send_json_body(router, Method::PUT, path, Some(body), headers).await
}

pub async fn delete(router: &Router, path: &str, headers: &[(&str, &str)]) -> (StatusCode, Value) {
    send_json_body(router, Method::DELETE, path, None, headers).await
}

/// One part of a multipart/form-data request body.
pub struct Part {
    pub name: &'static str,
    pub filename: Option<&'static str>,
    pub content_type: Option<&'static str>,
    pub data: Vec<u8>,
}

impl Part {
    pub fn text(name: &'static str, value: &str) -> Self {
        Self {
            name,
            filename: None,
            content_type: None,
            data: value.as_bytes().to_vec(),
        }
    }

    pub fn file(
        name: &'static str,
        filename: &'static str,
        content_type: &'static str,
        data: Vec<u8>,
    ) -> Self {
        Self {
            name,
            filename: Some(filename),
            content_type: Some(content_type),
            data,
        }
    }
}

pub async fn post_multipart(router: &Router, path: &str, parts: &[Part]) -> (StatusCode, Value) {
    let boundary = "------------------------formgate-test";
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
        match part.filename {
            Some(filename) => body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                    part.name, filename
                )
                .as_bytes(),
            ),
            None => body.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"{}\"\r\n", part.name).as_bytes(),
            ),
        }
        if let Some(content_type) = part.content_type {
            body.extend_from_slice(format!("Content-Type: {content_type}\r\n").as_bytes());
        }
        body.extend_from_slice(b"\r\n");
        body.extend_from_slice(&part.data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());

    let request = Request::builder()
        .method(Method::POST)
        .uri(path)
        .header(header::HOST, "test.local")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap();

    let (status, bytes) = send(router, request).await;
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

/// Field names from a validation error response.
pub fn error_fields(body: &Value) -> Vec<String> {
    body["errors"]
        .as_array()
        .map(|errors| {
            errors
                .iter()
                .filter_map(|e| e["field"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

pub fn admin_headers() -> Vec<(&'static str, &'static str)> {
    vec![("x-api-key", ADMIN_KEY)]
}
