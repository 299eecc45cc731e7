//! Test helper utilities: a scripted stand-in for the Runway task API and an
//! image host, both served from one local axum listener.

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use base64::Engine;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::io::Cursor;
use std::sync::{Arc, Mutex};

use virtual_tryon::config::AppConfig;

pub const TASK_ID: &str = "task-7f3c";

/// A recorded `POST /v1/text_to_image` call.
#[derive(Debug, Clone)]
pub struct Submission {
    pub authorization: Option<String>,
    pub version: Option<String>,
    pub body: Value,
}

#[derive(Default)]
struct FakeState {
    /// Replies to successive status checks; the last one repeats forever.
    script: Vec<(StatusCode, Value)>,
    submit_rejection: Option<(StatusCode, String)>,
    submissions: Vec<Submission>,
    polls: usize,
    assets: HashMap<String, Vec<u8>>,
}

/// Scripted Runway API. Clones share state.
#[derive(Clone, Default)]
pub struct FakeRunway {
    state: Arc<Mutex<FakeState>>,
}

impl FakeRunway {
    /// Statuses returned by successive polls, each as a full task body.
    pub fn with_script(script: Vec<Value>) -> Self {
        let fake = Self::default();
        fake.state.lock().unwrap().script =
            script.into_iter().map(|body| (StatusCode::OK, body)).collect();
        fake
    }

    pub fn reject_submissions(&self, status: StatusCode, body: &str) {
        self.state.lock().unwrap().submit_rejection = Some((status, body.to_string()));
    }

    pub fn fail_polls(&self, status: StatusCode) {
        self.state.lock().unwrap().script = vec![(status, json!({"error": "upstream"}))];
    }

    pub fn host_image(&self, name: &str, bytes: Vec<u8>) {
        self.state.lock().unwrap().assets.insert(name.to_string(), bytes);
    }

    pub fn submissions(&self) -> Vec<Submission> {
        self.state.lock().unwrap().submissions.clone()
    }

    pub fn polls(&self) -> usize {
        self.state.lock().unwrap().polls
    }

    fn router(&self) -> Router {
        Router::new()
            .route("/v1/text_to_image", post(create_task))
            .route("/v1/tasks/{id}", get(get_task))
            .route("/images/{name}", get(get_image))
            .route("/streamed/{name}", get(get_streamed_image))
            .with_state(self.clone())
    }

    /// Serve on an ephemeral port and return the base URL.
    pub async fn spawn(&self) -> String {
        spawn_router(self.router()).await
    }
}

async fn create_task(
    State(fake): State<FakeRunway>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, String) {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    let mut state = fake.state.lock().unwrap();
    state.submissions.push(Submission {
        authorization: header("authorization"),
        version: header("x-runway-version"),
        body,
    });
    match &state.submit_rejection {
        Some((status, body)) => (*status, body.clone()),
        None => (StatusCode::OK, json!({ "id": TASK_ID }).to_string()),
    }
}

async fn get_task(State(fake): State<FakeRunway>, Path(id): Path<String>) -> (StatusCode, Json<Value>) {
    let mut state = fake.state.lock().unwrap();
    state.polls += 1;
    if id != TASK_ID {
        return (StatusCode::NOT_FOUND, Json(json!({"error": "unknown task"})));
    }
    let index = (state.polls - 1).min(state.script.len().saturating_sub(1));
    match state.script.get(index) {
        Some((status, body)) => (*status, Json(body.clone())),
        None => (StatusCode::OK, Json(task("PENDING"))),
    }
}

async fn get_image(
    State(fake): State<FakeRunway>,
    Path(name): Path<String>,
) -> Result<Vec<u8>, StatusCode> {
    let state = fake.state.lock().unwrap();
    state.assets.get(&name).cloned().ok_or(StatusCode::NOT_FOUND)
}

/// Same assets sent chunked, without a Content-Length header.
async fn get_streamed_image(
    State(fake): State<FakeRunway>,
    Path(name): Path<String>,
) -> Result<Body, StatusCode> {
    let bytes = get_image(State(fake), Path(name)).await?;
    let chunks: Vec<Result<Vec<u8>, std::io::Error>> =
        bytes.chunks(1024).map(|chunk| Ok(chunk.to_vec())).collect();
    Ok(Body::from_stream(futures::stream::iter(chunks)))
}

pub async fn spawn_router(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

/// Task body with just a status.
pub fn task(status: &str) -> Value {
    json!({ "id": TASK_ID, "status": status })
}

pub fn succeeded(outputs: &[&str]) -> Value {
    json!({ "id": TASK_ID, "status": "SUCCEEDED", "output": outputs })
}

/// Config pointing at the fake with a short poll interval.
pub fn test_config(base_url: &str) -> AppConfig {
    AppConfig {
        runway_api_base: base_url.to_string(),
        poll_interval_ms: 10,
        ..AppConfig::default()
    }
}

/// A PNG of the given size with a simple gradient.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let image = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    let mut bytes = Vec::new();
    DynamicImage::ImageRgb8(image)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}

pub fn png_data_uri(width: u32, height: u32) -> String {
    format!(
        "data:image/png;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(png_bytes(width, height))
    )
}

/// Dimensions of an image carried in a data URI.
pub fn data_uri_dimensions(uri: &str) -> (u32, u32) {
    let bytes = virtual_tryon::services::normalizer::decode_data_uri(uri).unwrap();
    let image = image::load_from_memory(&bytes).unwrap();
    (image.width(), image.height())
}
