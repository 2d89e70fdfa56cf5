//! A local stand-in for the Gemini REST API.

#![allow(dead_code)]

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use masal_models::GeminiClient;
use masal_rate_limit::MasalConfig;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// A valid story in the shape the story model returns.
pub const STORY_JSON: &str = r#"{
  "title": "Ayşe ve Yıldız Tozu",
  "summary": "Ayşe uzaya gider. Yıldızlarla arkadaş olur.",
  "coverImagePrompt": "A little girl in a rocket, Whimsical digital illustration",
  "pages": [
    {"pageNumber": 1, "text": "Ayşe roketine bindi.", "imagePrompt": "A girl boarding a rocket"},
    {"pageNumber": 2, "text": "Yıldızlar ona göz kırptı.", "imagePrompt": "Stars winking at a girl"}
  ]
}"#;

/// One request received by the fake server.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub model: String,
    pub api_key: Option<String>,
    pub body: Value,
}

/// Fake Gemini server state.
#[derive(Debug, Clone)]
pub struct FakeGemini {
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    failures_remaining: Arc<AtomicUsize>,
    failure_status: u16,
    story_text: String,
    blocked: bool,
}

impl Default for FakeGemini {
    fn default() -> Self {
        Self {
            requests: Arc::new(Mutex::new(Vec::new())),
            failures_remaining: Arc::new(AtomicUsize::new(0)),
            failure_status: 503,
            story_text: format!("```json\n{}\n```", STORY_JSON),
            blocked: false,
        }
    }
}

impl FakeGemini {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer the first `n` requests with `status`.
    pub fn failing_first(mut self, n: usize, status: u16) -> Self {
        self.failures_remaining = Arc::new(AtomicUsize::new(n));
        self.failure_status = status;
        self
    }

    /// Text the story model answers with.
    pub fn with_story_text(mut self, text: impl Into<String>) -> Self {
        self.story_text = text.into();
        self
    }

    /// Block every prompt.
    pub fn blocked(mut self) -> Self {
        self.blocked = true;
        self
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Serve on an ephemeral port and return the base URL.
    pub async fn spawn(&self) -> anyhow::Result<String> {
        let app = Router::new()
            .route("/v1beta/models/:call", post(generate_content))
            .with_state(self.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(format!("http://{}/v1beta", addr))
    }

    /// Spawn the server and build a client pointed at it.
    pub async fn client(&self) -> anyhow::Result<GeminiClient> {
        let base_url = self.spawn().await?;
        let config = MasalConfig::from_toml_str(&format!("[models]\nbase_url = \"{}\"", base_url))?;
        Ok(
            GeminiClient::with_api_key("test-key", &config, Some("payasyougo"))?
                .with_retry_overrides(Some(1), Some(2)),
        )
    }
}

async fn generate_content(
    State(fake): State<FakeGemini>,
    Path(call): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    Json(body): Json<Value>,
) -> Response {
    let model = call.split(':').next().unwrap_or_default().to_string();
    fake.requests.lock().unwrap().push(RecordedRequest {
        model: model.clone(),
        api_key: query.get("key").cloned(),
        body,
    });

    let should_fail = fake
        .failures_remaining
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        .is_ok();
    if should_fail {
        let status = StatusCode::from_u16(fake.failure_status).unwrap();
        return (status, Json(json!({"error": {"message": "simulated failure"}}))).into_response();
    }

    if fake.blocked {
        return Json(json!({"promptFeedback": {"blockReason": "SAFETY"}})).into_response();
    }

    let part = if model.contains("image") {
        json!({"inlineData": {"mimeType": "image/png", "data": "aW1hZ2U="}})
    } else if model.contains("tts") {
        json!({"inlineData": {"mimeType": "audio/L16;codec=pcm;rate=24000", "data": "AAAAAA=="}})
    } else {
        json!({"text": fake.story_text})
    };

    Json(json!({
        "candidates": [{
            "content": {"role": "model", "parts": [part]},
            "finishReason": "STOP"
        }]
    }))
    .into_response()
}
