#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use ninni::config::{AnonymousSessions, PersonaConfig};
use ninni::{create_router, AppState, SessionManager};
use ninni_llm_api::{BackendType, GenerateRequest, LlmClient, LlmError, LlmResponse};
use ninni_models::Turn;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tower::ServiceExt;

/// In-process stand-in for the hosted model
///
/// Replies with a counter so two identical requests get different text, and
/// records every history it was shown.
#[derive(Default)]
pub struct StubLlm {
    calls: AtomicUsize,
    fail: AtomicBool,
    histories: Mutex<Vec<Vec<Turn>>>,
    system_instructions: Mutex<Vec<Option<String>>>,
}

impl StubLlm {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn histories(&self) -> Vec<Vec<Turn>> {
        self.histories.lock().unwrap().clone()
    }

    pub fn system_instructions(&self) -> Vec<Option<String>> {
        self.system_instructions.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmClient for StubLlm {
    async fn generate(&self, request: GenerateRequest<'_>) -> Result<LlmResponse, LlmError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.histories.lock().unwrap().push(request.history.to_vec());
        self.system_instructions
            .lock()
            .unwrap()
            .push(request.system_instruction.map(str::to_string));

        if self.fail.load(Ordering::SeqCst) {
            return Err(LlmError::Api {
                backend: "gemini",
                status: 429,
                message: "Resource has been exhausted".to_string(),
            });
        }

        Ok(LlmResponse {
            text: format!("Sweet dreams #{call} 🌙"),
            usage: None,
            finish_reason: Some("STOP".to_string()),
        })
    }

    fn backend(&self) -> BackendType {
        BackendType::Gemini
    }

    fn model(&self) -> &str {
        "stub"
    }
}

pub struct TestApp {
    pub router: Router,
    pub llm: Arc<StubLlm>,
    pub sessions: Arc<SessionManager>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_policy(AnonymousSessions::Shared)
    }

    pub fn with_policy(anonymous_sessions: AnonymousSessions) -> Self {
        let llm = StubLlm::new();
        let sessions = Arc::new(SessionManager::new(100, Duration::from_secs(3600)));
        let state = AppState {
            sessions: sessions.clone(),
            llm: llm.clone(),
            persona: Arc::new(PersonaConfig::default()),
            anonymous_sessions,
        };

        Self {
            router: create_router(state),
            llm,
            sessions,
        }
    }

    pub async fn post_chat(&self, body: Value) -> (StatusCode, Value) {
        self.post_raw(body.to_string(), Some("application/json")).await
    }

    pub async fn post_raw(&self, body: String, content_type: Option<&str>) -> (StatusCode, Value) {
        let mut request = Request::builder().method("POST").uri("/api/chat");
        if let Some(content_type) = content_type {
            request = request.header("content-type", content_type);
        }
        let request = request.body(Body::from(body)).unwrap();
        self.send(request).await
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        self.send(request).await
    }

    pub async fn get_text(&self, uri: &str) -> (StatusCode, String) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }
}
