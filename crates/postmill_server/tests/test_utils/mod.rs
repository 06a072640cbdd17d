//! Router harness shared by server tests.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use postmill_core::Platform;
use postmill_engine::{AutomationEngine, EngineConfig};
use postmill_error::{GenerationResult, PublishResult};
use postmill_models::{ContentGenerator, ContentRequest, GeneratedContent};
use postmill_server::{ApiState, create_router};
use postmill_social::{PublishReceipt, PublishRequest, Publisher, PublisherDispatch};
use serde_json::Value;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tower::ServiceExt;

/// Generator answering `Post about <topic>`.
pub struct EchoGenerator;

#[async_trait]
impl ContentGenerator for EchoGenerator {
    async fn generate(&self, request: &ContentRequest) -> GenerationResult<GeneratedContent> {
        let topic = request.topic().clone().unwrap_or_else(|| "default".to_string());
        Ok(GeneratedContent::new(
            format!("Post about {}", topic),
            None,
            None,
            "echo",
            topic,
        ))
    }
}

/// Publisher that always succeeds and counts calls.
pub struct CountingPublisher {
    platform: Platform,
    calls: AtomicUsize,
}

impl CountingPublisher {
    pub fn new(platform: Platform) -> Self {
        Self {
            platform,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Publisher for CountingPublisher {
    fn platform(&self) -> Platform {
        self.platform
    }

    async fn publish(&self, _request: &PublishRequest) -> PublishResult<PublishReceipt> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(PublishReceipt::now(
            self.platform,
            format!("{}_{}", self.platform, n),
        ))
    }
}

/// Router over an engine with a counting Facebook and Twitter publisher.
pub struct TestApp {
    pub router: Router,
    pub engine: Arc<AutomationEngine>,
    pub facebook: Arc<CountingPublisher>,
    pub twitter: Arc<CountingPublisher>,
}

impl TestApp {
    pub fn new() -> Self {
        let facebook = Arc::new(CountingPublisher::new(Platform::Facebook));
        let twitter = Arc::new(CountingPublisher::new(Platform::Twitter));
        let dispatch = PublisherDispatch::new()
            .with(facebook.clone())
            .with(twitter.clone());
        let engine = Arc::new(AutomationEngine::new(
            EngineConfig::default(),
            Arc::new(EchoGenerator),
            dispatch,
        ));
        let router = create_router(ApiState::new(engine.clone()));
        Self {
            router,
            engine,
            facebook,
            twitter,
        }
    }

    /// Send a request with an optional JSON body and decode the JSON reply.
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> anyhow::Result<(StatusCode, Value)> {
        let raw = body.map(|v| serde_json::to_string(&v)).transpose()?;
        self.send_raw(method, uri, raw).await
    }

    /// Send a request with an optional raw body.
    pub async fn send_raw(
        &self,
        method: Method,
        uri: &str,
        body: Option<String>,
    ) -> anyhow::Result<(StatusCode, Value)> {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body))?,
            None => builder.body(Body::empty())?,
        };
        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)?
        };
        Ok((status, json))
    }
}
