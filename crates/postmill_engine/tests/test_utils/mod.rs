//! Mock collaborators shared by engine tests.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use parking_lot::Mutex;
use postmill_core::Platform;
use postmill_engine::{AutomationEngine, EngineConfig, FixedClock};
use postmill_error::{
    GenerationError, GenerationErrorKind, GenerationResult, PublishError, PublishErrorKind,
    PublishResult,
};
use postmill_models::{ContentGenerator, ContentRequest, GeneratedContent, TextModel};
use postmill_social::{PublishReceipt, PublishRequest, Publisher, PublisherDispatch};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// 2024-03-01 at the given UTC wall-clock time.
pub fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, hour, minute, 0)
        .single()
        .expect("Valid test time")
}

/// Generator returning `Post about <topic>` and failing for chosen topics.
#[derive(Default)]
pub struct MockGenerator {
    fail_topics: Vec<String>,
    fail_all: bool,
    requests: Mutex<Vec<ContentRequest>>,
}

impl MockGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail_all: true,
            ..Self::default()
        }
    }

    pub fn failing_for(topic: &str) -> Self {
        Self {
            fail_topics: vec![topic.to_string()],
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().len()
    }

    pub fn requests(&self) -> Vec<ContentRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl ContentGenerator for MockGenerator {
    async fn generate(&self, request: &ContentRequest) -> GenerationResult<GeneratedContent> {
        self.requests.lock().push(request.clone());
        let topic = request.topic().clone().unwrap_or_else(|| "default".to_string());
        if self.fail_all || self.fail_topics.contains(&topic) {
            return Err(GenerationError::new(GenerationErrorKind::EmptyOutput));
        }
        let image = request
            .generate_image()
            .then(|| "https://cdn.test/generated.png".to_string());
        Ok(GeneratedContent::new(
            format!("Post about {}", topic),
            None,
            image,
            "mock",
            topic,
        ))
    }
}

/// Text model that records prompts and answers with fixed text.
#[derive(Default)]
pub struct RecordingModel {
    prompts: Mutex<Vec<String>>,
}

impl RecordingModel {
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }
}

#[async_trait]
impl TextModel for RecordingModel {
    fn model_name(&self) -> &str {
        "recording"
    }

    async fn complete(&self, prompt: &str) -> GenerationResult<String> {
        self.prompts.lock().push(prompt.to_string());
        Ok("**Fresh** post from the recording model\n\n\n#rust".to_string())
    }
}

/// Publisher counting calls, optionally failing or simulating every publish.
pub struct MockPublisher {
    platform: Platform,
    fail: bool,
    simulate: bool,
    calls: AtomicUsize,
    contents: Mutex<Vec<String>>,
}

impl MockPublisher {
    pub fn new(platform: Platform) -> Self {
        Self {
            platform,
            fail: false,
            simulate: false,
            calls: AtomicUsize::new(0),
            contents: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(platform: Platform) -> Self {
        Self {
            fail: true,
            ..Self::new(platform)
        }
    }

    pub fn simulating(platform: Platform) -> Self {
        Self {
            simulate: true,
            ..Self::new(platform)
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn contents(&self) -> Vec<String> {
        self.contents.lock().clone()
    }
}

#[async_trait]
impl Publisher for MockPublisher {
    fn platform(&self) -> Platform {
        self.platform
    }

    async fn publish(&self, request: &PublishRequest) -> PublishResult<PublishReceipt> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.contents.lock().push(request.content().clone());
        if self.fail {
            return Err(PublishError::new(PublishErrorKind::Failed(format!(
                "{} is down",
                self.platform
            ))));
        }
        let id = format!("{}_{}", self.platform, n);
        if self.simulate {
            return Ok(PublishReceipt::new_simulated(self.platform, id));
        }
        Ok(PublishReceipt::now(self.platform, id))
    }
}

/// Engine wired to mocks, with handles to inspect them.
pub struct Harness {
    pub engine: AutomationEngine,
    pub clock: Arc<FixedClock>,
    pub generator: Arc<MockGenerator>,
    pub publishers: Vec<Arc<MockPublisher>>,
}

impl Harness {
    pub fn new(config: EngineConfig, generator: MockGenerator, now: DateTime<Utc>) -> Self {
        Self::with_publishers(
            config,
            generator,
            now,
            vec![
                MockPublisher::new(Platform::Facebook),
                MockPublisher::new(Platform::Instagram),
                MockPublisher::new(Platform::Twitter),
                MockPublisher::new(Platform::Linkedin),
            ],
        )
    }

    pub fn with_publishers(
        config: EngineConfig,
        generator: MockGenerator,
        now: DateTime<Utc>,
        publishers: Vec<MockPublisher>,
    ) -> Self {
        let clock = Arc::new(FixedClock::new(now));
        let generator = Arc::new(generator);
        let publishers: Vec<Arc<MockPublisher>> = publishers.into_iter().map(Arc::new).collect();

        let mut dispatch = PublisherDispatch::new();
        for publisher in &publishers {
            dispatch.register(publisher.clone());
        }

        let engine = AutomationEngine::with_clock(config, generator.clone(), dispatch, clock.clone());
        Self {
            engine,
            clock,
            generator,
            publishers,
        }
    }

    pub fn publisher(&self, platform: Platform) -> &MockPublisher {
        self.publishers
            .iter()
            .find(|p| p.platform == platform)
            .expect("Publisher registered")
    }

    pub fn total_publish_calls(&self) -> usize {
        self.publishers.iter().map(|p| p.calls()).sum()
    }
}
