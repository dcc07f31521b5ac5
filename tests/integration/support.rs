//! Shared fixtures for the integration tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use policy_guardian::models::settings::AppConfig;
use policy_guardian::services::generative::{AiCapabilities, Capability};
use policy_guardian::services::page::{PageSnapshot, StaticPageCollector};
use policy_guardian::services::scan::ScanEvent;
use policy_guardian::AppState;
use policy_guardian_core::TabId;
use policy_guardian_llm::{
    LlmError, LlmProvider, LlmRequestOptions, LlmResponse, LlmResult, Message, ProviderConfig,
    UsageStats,
};
use tokio::sync::broadcast;

pub const PRIVACY_URL: &str = "https://example.com/privacy-policy";
pub const PRIVACY_TITLE: &str = "Privacy Policy";
pub const PRIVACY_BODY: &str = "We collect personal information and share it with third party \
advertising partners, including tracking cookies.\n\nYou may contact us at any time.";

pub fn privacy_snapshot() -> PageSnapshot {
    PageSnapshot::from_plain_text(PRIVACY_URL, PRIVACY_TITLE, Vec::new(), PRIVACY_BODY)
}

/// What a mock provider does when asked for a completion.
pub enum Behavior {
    Reply(String),
    Fail,
    Panic,
}

/// Mock LLM provider for testing
pub struct MockProvider {
    behavior: Behavior,
    config: ProviderConfig,
    calls: AtomicUsize,
}

impl MockProvider {
    pub fn new(behavior: Behavior) -> Arc<Self> {
        Arc::new(Self {
            behavior,
            config: ProviderConfig::default(),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn replying(reply: &str) -> Arc<Self> {
        Self::new(Behavior::Reply(reply.to_string()))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LlmProvider for MockProvider {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn model(&self) -> &str {
        "mock-model"
    }

    async fn send_message(
        &self,
        _messages: Vec<Message>,
        _system: Option<String>,
        _request_options: LlmRequestOptions,
    ) -> LlmResult<LlmResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.behavior {
            Behavior::Reply(text) => Ok(LlmResponse {
                content: Some(text.clone()),
                finish_reason: Some("stop".to_string()),
                usage: UsageStats::default(),
                model: "mock-model".to_string(),
            }),
            Behavior::Fail => Err(LlmError::NetworkError {
                message: "connection reset".to_string(),
            }),
            Behavior::Panic => panic!("mock provider exploded"),
        }
    }

    async fn health_check(&self) -> LlmResult<()> {
        Ok(())
    }

    fn config(&self) -> &ProviderConfig {
        &self.config
    }
}

/// Mock provider that answers each kind of prompt the way a chat model would:
/// structured JSON for analysis, a rewrite for clause explanations, and
/// `summary` for summaries. Rewrites of clauses containing `failing_clause`
/// fail.
pub struct RoutingProvider {
    analysis: String,
    summary: String,
    failing_clause: String,
    config: ProviderConfig,
    summary_calls: AtomicUsize,
    rewrite_calls: AtomicUsize,
}

impl RoutingProvider {
    pub fn new(analysis: &str, summary: &str, failing_clause: &str) -> Arc<Self> {
        Arc::new(Self {
            analysis: analysis.to_string(),
            summary: summary.to_string(),
            failing_clause: failing_clause.to_string(),
            config: ProviderConfig::default(),
            summary_calls: AtomicUsize::new(0),
            rewrite_calls: AtomicUsize::new(0),
        })
    }

    pub fn summary_calls(&self) -> usize {
        self.summary_calls.load(Ordering::SeqCst)
    }

    pub fn rewrite_calls(&self) -> usize {
        self.rewrite_calls.load(Ordering::SeqCst)
    }

    fn reply(text: String) -> LlmResult<LlmResponse> {
        Ok(LlmResponse {
            content: Some(text),
            finish_reason: Some("stop".to_string()),
            usage: UsageStats::default(),
            model: "mock-model".to_string(),
        })
    }
}

#[async_trait]
impl LlmProvider for RoutingProvider {
    fn name(&self) -> &'static str {
        "routing-mock"
    }

    fn model(&self) -> &str {
        "mock-model"
    }

    async fn send_message(
        &self,
        messages: Vec<Message>,
        system: Option<String>,
        _request_options: LlmRequestOptions,
    ) -> LlmResult<LlmResponse> {
        let system = system.unwrap_or_default();
        let prompt = messages
            .first()
            .map(|m| m.content.clone())
            .unwrap_or_default();

        if system.contains("expert legal analyst") {
            return Self::reply(self.analysis.clone());
        }
        if system.starts_with("You rewrite legal text") {
            self.rewrite_calls.fetch_add(1, Ordering::SeqCst);
            if prompt.contains(&self.failing_clause) {
                return Err(LlmError::ServerError {
                    message: "rewrite unavailable".to_string(),
                    status: Some(503),
                });
            }
            let clause = prompt.rsplit("Clause:\n").next().unwrap_or_default();
            return Self::reply(format!("In plain words: {}", clause));
        }
        if system.starts_with("Summarize the user's text") {
            self.summary_calls.fetch_add(1, Ordering::SeqCst);
            return Self::reply(self.summary.clone());
        }
        panic!("unexpected prompt: {}", system);
    }

    async fn health_check(&self) -> LlmResult<()> {
        Ok(())
    }

    fn config(&self) -> &ProviderConfig {
        &self.config
    }
}

/// Capabilities with only the language model backed by `provider`.
pub fn language_model_only(provider: Arc<dyn LlmProvider>) -> AiCapabilities {
    AiCapabilities {
        language_model: Capability::Available(provider),
        ..AiCapabilities::none()
    }
}

/// App state serving `pages` from a static collector.
pub fn app_with(
    capabilities: AiCapabilities,
    pages: &[(TabId, PageSnapshot)],
) -> (AppState, Arc<StaticPageCollector>) {
    let config = AppConfig::default();
    let collector = Arc::new(StaticPageCollector::new());
    for (tab_id, snapshot) in pages {
        collector.insert(*tab_id, snapshot.content(snapshot.structured(&config.structure)));
    }
    let state = AppState::with_capabilities(config, collector.clone(), capabilities)
        .expect("default config is valid");
    (state, collector)
}

/// Everything currently buffered on a receiver.
pub fn drain(rx: &mut broadcast::Receiver<ScanEvent>) -> Vec<ScanEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}
