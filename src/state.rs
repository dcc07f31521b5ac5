//! Application State
//!
//! Owns the configured services: the page classifier, the analysis
//! orchestrator and the per-tab scan service.

use std::sync::Arc;

use policy_guardian_core::{ScanState, StateBackend, TabId};
use serde_json::Value;
use tracing::info;

use crate::commands::messages::handle_message;
use crate::models::response::CommandResponse;
use crate::models::settings::AppConfig;
use crate::services::analysis::AnalysisOrchestrator;
use crate::services::classifier::{KeywordTaxonomies, PageClassifier};
use crate::services::generative::{AiCapabilities, GenerativeAdapter};
use crate::services::page::PageContentCollector;
use crate::services::scan::{JsonFileBackend, MemoryBackend, ScanService, ScanStateStore};
use crate::utils::error::{AppError, AppResult};
use crate::utils::paths::ensure_dir;

/// Services built from one configuration
pub struct AppState {
    config: AppConfig,
    classifier: PageClassifier,
    orchestrator: Arc<AnalysisOrchestrator>,
    scan: ScanService,
}

impl AppState {
    /// Build every service from `config`, probing the configured provider.
    pub fn new(config: AppConfig, collector: Arc<dyn PageContentCollector>) -> AppResult<Self> {
        let capabilities = AiCapabilities::from_config(config.provider.as_ref());
        Self::with_capabilities(config, collector, capabilities)
    }

    /// Build with explicit generative capabilities.
    pub fn with_capabilities(
        config: AppConfig,
        collector: Arc<dyn PageContentCollector>,
        capabilities: AiCapabilities,
    ) -> AppResult<Self> {
        config.validate().map_err(AppError::validation)?;

        let backend: Arc<dyn StateBackend> = match &config.state_dir {
            Some(dir) => {
                ensure_dir(dir)?;
                Arc::new(JsonFileBackend::new(dir.clone()))
            }
            None => Arc::new(MemoryBackend::new()),
        };
        let store = Arc::new(ScanStateStore::new(backend));

        let orchestrator = Arc::new(AnalysisOrchestrator::new(
            GenerativeAdapter::new(capabilities),
            config.analysis.clone(),
        ));
        let classifier = PageClassifier::new(
            KeywordTaxonomies::default(),
            config.classifier.clone(),
            config.structure.clone(),
        );
        let scan = ScanService::new(
            store,
            orchestrator.clone(),
            collector,
            config.classifier.material_change_delta,
        );

        info!(
            backend = scan.store().backend_name(),
            generative = orchestrator.adapter().capabilities().any_available(),
            "Policy Guardian initialized"
        );

        Ok(Self {
            config,
            classifier,
            orchestrator,
            scan,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn classifier(&self) -> &PageClassifier {
        &self.classifier
    }

    pub fn orchestrator(&self) -> &AnalysisOrchestrator {
        &self.orchestrator
    }

    pub fn scan_service(&self) -> &ScanService {
        &self.scan
    }

    /// Route an inbound message to the scan service.
    pub async fn handle_message(
        &self,
        message: Value,
        sender_tab: Option<TabId>,
    ) -> CommandResponse<ScanState> {
        handle_message(&self.scan, message, sender_tab).await
    }
}
