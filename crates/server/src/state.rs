//! Application State
//!
//! Shared state across all handlers.

use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;

use voice_relay_config::Settings;
use voice_relay_core::{InferenceClient, SpeechSynthesizer, Translator};
use voice_relay_llm::{InferenceAdapter, OpenAIBackend, OpenAIConfig};
use voice_relay_persistence::PersistenceLayer;
use voice_relay_pipeline::{create_synthesizer, ConversationOrchestrator, OrchestratorBuilder};
use voice_relay_text_processing::{create_translator, VaderSentimentAnalyzer};

use crate::ServerError;

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub orchestrator: Arc<ConversationOrchestrator>,
    /// Present only when accounts and history are enabled
    pub persistence: Option<PersistenceLayer>,
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(settings: Settings, orchestrator: ConversationOrchestrator) -> Self {
        Self {
            settings: Arc::new(settings),
            orchestrator: Arc::new(orchestrator),
            persistence: None,
            metrics: None,
        }
    }

    pub fn with_persistence(mut self, persistence: PersistenceLayer) -> Self {
        self.persistence = Some(persistence);
        self
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    /// Build every backend named in `settings` and wire the orchestrator
    pub fn from_settings(settings: Settings) -> Result<Self, ServerError> {
        let backend = OpenAIBackend::new(OpenAIConfig::from_settings(&settings.inference))?;
        let inference: Arc<dyn InferenceClient> = Arc::new(InferenceAdapter::new(backend));
        let translator: Arc<dyn Translator> = create_translator(&settings.translation)?;
        let synthesizer: Arc<dyn SpeechSynthesizer> = create_synthesizer(&settings.speech)?;

        let persistence = settings
            .history
            .enabled
            .then(|| PersistenceLayer::in_memory(settings.history.max_records_per_user));

        let mut builder = OrchestratorBuilder::from_settings(&settings)
            .inference(inference)
            .translator(translator)
            .sentiment(Arc::new(VaderSentimentAnalyzer::new()))
            .synthesizer(synthesizer);
        if let Some(layer) = &persistence {
            builder = builder.history(layer.history.clone());
        }
        let orchestrator = builder.build()?;

        tracing::info!(
            model = orchestrator.model_name(),
            api_key = %settings.inference.masked_api_key(),
            translation = ?settings.translation.provider,
            speech = ?settings.speech.provider,
            history = persistence.is_some(),
            "Initialized application state"
        );

        let state = Self::new(settings, orchestrator);
        Ok(match persistence {
            Some(layer) => state.with_persistence(layer),
            None => state,
        })
    }

    pub fn history_enabled(&self) -> bool {
        self.persistence.is_some()
    }
}
