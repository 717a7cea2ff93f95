//! Conversation Orchestrator
//!
//! Runs one chat turn end to end:
//!
//! 1. trim the prompt, returning an empty envelope when nothing is left
//! 2. resolve the caller's language (declared or detected)
//! 3. translate the prompt into the pivot language
//! 4. score sentiment on the pivot text
//! 5. call the inference client
//! 6. translate the reply back
//! 7. apply the escalation policy
//! 8. sanitize a copy of the reply and synthesize speech
//! 9. assemble the envelope and hand the record to the history store
//!
//! Only inference can fail a turn. Translation falls back to the
//! untranslated text, sentiment falls back to a neutral score and
//! synthesis falls back to `audio: null`.

use std::sync::Arc;
use std::time::{Duration, Instant};

use voice_relay_config::{ReplyLanguage, Settings};
use voice_relay_core::{
    AudioArtifact, ChatRecord, ChatRequest, InferenceClient, Language, ResponseEnvelope,
    SentimentScore, SentimentScorer, SpeechSynthesizer, Translator, UserId,
};
use voice_relay_persistence::HistoryStore;
use voice_relay_text_processing::{
    sanitize_for_speech, VaderSentimentAnalyzer, NoopTranslator, ScriptDetector,
    TranslationGateway,
};

use crate::escalation::EscalationPolicy;
use crate::metrics;
use crate::tts::DisabledSynthesizer;
use crate::PipelineError;

/// Per-turn behaviour of the orchestrator
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// System instruction sent with every inference call
    pub system_prompt: String,
    /// The caller's default language
    pub local: Language,
    /// Language inference runs in
    pub pivot: Language,
    pub reply: ReplyLanguage,
    pub translation_timeout: Duration,
    pub sentiment_timeout: Duration,
    /// Bound on the whole inference call, retries included
    pub inference_timeout: Duration,
    pub speech_timeout: Duration,
    /// Attach the sentiment score to the envelope
    pub include_sentiment: bool,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

impl OrchestratorConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        let inference = &settings.inference;
        let attempts = u64::from(inference.max_retries) + 1;
        // Twice the per-attempt timeout leaves room for retry backoff.
        let inference_budget_ms = inference.timeout_ms.saturating_mul(attempts * 2);

        Self {
            system_prompt: settings.system_prompt(),
            local: settings.language.local,
            pivot: settings.language.pivot,
            reply: settings.language.reply,
            translation_timeout: Duration::from_millis(settings.translation.timeout_ms),
            sentiment_timeout: Duration::from_millis(settings.language.sentiment_timeout_ms),
            inference_timeout: Duration::from_millis(inference_budget_ms),
            speech_timeout: Duration::from_millis(settings.speech.timeout_ms),
            include_sentiment: settings.escalation.include_sentiment,
        }
    }
}

/// Builder for [`ConversationOrchestrator`]
///
/// Only the inference client is mandatory. Translation defaults to a no-op,
/// sentiment to the VADER analyzer and speech to the disabled synthesizer.
pub struct OrchestratorBuilder {
    config: OrchestratorConfig,
    detector: Option<ScriptDetector>,
    translator: Option<Arc<dyn Translator>>,
    sentiment: Option<Arc<dyn SentimentScorer>>,
    inference: Option<Arc<dyn InferenceClient>>,
    synthesizer: Option<Arc<dyn SpeechSynthesizer>>,
    escalation: Option<EscalationPolicy>,
    history: Option<Arc<dyn HistoryStore>>,
}

impl OrchestratorBuilder {
    pub fn new(config: OrchestratorConfig) -> Self {
        Self {
            config,
            detector: None,
            translator: None,
            sentiment: None,
            inference: None,
            synthesizer: None,
            escalation: None,
            history: None,
        }
    }

    /// Config, detector and escalation policy taken from settings
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(OrchestratorConfig::from_settings(settings))
            .detector(ScriptDetector::from_settings(&settings.language))
            .escalation(EscalationPolicy::from_config(&settings.escalation))
    }

    pub fn detector(mut self, detector: ScriptDetector) -> Self {
        self.detector = Some(detector);
        self
    }

    pub fn translator(mut self, translator: Arc<dyn Translator>) -> Self {
        self.translator = Some(translator);
        self
    }

    pub fn sentiment(mut self, scorer: Arc<dyn SentimentScorer>) -> Self {
        self.sentiment = Some(scorer);
        self
    }

    pub fn inference(mut self, client: Arc<dyn InferenceClient>) -> Self {
        self.inference = Some(client);
        self
    }

    pub fn synthesizer(mut self, synthesizer: Arc<dyn SpeechSynthesizer>) -> Self {
        self.synthesizer = Some(synthesizer);
        self
    }

    pub fn escalation(mut self, policy: EscalationPolicy) -> Self {
        self.escalation = Some(policy);
        self
    }

    pub fn history(mut self, store: Arc<dyn HistoryStore>) -> Self {
        self.history = Some(store);
        self
    }

    pub fn build(self) -> Result<ConversationOrchestrator, PipelineError> {
        let inference = self
            .inference
            .ok_or_else(|| PipelineError::Configuration("no inference client configured".to_string()))?;

        if self.config.local == self.config.pivot {
            return Err(PipelineError::Configuration(format!(
                "local and pivot language are both {}",
                self.config.local
            )));
        }

        let detector = self
            .detector
            .unwrap_or_else(|| ScriptDetector::new(self.config.local, self.config.pivot));
        let translator = self.translator.unwrap_or_else(|| Arc::new(NoopTranslator));
        let gateway = TranslationGateway::new(translator, self.config.translation_timeout);

        Ok(ConversationOrchestrator {
            detector,
            gateway,
            sentiment: self
                .sentiment
                .unwrap_or_else(|| Arc::new(VaderSentimentAnalyzer::new())),
            inference,
            synthesizer: self.synthesizer.unwrap_or_else(|| Arc::new(DisabledSynthesizer)),
            escalation: self.escalation.unwrap_or_default(),
            history: self.history,
            config: self.config,
        })
    }
}

/// The chat pipeline with all of its capabilities injected
pub struct ConversationOrchestrator {
    config: OrchestratorConfig,
    detector: ScriptDetector,
    gateway: TranslationGateway,
    sentiment: Arc<dyn SentimentScorer>,
    inference: Arc<dyn InferenceClient>,
    synthesizer: Arc<dyn SpeechSynthesizer>,
    escalation: EscalationPolicy,
    history: Option<Arc<dyn HistoryStore>>,
}

impl ConversationOrchestrator {
    pub fn builder(config: OrchestratorConfig) -> OrchestratorBuilder {
        OrchestratorBuilder::new(config)
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    pub fn model_name(&self) -> &str {
        self.inference.model_name()
    }

    pub fn has_history(&self) -> bool {
        self.history.is_some()
    }

    /// Handle one chat turn
    ///
    /// `user` is the authenticated caller, if any; only then is the turn
    /// written to the history store.
    pub async fn handle(
        &self,
        request: ChatRequest,
        user: Option<&UserId>,
    ) -> Result<ResponseEnvelope, PipelineError> {
        let started = Instant::now();

        let Some(prompt) = request.trimmed_prompt() else {
            tracing::debug!("Empty prompt, skipping pipeline");
            metrics::record_request("empty");
            return Ok(ResponseEnvelope::empty());
        };

        let source = self.detector.resolve(&request);
        let target = match self.config.reply {
            ReplyLanguage::Detected => source,
            ReplyLanguage::Local => self.config.local,
        };
        let pivot = self.config.pivot;

        let stage = Instant::now();
        let inbound = self.gateway.translate_detailed(prompt, source, pivot).await;
        metrics::record_stage_latency("translate_in", stage.elapsed());
        if inbound.degraded {
            metrics::record_degraded("translation");
        }

        let sentiment = self.score_sentiment(&inbound.text).await;

        let stage = Instant::now();
        let reply = match self.complete(&inbound.text).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::error!(
                    model = self.inference.model_name(),
                    error = %e,
                    "Inference failed"
                );
                metrics::record_request("inference_failure");
                return Err(e);
            }
        };
        metrics::record_stage_latency("inference", stage.elapsed());

        let stage = Instant::now();
        let outbound = self.gateway.translate_detailed(&reply, pivot, target).await;
        metrics::record_stage_latency("translate_out", stage.elapsed());
        if outbound.degraded {
            metrics::record_degraded("translation");
        }

        let signal = self.escalation.evaluate(&sentiment);
        if signal.triggered {
            tracing::warn!(
                compound = sentiment.compound,
                threshold = self.escalation.threshold(),
                "Negative sentiment, escalating"
            );
            metrics::record_escalation();
        }
        let response = self.escalation.apply(outbound.text, &signal);

        let audio = self
            .synthesize(&sanitize_for_speech(&response), target)
            .await
            .map(|artifact| artifact.to_base64());

        let envelope = ResponseEnvelope {
            response,
            audio,
            call: signal.code,
            sentiment: self.config.include_sentiment.then_some(sentiment),
        };

        if let Some(user) = user {
            self.record_history(user, prompt, &envelope.response);
        }

        tracing::info!(
            source = %source,
            target = %target,
            escalated = signal.triggered,
            has_audio = envelope.audio.is_some(),
            latency_ms = started.elapsed().as_millis() as u64,
            "Chat turn complete"
        );
        metrics::record_stage_latency("total", started.elapsed());
        metrics::record_request("ok");

        Ok(envelope)
    }

    async fn complete(&self, user_text: &str) -> Result<String, PipelineError> {
        let call = self.inference.complete(&self.config.system_prompt, user_text);
        match tokio::time::timeout(self.config.inference_timeout, call).await {
            Ok(Ok(reply)) => Ok(reply),
            Ok(Err(e)) => Err(PipelineError::InferenceFailure(e.to_string())),
            Err(_) => Err(PipelineError::InferenceFailure(format!(
                "timed out after {}ms",
                self.config.inference_timeout.as_millis()
            ))),
        }
    }

    /// Score the pivot text, neutral on failure or timeout
    async fn score_sentiment(&self, text: &str) -> SentimentScore {
        let stage = Instant::now();
        let result = tokio::time::timeout(self.config.sentiment_timeout, self.sentiment.score(text)).await;
        metrics::record_stage_latency("sentiment", stage.elapsed());

        match result {
            Ok(Ok(score)) => score,
            Ok(Err(e)) => {
                tracing::warn!(scorer = self.sentiment.name(), error = %e, "Sentiment scoring failed, assuming neutral");
                metrics::record_degraded("sentiment");
                SentimentScore::neutral()
            }
            Err(_) => {
                tracing::warn!(scorer = self.sentiment.name(), "Sentiment scoring timed out, assuming neutral");
                metrics::record_degraded("sentiment");
                SentimentScore::neutral()
            }
        }
    }

    /// Best-effort synthesis; `None` on failure, timeout or empty output
    async fn synthesize(&self, text: &str, voice: Language) -> Option<AudioArtifact> {
        if text.is_empty() {
            return None;
        }

        let stage = Instant::now();
        let result = tokio::time::timeout(
            self.config.speech_timeout,
            self.synthesizer.synthesize(text, voice),
        )
        .await;
        metrics::record_stage_latency("synthesis", stage.elapsed());

        let error = match result {
            Ok(Ok(artifact)) if !artifact.is_empty() => return Some(artifact),
            Ok(Ok(_)) => "synthesizer returned no audio".to_string(),
            Ok(Err(e)) => e.to_string(),
            Err(_) => format!("timed out after {}ms", self.config.speech_timeout.as_millis()),
        };

        tracing::warn!(
            synthesizer = self.synthesizer.name(),
            voice = %voice,
            error = %error,
            "Speech synthesis degraded, returning no audio"
        );
        metrics::record_degraded("synthesis");
        None
    }

    fn record_history(&self, user: &UserId, prompt: &str, response: &str) {
        let Some(store) = self.history.clone() else {
            return;
        };
        let record = ChatRecord::new(user.clone(), prompt, response);
        let user = user.clone();
        tokio::spawn(async move {
            if let Err(e) = store.append(record).await {
                tracing::warn!(user_id = %user, error = %e, "Failed to write chat history");
            }
        });
    }
}
