//! End-to-end tests of the chat pipeline with hand-written capabilities

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use voice_relay_config::ReplyLanguage;
use voice_relay_core::{
    AudioArtifact, ChatRequest, Error, InferenceClient, Language, Result, SentimentScore,
    SentimentScorer, SpeechSynthesizer, Translator, UserId,
};
use voice_relay_persistence::{HistoryStore, InMemoryHistoryStore};
use voice_relay_pipeline::{
    ConversationOrchestrator, EscalationPolicy, OrchestratorBuilder, OrchestratorConfig,
    PipelineError,
};

const ADVISORY: &str = "Please reach out to someone you trust.";
const CONTACT: &str = "+880-999";

#[derive(Default)]
struct DictTranslator {
    calls: AtomicUsize,
    entries: HashMap<(String, Language), String>,
    fail: bool,
}

impl DictTranslator {
    fn with(mut self, text: &str, to: Language, translated: &str) -> Self {
        self.entries.insert((text.to_string(), to), translated.to_string());
        self
    }

    fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Translator for DictTranslator {
    async fn translate(&self, text: &str, _from: Language, to: Language) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(Error::Translation("provider exploded".to_string()));
        }
        Ok(self
            .entries
            .get(&(text.to_string(), to))
            .cloned()
            .unwrap_or_else(|| format!("[{}] {}", to, text)))
    }

    fn name(&self) -> &str {
        "dict"
    }
}

struct FixedSentiment {
    calls: AtomicUsize,
    compound: f64,
    seen: Mutex<Vec<String>>,
    delay: Option<Duration>,
    fail: bool,
}

impl FixedSentiment {
    fn new(compound: f64) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            compound,
            seen: Mutex::new(Vec::new()),
            delay: None,
            fail: false,
        }
    }
}

#[async_trait]
impl SentimentScorer for FixedSentiment {
    async fn score(&self, text: &str) -> Result<SentimentScore> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(text.to_string());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail {
            return Err(Error::Sentiment("model missing".to_string()));
        }
        Ok(SentimentScore::new(self.compound, 0.2, 0.2, 0.6))
    }

    fn name(&self) -> &str {
        "fixed"
    }
}

struct MockInference {
    calls: AtomicUsize,
    reply: String,
    fail: bool,
    prompts: Mutex<Vec<(String, String)>>,
}

impl MockInference {
    fn replying(reply: &str) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            reply: reply.to_string(),
            fail: false,
            prompts: Mutex::new(Vec::new()),
        }
    }

    fn failing() -> Self {
        Self {
            fail: true,
            ..Self::replying("")
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl InferenceClient for MockInference {
    async fn complete(&self, system_prompt: &str, user_text: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts
            .lock()
            .unwrap()
            .push((system_prompt.to_string(), user_text.to_string()));
        if self.fail {
            return Err(Error::Inference("upstream said: invalid api key sk-12345".to_string()));
        }
        Ok(self.reply.clone())
    }

    fn model_name(&self) -> &str {
        "mock-model"
    }
}

struct MockSynth {
    calls: AtomicUsize,
    texts: Mutex<Vec<(String, Language)>>,
    fail: bool,
    delay: Option<Duration>,
}

impl MockSynth {
    fn working() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            texts: Mutex::new(Vec::new()),
            fail: false,
            delay: None,
        }
    }

    fn failing() -> Self {
        Self {
            fail: true,
            ..Self::working()
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SpeechSynthesizer for MockSynth {
    async fn synthesize(&self, text: &str, voice: Language) -> Result<AudioArtifact> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.texts.lock().unwrap().push((text.to_string(), voice));
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail {
            return Err(Error::Synthesis("speech backend down".to_string()));
        }
        Ok(AudioArtifact::mp3(vec![1, 2, 3]))
    }

    fn name(&self) -> &str {
        "mock-synth"
    }
}

struct Harness {
    translator: Arc<DictTranslator>,
    sentiment: Arc<FixedSentiment>,
    inference: Arc<MockInference>,
    synth: Arc<MockSynth>,
}

impl Harness {
    fn new(compound: f64, reply: &str) -> Self {
        Self {
            translator: Arc::new(DictTranslator::default()),
            sentiment: Arc::new(FixedSentiment::new(compound)),
            inference: Arc::new(MockInference::replying(reply)),
            synth: Arc::new(MockSynth::working()),
        }
    }

    fn builder(&self, config: OrchestratorConfig) -> OrchestratorBuilder {
        OrchestratorBuilder::new(config)
            .translator(self.translator.clone())
            .sentiment(self.sentiment.clone())
            .inference(self.inference.clone())
            .synthesizer(self.synth.clone())
            .escalation(EscalationPolicy::new(-0.5, CONTACT, ADVISORY))
    }

    fn orchestrator(&self) -> ConversationOrchestrator {
        self.builder(test_config()).build().unwrap()
    }
}

fn test_config() -> OrchestratorConfig {
    OrchestratorConfig {
        translation_timeout: Duration::from_millis(500),
        sentiment_timeout: Duration::from_millis(200),
        inference_timeout: Duration::from_secs(2),
        speech_timeout: Duration::from_millis(200),
        ..OrchestratorConfig::default()
    }
}

#[tokio::test]
async fn test_empty_prompt_makes_no_calls() {
    let harness = Harness::new(0.0, "unused");
    let orchestrator = harness.orchestrator();

    for prompt in ["", "   ", "\n\t "] {
        let envelope = orchestrator
            .handle(ChatRequest::new(prompt), None)
            .await
            .unwrap();
        assert_eq!(envelope.response, "");
        assert_eq!(envelope.audio, None);
        assert_eq!(envelope.call, None);
    }

    assert_eq!(harness.translator.calls(), 0);
    assert_eq!(harness.sentiment.calls.load(Ordering::SeqCst), 0);
    assert_eq!(harness.inference.calls(), 0);
    assert_eq!(harness.synth.calls(), 0);
}

#[tokio::test]
async fn test_negative_sentiment_escalates() {
    let harness = Harness::new(-0.6, "I'm sorry you feel that way.");
    let envelope = harness
        .orchestrator()
        .handle(ChatRequest::new("I feel terrible"), None)
        .await
        .unwrap();

    assert_eq!(envelope.call.as_deref(), Some(CONTACT));
    assert!(envelope.response.starts_with("I'm sorry you feel that way."));
    assert!(envelope.response.ends_with(ADVISORY));
}

#[tokio::test]
async fn test_mild_sentiment_does_not_escalate() {
    let harness = Harness::new(-0.4, "That sounds tough.");
    let envelope = harness
        .orchestrator()
        .handle(ChatRequest::new("work was tiring"), None)
        .await
        .unwrap();

    assert_eq!(envelope.call, None);
    assert_eq!(envelope.response, "That sounds tough.");
    assert!(!envelope.response.contains(ADVISORY));
}

#[tokio::test]
async fn test_synthesis_failure_still_answers() {
    let harness = Harness {
        synth: Arc::new(MockSynth::failing()),
        ..Harness::new(0.3, "Here you go.")
    };
    let envelope = harness
        .orchestrator()
        .handle(ChatRequest::new("tell me something"), None)
        .await
        .unwrap();

    assert_eq!(envelope.response, "Here you go.");
    assert_eq!(envelope.audio, None);
    assert_eq!(harness.synth.calls(), 1);
}

#[tokio::test]
async fn test_synthesis_timeout_drops_audio() {
    let harness = Harness {
        synth: Arc::new(MockSynth {
            delay: Some(Duration::from_secs(5)),
            ..MockSynth::working()
        }),
        ..Harness::new(0.3, "Slow speech.")
    };
    let envelope = harness
        .orchestrator()
        .handle(ChatRequest::new("hello"), None)
        .await
        .unwrap();

    assert_eq!(envelope.response, "Slow speech.");
    assert_eq!(envelope.audio, None);
}

#[tokio::test]
async fn test_translation_failure_returns_untranslated_reply() {
    let harness = Harness {
        translator: Arc::new(DictTranslator::failing()),
        ..Harness::new(0.1, "Raw model answer")
    };
    let envelope = harness
        .orchestrator()
        .handle(ChatRequest::new("আমার একটা প্রশ্ন আছে"), None)
        .await
        .unwrap();

    assert_eq!(envelope.response, "Raw model answer");
    assert_eq!(harness.translator.calls(), 2);
    let prompts = harness.inference.prompts.lock().unwrap();
    assert_eq!(prompts[0].1, "আমার একটা প্রশ্ন আছে");
}

#[tokio::test]
async fn test_inference_failure_is_fatal() {
    let harness = Harness {
        inference: Arc::new(MockInference::failing()),
        ..Harness::new(0.0, "")
    };
    let result = harness
        .orchestrator()
        .handle(ChatRequest::new("hello"), None)
        .await;

    match result {
        Err(PipelineError::InferenceFailure(_)) => {}
        other => panic!("expected inference failure, got {:?}", other),
    }
    assert_eq!(harness.synth.calls(), 0);
}

#[tokio::test]
async fn test_bengali_round_trip() {
    let translator = DictTranslator::default()
        .with("আমি খুব খুশি", Language::English, "I am very happy")
        .with("That is wonderful to hear!", Language::Bengali, "শুনে খুব ভালো লাগলো!");
    let harness = Harness {
        translator: Arc::new(translator),
        ..Harness::new(0.61, "That is wonderful to hear!")
    };
    let envelope = harness
        .orchestrator()
        .handle(ChatRequest::new("আমি খুব খুশি"), None)
        .await
        .unwrap();

    assert_eq!(harness.inference.calls(), 1);
    {
        let prompts = harness.inference.prompts.lock().unwrap();
        assert_eq!(prompts[0].1, "I am very happy");
        assert!(prompts[0].0.contains("English"));
    }
    assert_eq!(
        harness.sentiment.seen.lock().unwrap().as_slice(),
        ["I am very happy".to_string()]
    );

    assert_eq!(envelope.response, "শুনে খুব ভালো লাগলো!");
    assert_eq!(envelope.call, None);
    assert_eq!(envelope.audio.as_deref(), Some("AQID"));

    let texts = harness.synth.texts.lock().unwrap();
    assert_eq!(texts[0].1, Language::Bengali);
}

#[tokio::test]
async fn test_synthesis_receives_sanitized_text() {
    let harness = Harness::new(0.2, "**Step 1**: open (the) app");
    let envelope = harness
        .orchestrator()
        .handle(ChatRequest::new("how do I start"), None)
        .await
        .unwrap();

    assert_eq!(envelope.response, "**Step 1**: open (the) app");
    let texts = harness.synth.texts.lock().unwrap();
    assert_eq!(texts[0].0, "Step 1: open the app");
    assert_eq!(texts[0].1, Language::English);
}

#[tokio::test]
async fn test_english_prompt_skips_translation() {
    let harness = Harness::new(0.2, "Sure.");
    harness
        .orchestrator()
        .handle(ChatRequest::new("Can you help me?"), None)
        .await
        .unwrap();

    assert_eq!(harness.translator.calls(), 0);
}

#[tokio::test]
async fn test_local_reply_mode_translates_english_prompts_back() {
    let harness = Harness::new(0.2, "Sure.");
    let config = OrchestratorConfig {
        reply: ReplyLanguage::Local,
        ..test_config()
    };
    let envelope = harness
        .builder(config)
        .build()
        .unwrap()
        .handle(ChatRequest::new("Can you help me?"), None)
        .await
        .unwrap();

    assert_eq!(envelope.response, "[bn] Sure.");
    assert_eq!(harness.translator.calls(), 1);
}

#[tokio::test]
async fn test_declared_language_overrides_detection() {
    let harness = Harness::new(0.2, "Okay.");
    harness
        .orchestrator()
        .handle(
            ChatRequest::new("ami bhalo achi").with_language(Language::Bengali),
            None,
        )
        .await
        .unwrap();

    assert_eq!(harness.translator.calls(), 2);
    let prompts = harness.inference.prompts.lock().unwrap();
    assert_eq!(prompts[0].1, "[en] ami bhalo achi");
}

#[tokio::test]
async fn test_sentiment_failure_degrades_to_neutral() {
    let harness = Harness {
        sentiment: Arc::new(FixedSentiment {
            fail: true,
            ..FixedSentiment::new(-0.9)
        }),
        ..Harness::new(0.0, "Fine.")
    };
    let config = OrchestratorConfig {
        include_sentiment: true,
        ..test_config()
    };
    let envelope = harness
        .builder(config)
        .build()
        .unwrap()
        .handle(ChatRequest::new("whatever"), None)
        .await
        .unwrap();

    assert_eq!(envelope.call, None);
    assert_eq!(envelope.sentiment, Some(SentimentScore::neutral()));
}

#[tokio::test]
async fn test_sentiment_timeout_degrades_to_neutral() {
    let harness = Harness {
        sentiment: Arc::new(FixedSentiment {
            delay: Some(Duration::from_secs(5)),
            ..FixedSentiment::new(-0.9)
        }),
        ..Harness::new(0.0, "Fine.")
    };
    let envelope = harness
        .orchestrator()
        .handle(ChatRequest::new("whatever"), None)
        .await
        .unwrap();

    assert_eq!(envelope.call, None);
    assert_eq!(envelope.response, "Fine.");
}

#[tokio::test]
async fn test_sentiment_included_only_when_enabled() {
    let harness = Harness::new(0.5, "Great.");
    let plain = harness
        .orchestrator()
        .handle(ChatRequest::new("nice"), None)
        .await
        .unwrap();
    assert_eq!(plain.sentiment, None);

    let config = OrchestratorConfig {
        include_sentiment: true,
        ..test_config()
    };
    let detailed = harness
        .builder(config)
        .build()
        .unwrap()
        .handle(ChatRequest::new("nice"), None)
        .await
        .unwrap();
    assert_eq!(detailed.sentiment.map(|s| s.compound), Some(0.5));
}

async fn wait_for_history(store: &InMemoryHistoryStore, user: &UserId) -> usize {
    for _ in 0..50 {
        let count = store.list(user, 100).await.unwrap().len();
        if count > 0 {
            return count;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    0
}

#[tokio::test]
async fn test_authenticated_turn_is_recorded() {
    let store = Arc::new(InMemoryHistoryStore::new(10));
    let harness = Harness::new(0.2, "Recorded reply.");
    let orchestrator = harness.builder(test_config()).history(store.clone()).build().unwrap();
    let user = UserId::new("user-1");

    orchestrator
        .handle(ChatRequest::new("  remember this  "), Some(&user))
        .await
        .unwrap();

    assert_eq!(wait_for_history(&store, &user).await, 1);
    let records = store.list(&user, 10).await.unwrap();
    assert_eq!(records[0].prompt, "remember this");
    assert_eq!(records[0].response, "Recorded reply.");
}

#[tokio::test]
async fn test_anonymous_turn_is_not_recorded() {
    let store = Arc::new(InMemoryHistoryStore::new(10));
    let harness = Harness::new(0.2, "Reply.");
    let orchestrator = harness.builder(test_config()).history(store.clone()).build().unwrap();

    orchestrator
        .handle(ChatRequest::new("hello"), None)
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert_eq!(store.user_count(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_turns() {
    let harness = Harness::new(0.2, "ok");
    let orchestrator = Arc::new(harness.orchestrator());

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let orchestrator = orchestrator.clone();
            tokio::spawn(async move {
                orchestrator
                    .handle(ChatRequest::new(format!("question {}", i)), None)
                    .await
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.await.unwrap().unwrap().response, "ok");
    }
    assert_eq!(harness.inference.calls(), 16);
}
