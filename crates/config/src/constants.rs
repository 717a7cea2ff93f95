//! Default values used across the relay
//!
//! Kept in one place so that settings defaults, provider constructors and
//! tests agree on the same numbers.

/// Service endpoints
pub mod endpoints {
    /// Groq's OpenAI-compatible API root
    pub const GROQ_DEFAULT: &str = "https://api.groq.com/openai/v1";

    /// Local OpenAI-compatible server (Ollama, vLLM)
    pub const LOCAL_OPENAI: &str = "http://localhost:11434/v1";

    /// Public LibreTranslate instance
    pub const LIBRE_TRANSLATE_DEFAULT: &str = "https://libretranslate.com";

    /// Google web translation endpoint root
    pub const GOOGLE_TRANSLATE_DEFAULT: &str = "https://translate.googleapis.com";

    /// Google translate_tts endpoint root
    pub const GOOGLE_TTS_DEFAULT: &str = "https://translate.google.com";
}

/// Inference defaults
pub mod inference {
    pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";
    pub const DEFAULT_MAX_TOKENS: u32 = 1024;
    pub const DEFAULT_TEMPERATURE: f32 = 0.7;
    pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;
    pub const DEFAULT_MAX_RETRIES: u32 = 2;

    /// Persona plus output-language directive. `{language}` is replaced by
    /// the pivot language name.
    pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a polite and helpful assistant. \
        You MUST respond ONLY in {language}. Do not use any other language.";
}

/// Timeouts for the best-effort stages
pub mod timeouts {
    pub const TRANSLATION_MS: u64 = 8_000;
    pub const SPEECH_MS: u64 = 15_000;
    pub const SENTIMENT_MS: u64 = 1_000;
}

/// Escalation defaults
pub mod escalation {
    /// Compound score below which the reply is escalated
    pub const DEFAULT_THRESHOLD: f64 = -0.5;

    /// Placeholder contact; real deployments override it
    pub const DEFAULT_EMERGENCY_CONTACT: &str = "EMERGENCY_CONTACT_NOT_CONFIGURED";

    /// Bengali first, English second
    pub const DEFAULT_ADVISORY: &str = "আপনি যদি কষ্টে থাকেন, অনুগ্রহ করে এখনই কোনো বিশ্বস্ত মানুষ বা জরুরি সহায়তা নম্বরে যোগাযোগ করুন। \
        If you are in distress, please reach out to someone you trust or call the emergency helpline now.";
}

/// Server defaults
pub mod server {
    pub const DEFAULT_HOST: &str = "0.0.0.0";
    pub const DEFAULT_PORT: u16 = 5000;
}

/// History defaults
pub mod history {
    pub const DEFAULT_MAX_RECORDS_PER_USER: usize = 500;
}
