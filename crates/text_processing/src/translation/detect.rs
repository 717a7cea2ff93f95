//! Script-based language detection
//!
//! Counts letters per Unicode script and decides between the configured
//! local and pivot languages. When in doubt the prompt is treated as local,
//! because skipping a needed translation corrupts inference while an extra
//! translation of pivot text is only a wasted call.

use voice_relay_config::{DetectionMode, LanguageConfig};
use voice_relay_core::{ChatRequest, Language, Script};

/// Outcome of detection for one prompt
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Detection {
    pub language: Language,
    /// Share of letters written in the chosen language's script
    pub confidence: f32,
    /// No script clearly dominated; `language` is the local default
    pub ambiguous: bool,
}

#[derive(Debug, Clone)]
pub struct ScriptDetector {
    local: Language,
    pivot: Language,
    min_pivot_ratio: f32,
    mode: DetectionMode,
}

impl ScriptDetector {
    pub fn new(local: Language, pivot: Language) -> Self {
        Self {
            local,
            pivot,
            min_pivot_ratio: 0.8,
            mode: DetectionMode::Script,
        }
    }

    pub fn from_settings(config: &LanguageConfig) -> Self {
        Self {
            local: config.local,
            pivot: config.pivot,
            min_pivot_ratio: config.min_pivot_ratio,
            mode: config.detection,
        }
    }

    pub fn with_min_pivot_ratio(mut self, ratio: f32) -> Self {
        self.min_pivot_ratio = ratio.clamp(0.0, 1.0);
        self
    }

    pub fn with_mode(mut self, mode: DetectionMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn local(&self) -> Language {
        self.local
    }

    pub fn pivot(&self) -> Language {
        self.pivot
    }

    pub fn detect(&self, text: &str) -> Detection {
        if self.mode == DetectionMode::AssumeLocal {
            return Detection {
                language: self.local,
                confidence: 1.0,
                ambiguous: false,
            };
        }

        let pivot_script = self.pivot.script();
        let local_script = self.local.script();

        let (mut pivot_letters, mut local_letters, mut total) = (0usize, 0usize, 0usize);
        for script in text.chars().filter_map(Script::of_char) {
            total += 1;
            if script == pivot_script {
                pivot_letters += 1;
            } else if script == local_script {
                local_letters += 1;
            }
        }

        if total == 0 {
            return Detection {
                language: self.local,
                confidence: 0.0,
                ambiguous: true,
            };
        }

        let pivot_ratio = pivot_letters as f32 / total as f32;
        let local_ratio = local_letters as f32 / total as f32;

        if pivot_ratio >= self.min_pivot_ratio {
            Detection {
                language: self.pivot,
                confidence: pivot_ratio,
                ambiguous: false,
            }
        } else {
            Detection {
                language: self.local,
                confidence: local_ratio,
                ambiguous: local_ratio <= 0.5,
            }
        }
    }

    /// Source language for a request: the declared one, else detection
    pub fn resolve(&self, request: &ChatRequest) -> Language {
        if let Some(declared) = request.language {
            return declared;
        }

        let detection = self.detect(&request.prompt);
        if detection.ambiguous {
            tracing::debug!(
                confidence = detection.confidence,
                fallback = %detection.language,
                "Ambiguous script mix, assuming local language"
            );
        }
        detection.language
    }
}
