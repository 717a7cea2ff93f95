//! Negative-sentiment escalation
//!
//! A heuristic threshold on the prompt's compound sentiment. It has no
//! clinical validation; false positives and false negatives are expected.

use voice_relay_config::EscalationConfig;
use voice_relay_core::{EscalationSignal, SentimentScore};

#[derive(Debug, Clone)]
pub struct EscalationPolicy {
    threshold: f64,
    emergency_contact: String,
    advisory: String,
}

impl EscalationPolicy {
    pub fn new(
        threshold: f64,
        emergency_contact: impl Into<String>,
        advisory: impl Into<String>,
    ) -> Self {
        Self {
            threshold,
            emergency_contact: emergency_contact.into(),
            advisory: advisory.into(),
        }
    }

    pub fn from_config(config: &EscalationConfig) -> Self {
        Self::new(
            config.threshold,
            config.emergency_contact.clone(),
            config.advisory.clone(),
        )
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Triggered when `compound` is strictly below the threshold
    pub fn evaluate(&self, score: &SentimentScore) -> EscalationSignal {
        if score.compound < self.threshold {
            EscalationSignal::triggered(self.emergency_contact.clone())
        } else {
            EscalationSignal::none()
        }
    }

    /// Append the advisory to `reply` when the signal fired
    pub fn apply(&self, reply: String, signal: &EscalationSignal) -> String {
        if !signal.triggered || self.advisory.is_empty() {
            return reply;
        }
        let reply = reply.trim_end();
        if reply.is_empty() {
            self.advisory.clone()
        } else {
            format!("{}\n\n{}", reply, self.advisory)
        }
    }
}

impl Default for EscalationPolicy {
    fn default() -> Self {
        Self::from_config(&EscalationConfig::default())
    }
}
