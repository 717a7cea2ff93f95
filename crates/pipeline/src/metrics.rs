//! Pipeline metrics
//!
//! Thin wrappers over the `metrics` facade. Without an installed recorder
//! these are no-ops, so tests need no setup.

use std::time::Duration;

pub fn record_request(outcome: &'static str) {
    metrics::counter!("relay_requests_total", "outcome" => outcome).increment(1);
}

pub fn record_stage_latency(stage: &'static str, elapsed: Duration) {
    metrics::histogram!("relay_stage_latency_ms", "stage" => stage)
        .record(elapsed.as_secs_f64() * 1000.0);
}

pub fn record_degraded(stage: &'static str) {
    metrics::counter!("relay_degraded_total", "stage" => stage).increment(1);
}

pub fn record_escalation() {
    metrics::counter!("relay_escalations_total").increment(1);
}
