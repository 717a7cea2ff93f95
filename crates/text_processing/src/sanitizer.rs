//! Speech sanitizer
//!
//! Display text keeps whatever markup the model produced. The copy handed to
//! the speech engine goes through [`sanitize_for_speech`] first so that the
//! engine does not read out asterisks, slashes or brackets.

use once_cell::sync::Lazy;
use regex::Regex;

/// Markdown emphasis and heading markers
static EMPHASIS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[*_~`#]").expect("valid regex"));

/// Path and escape characters
static PATH_ESCAPE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[=\\/]").expect("valid regex"));

/// Bracket characters of every kind
static BRACKETS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[(){}\[\]<>]").expect("valid regex"));

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Strip speech-hostile characters and normalise whitespace
///
/// Idempotent: `sanitize_for_speech(&sanitize_for_speech(x)) == sanitize_for_speech(x)`.
pub fn sanitize_for_speech(text: &str) -> String {
    let text = EMPHASIS.replace_all(text, "");
    let text = PATH_ESCAPE.replace_all(&text, "");
    let text = BRACKETS.replace_all(&text, "");
    WHITESPACE.replace_all(&text, " ").trim().to_string()
}
