//! Language and script definitions
//!
//! The relay works with one "local" language (the caller's) and one "pivot"
//! language (the model's working language). Every language carries the
//! script it is written in so that detection can stay a cheap character
//! range check.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    #[serde(alias = "en", alias = "eng")]
    English,
    #[serde(alias = "bn", alias = "bangla")]
    Bengali,
    #[serde(alias = "hi")]
    Hindi,
    #[serde(alias = "as")]
    Assamese,
    #[serde(alias = "or", alias = "oriya")]
    Odia,
    #[serde(alias = "ta")]
    Tamil,
    #[serde(alias = "te")]
    Telugu,
    #[serde(alias = "kn")]
    Kannada,
    #[serde(alias = "ml")]
    Malayalam,
    #[serde(alias = "mr")]
    Marathi,
    #[serde(alias = "gu")]
    Gujarati,
    #[serde(alias = "pa")]
    Punjabi,
    #[serde(alias = "ur")]
    Urdu,
}

impl Language {
    /// ISO 639-1 code, as understood by the translation and speech providers
    pub fn code(&self) -> &'static str {
        match self {
            Self::English => "en",
            Self::Bengali => "bn",
            Self::Hindi => "hi",
            Self::Assamese => "as",
            Self::Odia => "or",
            Self::Tamil => "ta",
            Self::Telugu => "te",
            Self::Kannada => "kn",
            Self::Malayalam => "ml",
            Self::Marathi => "mr",
            Self::Gujarati => "gu",
            Self::Punjabi => "pa",
            Self::Urdu => "ur",
        }
    }

    /// Human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            Self::English => "English",
            Self::Bengali => "Bengali",
            Self::Hindi => "Hindi",
            Self::Assamese => "Assamese",
            Self::Odia => "Odia",
            Self::Tamil => "Tamil",
            Self::Telugu => "Telugu",
            Self::Kannada => "Kannada",
            Self::Malayalam => "Malayalam",
            Self::Marathi => "Marathi",
            Self::Gujarati => "Gujarati",
            Self::Punjabi => "Punjabi",
            Self::Urdu => "Urdu",
        }
    }

    /// Script used by this language
    pub fn script(&self) -> Script {
        match self {
            Self::English => Script::Latin,
            Self::Bengali | Self::Assamese => Script::Bengali,
            Self::Hindi | Self::Marathi => Script::Devanagari,
            Self::Odia => Script::Odia,
            Self::Tamil => Script::Tamil,
            Self::Telugu => Script::Telugu,
            Self::Kannada => Script::Kannada,
            Self::Malayalam => Script::Malayalam,
            Self::Gujarati => Script::Gujarati,
            Self::Punjabi => Script::Gurmukhi,
            Self::Urdu => Script::Arabic,
        }
    }

    /// Parse from a code or name (case-insensitive)
    pub fn from_str_loose(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase();
        match s.as_str() {
            "en" | "eng" | "english" => Some(Self::English),
            "bn" | "ben" | "bengali" | "bangla" => Some(Self::Bengali),
            "hi" | "hin" | "hindi" => Some(Self::Hindi),
            "as" | "asm" | "assamese" => Some(Self::Assamese),
            "or" | "ori" | "odia" | "oriya" => Some(Self::Odia),
            "ta" | "tam" | "tamil" => Some(Self::Tamil),
            "te" | "tel" | "telugu" => Some(Self::Telugu),
            "kn" | "kan" | "kannada" => Some(Self::Kannada),
            "ml" | "mal" | "malayalam" => Some(Self::Malayalam),
            "mr" | "mar" | "marathi" => Some(Self::Marathi),
            "gu" | "guj" | "gujarati" => Some(Self::Gujarati),
            "pa" | "pan" | "punjabi" | "panjabi" => Some(Self::Punjabi),
            "ur" | "urd" | "urdu" => Some(Self::Urdu),
            _ => None,
        }
    }

    /// All supported languages
    pub fn all() -> &'static [Language] {
        &[
            Self::English,
            Self::Bengali,
            Self::Hindi,
            Self::Assamese,
            Self::Odia,
            Self::Tamil,
            Self::Telugu,
            Self::Kannada,
            Self::Malayalam,
            Self::Marathi,
            Self::Gujarati,
            Self::Punjabi,
            Self::Urdu,
        ]
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Writing systems the detector can recognise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Script {
    Latin,
    Bengali,
    Devanagari,
    Odia,
    Tamil,
    Telugu,
    Kannada,
    Malayalam,
    Gujarati,
    Gurmukhi,
    Arabic,
}

impl Script {
    /// Unicode block for the script
    pub fn range(&self) -> (char, char) {
        match self {
            Self::Latin => ('\u{0041}', '\u{024F}'),
            Self::Bengali => ('\u{0980}', '\u{09FF}'),
            Self::Devanagari => ('\u{0900}', '\u{097F}'),
            Self::Odia => ('\u{0B00}', '\u{0B7F}'),
            Self::Tamil => ('\u{0B80}', '\u{0BFF}'),
            Self::Telugu => ('\u{0C00}', '\u{0C7F}'),
            Self::Kannada => ('\u{0C80}', '\u{0CFF}'),
            Self::Malayalam => ('\u{0D00}', '\u{0D7F}'),
            Self::Gujarati => ('\u{0A80}', '\u{0AFF}'),
            Self::Gurmukhi => ('\u{0A00}', '\u{0A7F}'),
            Self::Arabic => ('\u{0600}', '\u{06FF}'),
        }
    }

    /// Script of a single alphabetic character, if known
    ///
    /// Digits, whitespace and the shared danda marks return `None`.
    pub fn of_char(c: char) -> Option<Script> {
        if c.is_ascii() {
            return if c.is_ascii_alphabetic() { Some(Self::Latin) } else { None };
        }
        if c.is_whitespace() || c.is_numeric() || matches!(c, '\u{0964}' | '\u{0965}') {
            return None;
        }
        const ORDER: [Script; 11] = [
            Script::Bengali,
            Script::Devanagari,
            Script::Odia,
            Script::Tamil,
            Script::Telugu,
            Script::Kannada,
            Script::Malayalam,
            Script::Gujarati,
            Script::Gurmukhi,
            Script::Arabic,
            Script::Latin,
        ];
        ORDER.into_iter().find(|script| {
            let (lo, hi) = script.range();
            (lo..=hi).contains(&c) && (*script != Script::Latin || c.is_alphabetic())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_roundtrip_through_loose_parse() {
        for lang in Language::all() {
            assert_eq!(Language::from_str_loose(lang.code()), Some(*lang));
            assert_eq!(Language::from_str_loose(lang.name()), Some(*lang));
        }
    }

    #[test]
    fn test_loose_parse_aliases() {
        assert_eq!(Language::from_str_loose(" Bangla "), Some(Language::Bengali));
        assert_eq!(Language::from_str_loose("EN"), Some(Language::English));
        assert_eq!(Language::from_str_loose("klingon"), None);
    }

    #[test]
    fn test_script_of_char() {
        assert_eq!(Script::of_char('a'), Some(Script::Latin));
        assert_eq!(Script::of_char('আ'), Some(Script::Bengali));
        assert_eq!(Script::of_char('न'), Some(Script::Devanagari));
        assert_eq!(Script::of_char('7'), None);
        assert_eq!(Script::of_char('।'), None);
        assert_eq!(Script::of_char('৭'), None);
        assert_eq!(Script::of_char(' '), None);
    }

    #[test]
    fn test_shared_script() {
        assert_eq!(Language::Bengali.script(), Language::Assamese.script());
        assert_eq!(Language::English.script(), Script::Latin);
    }

    #[test]
    fn test_serde_lowercase_with_code_aliases() {
        let json = serde_json::to_string(&Language::Bengali).unwrap();
        assert_eq!(json, "\"bengali\"");
        let lang: Language = serde_json::from_str("\"bn\"").unwrap();
        assert_eq!(lang, Language::Bengali);
    }
}
