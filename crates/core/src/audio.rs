//! Synthesized audio artifacts

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

/// Container format of synthesized speech
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AudioEncoding {
    #[default]
    Mp3,
    Wav,
    Ogg,
}

impl AudioEncoding {
    pub fn mime_type(&self) -> &'static str {
        match self {
            AudioEncoding::Mp3 => "audio/mpeg",
            AudioEncoding::Wav => "audio/wav",
            AudioEncoding::Ogg => "audio/ogg",
        }
    }
}

/// Encoded speech produced by a synthesizer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioArtifact {
    pub bytes: Vec<u8>,
    pub encoding: AudioEncoding,
}

impl AudioArtifact {
    pub fn new(bytes: Vec<u8>, encoding: AudioEncoding) -> Self {
        Self { bytes, encoding }
    }

    pub fn mp3(bytes: Vec<u8>) -> Self {
        Self::new(bytes, AudioEncoding::Mp3)
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Standard base64 (with padding) of the encoded bytes
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base64_padding() {
        let artifact = AudioArtifact::mp3(vec![0xFF, 0xFB, 0x90, 0x64]);
        assert_eq!(artifact.to_base64(), "//uQZA==");
        assert_eq!(artifact.encoding.mime_type(), "audio/mpeg");
    }

    #[test]
    fn test_empty_artifact() {
        let artifact = AudioArtifact::new(Vec::new(), AudioEncoding::Wav);
        assert!(artifact.is_empty());
        assert_eq!(artifact.to_base64(), "");
    }
}
