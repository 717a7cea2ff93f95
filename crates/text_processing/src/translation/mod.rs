//! Translation providers, script detection and the fail-soft gateway
//!
//! Prompts are normalised into the pivot language before inference and
//! replies are translated back (Translate-Think-Translate). Providers:
//! - LibreTranslate (`POST /translate`)
//! - Google web endpoint (`GET /translate_a/single`)
//! - Disabled (pass-through)

mod detect;
mod fallback;
mod gateway;
mod google;
mod libre;
mod noop;

pub use detect::{Detection, ScriptDetector};
pub use fallback::FallbackTranslator;
pub use gateway::{TranslationGateway, TranslationOutcome};
pub use google::GoogleWebTranslator;
pub use libre::{LibreTranslator, LibreTranslatorConfig};
pub use noop::NoopTranslator;

use std::sync::Arc;
use std::time::Duration;

use voice_relay_config::{TranslationConfig, TranslationProvider};
use voice_relay_core::Translator;

use crate::TextProcessingError;

fn create_provider(
    provider: TranslationProvider,
    config: &TranslationConfig,
) -> Result<Arc<dyn Translator>, TextProcessingError> {
    let timeout = Duration::from_millis(config.timeout_ms);
    let endpoint = config.endpoint_for(provider);

    Ok(match provider {
        TranslationProvider::Libre => Arc::new(LibreTranslator::new(LibreTranslatorConfig {
            endpoint,
            api_key: config.api_key.clone(),
            timeout,
        })?),
        TranslationProvider::Google => Arc::new(GoogleWebTranslator::new(endpoint, timeout)?),
        TranslationProvider::Disabled => Arc::new(NoopTranslator::new()),
    })
}

/// Create translator based on config
pub fn create_translator(
    config: &TranslationConfig,
) -> Result<Arc<dyn Translator>, TextProcessingError> {
    let primary = create_provider(config.provider, config)?;

    match config.fallback_provider {
        Some(fallback)
            if fallback != config.provider
                && config.provider != TranslationProvider::Disabled
                && fallback != TranslationProvider::Disabled =>
        {
            let secondary = create_provider(fallback, config)?;
            tracing::info!(
                primary = primary.name(),
                fallback = secondary.name(),
                "Using translator with fallback"
            );
            Ok(Arc::new(FallbackTranslator::new(primary, secondary)))
        }
        _ => {
            tracing::info!(provider = primary.name(), "Using translator (no fallback)");
            Ok(primary)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_translator_names() {
        let mut config = TranslationConfig::default();
        assert_eq!(
            create_translator(&config).unwrap().name(),
            "libretranslate+google-web"
        );

        config.fallback_provider = None;
        assert_eq!(create_translator(&config).unwrap().name(), "libretranslate");

        config.provider = TranslationProvider::Disabled;
        config.fallback_provider = Some(TranslationProvider::Google);
        assert_eq!(create_translator(&config).unwrap().name(), "noop");
    }
}
