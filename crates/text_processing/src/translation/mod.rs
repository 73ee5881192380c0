//! Translation adapters
//!
//! Generation always happens in the pivot language. Locales whose primary
//! subtag is the pivot language never translate, whatever provider is
//! configured.

mod google;
mod noop;
mod papago;

pub use google::GoogleTranslator;
pub use noop::NoopTranslator;
pub use papago::PapagoTranslator;

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use storyvoice_config::TranslationBackend;
use storyvoice_core::{Locale, Translator};

use crate::{Result, TextProcessingError};

/// Per-request timeout for translation calls
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

pub(crate) fn http_client() -> Result<Client> {
    Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(|e| {
            TextProcessingError::Configuration(format!("Failed to create HTTP client: {}", e))
        })
}

/// Create translator for the given backend and user locale
pub fn create_translator(
    backend: &TranslationBackend,
    locale: &Locale,
) -> Result<Arc<dyn Translator>> {
    if locale.is_pivot() {
        tracing::info!(locale = %locale, "Locale is the story language, translation disabled");
        return Ok(Arc::new(NoopTranslator::new()));
    }

    let translator: Arc<dyn Translator> = match backend {
        TranslationBackend::Google { endpoint } => {
            tracing::info!(locale = %locale, "Using Google translator");
            Arc::new(GoogleTranslator::new(endpoint.clone(), locale)?)
        }
        TranslationBackend::Papago {
            endpoint,
            client_id,
            client_secret,
        } => {
            tracing::info!(locale = %locale, "Using Papago translator");
            Arc::new(PapagoTranslator::new(
                endpoint.clone(),
                client_id.clone(),
                client_secret.clone(),
                locale,
            )?)
        }
        TranslationBackend::None => {
            tracing::warn!(locale = %locale, "Translation disabled for a non-English locale");
            Arc::new(NoopTranslator::new())
        }
    };

    Ok(translator)
}
