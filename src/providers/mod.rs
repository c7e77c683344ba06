/*!
 * Provider implementations for different translation services.
 *
 * This module contains client implementations for the supported services:
 * - Google: public Google Translate web endpoint (default)
 * - Ollama: Local LLM server
 * - Anthropic: Anthropic API integration
 * - Mock: scripted behaviour for tests
 */

use async_trait::async_trait;
use std::fmt::Debug;
use std::sync::Arc;
use url::Url;

use crate::app_config::{TranslationConfig, TranslationProvider};
use crate::errors::ProviderError;

/// Common trait for all translation providers
///
/// A provider turns one piece of text into the target language. Calls may
/// fail transiently and may return different text for the same input, so
/// callers retry and cache on their side.
#[async_trait]
pub trait Provider: Send + Sync + Debug {
    /// Translate `text` from `source_language` to `target_language`
    ///
    /// # Returns
    /// * `Result<String, ProviderError>` - The translated text or an error
    async fn translate(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, ProviderError>;

    /// Test the connection to the provider
    async fn test_connection(&self) -> Result<(), ProviderError>;

    /// Human readable provider name
    fn name(&self) -> &str;
}

/// Build the provider selected in the configuration
pub fn create_provider(config: &TranslationConfig) -> anyhow::Result<Arc<dyn Provider>> {
    let endpoint = normalize_endpoint(&config.get_endpoint())?;
    let timeout_secs = config.get_timeout_secs();

    let provider: Arc<dyn Provider> = match config.provider {
        TranslationProvider::Google => {
            Arc::new(google::GoogleTranslate::new(endpoint, timeout_secs))
        }
        TranslationProvider::Ollama => {
            Arc::new(ollama::Ollama::new(
                endpoint,
                config.get_model(),
                config.common.system_prompt.clone(),
                config.common.temperature,
                timeout_secs,
            ))
        }
        TranslationProvider::Anthropic => {
            Arc::new(anthropic::Anthropic::new(
                config.get_api_key(),
                endpoint,
                config.get_model(),
                config.common.system_prompt.clone(),
                config.common.temperature,
                timeout_secs,
            ))
        }
    };

    Ok(provider)
}

/// Validate an endpoint and strip the trailing slash
///
/// Endpoints without a scheme are treated as plain http hosts.
pub fn normalize_endpoint(endpoint: &str) -> anyhow::Result<String> {
    let endpoint = endpoint.trim();
    if endpoint.is_empty() {
        return Err(anyhow::anyhow!("Endpoint cannot be empty"));
    }

    let with_scheme = if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
        endpoint.to_string()
    } else {
        format!("http://{}", endpoint)
    };

    let url = Url::parse(&with_scheme)?;
    if url.host_str().is_none() {
        return Err(anyhow::anyhow!("Invalid host in endpoint: {}", endpoint));
    }

    Ok(with_scheme.trim_end_matches('/').to_string())
}

/// Render a prompt template for a language pair
pub(crate) fn render_prompt(template: &str, source_language: &str, target_language: &str) -> String {
    let source_name = crate::language_utils::get_language_name(source_language)
        .unwrap_or_else(|_| source_language.to_string());
    let target_name = crate::language_utils::get_language_name(target_language)
        .unwrap_or_else(|_| target_language.to_string());

    template
        .replace("{source_language}", &source_name)
        .replace("{target_language}", &target_name)
}

/// Cut a response body down for error messages
pub(crate) fn truncate_body(body: &str) -> String {
    if body.chars().count() > 500 {
        body.chars().take(500).collect()
    } else {
        body.to_string()
    }
}

pub mod google;
pub mod ollama;
pub mod anthropic;
pub mod mock;
