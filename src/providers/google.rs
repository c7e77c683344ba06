use async_trait::async_trait;
use log::{debug, error};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

use crate::errors::ProviderError;
use crate::language_utils;
use crate::providers::{truncate_body, Provider};

/// Client for the public Google Translate web endpoint
///
/// No API key is needed. The endpoint is rate limited per client address and
/// answers `429` when pushed too hard.
#[derive(Debug)]
pub struct GoogleTranslate {
    /// HTTP client for API requests
    client: Client,
    /// Base URL, e.g. `https://translate.googleapis.com`
    endpoint: String,
}

impl GoogleTranslate {
    /// Create a new client
    pub fn new(endpoint: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_default(),
            endpoint: endpoint.into(),
        }
    }

    fn request_url(&self) -> String {
        format!("{}/translate_a/single", self.endpoint.trim_end_matches('/'))
    }

    /// Language code in the form the endpoint expects
    ///
    /// `auto` and codes isolang does not know are passed through unchanged.
    fn service_language_code(code: &str) -> String {
        language_utils::normalize_to_part1_or_part2t(code)
            .unwrap_or_else(|_| code.trim().to_lowercase())
    }

    /// Extract the translated text from a response body
    ///
    /// The body is a nested array; its first element lists sentence segments,
    /// each starting with the translated text of that segment.
    pub fn parse_response(body: &str) -> Result<String, ProviderError> {
        let value: Value = serde_json::from_str(body)
            .map_err(|e| ProviderError::ParseError(format!("{}: {}", e, truncate_body(body))))?;

        let segments = value.get(0)
            .and_then(Value::as_array)
            .ok_or_else(|| ProviderError::ParseError(format!(
                "No sentence segments in response: {}", truncate_body(body)
            )))?;

        let translated: String = segments.iter()
            .filter_map(|segment| segment.get(0).and_then(Value::as_str))
            .collect();

        if translated.is_empty() {
            return Err(ProviderError::ParseError("Response contained no translated text".to_string()));
        }

        Ok(translated)
    }
}

#[async_trait]
impl Provider for GoogleTranslate {
    async fn translate(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, ProviderError> {
        let source = Self::service_language_code(source_language);
        let target = Self::service_language_code(target_language);

        let response = self.client.get(self.request_url())
            .query(&[
                ("client", "gtx"),
                ("sl", source.as_str()),
                ("tl", target.as_str()),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            error!("Google Translate error ({}): {}", status, truncate_body(&body));
            return Err(ProviderError::from_status(status.as_u16(), truncate_body(&body)));
        }

        let translated = Self::parse_response(&body)?;
        debug!("Google Translate: {} chars -> {} chars", text.len(), translated.len());

        Ok(translated)
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        self.translate("Hello", "en", "de").await.map(|_| ())
    }

    fn name(&self) -> &str {
        "Google Translate"
    }
}
