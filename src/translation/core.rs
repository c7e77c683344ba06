/*!
 * Core translation service implementation.
 *
 * This module contains the main TranslationService struct, which translates
 * the values of a localization table one at a time: cache lookup, masking,
 * provider call with bounded retries, unmasking, and a fallback to the
 * source text when every attempt fails.
 */

use anyhow::Result;
use log::{debug, warn};
use serde_json::Value;
use std::sync::Arc;

use crate::app_config::Config;
use crate::errors::TranslationError;
use crate::locale_file::LocaleTable;
use crate::providers::{self, Provider};
use super::cache::TranslationCache;
use super::masking::{MaskedText, Masker};
use super::retry::{AttemptOutcome, RetryPolicy, RetryResult};

/// How a single value was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueOutcome {
    /// Fresh translation from the provider
    Translated,
    /// Answered from the cache
    Cached,
    /// Every attempt failed; the source text was kept
    Fallback,
    /// Non-string or blank value, passed through untouched
    Skipped,
}

/// Per-run counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TranslationStats {
    /// Values translated by the provider
    pub translated: usize,
    /// Values answered from the cache
    pub cached: usize,
    /// Values that fell back to the source text
    pub fallbacks: usize,
    /// Values passed through untouched
    pub skipped: usize,
}

impl TranslationStats {
    /// Count one outcome
    pub fn record(&mut self, outcome: ValueOutcome) {
        match outcome {
            ValueOutcome::Translated => self.translated += 1,
            ValueOutcome::Cached => self.cached += 1,
            ValueOutcome::Fallback => self.fallbacks += 1,
            ValueOutcome::Skipped => self.skipped += 1,
        }
    }

    /// Total number of values seen
    pub fn total(&self) -> usize {
        self.translated + self.cached + self.fallbacks + self.skipped
    }
}

/// Main translation service for localization values
pub struct TranslationService {
    /// Provider implementation
    provider: Arc<dyn Provider>,

    /// Protected span masker
    masker: Masker,

    /// Source value -> final text, for this run
    cache: TranslationCache,

    /// Attempts per value
    retry_policy: RetryPolicy,

    /// Reject responses that lost masking tokens
    strict_tokens: bool,

    /// Source language code
    source_language: String,

    /// Target language code
    target_language: String,
}

impl TranslationService {
    /// Create a new translation service with the provider selected in the configuration
    pub fn new(config: &Config) -> Result<Self> {
        let provider = providers::create_provider(&config.translation)?;
        Ok(Self::with_provider(provider, config))
    }

    /// Create a translation service around an existing provider
    pub fn with_provider(provider: Arc<dyn Provider>, config: &Config) -> Self {
        Self {
            provider,
            masker: Masker::new(config.masking.brand_terms.iter().cloned()),
            cache: TranslationCache::new(),
            retry_policy: RetryPolicy::from_config(&config.translation.common),
            strict_tokens: config.translation.common.strict_tokens,
            source_language: config.source_language.clone(),
            target_language: config.target_language.clone(),
        }
    }

    /// Replace the retry policy
    pub fn with_retry_policy(mut self, retry_policy: RetryPolicy) -> Self {
        self.retry_policy = retry_policy;
        self
    }

    /// Provider name for log output
    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// The run cache
    pub fn cache(&self) -> &TranslationCache {
        &self.cache
    }

    /// Test the connection to the translation provider
    pub async fn test_connection(&self) -> Result<()> {
        self.provider.test_connection().await
            .map_err(|e| anyhow::anyhow!("Failed to connect to {}: {}", self.provider.name(), e))
    }

    /// Translate a single text, falling back to the text itself on failure
    pub async fn translate_text(&self, text: &str) -> String {
        self.translate_text_with_outcome(text).await.0
    }

    /// Translate a single text and report how the result was produced
    pub async fn translate_text_with_outcome(&self, text: &str) -> (String, ValueOutcome) {
        if text.trim().is_empty() {
            return (text.to_string(), ValueOutcome::Skipped);
        }

        if let Some(cached) = self.cache.get(text) {
            return (cached, ValueOutcome::Cached);
        }

        let masked = self.masker.mask(text);
        if !masked.tokens.is_empty() {
            debug!("Masked {} span(s): {}", masked.tokens.len(), masked.text);
        }

        let label = format!("'{}'", preview(text));
        let result = self.retry_policy
            .run(&label, |_attempt| self.attempt(&masked))
            .await;

        match result {
            RetryResult::Translated { text: translated, .. } => {
                self.cache.store(text, &translated);
                (translated, ValueOutcome::Translated)
            }
            RetryResult::Exhausted { last_error, attempts } => {
                warn!("Keeping source text for {} after {} failed attempts: {}", label, attempts, last_error);
                self.cache.store(text, text);
                (text.to_string(), ValueOutcome::Fallback)
            }
        }
    }

    /// Translate a JSON value; only strings are sent to the provider
    pub async fn translate_value(&self, value: &Value) -> (Value, ValueOutcome) {
        match value {
            Value::String(text) => {
                let (translated, outcome) = self.translate_text_with_outcome(text).await;
                (Value::String(translated), outcome)
            }
            other => (other.clone(), ValueOutcome::Skipped),
        }
    }

    /// Translate every value of a table in order
    ///
    /// `on_progress` is called after each value with (completed, total).
    pub async fn translate_table<F>(&self, table: &LocaleTable, mut on_progress: F) -> (LocaleTable, TranslationStats)
    where
        F: FnMut(usize, usize),
    {
        let total = table.len();
        let mut stats = TranslationStats::default();
        let mut translated = LocaleTable::new();

        for (index, (key, value)) in table.iter().enumerate() {
            let (new_value, outcome) = self.translate_value(value).await;
            stats.record(outcome);
            translated.insert(key.clone(), new_value);
            on_progress(index + 1, total);
        }

        (translated, stats)
    }

    /// One provider call for a masked value
    async fn attempt(&self, masked: &MaskedText) -> AttemptOutcome {
        let response = match self.provider
            .translate(&masked.text, &self.source_language, &self.target_language)
            .await
        {
            Ok(response) => response,
            Err(e) => return AttemptOutcome::Failed(TranslationError::Provider(e)),
        };

        if self.strict_tokens {
            let missing = masked.missing_tokens(&response);
            if !missing.is_empty() {
                return AttemptOutcome::Failed(TranslationError::TokensLost(
                    missing.iter().map(ToString::to_string).collect(),
                ));
            }
        }

        AttemptOutcome::Translated(masked.unmask(&response))
    }
}

/// First characters of a value for log lines
fn preview(text: &str) -> String {
    const MAX_CHARS: usize = 40;
    match text.char_indices().nth(MAX_CHARS) {
        Some((byte_index, _)) => format!("{}...", &text[..byte_index]),
        None => text.to_string(),
    }
}
