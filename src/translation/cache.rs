/*!
 * Translation caching functionality.
 *
 * One cache lives for one run and maps an original (unmasked) source value to
 * the final text produced for it, including fallbacks. A value that is already
 * cached is never sent to the provider again.
 */

use std::collections::HashMap;
use std::sync::Arc;
use parking_lot::RwLock;
use log::debug;

/// Hit and miss counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups answered from the cache
    pub hits: usize,
    /// Lookups that found nothing
    pub misses: usize,
}

impl CacheStats {
    /// Share of lookups answered from the cache
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total > 0 {
            self.hits as f64 / total as f64
        } else {
            0.0
        }
    }
}

/// Translation cache for storing and retrieving translations
#[derive(Debug, Default)]
pub struct TranslationCache {
    /// Source value -> final text
    cache: Arc<RwLock<HashMap<String, String>>>,

    /// Lookup counters
    stats: Arc<RwLock<CacheStats>>,
}

impl TranslationCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the final text stored for a source value
    pub fn get(&self, source_text: &str) -> Option<String> {
        let cached = self.cache.read().get(source_text).cloned();

        let mut stats = self.stats.write();
        match cached {
            Some(_) => {
                stats.hits += 1;
                debug!("Cache hit for '{}'", truncate_text(source_text, 30));
            }
            None => {
                stats.misses += 1;
            }
        }

        cached
    }

    /// Store the final text for a source value
    pub fn store(&self, source_text: &str, translation: &str) {
        self.cache.write().insert(source_text.to_string(), translation.to_string());

        debug!("Cached translation for '{}'", truncate_text(source_text, 30));
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        *self.stats.read()
    }

    /// Get the number of entries in the cache
    pub fn len(&self) -> usize {
        self.cache.read().len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.cache.read().is_empty()
    }
}

impl Clone for TranslationCache {
    fn clone(&self) -> Self {
        Self {
            cache: Arc::clone(&self.cache),
            stats: Arc::clone(&self.stats),
        }
    }
}

/// Truncate text to a maximum number of characters with ellipsis
fn truncate_text(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => format!("{}...", &text[..byte_index]),
        None => text.to_string(),
    }
}
