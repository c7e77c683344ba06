/*!
 * Manual corrections applied after bulk translation.
 */

use log::debug;
use serde_json::Value;
use std::collections::BTreeMap;

use crate::locale_file::LocaleTable;

/// Exact-match replacement table for translated strings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManualOverrides {
    table: BTreeMap<String, String>,
}

impl ManualOverrides {
    /// Create from a translated -> corrected mapping
    pub fn new(table: BTreeMap<String, String>) -> Self {
        Self { table }
    }

    /// Corrected form of `translated`, if one is configured
    pub fn lookup(&self, translated: &str) -> Option<&str> {
        self.table.get(translated).map(String::as_str)
    }

    /// Replace every string value that exactly equals a table key
    ///
    /// Returns the number of values whose text actually changed.
    pub fn apply(&self, table: &mut LocaleTable) -> usize {
        let mut changed = 0;

        for (key, value) in table.iter_mut() {
            let Value::String(text) = value else {
                continue;
            };
            if let Some(replacement) = self.table.get(text.as_str()) {
                if replacement.as_str() != text.as_str() {
                    debug!("Override for '{}': '{}' -> '{}'", key, text, replacement);
                    *text = replacement.clone();
                    changed += 1;
                }
            }
        }

        changed
    }

    /// Number of configured overrides
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Whether no overrides are configured
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}
