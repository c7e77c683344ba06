/*!
 * Localization table loading and saving.
 *
 * A localization file is a single JSON object mapping keys to values.
 * String values are translated; every other value is carried through
 * untouched. Key order is preserved from input to output.
 */

use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::path::Path;

use crate::errors::AppError;
use crate::file_utils::FileManager;

/// Ordered key -> value mapping read from a localization file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocaleTable {
    entries: Map<String, Value>,
}

impl LocaleTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a table from JSON text; the top level must be an object
    pub fn from_json_str(content: &str) -> Result<Self, AppError> {
        match serde_json::from_str::<Value>(content)? {
            Value::Object(entries) => Ok(Self { entries }),
            other => Err(AppError::Locale(format!(
                "expected a JSON object at the top level, found {}",
                json_type_name(&other)
            ))),
        }
    }

    /// Load a table from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = FileManager::read_to_string(path)?;
        Self::from_json_str(&content)
            .with_context(|| format!("Failed to parse localization file: {:?}", path))
    }

    /// Serialize with two-space indentation, literal non-ASCII and a trailing newline
    pub fn to_json_string(&self) -> Result<String, AppError> {
        let mut json = serde_json::to_string_pretty(&self.entries)?;
        json.push('\n');
        Ok(json)
    }

    /// Write the table to a file, replacing it in one step
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = self.to_json_string()?;
        FileManager::write_atomically(path, &json)
    }

    /// Number of keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no keys
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up a value by key
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Insert or replace a value, keeping the position of existing keys
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.entries.insert(key.into(), value)
    }

    /// Iterate entries in table order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.entries.iter()
    }

    /// Iterate entries mutably in table order
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&String, &mut Value)> {
        self.entries.iter_mut()
    }

    /// Number of values that will be sent for translation
    pub fn translatable_count(&self) -> usize {
        self.entries.values()
            .filter(|value| value.as_str().is_some_and(|text| !text.trim().is_empty()))
            .count()
    }
}

impl FromIterator<(String, Value)> for LocaleTable {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for LocaleTable {
    type Item = (String, Value);
    type IntoIter = serde_json::map::IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
