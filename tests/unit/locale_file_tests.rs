/*!
 * Tests for localization table loading and saving
 */

use serde_json::{json, Value};

use locale_translator::errors::AppError;
use locale_translator::LocaleTable;

use crate::common;

#[test]
fn test_fromJsonStr_withObject_shouldKeepKeyOrder() {
    let table = LocaleTable::from_json_str(r#"{"zeta": "Z", "alpha": "A", "mid": "M"}"#).unwrap();

    let keys: Vec<&str> = table.iter().map(|(key, _)| key.as_str()).collect();
    assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
}

#[test]
fn test_fromJsonStr_withArray_shouldReturnLocaleError() {
    let result = LocaleTable::from_json_str(r#"["a", "b"]"#);

    match result {
        Err(AppError::Locale(message)) => assert!(message.contains("an array")),
        other => panic!("Unexpected result: {:?}", other),
    }
}

#[test]
fn test_fromJsonStr_withInvalidJson_shouldFail() {
    assert!(matches!(LocaleTable::from_json_str("{\"a\": "), Err(AppError::Locale(_))));
}

#[test]
fn test_toJsonString_shouldUseTwoSpaceIndentLiteralUnicodeAndTrailingNewline() {
    let table: LocaleTable = vec![
        ("title".to_string(), json!("Größe ändern")),
        ("count".to_string(), json!(3)),
    ]
    .into_iter()
    .collect();

    let output = table.to_json_string().unwrap();

    assert_eq!(output, "{\n  \"title\": \"Größe ändern\",\n  \"count\": 3\n}\n");
}

#[test]
fn test_translatableCount_shouldSkipNonStringAndBlankValues() {
    let table = LocaleTable::from_json_str(
        r#"{"a": "Hello", "b": "", "c": "   ", "d": 5, "e": null, "f": ["x"], "g": "Bye"}"#,
    )
    .unwrap();

    assert_eq!(table.len(), 7);
    assert_eq!(table.translatable_count(), 2);
}

#[test]
fn test_saveAndLoad_shouldPreserveContent() {
    let temp_dir = common::create_temp_dir().unwrap();
    let path = temp_dir.path().join("out.json");
    let table = LocaleTable::from_json_str(r#"{"b": "Zwei", "a": {"nested": true}}"#).unwrap();

    table.save(&path).unwrap();
    let loaded = LocaleTable::load(&path).unwrap();

    assert_eq!(loaded, table);
    assert_eq!(loaded.get("a"), Some(&json!({"nested": true})));
}

#[test]
fn test_load_withMissingFile_shouldFail() {
    let temp_dir = common::create_temp_dir().unwrap();

    assert!(LocaleTable::load(temp_dir.path().join("missing.json")).is_err());
}

#[test]
fn test_insert_withExistingKey_shouldKeepPosition() {
    let mut table = LocaleTable::from_json_str(r#"{"first": "1", "second": "2"}"#).unwrap();

    let previous = table.insert("first", Value::String("eins".to_string()));

    assert_eq!(previous, Some(json!("1")));
    let keys: Vec<String> = table.into_iter().map(|(key, _)| key).collect();
    assert_eq!(keys, vec!["first".to_string(), "second".to_string()]);
}

#[test]
fn test_emptyTable_shouldSerializeAsEmptyObject() {
    let table = LocaleTable::new();

    assert!(table.is_empty());
    assert_eq!(table.to_json_string().unwrap(), "{}\n");
}
