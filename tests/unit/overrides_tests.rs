/*!
 * Tests for the manual override pass
 */

use serde_json::json;
use std::collections::BTreeMap;

use locale_translator::app_config::Config;
use locale_translator::translation::ManualOverrides;
use locale_translator::LocaleTable;

fn default_overrides() -> ManualOverrides {
    ManualOverrides::new(Config::default().manual_overrides)
}

#[test]
fn test_apply_withDefaultTable_shouldRewriteRedirectLabel() {
    let mut table = LocaleTable::from_json_str(r#"{"redirect": "An Home Assistant weiterleiten..."}"#).unwrap();

    let changed = default_overrides().apply(&mut table);

    assert_eq!(changed, 1);
    assert_eq!(table.get("redirect"), Some(&json!("Weiterleitung zu Home Assistant...")));
}

#[test]
fn test_apply_withOAuth2Label_shouldLeaveItUnchanged() {
    let mut table = LocaleTable::from_json_str(r#"{"oauth": "OAuth2 (Browser-Anmeldung)"}"#).unwrap();

    let changed = default_overrides().apply(&mut table);

    assert_eq!(changed, 0);
    assert_eq!(table.get("oauth"), Some(&json!("OAuth2 (Browser-Anmeldung)")));
}

#[test]
fn test_apply_withIdentityEntry_shouldNotCountAsChange() {
    let mut table = LocaleTable::from_json_str(r#"{"login": "Mit Home Assistant anmelden"}"#).unwrap();

    let changed = default_overrides().apply(&mut table);

    assert_eq!(changed, 0);
    assert_eq!(table.get("login"), Some(&json!("Mit Home Assistant anmelden")));
}

#[test]
fn test_apply_shouldRequireExactMatch() {
    let mut table = LocaleTable::from_json_str(
        r#"{"a": "An Home Assistant weiterleiten... ", "b": "an Home Assistant weiterleiten...", "c": 42}"#,
    )
    .unwrap();
    let before = table.clone();

    let changed = default_overrides().apply(&mut table);

    assert_eq!(changed, 0);
    assert_eq!(table, before);
}

#[test]
fn test_lookup_withCustomTable_shouldReturnReplacement() {
    let mut entries = BTreeMap::new();
    entries.insert("Speichern unter".to_string(), "Speichern als".to_string());
    let overrides = ManualOverrides::new(entries);

    assert_eq!(overrides.len(), 1);
    assert_eq!(overrides.lookup("Speichern unter"), Some("Speichern als"));
    assert_eq!(overrides.lookup("Speichern"), None);
}

#[test]
fn test_apply_withEmptyTable_shouldChangeNothing() {
    let overrides = ManualOverrides::default();
    let mut table = LocaleTable::from_json_str(r#"{"a": "Hallo"}"#).unwrap();

    assert!(overrides.is_empty());
    assert_eq!(overrides.apply(&mut table), 0);
}
