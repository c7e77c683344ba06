/*!
 * End-to-end tests: localization file in, translated localization file out
 */

use serde_json::{json, Value};
use std::fs;
use std::sync::Arc;

use locale_translator::providers::mock::{MockProvider, MockRequest};
use locale_translator::{Config, Controller, LocaleTable, TranslationService};

use crate::common;

/// Pretends to be a German translation service for a handful of known strings
fn german(request: &MockRequest) -> String {
    match request.text.as_str() {
        "Login via __P0__ now" => "Anmelden über __P0__ jetzt".to_string(),
        "__H0____B2____H1__ required" => "__H0____B2____H1__ erforderlich".to_string(),
        "Redirect to __B0__..." => "An __B0__ weiterleiten...".to_string(),
        "Log in with __B0__" => "Mit __B0__ anmelden".to_string(),
        "__B0__ (browser login)" => "__B0__ (Browser-Anmeldung)".to_string(),
        "Resize" => "Größe ändern".to_string(),
        other => other.to_string(),
    }
}

const SOURCE: &str = r#"{
  "login.provider": "Login via {provider} now",
  "login.required": "<b>Home Assistant</b> required",
  "login.redirect": "Redirect to Home Assistant...",
  "login.button": "Log in with Home Assistant",
  "login.oauth": "OAuth2 (browser login)",
  "window.resize": "Resize",
  "window.resize_again": "Resize",
  "limits.max": 10,
  "flags.enabled": true,
  "empty": ""
}"#;

#[tokio::test]
async fn test_run_withMockProvider_shouldWriteTranslatedFile() {
    common::init_test_logger();
    let temp_dir = common::create_temp_dir().unwrap();
    let input = common::create_test_file(temp_dir.path(), "en.json", SOURCE).unwrap();
    let output = temp_dir.path().join("de.json");

    let mock = MockProvider::working().with_custom_response(german);
    let config = common::test_config();
    let service = TranslationService::with_provider(Arc::new(mock.clone()), &config);
    let controller = Controller::with_config(config).unwrap();

    let summary = controller.run_with_service(&service, &input, &output).await.unwrap();

    let written: Value = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(written["login.provider"], "Anmelden über {provider} jetzt");
    assert_eq!(written["login.required"], "<b>Home Assistant</b> erforderlich");
    assert_eq!(written["login.redirect"], "Weiterleitung zu Home Assistant...");
    assert_eq!(written["login.button"], "Mit Home Assistant anmelden");
    assert_eq!(written["login.oauth"], "OAuth2 (Browser-Anmeldung)");
    assert_eq!(written["window.resize"], "Größe ändern");
    assert_eq!(written["window.resize_again"], "Größe ändern");
    assert_eq!(written["limits.max"], json!(10));
    assert_eq!(written["flags.enabled"], json!(true));
    assert_eq!(written["empty"], "");

    assert_eq!(summary.keys, 10);
    assert_eq!(summary.overridden, 1);
    assert_eq!(summary.stats.translated, 6);
    assert_eq!(summary.stats.cached, 1);
    assert_eq!(summary.stats.skipped, 3);
    assert_eq!(summary.stats.fallbacks, 0);
    assert_eq!(summary.output, output);

    // "Resize" is sent once even though two keys carry it
    assert_eq!(mock.request_count(), 6);
}

#[tokio::test]
async fn test_run_shouldWritePrettyUtf8JsonInSourceOrder() {
    let temp_dir = common::create_temp_dir().unwrap();
    let input = common::create_test_file(
        temp_dir.path(),
        "en.json",
        r#"{"z.last": "Resize", "a.first": 1}"#,
    )
    .unwrap();
    let output = temp_dir.path().join("out").join("de.json");

    let mock = MockProvider::working().with_custom_response(german);
    let config = common::test_config();
    let service = TranslationService::with_provider(Arc::new(mock), &config);
    let controller = Controller::with_config(config).unwrap();

    controller.run_with_service(&service, &input, &output).await.unwrap();

    let content = fs::read_to_string(&output).unwrap();
    assert_eq!(content, "{\n  \"z.last\": \"Größe ändern\",\n  \"a.first\": 1\n}\n");
}

#[tokio::test]
async fn test_run_withFailingProvider_shouldKeepSourceTextAndStillWrite() {
    let temp_dir = common::create_temp_dir().unwrap();
    let input = common::create_test_file(
        temp_dir.path(),
        "en.json",
        r#"{"a": "Hello", "b": "Hello", "c": "Bye"}"#,
    )
    .unwrap();
    let output = temp_dir.path().join("de.json");

    let mock = MockProvider::failing();
    let config = common::test_config();
    let service = TranslationService::with_provider(Arc::new(mock.clone()), &config);
    let controller = Controller::with_config(config).unwrap();

    let summary = controller.run_with_service(&service, &input, &output).await.unwrap();

    let table = LocaleTable::load(&output).unwrap();
    assert_eq!(table.get("a"), Some(&json!("Hello")));
    assert_eq!(table.get("b"), Some(&json!("Hello")));
    assert_eq!(table.get("c"), Some(&json!("Bye")));
    assert_eq!(summary.stats.fallbacks, 2);
    assert_eq!(summary.stats.cached, 1);
    // Three attempts each for the two distinct strings
    assert_eq!(mock.request_count(), 6);
}

#[tokio::test]
async fn test_run_withNonObjectInput_shouldFailWithoutWritingOutput() {
    let temp_dir = common::create_temp_dir().unwrap();
    let input = common::create_test_file(temp_dir.path(), "en.json", r#"["Hello", "Bye"]"#).unwrap();
    let output = temp_dir.path().join("de.json");

    let mock = MockProvider::working();
    let config = common::test_config();
    let service = TranslationService::with_provider(Arc::new(mock.clone()), &config);
    let controller = Controller::with_config(config).unwrap();

    let result = controller.run_with_service(&service, &input, &output).await;

    assert!(result.is_err());
    assert!(!output.exists());
    assert_eq!(mock.request_count(), 0);
}

#[tokio::test]
async fn test_run_withMissingInput_shouldFailWithoutWritingOutput() {
    let temp_dir = common::create_temp_dir().unwrap();
    let input = temp_dir.path().join("missing.json");
    let output = temp_dir.path().join("de.json");

    let config = common::test_config();
    let service = TranslationService::with_provider(Arc::new(MockProvider::working()), &config);
    let controller = Controller::with_config(config).unwrap();

    assert!(controller.run_with_service(&service, &input, &output).await.is_err());
    assert!(!output.exists());
}

#[tokio::test]
async fn test_run_withCustomOverrides_shouldApplyConfiguredTable() {
    let temp_dir = common::create_temp_dir().unwrap();
    let input = common::create_test_file(temp_dir.path(), "en.json", r#"{"a": "Resize"}"#).unwrap();
    let output = temp_dir.path().join("de.json");

    let mut config = common::test_config();
    config.manual_overrides.clear();
    config.manual_overrides.insert("Größe ändern".to_string(), "Größe anpassen".to_string());

    let mock = MockProvider::working().with_custom_response(german);
    let service = TranslationService::with_provider(Arc::new(mock), &config);
    let controller = Controller::with_config(config).unwrap();

    let summary = controller.run_with_service(&service, &input, &output).await.unwrap();

    assert_eq!(summary.overridden, 1);
    assert_eq!(LocaleTable::load(&output).unwrap().get("a"), Some(&json!("Größe anpassen")));
}

#[tokio::test]
async fn test_run_withEmptyTable_shouldWriteEmptyObject() {
    let temp_dir = common::create_temp_dir().unwrap();
    let input = common::create_test_file(temp_dir.path(), "en.json", "{}").unwrap();
    let output = temp_dir.path().join("de.json");

    let config = common::test_config();
    let service = TranslationService::with_provider(Arc::new(MockProvider::working()), &config);
    let controller = Controller::with_config(config).unwrap();

    let summary = controller.run_with_service(&service, &input, &output).await.unwrap();

    assert_eq!(summary.keys, 0);
    assert_eq!(fs::read_to_string(&output).unwrap(), "{}\n");
}

#[tokio::test]
async fn test_run_withoutConfigFile_shouldLeaveOnlyInputAndOutput() {
    let temp_dir = common::create_temp_dir().unwrap();
    let input = common::create_test_file(temp_dir.path(), "en.json", SOURCE).unwrap();
    let output = temp_dir.path().join("de.json");

    let (mut config, found) = Config::load_or_default(temp_dir.path().join("locale-translator.json")).unwrap();
    assert!(!found);
    config.translation.common.retry_delay_ms = 0;

    let mock = MockProvider::working().with_custom_response(german);
    let service = TranslationService::with_provider(Arc::new(mock), &config);
    let controller = Controller::with_config(config).unwrap();
    controller.run_with_service(&service, &input, &output).await.unwrap();

    let mut names: Vec<String> = fs::read_dir(temp_dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(names, vec!["de.json", "en.json"]);
}

#[tokio::test]
async fn test_runSummary_display_shouldReportPathAndKeyCount() {
    let temp_dir = common::create_temp_dir().unwrap();
    let input = common::create_test_file(temp_dir.path(), "en.json", SOURCE).unwrap();
    let output = temp_dir.path().join("de.json");

    let config = common::test_config();
    let mock = MockProvider::working().with_custom_response(german);
    let service = TranslationService::with_provider(Arc::new(mock), &config);
    let controller = Controller::with_config(config).unwrap();

    let summary = controller.run_with_service(&service, &input, &output).await.unwrap();

    assert_eq!(summary.to_string(), format!("Wrote {} with 10 keys", output.display()));
}
