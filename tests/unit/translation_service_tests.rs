/*!
 * Tests for the per-value translation service
 */

use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

use locale_translator::providers::mock::MockProvider;
use locale_translator::translation::{RetryPolicy, ValueOutcome};
use locale_translator::{LocaleTable, TranslationService};

use crate::common;

/// Echoes the request text unchanged, like a service that leaves tokens alone
fn echo(request: &locale_translator::providers::mock::MockRequest) -> String {
    request.text.clone()
}

#[tokio::test]
async fn test_translateText_withPlaceholder_shouldKeepPlaceholderVerbatim() {
    let mock = MockProvider::working();
    let service = common::mock_service(&mock);

    let translated = service.translate_text("Login via {provider} now").await;

    assert_eq!(translated, "[de] Login via {provider} now");
    assert_eq!(mock.requests()[0].text, "Login via __P0__ now");
}

#[tokio::test]
async fn test_translateText_withMarkupAndBrand_shouldKeepSpansVerbatim() {
    let mock = MockProvider::working();
    let service = common::mock_service(&mock);

    let translated = service.translate_text("<b>Home Assistant</b> required").await;

    assert!(translated.contains("<b>"));
    assert!(translated.contains("</b>"));
    assert!(translated.contains("Home Assistant"));
    assert_eq!(mock.requests()[0].text, "__H0____B2____H1__ required");
}

#[tokio::test]
async fn test_translateText_withPlaceholderInsideTag_shouldRestoreBoth() {
    let mock = MockProvider::working().with_custom_response(echo);
    let service = common::mock_service(&mock);

    let text = "Open <a href=\"{url}\">Sonos</a> settings";
    let translated = service.translate_text(text).await;

    assert_eq!(translated, text);
}

#[tokio::test]
async fn test_translateText_withEchoProvider_shouldBeIdentity() {
    let mock = MockProvider::working().with_custom_response(echo);
    let service = common::mock_service(&mock);

    for text in [
        "Plain text",
        "{count} items in {room}",
        "Use OAuth2 with Home Assistant and Tunet",
        "<i>{name}</i> joined Nordpool",
        "Sonos, Sonos and more Sonos",
    ] {
        assert_eq!(service.translate_text(text).await, text);
    }
}

#[tokio::test]
async fn test_translateText_withTokenLikeSourceText_shouldKeepItLiteral() {
    let mock = MockProvider::working().with_custom_response(echo);
    let service = common::mock_service(&mock);

    let translated = service.translate_text("Use __B0__ with Sonos").await;

    assert_eq!(translated, "Use __B0__ with Sonos");
    assert_eq!(mock.requests()[0].text, "Use __B0__ with ___B0___");
}

#[tokio::test]
async fn test_translateText_withTokenLikeSourceTextAndDroppedToken_shouldFallBack() {
    let mock = MockProvider::working().with_custom_response(|_| "Nutze __B0__ mit Sonos".to_string());
    let service = common::mock_service(&mock);

    let (translated, outcome) = service.translate_text_with_outcome("Use __B0__ with Sonos").await;

    assert_eq!(translated, "Use __B0__ with Sonos");
    assert_eq!(outcome, ValueOutcome::Fallback);
}

#[tokio::test]
async fn test_translateValue_withNonStringValues_shouldPassThrough() {
    let mock = MockProvider::working();
    let service = common::mock_service(&mock);

    for value in [json!(42), json!(true), json!(null), json!(["a"]), json!({"k": "v"})] {
        let (translated, outcome) = service.translate_value(&value).await;
        assert_eq!(translated, value);
        assert_eq!(outcome, ValueOutcome::Skipped);
    }

    assert_eq!(mock.request_count(), 0);
}

#[tokio::test]
async fn test_translateValue_withBlankStrings_shouldPassThrough() {
    let mock = MockProvider::working();
    let service = common::mock_service(&mock);

    for value in [json!(""), json!("   "), json!("\n\t")] {
        let (translated, outcome) = service.translate_value(&value).await;
        assert_eq!(translated, value);
        assert_eq!(outcome, ValueOutcome::Skipped);
    }

    assert_eq!(mock.request_count(), 0);
}

#[tokio::test]
async fn test_translateText_withDuplicateInput_shouldCallProviderOnce() {
    let mock = MockProvider::working();
    let service = common::mock_service(&mock);

    let (first, first_outcome) = service.translate_text_with_outcome("Save").await;
    let (second, second_outcome) = service.translate_text_with_outcome("Save").await;

    assert_eq!(first, second);
    assert_eq!(first_outcome, ValueOutcome::Translated);
    assert_eq!(second_outcome, ValueOutcome::Cached);
    assert_eq!(mock.request_count(), 1);
    assert_eq!(service.cache().stats().hits, 1);
}

#[tokio::test]
async fn test_translateText_withFailingProvider_shouldFallBackAfterThreeAttempts() {
    common::init_test_logger();
    let mock = MockProvider::failing();
    let service = common::mock_service(&mock);

    let (translated, outcome) = service.translate_text_with_outcome("Hello {name}").await;

    assert_eq!(translated, "Hello {name}");
    assert_eq!(outcome, ValueOutcome::Fallback);
    assert_eq!(mock.request_count(), 3);
}

#[tokio::test]
async fn test_translateText_afterFallback_shouldServeFallbackFromCache() {
    let mock = MockProvider::failing();
    let service = common::mock_service(&mock);

    service.translate_text("Hello").await;
    let (translated, outcome) = service.translate_text_with_outcome("Hello").await;

    assert_eq!(translated, "Hello");
    assert_eq!(outcome, ValueOutcome::Cached);
    assert_eq!(mock.request_count(), 3);
}

#[tokio::test]
async fn test_translateText_withTwoTransientFailures_shouldSucceedOnThirdAttempt() {
    let mock = MockProvider::fail_first(2);
    let service = common::mock_service(&mock);

    let (translated, outcome) = service.translate_text_with_outcome("Hello").await;

    assert_eq!(translated, "[de] Hello");
    assert_eq!(outcome, ValueOutcome::Translated);
    assert_eq!(mock.request_count(), 3);
}

#[tokio::test]
async fn test_translateText_withDroppedTokens_shouldRetryThenFallBack() {
    let mock = MockProvider::dropping_tokens();
    let service = common::mock_service(&mock);

    let (translated, outcome) = service.translate_text_with_outcome("Login via {provider} now").await;

    assert_eq!(translated, "Login via {provider} now");
    assert_eq!(outcome, ValueOutcome::Fallback);
    assert_eq!(mock.request_count(), 3);
}

#[tokio::test]
async fn test_translateText_withDroppedTokensAndLenientMode_shouldAcceptResponse() {
    let mock = MockProvider::dropping_tokens();
    let mut config = common::test_config();
    config.translation.common.strict_tokens = false;
    let service = TranslationService::with_provider(Arc::new(mock.clone()), &config);

    let (translated, outcome) = service.translate_text_with_outcome("Login via {provider} now").await;

    assert_eq!(translated, "[de] Login via  now");
    assert_eq!(outcome, ValueOutcome::Translated);
    assert_eq!(mock.request_count(), 1);
}

#[tokio::test]
async fn test_translateText_withoutTokens_shouldNotBeAffectedByStrictMode() {
    let mock = MockProvider::dropping_tokens();
    let service = common::mock_service(&mock);

    let (translated, outcome) = service.translate_text_with_outcome("Nothing to protect").await;

    assert_eq!(translated, "[de] Nothing to protect");
    assert_eq!(outcome, ValueOutcome::Translated);
}

#[tokio::test]
async fn test_withRetryPolicy_shouldOverrideAttemptBudget() {
    let mock = MockProvider::failing();
    let service = common::mock_service(&mock)
        .with_retry_policy(RetryPolicy::new(5, Duration::ZERO));

    service.translate_text("Hello").await;

    assert_eq!(mock.request_count(), 5);
}

#[tokio::test]
async fn test_translateTable_shouldKeepOrderAndCountOutcomes() {
    let mock = MockProvider::working();
    let service = common::mock_service(&mock);
    let table = LocaleTable::from_json_str(
        r#"{"z": "Save", "a": 7, "m": "Save", "b": "", "c": "Cancel"}"#,
    )
    .unwrap();

    let mut progress = Vec::new();
    let (translated, stats) = service
        .translate_table(&table, |completed, total| progress.push((completed, total)))
        .await;

    let keys: Vec<&str> = translated.iter().map(|(key, _)| key.as_str()).collect();
    assert_eq!(keys, vec!["z", "a", "m", "b", "c"]);
    assert_eq!(translated.get("z"), Some(&json!("[de] Save")));
    assert_eq!(translated.get("m"), Some(&json!("[de] Save")));
    assert_eq!(translated.get("a"), Some(&json!(7)));
    assert_eq!(translated.get("b"), Some(&json!("")));

    assert_eq!(stats.translated, 2);
    assert_eq!(stats.cached, 1);
    assert_eq!(stats.skipped, 2);
    assert_eq!(stats.fallbacks, 0);
    assert_eq!(stats.total(), 5);
    assert_eq!(progress.last(), Some(&(5, 5)));
    assert_eq!(mock.request_count(), 2);
}

#[test]
fn test_translateText_shouldSendConfiguredLanguages() {
    let mock = MockProvider::working();
    let mut config = common::test_config();
    config.target_language = "fr".to_string();
    let service = TranslationService::with_provider(Arc::new(mock.clone()), &config);

    let translated = tokio_test::block_on(service.translate_text("Hello"));

    assert_eq!(translated, "[fr] Hello");
    let request = &mock.requests()[0];
    assert_eq!(request.source_language, "en");
    assert_eq!(request.target_language, "fr");
    assert_eq!(service.provider_name(), "Mock");
}
