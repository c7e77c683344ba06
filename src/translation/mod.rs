/*!
 * Translation of localization values through an external provider.
 *
 * - `core`: the translation service (cache, masking, retries, fallback)
 * - `masking`: protected span masking and token restoration
 * - `retry`: bounded fixed-delay retry policy
 * - `cache`: per-run translation cache
 * - `overrides`: manual corrections applied after translation
 */

// Re-export main types for easier usage
pub use self::cache::TranslationCache;
pub use self::core::{TranslationService, TranslationStats, ValueOutcome};
pub use self::masking::{MaskedText, Masker, Token, TokenKind, TokenMap};
pub use self::overrides::ManualOverrides;
pub use self::retry::{AttemptOutcome, RetryPolicy, RetryResult};

// Submodules
pub mod cache;
pub mod core;
pub mod masking;
pub mod overrides;
pub mod retry;
