/*!
 * # locale-translator
 *
 * A Rust library for machine translation of JSON localization files.
 *
 * ## Features
 *
 * - Translate every string value of a flat JSON key/value file
 * - Protect placeholders (`{name}`), markup tags (`<b>`) and brand terms
 *   from the translation service by masking them with opaque tokens
 * - Translate values through various providers:
 *   - Google Translate web endpoint
 *   - Ollama (local LLM)
 *   - Anthropic API
 * - Bounded retries with a fixed delay and a fallback to the source text
 * - Per-run cache so repeated source strings are translated once
 * - Manual post-translation overrides for known bad translations
 * - ISO 639-1 and ISO 639-2 language code support
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `locale_file`: Localization table loading and saving
 * - `translation`: Translation pipeline:
 *   - `translation::core`: Per-value translation service
 *   - `translation::masking`: Protected span masking
 *   - `translation::retry`: Retry policy
 *   - `translation::cache`: Run cache
 *   - `translation::overrides`: Manual override pass
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `language_utils`: ISO language code utilities
 * - `providers`: Client implementations for translation services
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod file_utils;
pub mod locale_file;
pub mod translation;
pub mod app_controller;
pub mod language_utils;
pub mod providers;
pub mod errors;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::{Controller, RunSummary};
pub use locale_file::LocaleTable;
pub use translation::TranslationService;
pub use language_utils::{language_codes_match, normalize_to_part2t, get_language_name};
pub use errors::{AppError, ProviderError, TranslationError};
