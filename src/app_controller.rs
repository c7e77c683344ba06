use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::app_config::Config;
use crate::locale_file::LocaleTable;
use crate::translation::{ManualOverrides, TranslationService, TranslationStats};

// @module: Application controller for localization file translation

/// What a completed run produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    // @field: Keys written to the output file
    pub keys: usize,
    // @field: Per-value outcome counters
    pub stats: TranslationStats,
    // @field: Values changed by the override pass
    pub overridden: usize,
    // @field: Output file location
    pub output: PathBuf,
}

// Final report line of a successful run
impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Wrote {} with {} keys", self.output.display(), self.keys)
    }
}

/// Main application controller for localization translation
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        Ok(Self { config })
    }

    /// Translate `input` with the configured provider and write the result to `output`
    pub async fn run(&self, input: &Path, output: &Path) -> Result<RunSummary> {
        let service = TranslationService::new(&self.config)
            .context("Failed to create translation service")?;
        self.run_with_service(&service, input, output).await
    }

    /// Translate `input` with an existing service and write the result to `output`
    ///
    /// The output file is written only once every value has been processed.
    pub async fn run_with_service(
        &self,
        service: &TranslationService,
        input: &Path,
        output: &Path,
    ) -> Result<RunSummary> {
        let start_time = std::time::Instant::now();

        let source = LocaleTable::load(input)?;
        info!(
            "Loaded {} keys ({} translatable) from {:?}",
            source.len(),
            source.translatable_count(),
            input
        );

        info!(
            "🚀 {} -> {} via {}",
            self.config.source_language,
            self.config.target_language,
            service.provider_name()
        );

        let progress_bar = ProgressBar::new(source.len() as u64);
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} keys ({percent}%) {msg} {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(template_result.progress_chars("█▓▒░"));
        progress_bar.set_message("Translating");

        let pb = progress_bar.clone();
        let (mut translated, stats) = service
            .translate_table(&source, move |completed, _total| {
                pb.set_position(completed as u64);
            })
            .await;
        progress_bar.finish_and_clear();

        if stats.fallbacks > 0 {
            warn!("{} value(s) kept their source text after failed translation attempts", stats.fallbacks);
        }

        let overrides = ManualOverrides::new(self.config.manual_overrides.clone());
        let overridden = overrides.apply(&mut translated);
        if overridden > 0 {
            info!("Applied {} manual override(s)", overridden);
        }

        translated.save(output)
            .with_context(|| format!("Failed to write output file: {:?}", output))?;

        info!(
            "{} translated, {} cached, {} fallback, {} skipped in {}",
            stats.translated,
            stats.cached,
            stats.fallbacks,
            stats.skipped,
            Self::format_duration(start_time.elapsed())
        );

        Ok(RunSummary {
            keys: translated.len(),
            stats,
            overridden,
            output: output.to_path_buf(),
        })
    }

    // Format duration in a human-readable format
    fn format_duration(duration: std::time::Duration) -> String {
        let total_seconds = duration.as_secs();
        let minutes = total_seconds / 60;
        let seconds = total_seconds % 60;

        if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
