// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{debug, info, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::PathBuf;

use locale_translator::app_config::{self, Config, TranslationProvider};
use locale_translator::file_utils::FileManager;
use locale_translator::Controller;

/// CLI Wrapper for TranslationProvider to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliTranslationProvider {
    Google,
    Ollama,
    Anthropic,
}

impl From<CliTranslationProvider> for TranslationProvider {
    fn from(cli_provider: CliTranslationProvider) -> Self {
        match cli_provider {
            CliTranslationProvider::Google => TranslationProvider::Google,
            CliTranslationProvider::Ollama => TranslationProvider::Ollama,
            CliTranslationProvider::Anthropic => TranslationProvider::Anthropic,
        }
    }
}

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate shell completions for locale-translator
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
    /// Write the default configuration to the --config path
    InitConfig {
        /// Replace an existing config file
        #[arg(long)]
        force: bool,
    },
}

/// locale-translator - machine translation for JSON localization files
///
/// Translates every string value of a flat JSON key/value file while keeping
/// placeholders, markup tags and brand names intact.
#[derive(Parser, Debug)]
#[command(name = "locale-translator")]
#[command(version)]
#[command(about = "Translate JSON localization files")]
#[command(long_about = "locale-translator translates the string values of a JSON localization file.

EXAMPLES:
    locale-translator                              # Translate de.json using the default config
    locale-translator en.json -o de.json -t de     # Explicit input, output and target language
    locale-translator -p ollama -m llama3.2:3b     # Use a local Ollama model
    locale-translator completions bash > lt.bash   # Generate bash completions
    locale-translator init-config                  # Write locale-translator.json with defaults

CONFIGURATION:
    Configuration is read from locale-translator.json by default. You can
    specify a different file with --config. If the config file doesn't exist,
    the built-in defaults are used and nothing is written. Run init-config to
    get an editable copy of the defaults.

SUPPORTED PROVIDERS:
    google    - Google Translate web endpoint (default, no key required)
    ollama    - Local Ollama server (default: llama3.2:3b)
    anthropic - Anthropic Claude API (requires API key)")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Localization file to translate
    #[arg(value_name = "INPUT", default_value = "de.json")]
    input: PathBuf,

    /// Output file (defaults to <input>_translated.json next to the input)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Source language code (e.g., 'en', 'es', 'fr')
    #[arg(short, long)]
    source_language: Option<String>,

    /// Target language code (e.g., 'en', 'es', 'fr')
    #[arg(short, long)]
    target_language: Option<String>,

    /// Translation provider to use
    #[arg(short, long, value_enum)]
    provider: Option<CliTranslationProvider>,

    /// Model name to use for translation
    #[arg(short, long)]
    model: Option<String>,

    /// Configuration file path
    #[arg(short, long = "config", default_value = "locale-translator.json")]
    config_path: PathBuf,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation; filtering follows `log::max_level()`
struct CustomLogger;

impl CustomLogger {
    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(CustomLogger))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji for log level
    fn get_emoji_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "❌ ",
            Level::Warn => "🚧 ",
            Level::Info => " ",
            Level::Debug => "🔍 ",
            Level::Trace => "📋 ",
        }
    }

    // @returns: ANSI colour code for log level
    fn get_color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "1;31",
            Level::Warn => "1;33",
            Level::Info => "1;32",
            Level::Debug => "1;36",
            Level::Trace => "1;35",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let level = record.level();

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "\x1B[{}m{} {} {}\x1B[0m",
                Self::get_color_for_level(level),
                now,
                Self::get_emoji_for_level(level),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Info until the config is known; the level is adjusted after loading it
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "locale-translator", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::InitConfig { force }) => {
            Config::default().write_to(&cli.config_path, force)?;
            info!("Wrote default config to {:?}", cli.config_path);
            Ok(())
        }
        None => run_translate(cli).await,
    }
}

async fn run_translate(options: CommandLineOptions) -> Result<()> {
    if let Some(cmd_log_level) = &options.log_level {
        let level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let (mut config, found) = Config::load_or_default(&options.config_path)?;
    if !found {
        debug!("No config file at {:?}, using built-in defaults", options.config_path);
    }

    apply_cli_overrides(&mut config, &options);
    log::set_max_level(config.log_level.to_level_filter());

    config.validate().context("Invalid configuration")?;

    let output = options.output.clone()
        .unwrap_or_else(|| FileManager::generate_output_path(&options.input, "translated"));

    info!("Translating {:?} -> {:?}", options.input, output);

    let controller = Controller::with_config(config)?;
    let summary = controller.run(&options.input, &output).await?;

    // Printed regardless of the log level
    println!("{}", summary);

    Ok(())
}

/// Override file configuration with values given on the command line
fn apply_cli_overrides(config: &mut Config, options: &CommandLineOptions) {
    if let Some(provider) = &options.provider {
        config.translation.provider = provider.clone().into();
    }

    if let Some(model) = &options.model {
        config.translation.active_provider_config_mut().model = model.clone();
    }

    if let Some(source_lang) = &options.source_language {
        config.source_language = source_lang.clone();
    }

    if let Some(target_lang) = &options.target_language {
        config.target_language = target_lang.clone();
    }

    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }
}
