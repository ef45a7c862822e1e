// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result, anyhow};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, info, warn};
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

use siq_translator::app_config::{self, Config, TranslationProvider};
use siq_translator::app_controller::Controller;

/// CLI Wrapper for TranslationProvider to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliTranslationProvider {
    Google,
    Ollama,
}

impl From<CliTranslationProvider> for TranslationProvider {
    fn from(cli_provider: CliTranslationProvider) -> Self {
        match cli_provider {
            CliTranslationProvider::Google => TranslationProvider::Google,
            CliTranslationProvider::Ollama => TranslationProvider::Ollama,
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

fn level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate shell completions for siq-translator
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Batch size must be a positive integer
fn parse_batch_size(value: &str) -> Result<usize, String> {
    match value.parse::<usize>() {
        Ok(0) => Err("batch size must be at least 1".to_string()),
        Ok(size) => Ok(size),
        Err(e) => Err(format!("invalid batch size '{}': {}", value, e)),
    }
}

#[derive(Args, Debug)]
struct TranslateArgs {
    /// Pack to be translated
    #[arg(value_name = "INPUT")]
    input_file: Option<PathBuf>,

    /// Output file (default: <INPUT>.translation.siq)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Verbose output, lists every text and its translation (spoiler alert)
    #[arg(short, long)]
    verbose: bool,

    /// Number of texts sent per translation request
    #[arg(short, long, value_parser = parse_batch_size)]
    batch_size: Option<usize>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Translation provider to use
    #[arg(short, long, value_enum)]
    provider: Option<CliTranslationProvider>,

    /// Model name to use for LLM providers
    #[arg(short, long)]
    model: Option<String>,

    /// Source language code (e.g., 'ru'), or 'auto'
    #[arg(short, long)]
    source_language: Option<String>,

    /// Target language code (e.g., 'en', 'es', 'fr')
    #[arg(short, long)]
    target_language: Option<String>,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// SIQ Translator - translate SIGame question packs
///
/// Extracts the Russian text of a pack's questions, answers and names,
/// translates it in batches and writes a new pack with the same structure.
#[derive(Parser, Debug)]
#[command(name = "siq-translator")]
#[command(version)]
#[command(about = "Translate the text of SIGame question packs")]
#[command(args_conflicts_with_subcommands = true)]
#[command(long_about = "siq-translator unpacks a SIGame pack (.siq), translates every text and attribute \
value written in the source language, and packs the result into a new archive.

EXAMPLES:
    siq-translator quiz.siq                        # Writes quiz.siq.translation.siq
    siq-translator -o quiz_en.siq quiz.siq         # Choose the output file
    siq-translator -b 20 -v quiz.siq               # Bigger batches, debug output
    siq-translator -p ollama -m llama3 quiz.siq    # Translate with a local LLM
    siq-translator completions bash > siq.bash     # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    translate: TranslateArgs,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        // The logger lets everything through; the max level does the filtering
        let logger = Box::new(CustomLogger::new(LevelFilter::Trace));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%Y-%m-%dT%H:%M:%S");
            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} [{}] {}\x1B[0m",
                Self::color_for_level(record.level()),
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Info by default; the level is updated once the options and config are known
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "siq-translator", &mut std::io::stdout());
            Ok(())
        }
        None => run_translate(cli.translate).await,
    }
}

/// Load the configuration file, or write a default one when it does not exist
fn load_or_create_config(config_path: &str) -> Result<Config> {
    if Path::new(config_path).exists() {
        let file = File::open(config_path)
            .context(format!("Failed to open config file: {}", config_path))?;
        let reader = BufReader::new(file);
        let config: Config = serde_json::from_reader(reader)
            .context(format!("Failed to parse config file: {}", config_path))?;
        Ok(config)
    } else {
        warn!("Config file not found at '{}', creating default config.", config_path);
        let config = Config::default();

        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;
        std::fs::write(config_path, config_json)
            .context(format!("Failed to write default config to file: {}", config_path))?;

        Ok(config)
    }
}

/// Apply command line overrides on top of the loaded configuration
fn apply_overrides(config: &mut Config, options: &TranslateArgs) {
    if let Some(provider) = &options.provider {
        config.translation.provider = provider.clone().into();
    }

    if let Some(model) = &options.model {
        let provider_str = config.translation.provider.to_lowercase_string();
        if let Some(provider_config) = config
            .translation
            .available_providers
            .iter_mut()
            .find(|p| p.provider_type == provider_str)
        {
            provider_config.model = model.clone();
        }
    }

    if let Some(source_lang) = &options.source_language {
        config.source_language = source_lang.clone();
    }

    if let Some(target_lang) = &options.target_language {
        config.target_language = target_lang.clone();
    }

    if let Some(batch_size) = options.batch_size {
        config.pipeline.batch_size = batch_size;
    }

    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    } else if options.verbose {
        config.log_level = app_config::LogLevel::Debug;
    }
}

async fn run_translate(options: TranslateArgs) -> Result<()> {
    let input_file = options
        .input_file
        .clone()
        .ok_or_else(|| anyhow!("INPUT is required when no subcommand is specified"))?;

    let mut config = load_or_create_config(&options.config_path)?;
    apply_overrides(&mut config, &options);
    log::set_max_level(level_filter(&config.log_level));

    config.validate().context("Configuration validation failed")?;

    let controller = Controller::with_config(config)?;
    let output = controller.run(input_file, options.output.clone()).await?;

    info!("Translated pack written to {}", output.display());
    Ok(())
}
