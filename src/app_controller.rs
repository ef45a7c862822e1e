use anyhow::{Context, Result, anyhow};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tempfile::TempDir;

use crate::app_config::Config;
use crate::archive;
use crate::errors::AppError;
use crate::file_utils::FileManager;
use crate::language_utils;
use crate::translation::{Pipeline, PipelineOptions, TextClassifier, TextTranslator, TranslationService};

// @module: Application controller for pack translation

/// Main application controller for pack translation
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    /// Create a new controller for test purposes with default configuration
    pub fn new_for_test() -> Result<Self> {
        Self::with_config(Config::default())
    }

    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Invalid configuration")?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Output path used when none is given: the input path with the configured suffix
    pub fn output_path_for(&self, input_file: &Path) -> PathBuf {
        FileManager::default_output_path(input_file, &self.config.pack.output_suffix)
    }

    /// Translate a pack with the configured translation provider.
    ///
    /// Returns the path of the written pack.
    pub async fn run(&self, input_file: PathBuf, output_file: Option<PathBuf>) -> Result<PathBuf> {
        let source_language = if language_utils::is_auto(&self.config.source_language) {
            language_utils::AUTO_DETECT.to_string()
        } else {
            language_utils::normalize_to_part1_or_part2t(&self.config.source_language)?
        };
        let target_language = language_utils::normalize_to_part1_or_part2t(&self.config.target_language)?;

        let service = TranslationService::new(self.config.translation.clone(), source_language, target_language)?;
        service.test_connection().await?;
        info!("Translating with {}", service.provider_label());

        self.run_with_translator(&input_file, output_file.as_deref(), &service)
            .await
    }

    /// Translate a pack with the given translator: unpack, translate the
    /// content document, repack.
    ///
    /// Nothing is written to the output path unless every step succeeds.
    pub async fn run_with_translator(
        &self,
        input_file: &Path,
        output_file: Option<&Path>,
        translator: &dyn TextTranslator,
    ) -> Result<PathBuf> {
        let start_time = Instant::now();

        if !FileManager::file_exists(input_file) {
            return Err(anyhow!("Input file does not exist: {:?}", input_file));
        }
        if !FileManager::is_zip_archive(input_file)? {
            return Err(anyhow!("Input file is not a pack archive: {:?}", input_file));
        }

        let output_path = output_file
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.output_path_for(input_file));
        info!("Destination file: {}", output_path.display());
        info!("Batch size: {}", self.config.pipeline.batch_size);

        let work_dir = TempDir::new().context("Failed to create working directory")?;
        info!("Unpacking to: {}", work_dir.path().display());
        let entries = archive::unpack(input_file, work_dir.path())
            .with_context(|| format!("Failed to unpack {:?}", input_file))?;
        debug!("Pack holds {} entries", entries);

        let content_path = work_dir.path().join(&self.config.pack.content_file);
        if !FileManager::file_exists(&content_path) {
            return Err(anyhow!(
                "Pack has no content file named {}",
                self.config.pack.content_file
            ));
        }
        let content = FileManager::read_to_string(&content_path)?;

        let classifier = TextClassifier::from_pattern(self.config.pipeline.source_pattern.as_deref())
            .map_err(|e| AppError::Config(format!("Invalid source pattern: {}", e)))?;
        let options = PipelineOptions::from_config(&self.config.pipeline)?;
        let pipeline = Pipeline::new(translator, classifier, options);

        let prepared = pipeline.prepare(&content)?;
        let mut api_duration = Duration::ZERO;

        if prepared.extraction.is_empty() {
            info!("No text needs translation, the content is left as is");
        } else {
            let total_batches = pipeline.batch_count(&prepared);
            info!(
                "Translating {} distinct texts ({} fields) in {} batches",
                prepared.extraction.units.len(),
                prepared.extraction.occurrences.len(),
                total_batches
            );

            let progress_bar = Self::batch_progress_bar(total_batches as u64);
            let pb = progress_bar.clone();
            let result = pipeline
                .translate_prepared(prepared, move |completed, _total| {
                    pb.set_position(completed as u64);
                })
                .await;
            progress_bar.finish_and_clear();

            let outcome = result?;
            api_duration = outcome.api_duration;
            FileManager::write_to_file(&content_path, &outcome.content)?;
            info!(
                "Merged {} translations into {} fields",
                outcome.units,
                outcome.merge.total()
            );
        }

        if let Some(parent) = output_path.parent() {
            FileManager::ensure_dir(parent)?;
        }
        let files = archive::repack(work_dir.path(), &output_path)
            .with_context(|| format!("Failed to write {:?}", output_path))?;
        debug!("Packed {} files", files);

        info!(
            "Translation complete in {} (translation service: {})",
            Self::format_duration(start_time.elapsed()),
            Self::format_duration(api_duration)
        );

        Ok(output_path)
    }

    fn batch_progress_bar(total: u64) -> ProgressBar {
        let progress_bar = ProgressBar::new(total);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} batches ({percent}%) {msg} {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(style.progress_chars("#>-"));
        progress_bar.set_message("Translating");
        progress_bar
    }

    // Format duration in a human-readable format
    pub fn format_duration(duration: Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
