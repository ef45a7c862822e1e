/*!
 * Extraction, batching and merge for one content document.
 *
 * The pipeline parses the content, extracts the deduplicated units, has them
 * translated batch by batch and only then merges the completed translation
 * map into the tree and serializes it. A failure at any step leaves nothing
 * half-translated behind: the caller gets an error and no content.
 */

use std::num::NonZeroUsize;
use std::time::Duration;

use log::{debug, info};

use crate::app_config::PipelineConfig;
use crate::document::{self, Document};
use crate::errors::AppError;

use super::batch::{BatchTranslator, DEFAULT_BATCH_SIZE};
use super::classifier::TextClassifier;
use super::core::TextTranslator;
use super::extractor::{Extraction, extract_units};
use super::merge::{MergeStats, merge};

/// Batching settings of a pipeline run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineOptions {
    /// Maximum number of units per request
    pub batch_size: NonZeroUsize,
    /// Pause after every request
    pub pacing_delay: Duration,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            batch_size: NonZeroUsize::new(DEFAULT_BATCH_SIZE).unwrap_or(NonZeroUsize::MIN),
            pacing_delay: Duration::from_millis(100),
        }
    }
}

impl PipelineOptions {
    pub fn from_config(config: &PipelineConfig) -> Result<Self, AppError> {
        let batch_size = NonZeroUsize::new(config.batch_size)
            .ok_or_else(|| AppError::Config("Batch size must be a positive number".to_string()))?;

        Ok(Self {
            batch_size,
            pacing_delay: Duration::from_millis(config.pacing_delay_ms),
        })
    }
}

/// A parsed document and the units extracted from it
#[derive(Debug, Clone)]
pub struct PreparedDocument {
    pub document: Document,
    pub extraction: Extraction,
}

/// Result of a pipeline run
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    /// The translated content
    pub content: String,
    /// Number of distinct values sent for translation
    pub units: usize,
    /// Number of eligible fields, duplicates included
    pub occurrences: usize,
    /// Number of requests made
    pub batches: usize,
    /// Fields substituted during the merge
    pub merge: MergeStats,
    /// Time spent waiting for the translation service
    pub api_duration: Duration,
}

/// Translation pipeline over a single content document
pub struct Pipeline<'a> {
    translator: &'a dyn TextTranslator,
    classifier: TextClassifier,
    options: PipelineOptions,
}

impl<'a> Pipeline<'a> {
    pub fn new(translator: &'a dyn TextTranslator, classifier: TextClassifier, options: PipelineOptions) -> Self {
        Self {
            translator,
            classifier,
            options,
        }
    }

    fn batch_translator(&self) -> BatchTranslator<'a> {
        BatchTranslator::new(self.translator, self.options.batch_size, self.options.pacing_delay)
    }

    /// Normalize, parse and extract the units of `content`
    pub fn prepare(&self, content: &str) -> Result<PreparedDocument, AppError> {
        let normalized = document::normalize_line_breaks(content);
        let document = document::parse(&normalized)?;

        let nodes = document::collect_nodes(Some(&document.root));
        let extraction = extract_units(&nodes, &self.classifier);
        debug!(
            "Collected {} nodes, {} eligible fields, {} distinct units",
            nodes.len(),
            extraction.occurrences.len(),
            extraction.units.len()
        );
        for unit in extraction.by_length_desc() {
            debug!("Will translate {} ({})", unit.value, unit.origin.field);
        }

        Ok(PreparedDocument { document, extraction })
    }

    /// Number of requests needed to translate a prepared document
    pub fn batch_count(&self, prepared: &PreparedDocument) -> usize {
        self.batch_translator().batch_count(prepared.extraction.units.len())
    }

    /// Translate the units of a prepared document and merge them into it.
    ///
    /// `progress` is called with `(completed, total)` batches.
    pub async fn translate_prepared(
        &self,
        prepared: PreparedDocument,
        progress: impl FnMut(usize, usize),
    ) -> Result<PipelineOutcome, AppError> {
        let PreparedDocument {
            mut document,
            extraction,
        } = prepared;

        let outcome = self
            .batch_translator()
            .translate_units(&extraction.units, progress)
            .await?;

        let stats = merge(&mut document.root, &outcome.translations, &self.classifier);
        let content = document::serialize(&document)?;
        info!(
            "Substituted {} texts and {} attribute values",
            stats.texts, stats.attributes
        );

        Ok(PipelineOutcome {
            content,
            units: extraction.units.len(),
            occurrences: extraction.occurrences.len(),
            batches: outcome.batches,
            merge: stats,
            api_duration: outcome.api_duration,
        })
    }

    /// Run the whole pipeline over `content`.
    ///
    /// Content without any eligible field is returned as given.
    pub async fn translate_content(
        &self,
        content: &str,
        progress: impl FnMut(usize, usize),
    ) -> Result<PipelineOutcome, AppError> {
        let prepared = self.prepare(content)?;
        if prepared.extraction.is_empty() {
            info!("Nothing to translate");
            return Ok(PipelineOutcome {
                content: content.to_string(),
                units: 0,
                occurrences: 0,
                batches: 0,
                merge: MergeStats::default(),
                api_duration: Duration::ZERO,
            });
        }

        self.translate_prepared(prepared, progress).await
    }
}
