/*!
 * Batch translation processing.
 *
 * Units are partitioned into fixed-size batches and submitted one batch at a
 * time, in order, as a single line-delimited text. The service must answer
 * with exactly one line per submitted line; anything else aborts the run
 * before a single field of the document is touched.
 */

use std::collections::HashMap;
use std::fmt;
use std::num::NonZeroUsize;
use std::time::{Duration, Instant};

use log::{debug, error, warn};

use crate::errors::TranslationError;

use super::core::TextTranslator;
use super::extractor::TranslationUnit;
use super::formatting::FormatPreserver;

/// Default number of units per request
pub const DEFAULT_BATCH_SIZE: usize = 10;

/// Separator between lines of a request and of its response
pub const LINE_SEPARATOR: &str = "\n";

/// Stand-in for a line that is missing on one side of an alignment report
pub const MISSING_LINE_PLACEHOLDER: &str = "[none]";

/// Source text to translated text, one entry per distinct source value
pub type TranslationMap = HashMap<String, String>;

/// Split items into consecutive batches of at most `batch_size`, keeping order
pub fn partition<T>(items: &[T], batch_size: NonZeroUsize) -> Vec<&[T]> {
    items.chunks(batch_size.get()).collect()
}

/// Positional pairing of submitted and returned lines of a batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignmentReport {
    /// `(source, translated)` per position; the shorter side is padded
    /// with [`MISSING_LINE_PLACEHOLDER`]
    pub pairs: Vec<(String, String)>,
}

impl AlignmentReport {
    pub fn build(sources: &[String], translated: &[String]) -> Self {
        let len = sources.len().max(translated.len());
        let line_at = |lines: &[String], index: usize| {
            lines
                .get(index)
                .cloned()
                .unwrap_or_else(|| MISSING_LINE_PLACEHOLDER.to_string())
        };

        Self {
            pairs: (0..len)
                .map(|index| (line_at(sources, index), line_at(translated, index)))
                .collect(),
        }
    }

    /// Positions that have no counterpart on the other side
    pub fn unmatched_positions(&self) -> Vec<usize> {
        self.pairs
            .iter()
            .enumerate()
            .filter(|(_, (source, translated))| {
                source == MISSING_LINE_PLACEHOLDER || translated == MISSING_LINE_PLACEHOLDER
            })
            .map(|(index, _)| index)
            .collect()
    }
}

impl fmt::Display for AlignmentReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, (source, translated)) in self.pairs.iter().enumerate() {
            writeln!(f, "{:>4}: {} -> {}", index + 1, source, translated)?;
        }
        Ok(())
    }
}

/// Result of translating all batches
#[derive(Debug, Clone, Default)]
pub struct BatchOutcome {
    /// Completed map for every submitted unit
    pub translations: TranslationMap,
    /// Number of requests made
    pub batches: usize,
    /// Time spent waiting for the service
    pub api_duration: Duration,
}

/// Sequential, paced batch translator
pub struct BatchTranslator<'a> {
    /// The translation service to use
    translator: &'a dyn TextTranslator,

    /// Maximum number of units per request
    batch_size: NonZeroUsize,

    /// Pause after every request
    pacing_delay: Duration,
}

impl<'a> BatchTranslator<'a> {
    pub fn new(translator: &'a dyn TextTranslator, batch_size: NonZeroUsize, pacing_delay: Duration) -> Self {
        Self {
            translator,
            batch_size,
            pacing_delay,
        }
    }

    /// Number of requests needed for `units` units
    pub fn batch_count(&self, units: usize) -> usize {
        units.div_ceil(self.batch_size.get())
    }

    /// Translate all units, batch by batch.
    ///
    /// `progress` is called with `(completed, total)` after each batch.
    /// The map is only returned once every batch has come back aligned.
    pub async fn translate_units(
        &self,
        units: &[TranslationUnit],
        mut progress: impl FnMut(usize, usize),
    ) -> Result<BatchOutcome, TranslationError> {
        let batches = partition(units, self.batch_size);
        let total = batches.len();
        let mut outcome = BatchOutcome {
            translations: TranslationMap::with_capacity(units.len()),
            batches: total,
            api_duration: Duration::ZERO,
        };

        for (index, batch) in batches.into_iter().enumerate() {
            let sources: Vec<String> = batch
                .iter()
                .map(|unit| FormatPreserver::wire_form(&unit.value))
                .collect();
            let request = sources.join(LINE_SEPARATOR);

            debug!("Submitting batch {} of {} ({} lines)", index + 1, total, sources.len());
            let started = Instant::now();
            let response = self.translator.translate_text(&request).await?;
            outcome.api_duration += started.elapsed();

            let lines = split_response(&response);
            if lines.len() != sources.len() {
                let report = AlignmentReport::build(&sources, &lines);
                for (source, translated) in &report.pairs {
                    debug!("{} -> {}", source, translated);
                }
                error!(
                    "Batch {} of {} came back with {} lines instead of {}",
                    index + 1,
                    total,
                    lines.len(),
                    sources.len()
                );
                return Err(TranslationError::BatchMisaligned {
                    batch: index + 1,
                    expected: sources.len(),
                    received: lines.len(),
                    report,
                });
            }

            for (unit, line) in batch.iter().zip(lines) {
                let translated = if line.trim().is_empty() {
                    warn!("Empty translation for '{}', keeping the source text", unit.value.trim());
                    unit.value.clone()
                } else {
                    FormatPreserver::restore_padding(&unit.value, &line)
                };
                debug!("Translated {} -> {}", unit.value.trim(), translated.trim());
                outcome.translations.insert(unit.value.clone(), translated);
            }

            progress(index + 1, total);
            tokio::time::sleep(self.pacing_delay).await;
        }

        Ok(outcome)
    }
}

/// Split a response into lines; one trailing line break is ignored
fn split_response(response: &str) -> Vec<String> {
    response
        .strip_suffix(LINE_SEPARATOR)
        .unwrap_or(response)
        .split(LINE_SEPARATOR)
        .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
        .collect()
}
