/*!
 * Translation of pack content.
 *
 * This module contains the extraction, batching and merge pipeline. It is
 * split into several submodules:
 *
 * - `classifier`: which text values need translation
 * - `extractor`: deduplicated translation units of a document
 * - `batch`: batching and paced submission of units
 * - `core`: the translator seam and the provider-backed service
 * - `formatting`: whitespace and line handling around the service
 * - `merge`: field-scoped substitution into the tree
 * - `pipeline`: the steps above wired together for one document
 */

// Re-export main types for easier usage
pub use self::batch::{AlignmentReport, BatchTranslator, TranslationMap};
pub use self::classifier::{CyrillicDetector, PatternDetector, SourceDetector, TextClassifier};
pub use self::core::{TextTranslator, TranslationService};
pub use self::extractor::{Extraction, TranslationUnit, extract_units};
pub use self::merge::{MergeStats, merge};
pub use self::pipeline::{Pipeline, PipelineOptions, PipelineOutcome};

// Submodules
pub mod batch;
pub mod classifier;
pub mod core;
pub mod extractor;
pub mod formatting;
pub mod merge;
pub mod pipeline;
