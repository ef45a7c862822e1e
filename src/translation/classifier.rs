/*!
 * Eligibility of text values for translation.
 *
 * A value is translatable when it is non-empty, is not a reference key and
 * the configured `SourceDetector` says it is written in the source language.
 * The same classifier is used when extracting units and when merging
 * translations back, so both passes agree on which fields may change.
 */

use std::fmt::Debug;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::document::{DocumentNode, Field};

/// Leading character of direct text that names a lookup key instead of prose
pub const REFERENCE_PREFIX: char = '@';

/// Attribute that marks a whole node as a reference
pub const REFERENCE_ATTRIBUTE: &str = "isRef";

/// Attribute values that do not mark a node as a reference
const FALSY_VALUES: [&str; 4] = ["false", "0", "no", "off"];

/// Any letter of the Russian alphabet, either case
static CYRILLIC_LETTER: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)[а-яё]").unwrap());

/// Decides whether a text still needs translation
pub trait SourceDetector: Send + Sync + Debug {
    fn needs_translation(&self, text: &str) -> bool;
}

/// Detects text containing at least one Cyrillic letter
#[derive(Debug, Default, Clone, Copy)]
pub struct CyrillicDetector;

impl SourceDetector for CyrillicDetector {
    fn needs_translation(&self, text: &str) -> bool {
        CYRILLIC_LETTER.is_match(text)
    }
}

/// Detects text matching a user-supplied regular expression
#[derive(Debug, Clone)]
pub struct PatternDetector {
    pattern: Regex,
}

impl PatternDetector {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
        })
    }
}

impl SourceDetector for PatternDetector {
    fn needs_translation(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }
}

/// Which kind of field a candidate value comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Attribute,
}

impl From<&Field> for FieldKind {
    fn from(field: &Field) -> Self {
        match field {
            Field::Text => Self::Text,
            Field::Attribute(_) => Self::Attribute,
        }
    }
}

/// Where a candidate value sits in the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CandidateContext {
    /// Direct text or attribute value
    pub kind: FieldKind,
    /// Whether the owning node is marked as a reference
    pub owner_is_reference: bool,
}

impl CandidateContext {
    pub fn for_node(node: &DocumentNode, kind: FieldKind) -> Self {
        Self {
            kind,
            owner_is_reference: is_reference_node(node),
        }
    }
}

/// True when the node carries a truthy `isRef` attribute
pub fn is_reference_node(node: &DocumentNode) -> bool {
    node.attributes
        .get(REFERENCE_ATTRIBUTE)
        .is_some_and(is_truthy)
}

fn is_truthy(value: &str) -> bool {
    let value = value.trim();
    !value.is_empty()
        && !FALSY_VALUES
            .iter()
            .any(|falsy| value.eq_ignore_ascii_case(falsy))
}

/// Eligibility predicate for translation candidates
#[derive(Debug)]
pub struct TextClassifier {
    detector: Box<dyn SourceDetector>,
}

impl Default for TextClassifier {
    fn default() -> Self {
        Self::new(Box::new(CyrillicDetector))
    }
}

impl TextClassifier {
    pub fn new(detector: Box<dyn SourceDetector>) -> Self {
        Self { detector }
    }

    /// Classifier for an optional configured pattern; Cyrillic detection otherwise
    pub fn from_pattern(pattern: Option<&str>) -> Result<Self, regex::Error> {
        match pattern {
            Some(pattern) => Ok(Self::new(Box::new(PatternDetector::new(pattern)?))),
            None => Ok(Self::default()),
        }
    }

    /// Whether a candidate value should be translated
    pub fn is_eligible(&self, candidate: Option<&str>, context: CandidateContext) -> bool {
        let Some(text) = candidate else {
            return false;
        };
        if text.is_empty() {
            return false;
        }
        if context.kind == FieldKind::Text && text.starts_with(REFERENCE_PREFIX) {
            return false;
        }
        if context.owner_is_reference {
            return false;
        }
        self.detector.needs_translation(text)
    }
}
