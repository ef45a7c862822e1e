/*!
 * Extraction of translation units from a flattened document.
 *
 * For every node the direct text and then each attribute value are offered
 * to the classifier. Eligible values are recorded as occurrences; the first
 * occurrence of each distinct value becomes a unit.
 */

use std::collections::HashSet;

use crate::document::{DocumentNode, Field, NodeId};

use super::classifier::{CandidateContext, FieldKind, TextClassifier, is_reference_node};

/// Location of a value in the tree
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Origin {
    /// Index of the owning node in the pre-order node list
    pub node: NodeId,
    /// Which field of the node holds the value
    pub field: Field,
}

/// A piece of extracted text and where it was found
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationUnit {
    /// Source text; never empty, always eligible
    pub value: String,
    /// Location of the (first) occurrence
    pub origin: Origin,
}

/// Result of scanning a node list
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    /// Distinct eligible values in first-occurrence order
    pub units: Vec<TranslationUnit>,
    /// Every eligible field in document order, duplicates included
    pub occurrences: Vec<TranslationUnit>,
}

impl Extraction {
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Units ordered longest first; ties keep extraction order.
    ///
    /// Only used for diagnostic output.
    pub fn by_length_desc(&self) -> Vec<&TranslationUnit> {
        let mut units: Vec<&TranslationUnit> = self.units.iter().collect();
        units.sort_by_key(|unit| std::cmp::Reverse(unit.value.chars().count()));
        units
    }
}

/// Collect the translatable values of a pre-order node list
pub fn extract_units(nodes: &[&DocumentNode], classifier: &TextClassifier) -> Extraction {
    let mut extraction = Extraction::default();
    let mut seen: HashSet<&str> = HashSet::new();

    for (id, &node) in nodes.iter().enumerate() {
        let owner_is_reference = is_reference_node(node);

        let text_context = CandidateContext {
            kind: FieldKind::Text,
            owner_is_reference,
        };
        if classifier.is_eligible(node.text.as_deref(), text_context) {
            if let Some(text) = node.text.as_deref() {
                record(&mut extraction, &mut seen, id, Field::Text, text);
            }
        }

        let attribute_context = CandidateContext {
            kind: FieldKind::Attribute,
            owner_is_reference,
        };
        for (name, value) in node.attributes.iter() {
            if classifier.is_eligible(Some(value), attribute_context) {
                record(
                    &mut extraction,
                    &mut seen,
                    id,
                    Field::Attribute(name.to_string()),
                    value,
                );
            }
        }
    }

    extraction
}

fn record<'a>(
    extraction: &mut Extraction,
    seen: &mut HashSet<&'a str>,
    node: NodeId,
    field: Field,
    value: &'a str,
) {
    let unit = TranslationUnit {
        value: value.to_string(),
        origin: Origin { node, field },
    };
    if seen.insert(value) {
        extraction.units.push(unit.clone());
    }
    extraction.occurrences.push(unit);
}
