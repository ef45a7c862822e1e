/*!
 * Merging translations back into the document tree.
 *
 * Substitution is scoped to single fields: a node's direct text or one
 * attribute value is replaced only when the whole value is a key of the
 * translation map and the value is still eligible. Nodes and attributes are
 * never added, removed or reordered.
 */

use log::trace;

use crate::document::DocumentNode;

use super::batch::TranslationMap;
use super::classifier::{CandidateContext, FieldKind, TextClassifier, is_reference_node};

/// Number of substituted fields by kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    /// Direct texts replaced
    pub texts: usize,
    /// Attribute values replaced
    pub attributes: usize,
}

impl MergeStats {
    pub fn total(&self) -> usize {
        self.texts + self.attributes
    }
}

/// Apply `map` to every eligible field of the tree rooted at `root`
pub fn merge(root: &mut DocumentNode, map: &TranslationMap, classifier: &TextClassifier) -> MergeStats {
    let mut stats = MergeStats::default();
    if !map.is_empty() {
        merge_node(root, map, classifier, &mut stats);
    }
    stats
}

fn merge_node(
    node: &mut DocumentNode,
    map: &TranslationMap,
    classifier: &TextClassifier,
    stats: &mut MergeStats,
) {
    // Decided before any attribute of the node changes
    let owner_is_reference = is_reference_node(node);

    let text_context = CandidateContext {
        kind: FieldKind::Text,
        owner_is_reference,
    };
    if classifier.is_eligible(node.text.as_deref(), text_context) {
        let replacement = node.text.as_deref().and_then(|text| map.get(text));
        if let Some(replacement) = replacement {
            trace!("<{}> text -> {}", node.tag, replacement);
            node.text = Some(replacement.clone());
            stats.texts += 1;
        }
    }

    let attribute_context = CandidateContext {
        kind: FieldKind::Attribute,
        owner_is_reference,
    };
    for (name, value) in node.attributes.iter_mut() {
        if !classifier.is_eligible(Some(value.as_str()), attribute_context) {
            continue;
        }
        if let Some(replacement) = map.get(value.as_str()) {
            trace!("<{}> @{} -> {}", node.tag, name, replacement);
            *value = replacement.clone();
            stats.attributes += 1;
        }
    }

    for child in &mut node.children {
        merge_node(child, map, classifier, stats);
    }
}
