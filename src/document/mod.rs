/*!
 * Document model for pack content.
 *
 * The pack content file is a single element tree. This module provides:
 * - `model`: the owned tree (`DocumentNode`) and its field addressing
 * - `parser`: line-break normalization and XML parsing into the tree
 * - `serializer`: rendering the tree back to text
 * - `collector`: pre-order flattening of the tree
 */

pub mod collector;
pub mod model;
pub mod parser;
pub mod serializer;

// Re-export types used by other modules
pub use collector::collect_nodes;
pub use model::{Attributes, Document, DocumentNode, Field, NodeId};
pub use parser::{LINE_BREAK_SUBSTITUTE, normalize_line_breaks, parse};
pub use serializer::serialize;
