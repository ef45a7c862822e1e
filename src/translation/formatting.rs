/*!
 * Format preservation for translated text.
 *
 * Field values are sent to the translation service without their surrounding
 * whitespace and on a single line; the whitespace is put back around the
 * translated text so indentation in the content file survives.
 */

use crate::document::LINE_BREAK_SUBSTITUTE;

/// Format preserver for field values passing through the translation service
pub struct FormatPreserver;

impl FormatPreserver {
    /// Form of a value as sent in a line-delimited request: trimmed, with any
    /// remaining line breaks flattened.
    pub fn wire_form(value: &str) -> String {
        value
            .trim()
            .replace("\r\n", LINE_BREAK_SUBSTITUTE)
            .replace(['\r', '\n'], LINE_BREAK_SUBSTITUTE)
    }

    /// Surround the translated text with the original value's leading and
    /// trailing whitespace.
    pub fn restore_padding(original: &str, translated: &str) -> String {
        let leading = &original[..original.len() - original.trim_start().len()];
        let trailing = &original[original.trim_end().len()..];

        let mut result = String::with_capacity(leading.len() + translated.len() + trailing.len());
        result.push_str(leading);
        result.push_str(translated.trim());
        result.push_str(trailing);
        result
    }
}
