/*!
 * Language utilities for ISO language code handling.
 *
 * Validation and normalization of ISO 639-1 (2-letter) and ISO 639-2
 * (3-letter) language codes, plus the `auto` pseudo-code for service-side
 * source detection.
 */

use anyhow::{Result, anyhow};
use isolang::Language;

/// Pseudo-code asking the translation service to detect the source language
pub const AUTO_DETECT: &str = "auto";

/// Whether a code asks for automatic source detection
pub fn is_auto(code: &str) -> bool {
    code.trim().eq_ignore_ascii_case(AUTO_DETECT)
}

/// Map an ISO 639-2/B code to its ISO 639-2/T form, if the two differ
fn part2b_to_part2t(code: &str) -> Option<&'static str> {
    match code {
        "fre" => Some("fra"),
        "ger" => Some("deu"),
        "dut" => Some("nld"),
        "gre" => Some("ell"),
        "chi" => Some("zho"),
        "cze" => Some("ces"),
        "ice" => Some("isl"),
        "alb" => Some("sqi"),
        "arm" => Some("hye"),
        "baq" => Some("eus"),
        "bur" => Some("mya"),
        "per" => Some("fas"),
        "geo" => Some("kat"),
        "may" => Some("msa"),
        "mac" => Some("mkd"),
        "rum" => Some("ron"),
        "slo" => Some("slk"),
        "wel" => Some("cym"),
        _ => None,
    }
}

/// Normalize a language code to ISO 639-2/T (3-letter) format
pub fn normalize_to_part2t(code: &str) -> Result<String> {
    let normalized_code = code.trim().to_lowercase();

    match normalized_code.len() {
        2 => {
            if let Some(lang) = Language::from_639_1(&normalized_code) {
                return Ok(lang.to_639_3().to_string());
            }
        }
        3 => {
            if Language::from_639_3(&normalized_code).is_some() {
                return Ok(normalized_code);
            }
            if let Some(part2t) = part2b_to_part2t(&normalized_code) {
                return Ok(part2t.to_string());
            }
        }
        _ => {}
    }

    Err(anyhow!("Cannot normalize invalid language code: {}", code))
}

/// Normalize a language code to ISO 639-1 (2-letter) format if possible.
/// Falls back to ISO 639-2/T if no ISO 639-1 code exists.
///
/// Translation services expect the short form.
pub fn normalize_to_part1_or_part2t(code: &str) -> Result<String> {
    let part2t = normalize_to_part2t(code)?;
    let lang = Language::from_639_3(&part2t)
        .ok_or_else(|| anyhow!("Failed to get language from code: {}", part2t))?;

    Ok(lang.to_639_1().map(str::to_string).unwrap_or(part2t))
}

/// Get the language name from a code
pub fn get_language_name(code: &str) -> Result<String> {
    let normalized = normalize_to_part2t(code)?;
    let lang = Language::from_639_3(&normalized)
        .ok_or_else(|| anyhow!("Failed to get language from code: {}", normalized))?;

    Ok(lang.to_name().to_string())
}
