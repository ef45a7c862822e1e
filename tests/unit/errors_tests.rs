/*!
 * Tests for error types and their conversions
 */

use siq_translator::errors::{AppError, ArchiveError, DocumentError, ProviderError, TranslationError};
use siq_translator::translation::AlignmentReport;

#[test]
fn test_providerError_display_shouldIncludeDetails() {
    let error = ProviderError::ApiError {
        status_code: 503,
        message: "Service Unavailable".to_string(),
    };
    assert_eq!(error.to_string(), "API responded with error: 503 - Service Unavailable");

    let error = ProviderError::RateLimitExceeded("slow down".to_string());
    assert_eq!(error.to_string(), "Rate limit exceeded: slow down");
}

#[test]
fn test_documentError_display_shouldIncludePosition() {
    let error = DocumentError::Parse {
        position: 42,
        message: "element <round> is not closed".to_string(),
    };
    assert_eq!(
        error.to_string(),
        "Failed to parse document at byte 42: element <round> is not closed"
    );
}

#[test]
fn test_batchMisaligned_display_shouldReportLineCounts() {
    let sources = vec!["Кошка".to_string(), "Собака".to_string()];
    let translated = vec!["Cat".to_string()];
    let error = TranslationError::BatchMisaligned {
        batch: 3,
        expected: 2,
        received: 1,
        report: AlignmentReport::build(&sources, &translated),
    };

    assert_eq!(error.to_string(), "Batch 3 is misaligned: sent 2 lines, received 1");
}

#[test]
fn test_alignmentReport_shouldPadShorterSide() {
    let sources = vec!["Кошка".to_string(), "Собака".to_string()];
    let translated = vec!["Cat".to_string()];
    let report = AlignmentReport::build(&sources, &translated);

    assert_eq!(
        report.pairs,
        vec![
            ("Кошка".to_string(), "Cat".to_string()),
            ("Собака".to_string(), "[none]".to_string()),
        ]
    );
    assert_eq!(report.unmatched_positions(), vec![1]);
    assert!(report.to_string().contains("Собака -> [none]"));
}

#[test]
fn test_appError_fromProviderError_shouldWrap() {
    let error: AppError = ProviderError::ConnectionError("refused".to_string()).into();

    assert!(matches!(error, AppError::Provider(ProviderError::ConnectionError(_))));
    assert_eq!(error.to_string(), "Provider error: Connection error: refused");
}

#[test]
fn test_appError_fromTranslationError_shouldKeepVariant() {
    let error: AppError = TranslationError::Provider(ProviderError::RequestFailed("timeout".to_string())).into();

    assert!(matches!(error, AppError::Translation(TranslationError::Provider(_))));
}

#[test]
fn test_appError_fromIoError_shouldBecomeFileError() {
    let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "content.xml missing");
    let error: AppError = io_error.into();

    assert!(matches!(error, AppError::File(_)));
    assert!(error.to_string().contains("content.xml missing"));
}

#[test]
fn test_appError_fromArchiveError_shouldWrap() {
    let error: AppError = ArchiveError::InvalidPath("../evil".to_string()).into();

    assert!(matches!(error, AppError::Archive(ArchiveError::InvalidPath(_))));
    assert_eq!(error.to_string(), "Archive error: Invalid archive entry path: ../evil");
}

#[test]
fn test_appError_fromAnyhow_shouldBecomeUnknown() {
    let error: AppError = anyhow::anyhow!("something odd").into();

    assert!(matches!(error, AppError::Unknown(_)));
    assert_eq!(error.to_string(), "Unknown error: something odd");
}
