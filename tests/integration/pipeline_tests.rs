/*!
 * Tests for the extraction, batching and merge pipeline over content documents
 */

use std::num::NonZeroUsize;
use std::time::Duration;

use siq_translator::document::normalize_line_breaks;
use siq_translator::errors::{AppError, TranslationError};
use siq_translator::providers::mock::MockProvider;
use siq_translator::translation::{Pipeline, PipelineOptions, TextClassifier};

use crate::common::{SAMPLE_CONTENT, init_logger};

/// Translations for every source value of the sample content
const SAMPLE_DICTIONARY: [(&str, &str); 6] = [
    ("Тестовый пакет", "Test pack"),
    ("Раунд 1", "Round 1"),
    ("Животные", "Animals"),
    ("Кто говорит мяу?", "Who says meow?"),
    ("Кошка", "Cat"),
    ("Да", "Yes"),
];

fn options(batch_size: usize) -> PipelineOptions {
    PipelineOptions {
        batch_size: NonZeroUsize::new(batch_size).unwrap(),
        pacing_delay: Duration::ZERO,
    }
}

fn sample_translated() -> String {
    normalize_line_breaks(SAMPLE_CONTENT)
        .replace(r#"name="Тестовый пакет""#, r#"name="Test pack""#)
        .replace(r#"name="Раунд 1""#, r#"name="Round 1""#)
        .replace(r#"name="Животные""#, r#"name="Animals""#)
        .replace(">Кто говорит мяу?<", ">Who says meow?<")
        .replace(">Кошка<", ">Cat<")
        .replace(">Да<", ">Yes<")
}

#[tokio::test]
async fn test_translateContent_withAttributeAndText_shouldTranslateBoth() {
    init_logger();
    let provider = MockProvider::dictionary([("Привет", "Hello"), ("мир", "world")]);
    let pipeline = Pipeline::new(&provider, TextClassifier::default(), options(10));

    let outcome = pipeline
        .translate_content(r#"<text name="Привет">мир</text>"#, |_, _| {})
        .await
        .unwrap();

    assert_eq!(outcome.content, r#"<text name="Hello">world</text>"#);
    assert_eq!(outcome.units, 2);
    assert_eq!(outcome.merge.attributes, 1);
    assert_eq!(outcome.merge.texts, 1);
}

#[tokio::test]
async fn test_translateContent_withReferenceNode_shouldLeaveItUntouched() {
    let provider = MockProvider::working();
    let pipeline = Pipeline::new(&provider, TextClassifier::default(), options(10));

    for content in [r#"<text isRef="true">Привет</text>"#, "<text>@intro</text>", "<text>@вступление</text>"] {
        let outcome = pipeline.translate_content(content, |_, _| {}).await.unwrap();

        assert_eq!(outcome.content, content);
        assert_eq!(outcome.units, 0);
    }
    assert_eq!(provider.request_count(), 0);
}

#[tokio::test]
async fn test_translateContent_withFalsyIsRef_shouldTranslate() {
    let provider = MockProvider::dictionary([("Привет", "Hello")]);
    let pipeline = Pipeline::new(&provider, TextClassifier::default(), options(10));

    let outcome = pipeline
        .translate_content(r#"<text isRef="false">Привет</text>"#, |_, _| {})
        .await
        .unwrap();

    assert_eq!(outcome.content, r#"<text isRef="false">Hello</text>"#);
}

#[tokio::test]
async fn test_translateContent_withDuplicateValues_shouldTranslateOnceAndApplyEverywhere() {
    let provider = MockProvider::dictionary([("Да", "Yes")]);
    let pipeline = Pipeline::new(&provider, TextClassifier::default(), options(10));

    let outcome = pipeline
        .translate_content(r#"<right title="Да"><answer>Да</answer><answer>Да</answer></right>"#, |_, _| {})
        .await
        .unwrap();

    assert_eq!(
        outcome.content,
        r#"<right title="Yes"><answer>Yes</answer><answer>Yes</answer></right>"#
    );
    assert_eq!(outcome.units, 1);
    assert_eq!(outcome.occurrences, 3);
    assert_eq!(outcome.merge.total(), 3);
    assert_eq!(provider.requests(), vec!["Да".to_string()]);
}

#[tokio::test]
async fn test_translateContent_withShortAnswer_shouldAbortWithAlignmentReport() {
    let provider = MockProvider::dropping_last_line();
    let pipeline = Pipeline::new(&provider, TextClassifier::default(), options(10));

    let result = pipeline
        .translate_content("<q><a>Один</a><a>Два</a><a>Три</a></q>", |_, _| {})
        .await;

    match result {
        Err(AppError::Translation(TranslationError::BatchMisaligned {
            batch,
            expected,
            received,
            report,
        })) => {
            assert_eq!(batch, 1);
            assert_eq!(expected, 3);
            assert_eq!(received, 2);
            assert_eq!(report.unmatched_positions(), vec![2]);
            assert_eq!(report.pairs[2], ("Три".to_string(), "[none]".to_string()));
        }
        other => panic!("expected a misaligned batch, got {:?}", other),
    }
    assert_eq!(provider.request_count(), 1);
}

#[tokio::test]
async fn test_translateContent_withMisalignedLaterBatch_shouldStopAtThatBatch() {
    // The answer for the second unit spans two lines
    let provider = MockProvider::dictionary([("Один", "One"), ("Два", "Two\nextra")]);
    let pipeline = Pipeline::new(&provider, TextClassifier::default(), options(1));

    let result = pipeline
        .translate_content("<q><a>Один</a><a>Два</a></q>", |_, _| {})
        .await;

    assert!(matches!(
        result,
        Err(AppError::Translation(TranslationError::BatchMisaligned {
            batch: 2,
            expected: 1,
            received: 2,
            ..
        }))
    ));
    assert_eq!(provider.request_count(), 2);
}

#[tokio::test]
async fn test_translateContent_withFailingProvider_shouldReturnProviderError() {
    let provider = MockProvider::intermittent(2);
    let pipeline = Pipeline::new(&provider, TextClassifier::default(), options(1));

    let result = pipeline
        .translate_content("<q><a>Один</a><a>Два</a><a>Три</a></q>", |_, _| {})
        .await;

    assert!(matches!(
        result,
        Err(AppError::Translation(TranslationError::Provider(_)))
    ));
    assert_eq!(provider.request_count(), 2);
}

#[tokio::test]
async fn test_translateContent_withSampleContent_shouldTranslateEveryEligibleField() {
    init_logger();
    let provider = MockProvider::dictionary(SAMPLE_DICTIONARY);
    let pipeline = Pipeline::new(&provider, TextClassifier::default(), options(10));

    let outcome = pipeline.translate_content(SAMPLE_CONTENT, |_, _| {}).await.unwrap();

    assert_eq!(outcome.content, sample_translated());
    assert_eq!(outcome.units, 6);
    assert_eq!(outcome.occurrences, 7);
    assert_eq!(outcome.batches, 1);
    assert_eq!(outcome.merge.texts, 4);
    assert_eq!(outcome.merge.attributes, 3);
    assert!(outcome.content.contains(r#"isRef="true">@кот.png</atom>"#));
    assert!(outcome.content.contains(">Is this already English?<"));
}

#[tokio::test]
async fn test_translateContent_withDifferentBatchSizes_shouldProduceSameContent() {
    let mut results = Vec::new();

    for (batch_size, expected_requests) in [(1, 6), (4, 2), (6, 1), (100, 1)] {
        let provider = MockProvider::dictionary(SAMPLE_DICTIONARY);
        let pipeline = Pipeline::new(&provider, TextClassifier::default(), options(batch_size));

        let outcome = pipeline.translate_content(SAMPLE_CONTENT, |_, _| {}).await.unwrap();

        assert_eq!(provider.request_count(), expected_requests, "batch size {}", batch_size);
        assert_eq!(outcome.batches, expected_requests);
        results.push(outcome.content);
    }

    assert!(results.iter().all(|content| *content == results[0]));
    assert_eq!(results[0], sample_translated());
}

#[tokio::test]
async fn test_translateContent_shouldReportProgressPerBatch() {
    let provider = MockProvider::dictionary(SAMPLE_DICTIONARY);
    let pipeline = Pipeline::new(&provider, TextClassifier::default(), options(4));
    let mut calls = Vec::new();

    pipeline
        .translate_content(SAMPLE_CONTENT, |done, total| calls.push((done, total)))
        .await
        .unwrap();

    assert_eq!(calls, vec![(1, 2), (2, 2)]);
}

#[tokio::test]
async fn test_translateContent_withoutSourceText_shouldReturnContentUnchanged() {
    let provider = MockProvider::working();
    let pipeline = Pipeline::new(&provider, TextClassifier::default(), options(10));
    let content = "<?xml version=\"1.0\"?>\n<package name=\"Quiz\">\n  <atom>Hello &amp; welcome</atom>\n</package>\n";

    let outcome = pipeline.translate_content(content, |_, _| {}).await.unwrap();

    assert_eq!(outcome.content, content);
    assert_eq!(outcome.batches, 0);
    assert_eq!(provider.request_count(), 0);
}

#[tokio::test]
async fn test_translatePrepared_withoutUnits_shouldSerializeIdentically() {
    let provider = MockProvider::working();
    let pipeline = Pipeline::new(&provider, TextClassifier::default(), options(10));
    let content = r#"<package name="Quiz"><atom type="image" isRef="true">@cat.png</atom><atom>Hi</atom></package>"#;

    let prepared = pipeline.prepare(content).unwrap();
    assert!(prepared.extraction.is_empty());
    assert_eq!(pipeline.batch_count(&prepared), 0);

    let outcome = pipeline.translate_prepared(prepared, |_, _| {}).await.unwrap();

    assert_eq!(outcome.content, content);
    assert_eq!(outcome.merge.total(), 0);
}

#[tokio::test]
async fn test_translateContent_shouldKeepStructureAndAttributeOrder() {
    let provider = MockProvider::working();
    let pipeline = Pipeline::new(&provider, TextClassifier::default(), options(2));
    let content = r#"<question price="100" name="Вопрос"><scenario><atom type="text">Текст</atom>хвост<atom/></scenario></question>"#;

    let outcome = pipeline.translate_content(content, |_, _| {}).await.unwrap();

    // The tail after an element is not a translation field
    assert_eq!(
        outcome.content,
        r#"<question price="100" name="[en] Вопрос"><scenario><atom type="text">[en] Текст</atom>хвост<atom/></scenario></question>"#
    );
}

#[tokio::test]
async fn test_translateContent_withPaddedText_shouldRestoreWhitespace() {
    let provider = MockProvider::dictionary([("Кошка", "Cat")]);
    let pipeline = Pipeline::new(&provider, TextClassifier::default(), options(10));

    let outcome = pipeline
        .translate_content("<answer>\n    Кошка\n</answer>", |_, _| {})
        .await
        .unwrap();

    assert_eq!(outcome.content, "<answer>      Cat  </answer>");
    assert_eq!(provider.requests(), vec!["Кошка".to_string()]);
}

#[tokio::test]
async fn test_translateContent_withCustomPattern_shouldOnlyTranslateMatches() {
    let provider = MockProvider::dictionary([("Is this already English?", "Ist das schon Englisch?")]);
    let classifier = TextClassifier::from_pattern(Some(r"\bEnglish\b")).unwrap();
    let pipeline = Pipeline::new(&provider, classifier, options(10));

    let outcome = pipeline.translate_content(SAMPLE_CONTENT, |_, _| {}).await.unwrap();

    assert_eq!(outcome.units, 1);
    assert!(outcome.content.contains(">Ist das schon Englisch?<"));
    assert!(outcome.content.contains(">Кошка<"));
}

#[tokio::test]
async fn test_translateContent_withMalformedContent_shouldReturnDocumentError() {
    let provider = MockProvider::working();
    let pipeline = Pipeline::new(&provider, TextClassifier::default(), options(10));

    let result = pipeline.translate_content("<package><round></package>", |_, _| {}).await;

    assert!(matches!(result, Err(AppError::Document(_))));
    assert_eq!(provider.request_count(), 0);
}

#[tokio::test]
async fn test_translateContent_withEmptyLastAnswerLine_shouldKeepSourceText() {
    let provider = MockProvider::working().with_custom_response(|_| "Cat\n\n".to_string());
    let pipeline = Pipeline::new(&provider, TextClassifier::default(), options(10));

    let outcome = pipeline
        .translate_content("<q><a>Кошка</a><a>Собака</a></q>", |_, _| {})
        .await
        .unwrap();

    assert_eq!(outcome.content, "<q><a>Cat</a><a>Собака</a></q>");
}

#[tokio::test]
async fn test_translateContent_withUntranslatedMarkupAroundRoot_shouldKeepItExactly() {
    let provider = MockProvider::dictionary([("Да", "Yes")]);
    let pipeline = Pipeline::new(&provider, TextClassifier::default(), options(10));
    let content = "\u{feff}<?xml version=\"1.0\"?><?xml-stylesheet href=\"s.xsl\"?><q note=\"a&#10;b\"><a>Да</a><b>x&#13;y</b></q>";

    let outcome = pipeline.translate_content(content, |_, _| {}).await.unwrap();

    assert_eq!(
        outcome.content,
        "\u{feff}<?xml version=\"1.0\"?><?xml-stylesheet href=\"s.xsl\"?><q note=\"a&#10;b\"><a>Yes</a><b>x&#13;y</b></q>"
    );
}
