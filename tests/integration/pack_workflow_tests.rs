/*!
 * End-to-end tests: unpack a pack, translate its content, repack
 */

use std::path::Path;

use siq_translator::app_config::Config;
use siq_translator::app_controller::Controller;
use siq_translator::errors::{AppError, TranslationError};
use siq_translator::providers::mock::MockProvider;

use crate::common::{
    SAMPLE_CONTENT, create_temp_dir, create_test_file, create_test_pack, init_logger, pack_entry_names,
    read_pack_entry,
};

const IMAGE_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0, 1, 2, 3];

fn test_controller() -> Controller {
    let mut config = Config::default();
    config.pipeline.pacing_delay_ms = 0;
    Controller::with_config(config).unwrap()
}

fn sample_pack(dir: &Path) -> std::path::PathBuf {
    create_test_pack(
        dir,
        "quiz.siq",
        &[
            ("content.xml", SAMPLE_CONTENT.as_bytes()),
            ("Images/кот.png", IMAGE_BYTES),
            ("[Content_Types].xml", b"<Types/>"),
        ],
    )
    .unwrap()
}

#[tokio::test]
async fn test_runWithTranslator_withSamplePack_shouldWriteTranslatedPack() {
    init_logger();
    let temp_dir = create_temp_dir().unwrap();
    let input = sample_pack(temp_dir.path());
    let provider = MockProvider::dictionary([("Кошка", "Cat"), ("Да", "Yes")]);

    let output = test_controller()
        .run_with_translator(&input, None, &provider)
        .await
        .unwrap();

    assert_eq!(output, temp_dir.path().join("quiz.siq.translation.siq"));
    assert!(output.exists());

    let content = read_pack_entry(&output, "content.xml").unwrap();
    assert!(content.contains("<answer>Cat</answer>"));
    assert!(content.contains("<answer>Yes</answer>"));
    assert!(!content.contains('\n'));
    // Values missing from the dictionary come back unchanged
    assert!(content.contains(r#"name="Животные""#));
    assert!(content.contains(r#"isRef="true">@кот.png</atom>"#));
}

#[tokio::test]
async fn test_runWithTranslator_shouldKeepOtherEntriesUnchanged() {
    let temp_dir = create_temp_dir().unwrap();
    let input = sample_pack(temp_dir.path());
    let provider = MockProvider::working();

    let output = test_controller()
        .run_with_translator(&input, None, &provider)
        .await
        .unwrap();

    assert_eq!(
        pack_entry_names(&output).unwrap(),
        vec![
            "Images/".to_string(),
            "Images/кот.png".to_string(),
            "[Content_Types].xml".to_string(),
            "content.xml".to_string(),
        ]
    );

    let mut archive = zip::ZipArchive::new(std::fs::File::open(&output).unwrap()).unwrap();
    let mut image = Vec::new();
    std::io::Read::read_to_end(&mut archive.by_name("Images/кот.png").unwrap(), &mut image).unwrap();
    assert_eq!(image, IMAGE_BYTES);
    assert_eq!(read_pack_entry(&output, "[Content_Types].xml").unwrap(), "<Types/>");
}

#[tokio::test]
async fn test_runWithTranslator_withExplicitOutput_shouldWriteThere() {
    let temp_dir = create_temp_dir().unwrap();
    let input = sample_pack(temp_dir.path());
    let requested = temp_dir.path().join("out").join("quiz_en.siq");
    let provider = MockProvider::working();

    let output = test_controller()
        .run_with_translator(&input, Some(&requested), &provider)
        .await
        .unwrap();

    assert_eq!(output, requested);
    assert!(requested.exists());
    assert!(!temp_dir.path().join("quiz.siq.translation.siq").exists());
}

#[tokio::test]
async fn test_runWithTranslator_withMisalignedAnswer_shouldNotWriteOutput() {
    init_logger();
    let temp_dir = create_temp_dir().unwrap();
    let input = sample_pack(temp_dir.path());
    let provider = MockProvider::dropping_last_line();

    let error = test_controller()
        .run_with_translator(&input, None, &provider)
        .await
        .unwrap_err();

    assert!(matches!(
        error.downcast_ref::<AppError>(),
        Some(AppError::Translation(TranslationError::BatchMisaligned { .. }))
    ));
    assert!(provider.request_count() > 0);
    assert!(!temp_dir.path().join("quiz.siq.translation.siq").exists());
}

#[tokio::test]
async fn test_runWithTranslator_withFailingProvider_shouldNotWriteOutput() {
    let temp_dir = create_temp_dir().unwrap();
    let input = sample_pack(temp_dir.path());
    let provider = MockProvider::failing();

    let result = test_controller().run_with_translator(&input, None, &provider).await;

    assert!(result.is_err());
    assert!(!temp_dir.path().join("quiz.siq.translation.siq").exists());
}

#[tokio::test]
async fn test_runWithTranslator_withoutContentFile_shouldFail() {
    let temp_dir = create_temp_dir().unwrap();
    let input = create_test_pack(temp_dir.path(), "empty.siq", &[("Images/a.png", IMAGE_BYTES)]).unwrap();
    let provider = MockProvider::working();

    let error = test_controller()
        .run_with_translator(&input, None, &provider)
        .await
        .unwrap_err();

    assert!(error.to_string().contains("content.xml"));
    assert_eq!(provider.request_count(), 0);
}

#[tokio::test]
async fn test_runWithTranslator_withNonArchiveInput_shouldFail() {
    let temp_dir = create_temp_dir().unwrap();
    let input = create_test_file(temp_dir.path(), "content.xml", SAMPLE_CONTENT).unwrap();
    let provider = MockProvider::working();

    let result = test_controller().run_with_translator(&input, None, &provider).await;

    assert!(result.is_err());
    assert_eq!(provider.request_count(), 0);
}

#[tokio::test]
async fn test_runWithTranslator_withMissingInput_shouldFail() {
    let temp_dir = create_temp_dir().unwrap();
    let provider = MockProvider::working();

    let result = test_controller()
        .run_with_translator(&temp_dir.path().join("missing.siq"), None, &provider)
        .await;

    assert!(result.is_err());
}

#[test]
fn test_runWithTranslator_withEnglishOnlyPack_shouldKeepContentByteIdentical() {
    let temp_dir = create_temp_dir().unwrap();
    let content = "<?xml version=\"1.0\"?>\n<package name=\"Quiz\">\n  <atom>Hello</atom>\n</package>\n";
    let input = create_test_pack(temp_dir.path(), "en.siq", &[("content.xml", content.as_bytes())]).unwrap();
    let provider = MockProvider::working();
    let controller = test_controller();

    let output = tokio_test::block_on(controller.run_with_translator(&input, None, &provider)).unwrap();

    assert_eq!(read_pack_entry(&output, "content.xml").unwrap(), content);
    assert_eq!(provider.request_count(), 0);
}

#[tokio::test]
async fn test_runWithTranslator_withCustomContentFileName_shouldTranslateIt() {
    let temp_dir = create_temp_dir().unwrap();
    let input = create_test_pack(
        temp_dir.path(),
        "custom.siq",
        &[("pack.xml", "<package><atom>Кошка</atom></package>".as_bytes())],
    )
    .unwrap();
    let mut config = Config::default();
    config.pack.content_file = "pack.xml".to_string();
    config.pipeline.pacing_delay_ms = 0;
    let controller = Controller::with_config(config).unwrap();
    let provider = MockProvider::dictionary([("Кошка", "Cat")]);

    let output = controller.run_with_translator(&input, None, &provider).await.unwrap();

    assert_eq!(
        read_pack_entry(&output, "pack.xml").unwrap(),
        "<package><atom>Cat</atom></package>"
    );
}
