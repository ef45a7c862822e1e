/*!
 * Common test utilities for the siq-translator test suite
 */

use anyhow::Result;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Once;
use tempfile::TempDir;
use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};

/// A small pack content document with the features the pipeline cares about
pub const SAMPLE_CONTENT: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<package name="Тестовый пакет" version="4">
  <rounds>
    <round name="Раунд 1">
      <themes>
        <theme name="Животные">
          <questions>
            <question price="100">
              <scenario>
                <atom>Кто говорит мяу?</atom>
                <atom type="image" isRef="true">@кот.png</atom>
              </scenario>
              <right>
                <answer>Кошка</answer>
              </right>
            </question>
            <question price="200">
              <scenario>
                <atom>Is this already English?</atom>
              </scenario>
              <right>
                <answer>Да</answer>
                <answer>Да</answer>
              </right>
            </question>
          </questions>
        </theme>
      </themes>
    </round>
  </rounds>
</package>
"#;

static INIT_LOGGER: Once = Once::new();

/// Route log output through the test harness
pub fn init_logger() {
    INIT_LOGGER.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Creates a pack archive holding the given entries
pub fn create_test_pack(dir: &Path, filename: &str, entries: &[(&str, &[u8])]) -> Result<PathBuf> {
    let path = dir.join(filename);
    let mut zip = ZipWriter::new(File::create(&path)?);
    for (name, content) in entries {
        zip.start_file(*name, SimpleFileOptions::default())?;
        zip.write_all(content)?;
    }
    zip.finish()?;
    Ok(path)
}

/// Reads one entry of a pack archive as text
pub fn read_pack_entry(pack: &Path, name: &str) -> Result<String> {
    let mut archive = ZipArchive::new(File::open(pack)?)?;
    let mut content = String::new();
    archive.by_name(name)?.read_to_string(&mut content)?;
    Ok(content)
}

/// Names of all entries of a pack archive, sorted
pub fn pack_entry_names(pack: &Path) -> Result<Vec<String>> {
    let archive = ZipArchive::new(File::open(pack)?)?;
    let mut names: Vec<String> = archive.file_names().map(str::to_string).collect();
    names.sort();
    Ok(names)
}
