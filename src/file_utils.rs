use anyhow::{Context, Result};
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};

// @module: File and directory utilities

/// Leading bytes of a zip local file header
const ZIP_MAGIC: [u8; 4] = [b'P', b'K', 0x03, 0x04];

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.as_os_str().is_empty() && !path.exists() {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }

    // @generates: Output path for a translated pack
    // @params: input_file, suffix appended to the whole file name
    pub fn default_output_path<P: AsRef<Path>>(input_file: P, suffix: &str) -> PathBuf {
        let mut name = OsString::from(input_file.as_ref().as_os_str());
        name.push(suffix);
        PathBuf::from(name)
    }

    /// Whether a file starts with a zip local file header
    pub fn is_zip_archive<P: AsRef<Path>>(path: P) -> Result<bool> {
        let mut file = File::open(&path)
            .with_context(|| format!("Failed to open file: {:?}", path.as_ref()))?;
        let mut magic = [0u8; 4];
        match file.read_exact(&mut magic) {
            Ok(()) => Ok(magic == ZIP_MAGIC),
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => Ok(false),
            Err(e) => Err(e).with_context(|| format!("Failed to read file: {:?}", path.as_ref())),
        }
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        // Ensure the parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }
}
