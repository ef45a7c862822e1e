/*!
 * Pack container handling.
 *
 * A pack is a zip archive. It is unpacked into a working directory, the
 * content document is rewritten in place, and the directory is packed again.
 * Repacking writes to a temporary file next to the destination and moves it
 * over the destination only once the archive is complete.
 */

use std::fs::File;
use std::io;
use std::path::{Component, Path};

use log::debug;
use tempfile::NamedTempFile;
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::errors::ArchiveError;

/// Extract every entry of `archive` into `dir`.
///
/// Returns the number of entries in the archive.
pub fn unpack(archive: &Path, dir: &Path) -> Result<usize, ArchiveError> {
    let file = File::open(archive)?;
    let mut zip = ZipArchive::new(file)?;
    let entries = zip.len();

    // Entries whose names escape the target directory are rejected by the zip crate
    zip.extract(dir)?;

    debug!("Unpacked {} entries from {:?} to {:?}", entries, archive, dir);
    Ok(entries)
}

/// Pack the contents of `dir` into a new archive at `dest`.
///
/// Entry names are relative to `dir` and use `/` as separator. Returns the
/// number of files written.
pub fn repack(dir: &Path, dest: &Path) -> Result<usize, ArchiveError> {
    let parent = match dest.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let tmp = NamedTempFile::new_in(parent)?;

    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut zip = ZipWriter::new(tmp.as_file());
    let mut files = 0;

    for entry in WalkDir::new(dir).min_depth(1).sort_by_file_name() {
        let entry = entry.map_err(io::Error::from)?;
        let relative = entry
            .path()
            .strip_prefix(dir)
            .map_err(|_| ArchiveError::InvalidPath(entry.path().display().to_string()))?;
        let name = entry_name(relative)?;

        if entry.file_type().is_dir() {
            zip.add_directory(name, options)?;
        } else {
            zip.start_file(name, options)?;
            let mut source = File::open(entry.path())?;
            io::copy(&mut source, &mut zip)?;
            files += 1;
        }
    }
    zip.finish()?;

    tmp.persist(dest).map_err(|e| e.error)?;
    debug!("Packed {} files from {:?} into {:?}", files, dir, dest);
    Ok(files)
}

/// Archive entry name for a path relative to the packed directory
fn entry_name(relative: &Path) -> Result<String, ArchiveError> {
    let mut parts = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(part) => {
                let part = part
                    .to_str()
                    .ok_or_else(|| ArchiveError::InvalidPath(relative.display().to_string()))?;
                parts.push(part);
            }
            _ => return Err(ArchiveError::InvalidPath(relative.display().to_string())),
        }
    }
    Ok(parts.join("/"))
}
