//! Archive handling for XLSX packages
//!
//! XLSX files are ZIP archives of XML parts. The reader and writer work on a
//! directory tree; an [`ArchiveService`] moves bytes in and out of it.

use std::fs::{self, File};
use std::io::{self, Cursor, Read, Seek, Write};
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::debug;
use zip::read::ZipArchive;
use zip::result::ZipError;
use zip::write::{SimpleFileOptions, ZipWriter};
use zip::CompressionMethod;

/// Errors raised by an archive service
#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("zip error: {0}")]
    Zip(#[from] ZipError),

    #[error("io error: {0}")]
    Io(#[from] io::Error),

    /// Entry whose path would escape the extraction directory
    #[error("unsafe entry path: {0}")]
    UnsafePath(String),
}

/// Moves package bytes to and from a directory tree
pub trait ArchiveService {
    /// Unpack `bytes` into `dest`, which must already exist.
    fn extract(&self, bytes: &[u8], dest: &Path) -> Result<(), ArchiveError>;

    /// Pack every file under `root` into an archive, paths relative to `root`.
    fn archive(&self, root: &Path) -> Result<Vec<u8>, ArchiveError>;
}

/// [`ArchiveService`] backed by the `zip` crate
#[derive(Debug, Clone, Copy, Default)]
pub struct ZipArchiveService;

impl ArchiveService for ZipArchiveService {
    fn extract(&self, bytes: &[u8], dest: &Path) -> Result<(), ArchiveError> {
        let mut archive = ZipArchive::new(Cursor::new(bytes))?;

        for i in 0..archive.len() {
            let mut file = archive.by_index(i)?;
            let relative = file
                .enclosed_name()
                .ok_or_else(|| ArchiveError::UnsafePath(file.name().to_string()))?;
            let target = dest.join(relative);

            // Skip directories
            if file.is_dir() {
                fs::create_dir_all(&target)?;
                continue;
            }

            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            let mut contents = Vec::new();
            file.read_to_end(&mut contents)?;
            fs::write(&target, contents)?;
        }

        Ok(())
    }

    fn archive(&self, root: &Path) -> Result<Vec<u8>, ArchiveError> {
        let mut buffer = Cursor::new(Vec::new());
        write_tree(root, &mut buffer)?;
        Ok(buffer.into_inner())
    }
}

/// Create a scratch directory for an unpacked package tree.
pub(crate) fn scratch_dir(prefix: &str) -> io::Result<TempDir> {
    tempfile::Builder::new().prefix(prefix).tempdir()
}

/// Remove a scratch directory. Failures are logged, never raised.
pub(crate) fn remove_scratch(scratch: TempDir) {
    let path = scratch.path().to_path_buf();
    if let Err(e) = scratch.close() {
        debug!(path = %path.display(), error = %e, "failed to remove scratch directory");
    }
}

fn write_tree<W: Write + Seek>(root: &Path, writer: W) -> Result<(), ArchiveError> {
    let mut zip = ZipWriter::new(writer);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    // Sort for deterministic output; "[Content_Types].xml" sorts first
    let mut paths = collect_files(root)?;
    paths.sort();

    for (name, path) in paths {
        zip.start_file(name, options)?;
        let mut file = File::open(&path)?;
        io::copy(&mut file, &mut zip)?;
    }

    zip.finish()?;
    Ok(())
}

/// Files under `root` as ("a/b.xml", absolute path) pairs.
fn collect_files(root: &Path) -> io::Result<Vec<(String, PathBuf)>> {
    let mut files = Vec::new();
    let mut pending = vec![root.to_path_buf()];

    while let Some(dir) = pending.pop() {
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.is_dir() {
                pending.push(path);
                continue;
            }
            let relative = path
                .strip_prefix(root)
                .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
            let name = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            files.push((name, path));
        }
    }

    Ok(files)
}
