//! Film fingerprint computation
//!
//! This module derives the content fingerprint SubDB uses to identify a
//! video file: the MD5 digest of the first and last 64 KiB of the file,
//! rendered as lowercase hexadecimal.

use md5::{Digest, Md5};
use std::fmt;
use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Number of bytes hashed from each end of the file
const REGION_SIZE: usize = 64 * 1024;

/// Errors that can occur during fingerprint computation
#[derive(Debug, Error)]
pub enum FingerprintError {
    /// No file path was supplied
    #[error("A file path is required to compute a fingerprint")]
    EmptyPath,

    /// Failed to open the video file
    #[error("Failed to open {path}: {source}")]
    OpenFailed { path: PathBuf, source: io::Error },

    /// Failed to read the video file
    #[error("Failed to read {path}: {source}")]
    ReadFailed { path: PathBuf, source: io::Error },
}

/// Content-derived identifier for a video file
///
/// SubDB correlates requests by this value: the fingerprint computed for a
/// file must be reused unchanged for the search and every download request
/// of the same session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Returns the fingerprint as a 32-character lowercase hex string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
impl Fingerprint {
    /// Builds a fingerprint from a known hex string, bypassing the file
    /// hashing. Test use only.
    pub(crate) fn from_hex(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Computes the SubDB fingerprint of a video file
///
/// The fingerprint is the MD5 digest of a 128 KiB buffer holding the first
/// 64 KiB of the file followed by its last 64 KiB. Files shorter than
/// 128 KiB hash overlapping regions, and files shorter than 64 KiB leave
/// zero padding in place of the missing bytes; both are part of the scheme
/// and never an error.
///
/// The computation is pure and deterministic: the same file content always
/// yields the same fingerprint.
///
/// # Arguments
///
/// * `path` - Path to the video file to fingerprint
///
/// # Returns
///
/// The fingerprint, or an error if the path is empty or the file cannot
/// be opened or read.
pub fn compute_fingerprint(path: &Path) -> Result<Fingerprint, FingerprintError> {
    if path.as_os_str().is_empty() {
        return Err(FingerprintError::EmptyPath);
    }

    let mut file = File::open(path).map_err(|e| FingerprintError::OpenFailed {
        path: path.to_path_buf(),
        source: e,
    })?;

    let file_len = file
        .metadata()
        .map_err(|e| FingerprintError::ReadFailed {
            path: path.to_path_buf(),
            source: e,
        })?
        .len();

    let mut buffer = vec![0u8; REGION_SIZE * 2];

    // First region starts at the beginning, second at end-minus-64KiB
    // (clamped to the start for files shorter than one region).
    let tail_offset = file_len.saturating_sub(REGION_SIZE as u64);

    read_region(&mut file, 0, &mut buffer[..REGION_SIZE]).map_err(|e| {
        FingerprintError::ReadFailed {
            path: path.to_path_buf(),
            source: e,
        }
    })?;
    read_region(&mut file, tail_offset, &mut buffer[REGION_SIZE..]).map_err(|e| {
        FingerprintError::ReadFailed {
            path: path.to_path_buf(),
            source: e,
        }
    })?;

    let mut hasher = Md5::new();
    hasher.update(&buffer);

    Ok(Fingerprint(format!("{:x}", hasher.finalize())))
}

/// Reads as many bytes as the file holds at `offset`, up to the buffer
/// length, leaving the rest of the buffer untouched
fn read_region(file: &mut File, offset: u64, buffer: &mut [u8]) -> io::Result<()> {
    file.seek(SeekFrom::Start(offset))?;

    let mut filled = 0;
    while filled < buffer.len() {
        let bytes_read = file.read(&mut buffer[filled..])?;
        if bytes_read == 0 {
            break;
        }
        filled += bytes_read;
    }

    Ok(())
}
