//! subfetch - Download subtitles for a video file from SubDB
//!
//! This library provides the core functionality for fingerprinting a video
//! file, looking up the available subtitle languages on SubDB, and
//! downloading every language variant next to the video.

mod file_operations;
mod fingerprint;
mod subdb;

use file_operations::{subtitle_path, write_subtitle};

// Re-export error types
pub use file_operations::FileOperationError;
pub use fingerprint::FingerprintError;
pub use subdb::SubtitleServiceError;

pub use fingerprint::{Fingerprint, compute_fingerprint};
pub use subdb::{SubDbClient, SubtitleArtifact, SubtitleService};

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Progress event emitted while processing a video file
///
/// These events allow library users to track progress and provide feedback
/// during the download process. Per-language failures are delivered here
/// as well; they never abort the remaining languages.
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// Processing of a video file started
    Started { path: PathBuf },

    /// The film fingerprint was computed
    FingerprintComputed { fingerprint: Fingerprint },

    /// Querying the service for available languages
    SearchingSubtitles,

    /// The service reported subtitles in these languages
    LanguagesFound { languages: Vec<String> },

    /// The service reported nothing for this file
    NoSubtitlesFound,

    /// Downloading the subtitle for one language
    DownloadingLanguage {
        index: usize,
        total: usize,
        language: String,
    },

    /// A subtitle was downloaded and written to disk
    SubtitleSaved { language: String, path: PathBuf },

    /// Downloading or persisting one language failed; processing continues
    /// with the next language
    DownloadFailed { language: String, reason: String },

    /// All reported languages have been processed
    Completed { saved: usize, failed: usize },
}

/// A subtitle that was downloaded and persisted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedSubtitle {
    /// Language code of the subtitle
    pub language: String,
    /// Where the subtitle was written
    pub path: PathBuf,
}

/// Top-level error type for subfetch operations
///
/// Only fingerprinting can fail the processing of a file: without a
/// fingerprint there is nothing to search for. Search and per-language
/// download failures are reported through [`ProgressEvent`] instead.
#[derive(Debug, Error)]
pub enum SubFetchError {
    /// Error while computing the film fingerprint
    #[error("Fingerprint error: {0}")]
    Fingerprint(#[from] FingerprintError),
}

/// Downloads every available subtitle for a video file from SubDB
///
/// Convenience wrapper around [`fetch_subtitles_with_service`] using the
/// production SubDB endpoint.
///
/// # Arguments
///
/// * `video_path` - Path to the video file to find subtitles for
/// * `progress_callback` - Closure called with progress events (can be
///   empty for silent operation)
pub fn fetch_subtitles<F>(
    video_path: &Path,
    progress_callback: F,
) -> Result<Vec<SavedSubtitle>, SubFetchError>
where
    F: FnMut(ProgressEvent),
{
    fetch_subtitles_with_service(video_path, &SubDbClient::new(), progress_callback)
}

/// Downloads every available subtitle for a video file
///
/// The video file is fingerprinted, the service is queried for available
/// languages, and each reported language is downloaded and written next to
/// the video as `<video stem>-<language><extension>`. Languages are
/// processed strictly in the order the service reported them, without
/// deduplication; a repeated code is downloaded again and overwrites the
/// earlier file.
///
/// A failure while downloading or persisting one language is reported as a
/// [`ProgressEvent::DownloadFailed`] and processing continues with the next
/// language. Only fingerprinting failures abort the call.
///
/// # Arguments
///
/// * `video_path` - Path to the video file to find subtitles for
/// * `service` - The subtitle service to query
/// * `progress_callback` - Closure called with progress events
///
/// # Returns
///
/// The subtitles that were successfully written, in download order. An
/// empty vector means the service reported nothing for this file.
pub fn fetch_subtitles_with_service<F>(
    video_path: &Path,
    service: &dyn SubtitleService,
    mut progress_callback: F,
) -> Result<Vec<SavedSubtitle>, SubFetchError>
where
    F: FnMut(ProgressEvent),
{
    progress_callback(ProgressEvent::Started {
        path: video_path.to_path_buf(),
    });

    // The fingerprint correlates the search and every download request;
    // it is computed once and reused unchanged.
    let fingerprint = compute_fingerprint(video_path)?;
    progress_callback(ProgressEvent::FingerprintComputed {
        fingerprint: fingerprint.clone(),
    });

    progress_callback(ProgressEvent::SearchingSubtitles);
    let languages = service.search(&fingerprint);

    if languages.is_empty() {
        progress_callback(ProgressEvent::NoSubtitlesFound);
        return Ok(Vec::new());
    }

    progress_callback(ProgressEvent::LanguagesFound {
        languages: languages.clone(),
    });

    let mut saved = Vec::new();
    let mut failed = 0;

    for (index, language) in languages.iter().enumerate() {
        progress_callback(ProgressEvent::DownloadingLanguage {
            index,
            total: languages.len(),
            language: language.clone(),
        });

        let artifact = match service.download(&fingerprint, language) {
            Ok(artifact) => artifact,
            Err(e) => {
                failed += 1;
                progress_callback(ProgressEvent::DownloadFailed {
                    language: language.clone(),
                    reason: e.to_string(),
                });
                continue;
            }
        };

        let target = subtitle_path(video_path, &artifact.language, &artifact.extension);
        if let Err(e) = write_subtitle(&target, &artifact.content) {
            failed += 1;
            progress_callback(ProgressEvent::DownloadFailed {
                language: language.clone(),
                reason: e.to_string(),
            });
            continue;
        }

        progress_callback(ProgressEvent::SubtitleSaved {
            language: language.clone(),
            path: target.clone(),
        });

        saved.push(SavedSubtitle {
            language: language.clone(),
            path: target,
        });
    }

    progress_callback(ProgressEvent::Completed {
        saved: saved.len(),
        failed,
    });

    Ok(saved)
}
