//! Subtitle persistence
//!
//! Derives the on-disk location for a downloaded subtitle and writes it
//! next to the source video.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while persisting a subtitle
#[derive(Debug, Error)]
pub enum FileOperationError {
    /// Failed to write the subtitle file
    #[error("Failed to write subtitle {path}: {source}")]
    WriteFailed { path: PathBuf, source: io::Error },
}

/// Derives the target path for a subtitle belonging to `video`.
///
/// The subtitle lands in the video's directory as
/// `<video stem>-<language><extension>`, e.g. `movie.mkv` + `en` + `.srt`
/// becomes `movie-en.srt`. The extension is expected to carry its leading
/// dot.
pub fn subtitle_path(video: &Path, language: &str, extension: &str) -> PathBuf {
    let stem = video
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let file_name = format!("{stem}-{language}{extension}");

    video
        .parent()
        .map(|dir| dir.join(&file_name))
        .unwrap_or_else(|| PathBuf::from(file_name))
}

/// Writes subtitle content to the given path.
///
/// An existing file at the path is overwritten without warning; repeated
/// language codes in a search result therefore rewrite the same file.
pub fn write_subtitle(path: &Path, content: &str) -> Result<(), FileOperationError> {
    fs::write(path, content).map_err(|e| FileOperationError::WriteFailed {
        path: path.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_subtitle_path_next_to_video() {
        let path = subtitle_path(Path::new("/videos/movie.mkv"), "en", ".srt");
        assert_eq!(path, PathBuf::from("/videos/movie-en.srt"));
    }

    #[test]
    fn test_subtitle_path_for_bare_filename() {
        let path = subtitle_path(Path::new("movie.mkv"), "pt", ".sub");
        assert_eq!(path, PathBuf::from("movie-pt.sub"));
    }

    #[test]
    fn test_subtitle_path_keeps_inner_dots_of_stem() {
        let path = subtitle_path(Path::new("/videos/some.movie.2024.mkv"), "fr", ".srt");
        assert_eq!(path, PathBuf::from("/videos/some.movie.2024-fr.srt"));
    }

    #[test]
    fn test_write_subtitle_round_trips_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("movie-en.srt");
        let content = "1\n00:00:01,000 --> 00:00:02,000\nHello\n";

        write_subtitle(&path, content).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), content);
    }

    #[test]
    fn test_write_subtitle_overwrites_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("movie-en.srt");

        write_subtitle(&path, "first").unwrap();
        write_subtitle(&path, "second").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "second");
    }

    #[test]
    fn test_write_subtitle_reports_unwritable_target() {
        let result = write_subtitle(Path::new("/nonexistent/dir/movie-en.srt"), "content");
        assert!(matches!(
            result,
            Err(FileOperationError::WriteFailed { .. })
        ));
    }
}
