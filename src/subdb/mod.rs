/// Data structures and traits for talking to the subtitle service.
///
/// This module defines the logical operations the orchestrator needs from
/// a subtitle database (search available languages, download one subtitle)
/// together with the artifact and error types those operations produce.
mod client;

pub use client::SubDbClient;

use crate::fingerprint::Fingerprint;
use thiserror::Error;

/// Errors that can occur while downloading a subtitle.
///
/// Search has no error type: the service does not distinguish "no
/// subtitles exist" from a failed request, so search collapses every
/// failure into an empty result instead.
#[derive(Debug, Error)]
pub enum SubtitleServiceError {
    /// The request could not be completed (connection, DNS, timeout,
    /// malformed response)
    #[error("Request could not be completed: {0}")]
    Transport(String),

    /// The service answered with a non-success status
    #[error("No subtitle available (HTTP {0})")]
    NotFound(u16),
}

/// A downloaded subtitle ready to be persisted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleArtifact {
    /// Language code this subtitle was requested for
    pub language: String,
    /// Subtitle content as returned by the service
    pub content: String,
    /// File extension derived from the response metadata, including the
    /// leading dot (e.g. ".srt")
    pub extension: String,
}

/// Trait for subtitle services that can be queried by film fingerprint.
///
/// The orchestrator only depends on this seam, so tests can substitute an
/// in-memory implementation for the real SubDB client.
pub trait SubtitleService {
    /// Returns the language codes with a subtitle available for the given
    /// fingerprint, in the order reported by the service.
    ///
    /// An empty list means "nothing found", whether because no subtitles
    /// exist or because the request failed; the service does not tell the
    /// two apart and neither does this method.
    fn search(&self, fingerprint: &Fingerprint) -> Vec<String>;

    /// Downloads the subtitle for one language.
    ///
    /// # Arguments
    ///
    /// * `fingerprint` - The film fingerprint used for the search
    /// * `language` - A language code previously returned by `search`
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the service answers with a non-success
    /// status and `Transport` when the request cannot be completed.
    fn download(
        &self,
        fingerprint: &Fingerprint,
        language: &str,
    ) -> Result<SubtitleArtifact, SubtitleServiceError>;
}
