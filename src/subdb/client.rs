/// SubDB protocol client implementation.
use super::{SubtitleArtifact, SubtitleService, SubtitleServiceError};
use crate::fingerprint::Fingerprint;
use reqwest::header::CONTENT_DISPOSITION;

/// Production API endpoint; http://sandbox.thesubdb.com/?action= is
/// available for experiments against test data.
const DEFAULT_BASE_URL: &str = "http://api.thesubdb.com/?action=";

/// Identifying user-agent the SubDB protocol requires on every request.
/// Requests without it may be rejected by the service.
const PROTOCOL_USER_AGENT: &str = "SubDB/1.0 (subfetch/0.1; https://github.com/subfetch/subfetch)";

/// Extension used when the response carries no usable filename metadata
const FALLBACK_EXTENSION: &str = ".srt";

/// API actions, rendered lowercase on the wire
#[derive(Debug, Clone, Copy)]
enum Action {
    Search,
    Download,
}

impl Action {
    fn as_str(self) -> &'static str {
        match self {
            Action::Search => "search",
            Action::Download => "download",
        }
    }
}

/// Outcome of a single HTTP exchange against the service.
///
/// Transport exceptions are folded into a variant here instead of being
/// propagated; the caller decides whether a failed exchange is an error
/// (download) or an empty result (search).
enum RequestOutcome {
    /// HTTP success with the body and the raw Content-Disposition header
    Success {
        body: String,
        disposition: Option<String>,
    },
    /// The service answered with a non-success status
    HttpError(u16),
    /// The request never completed (connection, DNS, timeout, decode)
    Transport(String),
}

/// Subtitle service backed by the SubDB HTTP API.
///
/// This client speaks the SubDB wire protocol: GET requests of the form
/// `<base><action>&hash=<fingerprint>[&language=<code>]` with a fixed
/// protocol user-agent, plain-text responses.
pub struct SubDbClient {
    base_url: String,
}

impl SubDbClient {
    /// Creates a client against the production SubDB endpoint.
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Creates a client against an alternate endpoint, such as the SubDB
    /// sandbox or a local test server. The base is expected to end with
    /// `?action=`.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// Appends the action and fingerprint to the base URL.
    fn request_url(
        &self,
        action: Action,
        fingerprint: &Fingerprint,
        language: Option<&str>,
    ) -> String {
        let mut url = format!(
            "{}{}&hash={}",
            self.base_url,
            action.as_str(),
            fingerprint.as_str()
        );
        if let Some(language) = language {
            url.push_str("&language=");
            url.push_str(language);
        }
        url
    }

    /// Performs one GET request against the service.
    ///
    /// A fresh transport client is built for every call and dropped with
    /// it; connections are not reused across requests.
    fn request(&self, url: &str) -> RequestOutcome {
        let client = match reqwest::blocking::Client::builder()
            .user_agent(PROTOCOL_USER_AGENT)
            .build()
        {
            Ok(client) => client,
            Err(e) => return RequestOutcome::Transport(e.to_string()),
        };

        let response = match client.get(url).send() {
            Ok(response) => response,
            Err(e) => return RequestOutcome::Transport(e.to_string()),
        };

        if !response.status().is_success() {
            return RequestOutcome::HttpError(response.status().as_u16());
        }

        let disposition = response
            .headers()
            .get(CONTENT_DISPOSITION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        match response.text() {
            Ok(body) => RequestOutcome::Success { body, disposition },
            Err(e) => RequestOutcome::Transport(e.to_string()),
        }
    }
}

impl Default for SubDbClient {
    fn default() -> Self {
        Self::new()
    }
}

impl SubtitleService for SubDbClient {
    fn search(&self, fingerprint: &Fingerprint) -> Vec<String> {
        let url = self.request_url(Action::Search, fingerprint, None);

        match self.request(&url) {
            RequestOutcome::Success { body, .. } => parse_language_list(&body),
            // The service reports "no subtitles" as a non-success status
            // and does not distinguish it from a failed request; both
            // surface as an empty result.
            RequestOutcome::HttpError(_) | RequestOutcome::Transport(_) => Vec::new(),
        }
    }

    fn download(
        &self,
        fingerprint: &Fingerprint,
        language: &str,
    ) -> Result<SubtitleArtifact, SubtitleServiceError> {
        let url = self.request_url(Action::Download, fingerprint, Some(language));

        match self.request(&url) {
            RequestOutcome::Success { body, disposition } => {
                let extension = disposition
                    .as_deref()
                    .and_then(extension_from_disposition)
                    .unwrap_or_else(|| FALLBACK_EXTENSION.to_string());

                Ok(SubtitleArtifact {
                    language: language.to_string(),
                    content: body,
                    extension,
                })
            }
            RequestOutcome::HttpError(status) => Err(SubtitleServiceError::NotFound(status)),
            RequestOutcome::Transport(reason) => Err(SubtitleServiceError::Transport(reason)),
        }
    }
}

/// Splits a search response body into language codes.
///
/// The service answers with a comma-separated list (`"en,pt,fr"`). Order
/// is preserved and duplicates are kept; blank tokens (including an empty
/// body) are discarded.
fn parse_language_list(body: &str) -> Vec<String> {
    body.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// Extracts the file extension from a Content-Disposition header.
///
/// Handles both quoted and unquoted filename parameters:
/// - `attachment; filename="movie.srt"`
/// - `attachment; filename=movie.srt`
///
/// Only the extension of the suggested filename is of interest here; the
/// rest of the name is discarded.
fn extension_from_disposition(header: &str) -> Option<String> {
    let filename = parse_disposition_filename(header)?;
    let dot_index = filename.rfind('.')?;
    let extension = &filename[dot_index..];
    (extension.len() > 1).then(|| extension.to_string())
}

/// Parses the filename parameter out of a Content-Disposition header
fn parse_disposition_filename(header: &str) -> Option<String> {
    let position = header.find("filename=")?;
    let value = header[position + "filename=".len()..].trim();

    if let Some(stripped) = value.strip_prefix('"') {
        let end = stripped.find('"')?;
        return Some(stripped[..end].to_string());
    }

    let end = value.find(';').unwrap_or(value.len());
    let filename = value[..end].trim();
    (!filename.is_empty()).then(|| filename.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fingerprint() -> Fingerprint {
        Fingerprint::from_hex("ffd8d4aa68033dc03d1c8ef373b9028c")
    }

    #[test]
    fn test_search_url_shape() {
        let client = SubDbClient::with_base_url("http://sandbox.thesubdb.com/?action=");
        let fingerprint = fingerprint();

        let url = client.request_url(Action::Search, &fingerprint, None);
        assert_eq!(
            url,
            format!(
                "http://sandbox.thesubdb.com/?action=search&hash={}",
                fingerprint.as_str()
            )
        );
    }

    #[test]
    fn test_download_url_carries_language_parameter() {
        let client = SubDbClient::with_base_url("http://sandbox.thesubdb.com/?action=");
        let fingerprint = fingerprint();

        let url = client.request_url(Action::Download, &fingerprint, Some("pt"));
        assert_eq!(
            url,
            format!(
                "http://sandbox.thesubdb.com/?action=download&hash={}&language=pt",
                fingerprint.as_str()
            )
        );
    }

    #[test]
    fn test_actions_are_lowercase_on_the_wire() {
        assert_eq!(Action::Search.as_str(), "search");
        assert_eq!(Action::Download.as_str(), "download");
    }

    #[test]
    fn test_parse_language_list_preserves_order_and_duplicates() {
        assert_eq!(parse_language_list("en,pt,en"), vec!["en", "pt", "en"]);
    }

    #[test]
    fn test_parse_language_list_single_code() {
        assert_eq!(parse_language_list("en"), vec!["en"]);
    }

    #[test]
    fn test_parse_language_list_empty_body() {
        assert!(parse_language_list("").is_empty());
        assert!(parse_language_list("  ").is_empty());
    }

    #[test]
    fn test_parse_language_list_discards_blank_tokens() {
        assert_eq!(parse_language_list("en,,fr,"), vec!["en", "fr"]);
    }

    #[test]
    fn test_extension_from_disposition_quoted() {
        let header = r#"attachment; filename="movie.srt""#;
        assert_eq!(extension_from_disposition(header), Some(".srt".to_string()));
    }

    #[test]
    fn test_extension_from_disposition_unquoted() {
        let header = "attachment; filename=movie.sub";
        assert_eq!(extension_from_disposition(header), Some(".sub".to_string()));
    }

    #[test]
    fn test_extension_from_disposition_with_trailing_parameter() {
        let header = r#"attachment; filename="movie.srt"; size=1234"#;
        assert_eq!(extension_from_disposition(header), Some(".srt".to_string()));
    }

    #[test]
    fn test_extension_from_disposition_without_filename() {
        assert_eq!(extension_from_disposition("attachment"), None);
    }

    #[test]
    fn test_extension_from_disposition_filename_without_extension() {
        let header = r#"attachment; filename="movie""#;
        assert_eq!(extension_from_disposition(header), None);
    }
}
