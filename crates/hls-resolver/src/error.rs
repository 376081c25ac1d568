use reqwest::StatusCode;

/// Errors produced while resolving a playlist into segments.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("Invalid URL {url}: {source}")]
    UrlParse {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Failed to fetch playlist {url}: HTTP {status}")]
    HttpStatus { url: String, status: StatusCode },

    #[error("Failed to decode playlist {url}: {reason}")]
    Decode { url: String, reason: String },

    #[error("Unsupported playlist format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid option number: '{input}'")]
    InvalidSelection { input: String },

    #[error("Playlist nesting exceeded {depth} levels")]
    DepthExceeded { depth: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP client error: {0}")]
    Client(String),
}

impl ResolveError {
    pub(crate) fn url_parse(url: impl Into<String>, source: url::ParseError) -> Self {
        ResolveError::UrlParse {
            url: url.into(),
            source,
        }
    }

    pub(crate) fn decode(url: impl Into<String>, reason: impl Into<String>) -> Self {
        ResolveError::Decode {
            url: url.into(),
            reason: reason.into(),
        }
    }
}
