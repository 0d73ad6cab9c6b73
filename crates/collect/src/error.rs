use thiserror::Error;

/// Errors from external data-source queries.
///
/// These never abort a run: collectors catch them per item and report the
/// item as failed.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("API error: {0}")]
    Api(String),

    #[error("malformed response: {0}")]
    Malformed(String),
}
