/// Fatal error type for a digest run.
///
/// Everything here terminates the invocation: a missing or malformed
/// snapshot, or an unresolvable webhook URL. Delivery failures have their
/// own typed error in the adapter crate so callers can pattern-match on
/// transport vs. application-level rejection.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
