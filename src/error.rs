use std::io;

use thiserror::Error;

/// Failures while obtaining an access token.
///
/// All of these are fatal for a run: without a token nothing else can
/// proceed.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("no valid access token available, run `likesync auth` first")]
    NoValidToken,

    #[error("timed out waiting for the authorization redirect")]
    Timeout,

    #[error("token endpoint answered with status {0}")]
    ExchangeFailed(u16),

    #[error("authorization was declined in the browser")]
    ConsentDenied,

    #[error("callback server failed: {0}")]
    CallbackServer(String),

    #[error("token store failed: {0}")]
    Store(#[from] StoreError),

    #[error("token request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Failures of a single call against the remote Web API.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("remote API answered with status {0}")]
    Status(u16),

    #[error("remote API request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("no usable access token: {0}")]
    Auth(#[from] AuthError),
}

/// Failures while paging through a remote collection.
///
/// A fetch never aborts with these; they are attached to the partial
/// result and surfaced as a warning.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("partial result, {collected} items fetched before: {cause}")]
    PartialResult {
        collected: usize,
        cause: Box<FetchError>,
    },

    #[error("endpoint answered with status {0}")]
    EndpointFailure(u16),

    #[error("request failed: {0}")]
    Transport(String),

    #[error("not authorized: {0}")]
    Unauthorized(String),
}

impl From<ApiError> for FetchError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Status(status) => FetchError::EndpointFailure(status),
            ApiError::Transport(e) => FetchError::Transport(e.to_string()),
            ApiError::Auth(e) => FetchError::Unauthorized(e.to_string()),
        }
    }
}

/// Failures of the batched playlist write.
///
/// `index` is the zero-based chunk that failed, which is also the number of
/// chunks already applied. Applied chunks are not rolled back.
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("chunk {index} was rejected with status {status}")]
    ChunkFailure { status: u16, index: usize },

    #[error("chunk {index} could not be sent: {message}")]
    ChunkTransport { index: usize, message: String },
}

impl WriteError {
    /// Number of chunks that were written before the failure.
    pub fn committed_chunks(&self) -> usize {
        match self {
            WriteError::ChunkFailure { index, .. } | WriteError::ChunkTransport { index, .. } => {
                *index
            }
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UserInputError {
    #[error("invalid selection: {0:?}")]
    InvalidSelection(String),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    IoError(#[from] io::Error),

    #[error("malformed token file: {0}")]
    SerdeError(#[from] serde_json::Error),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{key} has an invalid value: {value}")]
    Invalid { key: &'static str, value: String },
}
