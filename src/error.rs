// Error type shared by every layer of the library. The binary wraps these in
// `anyhow` at the top level and turns any of them into exit code 1.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to determine home directory. Please set HOME_DIR env variable to your home directory")]
    NoHomeDir,

    #[error("hostgo authentication required. Please run `hostgo login` to authenticate your account")]
    NotAuthenticated,

    #[error("failed to read app config: {0}")]
    MissingProjectConfig(String),

    #[error("{0}")]
    InvalidArgument(String),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("unexpected server response: {0}")]
    Parse(#[from] serde_json::Error),

    /// Failure reported by the platform, either through the envelope or a
    /// non-OK status code.
    #[error("{0}")]
    Server(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("build failed: {0}")]
    Build(String),
}
