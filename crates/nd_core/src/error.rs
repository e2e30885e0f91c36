use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx response whose body is not a News API error document.
    #[error("Unexpected status {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    /// Error document returned by the News API (`{"status":"error", ...}`).
    #[error("News API error {code} (status {status}): {message}")]
    Api {
        status: reqwest::StatusCode,
        code: String,
        message: String,
    },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid category: {0}")]
    InvalidCategory(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// True for errors caused by bad user input rather than the remote API.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Error::InvalidCategory(_) | Error::InvalidDate(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
