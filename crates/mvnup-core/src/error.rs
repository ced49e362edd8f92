use thiserror::Error;

use crate::http::HttpError;

#[derive(Error, Debug)]
pub enum MvnupError {
    // Network errors
    #[error("Network error: {0}")]
    Http(#[from] HttpError),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Extraction errors
    #[error("Extraction failed: {0}")]
    Extraction(String),

    // Environment store errors
    #[error("Environment error: {0}")]
    Env(String),

    // Config errors
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, MvnupError>;
