use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("empty identifier")]
    EmptyIdentifier,

    #[error("invalid DOI: {0}")]
    InvalidDoi(String),

    #[error("invalid arXiv ID: {0}")]
    InvalidArxivId(String),

    #[error("invalid ISBN: {0}")]
    InvalidIsbn(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error from {url}: HTTP {status}")]
    Api { url: String, status: u16 },

    #[error("parse error: {0}")]
    Parse(String),

    #[error("unknown document type: {0}")]
    UnknownDocumentType(String),

    #[error("unknown field id: {0}")]
    UnknownField(String),

    #[error("duplicate source id: {0}")]
    DuplicateSource(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

pub type Result<T> = std::result::Result<T, ImportError>;
