//! All error types for the resgen crate.
//!
//! These are returned from every fallible stage of a generation pass (loading,
//! merging, validation, generation and emission).

use std::path::PathBuf;

use thiserror::Error;

use crate::{types::ResourceKind, validation::Violations};

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid locale token `{0}`")]
    InvalidLocaleToken(String),

    #[error("failed to parse {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("XML parse error: {0}")]
    XmlParse(#[from] quick_xml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid file mask: {0}")]
    Glob(#[from] globset::Error),

    #[error("file tree walk failed: {0}")]
    Walk(#[from] ignore::Error),

    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error("{kind} resources have localized entries but no base locale entries")]
    MissingBaseLocale { kind: ResourceKind },

    #[error("invalid resource data for `{key}`: {message}")]
    InvalidResourceData { key: String, message: String },

    #[error("validation failed: {0}")]
    Validation(Violations),

    #[error("{}", format_aggregate(.0))]
    Aggregate(Vec<Error>),
}

impl Error {
    /// Creates a parse error for the given input file.
    pub fn parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Error::Parse {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates an invalid resource data error naming the offending key.
    pub fn invalid_data(key: impl Into<String>, message: impl Into<String>) -> Self {
        Error::InvalidResourceData {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Collapses a list of errors: none is success, one is returned as-is.
    pub fn from_many(mut errors: Vec<Error>) -> Result<(), Error> {
        match errors.len() {
            0 => Ok(()),
            1 => Err(errors.remove(0)),
            _ => Err(Error::Aggregate(errors)),
        }
    }

    /// Returns the collected violations when this is a validation failure.
    pub fn violations(&self) -> Option<&Violations> {
        match self {
            Error::Validation(violations) => Some(violations),
            _ => None,
        }
    }
}

impl From<Violations> for Error {
    fn from(value: Violations) -> Self {
        Error::Validation(value)
    }
}

fn format_aggregate(errors: &[Error]) -> String {
    let lines = errors
        .iter()
        .map(|e| format!("  - {}", e))
        .collect::<Vec<_>>()
        .join("\n");
    format!("{} errors occurred:\n{}", errors.len(), lines)
}
