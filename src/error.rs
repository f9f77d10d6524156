use displaydoc::Display;
use std::{io, result::Result as StdResult};
use thiserror::Error;

/// Errors at the edges of the crate. Rendering itself never fails.
#[derive(Debug, Error, Display)]
pub enum Error {
    /// IO Error: {0}
    Io(#[from] io::Error),
    /// Invalid JSON: {0}
    Json(#[from] serde_json::Error),
    /// Invalid config: {0}
    Config(#[from] toml::de::Error),
    /// Typst compilation failed: {0}
    Typst(String),
    /// PDF generation failed: {0}
    Pdf(String),
}

pub type Result<T> = StdResult<T, Error>;
