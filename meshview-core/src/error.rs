/// Error types for the model load pipeline
use std::io;

use thiserror::Error;

/// Errors produced while loading a model file. Any of these aborts the
/// load as a whole; no partial mesh ever reaches the renderer.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The file could not be opened or read, including a binary STL that
    /// ends before its declared triangle records.
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),

    /// Structurally invalid line or record.
    #[error("format error at line {line}: {reason}")]
    Format { line: usize, reason: String },

    /// The first line needed to classify an STL file as ASCII or binary
    /// could not be read.
    #[error("could not determine stl encoding: {0}")]
    Detect(#[source] io::Error),

    /// File extension outside the supported set.
    #[error("unsupported model format: {extension:?}")]
    UnsupportedFormat { extension: String },
}

impl LoadError {
    pub(crate) fn format(line: usize, reason: impl Into<String>) -> Self {
        Self::Format {
            line,
            reason: reason.into(),
        }
    }

    pub(crate) fn truncated(detail: impl Into<String>) -> Self {
        Self::Io(io::Error::new(io::ErrorKind::UnexpectedEof, detail.into()))
    }

    /// Fixed diagnostic string for the viewer's status line.
    pub fn status_label(&self) -> &'static str {
        match self {
            Self::Detect(_) => "Error checking if stl is ascii or binary.",
            Self::UnsupportedFormat { .. } => "Unsupported model format.",
            Self::Io(_) | Self::Format { .. } => "Error loading model.",
        }
    }
}
