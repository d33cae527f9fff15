use std::fmt;

use thiserror::Error;

/// Errors that can occur during recipe conversion
#[derive(Error, Debug)]
pub enum ConvertError {
    /// Failed to read the export or write an output file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The export is not well-formed XML
    #[error("Malformed recipe export: {0}")]
    Xml(#[from] roxmltree::Error),

    /// The export is XML but not a Gourmet document
    #[error("Unsupported document: expected <gourmetDoc> root, found <{0}>")]
    UnsupportedFormat(String),

    /// The export contains no convertible recipe
    #[error("No recipes found in the export")]
    NoRecipes,

    /// Some records were rejected and strict mode is on
    #[error("{0} recipe(s) were rejected")]
    RejectedRecords(usize),

    /// Failed to assemble or serialize the PDF document
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    /// Failed to serialize cookbook JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Failed to decode an embedded recipe image
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Builder configuration error
    #[error("Builder error: {0}")]
    BuilderError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),
}

/// Why a single recipe record was skipped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    MissingTitle,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::MissingTitle => write!(f, "missing title"),
        }
    }
}

/// A recipe that could not be extracted. Rejections are collected, not raised,
/// so that sibling recipes in the same export still convert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordError {
    /// Zero-based position of the `<recipe>` element in the export
    pub index: usize,
    /// Value of the recipe's `id` attribute, if present
    pub id: Option<String>,
    pub reason: RejectReason,
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.id {
            Some(id) => write!(f, "recipe #{} (id {}): {}", self.index + 1, id, self.reason),
            None => write!(f, "recipe #{}: {}", self.index + 1, self.reason),
        }
    }
}
