use crate::model::RecipeDocument;
use crate::ConvertError;
use std::fmt;
use std::path::{Path, PathBuf};

pub mod json;
pub mod pdf;

pub use self::json::JsonRenderer;
pub use self::pdf::PdfRenderer;

/// Output strategy consuming extracted recipes
pub trait Renderer {
    /// Renderer name used in log output (e.g., "pdf", "json")
    fn name(&self) -> &str;

    /// Writes the recipes below `output_dir` and returns the files created
    fn render(&self, document: &RecipeDocument, output_dir: &Path) -> Result<Vec<PathBuf>, ConvertError>;
}

/// Represents the desired output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// One print-ready PDF for the whole collection (default)
    #[default]
    Pdf,
    /// Cookbook JSON documents
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Pdf => write!(f, "pdf"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}
