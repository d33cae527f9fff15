//! Converts recipe exports of the Gourmet recipe manager (`.grmt` XML) into a
//! print-ready PDF collection or into schema.org recipe JSON for a
//! self-hosted cookbook.
//!
//! The pipeline is linear: [`loader`] reads and parses the export,
//! [`extractors`] map `<recipe>` elements to [`Recipe`] records, and one of
//! the [`renderers`] writes the output.

pub mod builder;
pub mod config;
pub mod error;
pub mod extractors;
pub mod loader;
pub mod model;
pub mod renderers;

use log::debug;
use std::path::Path;

pub use builder::{ConversionReport, Converter, ConverterBuilder};
pub use config::ConverterConfig;
pub use error::{ConvertError, RecordError, RejectReason};
pub use extractors::{Extraction, Extractor, GourmetExtractor};
pub use model::{Ingredient, Rating, Recipe, RecipeDocument, RecipeImage};
pub use renderers::{JsonRenderer, OutputFormat, PdfRenderer, Renderer};

/// Extracts all recipes from export markup.
///
/// Recipes that cannot be extracted are listed in [`Extraction::rejected`]
/// and do not affect the others.
pub fn extract_recipes(content: &str) -> Result<Extraction, ConvertError> {
    let document = loader::parse_export(content)?;

    let extractor = GourmetExtractor;
    if !extractor.can_parse(&document) {
        let root = document.root_element().tag_name().name().to_string();
        return Err(ConvertError::UnsupportedFormat(root));
    }

    let extraction = extractor.extract(&document);
    debug!(
        "Extracted {} recipe(s), rejected {}",
        extraction.document.len(),
        extraction.rejected.len()
    );
    Ok(extraction)
}

/// Reads an export file and extracts all recipes from it
pub fn load_recipes(path: &Path) -> Result<Extraction, ConvertError> {
    let content = loader::read_export(path)?;
    extract_recipes(&content)
}
