use log::debug;
use roxmltree::{Document, ParsingOptions};
use std::fs;
use std::path::Path;

use crate::ConvertError;

/// Root element of a Gourmet export
pub const GOURMET_ROOT: &str = "gourmetDoc";

/// Reads a recipe export from disk
pub fn read_export(path: &Path) -> Result<String, ConvertError> {
    let content = fs::read_to_string(path)?;
    debug!("Read {} bytes from {}", content.len(), path.display());
    Ok(content)
}

/// Parses export markup into a document tree.
///
/// Gourmet writes a `<!DOCTYPE gourmetDoc>` declaration, so DTDs are allowed.
/// The root element must be `gourmetDoc`.
pub fn parse_export(content: &str) -> Result<Document<'_>, ConvertError> {
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    let document = Document::parse_with_options(content, options)?;

    let root = document.root_element().tag_name().name();
    if root != GOURMET_ROOT {
        return Err(ConvertError::UnsupportedFormat(root.to_string()));
    }

    Ok(document)
}
