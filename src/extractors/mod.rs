use crate::model::RecipeDocument;
use crate::RecordError;
use roxmltree::Document;

mod gourmet;

pub use self::gourmet::GourmetExtractor;

/// Recipes extracted from an export, together with the records that were skipped
#[derive(Debug, Default)]
pub struct Extraction {
    pub document: RecipeDocument,
    pub rejected: Vec<RecordError>,
}

pub trait Extractor {
    fn can_parse(&self, document: &Document) -> bool;
    fn extract(&self, document: &Document) -> Extraction;
}
