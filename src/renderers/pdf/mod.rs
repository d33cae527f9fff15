//! PDF rendering of a recipe collection.
//!
//! Every recipe becomes a section with a bookmarked heading, an info block
//! (source, link, rating stars, category), the ingredient list next to the
//! recipe image, and the instructions and notes. The first page carries the
//! collection title and author, and every page a footer with the page number.

mod fonts;
mod images;
mod layout;

use log::{debug, info, warn};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};
use std::fs;
use std::path::{Path, PathBuf};

use self::fonts::{text_string, Font, FULL_STAR, HALF_STAR};
use self::images::PdfImage;
use self::layout::{
    cm, text_operations, Bookmark, Page, TextStyle, Typesetter, BLACK, BLUE, PAGE_HEIGHT, PAGE_WIDTH,
};
use crate::config::PdfConfig;
use crate::model::{Recipe, RecipeDocument};
use crate::renderers::Renderer;
use crate::ConvertError;

const MARGIN_HORIZONTAL_CM: f32 = 2.0;
const FOOTER_OFFSET_CM: f32 = 1.5;
const MARGIN_VERTICAL: f32 = 72.0;
/// Room left above the first recipe for the collection title and author
const TITLE_BLOCK_CM: f32 = 3.5;
const COLUMN_GAP: f32 = 12.0;

const HEADING: TextStyle = TextStyle {
    font: Font::Helvetica,
    size: 15.0,
    leading: 18.0,
    space_before: 14.17,
    space_after: 7.09,
};

const SUBHEADING: TextStyle = TextStyle {
    font: Font::Helvetica,
    size: 13.0,
    leading: 18.0,
    space_before: 11.34,
    space_after: 5.67,
};

const BODY: TextStyle = TextStyle {
    font: Font::TimesRoman,
    size: 11.0,
    leading: 18.0,
    space_before: 0.0,
    space_after: 4.0,
};

const SMALL: TextStyle = TextStyle {
    font: Font::TimesRoman,
    size: 8.0,
    leading: 9.6,
    space_before: 0.0,
    space_after: 0.0,
};

/// Renders all recipes of an export into one PDF file
pub struct PdfRenderer {
    config: PdfConfig,
    file_name: String,
}

impl PdfRenderer {
    pub fn new(config: PdfConfig, file_name: impl Into<String>) -> Self {
        Self {
            config,
            file_name: file_name.into(),
        }
    }

    /// Lays out and serializes the document in memory
    pub fn render_to_bytes(&self, recipes: &[Recipe]) -> Result<Vec<u8>, ConvertError> {
        let mut doc = self.build_document(recipes)?;
        let mut buffer = Vec::new();
        doc.save_to(&mut buffer)?;
        Ok(buffer)
    }

    fn build_document(&self, recipes: &[Recipe]) -> Result<Document, ConvertError> {
        let mut composer = RecipeComposer::new(&self.config);
        composer.title_block();
        for (index, recipe) in recipes.iter().enumerate() {
            if index > 0 {
                composer.recipe_separator();
            }
            composer.recipe(recipe);
        }

        let (pages, bookmarks, images) = composer.finish();
        debug!(
            "Laid out {} recipe(s) on {} page(s) with {} image(s)",
            recipes.len(),
            pages.len(),
            images.len()
        );

        self.assemble(pages, &bookmarks, images)
    }

    fn assemble(
        &self,
        pages: Vec<Page>,
        bookmarks: &[Bookmark],
        images: Vec<(String, PdfImage)>,
    ) -> Result<Document, ConvertError> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let mut font_dict = Dictionary::new();
        for font in Font::ALL {
            let font_id = doc.add_object(font.dictionary());
            font_dict.set(font.resource_name(), font_id);
        }

        let mut xobjects = Dictionary::new();
        for (name, image) in images {
            let image_id = doc.add_object(image.into_stream());
            xobjects.set(name, image_id);
        }

        let resources_id = doc.add_object(dictionary! {
            "Font" => font_dict,
            "XObject" => xobjects,
        });

        let page_count = pages.len();
        let mut page_ids = Vec::with_capacity(page_count);
        for (index, page) in pages.into_iter().enumerate() {
            let mut operations = page.operations;
            operations.extend(self.footer(index + 1));
            let content = Content { operations };
            let content_id = doc.add_object(Stream::new(Dictionary::new(), content.encode()?));

            let mut page_dict = dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![0.0.into(), 0.0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
                "Contents" => content_id,
                "Resources" => resources_id,
            };

            if !page.links.is_empty() {
                let annotations: Vec<Object> = page
                    .links
                    .iter()
                    .map(|link| {
                        let annot = dictionary! {
                            "Type" => "Annot",
                            "Subtype" => "Link",
                            "Rect" => link.rect.iter().map(|v| (*v).into()).collect::<Vec<Object>>(),
                            "Border" => vec![0.into(), 0.into(), 0.into()],
                            "A" => dictionary! {
                                "Type" => "Action",
                                "S" => "URI",
                                "URI" => Object::string_literal(link.uri.as_str()),
                            },
                        };
                        Object::Reference(doc.add_object(annot))
                    })
                    .collect();
                page_dict.set("Annots", annotations);
            }

            page_ids.push(doc.add_object(page_dict));
        }

        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => page_ids.iter().map(|id| Object::Reference(*id)).collect::<Vec<_>>(),
                "Count" => page_count as i64,
            }),
        );

        let mut catalog = dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        };
        if let Some(outline_id) = build_outlines(&mut doc, bookmarks, &page_ids) {
            catalog.set("Outlines", outline_id);
            catalog.set("PageMode", "UseOutlines");
        }
        let catalog_id = doc.add_object(catalog);

        let mut info = dictionary! {
            "Title" => text_string(&self.config.title),
            "Producer" => Object::string_literal(concat!("gourmet-convert ", env!("CARGO_PKG_VERSION"))),
        };
        if !self.config.author.is_empty() {
            info.set("Author", text_string(&self.config.author));
        }
        let info_id = doc.add_object(info);

        doc.trailer.set("Root", catalog_id);
        doc.trailer.set("Info", info_id);
        Ok(doc)
    }

    fn footer(&self, page_number: usize) -> Vec<Operation> {
        let size = 10.0;
        let left = cm(MARGIN_HORIZONTAL_CM);
        let baseline = cm(FOOTER_OFFSET_CM);
        let label = format!("{} {}", self.config.labels.page, page_number);
        let right = PAGE_WIDTH - left - Font::Helvetica.text_width(&label, size);

        let mut operations = text_operations(left, baseline, &self.config.title, Font::Helvetica, size, BLACK);
        operations.extend(text_operations(right, baseline, &label, Font::Helvetica, size, BLACK));
        operations
    }
}

impl Renderer for PdfRenderer {
    fn name(&self) -> &str {
        "pdf"
    }

    fn render(&self, document: &RecipeDocument, output_dir: &Path) -> Result<Vec<PathBuf>, ConvertError> {
        let bytes = self.render_to_bytes(&document.recipes)?;
        fs::create_dir_all(output_dir)?;
        let path = output_dir.join(&self.file_name);
        fs::write(&path, bytes)?;
        info!("Wrote {} recipe(s) to {}", document.len(), path.display());
        Ok(vec![path])
    }
}

/// Lays out recipe sections on a [`Typesetter`] and collects the images they use
struct RecipeComposer<'a> {
    config: &'a PdfConfig,
    typesetter: Typesetter,
    images: Vec<(String, PdfImage)>,
}

impl<'a> RecipeComposer<'a> {
    fn new(config: &'a PdfConfig) -> Self {
        Self {
            config,
            typesetter: Typesetter::new(cm(MARGIN_HORIZONTAL_CM), MARGIN_VERTICAL, MARGIN_VERTICAL),
            images: Vec::new(),
        }
    }

    fn title_block(&mut self) {
        let title = &self.config.title;
        let author = &self.config.author;
        let ts = &mut self.typesetter;
        let width = ts.content_width();

        let mut baseline = PAGE_HEIGHT - 98.0;
        for line in layout::wrap_text(title, Font::Helvetica, 16.0, width) {
            let x = (PAGE_WIDTH - Font::Helvetica.text_width(&line, 16.0)) / 2.0;
            ts.text_at(x, baseline, &line, Font::Helvetica, 16.0, BLACK);
            baseline -= 19.2;
        }
        if !author.is_empty() {
            baseline -= 12.8;
            for line in layout::wrap_text(author, Font::Helvetica, 11.0, width) {
                let x = (PAGE_WIDTH - Font::Helvetica.text_width(&line, 11.0)) / 2.0;
                ts.text_at(x, baseline, &line, Font::Helvetica, 11.0, BLACK);
                baseline -= 13.2;
            }
        }
        // a wrapped title pushes the first recipe down
        ts.advance_to((MARGIN_VERTICAL + cm(TITLE_BLOCK_CM)).max(PAGE_HEIGHT - baseline));
    }

    fn recipe_separator(&mut self) {
        if self.config.page_break_after_recipe {
            self.typesetter.new_page();
        } else {
            self.typesetter.space(3.0 * BODY.leading);
        }
    }

    fn recipe(&mut self, recipe: &Recipe) {
        let config = self.config;
        let labels = &config.labels;
        let left = self.typesetter.left();
        let width = self.typesetter.content_width();

        // keep the heading together with the start of the section
        self.typesetter.space(HEADING.space_before);
        self.typesetter.ensure_space(HEADING.leading + 3.0 * BODY.leading);
        self.typesetter.bookmark(&recipe.title);
        for line in layout::wrap_text(&recipe.title, HEADING.font, HEADING.size, width) {
            self.typesetter.line(left, &line, &HEADING, BLACK);
        }
        self.typesetter.space(HEADING.space_after);

        self.info_block(recipe);

        self.typesetter.paragraph(&labels.ingredients, &SUBHEADING, left, width);
        self.ingredients(recipe);

        if !recipe.instructions.is_empty() {
            self.text_section(&labels.instructions, &recipe.instructions);
        }
        if !recipe.notes.is_empty() {
            self.text_section(&labels.notes, &recipe.notes);
        }
    }

    fn info_block(&mut self, recipe: &Recipe) {
        let config = self.config;
        let labels = &config.labels;
        let left = self.typesetter.left();
        let width = self.typesetter.content_width();

        if let Some(source) = &recipe.source {
            let text = format!("{}: {}", labels.source, source);
            self.typesetter.paragraph(&text, &SMALL, left, width);
        }

        if let Some(link) = &recipe.link {
            let prefix = format!("{}: ", labels.link);
            self.link_line(&prefix, link);
        }

        if let Some(rating) = recipe.rating {
            let (full, half) = rating.stars();
            let mut stars = vec![FULL_STAR; full];
            if half {
                stars.push(HALF_STAR);
            }
            let prefix = format!("{}: ", labels.rating);
            let ts = &mut self.typesetter;
            let baseline = ts.line(left, &prefix, &SMALL, BLACK);
            let x = left + SMALL.font.text_width(&prefix, SMALL.size);
            let stars = String::from_utf8_lossy(&stars).into_owned();
            ts.text_at(x, baseline, &stars, Font::ZapfDingbats, SMALL.size, BLACK);
        }

        if let Some(category) = &recipe.category {
            let text = format!("{}: {}", labels.category, category);
            self.typesetter.paragraph(&text, &SMALL, left, width);
        }
    }

    /// Writes `prefix` followed by the URL in blue, breaking the URL across
    /// lines as needed. Every line of the URL is clickable.
    fn link_line(&mut self, prefix: &str, uri: &str) {
        let ts = &mut self.typesetter;
        let left = ts.left();
        let prefix_width = SMALL.font.text_width(prefix, SMALL.size);
        let first_width = ts.content_width() - prefix_width;

        let baseline = ts.line(left, prefix, &SMALL, BLACK);
        let pieces = layout::break_word(uri, SMALL.font, SMALL.size, first_width);
        for (i, piece) in pieces.iter().enumerate() {
            let (x, baseline) = if i == 0 {
                (left + prefix_width, baseline)
            } else {
                (left + prefix_width, ts.next_line(&SMALL))
            };
            ts.text_at(x, baseline, piece, SMALL.font, SMALL.size, BLUE);
            let piece_width = SMALL.font.text_width(piece, SMALL.size);
            ts.link(
                [x, baseline - 2.0, x + piece_width, baseline + SMALL.size],
                uri,
            );
        }
    }

    /// Ingredient list in the left column, the image right-aligned beside it
    fn ingredients(&mut self, recipe: &Recipe) {
        let left = self.typesetter.left();
        let width = self.typesetter.content_width();
        let image = recipe.image.as_ref().and_then(|image| match PdfImage::decode(image) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                warn!("Leaving out image of recipe '{}': {}", recipe.title, e);
                None
            }
        });

        let mut column_width = width;
        let mut image_bottom = None;
        if let Some(image) = image {
            let (image_width, image_height) = image.fitted_size(cm(self.config.image_max_cm));
            self.typesetter.ensure_space(image_height);
            let name = format!("Im{}", self.images.len() + 1);
            self.typesetter
                .image_at(&name, left + width - image_width, image_width, image_height);
            self.images.push((name, image));
            column_width = (width - image_width - COLUMN_GAP).max(width / 3.0);
            image_bottom = Some((self.typesetter.page_index(), self.typesetter.cursor() + image_height));
        }

        let mut group: Option<&str> = None;
        for ingredient in &recipe.ingredients {
            if ingredient.group.as_deref() != group {
                group = ingredient.group.as_deref();
                if let Some(name) = group {
                    self.typesetter.line(left, name, &SUBHEADING_SMALL, BLACK);
                }
            }
            let text = ingredient.display_text_marked(&self.config.labels.optional);
            for line in layout::wrap_text(&text, BODY.font, BODY.size, column_width) {
                self.typesetter.line(left, &line, &BODY, BLACK);
            }
        }

        if let Some((page, bottom)) = image_bottom {
            if page == self.typesetter.page_index() {
                self.typesetter.advance_to(bottom);
            }
        }
    }

    fn text_section(&mut self, label: &str, paragraphs: &[String]) {
        let left = self.typesetter.left();
        let width = self.typesetter.content_width();
        self.typesetter.paragraph(label, &SUBHEADING, left, width);
        for paragraph in paragraphs {
            self.typesetter.paragraph(paragraph, &BODY, left, width);
        }
    }

    fn finish(self) -> (Vec<Page>, Vec<Bookmark>, Vec<(String, PdfImage)>) {
        let (pages, bookmarks) = self.typesetter.finish();
        (pages, bookmarks, self.images)
    }
}

/// Caption of an ingredient group
const SUBHEADING_SMALL: TextStyle = TextStyle {
    font: Font::Helvetica,
    size: 11.0,
    leading: 16.0,
    space_before: 0.0,
    space_after: 0.0,
};

/// Creates a flat document outline with one entry per recipe heading
fn build_outlines(doc: &mut Document, bookmarks: &[Bookmark], page_ids: &[ObjectId]) -> Option<ObjectId> {
    let entries: Vec<(&Bookmark, ObjectId)> = bookmarks
        .iter()
        .filter(|b| b.page < page_ids.len())
        .map(|b| (b, doc.new_object_id()))
        .collect();
    let (first, last) = (entries.first()?.1, entries.last()?.1);

    let outline_root_id = doc.add_object(dictionary! {
        "Type" => "Outlines",
        "First" => Object::Reference(first),
        "Last" => Object::Reference(last),
        "Count" => entries.len() as i64,
    });

    for (i, (bookmark, id)) in entries.iter().enumerate() {
        let dest = vec![
            Object::Reference(page_ids[bookmark.page]),
            "XYZ".into(),
            Object::Null,
            bookmark.top.into(),
            Object::Null,
        ];
        let mut dict = dictionary! {
            "Title" => text_string(&bookmark.title),
            "Parent" => Object::Reference(outline_root_id),
            "Dest" => dest,
        };
        if i > 0 {
            dict.set("Prev", Object::Reference(entries[i - 1].1));
        }
        if i + 1 < entries.len() {
            dict.set("Next", Object::Reference(entries[i + 1].1));
        }
        doc.objects.insert(*id, Object::Dictionary(dict));
    }

    Some(outline_root_id)
}
