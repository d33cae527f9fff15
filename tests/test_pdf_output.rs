use gourmet_convert::config::{ConverterConfig, PdfConfig};
use gourmet_convert::{extract_recipes, Converter, OutputFormat, PdfRenderer};
use lopdf::Document;
use std::fs;
use std::path::{Path, PathBuf};

const EXPORT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE gourmetDoc>
<gourmetDoc>
  <recipe id="1">
    <title>Käsespätzle</title>
    <category>Hauptgericht</category>
    <source>Oma Erna</source>
    <link>https://example.com/spaetzle</link>
    <yields>4 servings</yields>
    <rating>4.5/5 stars</rating>
    <ingredient-list>
      <ingredient><amount>400</amount><unit>g</unit><item>Mehl</item></ingredient>
      <ingredient><amount>4</amount><item>Eier</item></ingredient>
      <ingredient optional="yes"><item>Schnittlauch</item></ingredient>
    </ingredient-list>
    <instructions>Teig rühren, bis er Blasen wirft.

Spätzle schaben und mit Käse schichten.</instructions>
    <modifications>Mit Röstzwiebeln servieren.</modifications>
  </recipe>
  <recipe id="2">
    <title>Pancakes</title>
    <instructions>Mix and fry.</instructions>
  </recipe>
</gourmetDoc>
"#;

fn write_export(dir: &Path) -> PathBuf {
    let path = dir.join("Rezepte.grmt");
    fs::write(&path, EXPORT).unwrap();
    path
}

#[test]
fn test_pdf_is_written_next_to_input() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_export(dir.path());

    let report = Converter::builder()
        .input(&input)
        .config(ConverterConfig::default())
        .build()
        .unwrap();

    let pdf = dir.path().join("Rezepte.pdf");
    assert_eq!(report.format, OutputFormat::Pdf);
    assert_eq!(report.outputs, vec![pdf.clone()]);

    let bytes = fs::read(&pdf).unwrap();
    assert!(bytes.starts_with(b"%PDF-"));

    let doc = Document::load_mem(&bytes).unwrap();
    assert_eq!(doc.get_pages().len(), 2);
}

#[test]
fn test_title_and_author_go_into_info_dictionary() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_export(dir.path());
    let out = dir.path().join("print");

    Converter::builder()
        .input(&input)
        .output_dir(&out)
        .config(ConverterConfig::default())
        .title("Familienrezepte")
        .author("Markus")
        .build()
        .unwrap();

    let doc = Document::load(out.join("Rezepte.pdf")).unwrap();
    let info = doc
        .trailer
        .get(b"Info")
        .and_then(|info| info.as_reference())
        .and_then(|id| doc.get_dictionary(id))
        .unwrap();
    assert_eq!(info.get(b"Title").unwrap().as_str().unwrap(), b"Familienrezepte");
    assert_eq!(info.get(b"Author").unwrap().as_str().unwrap(), b"Markus");
}

#[test]
fn test_recipes_can_share_pages() {
    let extraction = extract_recipes(EXPORT).unwrap();
    let config = PdfConfig {
        page_break_after_recipe: false,
        ..Default::default()
    };

    let bytes = PdfRenderer::new(config, "out.pdf")
        .render_to_bytes(&extraction.document.recipes)
        .unwrap();
    let doc = Document::load_mem(&bytes).unwrap();
    assert_eq!(doc.get_pages().len(), 1);
}

#[test]
fn test_rendering_is_deterministic() {
    let extraction = extract_recipes(EXPORT).unwrap();
    let renderer = PdfRenderer::new(PdfConfig::default(), "out.pdf");

    let first = renderer.render_to_bytes(&extraction.document.recipes).unwrap();
    let second = renderer.render_to_bytes(&extraction.document.recipes).unwrap();
    assert_eq!(first, second);
}
