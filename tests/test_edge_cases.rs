use gourmet_convert::config::ConverterConfig;
use gourmet_convert::{extract_recipes, load_recipes, ConvertError, Converter, OutputFormat};
use std::fs;

#[test]
fn test_missing_input_file() {
    let dir = tempfile::tempdir().unwrap();
    let result = load_recipes(&dir.path().join("missing.grmt"));
    assert!(matches!(result, Err(ConvertError::Io(_))));
}

#[test]
fn test_malformed_xml() {
    let result = extract_recipes("<gourmetDoc><recipe><title>Soup</recipe>");
    assert!(matches!(result, Err(ConvertError::Xml(_))));
}

#[test]
fn test_foreign_root_element() {
    let result = extract_recipes("<cookbook><recipe><title>Soup</title></recipe></cookbook>");
    match result {
        Err(ConvertError::UnsupportedFormat(root)) => assert_eq!(root, "cookbook"),
        other => panic!("Expected UnsupportedFormat, got {:?}", other.map(|e| e.document.len())),
    }
}

#[test]
fn test_empty_export_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("empty.grmt");
    fs::write(&input, "<gourmetDoc></gourmetDoc>").unwrap();

    for format in [OutputFormat::Pdf, OutputFormat::Json] {
        let result = Converter::builder()
            .input(&input)
            .format(format)
            .config(ConverterConfig::default())
            .build();
        assert!(matches!(result, Err(ConvertError::NoRecipes)));
    }
    assert!(!dir.path().join("empty.pdf").exists());
}

#[test]
fn test_only_rejected_recipes_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("untitled.grmt");
    fs::write(&input, "<gourmetDoc><recipe><title>  </title></recipe></gourmetDoc>").unwrap();

    let result = Converter::builder()
        .input(&input)
        .format(OutputFormat::Json)
        .config(ConverterConfig::default())
        .build();
    assert!(matches!(result, Err(ConvertError::NoRecipes)));
}

#[test]
fn test_entities_and_umlauts_are_decoded() {
    let extraction = extract_recipes(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<gourmetDoc>
  <recipe>
    <title>Fish &amp; Chips</title>
    <ingredient-list>
      <ingredient><amount>1</amount><item>Zitrone (gepresst) &#8211; frisch</item></ingredient>
    </ingredient-list>
    <instructions>Frittieren &lt;180 °C&gt;.</instructions>
  </recipe>
</gourmetDoc>"#,
    )
    .unwrap();

    let recipe = &extraction.document.recipes[0];
    assert_eq!(recipe.title, "Fish & Chips");
    assert_eq!(recipe.ingredients[0].display_text(), "1 Zitrone (gepresst) – frisch");
    assert_eq!(recipe.instructions, vec!["Frittieren <180 °C>."]);
}
