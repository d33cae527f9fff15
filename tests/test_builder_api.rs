use gourmet_convert::config::ConverterConfig;
use gourmet_convert::{ConvertError, Converter, OutputFormat};
use std::fs;

const EXPORT: &str = r#"<gourmetDoc>
  <recipe id="1"><title>Soup</title><instructions>Simmer.</instructions></recipe>
</gourmetDoc>"#;

#[test]
fn test_builder_requires_input() {
    let result = Converter::builder().format(OutputFormat::Json).build();
    match result {
        Err(ConvertError::BuilderError(msg)) => assert!(msg.contains("input")),
        other => panic!("Expected BuilderError, got {:?}", other),
    }
}

#[test]
fn test_builder_defaults_to_pdf() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("soup.grmt");
    fs::write(&input, EXPORT).unwrap();

    let report = Converter::builder()
        .input(&input)
        .config(ConverterConfig::default())
        .build()
        .unwrap();

    assert_eq!(report.format, OutputFormat::Pdf);
    assert_eq!(report.converted, 1);
    assert!(dir.path().join("soup.pdf").is_file());
}

#[test]
fn test_builder_creates_missing_output_dir() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("soup.grmt");
    fs::write(&input, EXPORT).unwrap();
    let out = dir.path().join("nested").join("cookbook");

    let report = Converter::builder()
        .input(&input)
        .output_dir(&out)
        .format(OutputFormat::Json)
        .config(ConverterConfig::default())
        .build()
        .unwrap();

    assert_eq!(report.outputs, vec![out.join("soup").join("recipe.json")]);
}

#[test]
fn test_builder_with_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("soup.grmt");
    fs::write(&input, EXPORT).unwrap();
    let config_path = dir.path().join("gourmet-convert.toml");
    fs::write(&config_path, "[json]\nlayout = \"combined\"\npretty = false\n").unwrap();

    let config = ConverterConfig::load_from(&config_path).unwrap();
    Converter::builder()
        .input(&input)
        .format(OutputFormat::Json)
        .config(config)
        .build()
        .unwrap();

    let json = fs::read_to_string(dir.path().join("recipes.json")).unwrap();
    assert!(json.starts_with("[{\"@context\""));
    assert_eq!(json.lines().count(), 1);
}

#[test]
fn test_output_format_display() {
    assert_eq!(OutputFormat::Pdf.to_string(), "pdf");
    assert_eq!(OutputFormat::Json.to_string(), "json");
}
