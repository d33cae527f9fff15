use gourmet_convert::config::{ConverterConfig, JsonConfig, JsonLayout};
use gourmet_convert::{Converter, OutputFormat};
use serde_json::{json, Value};
use std::fs;
use std::path::Path;

const PNG_1X1: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mP8z8BQDwAEhQGAhKmMIQAAAABJRU5ErkJggg==";

fn write_export(dir: &Path, recipes: &str) -> std::path::PathBuf {
    let path = dir.join("Rezepte.grmt");
    let xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE gourmetDoc>
<gourmetDoc>
{}
</gourmetDoc>
"#,
        recipes
    );
    fs::write(&path, xml).unwrap();
    path
}

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn test_minimal_recipe_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_export(
        dir.path(),
        r#"<recipe id="1">
  <title>Pancakes</title>
  <ingredient-list>
    <ingredient><amount>2</amount><item>eggs</item></ingredient>
  </ingredient-list>
  <instructions>Mix and fry.</instructions>
</recipe>"#,
    );

    let report = Converter::builder()
        .input(&input)
        .format(OutputFormat::Json)
        .config(ConverterConfig::default())
        .build()
        .unwrap();

    assert_eq!(report.converted, 1);
    assert!(report.rejected.is_empty());

    let recipe = read_json(&dir.path().join("pancakes").join("recipe.json"));
    assert_eq!(
        recipe,
        json!({
            "@context": "http://schema.org",
            "@type": "Recipe",
            "name": "Pancakes",
            "recipeIngredient": ["2 eggs"],
            "recipeInstructions": ["Mix and fry."],
        })
    );
}

#[test]
fn test_missing_title_keeps_siblings() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_export(
        dir.path(),
        r#"<recipe id="1"><title>Soup</title></recipe>
<recipe id="2"><category>Broken</category></recipe>
<recipe id="3"><title>Bread</title></recipe>"#,
    );
    let out = dir.path().join("out");

    let report = Converter::builder()
        .input(&input)
        .output_dir(&out)
        .format(OutputFormat::Json)
        .config(ConverterConfig::default())
        .build()
        .unwrap();

    assert_eq!(report.converted, 2);
    assert_eq!(report.rejected.len(), 1);
    assert_eq!(report.rejected[0].id.as_deref(), Some("2"));
    assert!(out.join("soup").join("recipe.json").exists());
    assert!(out.join("bread").join("recipe.json").exists());
}

#[test]
fn test_strict_mode_rejects_export() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_export(
        dir.path(),
        r#"<recipe id="1"><title>Soup</title></recipe>
<recipe id="2"></recipe>"#,
    );
    let out = dir.path().join("out");

    let result = Converter::builder()
        .input(&input)
        .output_dir(&out)
        .format(OutputFormat::Json)
        .config(ConverterConfig::default())
        .strict(true)
        .build();

    assert!(matches!(
        result,
        Err(gourmet_convert::ConvertError::RejectedRecords(1))
    ));
    assert!(!out.exists());
}

#[test]
fn test_image_is_written_next_to_recipe() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_export(
        dir.path(),
        &format!(
            r#"<recipe id="7">
  <title>Apfelkuchen</title>
  <image format="png"><![CDATA[{}]]></image>
</recipe>"#,
            PNG_1X1
        ),
    );

    Converter::builder()
        .input(&input)
        .format(OutputFormat::Json)
        .config(ConverterConfig::default())
        .build()
        .unwrap();

    let folder = dir.path().join("apfelkuchen");
    let image = fs::read(folder.join("full.png")).unwrap();
    assert!(image.starts_with(b"\x89PNG"));
    assert_eq!(read_json(&folder.join("recipe.json"))["image"], "full.png");
}

#[test]
fn test_combined_layout() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_export(
        dir.path(),
        r#"<recipe><title>Soup</title></recipe>
<recipe><title>Soup</title></recipe>"#,
    );

    let report = Converter::builder()
        .input(&input)
        .format(OutputFormat::Json)
        .config(ConverterConfig::default())
        .combined()
        .build()
        .unwrap();

    assert_eq!(report.outputs, vec![dir.path().join("recipes.json")]);
    let recipes = read_json(&dir.path().join("recipes.json"));
    let recipes = recipes.as_array().unwrap();
    assert_eq!(recipes.len(), 2);
    assert_eq!(recipes[1]["name"], "Soup");
}

#[test]
fn test_duplicate_titles_get_distinct_folders() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_export(
        dir.path(),
        r#"<recipe><title>Soup</title></recipe>
<recipe><title>Soup</title></recipe>"#,
    );

    Converter::builder()
        .input(&input)
        .format(OutputFormat::Json)
        .config(ConverterConfig::default())
        .build()
        .unwrap();

    assert!(dir.path().join("soup").join("recipe.json").exists());
    assert!(dir.path().join("soup-2").join("recipe.json").exists());
}

#[test]
fn test_suffixed_title_keeps_every_recipe() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_export(
        dir.path(),
        r#"<recipe><title>Soup</title><instructions>first</instructions></recipe>
<recipe><title>Soup</title><instructions>second</instructions></recipe>
<recipe><title>Soup 2</title><instructions>third</instructions></recipe>"#,
    );
    let out = dir.path().join("out");

    let report = Converter::builder()
        .input(&input)
        .output_dir(&out)
        .format(OutputFormat::Json)
        .config(ConverterConfig::default())
        .build()
        .unwrap();

    let mut outputs = report.outputs.clone();
    outputs.sort();
    outputs.dedup();
    assert_eq!(outputs.len(), 3);

    let mut folders: Vec<String> = fs::read_dir(&out)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    folders.sort();
    assert_eq!(folders, vec!["soup", "soup-2", "soup-2-2"]);

    let steps: Vec<Value> = folders
        .iter()
        .map(|folder| read_json(&out.join(folder).join("recipe.json"))["recipeInstructions"][0].clone())
        .collect();
    assert_eq!(steps, vec![json!("first"), json!("second"), json!("third")]);
}

#[test]
fn test_output_is_deterministic() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_export(
        dir.path(),
        r#"<recipe id="1">
  <title>Gulasch</title>
  <category>Hauptgericht</category>
  <cuisine>Ungarisch</cuisine>
  <rating>4/5 stars</rating>
  <preptime>20 min</preptime>
  <cooktime>2 Stunden</cooktime>
  <ingredient-list>
    <inggroup>
      <groupname>Fleisch</groupname>
      <ingredient><amount>1</amount><unit>kg</unit><item>Rindfleisch</item></ingredient>
    </inggroup>
    <ingredient optional="yes"><item>Kümmel</item></ingredient>
  </ingredient-list>
  <instructions>Anbraten.

Schmoren.</instructions>
</recipe>"#,
    );

    let config = ConverterConfig {
        json: JsonConfig {
            layout: JsonLayout::Combined,
            pretty: true,
            ..Default::default()
        },
        ..Default::default()
    };
    let first = dir.path().join("first");
    let second = dir.path().join("second");
    for out in [&first, &second] {
        Converter::builder()
            .input(&input)
            .output_dir(out)
            .format(OutputFormat::Json)
            .config(config.clone())
            .build()
            .unwrap();
    }

    let a = fs::read(first.join("recipes.json")).unwrap();
    let b = fs::read(second.join("recipes.json")).unwrap();
    assert_eq!(a, b);

    let recipe = &read_json(&first.join("recipes.json"))[0];
    assert_eq!(recipe["recipeInstructions"], json!(["Anbraten.", "Schmoren."]));
    assert_eq!(recipe["cookTime"], "PT2H0M");
    assert_eq!(recipe["totalTime"], "PT2H20M");
    assert_eq!(
        recipe["recipeIngredient"],
        json!(["1 kg Rindfleisch", "Kümmel (optional)"])
    );
}
