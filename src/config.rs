use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;
use std::path::Path;

/// Main converter configuration structure
#[derive(Debug, Deserialize, Clone, Default)]
pub struct ConverterConfig {
    /// PDF layout settings
    #[serde(default)]
    pub pdf: PdfConfig,
    /// Cookbook JSON settings
    #[serde(default)]
    pub json: JsonConfig,
}

/// Configuration for the PDF renderer
#[derive(Debug, Deserialize, Clone)]
pub struct PdfConfig {
    /// Document title shown on the first page and in every footer
    #[serde(default = "default_title")]
    pub title: String,
    /// Document author shown on the first page
    #[serde(default)]
    pub author: String,
    /// Start every recipe on a new page
    #[serde(default = "default_page_break")]
    pub page_break_after_recipe: bool,
    /// Maximum width and height of a recipe image in centimetres
    #[serde(default = "default_image_max_cm")]
    pub image_max_cm: f32,
    /// Captions used in the recipe sections
    #[serde(default)]
    pub labels: Labels,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            author: String::new(),
            page_break_after_recipe: default_page_break(),
            image_max_cm: default_image_max_cm(),
            labels: Labels::default(),
        }
    }
}

/// Section captions, so that a collection can be printed in another language
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Labels {
    pub source: String,
    pub link: String,
    pub rating: String,
    pub category: String,
    pub ingredients: String,
    pub instructions: String,
    pub notes: String,
    pub page: String,
    /// Appended in parentheses to optional ingredients; empty to leave them unmarked
    pub optional: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            source: "Source".to_string(),
            link: "Link".to_string(),
            rating: "Rating".to_string(),
            category: "Category".to_string(),
            ingredients: "Ingredients".to_string(),
            instructions: "Instructions".to_string(),
            notes: "Notes".to_string(),
            page: "Page".to_string(),
            optional: "optional".to_string(),
        }
    }
}

/// How cookbook JSON is laid out in the output directory
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum JsonLayout {
    /// One `<slug>/recipe.json` folder per recipe, with its image beside it
    #[default]
    PerRecipe,
    /// A single `recipes.json` array
    Combined,
}

/// Configuration for the JSON renderer
#[derive(Debug, Deserialize, Clone)]
pub struct JsonConfig {
    #[serde(default)]
    pub layout: JsonLayout,
    /// Pretty-print the output
    #[serde(default = "default_pretty")]
    pub pretty: bool,
    /// Appended in parentheses to optional ingredients; empty to leave them unmarked
    #[serde(default = "default_optional_label")]
    pub optional_label: String,
}

impl Default for JsonConfig {
    fn default() -> Self {
        Self {
            layout: JsonLayout::default(),
            pretty: default_pretty(),
            optional_label: default_optional_label(),
        }
    }
}

// Default value functions
fn default_title() -> String {
    "Recipe Collection".to_string()
}

fn default_page_break() -> bool {
    true
}

fn default_image_max_cm() -> f32 {
    7.0
}

fn default_pretty() -> bool {
    true
}

fn default_optional_label() -> String {
    "optional".to_string()
}

impl ConverterConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with GOURMET__ prefix
    /// 2. gourmet-convert.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: GOURMET__PDF__TITLE
    pub fn load() -> Result<Self, ConfigError> {
        load_config(None)
    }

    /// Same as [`ConverterConfig::load`], but reads an explicit file which must exist
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        load_config(Some(path))
    }
}

fn load_config(path: Option<&Path>) -> Result<ConverterConfig, ConfigError> {
    let file = match path {
        // only TOML is supported, whatever the extension
        Some(path) => File::from(path).format(FileFormat::Toml).required(true),
        None => File::with_name("gourmet-convert").required(false),
    };

    let settings = Config::builder()
        .add_source(file)
        // Use double underscore for nested: GOURMET__PDF__PAGE_BREAK_AFTER_RECIPE
        .add_source(
            Environment::with_prefix("GOURMET")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}
