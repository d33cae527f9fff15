use log::{debug, info};
use serde::Serialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{JsonConfig, JsonLayout};
use crate::model::{iso_duration, parse_duration_minutes, parse_yield, Rating, Recipe, RecipeDocument};
use crate::renderers::Renderer;
use crate::ConvertError;

/// File name of the recipe document inside a recipe folder
pub const RECIPE_FILE: &str = "recipe.json";
/// File name of the combined layout
pub const COMBINED_FILE: &str = "recipes.json";

/// A recipe in the schema.org layout read by the cookbook application
#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CookbookRecipe {
    #[serde(rename = "@context")]
    pub context: &'static str,
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipe_category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipe_cuisine: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipe_yield: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prep_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cook_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_based_on: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aggregate_rating: Option<AggregateRating>,
    pub recipe_ingredient: Vec<String>,
    pub recipe_instructions: Vec<String>,
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AggregateRating {
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub rating_value: f32,
    pub best_rating: f32,
}

impl From<Rating> for AggregateRating {
    fn from(rating: Rating) -> Self {
        AggregateRating {
            kind: "AggregateRating",
            rating_value: rating.value,
            best_rating: rating.scale,
        }
    }
}

impl CookbookRecipe {
    /// Maps a recipe, marking optional ingredients with `optional_label`
    pub fn new(recipe: &Recipe, optional_label: &str) -> Self {
        let prep = recipe.prep_time.as_deref().and_then(parse_duration_minutes);
        let cook = recipe.cook_time.as_deref().and_then(parse_duration_minutes);
        let total = prep.zip(cook).map(|(p, c)| p + c);

        let keywords = [&recipe.category, &recipe.cuisine]
            .into_iter()
            .flatten()
            .cloned()
            .collect::<Vec<_>>();

        CookbookRecipe {
            context: "http://schema.org",
            kind: "Recipe",
            name: recipe.title.clone(),
            description: (!recipe.notes.is_empty()).then(|| recipe.notes.join("\n\n")),
            url: recipe.link.clone(),
            image: None,
            recipe_category: recipe.category.clone(),
            recipe_cuisine: recipe.cuisine.clone(),
            keywords: (!keywords.is_empty()).then(|| keywords.join(",")),
            recipe_yield: recipe.yields.as_deref().and_then(parse_yield),
            prep_time: prep.map(iso_duration),
            cook_time: cook.map(iso_duration),
            total_time: total.map(iso_duration),
            is_based_on: recipe.source.clone(),
            aggregate_rating: recipe.rating.map(AggregateRating::from),
            recipe_ingredient: recipe
                .ingredients
                .iter()
                .map(|i| i.display_text_marked(optional_label))
                .filter(|text| !text.is_empty())
                .collect(),
            recipe_instructions: recipe.instructions.clone(),
        }
    }
}

impl From<&Recipe> for CookbookRecipe {
    fn from(recipe: &Recipe) -> Self {
        CookbookRecipe::new(recipe, "optional")
    }
}

/// Writes recipes as cookbook JSON, either one folder per recipe or a single array
pub struct JsonRenderer {
    config: JsonConfig,
}

impl JsonRenderer {
    pub fn new(config: JsonConfig) -> Self {
        Self { config }
    }

    /// Serializes one value with a trailing newline
    pub fn to_json<T: Serialize>(&self, value: &T) -> Result<String, ConvertError> {
        let mut json = if self.config.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        json.push('\n');
        Ok(json)
    }

    fn render_per_recipe(&self, document: &RecipeDocument, output_dir: &Path) -> Result<Vec<PathBuf>, ConvertError> {
        let mut written = Vec::new();
        let mut slugs = SlugAllocator::default();

        for recipe in &document.recipes {
            let folder = output_dir.join(slugs.allocate(&recipe.title));
            fs::create_dir_all(&folder)?;

            let mut cookbook = CookbookRecipe::new(recipe, &self.config.optional_label);
            if let Some(image) = &recipe.image {
                let file_name = format!("full.{}", image.extension());
                let path = folder.join(&file_name);
                fs::write(&path, &image.data)?;
                cookbook.image = Some(file_name);
                written.push(path);
            }

            let path = folder.join(RECIPE_FILE);
            fs::write(&path, self.to_json(&cookbook)?)?;
            debug!("Wrote {}", path.display());
            written.push(path);
        }

        Ok(written)
    }

    fn render_combined(&self, document: &RecipeDocument, output_dir: &Path) -> Result<Vec<PathBuf>, ConvertError> {
        fs::create_dir_all(output_dir)?;
        let recipes: Vec<CookbookRecipe> = document
            .recipes
            .iter()
            .map(|recipe| CookbookRecipe::new(recipe, &self.config.optional_label))
            .collect();
        let path = output_dir.join(COMBINED_FILE);
        fs::write(&path, self.to_json(&recipes)?)?;
        Ok(vec![path])
    }
}

impl Renderer for JsonRenderer {
    fn name(&self) -> &str {
        "json"
    }

    fn render(&self, document: &RecipeDocument, output_dir: &Path) -> Result<Vec<PathBuf>, ConvertError> {
        let written = match self.config.layout {
            JsonLayout::PerRecipe => self.render_per_recipe(document, output_dir)?,
            JsonLayout::Combined => self.render_combined(document, output_dir)?,
        };
        info!(
            "Wrote {} recipe(s) as {} file(s) below {}",
            document.len(),
            written.len(),
            output_dir.display()
        );
        Ok(written)
    }
}

/// Hands out unique folder names in document order
#[derive(Debug, Default)]
struct SlugAllocator {
    issued: HashSet<String>,
}

impl SlugAllocator {
    /// The title's slug, or the first `<slug>-N` (N >= 2) not handed out yet.
    /// `Soup 2` may already hold `soup-2`.
    fn allocate(&mut self, title: &str) -> String {
        let slug = slugify(title);
        if self.issued.insert(slug.clone()) {
            return slug;
        }
        let mut n = 2;
        loop {
            let candidate = format!("{}-{}", slug, n);
            if self.issued.insert(candidate.clone()) {
                return candidate;
            }
            n += 1;
        }
    }
}

/// Lowercase ASCII folder name for a recipe title
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    for c in title.to_lowercase().chars() {
        match c {
            'a'..='z' | '0'..='9' => slug.push(c),
            'ä' => slug.push_str("ae"),
            'ö' => slug.push_str("oe"),
            'ü' => slug.push_str("ue"),
            'ß' => slug.push_str("ss"),
            'à' | 'á' | 'â' | 'å' => slug.push('a'),
            'è' | 'é' | 'ê' | 'ë' => slug.push('e'),
            'ì' | 'í' | 'î' | 'ï' => slug.push('i'),
            'ò' | 'ó' | 'ô' => slug.push('o'),
            'ù' | 'ú' | 'û' => slug.push('u'),
            'ç' => slug.push('c'),
            'ñ' => slug.push('n'),
            _ => {
                if !slug.is_empty() && !slug.ends_with('-') {
                    slug.push('-');
                }
            }
        }
    }

    let slug = slug.trim_end_matches('-');
    if slug.is_empty() {
        "recipe".to_string()
    } else {
        slug.to_string()
    }
}
