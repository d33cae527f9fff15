use crate::extractors::{Extraction, Extractor};
use crate::loader::GOURMET_ROOT;
use crate::model::{split_paragraphs, Ingredient, Rating, Recipe, RecipeImage};
use crate::{RecordError, RejectReason};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use html_escape::decode_html_entities;
use log::{debug, warn};
use roxmltree::{Document, Node};

/// Maps `<recipe>` elements of a Gourmet `.grmt` export to [`Recipe`] records
pub struct GourmetExtractor;

impl Extractor for GourmetExtractor {
    fn can_parse(&self, document: &Document) -> bool {
        document.root_element().tag_name().name() == GOURMET_ROOT
    }

    fn extract(&self, document: &Document) -> Extraction {
        let mut extraction = Extraction::default();

        let recipe_nodes = document
            .root_element()
            .descendants()
            .filter(|n| n.is_element() && n.tag_name().name() == "recipe");

        for (index, node) in recipe_nodes.enumerate() {
            match parse_recipe(&node) {
                Ok(recipe) => {
                    debug!("Extracted recipe #{}: {}", index + 1, recipe.title);
                    extraction.document.recipes.push(recipe);
                }
                Err(reason) => {
                    let rejected = RecordError {
                        index,
                        id: node.attribute("id").map(str::to_string),
                        reason,
                    };
                    warn!("Skipping {}", rejected);
                    extraction.rejected.push(rejected);
                }
            }
        }

        extraction
    }
}

fn parse_recipe(node: &Node) -> Result<Recipe, RejectReason> {
    let title = child_text(node, "title").ok_or(RejectReason::MissingTitle)?;

    let rating = child_text(node, "rating").and_then(|text| {
        let rating = Rating::parse(&text);
        if rating.is_none() {
            warn!("Could not parse rating '{}' of recipe '{}'", text, title);
        }
        rating
    });

    let image = child(node, "image").and_then(|image| decode_image(&image, &title));

    Ok(Recipe {
        id: node.attribute("id").map(str::to_string),
        category: child_text(node, "category"),
        cuisine: child_text(node, "cuisine"),
        source: child_text(node, "source"),
        link: child_text(node, "link"),
        yields: child_text(node, "yields"),
        prep_time: child_text(node, "preptime"),
        cook_time: child_text(node, "cooktime"),
        rating,
        image,
        ingredients: parse_ingredients(node),
        instructions: child_text(node, "instructions")
            .map(|text| split_paragraphs(&text))
            .unwrap_or_default(),
        notes: child_text(node, "modifications")
            .map(|text| split_paragraphs(&text))
            .unwrap_or_default(),
        title,
    })
}

fn parse_ingredients(recipe: &Node) -> Vec<Ingredient> {
    let mut ingredients = Vec::new();
    let Some(list) = child(recipe, "ingredient-list") else {
        return ingredients;
    };

    for entry in list.children().filter(Node::is_element) {
        match entry.tag_name().name() {
            "ingredient" => ingredients.push(parse_ingredient(&entry, None)),
            "inggroup" => {
                let group = child_text(&entry, "groupname");
                ingredients.extend(
                    entry
                        .children()
                        .filter(|n| n.is_element() && n.tag_name().name() == "ingredient")
                        .map(|n| parse_ingredient(&n, group.clone())),
                );
            }
            other => debug!("Ignoring <{}> in ingredient list", other),
        }
    }

    ingredients
}

fn parse_ingredient(node: &Node, group: Option<String>) -> Ingredient {
    Ingredient {
        amount: child_text(node, "amount"),
        unit: child_text(node, "unit"),
        item: child_text(node, "item"),
        optional: node.attribute("optional") == Some("yes"),
        group,
    }
}

fn decode_image(node: &Node, title: &str) -> Option<RecipeImage> {
    // base64 payloads are wrapped across lines
    let payload: String = text_of(node)
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    if payload.is_empty() {
        return None;
    }

    let data = match STANDARD.decode(payload.as_bytes()) {
        Ok(data) => data,
        Err(e) => {
            warn!("Dropping image of recipe '{}': {}", title, e);
            return None;
        }
    };

    match image::guess_format(&data) {
        Ok(format) => Some(RecipeImage { data, format }),
        Err(e) => {
            warn!("Dropping image of recipe '{}': {}", title, e);
            None
        }
    }
}

fn child<'a, 'input>(parent: &Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    parent
        .children()
        .find(|n| n.is_element() && n.tag_name().name() == tag)
}

/// Trimmed, entity-decoded text of a child element; `None` when missing or blank
fn child_text(parent: &Node, tag: &str) -> Option<String> {
    child(parent, tag)
        .map(|n| decode_html_entities(&text_of(&n)).trim().to_string())
        .filter(|s| !s.is_empty())
}

fn text_of(node: &Node) -> String {
    node.descendants()
        .filter(Node::is_text)
        .filter_map(|n| n.text())
        .collect()
}
