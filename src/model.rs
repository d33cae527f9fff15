use image::ImageFormat;

/// All recipes extracted from one export, in document order
#[derive(Debug, Clone, Default)]
pub struct RecipeDocument {
    pub recipes: Vec<Recipe>,
}

impl RecipeDocument {
    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Recipe {
    /// Value of the `id` attribute in the export
    pub id: Option<String>,
    /// Never empty; records without a title are rejected during extraction
    pub title: String,
    pub category: Option<String>,
    pub cuisine: Option<String>,
    pub source: Option<String>,
    pub link: Option<String>,
    pub yields: Option<String>,
    pub prep_time: Option<String>,
    pub cook_time: Option<String>,
    pub rating: Option<Rating>,
    pub image: Option<RecipeImage>,
    pub ingredients: Vec<Ingredient>,
    pub instructions: Vec<String>,
    pub notes: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ingredient {
    pub amount: Option<String>,
    pub unit: Option<String>,
    pub item: Option<String>,
    pub optional: bool,
    /// Name of the enclosing ingredient group, if any
    pub group: Option<String>,
}

impl Ingredient {
    /// Human readable line such as `1 cup flour`
    pub fn display_text(&self) -> String {
        [&self.amount, &self.unit, &self.item]
            .into_iter()
            .flatten()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Like [`Ingredient::display_text`], with `(label)` appended to optional
    /// entries. An empty label leaves them unmarked.
    pub fn display_text_marked(&self, optional_label: &str) -> String {
        let text = self.display_text();
        if self.optional && !optional_label.is_empty() && !text.is_empty() {
            format!("{} ({})", text, optional_label)
        } else {
            text
        }
    }
}

/// A rating such as `4/5 stars`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rating {
    pub value: f32,
    pub scale: f32,
}

impl Rating {
    pub const DEFAULT_SCALE: f32 = 5.0;

    /// Parses the number before `/` as the value and the number after it as
    /// the scale. Trailing words (`stars`) are ignored.
    pub fn parse(text: &str) -> Option<Rating> {
        let mut parts = text.splitn(2, '/');
        let value = leading_number(parts.next()?)?;
        let scale = parts
            .next()
            .and_then(leading_number)
            .filter(|s| *s > 0.0)
            .unwrap_or(Self::DEFAULT_SCALE);

        Some(Rating {
            value: value.clamp(0.0, scale),
            scale,
        })
    }

    /// The rating normalized to a five point scale
    pub fn out_of_five(&self) -> f32 {
        self.value / self.scale * Self::DEFAULT_SCALE
    }

    /// Number of full stars and whether a half star follows them
    pub fn stars(&self) -> (usize, bool) {
        let normalized = self.out_of_five();
        let full = normalized.floor();
        (full as usize, normalized - full > 1e-3)
    }
}

/// A decoded image embedded in the export
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeImage {
    pub data: Vec<u8>,
    pub format: ImageFormat,
}

impl RecipeImage {
    pub fn extension(&self) -> &'static str {
        self.format.extensions_str().first().copied().unwrap_or("img")
    }
}

fn leading_number(text: &str) -> Option<f32> {
    let number: String = text
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    number.parse().ok()
}

/// Leading whole number of a yield text such as `4 servings`
pub fn parse_yield(text: &str) -> Option<u32> {
    let digits: String = text
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

/// Parses free text durations such as `1 hour 15 minutes`, `45 min`,
/// `1 1/2 hours`, `1 and a half hours` or `20 Minuten` into minutes. Seconds
/// are rounded to whole minutes and a bare number counts as minutes.
pub fn parse_duration_minutes(text: &str) -> Option<u32> {
    let lowered = text.to_lowercase();
    let tokens = tokenize_duration(&lowered);

    let mut total = 0.0_f32;
    let mut pending: Option<f32> = None;
    let mut matched = false;

    for token in tokens {
        match token {
            DurationToken::Number(n) => {
                pending = Some(pending.unwrap_or(0.0) + n);
            }
            DurationToken::Word(word) => {
                if matches!(word, "half" | "halb" | "halbe" | "einhalb") {
                    pending = Some(pending.unwrap_or(0.0) + 0.5);
                    continue;
                }
                let Some(amount) = pending.take() else {
                    continue;
                };
                let factor = if word.starts_with("sec") || word.starts_with("sek") || word == "s" {
                    1.0 / 60.0
                } else if word.starts_with('d') || word.starts_with("tag") {
                    24.0 * 60.0
                } else if word.starts_with('h') || word.starts_with("std") || word.starts_with("stunde") {
                    60.0
                } else if word.starts_with("min") || word == "m" {
                    1.0
                } else {
                    // filler word such as `and`; keep the number for the next unit
                    pending = Some(amount);
                    continue;
                };
                total += amount * factor;
                matched = true;
            }
        }
    }

    if let Some(minutes) = pending {
        total += minutes;
        matched = true;
    }

    matched.then(|| total.round() as u32)
}

/// Formats minutes as an ISO-8601 duration, e.g. `PT1H15M`
pub fn iso_duration(minutes: u32) -> String {
    format!("PT{}H{}M", minutes / 60, minutes % 60)
}

enum DurationToken<'a> {
    Number(f32),
    Word(&'a str),
}

fn tokenize_duration(text: &str) -> Vec<DurationToken<'_>> {
    let mut tokens = Vec::new();
    for raw in text.split(|c: char| c.is_whitespace() || c == ',') {
        if raw.is_empty() {
            continue;
        }
        // split glued forms like `30min`
        let split_at = raw
            .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == '/'))
            .unwrap_or(raw.len());
        let (number, word) = raw.split_at(split_at);
        if !number.is_empty() {
            if let Some(value) = parse_quantity(number) {
                tokens.push(DurationToken::Number(value));
            }
        }
        if !word.is_empty() {
            tokens.push(DurationToken::Word(word));
        }
    }
    tokens
}

fn parse_quantity(text: &str) -> Option<f32> {
    match text.split_once('/') {
        Some((num, den)) => {
            let num: f32 = num.parse().ok()?;
            let den: f32 = den.parse().ok()?;
            (den != 0.0).then(|| num / den)
        }
        None => text.parse().ok(),
    }
}

/// Splits a block of text into steps or paragraphs. Blank lines separate
/// entries; text without blank lines yields one entry per non-empty line.
pub fn split_paragraphs(text: &str) -> Vec<String> {
    let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
    let normalized = normalized.trim();
    let has_blank_line = normalized.split('\n').any(|line| line.trim().is_empty());

    if has_blank_line {
        let mut paragraphs = Vec::new();
        let mut current: Vec<&str> = Vec::new();
        for line in normalized.split('\n') {
            if line.trim().is_empty() {
                if !current.is_empty() {
                    paragraphs.push(current.join("\n"));
                    current.clear();
                }
            } else {
                current.push(line.trim_end());
            }
        }
        if !current.is_empty() {
            paragraphs.push(current.join("\n"));
        }
        paragraphs
    } else {
        normalized
            .split('\n')
            .map(|line| line.trim().to_string())
            .filter(|line| !line.is_empty())
            .collect()
    }
}
