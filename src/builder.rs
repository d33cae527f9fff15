use log::{debug, info, warn};
use std::path::{Path, PathBuf};

use crate::config::{ConverterConfig, JsonLayout};
use crate::renderers::{JsonRenderer, OutputFormat, PdfRenderer, Renderer};
use crate::{load_recipes, ConvertError, RecordError};

/// Result of a conversion run
#[derive(Debug, Clone)]
pub struct ConversionReport {
    pub format: OutputFormat,
    /// Number of recipes that were rendered
    pub converted: usize,
    /// Records skipped during extraction
    pub rejected: Vec<RecordError>,
    /// Files written
    pub outputs: Vec<PathBuf>,
}

/// Builder for configuring and executing a conversion
#[derive(Debug, Default)]
pub struct ConverterBuilder {
    input: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    format: OutputFormat,
    config: Option<ConverterConfig>,
    combined: bool,
    title: Option<String>,
    author: Option<String>,
    strict: bool,
}

impl ConverterBuilder {
    /// Set the Gourmet export to convert
    ///
    /// # Example
    /// ```
    /// use gourmet_convert::Converter;
    ///
    /// let builder = Converter::builder().input("Rezepte.grmt");
    /// ```
    pub fn input(mut self, path: impl Into<PathBuf>) -> Self {
        self.input = Some(path.into());
        self
    }

    /// Set the output directory
    ///
    /// Defaults to the directory containing the input file.
    pub fn output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(path.into());
        self
    }

    /// Set the output format
    ///
    /// # Example
    /// ```
    /// use gourmet_convert::{Converter, OutputFormat};
    ///
    /// let builder = Converter::builder()
    ///     .input("Rezepte.grmt")
    ///     .format(OutputFormat::Json);
    /// ```
    pub fn format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Use an explicit configuration instead of loading one from the
    /// environment and `gourmet-convert.toml`
    pub fn config(mut self, config: ConverterConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Write all JSON recipes into one `recipes.json` array
    pub fn combined(mut self) -> Self {
        self.combined = true;
        self
    }

    /// Override the PDF document title
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Override the PDF document author
    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Fail instead of skipping recipes that cannot be extracted
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Build and execute the conversion
    ///
    /// # Errors
    /// Returns `ConvertError` if:
    /// - No input file was specified
    /// - The input is missing, unreadable or not a Gourmet export
    /// - No recipe could be extracted
    /// - Strict mode is on and a recipe was rejected
    /// - Writing the output fails
    ///
    /// # Example
    /// ```no_run
    /// # use gourmet_convert::{Converter, OutputFormat};
    /// # fn main() -> Result<(), gourmet_convert::ConvertError> {
    /// let report = Converter::builder()
    ///     .input("Rezepte.grmt")
    ///     .output_dir("cookbook")
    ///     .format(OutputFormat::Json)
    ///     .build()?;
    /// println!("{} recipes written", report.converted);
    /// # Ok(())
    /// # }
    /// ```
    pub fn build(self) -> Result<ConversionReport, ConvertError> {
        let input = self.input.ok_or_else(|| {
            ConvertError::BuilderError("No input file specified. Use .input()".to_string())
        })?;

        let mut config = match self.config {
            Some(config) => config,
            None => ConverterConfig::load()?,
        };
        if let Some(title) = self.title {
            config.pdf.title = title;
        }
        if let Some(author) = self.author {
            config.pdf.author = author;
        }
        if self.combined {
            config.json.layout = JsonLayout::Combined;
        }

        let output_dir = self
            .output_dir
            .unwrap_or_else(|| default_output_dir(&input));

        info!("Converting {} to {}", input.display(), self.format);
        let extraction = load_recipes(&input)?;

        if !extraction.rejected.is_empty() {
            if self.strict {
                return Err(ConvertError::RejectedRecords(extraction.rejected.len()));
            }
            warn!(
                "{} recipe(s) skipped, {} converted",
                extraction.rejected.len(),
                extraction.document.len()
            );
        }
        if extraction.document.is_empty() {
            return Err(ConvertError::NoRecipes);
        }

        let renderer: Box<dyn Renderer> = match self.format {
            OutputFormat::Pdf => Box::new(PdfRenderer::new(config.pdf, pdf_file_name(&input))),
            OutputFormat::Json => Box::new(JsonRenderer::new(config.json)),
        };
        debug!("Rendering with the {} renderer", renderer.name());
        let outputs = renderer.render(&extraction.document, &output_dir)?;

        Ok(ConversionReport {
            format: self.format,
            converted: extraction.document.len(),
            rejected: extraction.rejected,
            outputs,
        })
    }
}

/// Main entry point for the builder API
pub struct Converter;

impl Converter {
    /// Creates a new builder for converting an export
    ///
    /// # Example
    /// ```
    /// use gourmet_convert::Converter;
    ///
    /// let builder = Converter::builder();
    /// ```
    pub fn builder() -> ConverterBuilder {
        ConverterBuilder::default()
    }
}

/// Directory containing the input file
pub fn default_output_dir(input: &Path) -> PathBuf {
    match input.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// `Rezepte.grmt` becomes `Rezepte.pdf`
pub fn pdf_file_name(input: &Path) -> String {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "recipes".to_string());
    format!("{}.pdf", stem)
}
