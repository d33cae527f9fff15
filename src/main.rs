use clap::Parser;
use gourmet_convert::{ConvertError, Converter, ConverterConfig, OutputFormat};
use log::{error, info};
use std::path::PathBuf;
use std::process::ExitCode;

/// Convert a Gourmet recipe export into a PDF or cookbook JSON
#[derive(Parser, Debug)]
#[command(name = "gourmet-convert", version, about, long_about = None)]
struct Cli {
    /// Gourmet export (.grmt) to convert
    input: PathBuf,

    /// Output directory (defaults to the directory of the input file)
    output_dir: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Pdf)]
    format: OutputFormat,

    /// Write one recipes.json array instead of a folder per recipe
    #[arg(long)]
    combined: bool,

    /// PDF document title
    #[arg(long)]
    title: Option<String>,

    /// PDF document author
    #[arg(long)]
    author: Option<String>,

    /// Fail if any recipe has to be skipped
    #[arg(long)]
    strict: bool,

    /// Configuration file (defaults to ./gourmet-convert.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn run(cli: Cli) -> Result<(), ConvertError> {
    let config = match &cli.config {
        Some(path) => ConverterConfig::load_from(path)?,
        None => ConverterConfig::load()?,
    };

    let mut builder = Converter::builder()
        .input(cli.input)
        .format(cli.format)
        .config(config)
        .strict(cli.strict);
    if let Some(dir) = cli.output_dir {
        builder = builder.output_dir(dir);
    }
    if let Some(title) = cli.title {
        builder = builder.title(title);
    }
    if let Some(author) = cli.author {
        builder = builder.author(author);
    }
    if cli.combined {
        builder = builder.combined();
    }

    // rejected recipes were already logged as warnings during extraction
    let report = builder.build()?;
    for path in &report.outputs {
        info!("Created {}", path.display());
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
