use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use color_eyre::eyre::WrapErr;
use content_render::{Config, DEFAULT_CONFIG_FILE, Document, Mode};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Html,
    Typst,
    Pdf,
}

impl Format {
    fn extension(self) -> &'static str {
        match self {
            Format::Html => "html",
            Format::Typst => "typ",
            Format::Pdf => "pdf",
        }
    }
}

#[derive(Parser)]
#[command(name = "content-render")]
#[command(about = "Render JSON rich-text documents to HTML, Typst or PDF")]
struct Cli {
    /// Input JSON document
    input: PathBuf,

    /// Output file (defaults to input name with the format's extension)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Display mode
    #[arg(short, long, value_enum, default_value_t = Mode::Light)]
    mode: Mode,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Html)]
    format: Format,

    /// TOML config file (defaults to ./content-render.toml, then the compiled-in defaults)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn,content_render=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::try_load(path)
            .wrap_err_with(|| format!("Error reading config {}", path.display()))?,
        None => Config::load(Path::new(DEFAULT_CONFIG_FILE)),
    };

    let json = fs::read_to_string(&cli.input)
        .wrap_err_with(|| format!("Error reading {}", cli.input.display()))?;
    let document = Document::from_json_str(&json)
        .wrap_err_with(|| format!("Error parsing {}", cli.input.display()))?;
    debug!(nodes = document.nodes.len(), "loaded document");

    let bytes = match cli.format {
        Format::Html => {
            let tree = content_render::render_with_config(&document, cli.mode, &config);
            content_render::html::to_page(&tree, cli.mode, &config).into_bytes()
        }
        Format::Typst => content_render::document_to_typst(&document, cli.mode, &config).into_bytes(),
        Format::Pdf => content_render::document_to_pdf(&document, cli.mode, &config)?,
    };

    let output = cli
        .output
        .unwrap_or_else(|| cli.input.with_extension(cli.format.extension()));

    fs::write(&output, bytes).wrap_err_with(|| format!("Error writing {}", output.display()))?;

    info!("Created {}", output.display());
    Ok(())
}
