//! remix - render generated blog posts

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use remix::markup::{Block, parse, plain_text};
use remix::render::{ExportConfig, FontChoice, HtmlExporter, render_preview};
use remix::util::extract_image_dimensions;
use remix::{AssetId, Document};

#[derive(Parser)]
#[command(name = "remix")]
#[command(version, about = "Render generated blog posts", long_about = None)]
#[command(after_help = "EXAMPLES:
    remix render post.json -o post.html      Export the CMS-ready fragment
    remix render post.json --font Inter      Export with a preset font
    remix preview post.json                  Print the preview tree as JSON
    remix info post.json                     Show title and asset status")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Suppress log output
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Render the export HTML fragment
    Render {
        /// Document JSON file
        #[arg(value_name = "DOCUMENT")]
        input: PathBuf,

        /// Output file (defaults to stdout)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Font preset name or CSS font-family value
        #[arg(short, long, default_value = "Merriweather")]
        font: String,

        /// Leave out the external font import
        #[arg(long)]
        no_font_import: bool,

        /// Replace an image before rendering (ID=PATH, repeatable)
        #[arg(long = "image", value_name = "ID=PATH")]
        images: Vec<String>,
    },
    /// Print the preview tree as JSON
    Preview {
        /// Document JSON file
        #[arg(value_name = "DOCUMENT")]
        input: PathBuf,
    },
    /// Show document metadata and asset status
    Info {
        /// Document JSON file
        #[arg(value_name = "DOCUMENT")]
        input: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.quiet);

    let result = match cli.command {
        Command::Render {
            input,
            output,
            font,
            no_font_import,
            images,
        } => render(&input, output.as_deref(), &font, !no_font_import, &images),
        Command::Preview { input } => preview(&input),
        Command::Info { input } => show_info(&input),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("off")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn load(path: &Path) -> remix::Result<Document> {
    debug!(path = %path.display(), "loading document");
    let text = fs::read(path)?;
    Ok(serde_json::from_slice(&text)?)
}

fn render(
    input: &Path,
    output: Option<&Path>,
    font: &str,
    font_import: bool,
    images: &[String],
) -> Result<(), String> {
    let mut doc = load(input).map_err(|e| format!("{}: {e}", input.display()))?;

    for spec in images {
        let (id, path) = spec
            .split_once('=')
            .ok_or_else(|| format!("invalid --image value '{spec}', expected ID=PATH"))?;
        let id = AssetId::new(id);
        if doc.find_visual(&id).is_none() {
            return Err(format!("document has no asset '{id}'"));
        }
        let bytes = fs::read(path).map_err(|e| format!("{path}: {e}"))?;
        doc = doc.replace_image(&id, bytes);
    }

    let font: FontChoice = font.parse().unwrap_or_default();
    let config = ExportConfig::new().with_font(font).with_font_import(font_import);
    let html = HtmlExporter::with_config(config).render(&doc);

    match output {
        Some(path) => fs::write(path, html).map_err(|e| format!("{}: {e}", path.display())),
        None => {
            print!("{html}");
            Ok(())
        }
    }
}

fn preview(input: &Path) -> Result<(), String> {
    let doc = load(input).map_err(|e| format!("{}: {e}", input.display()))?;
    let tree = render_preview(&doc);
    let json = serde_json::to_string_pretty(&tree).map_err(|e| e.to_string())?;
    println!("{json}");
    Ok(())
}

fn show_info(input: &Path) -> Result<(), String> {
    let doc = load(input).map_err(|e| format!("{}: {e}", input.display()))?;

    println!("File: {}", input.display());
    println!("Title: {}", doc.title);
    if let Some(ref subtitle) = doc.subtitle {
        println!("Subtitle: {subtitle}");
    }
    if !doc.metadata.is_empty() {
        println!("Metadata: {}", doc.metadata);
    }
    println!("Body: {} bytes", doc.body.len());
    for block in parse(&doc.body) {
        if let Block::Heading { level, content } = block {
            let indent = if level >= 3 { "    " } else { "  " };
            println!("{indent}{}", plain_text(&content));
        }
    }
    println!("Assets: {}", doc.visuals.len());
    for asset in doc.visuals.iter() {
        let status = match asset.image() {
            Some(data) => match extract_image_dimensions(data) {
                Some((w, h)) => format!("{w}x{h}, {} bytes", data.len()),
                None => format!("{} bytes", data.len()),
            },
            None => "pending".to_string(),
        };
        println!("  {} ({status}): {}", asset.id, asset.caption);
    }

    let pending = doc.visuals.pending();
    if !pending.is_empty() {
        println!("Pending: {}", pending.len());
    }

    Ok(())
}
