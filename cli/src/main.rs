//! relayout CLI - PDF layout reconstruction tool

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use relayout::render::{self, LayoutStats, RenderOptions};
use relayout::{
    ConvertOptions, JsonFormat, LayoutDocument, LayoutReconstructor, LopdfSource, PageSelection,
};

#[derive(Parser)]
#[command(name = "relayout")]
#[command(version)]
#[command(about = "Reconstruct PDF layout into Markdown, text, and JSON", long_about = None)]
struct Cli {
    /// Input PDF file
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output directory
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert PDF to all formats (Markdown, text, JSON, images)
    Convert {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output directory
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        #[command(flatten)]
        layout: LayoutArgs,
    },

    /// Convert PDF to Markdown
    #[command(alias = "md")]
    Markdown {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Include YAML frontmatter
        #[arg(short, long)]
        frontmatter: bool,

        /// Skip image extraction
        #[arg(long)]
        no_images: bool,

        #[command(flatten)]
        layout: LayoutArgs,
    },

    /// Convert PDF to plain text
    Text {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        #[command(flatten)]
        layout: LayoutArgs,
    },

    /// Convert PDF to JSON
    Json {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        #[command(flatten)]
        layout: LayoutArgs,
    },

    /// Show document information and layout statistics
    Info {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Print statistics as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show version information
    Version,
}

/// Layout tuning shared by the conversion commands.
#[derive(Args, Clone, Default)]
struct LayoutArgs {
    /// Page range (e.g., "1-10", "1,3,5")
    #[arg(long)]
    pages: Option<String>,

    /// Vertical distance below which fragments share a line
    #[arg(long, value_name = "UNITS")]
    line_threshold: Option<f32>,

    /// Vertical distance above which a new paragraph starts
    #[arg(long, value_name = "UNITS")]
    paragraph_threshold: Option<f32>,

    /// Remove table text from the paragraph stream
    #[arg(long)]
    exclude_table_text: bool,

    /// Raster scale used when cropping images
    #[arg(long, value_name = "FACTOR")]
    scale: Option<f32>,
}

impl LayoutArgs {
    fn convert_options(&self) -> relayout::Result<ConvertOptions> {
        let mut options = ConvertOptions::new();

        if let Some(ref pages) = self.pages {
            options = options.with_pages(PageSelection::parse(pages)?);
        }
        if let Some(threshold) = self.line_threshold {
            options.layout = options.layout.with_line_threshold(threshold);
        }
        if let Some(threshold) = self.paragraph_threshold {
            options.layout = options.layout.with_paragraph_threshold(threshold);
        }
        if self.exclude_table_text {
            options.layout = options.layout.exclude_table_text();
        }
        if let Some(scale) = self.scale {
            options = options.with_scale(scale);
        }

        Ok(options)
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Convert {
            input,
            output,
            layout,
        }) => cmd_convert(&input, output.as_deref(), &layout),
        Some(Commands::Markdown {
            input,
            output,
            frontmatter,
            no_images,
            layout,
        }) => cmd_markdown(&input, output.as_deref(), frontmatter, no_images, &layout),
        Some(Commands::Text {
            input,
            output,
            layout,
        }) => cmd_text(&input, output.as_deref(), &layout),
        Some(Commands::Json {
            input,
            output,
            compact,
            layout,
        }) => cmd_json(&input, output.as_deref(), compact, &layout),
        Some(Commands::Info { input, json }) => cmd_info(&input, json),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: convert if input is provided
            if let Some(input) = cli.input {
                cmd_convert(&input, cli.output.as_deref(), &LayoutArgs::default())
            } else {
                println!("{}", "Usage: relayout <FILE> [OUTPUT]".yellow());
                println!("       relayout --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

/// Reconstruct a document page by page, ticking a progress bar.
fn convert_with_progress(
    input: &Path,
    options: ConvertOptions,
) -> Result<LayoutDocument, Box<dyn std::error::Error>> {
    let source = LopdfSource::open(input)?;

    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );
    pb.set_message("Reconstructing pages...");

    let doc = LayoutReconstructor::new(options).reconstruct_with_progress(&source, |done, total| {
        pb.set_length(total as u64);
        pb.set_position(done as u64);
    })?;

    pb.finish_and_clear();
    Ok(doc)
}

/// Write Markdown, text, JSON and images for a document into `output_dir`.
fn write_outputs(
    doc: &LayoutDocument,
    output_dir: &Path,
) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>> {
    fs::create_dir_all(output_dir)?;

    let render_options = RenderOptions::new()
        .with_frontmatter(true)
        .with_image_prefix("images/");

    let images = render::write_images(doc, output_dir.join("images"))?;

    let markdown = render::to_markdown(doc, &render_options)?;
    fs::write(output_dir.join("document.md"), &markdown)?;

    let text = render::to_text(doc)?;
    fs::write(output_dir.join("document.txt"), &text)?;

    let json = render::to_json(doc, JsonFormat::Pretty)?;
    fs::write(output_dir.join("layout.json"), &json)?;

    Ok(images)
}

fn cmd_convert(
    input: &Path,
    output: Option<&Path>,
    layout: &LayoutArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let output_dir = output.map(|p| p.to_path_buf()).unwrap_or_else(|| {
        let stem = input.file_stem().unwrap_or_default().to_string_lossy();
        PathBuf::from(format!("{}_output", stem))
    });

    let doc = convert_with_progress(input, layout.convert_options()?)?;
    let images = write_outputs(&doc, &output_dir)?;

    println!("{} {}", "Done!".green().bold(), output_dir.display());
    println!("\n{}", "Output files:".green().bold());
    println!("  {} document.md", "├─".dimmed());
    println!("  {} document.txt", "├─".dimmed());
    println!("  {} layout.json", "├─".dimmed());
    println!("  {} images/ ({} files)", "└─".dimmed(), images.len());

    Ok(())
}

fn cmd_markdown(
    input: &Path,
    output: Option<&Path>,
    frontmatter: bool,
    no_images: bool,
    layout: &LayoutArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let options = layout.convert_options()?.with_images(!no_images);
    let doc = convert_with_progress(input, options)?;

    let mut render_options = RenderOptions::new().with_frontmatter(frontmatter);

    if let Some(path) = output {
        // Images go next to the Markdown file so the links resolve.
        if doc.images().next().is_some() {
            let dir = path.parent().unwrap_or_else(|| Path::new("."));
            render::write_images(&doc, dir.join("images"))?;
            render_options = render_options.with_image_prefix("images/");
        }
        let markdown = render::to_markdown(&doc, &render_options)?;
        fs::write(path, &markdown)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        let markdown = render::to_markdown(&doc, &render_options)?;
        println!("{}", markdown);
    }

    Ok(())
}

fn cmd_text(
    input: &Path,
    output: Option<&Path>,
    layout: &LayoutArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let options = layout.convert_options()?.with_images(false);
    let doc = convert_with_progress(input, options)?;

    let text = render::to_text(&doc)?;

    if let Some(path) = output {
        fs::write(path, &text)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", text);
    }

    Ok(())
}

fn cmd_json(
    input: &Path,
    output: Option<&Path>,
    compact: bool,
    layout: &LayoutArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let doc = convert_with_progress(input, layout.convert_options()?)?;

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };

    let json = render::to_json(&doc, format)?;

    if let Some(path) = output {
        fs::write(path, &json)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", json);
    }

    Ok(())
}

fn cmd_info(input: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let doc = convert_with_progress(input, ConvertOptions::new())?;
    let stats = LayoutStats::from_document(&doc);

    if json {
        let value = serde_json::json!({
            "file": input.display().to_string(),
            "metadata": doc.metadata,
            "stats": stats,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    if let Some(ref version) = doc.metadata.pdf_version {
        println!("{}: PDF {}", "Format".bold(), version);
    }
    println!("{}: {}", "Pages".bold(), doc.page_count);

    if let Some(ref title) = doc.metadata.title {
        println!("{}: {}", "Title".bold(), title);
    }
    if let Some(ref author) = doc.metadata.author {
        println!("{}: {}", "Author".bold(), author);
    }
    if let Some(ref producer) = doc.metadata.producer {
        println!("{}: {}", "Producer".bold(), producer);
    }

    println!();
    println!("{}", "Layout Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "Paragraphs".bold(), stats.paragraph_count);
    println!("{}: {}", "Headings".bold(), stats.heading_count);
    println!("{}: {}", "Tables".bold(), stats.table_count);
    println!("{}: {}", "Images".bold(), stats.image_count);
    println!("{}: {}", "Words".bold(), stats.word_count);

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "relayout".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("PDF layout reconstruction tool");
    println!();
    println!("License: MIT");
}
