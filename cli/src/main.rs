//! unslide CLI - current-slide context extraction tool
//!
//! Serves a presentation from disk through the same sliced host path an
//! Office add-in uses, and prints the resulting slide context.

use async_trait::async_trait;
use clap::{Parser, Subcommand};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;
use unslide::container::PartSource;
use unslide::pptx::{parse_paragraphs, SlideLocator};
use unslide::render::JsonFormat;
use unslide::{
    ChatSession, ExtractOptions, HostApp, HostDocument, HostFile, LocalDocument, OoxmlArchive,
    SessionConfig, Slice, SlideContextAssembler,
};

/// Number of text lines shown per slide by `slides`.
const SAMPLE_LINES: usize = 5;

/// Current-slide context extraction from PowerPoint packages
#[derive(Parser)]
#[command(
    name = "unslide",
    author = "iyulab",
    version,
    about = "Extract the current slide of a presentation as Markdown",
    long_about = "unslide - current-slide context extraction.\n\n\
                  Downloads a PPTX package in slices, locates one slide and renders its text, \
                  list structure and the presentation title as Markdown."
)]
struct Cli {
    /// Log fetch and lookup details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the context block for one slide
    #[command(visible_alias = "ctx")]
    Context {
        /// Input file path
        input: PathBuf,

        /// Slide index reported as active
        #[arg(short, long)]
        slide: Option<u32>,

        /// Bytes per slice
        #[arg(long, default_value_t = unslide::options::DEFAULT_SLICE_SIZE)]
        slice_size: u32,

        /// Give up on a slice after this many seconds
        #[arg(long)]
        timeout: Option<u64>,

        /// Text reported as the current selection
        #[arg(long)]
        selected: Option<String>,

        /// Only accept the exact slide entry or slide 1
        #[arg(long)]
        no_adjacent: bool,

        /// Output JSON instead of Markdown
        #[arg(long)]
        json: bool,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List slide entries and show which one a slide index resolves to
    Slides {
        /// Input file path
        input: PathBuf,

        /// Slide index to resolve
        #[arg(short, long)]
        slide: Option<u32>,
    },

    /// Show package information
    Info {
        /// Input file path
        input: PathBuf,
    },

    /// Print the full chat prompt with the slide attached
    Prompt {
        /// Input file path
        input: PathBuf,

        /// User message
        #[arg(short, long)]
        message: String,

        /// Slide index reported as active
        #[arg(short, long)]
        slide: Option<u32>,
    },

    /// Show version information
    Version,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    if let Err(e) = run(cli).await {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Context {
            input,
            slide,
            slice_size,
            timeout,
            selected,
            no_adjacent,
            json,
            output,
        } => {
            let mut options = ExtractOptions::new()
                .with_slice_size(slice_size)
                .with_adjacent_probing(!no_adjacent);
            if let Some(secs) = timeout {
                options = options.with_slice_timeout(Duration::from_secs(secs));
            }

            let mut document = LocalDocument::open(&input).await?;
            if let Some(index) = slide {
                document = document.with_slide_index(index);
            }
            if let Some(text) = selected {
                document = document.with_selected_text(text);
            }

            let host = ProgressDocument::new(document);
            let ctx = SlideContextAssembler::new(options).assemble(&host).await;

            let rendered = if json {
                unslide::render::to_json(&ctx, JsonFormat::Pretty)?
            } else {
                unslide::render::to_markdown(&ctx)
            };
            write_output(output.as_ref(), &rendered)?;

            if let Some(path) = output {
                println!("{} Slide context written: {}", "✓".green().bold(), path.display());
            }
            if ctx.slide.as_ref().is_some_and(|m| !m.is_confident()) {
                eprintln!(
                    "{} Slide {} was not found; used {}",
                    "!".yellow().bold(),
                    ctx.slide_index.map_or("-".to_string(), |i| i.to_string()),
                    ctx.slide.as_ref().map_or("", |m| m.path.as_str())
                );
            }
        }

        Commands::Slides { input, slide } => {
            let archive = OoxmlArchive::from_bytes(fs::read(&input)?)?;
            let entries = archive.slide_entries();

            println!("{}", "Slide Entries".cyan().bold());
            println!("{}", "─".repeat(40));
            if entries.is_empty() {
                println!("{} No slide entries in package", "!".yellow().bold());
                return Ok(());
            }
            for entry in &entries {
                println!("  {}", entry);
            }

            let options = ExtractOptions::default();
            let found = SlideLocator::new(&archive, &options).locate_with(slide, |xml| {
                let paragraphs = parse_paragraphs(xml)?;
                Ok((!paragraphs.is_empty()).then_some(paragraphs))
            });

            println!();
            match found {
                Some(found) => {
                    println!(
                        "{}: {} ({:?})",
                        "Resolved".bold(),
                        found.slide.path,
                        found.slide.kind
                    );
                    println!("\n{}", "Text Sample".cyan().bold());
                    println!("{}", "─".repeat(40));
                    for para in found.value.iter().filter(|p| !p.is_empty()).take(SAMPLE_LINES) {
                        println!("  {}{}", para.list.indent(), para.text);
                    }
                }
                None => println!("{} No slide could be resolved", "!".yellow().bold()),
            }
        }

        Commands::Info { input } => {
            let pb = create_spinner("Analyzing package...");

            let data = fs::read(&input)?;
            let size = data.len();
            let kind = unslide::detect_package(&data)?;
            let archive = OoxmlArchive::from_bytes(data)?;

            pb.finish_and_clear();

            println!("{}", "Package Information".cyan().bold());
            println!("{}", "─".repeat(40));
            println!(
                "{}: {}",
                "File".bold(),
                input.file_name().unwrap_or_default().to_string_lossy()
            );
            println!("{}: {}", "Format".bold(), kind);
            println!("{}: {} bytes", "Size".bold(), size);
            println!(
                "{}: {}",
                "Slices".bold(),
                size.div_ceil(unslide::options::DEFAULT_SLICE_SIZE as usize)
            );
            println!("{}: {}", "Entries".bold(), archive.len());
            println!("{}: {}", "Slides".bold(), archive.slide_entries().len());
            if let Some(title) = archive.core_title() {
                println!("{}: {}", "Title".bold(), title);
            }
        }

        Commands::Prompt {
            input,
            message,
            slide,
        } => {
            let mut document = LocalDocument::open(&input).await?;
            if let Some(index) = slide {
                document = document.with_slide_index(index);
            }

            let mut session = ChatSession::new(SessionConfig::for_host(HostApp::PowerPoint));
            let host = ProgressDocument::new(document);
            let context = session.attach_document_context(&host).await;
            session.push_user(message);

            let prompt = session.format_prompt(Some(context.as_str()));
            write_output(None, &prompt)?;
        }

        Commands::Version => {
            print_version();
        }
    }

    Ok(())
}

/// A local document whose slice downloads advance a progress bar.
struct ProgressDocument {
    inner: LocalDocument,
}

impl ProgressDocument {
    fn new(inner: LocalDocument) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl HostDocument for ProgressDocument {
    async fn open_file(&self, slice_size: u32) -> unslide::Result<Box<dyn HostFile>> {
        let inner = self.inner.open_file(slice_size).await?;
        let bar = ProgressBar::new(u64::from(inner.slice_count()));
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.blue} Fetching slices [{bar:30.cyan/blue}] {pos}/{len}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        Ok(Box::new(ProgressFile { inner, bar }))
    }

    async fn active_slide_index(&self) -> Option<u32> {
        self.inner.active_slide_index().await
    }

    async fn document_title(&self) -> Option<String> {
        self.inner.document_title().await
    }

    async fn selected_text(&self) -> Option<String> {
        self.inner.selected_text().await
    }

    async fn fallback_slide_text(&self) -> Option<String> {
        self.inner.fallback_slide_text().await
    }
}

struct ProgressFile {
    inner: Box<dyn HostFile>,
    bar: ProgressBar,
}

#[async_trait]
impl HostFile for ProgressFile {
    fn slice_count(&self) -> u32 {
        self.inner.slice_count()
    }

    async fn slice(&mut self, index: u32) -> unslide::Result<Slice> {
        let slice = self.inner.slice(index).await?;
        self.bar.inc(1);
        Ok(slice)
    }

    async fn close(&mut self) {
        self.inner.close().await;
        self.bar.finish_and_clear();
    }
}

fn print_version() {
    println!("{} {}", "unslide".green().bold(), env!("CARGO_PKG_VERSION"));
    println!("Current-slide context extraction from PowerPoint packages");
    println!();
    println!("Supported formats: PPTX");
    println!("Repository: https://github.com/iyulab/unslide");
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
            .template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

fn write_output(path: Option<&PathBuf>, content: &str) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            write!(handle, "{}", content)?;
        }
    }
    Ok(())
}
