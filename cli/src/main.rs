//! quire CLI - lay out business documents from JSON render requests

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use quire::{
    AssetLoader, Composer, DocumentRenderRequest, JsonFormat, PageSelection, RenderOptions,
    RenderPhase, RenderedDocument, ThemeRegistry,
};

#[derive(Parser)]
#[command(name = "quire")]
#[command(author = "quire contributors")]
#[command(version)]
#[command(about = "Typeset proposals, quotes and contracts into paged layouts", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Lay out a request and write the pages as JSON
    Render {
        /// Render request (JSON)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Theme to use instead of the request's
        #[arg(long, env = "QUIRE_THEME")]
        theme: Option<String>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        /// Page range (e.g., "1-10", "1,3,5")
        #[arg(long)]
        pages: Option<String>,

        /// Leave out the table of contents
        #[arg(long)]
        no_contents: bool,

        /// Leave out the audit page
        #[arg(long)]
        no_audit: bool,
    },

    /// Lay out a request and print the text of every page
    Text {
        /// Render request (JSON)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Theme to use instead of the request's
        #[arg(long, env = "QUIRE_THEME")]
        theme: Option<String>,

        /// Page range (e.g., "1-10", "1,3,5")
        #[arg(long)]
        pages: Option<String>,
    },

    /// Show page count, outline and layout statistics
    Info {
        /// Render request (JSON)
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// List the built-in themes
    Themes,

    /// Show version information
    Version,
}

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Render {
            input,
            output,
            theme,
            compact,
            pages,
            no_contents,
            no_audit,
        } => {
            let options = build_options(theme.as_deref(), pages.as_deref())
                .map(|o| o.with_contents(!no_contents).with_audit(!no_audit));
            options.and_then(|o| cmd_render(&input, output.as_deref(), &o, compact))
        }
        Commands::Text {
            input,
            output,
            theme,
            pages,
        } => build_options(theme.as_deref(), pages.as_deref())
            .and_then(|o| cmd_text(&input, output.as_deref(), &o)),
        Commands::Info { input } => cmd_info(&input),
        Commands::Themes => {
            cmd_themes();
            Ok(())
        }
        Commands::Version => {
            cmd_version();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn build_options(theme: Option<&str>, pages: Option<&str>) -> CliResult<RenderOptions> {
    let mut options = RenderOptions::new();
    if let Some(name) = theme {
        let theme = ThemeRegistry::builtin().resolve(name)?.clone();
        options = options.with_theme(theme);
    }
    if let Some(p) = pages {
        let selection =
            PageSelection::parse(p).map_err(|e| format!("Invalid page range: {}", e))?;
        options = options.with_pages(selection);
    }
    Ok(options)
}

/// Read a request and load the assets it links, relative to the file.
fn load_request(input: &Path) -> CliResult<DocumentRenderRequest> {
    let json = fs::read_to_string(input)?;
    let mut request = DocumentRenderRequest::from_json(&json)?;
    let linked = AssetLoader::for_request_file(input).resolve_request(&mut request);
    if linked > 0 {
        log::info!("Loaded {} linked assets", linked);
    }
    Ok(request)
}

fn compose(
    request: &DocumentRenderRequest,
    options: &RenderOptions,
) -> CliResult<RenderedDocument> {
    let registry = ThemeRegistry::builtin();

    let pb = ProgressBar::new(2);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {msg}")?
            .progress_chars("#>-"),
    );
    pb.set_message("Measuring...");

    let doc = Composer::new(&registry, options).compose_with_progress(request, |phase, pages| {
        pb.inc(1);
        match phase {
            RenderPhase::Measuring => pb.set_message(format!("Drawing {} pages...", pages)),
            RenderPhase::Drawing => pb.set_message(format!("{} pages", pages)),
        }
    });

    match doc {
        Ok(doc) => {
            pb.finish_and_clear();
            Ok(doc)
        }
        Err(e) => {
            pb.abandon();
            Err(e.into())
        }
    }
}

fn write_output(output: Option<&Path>, content: &str) -> CliResult<()> {
    if let Some(path) = output {
        fs::write(path, content)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", content);
    }
    Ok(())
}

fn cmd_render(
    input: &Path,
    output: Option<&Path>,
    options: &RenderOptions,
    compact: bool,
) -> CliResult<()> {
    let request = load_request(input)?;
    let doc = compose(&request, options)?;

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };
    let json = quire::render::to_json(&doc, format)?;
    write_output(output, &json)
}

fn cmd_text(input: &Path, output: Option<&Path>, options: &RenderOptions) -> CliResult<()> {
    let request = load_request(input)?;
    let doc = compose(&request, options)?;
    let text = quire::render::to_text_with_metrics(&doc, &options.layout.metrics);
    write_output(output, &text)
}

fn cmd_info(input: &Path) -> CliResult<()> {
    let request = load_request(input)?;
    let doc = compose(&request, &RenderOptions::new())?;

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Title".bold(), doc.title);
    println!("{}: {}", "Type".bold(), request.document.type_label());
    println!("{}: {}", "Theme".bold(), doc.theme);
    println!("{}: {}", "Pages".bold(), doc.page_count());

    println!();
    println!("{}", "Outline".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    for entry in &doc.outline {
        println!("  {:<32} {:>4}", entry.title, entry.page);
    }

    let stats = &doc.stats;
    println!();
    println!("{}", "Layout Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "Page breaks".bold(), stats.page_breaks);
    println!("{}: {}", "Headings".bold(), stats.heading_count);
    println!("{}: {}", "Paragraphs".bold(), stats.paragraph_count);
    println!("{}: {}", "List items".bold(), stats.list_item_count);
    println!("{}: {}", "Tables".bold(), stats.table_count);
    println!("{}: {}", "Words".bold(), stats.word_count);
    println!("{}: {}", "Images".bold(), stats.image_count);
    if stats.placeholder_count > 0 {
        println!(
            "{}: {}",
            "Placeholders".bold(),
            stats.placeholder_count.to_string().yellow()
        );
    }
    if stats.truncated_cells > 0 {
        println!(
            "{}: {}",
            "Truncated cells".bold(),
            stats.truncated_cells.to_string().yellow()
        );
    }

    Ok(())
}

fn cmd_themes() {
    let registry = ThemeRegistry::builtin();
    println!("{}", "Themes".cyan().bold());
    for name in registry.names() {
        if let Ok(theme) = registry.resolve(name) {
            let style = match theme.cover_style {
                quire::CoverStyle::Banner => "banner",
                quire::CoverStyle::Rule => "rule",
            };
            println!(
                "  {:<12} {} {} {}",
                name,
                theme.primary.to_hex().dimmed(),
                theme.secondary.to_hex().dimmed(),
                style
            );
        }
    }
}

fn cmd_version() {
    println!("{} {}", "quire".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Document typesetting and pagination engine");
    println!();
    println!("Repository: {}", "https://github.com/quire-rs/quire".dimmed());
    println!("License: MIT");
}
