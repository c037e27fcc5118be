//! chapterio CLI - manage chapter markers for an audio file
//!
//! Headless access to the persisted chapter list and progress map.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;

use chapterio::config::{Settings, default_config_path};
use chapterio::logging::init_tracing;
use chapterio::ops::chapter_ops::ChapterEditor;
use chapterio::ops::time_format::{format_clock, format_duration};
use chapterio::store::{ChapterStore, FileStorage};

#[derive(Parser)]
#[command(name = "chapterio")]
#[command(about = "Define and track chapters over an audio file", long_about = None)]
#[command(version)]
struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory for persisted chapters and progress
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List chapters with their ranges and progress
    List,

    /// Append a chapter
    Add {
        #[arg(short, long)]
        title: String,

        /// Start time in seconds
        #[arg(short, long)]
        start: f64,

        /// End time in seconds
        #[arg(short, long)]
        end: f64,
    },

    /// Write chapters.json
    Export {
        /// Output directory
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },

    /// Replace all chapters from a JSON file
    Import {
        input: PathBuf,
    },

    /// Show recorded progress per chapter
    Progress,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(default_config_path);
    let settings = Settings::load_or_default(&config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;

    let level = if cli.verbose {
        "debug"
    } else {
        settings.logging.level.as_str()
    };
    init_tracing(level);

    let data_dir = cli.data_dir.clone().unwrap_or_else(|| settings.data_dir());
    debug!(data_dir = %data_dir.display(), "Opening chapter store");
    let mut store = ChapterStore::open(FileStorage::new(data_dir));
    let mut editor = ChapterEditor::new();

    match cli.command {
        Commands::List => {
            if store.chapters().is_empty() {
                println!("No chapters defined yet");
            }
            for (index, chapter) in store.chapters().iter().enumerate() {
                let done = store
                    .progress()
                    .get(chapter.id)
                    .map(|t| format!("  (reached {})", format_clock(t)))
                    .unwrap_or_default();
                println!(
                    "{:>3}. {}  {} - {}  [{}]{}",
                    index + 1,
                    chapter.display_title(index),
                    format_clock(chapter.start),
                    format_clock(chapter.end),
                    format_duration(chapter.duration()),
                    done
                );
            }
        }
        Commands::Add { title, start, end } => {
            let chapter = editor.add_chapter(&mut store, &title, start, end)?;
            println!("Added chapter {} ({})", chapter.title, chapter.id);
        }
        Commands::Export { output } => {
            let path = editor.export_to_file(&store, &output)?;
            println!(
                "Exported {} chapters to {}",
                store.chapters().len(),
                path.display()
            );
        }
        Commands::Import { input } => {
            let count = editor
                .import_from_file(&mut store, &input)
                .with_context(|| format!("importing {}", input.display()))?;
            println!("Imported {count} chapters");
        }
        Commands::Progress => {
            if store.progress().is_empty() {
                println!("No progress recorded");
            }
            for (id, time) in store.progress().iter() {
                let title = store
                    .chapter(id)
                    .map(|c| c.title.as_str())
                    .unwrap_or("(removed chapter)");
                println!("{id}  {title}  {}", format_clock(time));
            }
        }
    }

    Ok(())
}
