//! Docflow - document lifecycle tracker for your terminal.
//!
//! Without a subcommand Docflow opens the interactive menu; every menu
//! action is also available as a subcommand for scripting.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell as CompletionShell};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use docflow::core::{Config, Document, Stage};
use docflow::{App, Persisted, Shell};

/// Document lifecycle tracker for your terminal
#[derive(Parser)]
#[command(name = "docflow")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    command: Option<Commands>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path of the JSON document file
    #[arg(long, global = true, env = "DOCFLOW_DATA_FILE")]
    data_file: Option<String>,

    /// Config file to use instead of the default lookup
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive menu (default)
    Shell,

    /// Add a new document
    Add {
        /// Document title
        #[arg(short, long)]
        title: String,

        /// Author name
        #[arg(short, long)]
        author: String,

        /// Document content
        #[arg(short, long, default_value = "")]
        content: String,
    },

    /// List all documents
    List {
        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Filter documents by status or author
    Filter {
        /// Status number (1 = Draft, 2 = Under Review, 3 = Approved, 4 = Rejected)
        #[arg(short, long, conflicts_with = "author", required_unless_present = "author")]
        status: Option<usize>,

        /// Author name (case-insensitive substring)
        #[arg(short, long)]
        author: Option<String>,
    },

    /// Advance a document to the next status
    Advance {
        /// Document ID
        id: u64,
    },

    /// Revert a document to the previous status
    Revert {
        /// Document ID
        id: u64,
    },

    /// Replace a document's content
    Edit {
        /// Document ID
        id: u64,

        /// New content
        #[arg(short, long)]
        content: String,
    },

    /// Delete a document
    Delete {
        /// Document ID
        id: u64,

        /// Don't confirm before deleting
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Search titles and content
    Search {
        /// Search term (case-insensitive)
        term: String,
    },

    /// Show document statistics
    Stats {
        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Export all documents to a text file
    Export {
        /// File name without extension (defaults to a timestamped name)
        #[arg(short, long)]
        name: Option<String>,

        /// Directory to write to (defaults to the configured export directory)
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },

    /// Show configuration
    Config {
        /// Show config file path
        #[arg(long)]
        path: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: CompletionShell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = if cli.verbose { EnvFilter::new("debug") } else { EnvFilter::new("warn") };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(io::stderr))
        .with(filter)
        .init();

    let config_path = cli.config.clone().or_else(Config::find_config_file);
    let mut config = match &config_path {
        Some(path) => Config::load_from_file(path)?,
        None => Config::default(),
    };
    if let Some(data_file) = cli.data_file {
        config = config.with_data_file(data_file);
    }

    match cli.command {
        None | Some(Commands::Shell) => cmd_shell(config)?,
        Some(Commands::Add { title, author, content }) => {
            cmd_add(config, &title, &content, &author)?;
        }
        Some(Commands::List { format }) => cmd_list(config, &format)?,
        Some(Commands::Filter { status, author }) => {
            cmd_filter(config, status, author.as_deref())?;
        }
        Some(Commands::Advance { id }) => cmd_status(config, id, true)?,
        Some(Commands::Revert { id }) => cmd_status(config, id, false)?,
        Some(Commands::Edit { id, content }) => cmd_edit(config, id, &content)?,
        Some(Commands::Delete { id, yes }) => cmd_delete(config, id, yes)?,
        Some(Commands::Search { term }) => cmd_search(config, &term)?,
        Some(Commands::Stats { format }) => cmd_stats(config, &format)?,
        Some(Commands::Export { name, dir }) => cmd_export(config, name.as_deref(), dir)?,
        Some(Commands::Config { path }) => cmd_config(&config, config_path.as_deref(), path)?,
        Some(Commands::Completions { shell }) => cmd_completions(shell),
    }

    Ok(())
}

/// Open the document file, warning about load faults.
fn open_app(config: Config) -> App {
    let app = App::open(config);
    if let Some(fault) = app.load_fault() {
        eprintln!("Warning: {fault}; starting with an empty document list");
    }
    app
}

/// Open the document file for a change.
///
/// Refuses to continue when the file could not be loaded, so the unreadable
/// file is not replaced by the result of this one command.
fn open_app_for_update(config: Config) -> Result<App> {
    let app = App::open(config);
    if let Some(fault) = app.load_fault() {
        anyhow::bail!(
            "{fault}\nRefusing to modify {}; fix or move the file first",
            app.file().path().display()
        );
    }
    Ok(app)
}

/// Warn when a change could not be written to the document file.
fn warn_unsaved<T>(result: &Persisted<T>) {
    if let Some(err) = &result.save_error {
        eprintln!("Warning: change kept in memory only, failed to save to file: {err}");
    }
}

fn print_documents(docs: &[&Document], timestamp_format: &str) {
    for doc in docs {
        println!("{}", doc.summary(timestamp_format));
    }
}

/// Run the interactive menu.
fn cmd_shell(config: Config) -> Result<()> {
    let mut app = App::open(config);
    let stdin = io::stdin();
    Shell::new(&mut app, stdin.lock(), io::stdout()).run()
}

/// Add a document.
fn cmd_add(config: Config, title: &str, content: &str, author: &str) -> Result<()> {
    let mut app = open_app_for_update(config)?;
    let result = app.add(title, content, author)?;
    println!("Document successfully added with ID {}.", result.value.id);
    warn_unsaved(&result);
    Ok(())
}

/// List documents.
fn cmd_list(config: Config, format: &str) -> Result<()> {
    let app = open_app(config);
    let docs = app.list();

    match format {
        "json" => {
            let json = serde_json::to_string_pretty(docs)?;
            println!("{json}");
        }
        _ => {
            if docs.is_empty() {
                println!("No documents yet.");
                return Ok(());
            }
            print_documents(&docs.iter().collect::<Vec<_>>(), app.timestamp_format());
            println!("\nTotal: {} documents", docs.len());
        }
    }

    Ok(())
}

/// Filter documents by status number or author.
fn cmd_filter(config: Config, status: Option<usize>, author: Option<&str>) -> Result<()> {
    let app = open_app(config);

    let (heading, docs) = match (status, author) {
        (Some(number), _) => {
            if number == 0 || number > Stage::ALL.len() {
                anyhow::bail!("Invalid status number: {number} (expected 1-{})", Stage::ALL.len());
            }
            let index = number - 1;
            (format!("status '{}'", Stage::ALL[index]), app.filter_by_status(index)?)
        }
        (None, Some(author)) => (format!("author '{author}'"), app.filter_by_author(author)),
        (None, None) => anyhow::bail!("Specify --status or --author"),
    };

    if docs.is_empty() {
        println!("No documents with {heading} found.");
    } else {
        println!("=== Documents with {heading} ===");
        print_documents(&docs, app.timestamp_format());
    }
    Ok(())
}

/// Advance or revert a document's status.
fn cmd_status(config: Config, id: u64, forward: bool) -> Result<()> {
    let mut app = open_app_for_update(config)?;
    let result = if forward { app.advance(id)? } else { app.revert(id)? };

    if result.value {
        let status = app.find(id)?.status;
        let verb = if forward { "updated" } else { "changed" };
        println!("Status {verb} to: {status}");
        warn_unsaved(&result);
    } else if forward {
        println!("Document is already at final status.");
    } else {
        println!("Document is already at initial status.");
    }
    Ok(())
}

/// Replace a document's content.
fn cmd_edit(config: Config, id: u64, content: &str) -> Result<()> {
    let mut app = open_app_for_update(config)?;
    let result = app.edit(id, content)?;
    println!("Document content updated.");
    warn_unsaved(&result);
    Ok(())
}

/// Delete a document.
fn cmd_delete(config: Config, id: u64, skip_confirm: bool) -> Result<()> {
    let mut app = open_app_for_update(config)?;
    let title = app.find(id)?.title.clone();

    if !skip_confirm {
        print!("Are you sure you want to delete document '{title}'? (yes/no): ");
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;

        if !matches!(input.trim().to_lowercase().as_str(), "yes" | "y") {
            println!("Deletion cancelled.");
            return Ok(());
        }
    }

    let result = app.delete(id)?;
    println!("Document deleted.");
    warn_unsaved(&result);
    Ok(())
}

/// Search titles and content.
fn cmd_search(config: Config, term: &str) -> Result<()> {
    let app = open_app(config);
    let docs = app.search(term)?;
    let term = term.trim().to_lowercase();

    if docs.is_empty() {
        println!("No documents found containing '{term}'.");
    } else {
        println!("=== Search Results for '{term}' ===");
        print_documents(&docs, app.timestamp_format());
    }
    Ok(())
}

/// Show statistics.
fn cmd_stats(config: Config, format: &str) -> Result<()> {
    let app = open_app(config);
    let stats = app.statistics();

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&stats)?),
        _ => print!("{}", stats.render()),
    }
    Ok(())
}

/// Export documents to a text file.
fn cmd_export(config: Config, name: Option<&str>, dir: Option<PathBuf>) -> Result<()> {
    let app = open_app(config);
    let path = match dir {
        Some(dir) => app.export_to(&dir, name)?,
        None => app.export(name)?,
    };
    println!("Documents exported to '{}'.", path.display());
    Ok(())
}

/// Show configuration.
fn cmd_config(config: &Config, loaded_from: Option<&Path>, show_path: bool) -> Result<()> {
    if show_path {
        match loaded_from {
            Some(path) => println!("{}", path.display()),
            None => println!("No config file found, using defaults"),
        }
        return Ok(());
    }

    let toml = toml::to_string_pretty(config)?;
    println!("{toml}");
    Ok(())
}

/// Generate shell completions.
fn cmd_completions(shell: CompletionShell) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "docflow", &mut io::stdout());
}
