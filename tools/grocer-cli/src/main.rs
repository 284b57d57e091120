//! Grocer CLI - admin tool for the grocery catalog overlay.
//!
//! Commands:
//! - `grocer list` - List the visible catalog
//! - `grocer show` - Show one product
//! - `grocer add` - Add a product
//! - `grocer edit` - Edit a product
//! - `grocer delete` - Remove products from the catalog
//! - `grocer classify` - Show the category a name would get
//! - `grocer ingest` - Turn scraped listings into products
//! - `grocer migrate` - Import overrides from the old slot layout
//! - `grocer reset` - Drop every local override
//! - `grocer config` - Manage configuration

mod commands;
mod config;
mod context;
mod output;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{
    AddArgs, ClassifyArgs, ConfigArgs, DeleteArgs, EditArgs, IngestArgs, ListArgs, MigrateArgs,
    ResetArgs, ShowArgs,
};

/// Grocer CLI - Manage the grocery catalog and its local overrides
#[derive(Parser)]
#[command(name = "grocer")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Verbose output; repeat for debug logs
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the visible catalog
    List(ListArgs),

    /// Show one product
    Show(ShowArgs),

    /// Add a product
    Add(AddArgs),

    /// Edit a product
    Edit(EditArgs),

    /// Remove products from the catalog
    Delete(DeleteArgs),

    /// Show the category a product name would get
    Classify(ClassifyArgs),

    /// Turn scraped listings into products
    Ingest(IngestArgs),

    /// Import overrides kept in the old slot layout
    Migrate(MigrateArgs),

    /// Drop every local override
    Reset(ResetArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    // Setup output formatting
    let output = output::Output::new(cli.verbose > 0, cli.json);

    // Load config
    let config_path = cli.config.as_deref();
    let ctx = match context::Context::load(config_path, output.clone()) {
        Ok(ctx) => ctx,
        Err(e) => {
            output.error(&format!("{:#}", e));
            std::process::exit(1);
        }
    };

    // Execute command
    let result = match cli.command {
        Commands::List(args) => commands::list::run(args, &ctx),
        Commands::Show(args) => commands::show::run(args, &ctx),
        Commands::Add(args) => commands::add::run(args, &ctx),
        Commands::Edit(args) => commands::edit::run(args, &ctx),
        Commands::Delete(args) => commands::delete::run(args, &ctx),
        Commands::Classify(args) => commands::classify::run(args, &ctx),
        Commands::Ingest(args) => commands::ingest::run(args, &ctx),
        Commands::Migrate(args) => commands::migrate::run(args, &ctx),
        Commands::Reset(args) => commands::reset::run(args, &ctx),
        Commands::Config(args) => commands::config::run(args, &ctx),
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}

/// Logs go to stderr. `RUST_LOG` wins over `-v`.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let default = format!("grocer_cli={level},grocer_catalog={level},grocer_store={level}");

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
