//! ToolNest - a terminal toolbox of everyday utilities

use std::path::PathBuf;

use clap::Parser;
use toolnest::cli::{self, StartOptions};
use toolnest::config::Settings;
use toolnest::registry::Category;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// ToolNest - everyday utilities in one place 🧰
#[derive(Parser, Debug)]
#[command(name = "toolnest")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Args {
    /// Print the tool grid and exit
    #[arg(short, long)]
    list: bool,

    /// Start with a category filter (e.g. "Student Kit")
    #[arg(long)]
    category: Option<Category>,

    /// Start with a search query
    #[arg(short, long)]
    search: Option<String>,

    /// Open a tool by id at startup (e.g. pdf-merger)
    #[arg(short, long)]
    tool: Option<String>,

    /// Ask the study assistant one question and exit
    #[arg(short, long)]
    prompt: Option<String>,

    /// Directory for downloaded files
    #[arg(short, long, env = "TOOLNEST_OUTPUT_DIR")]
    output_dir: Option<PathBuf>,

    /// Working directory (like git -C)
    #[arg(short = 'C', long, visible_alias = "directory")]
    cwd: Option<String>,

    /// Enable debug logging (equivalent to RUST_LOG=debug)
    #[arg(short = 'd', long)]
    debug: bool,

    /// Enable verbose logging (equivalent to RUST_LOG=trace)
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Change working directory if specified (do this early)
    if let Some(cwd) = &args.cwd {
        std::env::set_current_dir(cwd)?;
    }

    init_tracing(&args);

    let mut settings = Settings::load()?;
    if let Some(dir) = &args.output_dir {
        settings.output_dir = Some(dir.clone());
    }

    if args.list {
        return cli::list_tools(&settings, args.category, args.search.as_deref());
    }

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        if let Some(prompt) = &args.prompt {
            cli::run_single_prompt(&settings, prompt).await
        } else {
            let options = StartOptions {
                category: args.category,
                search: args.search.clone(),
                tool: args.tool.clone(),
            };
            cli::run_interactive(&settings, options).await
        }
    })
}

fn init_tracing(args: &Args) {
    // Determine log level from args or env
    let default_filter = if args.verbose {
        "trace"
    } else if args.debug {
        "debug"
    } else {
        "warn" // Quiet by default for normal use
    };

    // Initialize tracing with stderr output
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_thread_ids(false)
                .with_writer(std::io::stderr),
        )
        .init();

    if args.debug || args.verbose {
        tracing::info!("Debug logging enabled");
    }
}
