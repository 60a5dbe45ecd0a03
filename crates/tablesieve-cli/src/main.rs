mod commands;
mod output;

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "tablesieve",
    version,
    about = "Extract data tables from PDF documents, filtering out layout false positives"
)]
struct Cli {
    /// Log detection details to stderr (-v summary, -vv every rejected candidate)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract the tables of a PDF into a report file
    Extract {
        /// Path to PDF file
        input_file: PathBuf,

        /// Pages to process: "all", or a list like "1,3-5,8-end"
        #[arg(short, long, default_value = "all")]
        pages: String,

        /// JSON configuration file (defaults are used for missing keys)
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Directory the report is written to
        #[arg(long, value_name = "DIR", default_value = "results")]
        out_dir: PathBuf,

        /// Report format: text (default) or json
        #[arg(short, long, default_value = "text")]
        format: String,
    },
    /// Run the table validity filter over pre-extracted grids
    Classify {
        /// JSON file holding an array of grids (arrays of rows of cells)
        input_file: PathBuf,

        /// JSON configuration file
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        format: String,
    },
    /// Inspect and check configuration files
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the built-in configuration as JSON
    Show,
    /// Validate a configuration file
    Validate {
        /// Path to JSON configuration file
        file: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Extract {
            input_file,
            pages,
            config,
            out_dir,
            format,
        } => commands::extract::run(input_file, &pages, config, out_dir, &format),
        Commands::Classify {
            input_file,
            config,
            format,
        } => commands::classify::run(input_file, config, &format),
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::show(),
            ConfigAction::Validate { file } => commands::config::validate(&file),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

/// `-v` flags win over `RUST_LOG`; without them `RUST_LOG` applies, falling
/// back to warnings only.
fn init_tracing(verbose: u8) {
    let env_filter = match verbose {
        0 => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("tablesieve_core=warn")),
        1 => EnvFilter::new("tablesieve_core=info"),
        _ => EnvFilter::new("tablesieve_core=debug"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}
