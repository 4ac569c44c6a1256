//! EQL command-line interface

use clap::{Parser, Subcommand};
use env_logger::Env;
use eql::cli::output::{self, ColorMode, OutputFormat};
use eql::cli::{check, repl, run, TransportConfig};
use eql::cluster::Scheme;
use std::path::PathBuf;

/// EQL command-line tool
#[derive(Parser)]
#[command(name = "eql")]
#[command(author, version, about = "Query Elasticsearch-compatible clusters with EQL", long_about = None)]
struct Cli {
    /// Verbose output (also enables debug logging)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format
    #[arg(short = 'f', long, value_enum, global = true)]
    format: Option<OutputFormat>,

    /// Output file (default: stdout)
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Color output
    #[arg(long, value_enum, default_value = "auto", global = true)]
    color: ColorMode,

    /// URL scheme used to reach cluster endpoints
    #[arg(long, default_value = "http", global = true)]
    scheme: Scheme,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an EQL script
    Run {
        /// EQL file to run
        file: PathBuf,

        /// Log requests instead of sending them
        #[arg(short = 'n', long)]
        dry_run: bool,

        /// Reject 'and' and 'or' mixed without parentheses
        #[arg(short, long)]
        strict: bool,

        /// Print each request before it is sent
        #[arg(short, long)]
        explain: bool,
    },

    /// Check EQL scripts without running them
    Check {
        /// EQL files to check
        files: Vec<PathBuf>,

        /// Treat mixed 'and'/'or' as an error
        #[arg(short, long)]
        strict: bool,
    },

    /// Start interactive REPL
    Repl {
        /// Log requests instead of sending them
        #[arg(short = 'n', long)]
        dry_run: bool,

        /// Reject 'and' and 'or' mixed without parentheses
        #[arg(short, long)]
        strict: bool,
    },
}

fn main() {
    human_panic::setup_panic!();

    let cli = Cli::parse();

    output::setup_colors(cli.color);

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();

    let transport = |dry_run| TransportConfig {
        dry_run,
        scheme: cli.scheme,
        timeout: cli.timeout,
    };

    let result = match cli.command {
        Commands::Run {
            file,
            dry_run,
            strict,
            explain,
        } => run::run(run::RunConfig {
            file,
            transport: transport(dry_run),
            strict,
            explain,
            verbose: cli.verbose,
            output_format: cli.format.unwrap_or_default(),
            output_file: cli.output.clone(),
        }),

        Commands::Check { files, strict } => check::check(check::CheckConfig {
            files,
            strict,
            verbose: cli.verbose,
        }),

        Commands::Repl { dry_run, strict } => repl::run(repl::ReplConfig {
            transport: transport(dry_run),
            strict,
            output_format: cli.format.unwrap_or(OutputFormat::Table),
        }),
    };

    if let Err(e) = result {
        eprintln!("{}", output::format_error(&e));
        std::process::exit(1);
    }
}
