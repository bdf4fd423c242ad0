//! ragdesk CLI entry point.

use clap::Parser;
use ragdesk::cli::commands::{self, GlobalPaths};
use ragdesk::cli::{Cli, Commands, OutputFormat};
use ragdesk::error::Error;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    // Set up tracing based on verbosity
    init_tracing(cli.verbose, cli.quiet);

    // Resolve effective JSON mode: --json OR --format json OR non-TTY stdout
    let json = cli.json
        || cli.format == OutputFormat::Json
        || !std::io::IsTerminal::is_terminal(&std::io::stdout());

    // Run the command and handle errors
    match run(&cli, json) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if json {
                eprintln!("{}", e.to_structured_json());
            } else if !cli.quiet {
                if let Some(hint) = e.hint() {
                    eprintln!("Error: {e}\n  Hint: {hint}");
                } else {
                    eprintln!("Error: {e}");
                }
            }
            ExitCode::from(e.exit_code())
        }
    }
}

fn init_tracing(verbose: u8, quiet: bool) {
    use tracing_subscriber::EnvFilter;

    if quiet {
        return;
    }

    // Honor RUST_LOG if set, otherwise use verbosity flag
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        match verbose {
            0 => EnvFilter::new("warn"),
            1 => EnvFilter::new("info"),
            2 => EnvFilter::new("debug,reqwest=info,hyper=info"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn run(cli: &Cli, json: bool) -> Result<(), Error> {
    let paths = GlobalPaths {
        config: cli.config.as_deref(),
        kb: cli.kb.as_deref(),
    };

    match &cli.command {
        Commands::Search { query, top_k, keywords } => {
            commands::search::execute(paths, query, *top_k, *keywords, json)
        }
        Commands::Context { query, top_k } => commands::context::execute(paths, query, *top_k, json),
        Commands::Category { name, top_k } => commands::category::execute(paths, name, *top_k, json),

        Commands::Index { command } => commands::index::execute(command, paths, json),
        Commands::Kb { command } => commands::kb::execute(command, paths, json),
        Commands::Embeddings { command } => commands::embeddings::execute(command, paths, json),
        Commands::Config { command } => commands::config::execute(command, paths, json),

        Commands::Version => commands::version::execute(json),

        // Shell completions
        Commands::Completions { shell } => commands::completions::execute(shell),
    }
}
