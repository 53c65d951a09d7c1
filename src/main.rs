//! config-validate CLI
//!
//! Entry point for the `config-validate` command-line tool.

use std::path::PathBuf;
use std::process;

use clap::Parser;
use config_validate::{pipeline, CliOverrides, EffectiveOptions, FailureState, EXIT_FATAL};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "config-validate")]
#[command(about = "Check environment settings overlays against the baseline settings file", version)]
struct Cli {
    /// Directory holding the settings files and the optional dotfile
    #[arg(long, short = 'C', default_value = ".")]
    root: PathBuf,

    /// Options file to use instead of <root>/.config-validate (.json or .toml)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Environments to check (comma-separated, default: Production)
    #[arg(long, short = 'e', value_delimiter = ',')]
    environments: Option<Vec<String>>,

    /// States that fail the run (comma-separated: Missing, Unknown; default: Missing)
    #[arg(long, short = 'f', value_delimiter = ',')]
    failure_states: Option<Vec<FailureState>>,

    /// Keys to ignore, e.g. "Logging:LogLevel:Default" (comma-separated)
    #[arg(long, short = 'i', value_delimiter = ',')]
    ignore_paths: Option<Vec<String>>,

    /// Only show settings matching these states (comma-separated)
    #[arg(long, short = 's', value_delimiter = ',')]
    show: Option<Vec<FailureState>>,

    /// Truncate displayed values to this many characters
    #[arg(long)]
    value_width: Option<usize>,

    /// File-name stem of the settings files
    #[arg(long)]
    stem: Option<String>,

    /// Output the report in JSON format
    #[arg(long)]
    json: bool,

    /// Print the effective options and exit
    #[arg(long)]
    print_options: bool,

    /// Enable debug logging
    #[arg(long, short = 'v', conflicts_with = "quiet")]
    verbose: bool,

    /// Only log warnings and errors
    #[arg(long, short = 'q')]
    quiet: bool,
}

impl Cli {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            environments: self.environments.clone(),
            failure_states: self.failure_states.clone(),
            ignore_paths: self.ignore_paths.clone(),
            show: self.show.clone(),
            value_width: self.value_width,
            stem: self.stem.clone(),
        }
    }
}

fn init_tracing(verbose: bool, quiet: bool) {
    let default_filter = if verbose {
        "config_validate=debug,cv_core=debug"
    } else if quiet {
        "warn"
    } else {
        "config_validate=info"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let effective = match EffectiveOptions::build(&cli.root, cli.config.as_deref(), &cli.overrides()) {
        Ok(effective) => effective,
        Err(e) => {
            eprintln!("Error loading options: {}", e);
            process::exit(EXIT_FATAL);
        }
    };

    if cli.print_options {
        match serde_json::to_string_pretty(&effective) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing options: {}", e);
                process::exit(EXIT_FATAL);
            }
        }
        process::exit(0);
    }

    let options = effective.options;
    tracing::debug!(
        environments = ?options.environments,
        failure_states = %options.failure_states,
        ignore_paths = ?options.ignore_paths,
        show = %options.show,
        "options resolved"
    );

    let summary = match pipeline::run(&cli.root, &options) {
        Ok(summary) => summary,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(e.exit_code());
        }
    };

    if cli.json {
        match summary.to_json() {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing output: {}", e);
                process::exit(EXIT_FATAL);
            }
        }
    } else {
        print!("{}", summary.to_human(options.value_width));
    }

    process::exit(summary.exit_code);
}
