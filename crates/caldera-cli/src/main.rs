mod commands;

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use commands::{EXIT_CONFIG_ERROR, EXIT_FAILURE, EXIT_GRAPH_ERROR};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "caldera",
    version,
    about = "Compile a cluster configuration into a dependency-ordered resource graph"
)]
struct Cli {
    /// Output results as structured JSON.
    #[arg(long, default_value_t = false, global = true)]
    json: bool,

    /// Enable verbose (debug) logging output.
    #[arg(short, long, default_value_t = false, global = true)]
    verbose: bool,

    /// Enable trace-level logging (more detailed than --verbose).
    #[arg(long, default_value_t = false, global = true)]
    trace: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Write a starter configuration document to ./app-config.yml.
    Init {
        /// Overwrite an existing configuration file.
        #[arg(long, default_value_t = false)]
        force: bool,
    },
    /// Compile the configuration into the assembly handed to the
    /// provisioning engine.
    Synth {
        /// Path to the YAML configuration document.
        #[arg(default_value = "app-config.yml")]
        config: PathBuf,
        /// Write the assembly JSON to a file instead of stdout.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Validate the configuration document without synthesizing.
    Validate {
        /// Path to the YAML configuration document.
        #[arg(default_value = "app-config.yml")]
        config: PathBuf,
    },
    /// Show the resource graph: submission order and dependency edges.
    Graph {
        /// Path to the YAML configuration document.
        #[arg(default_value = "app-config.yml")]
        config: PathBuf,
    },
    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.trace {
        "trace"
    } else if cli.verbose {
        "debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("CALDERA_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_target(false)
        .without_time()
        .init();

    let json_output = cli.json;
    let result = match cli.command {
        Commands::Init { force } => commands::init::run(force, json_output),
        Commands::Synth { config, out } => {
            commands::synth::run(&config, out.as_deref(), json_output)
        }
        Commands::Validate { config } => commands::validate::run(&config, json_output),
        Commands::Graph { config } => commands::graph::run(&config, json_output),
        Commands::Completions { shell } => commands::completions::run::<Cli>(shell),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(msg) => {
            eprintln!("error: {msg}");
            let code = if msg.starts_with("missing configuration field")
                || msg.starts_with("invalid configuration value")
                || msg.starts_with("failed to parse configuration")
                || msg.starts_with("failed to read configuration")
                || msg.starts_with("configuration document has no")
                || msg.starts_with("configuration error:")
            {
                EXIT_CONFIG_ERROR
            } else if msg.starts_with("invalid policy resource")
                || msg.starts_with("unresolved dependency")
                || msg.starts_with("dependency cycle")
            {
                EXIT_GRAPH_ERROR
            } else {
                EXIT_FAILURE
            };
            ExitCode::from(code)
        }
    }
}
