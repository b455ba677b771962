//! tenet CLI, convention enforcement for declarative model layers.
//!
//! This binary provides the `tenet` command with subcommands for
//! initialization and for each conformance check. See `tenet --help` for
//! usage.
//!
//! Exit codes: 0 clean, 1 violations found, 2 usage or wiring error.

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli_args;
mod commands;

use cli_args::{Cli, Commands};

/// Logs go to stderr so stdout stays machine-readable. `TENET_LOG` takes an
/// `EnvFilter` directive; `--verbose` lowers the default from `warn` to
/// `debug`.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("TENET_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let formatter: Box<dyn tenet_output::OutputFormatter> = if cli.json {
        Box::new(tenet_output::json::JsonFormatter)
    } else {
        Box::new(tenet_output::human::HumanFormatter)
    };

    let root = cli.root.as_deref();
    let exit_code = match cli.command {
        Commands::Init { force } => commands::init::run(root, force),
        Commands::Defs => commands::defs::run(&*formatter, root),
        Commands::Associations => commands::associations::run(&*formatter, root),
        Commands::Actions => commands::actions::run(&*formatter, root),
        Commands::Upgrade => commands::upgrade::run(&*formatter, root),
        Commands::Verify => commands::verify::run(&*formatter, root),
        Commands::Macros { counts } => commands::macros::run(&*formatter, root, counts.as_deref()),
    };

    std::process::exit(exit_code);
}
