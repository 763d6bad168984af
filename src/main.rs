use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod app;
mod sender;
mod sink;

use app::{App, RunArgs};
use sender::SendArgs;

/// Target-acquisition test harness driven by classifier commands over UDP.
#[derive(Parser, Debug)]
#[command(name = "fitts-harness", version)]
struct Cli {
    /// Log filter used when RUST_LOG is unset.
    #[arg(long, global = true, default_value = "info")]
    log_level: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run one acquisition session.
    Run(RunArgs),
    /// Emit wire-format commands, standing in for the classifier.
    Send(SendArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Run(args) => {
            let app = App::new(&args)?;
            app.run()?;
        }
        Command::Send(args) => sender::send(&args)?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_run_overrides() {
        let cli = Cli::try_parse_from([
            "fitts-harness",
            "run",
            "--variant",
            "linear",
            "--seed",
            "9",
            "--trials",
            "3",
            "--json",
        ])
        .unwrap();
        let Command::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.seed, Some(9));
        assert_eq!(args.trials, Some(3));
        assert!(args.json);
    }
}
