use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// AI-platform switching analysis with a Markov chain.
#[derive(Parser)]
#[command(
    name = "aitrends",
    version,
    about = "Markov-chain analysis of user switching between AI platforms"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to TOML configuration file (built-in defaults when omitted).
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the sequence file path from config.
    #[arg(short, long, global = true)]
    pub data: Option<PathBuf>,

    /// Print results as JSON instead of text tables.
    #[arg(long, global = true)]
    pub json: bool,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Show the first navigation sequences and their transitions.
    Sequences {
        /// Number of sequences to show.
        #[arg(short, long, default_value_t = 5)]
        limit: usize,
    },
    /// Show the estimated transition matrix.
    Matrix,
    /// Show the initial probability vector.
    Initial,
    /// Forecast the n-step matrix and distribution.
    Forecast {
        /// Number of steps.
        #[arg(short = 'n', long)]
        steps: u32,
    },
    /// Show the long-run (stationary) distribution.
    Stationary,
    /// Show the most likely destinations from every platform.
    Recommend {
        /// Destinations listed per platform.
        #[arg(short, long, default_value_t = 2)]
        top: usize,
    },
    /// Run commands interactively until `quit`.
    Shell,
}

/// One line typed into the interactive shell.
#[derive(Debug, Parser)]
#[command(name = "aitrends", no_binary_name = true, disable_version_flag = true)]
pub struct ShellLine {
    #[command(subcommand)]
    pub command: Command,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
        ShellLine::command().debug_assert();
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["aitrends", "forecast", "-n", "3", "--json", "-vv"]).unwrap();
        assert_eq!(cli.command, Command::Forecast { steps: 3 });
        assert!(cli.json);
        assert_eq!(cli.verbose, 2);
        assert!(cli.config.is_none());
    }

    #[test]
    fn defaults_for_optional_counts() {
        let cli = Cli::try_parse_from(["aitrends", "sequences"]).unwrap();
        assert_eq!(cli.command, Command::Sequences { limit: 5 });
        let cli = Cli::try_parse_from(["aitrends", "recommend"]).unwrap();
        assert_eq!(cli.command, Command::Recommend { top: 2 });
    }

    #[test]
    fn forecast_requires_steps() {
        assert!(Cli::try_parse_from(["aitrends", "forecast"]).is_err());
        assert!(Cli::try_parse_from(["aitrends", "forecast", "-n", "-1"]).is_err());
    }

    #[test]
    fn shell_line_parses_without_binary_name() {
        let line = ShellLine::try_parse_from(["recommend", "--top", "3"]).unwrap();
        assert_eq!(line.command, Command::Recommend { top: 3 });
        assert!(ShellLine::try_parse_from(["frobnicate"]).is_err());
    }
}
