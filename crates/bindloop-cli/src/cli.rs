use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "bindloop - greedy structure-guided binder design, alternating a structure-prediction tool and a sequence-design tool.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all console log output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the design loop: fold, score, accept or keep, redesign.
    Run(RunArgs),
    /// Score one directory of structure-prediction output and rank its candidates.
    Score(ScoreArgs),
}

/// Arguments for the `run` subcommand.
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Path to the configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Output directory holding one `round_<n>` subdirectory per round.
    #[arg(short, long, required = true, value_name = "DIR")]
    pub output: PathBuf,

    /// Override the total number of rounds (`search.total-rounds`).
    #[arg(short = 'n', long, value_name = "INT")]
    pub rounds: Option<usize>,

    /// Override the first round to run (`search.start-round`).
    #[arg(long, value_name = "INT")]
    pub start_round: Option<usize>,

    /// Structure to continue from when resuming (`resume.best-structure`).
    #[arg(long, value_name = "PATH")]
    pub resume_structure: Option<PathBuf>,

    /// Loss of the resumed structure (`resume.best-loss`).
    #[arg(long, value_name = "FLOAT", allow_hyphen_values = true)]
    pub resume_loss: Option<f64>,

    /// Override the minimum loss improvement required to accept a round.
    #[arg(long, value_name = "FLOAT")]
    pub min_improvement: Option<f64>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S scoring.contact-cutoff=0.4
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `score` subcommand.
#[derive(Args, Debug, Clone)]
pub struct ScoreArgs {
    /// Directory containing the structures and confidence artifacts of one batch.
    #[arg(short, long, required = true, value_name = "DIR")]
    pub input: PathBuf,

    /// Path to the configuration file in TOML format; only scoring settings are used.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Set a specific configuration value, overriding the config file.
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_arguments_are_parsed() {
        let cli = Cli::parse_from([
            "bindloop",
            "-vv",
            "run",
            "--config",
            "loop.toml",
            "--output",
            "out",
            "--rounds",
            "12",
            "--start-round",
            "3",
            "--resume-loss",
            "-1.5",
            "-S",
            "scoring.contact-cutoff=0.4",
        ]);
        assert_eq!(cli.verbose, 2);
        let Commands::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.config, Some(PathBuf::from("loop.toml")));
        assert_eq!(args.output, PathBuf::from("out"));
        assert_eq!(args.rounds, Some(12));
        assert_eq!(args.start_round, Some(3));
        assert_eq!(args.resume_loss, Some(-1.5));
        assert_eq!(args.set_values, vec!["scoring.contact-cutoff=0.4"]);
    }

    #[test]
    fn score_requires_input() {
        assert!(Cli::try_parse_from(["bindloop", "score"]).is_err());
        let cli = Cli::try_parse_from(["bindloop", "score", "-i", "round_0/colabfold_results"]).unwrap();
        assert!(matches!(cli.command, Commands::Score(ScoreArgs { config: None, .. })));
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["bindloop", "-q", "-v", "score", "-i", "x"]).is_err());
    }
}
