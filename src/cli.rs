use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gitdigest")]
#[command(about = "Summarize git activity across repositories and post the report to Slack")]
#[command(version)]
pub struct Cli {
    #[arg(long, short, global = true, help = "Enable debug logging")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Clone)]
pub struct AnalyzeArgs {
    #[arg(
        long = "repos",
        short = 'r',
        required = true,
        help = "Git repository path to analyze (repeatable)"
    )]
    pub repos: Vec<PathBuf>,

    #[arg(long, short, help = "Number of days to analyze [default: 7 or TIME_WINDOW_DAYS]")]
    pub days: Option<u32>,

    #[arg(long, help = "Start of the analysis window (YYYY-MM-DD or RFC3339)")]
    pub start_date: Option<String>,

    #[arg(long, help = "End of the analysis window (YYYY-MM-DD or RFC3339)")]
    pub end_date: Option<String>,

    #[arg(long, short, help = "Path to a TOML configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Slack channel to send the report to (overrides config)")]
    pub channel: Option<String>,

    #[arg(long, help = "Generate the report but do not send it")]
    pub dry_run: bool,

    #[arg(long, help = "Save the generated report to this file")]
    pub save_report: Option<PathBuf>,

    #[arg(long, help = "Skip the language model and use the templated report")]
    pub offline: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze repositories and deliver a report
    Analyze(AnalyzeArgs),
    /// Check the configured Slack credentials
    TestSlack {
        #[arg(long, short, help = "Path to a TOML configuration file")]
        config: Option<PathBuf>,
    },
    /// Check that paths are git repositories
    ValidateRepos {
        #[arg(required = true, help = "Repository paths")]
        repositories: Vec<PathBuf>,
    },
}

impl Cli {
    pub fn execute(self) -> Result<()> {
        match self.command {
            Commands::Analyze(args) => crate::analyze::exec(args),
            Commands::TestSlack { config } => crate::check::test_slack(config.as_deref()),
            Commands::ValidateRepos { repositories } => crate::check::validate_repos(&repositories),
        }
    }
}
