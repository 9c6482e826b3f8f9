use crate::fetch::{GITHUB_GRAPHQL_ENDPOINT, TOKEN_ENV};
use crate::heat::DEFAULT_CAP;
use crate::model::PaginationMode;
use anyhow::Result;
use clap::{ArgAction, Args, Parser};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "contribmap")]
#[command(about = "Fetch GitHub contribution history and render a weekday heatmap")]
#[command(version)]
pub struct Cli {
    #[clap(flatten)]
    pub heat: HeatArgs,

    #[arg(short, long, action = ArgAction::Count, global = true, help = "Increase log verbosity (-v info, -vv debug)")]
    pub verbose: u8,
}

#[derive(Args, Clone, Debug)]
pub struct HeatArgs {
    #[arg(long, default_value = "CristiGuijarro", help = "GitHub username")]
    pub username: String,

    #[arg(long, default_value = "2019-09-15", help = "Start date for fetching contributions (YYYY-MM-DD)")]
    pub start: String,

    #[arg(long, help = "End date for fetching contributions (YYYY-MM-DD, defaults to today)")]
    pub end: Option<String>,

    #[arg(long, default_value = "contributions_plotly_fig.html", help = "Output file for the heatmap")]
    pub output: PathBuf,

    #[arg(long, env = TOKEN_ENV, hide_env_values = true, help = "GitHub token with read access")]
    pub token: Option<String>,

    #[arg(long, default_value = GITHUB_GRAPHQL_ENDPOINT, hide = true)]
    pub endpoint: String,

    #[arg(long, value_enum, default_value_t = PaginationMode::Shared, help = "How sub-collections are paginated")]
    pub pagination: PaginationMode,

    #[arg(long, default_value_t = DEFAULT_CAP, value_parser = clap::value_parser!(u32).range(1..), help = "Cells at or above this count share the darkest color")]
    pub cap: u32,

    #[arg(long, help = "Open the heatmap in a browser when done")]
    pub open: bool,

    #[arg(short, long, help = "Suppress progress and the terminal preview")]
    pub quiet: bool,
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Default log directive for the `-v` count.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }

    /// Runs on a single-threaded runtime; requests are issued one at a time.
    pub fn execute(self) -> Result<()> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        runtime.block_on(crate::heat::exec(self.heat))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let cli = Cli::try_parse_from(["contribmap"]).unwrap();
        assert_eq!(cli.heat.username, "CristiGuijarro");
        assert_eq!(cli.heat.start, "2019-09-15");
        assert_eq!(cli.heat.end, None);
        assert_eq!(cli.heat.output, PathBuf::from("contributions_plotly_fig.html"));
        assert_eq!(cli.heat.endpoint, GITHUB_GRAPHQL_ENDPOINT);
        assert_eq!(cli.heat.pagination, PaginationMode::Shared);
        assert_eq!(cli.heat.cap, 10);
        assert_eq!(cli.log_level(), "warn");
    }

    #[test]
    fn parses_overrides() {
        let cli = Cli::try_parse_from([
            "contribmap",
            "--username",
            "octocat",
            "--start",
            "2020-01-01",
            "--end",
            "2022-06-30",
            "--output",
            "out.html",
            "--token",
            "secret",
            "--pagination",
            "per-collection",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.heat.username, "octocat");
        assert_eq!(cli.heat.end.as_deref(), Some("2022-06-30"));
        assert_eq!(cli.heat.token.as_deref(), Some("secret"));
        assert_eq!(cli.heat.pagination, PaginationMode::PerCollection);
        assert_eq!(cli.log_level(), "debug");
    }

    #[test]
    fn zero_cap_is_rejected() {
        assert!(Cli::try_parse_from(["contribmap", "--cap", "0"]).is_err());
        let cli = Cli::try_parse_from(["contribmap", "--cap", "20"]).unwrap();
        assert_eq!(cli.heat.cap, 20);
    }
}
