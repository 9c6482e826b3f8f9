use super::{build_grid, cap_grid, extract_dates, output_preview, render, RenderOptions};
use crate::cli::HeatArgs;
use crate::error::ContribError;
use crate::fetch::{fetch_all_years, ClientConfig, ContributionsClient};
use crate::util::{open_in_browser, parse_date};
use anyhow::Context;
use chrono::Local;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tracing::{info, warn};

const PREVIEW_WEEKS: usize = 52;

pub async fn exec(args: HeatArgs) -> anyhow::Result<()> {
    let start = parse_date(&args.start).context("Failed to parse --start")?;
    let end = match args.end.as_deref() {
        Some(end) => parse_date(end).context("Failed to parse --end")?,
        None => Local::now().date_naive(),
    };
    if start > end {
        return Err(ContribError::InvalidDate(format!(
            "Invalid range: start ({start}) is after end ({end})"
        ))
        .into());
    }

    let config = ClientConfig::new(args.token.clone()).with_endpoint(args.endpoint.clone());
    let client = ContributionsClient::new(&config).context("Failed to build HTTP client")?;

    let pb = if args.quiet {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.enable_steady_tick(Duration::from_millis(120));
        pb
    };
    pb.set_message(format!("Fetching contributions for {}...", args.username));

    let events = fetch_all_years(&client, &args.username, start, end, args.pagination, &pb)
        .await
        .context("Failed to fetch contributions")?;
    pb.finish_and_clear();
    info!(events = events.len(), "fetch complete");

    let dates = extract_dates(&events);
    let grid = build_grid(&dates).context("Failed to aggregate contribution dates")?;
    let capped = cap_grid(&grid, args.cap);

    let options = RenderOptions {
        title: format!("GitHub Contributions Heatmap ({})", args.username),
        cap: args.cap,
    };
    render(&capped, &args.output, &options)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    if !args.quiet {
        output_preview(&capped, args.cap, PREVIEW_WEEKS, events.len());
        println!("\nHeatmap written to {}", args.output.display());
    }

    if args.open {
        if let Err(e) = open_in_browser(&args.output) {
            warn!("could not open {}: {e}", args.output.display());
        }
    }

    Ok(())
}
