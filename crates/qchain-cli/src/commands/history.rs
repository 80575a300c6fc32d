//! History command implementation.

use anyhow::Result;
use console::style;

use qchain_core::{JobFilter, JobRecord, NetworkConfig, attach_analysis};
use qchain_ledger::Ledger;

use super::common::{Context, require_user, spinner};

/// Execute the history command.
pub async fn execute(ctx: &Context, mine: bool, limit: Option<usize>, format: &str) -> Result<()> {
    let session = ctx.session();
    let user = require_user(&session)?;

    if !matches!(format, "table" | "json") {
        anyhow::bail!("Unknown format: '{format}'. Available: table, json");
    }
    if mine && !user.role.is_admin() {
        println!(
            "{} --mine only changes the view for admins",
            style("!").yellow().bold()
        );
    }

    let ledger = ctx.ledger()?;
    let progress = spinner("Fetching job history...");
    let fetched = ledger.fetch_jobs().await;
    progress.finish_and_clear();

    let mut records = match fetched {
        Ok(records) => records,
        Err(e) => {
            // Shown inline, like the empty history view, not as a failed command.
            println!(
                "{} Failed to fetch job history: {e}",
                style("✗").red().bold()
            );
            return Ok(());
        }
    };

    if let Some(latest) = session.latest_analysis.clone() {
        attach_analysis(&mut records, &latest.submitter, latest.analysis);
    }

    let filter = JobFilter::new(user.role, mine, session.wallet.clone());
    let mut jobs = filter.apply(&records);
    if let Some(limit) = limit {
        jobs.truncate(limit);
    }

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&jobs)?);
        return Ok(());
    }

    if jobs.is_empty() {
        let hint = if filter.restricts_to_address() && filter.address.is_none() {
            "No jobs to show. Connect a wallet to see your jobs."
        } else {
            "No jobs logged yet."
        };
        println!("{}", style(hint).dim());
        return Ok(());
    }

    print_table(&jobs, &ctx.config.network);
    println!();
    println!("{} job(s)", jobs.len());
    Ok(())
}

fn print_table(jobs: &[JobRecord], network: &NetworkConfig) {
    for job in jobs {
        println!(
            "{}  {}  {}",
            style(job.display_id()).cyan(),
            style(job.submitted_at.format("%Y-%m-%d %H:%M:%S")).dim(),
            style(job.display_title()).bold()
        );
        println!("    Type:      {}", job.job_type);
        println!("    Submitter: {}", job.submitter);
        if job.payload.is_structured() {
            println!("    Payload:   {}", job.payload.summary());
        }
        if let Some(analysis) = &job.analysis {
            println!(
                "    Analysis:  {} ({})",
                analysis.analysis_summary, analysis.complexity
            );
            println!("    Optimize:  {}", analysis.optimization_suggestion);
        }
        if !job.tx_hash.is_empty() {
            println!("    Explorer:  {}", network.tx_url(&job.tx_hash));
        }
    }
}
