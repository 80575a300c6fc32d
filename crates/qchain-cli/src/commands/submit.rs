//! Submit command implementation.

use anyhow::Result;
use console::style;
use tracing::{info, warn};

use qchain_ai::analyse_or_skip;
use qchain_core::{AnalysisRequest, JobSubmission, LatestAnalysis, SubmissionType};
use qchain_ledger::Ledger;

use super::analyse::print_analysis;
use super::common::{Context, InputArgs, require_user, spinner};

/// Execute the submit command.
pub async fn execute(
    ctx: &Context,
    job_type: &str,
    input: &InputArgs,
    kind: SubmissionType,
    analyse: bool,
) -> Result<()> {
    let mut session = ctx.session();
    let user = require_user(&session)?.clone();
    let network = &ctx.config.network;

    let Some(wallet) = session.wallet.clone() else {
        anyhow::bail!("Connect your wallet to enable logging. Run 'qchain wallet connect'.");
    };
    if session.chain_id != Some(network.chain_id) {
        anyhow::bail!(
            "Switch your wallet to {} ({}).",
            network.chain_name,
            network.chain_id_hex()
        );
    }

    let submission = JobSubmission::new(job_type, input.read()?, kind);
    submission.validate()?;

    let analysis = if analyse {
        match ctx.generator() {
            Ok(generator) => {
                let request = AnalysisRequest::new(&submission.description, kind);
                let progress = spinner("Analysing job...");
                let analysis = analyse_or_skip(&generator, &request).await;
                progress.finish_and_clear();
                analysis
            }
            Err(e) => {
                warn!(error = %e, "Skipping analysis");
                None
            }
        }
    } else {
        None
    };

    match &analysis {
        Some(analysis) => print_analysis(analysis),
        None if analyse => println!(
            "{} Analysis unavailable, logging without it",
            style("!").yellow().bold()
        ),
        None => {}
    }

    let ledger = ctx.ledger()?;
    let title = submission.on_chain_title(analysis.as_ref());
    let payload = submission.on_chain_payload(&wallet);

    let progress = spinner(format!("Logging job on {}...", network.chain_name));
    let result = ledger.log_job(&title, &payload).await;
    progress.finish_and_clear();
    let receipt = result.map_err(|e| anyhow::anyhow!("Failed to log job: {e}"))?;

    info!(
        tx = %receipt.tx_hash,
        from = %receipt.from,
        user = %user.email,
        wallet = %wallet,
        "Job logged"
    );

    if let Some(analysis) = analysis {
        session.latest_analysis = Some(LatestAnalysis {
            submitter: wallet.clone(),
            analysis,
        });
        ctx.save(&session)?;
    }

    println!("{} Job logged: {}", style("✓").green().bold(), style(&title).bold());
    println!("  Transaction: {}", receipt.tx_hash);
    if let Some(block) = receipt.block_number {
        println!("  Block:       {block}");
    }
    println!("  Wallet:      {wallet}");
    println!("  Sent by:     {}", receipt.from);
    println!(
        "  Explorer:    {}",
        style(network.tx_url(&receipt.tx_hash)).underlined()
    );

    Ok(())
}
