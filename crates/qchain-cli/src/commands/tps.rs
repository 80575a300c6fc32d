//! TPS command implementation.

use anyhow::Result;
use console::style;

use qchain_ledger::ExplorerClient;

use super::common::{Context, spinner};

/// Print the explorer's current transactions-per-second figure.
pub async fn execute(ctx: &Context) -> Result<()> {
    let network = &ctx.config.network;
    let explorer = ExplorerClient::new(network.stats_url())?;

    let progress = spinner("Fetching network stats...");
    let tps = explorer.tps().await;
    progress.finish_and_clear();

    match tps {
        Ok(tps) => println!(
            "{} {}: {} TPS",
            style("→").cyan().bold(),
            network.chain_name,
            style(format!("{tps:.2}")).yellow()
        ),
        Err(e) => println!(
            "{} {}: TPS unavailable ({e})",
            style("✗").red().bold(),
            network.chain_name
        ),
    }
    Ok(())
}
