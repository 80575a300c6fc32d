//! Wallet command implementation.
//!
//! The CLI never holds the wallet's key. It only records which account and
//! chain the user reports, the same way the dashboard records what a browser
//! wallet reports.

use anyhow::Result;
use console::style;
use tracing::warn;

use qchain_core::Address;
use qchain_core::network::parse_chain_id;
use qchain_ledger::{JsonRpcClient, WalletSession, format_units};

use super::common::{Context, require_user, spinner};

/// Remember a wallet address and chain for this session.
pub fn execute_connect(ctx: &Context, address: &str, chain_id: Option<&str>) -> Result<()> {
    let mut session = ctx.session();
    require_user(&session)?;

    let network = &ctx.config.network;
    let address = Address::parse(address)?;
    let chain_id = match chain_id {
        Some(raw) => {
            parse_chain_id(raw).ok_or_else(|| anyhow::anyhow!("Invalid chain id: {raw}"))?
        }
        None => network.chain_id,
    };
    let wallet = WalletSession::new(address, chain_id);

    session.wallet = Some(wallet.address.clone());
    session.chain_id = Some(wallet.chain_id);
    ctx.save(&session)?;

    println!(
        "{} Wallet connected: {}",
        style("✓").green().bold(),
        style(&wallet.address).bold()
    );
    if wallet.requires_switch(network) {
        println!(
            "{} Wallet is on chain {}. Switch to {} ({}) before submitting.",
            style("!").yellow().bold(),
            wallet.chain_id_hex(),
            network.chain_name,
            network.chain_id_hex()
        );
    }
    Ok(())
}

/// Forget the connected wallet.
pub fn execute_disconnect(ctx: &Context) -> Result<()> {
    let mut session = ctx.session();
    if session.wallet.is_none() {
        println!("{}", style("No wallet connected.").dim());
        return Ok(());
    }

    session.wallet = None;
    session.chain_id = None;
    ctx.save(&session)?;

    println!("{} Wallet disconnected", style("✓").green().bold());
    Ok(())
}

/// Show the connected wallet and its native balance.
pub async fn execute_status(ctx: &Context) -> Result<()> {
    let session = ctx.session();
    let network = &ctx.config.network;

    let (Some(address), Some(chain_id)) = (session.wallet.clone(), session.chain_id) else {
        println!("{}", style("No wallet connected.").dim());
        return Ok(());
    };
    let wallet = WalletSession::new(address, chain_id);

    println!("{}", style("Wallet").bold().underlined());
    println!("  Address:  {}", wallet.address);
    println!("  Chain:    {}", wallet.chain_id_hex());

    if wallet.requires_switch(network) {
        println!(
            "  {} switch to {} ({})",
            style("!").yellow().bold(),
            network.chain_name,
            network.chain_id_hex()
        );
    } else {
        let progress = spinner("Fetching balance...");
        let balance = match JsonRpcClient::http(&network.rpc_url) {
            Ok(rpc) => wallet.balance(&rpc).await,
            Err(e) => Err(e),
        };
        progress.finish_and_clear();

        match balance {
            Ok(wei) => println!(
                "  Balance:  {} {}",
                format_units(wei, network.native_currency.decimals),
                network.native_currency.symbol
            ),
            Err(e) => {
                warn!(address = %wallet.address, error = %e, "Balance lookup failed");
                println!("  Balance:  {}", style("unavailable").dim());
            }
        }
    }

    println!(
        "  Explorer: {}",
        style(network.address_url(&wallet.address)).underlined()
    );
    Ok(())
}
