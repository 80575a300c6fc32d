//! Contract command implementation.

use console::style;

use super::common::Context;

/// Print the job-logger contract and the network it lives on.
pub fn execute(ctx: &Context) {
    let network = &ctx.config.network;

    println!("{}", style("Job logger contract").bold().underlined());
    println!("  Address:    {}", style(&network.contract_address).cyan());
    println!("  Query mode: {}", ctx.config.ledger.query_mode);
    println!();
    println!("{}", style("Network").bold().underlined());
    println!("  Name:       {}", network.chain_name);
    println!(
        "  Chain id:   {} ({})",
        network.chain_id,
        network.chain_id_hex()
    );
    println!("  RPC:        {}", network.rpc_url);
    println!(
        "  Currency:   {} ({}, {} decimals)",
        network.native_currency.name,
        network.native_currency.symbol,
        network.native_currency.decimals
    );
    println!(
        "  Explorer:   {}",
        style(network.address_url(&network.contract_address)).underlined()
    );
}
