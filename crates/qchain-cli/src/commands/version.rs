//! Version command implementation.

use console::style;

/// Execute the version command.
pub fn execute() {
    let version = env!("CARGO_PKG_VERSION");

    println!(
        "{} {} - quantum job logging on an EVM ledger",
        style("QuantumChain").cyan().bold(),
        style(format!("v{version}")).yellow()
    );
    println!();
    println!("Components:");
    println!("  qchain-core       Job model, estimation, filtering, configuration");
    println!("  qchain-ledger     JSON-RPC client and job-logger contract access");
    println!("  qchain-ai         Job analysis and chat");
    println!("  qchain-dashboard  Web dashboard and HTTP API");
    println!("  qchain-cli        Command-line interface");
}
