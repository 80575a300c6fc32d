//! Auth command implementation: login, register, logout, status.

use anyhow::Result;
use console::style;

use qchain_core::StoredSession;

use super::common::Context;

/// Log in and remember the user in the session file.
pub fn execute_login(ctx: &Context, email: &str, password: &str) -> Result<()> {
    let users = ctx.users()?;
    let Some(user) = users.authenticate(email, password) else {
        anyhow::bail!("Invalid email or password.");
    };

    // A new login starts from a clean session.
    let session = StoredSession {
        user: Some(user.clone()),
        ..StoredSession::default()
    };
    ctx.save(&session)?;

    println!(
        "{} Logged in as {} ({})",
        style("✓").green().bold(),
        style(&user.email).bold(),
        user.role
    );
    Ok(())
}

/// Register a new regular user. Does not log in.
pub fn execute_register(ctx: &Context, email: &str, password: &str) -> Result<()> {
    let mut users = ctx.users()?;
    let user = users.register(email, password)?;

    println!(
        "{} Registered {}. Run 'qchain auth login' to continue.",
        style("✓").green().bold(),
        style(&user.email).bold()
    );
    Ok(())
}

/// Forget the logged-in user, wallet and pending analysis.
pub fn execute_logout(ctx: &Context) -> Result<()> {
    let session = ctx.session();
    ctx.store.clear()?;

    match session.user {
        Some(user) => println!("{} Logged out {}", style("✓").green().bold(), user.email),
        None => println!("{}", style("Not logged in.").dim()),
    }
    Ok(())
}

/// Show the logged-in user and connected wallet.
pub fn execute_status(ctx: &Context) -> Result<()> {
    let session = ctx.session();

    println!("{}", style("Session").bold().underlined());
    match &session.user {
        Some(user) => {
            println!("  User:   {}", style(&user.email).green());
            println!("  Role:   {}", user.role);
        }
        None => {
            println!("  User:   {}", style("not logged in").dim());
            return Ok(());
        }
    }

    match (&session.wallet, session.chain_id) {
        (Some(address), Some(chain_id)) => {
            let expected = ctx.config.network.chain_id;
            let chain = if chain_id == expected {
                style(format!("{chain_id:#x}")).green()
            } else {
                style(format!("{chain_id:#x} (expected {expected:#x})")).yellow()
            };
            println!("  Wallet: {address}");
            println!("  Chain:  {chain}");
        }
        _ => println!("  Wallet: {}", style("not connected").dim()),
    }

    if let Some(latest) = &session.latest_analysis {
        println!("  Last analysis: {}", latest.analysis.title);
    }

    println!();
    println!("Session file: {}", ctx.store.path().display());
    Ok(())
}
