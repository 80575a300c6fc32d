//! Chat command implementation.

use anyhow::Result;
use console::style;
use tracing::warn;

use qchain_ai::{CHAT_FALLBACK, chat_or_apologise};

use super::common::{Context, require_user, spinner};

/// Execute the chat command. Model failures print the fixed apology.
pub async fn execute(ctx: &Context, prompt: &str) -> Result<()> {
    require_user(&ctx.session())?;

    let prompt = prompt.trim();
    if prompt.is_empty() {
        anyhow::bail!("Prompt cannot be empty.");
    }

    let reply = match ctx.generator() {
        Ok(generator) => {
            let progress = spinner("Thinking...");
            let reply = chat_or_apologise(&generator, prompt).await;
            progress.finish_and_clear();
            reply
        }
        Err(e) => {
            warn!(error = %e, "AI chat unavailable");
            CHAT_FALLBACK.to_string()
        }
    };

    println!("{} {}", style("QuantumAI:").magenta().bold(), reply);
    Ok(())
}
