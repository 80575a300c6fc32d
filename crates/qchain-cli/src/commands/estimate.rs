//! Estimate command implementation.

use anyhow::Result;
use console::style;

use qchain_core::estimate::PLACEHOLDER;
use qchain_core::{ProviderProfile, estimate};

use super::common::InputArgs;

/// Execute the estimate command.
pub fn execute(job_type: &str, input: &InputArgs, priority: Option<f64>) -> Result<()> {
    let text = input.read()?;

    if job_type.trim().is_empty() || text.is_empty() {
        println!(
            "{} Estimated time: {}",
            style("→").cyan().bold(),
            style(PLACEHOLDER).yellow()
        );
        println!(
            "  {}",
            style("Pick a provider and enter a description for a real estimate.").dim()
        );
        return Ok(());
    }

    if !ProviderProfile::is_known(job_type) {
        println!(
            "{} Unknown provider '{}', using the default profile",
            style("!").yellow().bold(),
            job_type
        );
    }

    let est = estimate(job_type, text.chars().count(), priority);
    println!(
        "{} Estimated time: {}",
        style("→").cyan().bold(),
        style(est.time_display()).yellow()
    );
    println!("  Estimated cost: {}", style(est.cost_display()).yellow());
    println!("  Profile:        {}", est.profile);
    if (est.priority - 1.0).abs() > f64::EPSILON {
        println!("  Priority:       x{}", est.priority);
    }

    Ok(())
}
