//! Analyse command implementation.

use anyhow::Result;
use console::style;

use qchain_ai::TextGenerator;
use qchain_core::{AnalysisRequest, AnalysisResult, SubmissionType};

use super::common::{Context, InputArgs, require_user, spinner};

/// Execute the analyse command.
pub async fn execute(ctx: &Context, input: &InputArgs, kind: SubmissionType) -> Result<()> {
    let session = ctx.session();
    require_user(&session)?;

    let text = input.read()?;
    if text.trim().is_empty() {
        anyhow::bail!("Input cannot be empty. Use --text or --input.");
    }

    let generator = ctx.generator()?;
    let request = AnalysisRequest::new(text, kind);

    let progress = spinner(format!("Analysing {kind} with {}...", generator.model()));
    let result = generator.analyse(&request).await;
    progress.finish_and_clear();

    let analysis = result.map_err(|e| anyhow::anyhow!("Analysis failed: {e}"))?;
    print_analysis(&analysis);
    Ok(())
}

/// Print an analysis block.
pub fn print_analysis(analysis: &AnalysisResult) {
    println!("{} {}", style("✓").green().bold(), style(&analysis.title).bold());
    println!("  Complexity:   {}", style(&analysis.complexity).yellow());
    println!("  Analysis:     {}", analysis.analysis_summary);
    println!("  Optimization: {}", analysis.optimization_suggestion);
}
