use anyhow::Result;
use chrono::Utc;
use owo_colors::OwoColorize;

use super::Engine;

pub async fn renew(engine: &Engine) -> Result<()> {
    let summary = engine.renew_all(Utc::now()).await?;

    println!(
        "Renewed {} series: {} occurrence(s) created",
        summary.templates_processed, summary.occurrences_created
    );
    if summary.templates_skipped > 0 {
        println!(
            "{} {} template(s) skipped (incomplete recurrence)",
            "!".yellow(),
            summary.templates_skipped
        );
    }
    for (template_id, error) in &summary.errors {
        eprintln!("{} {}: {}", "!".red(), template_id, error);
    }
    if summary.write_failures > 0 {
        eprintln!("{} {} occurrence(s) could not be written", "!".red(), summary.write_failures);
    }
    Ok(())
}
