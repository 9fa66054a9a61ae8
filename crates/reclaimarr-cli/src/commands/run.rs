use super::Context;
use crate::output::{Output, OutputFormat};
use color_eyre::Result;
use comfy_table::{Cell, Table};
use media_cleanup_core::CleanupResult;

pub async fn run_cleanup(ctx: &Context, dry_run: bool, output: &Output) -> Result<()> {
    let config = ctx.load_config()?;
    let orchestrator = ctx.build_orchestrator(&config, dry_run)?;

    let result = orchestrator.run().await;
    print_summary(&result, output);
    Ok(())
}

pub(crate) fn print_summary(result: &CleanupResult, output: &Output) {
    if output.format() != OutputFormat::Human {
        output.json(&serde_json::json!({ "type": "cleanup", "result": result }));
        return;
    }
    if !output.is_quiet() {
        print_table(result, output);
    }
    if result.failed_items > 0 {
        output.error(format!("{} item(s) failed, see the log for details", result.failed_items));
    }
}

fn print_table(result: &CleanupResult, output: &Output) {
    let mut table = Table::new();
    table.set_header(vec![
        Cell::new(if result.dry_run { "Cleanup (dry run)" } else { "Cleanup" })
            .fg(comfy_table::Color::Cyan)
            .add_attribute(comfy_table::Attribute::Bold),
        Cell::new(""),
    ]);
    table.add_row(vec![Cell::new("Watched titles"), Cell::new(result.watched_total)]);
    table.add_row(vec![Cell::new("In window"), Cell::new(result.in_window)]);
    table.add_row(vec![Cell::new("Tagged temporary"), Cell::new(result.temporary)]);
    if result.dry_run {
        table.add_row(vec![Cell::new("Would delete"), Cell::new(result.simulated)]);
    } else {
        table.add_row(vec![Cell::new("Deleted"), Cell::new(result.deleted)]);
    }
    table.add_row(vec![Cell::new("Failed items"), Cell::new(result.failed_items)]);
    table.add_row(vec![
        Cell::new("Duration"),
        Cell::new(format!("{:.1}s", result.duration.as_secs_f64())),
    ]);
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    output.println(table.to_string());
}
