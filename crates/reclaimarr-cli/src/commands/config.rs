use super::{prompts, Context};
use crate::output::{Output, OutputFormat};
use color_eyre::eyre::eyre;
use color_eyre::Result;
use comfy_table::{Cell, Table};
use media_cleanup_config::{LibraryServiceConfig, CONFIG_TEMPLATE};
use owo_colors::OwoColorize;
use serde_json::json;

pub fn show_config(ctx: &Context, full: bool, output: &Output) -> Result<()> {
    let config = ctx.load_config()?;
    let secret = |s: &str| if full { s.to_string() } else { mask_string(s) };

    if output.format() != OutputFormat::Human {
        output.json(&json!({
            "config_file": ctx.config_path.display().to_string(),
            "config_file_exists": ctx.config_path.exists(),
            "trakt": {
                "client_id": secret(&config.trakt.client_id),
                "client_secret": secret(&config.trakt.client_secret),
                "redirect_uri": config.trakt.redirect_uri,
            },
            "sonarr": library_json(&config.sonarr, full),
            "radarr": library_json(&config.radarr, full),
            "cleanup": config.cleanup,
            "scheduler": config.scheduler,
            "valid": config.validate().is_ok(),
        }));
        return Ok(());
    }
    if output.is_quiet() {
        return Ok(());
    }

    let mut info_table = Table::new();
    info_table.set_header(vec![
        Cell::new("Config File").add_attribute(comfy_table::Attribute::Bold),
        Cell::new(ctx.config_path.display().to_string()),
    ]);
    if !ctx.config_path.exists() {
        info_table.add_row(vec![Cell::new(""), Cell::new("not found, using defaults and environment".bright_black().to_string())]);
    }
    print_table(info_table);

    let mut trakt = section("Trakt");
    trakt.add_row(vec![Cell::new("Client ID"), Cell::new(secret(&config.trakt.client_id))]);
    trakt.add_row(vec![Cell::new("Client Secret"), Cell::new(secret(&config.trakt.client_secret))]);
    trakt.add_row(vec![Cell::new("Redirect URI"), Cell::new(&config.trakt.redirect_uri)]);
    print_table(trakt);

    print_table(library_table("Sonarr", &config.sonarr, full));
    print_table(library_table("Radarr", &config.radarr, full));

    let mut cleanup = section("Cleanup");
    cleanup.add_row(vec![
        Cell::new("Watched Days Threshold"),
        Cell::new(config.cleanup.watched_days_threshold),
    ]);
    cleanup.add_row(vec![
        Cell::new("Max Days Threshold"),
        Cell::new(config.cleanup.max_days_threshold),
    ]);
    cleanup.add_row(vec![Cell::new("Dry Run"), Cell::new(check_mark(config.cleanup.dry_run))]);
    print_table(cleanup);

    let mut scheduler = section("Scheduler");
    scheduler.add_row(vec![Cell::new("Cleanup Schedule"), Cell::new(&config.scheduler.cleanup_schedule)]);
    scheduler.add_row(vec![
        Cell::new("Token Refresh Schedule"),
        Cell::new(&config.scheduler.token_refresh_schedule),
    ]);
    scheduler.add_row(vec![
        Cell::new("Refresh Margin"),
        Cell::new(format!("{}h", config.scheduler.refresh_margin_hours)),
    ]);
    scheduler.add_row(vec![Cell::new("Run On Startup"), Cell::new(check_mark(config.scheduler.run_on_startup))]);
    print_table(scheduler);

    match config.validate() {
        Ok(()) => output.success("Configuration is complete"),
        Err(e) => output.warn(format!("Configuration incomplete: {}", e)),
    }
    Ok(())
}

pub fn init_config(ctx: &Context, force: bool, output: &Output) -> Result<()> {
    let path = &ctx.config_path;
    if path.exists() && !force {
        let overwrite = prompts::prompt_yes_no(
            &format!("{} already exists. Overwrite it?", path.display()),
            false,
        )?;
        if !overwrite {
            output.info("Keeping the existing configuration");
            return Ok(());
        }
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| eyre!("Failed to create {}: {}", parent.display(), e))?;
    }
    std::fs::write(path, CONFIG_TEMPLATE).map_err(|e| eyre!("Failed to write {}: {}", path.display(), e))?;

    output.success(format!("Configuration template written to {}", path.display()));
    output.info("Fill in the Trakt, Sonarr and Radarr settings, then run `reclaimarr auth`");
    Ok(())
}

fn section(title: &str) -> Table {
    let mut table = Table::new();
    table.set_header(vec![Cell::new(format!("{} Configuration", title))
        .fg(comfy_table::Color::Cyan)
        .add_attribute(comfy_table::Attribute::Bold)]);
    table
}

fn library_table(title: &str, service: &LibraryServiceConfig, full: bool) -> Table {
    let mut table = section(title);
    table.add_row(vec![Cell::new("URL"), Cell::new(display_or_unset(&service.url))]);
    let api_key = if full { service.api_key.clone() } else { mask_string(&service.api_key) };
    table.add_row(vec![Cell::new("API Key"), Cell::new(api_key)]);
    table.add_row(vec![
        Cell::new("Temporary Tag"),
        Cell::new(service.temp_tag_id.map(|id| id.to_string()).unwrap_or_else(|| "<not set>".to_string())),
    ]);
    table
}

fn library_json(service: &LibraryServiceConfig, full: bool) -> serde_json::Value {
    json!({
        "url": service.url,
        "api_key": if full { service.api_key.clone() } else { mask_string(&service.api_key) },
        "temp_tag_id": service.temp_tag_id,
    })
}

fn print_table(mut table: Table) {
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    println!("{}", table);
    println!();
}

fn check_mark(value: bool) -> String {
    if value {
        "✓".green().to_string()
    } else {
        "✗".red().to_string()
    }
}

fn display_or_unset(value: &str) -> String {
    if value.trim().is_empty() {
        "<not set>".to_string()
    } else {
        value.to_string()
    }
}

fn mask_string(s: &str) -> String {
    if s.is_empty() {
        return "<not set>".to_string();
    }
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..2].iter().collect();
    let tail: String = chars[chars.len() - 2..].iter().collect();
    format!("{}***{}", head, tail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use media_cleanup_config::{Config, PathManager};
    use tempfile::tempdir;

    #[test]
    fn test_mask_string() {
        assert_eq!(mask_string(""), "<not set>");
        assert_eq!(mask_string("abc"), "***");
        assert_eq!(mask_string("abcdef123"), "ab***23");
    }

    #[test]
    fn test_init_writes_parseable_template() {
        let dir = tempdir().unwrap();
        let ctx = Context {
            paths: PathManager::with_base(dir.path().to_path_buf()),
            config_path: dir.path().join("nested").join("config.toml"),
        };
        let output = Output::new(OutputFormat::Json, true);

        init_config(&ctx, true, &output).unwrap();

        let config = Config::load_from_file(&ctx.config_path).unwrap();
        assert_eq!(config.cleanup.watched_days_threshold, 30);
        assert_eq!(config.scheduler.cleanup_schedule, "0 0 0 * * *");
    }
}
