use super::{prompts, Context};
use crate::output::Output;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use owo_colors::OwoColorize;
use serde_json::json;

pub async fn run_auth(ctx: &Context, code: Option<String>, output: &Output) -> Result<()> {
    let config = ctx.load_config()?;
    config
        .validate_trakt_oauth()
        .map_err(|e| eyre!("Trakt is not configured: {}", e))?;

    ctx.paths
        .ensure_directories()
        .map_err(|e| eyre!("Failed to create configuration directories: {}", e))?;

    let manager = ctx.token_manager(&config);
    let url = manager.authorization_url();

    let code = match code {
        Some(code) => code,
        None => {
            output.println("");
            output.println(format!("{}", "Trakt Authorization".bold().bright_cyan()));
            output.println("  1. Open this URL in your browser and approve reclaimarr:");
            output.println(format!("     {}", url.bright_blue()));
            output.println("  2. Paste the code Trakt shows you below");
            output.println("");
            prompts::prompt_code("Authorization code")?
        }
    };

    let tokens = manager
        .issue(code.trim())
        .await
        .map_err(|e| eyre!("Trakt authorization failed: {}", e))?;

    output.success(format!(
        "Trakt tokens saved to {}",
        ctx.paths.credentials_file().display()
    ));
    output.json(&json!({
        "type": "auth",
        "expires_at": tokens.expires_at,
    }));
    Ok(())
}
