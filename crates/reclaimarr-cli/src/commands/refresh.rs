use super::Context;
use crate::output::Output;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use serde_json::json;

pub async fn run_refresh(ctx: &Context, output: &Output) -> Result<()> {
    let config = ctx.load_config()?;
    config
        .validate_trakt_oauth()
        .map_err(|e| eyre!("Trakt is not configured: {}", e))?;

    let manager = ctx.token_manager(&config);
    let tokens = manager
        .refresh()
        .await
        .map_err(|e| eyre!("Token refresh failed: {}", e))?;

    match tokens.expires_at {
        Some(at) => output.success(format!("Trakt access token refreshed, valid until {}", at.format("%Y-%m-%d %H:%M UTC"))),
        None => output.success("Trakt access token refreshed"),
    }
    output.json(&json!({ "type": "refresh", "expires_at": tokens.expires_at }));
    Ok(())
}
