//! Token / zone verification subcommand

use anyhow::{bail, Result};
use colored::Colorize;
use zonebatch_provider::ZoneApi;

/// Check that the token is valid and active; with a zone id, also check the
/// zone is visible to it.
pub async fn run(api: &dyn ZoneApi, zone: Option<&str>) -> Result<()> {
    if api.verify_token().await? {
        println!("{} token is valid and active", "✓".green());
    } else {
        bail!("token is invalid or inactive");
    }

    if let Some(zone_id) = zone {
        let zone = api.get_zone(zone_id).await?;
        println!("{} zone {} ({}): {}", "✓".green(), zone.name, zone.id, zone.status);
    }

    Ok(())
}
