//! Zone listing subcommand

use anyhow::Result;
use zonebatch_provider::ZoneApi;

const ZONES_PAGE_SIZE: u32 = 50;

/// List every zone the token can see.
pub async fn list(api: &dyn ZoneApi) -> Result<()> {
    let mut page = 1u32;
    let mut total = 0usize;

    loop {
        let zones = api.list_zones(page, ZONES_PAGE_SIZE).await?;
        for zone in &zones {
            println!("{:<34} {:<26} {}", zone.id, zone.name, zone.status);
        }
        total += zones.len();
        if zones.len() < ZONES_PAGE_SIZE as usize {
            break;
        }
        page += 1;
    }

    println!("{total} zone(s)");
    Ok(())
}
