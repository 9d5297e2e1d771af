//! Profile management subcommands

use anyhow::{bail, Result};
use colored::Colorize;

use crate::profile::{Profile, ProfileStore};
use crate::ProfileCommands;

pub async fn run(store: &ProfileStore, command: ProfileCommands) -> Result<()> {
    match command {
        ProfileCommands::Add {
            name,
            token,
            account,
        } => add(store, name, token, account).await,
        ProfileCommands::List => list(store).await,
        ProfileCommands::Remove { name } => remove(store, &name).await,
        ProfileCommands::Use { name } => set_current(store, &name).await,
    }
}

async fn add(
    store: &ProfileStore,
    name: String,
    token: String,
    account: Option<String>,
) -> Result<()> {
    if token.trim().is_empty() {
        bail!("the API token must not be empty");
    }

    let mut file = store.load().await?;
    if file.profiles.iter().any(|p| p.name == name) {
        bail!("profile '{name}' already exists (remove it first)");
    }

    file.profiles.push(Profile {
        name: name.clone(),
        api_token: token,
        account_id: account,
    });
    // the first profile becomes current automatically
    if file.current.is_none() {
        file.current = Some(name.clone());
    }
    store.save(&file).await?;

    println!("{} profile '{name}' stored", "✓".green());
    Ok(())
}

async fn list(store: &ProfileStore) -> Result<()> {
    let file = store.load().await?;
    if file.profiles.is_empty() {
        println!("no profiles stored (use `zonebatch profile add`)");
        return Ok(());
    }

    for profile in &file.profiles {
        let marker = if file.current.as_deref() == Some(profile.name.as_str()) {
            "*"
        } else {
            " "
        };
        let account = profile.account_id.as_deref().unwrap_or("-");
        println!("{marker} {:<20} account: {account}", profile.name);
    }
    Ok(())
}

async fn remove(store: &ProfileStore, name: &str) -> Result<()> {
    let mut file = store.load().await?;
    let before = file.profiles.len();
    file.profiles.retain(|p| p.name != name);
    if file.profiles.len() == before {
        bail!("profile '{name}' not found");
    }
    if file.current.as_deref() == Some(name) {
        file.current = None;
    }
    store.save(&file).await?;

    println!("{} profile '{name}' removed", "✓".green());
    Ok(())
}

async fn set_current(store: &ProfileStore, name: &str) -> Result<()> {
    let mut file = store.load().await?;
    if !file.profiles.iter().any(|p| p.name == name) {
        bail!("profile '{name}' not found");
    }
    file.current = Some(name.to_string());
    store.save(&file).await?;

    println!("{} now using profile '{name}'", "✓".green());
    Ok(())
}
