//! Credential profiles
//!
//! Profiles live in a flat JSON file under the user config dir
//! (`~/.config/zonebatch/profiles.json` on Linux). The file holds every
//! profile plus a `current` pointer; `CLOUDFLARE_API_TOKEN` always overrides
//! the stored token.

use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};
use tokio::fs;

/// One stored credential set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    /// Profile name.
    pub name: String,
    /// Cloudflare API token.
    pub api_token: String,
    /// Account id, needed only for worker deploys.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
}

/// On-disk shape of the profile file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfilesFile {
    /// Name of the profile used when `--profile` is not given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current: Option<String>,
    #[serde(default)]
    pub profiles: Vec<Profile>,
}

/// JSON-file-backed profile store.
pub struct ProfileStore {
    path: PathBuf,
}

impl ProfileStore {
    pub fn new() -> Self {
        let dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("zonebatch");
        Self {
            path: dir.join("profiles.json"),
        }
    }

    pub async fn load(&self) -> Result<ProfilesFile> {
        if !self.path.exists() {
            return Ok(ProfilesFile::default());
        }
        let content = fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("cannot read {}", self.path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("malformed profile file {}", self.path.display()))
    }

    pub async fn save(&self, file: &ProfilesFile) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("cannot create {}", parent.display()))?;
        }
        let content = serde_json::to_string_pretty(file)?;
        fs::write(&self.path, content)
            .await
            .with_context(|| format!("cannot write {}", self.path.display()))?;
        Ok(())
    }

    /// Resolve the profile to use: explicit name, else the `current` pointer,
    /// else a single stored profile. The `CLOUDFLARE_API_TOKEN` environment
    /// variable overrides the stored token, and suffices on its own when
    /// nothing is stored.
    pub async fn resolve(&self, name: Option<&str>) -> Result<Profile> {
        let file = self.load().await?;

        let mut profile = match name.or(file.current.as_deref()) {
            Some(wanted) => file
                .profiles
                .iter()
                .find(|p| p.name == wanted)
                .cloned()
                .ok_or_else(|| {
                    anyhow!("profile '{wanted}' not found (try `zonebatch profile add`)")
                })?,
            None => match file.profiles.as_slice() {
                [only] => only.clone(),
                [] => Profile {
                    name: "env".to_string(),
                    api_token: String::new(),
                    account_id: None,
                },
                _ => bail!(
                    "several profiles are stored and none is selected; \
                     use --profile or `zonebatch profile use`"
                ),
            },
        };

        if let Ok(token) = std::env::var("CLOUDFLARE_API_TOKEN") {
            if !token.trim().is_empty() {
                profile.api_token = token;
            }
        }

        if profile.api_token.trim().is_empty() {
            bail!("no API token available: add a profile or set CLOUDFLARE_API_TOKEN");
        }

        Ok(profile)
    }
}

impl Default for ProfileStore {
    fn default() -> Self {
        Self::new()
    }
}
