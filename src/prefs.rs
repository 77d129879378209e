// Preferences storage.
// One JSON file in the platform config dir holding the GitHub account,
// plus entries owned by other dashboard features (the launcher grid).

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::cache::paths;
use crate::error::Result;

/// GitHub account credentials. Opaque to the core beyond needing both
/// fields non-empty to perform fetches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub token: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            token: token.into(),
        }
    }

    /// Both fields present; an incomplete credential makes every fetch
    /// a no-op.
    pub fn is_complete(&self) -> bool {
        !self.username.is_empty() && !self.token.is_empty()
    }
}

/// Entry in the custom app launcher grid. Owned by the launcher feature,
/// stored alongside the credentials in the same preferences file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LauncherItem {
    pub name: String,
    pub image_identifier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_string: Option<String>,
}

/// The preferences file contents.
///
/// `extra` round-trips keys this crate does not know about; the file is
/// a shared substrate, not owned by the data core.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub token: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub launcher_items: Vec<LauncherItem>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Preferences {
    pub fn credentials(&self) -> Credentials {
        Credentials {
            username: self.username.clone(),
            token: self.token.clone(),
        }
    }
}

/// Synchronous access to the stored credentials. The coordinator reads
/// through this at the start of every refresh and never caches the
/// result beyond that call.
pub trait CredentialStore: Send + Sync {
    fn credentials(&self) -> Credentials;
}

/// Preferences persisted as a JSON file.
pub struct PreferencesStore {
    path: PathBuf,
}

impl PreferencesStore {
    /// Open the store at the platform config location.
    pub fn open_default() -> Option<Self> {
        paths::config_dir().map(|dir| Self::at(dir.join("preferences.json")))
    }

    /// Open the store at an explicit file path.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Load preferences; a missing file yields defaults.
    pub fn load(&self) -> Result<Preferences> {
        if !self.path.exists() {
            return Ok(Preferences::default());
        }

        let contents = fs::read_to_string(&self.path)?;
        let prefs: Preferences = serde_json::from_str(&contents)?;
        Ok(prefs)
    }

    /// Persist preferences, keeping any keys owned by other features.
    pub fn save(&self, prefs: &Preferences) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(prefs)?;

        // Write atomically via temp file
        let temp_path = self.path.with_extension("tmp");
        let mut file = fs::File::create(&temp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;
        fs::rename(&temp_path, &self.path)?;

        Ok(())
    }

    /// Update just the account fields, preserving everything else.
    pub fn set_credentials(&self, credentials: &Credentials) -> Result<()> {
        let mut prefs = self.load()?;
        prefs.username = credentials.username.clone();
        prefs.token = credentials.token.clone();
        self.save(&prefs)
    }
}

impl CredentialStore for PreferencesStore {
    fn credentials(&self) -> Credentials {
        self.load().map(|p| p.credentials()).unwrap_or_default()
    }
}
