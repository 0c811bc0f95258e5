use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, sync::RwLock, time::Duration};

pub const API_BASE_ENV: &str = "FUNNELWATCH_API_BASE";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlayerSettings {
    pub api_base_url: String,
    /// `{slug}` is replaced with the campaign slug.
    pub presentation_path: String,
    pub analytics_path: String,
    pub slide_poll_ms: u64,
    pub heartbeat_secs: u64,
    pub request_timeout_secs: u64,
    /// How long the headless player lingers on the last slide when a module
    /// has no duration.
    pub fallback_linger_ms: u64,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:5000".into(),
            presentation_path: "/api/funnels/{slug}/presentation".into(),
            analytics_path: "/api/funnels/analytics".into(),
            slide_poll_ms: 100,
            heartbeat_secs: 30,
            request_timeout_secs: 10,
            fallback_linger_ms: 10_000,
        }
    }
}

impl PlayerSettings {
    pub fn presentation_url(&self, slug: &str) -> String {
        format!(
            "{}{}",
            self.api_base_url.trim_end_matches('/'),
            self.presentation_path.replace("{slug}", slug)
        )
    }

    pub fn analytics_url(&self) -> String {
        format!(
            "{}{}",
            self.api_base_url.trim_end_matches('/'),
            self.analytics_path
        )
    }

    pub fn slide_poll_interval(&self) -> Duration {
        Duration::from_millis(self.slide_poll_ms.max(1))
    }

    pub fn heartbeat_interval(&self) -> Duration {
        Duration::from_secs(self.heartbeat_secs.max(1))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    fn apply_env(&mut self) {
        if let Ok(value) = std::env::var(API_BASE_ENV) {
            if !value.trim().is_empty() {
                self.api_base_url = value.trim().to_string();
            }
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StoredSettings {
    #[serde(default)]
    player: PlayerSettings,
}

pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<StoredSettings>,
}

impl SettingsStore {
    /// Loads settings from `path`, falling back to defaults when the file is
    /// missing or unparsable. The API base environment variable wins over the
    /// file.
    pub fn new(path: PathBuf) -> Result<Self> {
        let mut data: StoredSettings = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_default()
        } else {
            StoredSettings::default()
        };
        data.player.apply_env();

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn default_path() -> PathBuf {
        std::env::var_os("FUNNELWATCH_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("funnelwatch.json"))
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    pub fn player(&self) -> Result<PlayerSettings> {
        let guard = self
            .data
            .read()
            .map_err(|_| anyhow!("settings lock poisoned"))?;
        Ok(guard.player.clone())
    }

    pub fn update_player(&self, settings: PlayerSettings) -> Result<()> {
        let mut guard = self
            .data
            .write()
            .map_err(|_| anyhow!("settings lock poisoned"))?;
        guard.player = settings;
        self.persist(&guard)
    }

    fn persist(&self, data: &StoredSettings) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }
}
