/// Console configuration
use crate::error::{ConsoleError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use vex_core::{LocalOnlyResolver, PublicUrlResolver, SourceResolver};
use vex_playback::SessionConfig;
use vex_storage_client::{StorageClient, StorageConfig};

/// Config file picked up from the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "vex.toml";

/// Environment prefix; nested keys use `__`, e.g. `VEX__STORAGE__URL`
pub const ENV_PREFIX: &str = "VEX";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ConsoleConfig {
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub playback: SessionConfig,

    #[serde(default)]
    pub upload: UploadSettings,

    #[serde(default)]
    pub simulation: SimulationSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UploadSettings {
    #[serde(default = "default_music_dir")]
    pub music_dir: PathBuf,

    #[serde(default = "default_upload_delay_ms")]
    pub delay_ms: u64,
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            music_dir: default_music_dir(),
            delay_ms: default_upload_delay_ms(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SimulationSettings {
    #[serde(default = "default_steps")]
    pub steps: usize,

    #[serde(default = "default_fault_rate")]
    pub fault_rate: f64,

    /// Fixed seed for reproducible runs
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            steps: default_steps(),
            fault_rate: default_fault_rate(),
            seed: None,
        }
    }
}

impl ConsoleConfig {
    /// Load configuration from file and the process environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_from(path, std::env::vars().collect())
    }

    /// Load configuration from file and the given environment variables
    ///
    /// Precedence, lowest first: the site's Supabase variables
    /// (`NEXT_PUBLIC_SUPABASE_URL`, `SUPABASE_SERVICE_ROLE_KEY`), the config
    /// file, then `VEX__*` variables.
    pub fn load_from(path: Option<&Path>, vars: HashMap<String, String>) -> Result<Self> {
        let mut settings = config::Config::builder();

        if let Some(url) = vars.get("NEXT_PUBLIC_SUPABASE_URL") {
            settings = settings.set_default("storage.url", url.as_str())?;
        }
        if let Some(key) = vars
            .get("SUPABASE_SERVICE_ROLE_KEY")
            .or_else(|| vars.get("NEXT_PUBLIC_SUPABASE_ANON_KEY"))
        {
            settings = settings.set_default("storage.api_key", key.as_str())?;
        }

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path.to_path_buf()).required(true));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        settings = settings.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true)
                .source(Some(vars)),
        );

        let config: Self = settings.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.playback.validate()?;

        if !(0.0..=1.0).contains(&self.simulation.fault_rate) {
            return Err(ConsoleError::Config(format!(
                "simulation.fault_rate must be between 0 and 1, got {}",
                self.simulation.fault_rate
            )));
        }

        Ok(())
    }

    /// Whether a storage project is configured
    pub fn has_storage(&self) -> bool {
        !self.storage.url.trim().is_empty()
    }

    /// Client for the configured storage project
    pub fn storage_client(&self) -> Result<StorageClient> {
        if !self.has_storage() {
            return Err(ConsoleError::Config(
                "storage URL is required (set VEX__STORAGE__URL or NEXT_PUBLIC_SUPABASE_URL)"
                    .to_string(),
            ));
        }
        Ok(StorageClient::new(self.storage.clone())?)
    }

    /// Resolver for track URLs; local-only without a storage project
    pub fn resolver(&self) -> Box<dyn SourceResolver> {
        if self.has_storage() {
            Box::new(PublicUrlResolver::new(
                self.storage.url.clone(),
                self.storage.bucket.clone(),
            ))
        } else {
            Box::new(LocalOnlyResolver)
        }
    }
}

// Default values
fn default_music_dir() -> PathBuf {
    PathBuf::from("public/music")
}

fn default_upload_delay_ms() -> u64 {
    100
}

fn default_steps() -> usize {
    200
}

fn default_fault_rate() -> f64 {
    0.05
}
