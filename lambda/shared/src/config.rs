use aws_config::{BehaviorVersion, Region, SdkConfig};

use crate::ConfigError;

pub const REGION_VAR: &str = "REGION";
pub const PLAYER_TABLE_VAR: &str = "PLAYER_TABLE_NAME";
pub const AVATAR_BUCKET_VAR: &str = "PLAYER_AVATAR_BUCKET";

/// Deployment settings, read once at cold start and handed to the handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub region: Option<String>,
    pub player_table: String,
    pub avatar_bucket: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable lookup. Empty values are
    /// treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.is_empty());

        let player_table = var(PLAYER_TABLE_VAR).ok_or(ConfigError::Missing(PLAYER_TABLE_VAR))?;

        Ok(Self {
            region: var(REGION_VAR),
            player_table,
            avatar_bucket: var(AVATAR_BUCKET_VAR),
        })
    }

    pub fn require_avatar_bucket(&self) -> Result<&str, ConfigError> {
        self.avatar_bucket
            .as_deref()
            .ok_or(ConfigError::Missing(AVATAR_BUCKET_VAR))
    }

    pub async fn load_sdk_config(&self) -> SdkConfig {
        let loader = aws_config::defaults(BehaviorVersion::latest());
        match &self.region {
            Some(region) => loader.region(Region::new(region.clone())).load().await,
            None => loader.load().await,
        }
    }
}
