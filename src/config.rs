use anyhow::Context;
use serde::Deserialize;

use crate::engine::EngineConfig;
use crate::route::parse_episode_indices;

#[derive(Debug, Clone, Deserialize)]
pub struct WorkbenchConfig {
    /// Default table name for loads that do not name one.
    pub table_name: String,
    /// Whether to install/load the httpfs extension at engine bootstrap.
    pub httpfs_enable: bool,
    /// Optional SQL executed once during engine bootstrap.
    pub init_sql: Option<String>,
    /// Whitespace-separated episode indices for the dataset landing redirect.
    pub episodes: Option<String>,
    /// Log output format: "compact" or "json".
    pub log_format: String,
}

impl WorkbenchConfig {
    /// Load configuration from the environment (prefix `PARQLAB_`).
    pub fn load() -> anyhow::Result<Self> {
        let settings = config::Config::builder()
            .set_default("table_name", "dataset")?
            .set_default("httpfs_enable", true)?
            .set_default("log_format", "compact")?
            .add_source(config::Environment::with_prefix("PARQLAB").try_parsing(true))
            .build()
            .context("failed to load configuration")?;
        let cfg: WorkbenchConfig = settings
            .try_deserialize()
            .context("failed to deserialize configuration")?;
        Ok(cfg)
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            httpfs_enable: self.httpfs_enable,
            init_sql: self.init_sql.clone(),
        }
    }

    /// Episode indices for the landing redirect; `[0]` when unset or when
    /// nothing in the configured value parses.
    pub fn episode_indices(&self) -> Vec<u32> {
        self.episodes
            .as_deref()
            .map(parse_episode_indices)
            .filter(|indices| !indices.is_empty())
            .unwrap_or_else(|| vec![0])
    }
}
