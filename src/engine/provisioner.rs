//! Engine provisioning: one DuckDB instance per process, bootstrapped lazily.
//!
//! The provisioner memoizes the engine behind a mutex so concurrent callers
//! serialize on a single bootstrap attempt and all observe the same instance.
//! A failed bootstrap leaves the cache empty, so a later call may retry.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use duckdb::{Config, Connection};
use tracing::{debug, info, instrument};

use crate::engine::connection::DuckDbConnection;
use crate::error::WorkbenchError;

/// Bootstrap options for the engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Install and load the httpfs extension so read_parquet can range-fetch
    /// over HTTP(S). Disable for purely local use.
    pub httpfs_enable: bool,
    /// Extra SQL executed once at bootstrap (extensions, settings, ...).
    pub init_sql: Option<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            httpfs_enable: true,
            init_sql: None,
        }
    }
}

impl EngineConfig {
    fn bootstrap_sql(&self) -> String {
        let mut statements = Vec::new();
        if self.httpfs_enable {
            statements.push("INSTALL httpfs; LOAD httpfs;".to_string());
        }
        if let Some(sql) = self.init_sql.as_ref() {
            let trimmed = sql.trim();
            if !trimmed.is_empty() {
                statements.push(trimmed.to_string());
            }
        }
        statements.join("\n")
    }
}

/// The process-wide analytical runtime: an in-memory DuckDB database plus the
/// registry mapping virtual file names to remote URLs.
#[derive(Debug)]
pub struct DatasetEngine {
    // Root connection keeps the in-memory database alive; sessions clone it.
    root: Mutex<Connection>,
    registry: RwLock<HashMap<String, String>>,
}

impl DatasetEngine {
    #[instrument(skip(config))]
    fn bootstrap(config: &EngineConfig) -> Result<Self, WorkbenchError> {
        let flags = Config::default()
            .enable_autoload_extension(true)
            .map_err(WorkbenchError::EngineInit)?
            .allow_unsigned_extensions()
            .map_err(WorkbenchError::EngineInit)?;

        let conn =
            Connection::open_in_memory_with_flags(flags).map_err(WorkbenchError::EngineInit)?;

        let init_sql = config.bootstrap_sql();
        if !init_sql.is_empty() {
            info!(%init_sql, "bootstrapping engine");
            conn.execute_batch(&init_sql)
                .map_err(WorkbenchError::EngineInit)?;
        }

        Ok(Self {
            root: Mutex::new(conn),
            registry: RwLock::new(HashMap::new()),
        })
    }

    /// Open a new connection over the same catalog. Connections are not
    /// shared; each load creates its own.
    pub fn connect(&self) -> Result<DuckDbConnection, WorkbenchError> {
        let root = self.root.lock().expect("engine root mutex poisoned");
        let conn = root.try_clone()?;
        debug!("opened connection");
        Ok(DuckDbConnection::new(conn))
    }

    /// Map a registration key to a URL so the remote resource is readable as
    /// a virtual file. Re-registering under the same key silently supersedes
    /// the prior mapping.
    pub fn register_file_url(&self, key: impl Into<String>, url: impl Into<String>) {
        let key = key.into();
        let url = url.into();
        debug!(%key, %url, "registered file url");
        self.registry
            .write()
            .expect("registry lock poisoned")
            .insert(key, url);
    }

    /// Resolve a registration key back to its URL.
    pub fn resolve_file_url(&self, key: &str) -> Option<String> {
        self.registry
            .read()
            .expect("registry lock poisoned")
            .get(key)
            .cloned()
    }
}

/// Memoizing provisioner: at most one engine per process.
pub struct EngineProvisioner {
    config: EngineConfig,
    cell: Mutex<Option<Arc<DatasetEngine>>>,
}

impl EngineProvisioner {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            cell: Mutex::new(None),
        }
    }

    /// Return the process-wide engine, bootstrapping it on first call.
    ///
    /// The cell mutex is held across bootstrap, so concurrent first calls
    /// never run duplicate initialization; waiters observe either the cached
    /// instance or retry after a failure left the cache empty.
    #[instrument(skip(self))]
    pub fn get_engine(&self) -> Result<Arc<DatasetEngine>, WorkbenchError> {
        let mut cell = self.cell.lock().expect("provisioner mutex poisoned");
        if let Some(engine) = cell.as_ref() {
            return Ok(Arc::clone(engine));
        }

        let engine = Arc::new(DatasetEngine::bootstrap(&self.config)?);
        *cell = Some(Arc::clone(&engine));
        info!("engine provisioned");
        Ok(engine)
    }

    /// Whether a bootstrap has succeeded yet.
    pub fn initialized(&self) -> bool {
        self.cell
            .lock()
            .expect("provisioner mutex poisoned")
            .is_some()
    }
}

impl Default for EngineProvisioner {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offline() -> EngineConfig {
        EngineConfig {
            httpfs_enable: false,
            init_sql: None,
        }
    }

    #[test]
    fn registration_is_last_write_wins() {
        let provisioner = EngineProvisioner::new(offline());
        let engine = provisioner.get_engine().expect("bootstrap");

        engine.register_file_url("episode.parquet", "https://a.example/one.parquet");
        engine.register_file_url("episode.parquet", "https://b.example/two.parquet");

        assert_eq!(
            engine.resolve_file_url("episode.parquet").as_deref(),
            Some("https://b.example/two.parquet")
        );
        assert_eq!(engine.resolve_file_url("other.parquet"), None);
    }

    #[test]
    fn bootstrap_sql_composes_extensions_and_init() {
        let config = EngineConfig {
            httpfs_enable: true,
            init_sql: Some("  SET memory_limit = '1GB';  ".to_string()),
        };
        assert_eq!(
            config.bootstrap_sql(),
            "INSTALL httpfs; LOAD httpfs;\nSET memory_limit = '1GB';"
        );
        assert_eq!(offline().bootstrap_sql(), "");
    }
}
