//! Shared fixtures: offline engines and on-disk Parquet files generated
//! through DuckDB itself.

use std::path::{Path, PathBuf};

use parqlab::engine::{EngineConfig, EngineProvisioner};

/// Provisioner that skips the httpfs install so tests run without network.
pub fn offline_provisioner() -> EngineProvisioner {
    EngineProvisioner::new(EngineConfig {
        httpfs_enable: false,
        init_sql: None,
    })
}

/// Write a Parquet file with `rows` rows and three columns (step, reward,
/// label) under `dir`, returning its path.
pub fn write_episode_fixture(dir: &Path, name: &str, rows: u64) -> PathBuf {
    let path = dir.join(name);
    let provisioner = offline_provisioner();
    let engine = provisioner.get_engine().expect("fixture engine bootstrap");
    let conn = engine.connect().expect("fixture connection");
    let sql = format!(
        "COPY (SELECT range AS step, range * 2 AS reward, concat('frame_', range) AS label \
         FROM range({rows})) TO '{}' (FORMAT PARQUET)",
        path.display()
    );
    conn.execute_batch(&sql).expect("fixture copy");
    conn.close().expect("fixture close");
    path
}
