//! parqlab: an in-process workbench for pointing DuckDB at a remote Parquet
//! file, materializing it as a named in-memory table, and querying it.

pub mod config;
pub mod engine;
pub mod error;
pub mod route;
pub mod session;
pub mod types;
pub mod workbench;

pub use config::WorkbenchConfig;
pub use engine::{DatasetEngine, EngineConfig, EngineProvisioner};
pub use error::WorkbenchError;
pub use session::{load_remote_table, DatasetSession, SessionId};
pub use types::{ResultSet, Row};
pub use workbench::Workbench;
