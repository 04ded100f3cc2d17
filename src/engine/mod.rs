//! Analytical engine module.
//!
//! This module provides:
//! - `EngineProvisioner`: memoizing, once-only engine bootstrap
//! - `DatasetEngine`: the process-wide DuckDB instance plus its virtual file
//!   registry
//! - `DuckDbConnection`: wrapper around duckdb::Connection with execution
//!   methods and explicit close
//! - `QueryResult`: arrow-level query execution results

pub mod connection;
pub mod provisioner;

pub use connection::{DuckDbConnection, QueryResult};
pub use provisioner::{DatasetEngine, EngineConfig, EngineProvisioner};
