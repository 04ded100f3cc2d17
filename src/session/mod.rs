//! Dataset session management.
//!
//! This module provides:
//! - `load_remote_table`: validating entry point that provisions the engine
//!   and opens a session
//! - `DatasetSession`: one connection plus the table state it materialized
//! - `SessionId`: unique identifier for sessions

pub mod id;
pub mod session;

pub use id::SessionId;
pub use session::DatasetSession;

use crate::engine::EngineProvisioner;
use crate::error::WorkbenchError;

/// Load the resource at `url` into `table_name`, provisioning the engine on
/// first use.
///
/// An empty URL fails with a validation error before the engine is touched:
/// no bootstrap happens and no connection is opened.
pub fn load_remote_table(
    provisioner: &EngineProvisioner,
    url: &str,
    table_name: &str,
) -> Result<DatasetSession, WorkbenchError> {
    if url.trim().is_empty() {
        return Err(WorkbenchError::Validation("URL is required".to_string()));
    }
    let engine = provisioner.get_engine()?;
    DatasetSession::open(&engine, url, table_name)
}
