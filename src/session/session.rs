//! Dataset session: one connection plus the table it materialized.
//!
//! A session is created by a successful load, accepts follow-up queries, and
//! is destroyed by an explicit close. Ownership of the connection moves into
//! the session on load and out again on close; the move on close is what
//! guards callers against double-close.

use tracing::{info, instrument, warn};

use crate::engine::{DatasetEngine, DuckDbConnection};
use crate::error::WorkbenchError;
use crate::session::id::SessionId;
use crate::types::{value_as_count, ResultSet};

/// One open connection bound to the engine, with the table state it loaded.
#[derive(Debug)]
pub struct DatasetSession {
    id: SessionId,
    connection: DuckDbConnection,
    table_name: String,
    row_count: u64,
}

impl DatasetSession {
    /// Materialize the resource at `url` into `table_name` over a fresh
    /// connection.
    ///
    /// The URL is registered under `"<table_name>.parquet"` (superseding any
    /// prior registration for that key) and read in full into the table,
    /// replacing prior contents under that name. Loading twice with the same
    /// table name is an intentional re-load, not an append.
    ///
    /// The caller is expected to have validated `url`; see
    /// [`load_remote_table`](crate::session::load_remote_table) for the
    /// validating entry point. On any failure after the connection is opened,
    /// that connection is closed before the error propagates, so no orphaned
    /// connection survives a failed load.
    #[instrument(skip(engine), fields(url = %url, table_name = %table_name))]
    pub fn open(
        engine: &DatasetEngine,
        url: &str,
        table_name: &str,
    ) -> Result<Self, WorkbenchError> {
        let connection = engine
            .connect()
            .map_err(|err| WorkbenchError::load("open connection", err))?;

        match Self::materialize(engine, &connection, url, table_name) {
            Ok(row_count) => {
                let id = SessionId::new();
                info!(session_id = %id, row_count, "loaded table");
                Ok(Self {
                    id,
                    connection,
                    table_name: table_name.to_string(),
                    row_count,
                })
            }
            Err(err) => {
                // Close failures here are reported but do not mask the load error.
                if let Err(close_err) = connection.close() {
                    warn!(error = %close_err, "failed to close connection after load failure");
                }
                Err(err)
            }
        }
    }

    fn materialize(
        engine: &DatasetEngine,
        connection: &DuckDbConnection,
        url: &str,
        table_name: &str,
    ) -> Result<u64, WorkbenchError> {
        let key = format!("{table_name}.parquet");
        engine.register_file_url(&key, url);
        let source = engine.resolve_file_url(&key).ok_or_else(|| {
            WorkbenchError::load(
                "register file",
                WorkbenchError::Validation(format!("no registration for {key}")),
            )
        })?;

        let create_sql = format!(
            "CREATE OR REPLACE TABLE {table_name} AS SELECT * FROM read_parquet('{source}')"
        );
        connection
            .execute_batch(&create_sql)
            .map_err(|err| WorkbenchError::load("create table", err))?;

        let count_sql = format!("SELECT count(*) AS row_count FROM {table_name}");
        let result = connection
            .execute_query(&count_sql)
            .map_err(|err| WorkbenchError::load("count rows", err))?;
        let rows = ResultSet::from_query_result(&result)
            .map_err(|err| WorkbenchError::load("count rows", err))?;

        let row_count = rows
            .rows
            .first()
            .and_then(|row| row.get("row_count"))
            .and_then(value_as_count)
            .unwrap_or(0);
        Ok(row_count)
    }

    /// Execute free-form SQL against this session's connection.
    ///
    /// The SQL is passed through verbatim; further DDL is permitted since
    /// this is a single-user sandbox over an in-memory copy of remote data.
    /// A failure does not tear the connection down; the session remains
    /// usable for a corrected retry.
    #[instrument(skip(self), fields(session_id = %self.id, sql = %sql))]
    pub fn query(&self, sql: &str) -> Result<ResultSet, WorkbenchError> {
        let result = self
            .connection
            .execute_query(sql)
            .map_err(WorkbenchError::query)?;
        ResultSet::from_query_result(&result).map_err(WorkbenchError::query)
    }

    /// Release the connection. Consuming `self` means a closed session cannot
    /// be queried or closed again.
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub fn close(self) -> Result<(), WorkbenchError> {
        self.connection.close()
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// Row count observed at load time. Not updated by later queries.
    pub fn row_count(&self) -> u64 {
        self.row_count
    }
}
