//! DuckDB connection wrapper with query execution and explicit close.

use std::sync::Mutex;

use arrow_array::RecordBatch;
use arrow_schema::Schema;
use duckdb::Connection;
use tracing::{debug, instrument};

use crate::error::WorkbenchError;

/// Result of a query execution, still in arrow form.
pub struct QueryResult {
    pub schema: Schema,
    pub batches: Vec<RecordBatch>,
    pub total_rows: usize,
    pub total_bytes: usize,
}

/// Wrapper around duckdb::Connection with execution methods.
///
/// The Connection is wrapped in a Mutex because duckdb::Connection contains
/// RefCell internally and is not Sync. The Option tracks explicit close:
/// using a closed wrapper yields `ConnectionClosed`.
#[derive(Debug)]
pub struct DuckDbConnection {
    conn: Mutex<Option<Connection>>,
}

impl DuckDbConnection {
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(Some(conn)),
        }
    }

    /// Execute a query and collect its results. SQL is passed through
    /// verbatim; whatever the statement produces is returned.
    #[instrument(skip(self), fields(sql = %sql))]
    pub fn execute_query(&self, sql: &str) -> Result<QueryResult, WorkbenchError> {
        let guard = self.conn.lock().expect("connection mutex poisoned");
        let conn = guard.as_ref().ok_or(WorkbenchError::ConnectionClosed)?;

        let mut stmt = conn.prepare(sql)?;
        let arrow = stmt.query_arrow([])?;
        let schema = arrow.get_schema();

        let mut total_rows = 0usize;
        let mut total_bytes = 0usize;
        let batches: Vec<RecordBatch> = arrow
            .inspect(|batch| {
                total_rows += batch.num_rows();
                total_bytes += batch.get_array_memory_size();
            })
            .collect();

        debug!(
            batch_count = batches.len(),
            total_rows, total_bytes, "executed query"
        );
        Ok(QueryResult {
            schema: schema.as_ref().clone(),
            batches,
            total_rows,
            total_bytes,
        })
    }

    /// Execute a batch of statements (DDL/DML) without returning results.
    #[instrument(skip(self), fields(sql = %sql))]
    pub fn execute_batch(&self, sql: &str) -> Result<(), WorkbenchError> {
        let guard = self.conn.lock().expect("connection mutex poisoned");
        let conn = guard.as_ref().ok_or(WorkbenchError::ConnectionClosed)?;
        conn.execute_batch(sql)?;
        debug!("executed batch");
        Ok(())
    }

    /// Release the underlying connection. Closing an already-closed wrapper
    /// is a caller error and surfaces as `ConnectionClosed`.
    #[instrument(skip(self))]
    pub fn close(&self) -> Result<(), WorkbenchError> {
        let mut guard = self.conn.lock().expect("connection mutex poisoned");
        let conn = guard.take().ok_or(WorkbenchError::ConnectionClosed)?;
        conn.close().map_err(|(_, err)| WorkbenchError::from(err))?;
        debug!("closed connection");
        Ok(())
    }

    pub fn is_open(&self) -> bool {
        self.conn
            .lock()
            .expect("connection mutex poisoned")
            .is_some()
    }
}
