use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorkbenchError {
    /// Required input was missing or empty. Raised before any engine resource
    /// is acquired.
    #[error("{0}")]
    Validation(String),
    /// Engine bootstrap failed. The provisioner cache is left empty so a
    /// later call may retry.
    #[error("failed to initialize engine: {0}")]
    EngineInit(#[source] duckdb::Error),
    /// Registration, materialization, or counting failed during a load. The
    /// connection opened for the attempt has already been closed.
    #[error("failed to load parquet file: {stage}: {source}")]
    Load {
        stage: &'static str,
        #[source]
        source: Box<WorkbenchError>,
    },
    /// Query execution failed on an otherwise healthy connection. The session
    /// remains usable for a corrected retry.
    #[error("query failed: {0}")]
    Query(#[source] Box<WorkbenchError>),
    #[error("connection already closed")]
    ConnectionClosed,
    #[error("duckdb error: {0}")]
    DuckDb(#[from] duckdb::Error),
    #[error("arrow error: {0}")]
    Arrow(#[from] arrow_schema::ArrowError),
    #[error("unsupported data type: {0}")]
    UnsupportedType(String),
}

impl WorkbenchError {
    pub fn load(stage: &'static str, source: WorkbenchError) -> Self {
        Self::Load {
            stage,
            source: Box::new(source),
        }
    }

    pub fn query(source: WorkbenchError) -> Self {
        Self::Query(Box::new(source))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_error_names_the_failed_stage() {
        let err = WorkbenchError::load(
            "create table",
            WorkbenchError::Validation("boom".to_string()),
        );
        assert_eq!(
            err.to_string(),
            "failed to load parquet file: create table: boom"
        );
    }

    #[test]
    fn query_error_wraps_the_cause() {
        let err = WorkbenchError::query(WorkbenchError::ConnectionClosed);
        assert_eq!(err.to_string(), "query failed: connection already closed");
    }
}
