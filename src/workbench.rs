//! Caller-side session state machine and result rendering.
//!
//! Tracks the open session, the last result set, and the last error banner.
//! Load failures leave the prior session intact; query failures keep the
//! session but clear stale results; close clears everything whether or not
//! the underlying close reported an error.

use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::engine::EngineProvisioner;
use crate::session::{load_remote_table, DatasetSession};
use crate::types::{value_to_display, ResultSet};

/// Rows rendered before truncating and reporting the true total.
pub const RENDER_ROW_LIMIT: usize = 100;

pub struct Workbench {
    provisioner: Arc<EngineProvisioner>,
    default_table: String,
    session: Option<DatasetSession>,
    results: Option<ResultSet>,
    last_error: Option<String>,
}

impl Workbench {
    pub fn new(provisioner: Arc<EngineProvisioner>, default_table: impl Into<String>) -> Self {
        Self {
            provisioner,
            default_table: default_table.into(),
            session: None,
            results: None,
            last_error: None,
        }
    }

    /// Load a URL into a table, replacing the current session on success.
    #[instrument(skip(self), fields(url = %url))]
    pub fn load(&mut self, url: &str, table_name: Option<&str>) {
        self.last_error = None;
        let table = table_name.unwrap_or(&self.default_table).to_string();

        match load_remote_table(&self.provisioner, url, &table) {
            Ok(session) => {
                if let Some(previous) = self.session.take() {
                    if let Err(err) = previous.close() {
                        warn!(error = %err, "failed to close superseded session");
                    }
                }
                info!(
                    table_name = session.table_name(),
                    row_count = session.row_count(),
                    "parquet file loaded"
                );
                self.results = None;
                self.session = Some(session);
            }
            Err(err) => {
                // Prior session (if any) stays usable.
                self.last_error = Some(err.to_string());
            }
        }
    }

    /// Run free-form SQL against the open session.
    #[instrument(skip(self), fields(sql = %sql))]
    pub fn query(&mut self, sql: &str) {
        self.last_error = None;
        self.results = None;

        let Some(session) = self.session.as_ref() else {
            self.last_error = Some("no table loaded".to_string());
            return;
        };

        match session.query(sql) {
            Ok(results) => self.results = Some(results),
            Err(err) => self.last_error = Some(err.to_string()),
        }
    }

    /// Close the open session and clear all dependent state. Close failures
    /// are logged; bookkeeping is cleared regardless.
    #[instrument(skip(self))]
    pub fn close(&mut self) {
        if let Some(session) = self.session.take() {
            if let Err(err) = session.close() {
                warn!(error = %err, "failed to close session");
            }
        }
        self.results = None;
        self.last_error = None;
    }

    pub fn is_loaded(&self) -> bool {
        self.session.is_some()
    }

    pub fn table_name(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.table_name())
    }

    pub fn row_count(&self) -> Option<u64> {
        self.session.as_ref().map(|s| s.row_count())
    }

    pub fn results(&self) -> Option<&ResultSet> {
        self.results.as_ref()
    }

    /// The error banner, if the last operation failed.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Format the last results as an aligned text table, truncated to `limit`
    /// rows with the true total reported separately.
    pub fn render_results(&self, limit: usize) -> Option<String> {
        let results = self.results.as_ref()?;
        if results.is_empty() {
            return Some("(no rows)".to_string());
        }

        let mut widths: Vec<usize> = results.columns.iter().map(|c| c.len()).collect();
        let shown: Vec<Vec<String>> = results
            .rows
            .iter()
            .take(limit)
            .map(|row| {
                row.iter()
                    .enumerate()
                    .map(|(idx, (_, value))| {
                        let text = value_to_display(value);
                        if text.len() > widths[idx] {
                            widths[idx] = text.len();
                        }
                        text
                    })
                    .collect()
            })
            .collect();

        let mut out = String::new();
        let header: Vec<String> = results
            .columns
            .iter()
            .enumerate()
            .map(|(idx, name)| format!("{:<width$}", name, width = widths[idx]))
            .collect();
        out.push_str(&header.join(" | "));
        out.push('\n');
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        out.push_str(&rule.join("-+-"));
        out.push('\n');
        for cells in &shown {
            let line: Vec<String> = cells
                .iter()
                .enumerate()
                .map(|(idx, text)| format!("{:<width$}", text, width = widths[idx]))
                .collect();
            out.push_str(&line.join(" | "));
            out.push('\n');
        }

        let total = results.total_rows();
        if total > limit {
            out.push_str(&format!("showing first {limit} of {total} rows\n"));
        } else {
            out.push_str(&format!("{total} rows\n"));
        }
        Some(out)
    }
}
