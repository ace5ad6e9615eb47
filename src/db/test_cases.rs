use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use crate::errors::OracleError;
use crate::models::{ConcreteRequest, TestCase};
use super::Database;

impl Database {
    pub fn insert_test_case(&self, tc: &TestCase) -> Result<(), OracleError> {
        let headers = serde_json::to_string(&tc.request.headers)?;
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO csrf_tests (seq_id, batch_id, created_at, project, session, operation, user, request_event_id, mutated_node_id, source_var_id, sink_var_id, method, url, headers_json, body) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
            rusqlite::params![
                tc.seq_id,
                tc.batch_id,
                tc.created_at.to_rfc3339(),
                tc.project,
                tc.session,
                tc.operation,
                tc.user,
                tc.request_event_id,
                tc.mutated_node_id,
                tc.source_var_id,
                tc.sink_var_id,
                tc.request.method,
                tc.request.url,
                headers,
                tc.request.body,
            ],
        ).map_err(|e| OracleError::Database(format!("Failed to insert test case {}: {}", tc.seq_id, e)))?;
        Ok(())
    }

    /// First free seq_id; a new batch continues numbering after the stored ones.
    pub fn next_seq_id(&self) -> Result<i64, OracleError> {
        let conn = self.lock()?;
        conn.query_row("SELECT COALESCE(MAX(seq_id), 0) + 1 FROM csrf_tests", [], |row| row.get(0))
            .map_err(|e| OracleError::Database(format!("Failed to read next seq_id: {}", e)))
    }

    /// All stored test cases in seq_id order.
    pub fn load_test_cases(&self) -> Result<Vec<TestCase>, OracleError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT seq_id, batch_id, created_at, project, session, operation, user, request_event_id, mutated_node_id, source_var_id, sink_var_id, method, url, headers_json, body FROM csrf_tests ORDER BY seq_id"
        ).map_err(|e| OracleError::Database(format!("Query failed: {}", e)))?;

        let rows = stmt.query_map([], |row: &rusqlite::Row| {
            let created_at: String = row.get(2)?;
            let headers_json: String = row.get(13)?;
            Ok((
                TestCase {
                    seq_id: row.get(0)?,
                    batch_id: row.get(1)?,
                    created_at: DateTime::parse_from_rfc3339(&created_at)
                        .map(|d| d.with_timezone(&Utc))
                        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, Box::new(e)))?,
                    project: row.get(3)?,
                    session: row.get(4)?,
                    operation: row.get(5)?,
                    user: row.get(6)?,
                    request_event_id: row.get(7)?,
                    mutated_node_id: row.get(8)?,
                    source_var_id: row.get(9)?,
                    sink_var_id: row.get(10)?,
                    request: ConcreteRequest {
                        method: row.get(11)?,
                        url: row.get(12)?,
                        headers: IndexMap::new(),
                        body: row.get(14)?,
                    },
                },
                headers_json,
            ))
        }).map_err(|e| OracleError::Database(format!("Query error: {}", e)))?;

        let mut cases = Vec::new();
        for row in rows {
            let (mut tc, headers_json) = row.map_err(|e| OracleError::Database(format!("Row error: {}", e)))?;
            tc.request.headers = serde_json::from_str(&headers_json)?;
            cases.push(tc);
        }
        Ok(cases)
    }
}
