use chrono::Utc;
use crate::errors::OracleError;
use crate::models::{OracleResult, QueryPattern, TestCase, Verdict};
use super::Database;

impl Database {
    pub fn insert_oracle_result(
        &self,
        tc: &TestCase,
        result: &OracleResult,
        verdict: Verdict,
    ) -> Result<(), OracleError> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO csrf_test_results (seq_id, created_at, project, session, operation, user, request_event_id, mutated_node_id, method, url, query_message, query_hash, abstract_query_id, observed, uniq, trace_pattern, verdict) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)",
            rusqlite::params![
                tc.seq_id,
                Utc::now().to_rfc3339(),
                tc.project,
                tc.session,
                tc.operation,
                tc.user,
                tc.request_event_id,
                tc.mutated_node_id,
                tc.request.method,
                tc.request.url,
                result.query_message,
                result.query_hash,
                result.abstract_query_id,
                result.observed,
                result.unique,
                result.trace_pattern_label(),
                verdict.as_str(),
            ],
        ).map_err(|e| OracleError::Database(format!("Failed to insert oracle result: {}", e)))?;
        Ok(())
    }

    /// Stored per-query results with the verdict of their test case, in insertion order.
    pub fn load_oracle_results(&self) -> Result<Vec<(OracleResult, Verdict)>, OracleError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT seq_id, query_message, query_hash, abstract_query_id, observed, uniq, trace_pattern, verdict FROM csrf_test_results ORDER BY id"
        ).map_err(|e| OracleError::Database(format!("Query failed: {}", e)))?;

        let rows = stmt.query_map([], |row: &rusqlite::Row| {
            let pattern: String = row.get(6)?;
            let verdict: String = row.get(7)?;
            let verdict = if verdict == Verdict::Vulnerable.as_str() {
                Verdict::Vulnerable
            } else {
                Verdict::NotVulnerable
            };
            Ok((
                OracleResult {
                    seq_id: row.get(0)?,
                    query_message: row.get(1)?,
                    query_hash: row.get(2)?,
                    abstract_query_id: row.get(3)?,
                    observed: row.get(4)?,
                    unique: row.get(5)?,
                    trace_pattern: QueryPattern::from_str_opt(&pattern),
                },
                verdict,
            ))
        }).map_err(|e| OracleError::Database(format!("Query error: {}", e)))?;

        let mut results = Vec::new();
        for row in rows {
            results.push(row.map_err(|e| OracleError::Database(format!("Row error: {}", e)))?);
        }
        Ok(results)
    }
}
