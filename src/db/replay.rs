use crate::errors::OracleError;
use super::Database;

impl Database {
    /// Record one backend query observed while replaying a test case.
    pub fn insert_replay_query(&self, seq_id: i64, message: &str) -> Result<i64, OracleError> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO replay_queries (seq_id, message) VALUES (?1, ?2)",
            rusqlite::params![seq_id, message],
        ).map_err(|e| OracleError::Database(format!("Failed to insert replay query: {}", e)))?;
        Ok(conn.last_insert_rowid())
    }

    /// Queries of one replayed test case, in execution order.
    pub fn load_replay_queries(&self, seq_id: i64) -> Result<Vec<String>, OracleError> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare("SELECT message FROM replay_queries WHERE seq_id = ?1 ORDER BY id")
            .map_err(|e| OracleError::Database(format!("Query failed: {}", e)))?;
        let rows = stmt
            .query_map(rusqlite::params![seq_id], |row| row.get::<_, String>(0))
            .map_err(|e| OracleError::Database(format!("Query error: {}", e)))?;

        let mut queries = Vec::new();
        for row in rows {
            queries.push(row.map_err(|e| OracleError::Database(format!("Row error: {}", e)))?);
        }
        Ok(queries)
    }
}
