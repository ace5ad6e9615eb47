pub const CREATE_TABLES: &str = "
CREATE TABLE IF NOT EXISTS csrf_tests (
    seq_id INTEGER PRIMARY KEY,
    batch_id TEXT NOT NULL,
    created_at TEXT NOT NULL,
    project TEXT NOT NULL,
    session TEXT NOT NULL,
    operation TEXT NOT NULL,
    user TEXT NOT NULL,
    request_event_id TEXT NOT NULL,
    mutated_node_id TEXT,
    source_var_id TEXT,
    sink_var_id TEXT,
    method TEXT NOT NULL,
    url TEXT NOT NULL,
    headers_json TEXT NOT NULL,
    body TEXT
);

CREATE TABLE IF NOT EXISTS csrf_test_results (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    seq_id INTEGER NOT NULL,
    created_at TEXT NOT NULL,
    project TEXT NOT NULL,
    session TEXT NOT NULL,
    operation TEXT NOT NULL,
    user TEXT NOT NULL,
    request_event_id TEXT NOT NULL,
    mutated_node_id TEXT,
    method TEXT NOT NULL,
    url TEXT NOT NULL,
    query_message TEXT NOT NULL,
    query_hash TEXT NOT NULL,
    abstract_query_id TEXT,
    observed INTEGER NOT NULL,
    uniq INTEGER NOT NULL,
    trace_pattern TEXT NOT NULL,
    verdict TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS replay_queries (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    seq_id INTEGER NOT NULL,
    message TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_tests_batch ON csrf_tests(batch_id);
CREATE INDEX IF NOT EXISTS idx_results_seq ON csrf_test_results(seq_id);
CREATE INDEX IF NOT EXISTS idx_replay_seq ON replay_queries(seq_id);
";
