use super::types::OracleError;

/// How far a failure reaches within a batch command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorScope {
    /// Only the current candidate or test case is lost; the batch continues.
    Candidate,
    /// The command cannot go on.
    Batch,
}

#[derive(Debug, Clone)]
pub struct ErrorClassification {
    pub error_type: &'static str,
    pub scope: ErrorScope,
}

impl OracleError {
    /// Classify this error to decide whether a batch may continue past it.
    ///
    /// Nothing is ever retried: every input is already-captured trace data.
    pub fn classify(&self) -> ErrorClassification {
        match self {
            // Local to one reconstruction or classification
            OracleError::Structural { .. } => ErrorClassification {
                error_type: "StructuralError",
                scope: ErrorScope::Candidate,
            },
            OracleError::Integrity(_) => ErrorClassification {
                error_type: "IntegrityError",
                scope: ErrorScope::Candidate,
            },
            OracleError::Graph(_) => ErrorClassification {
                error_type: "GraphError",
                scope: ErrorScope::Candidate,
            },

            // Fatal for the whole command
            OracleError::Config(_) => ErrorClassification {
                error_type: "ConfigError",
                scope: ErrorScope::Batch,
            },
            OracleError::Io(_) => ErrorClassification {
                error_type: "IoError",
                scope: ErrorScope::Batch,
            },
            OracleError::Json(_) => ErrorClassification {
                error_type: "JsonError",
                scope: ErrorScope::Batch,
            },
            OracleError::Yaml(_) => ErrorClassification {
                error_type: "YamlError",
                scope: ErrorScope::Batch,
            },
            OracleError::Database(_) => ErrorClassification {
                error_type: "DatabaseError",
                scope: ErrorScope::Batch,
            },
            OracleError::Internal(_) => ErrorClassification {
                error_type: "InternalError",
                scope: ErrorScope::Batch,
            },
        }
    }

    pub fn is_candidate_local(&self) -> bool {
        self.classify().scope == ErrorScope::Candidate
    }
}
