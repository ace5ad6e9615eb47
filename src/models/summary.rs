use serde::Serialize;
use crate::errors::{ErrorScope, OracleError};

/// Counters reported at the end of every batch command.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub generated: usize,
    pub skipped: usize,
    pub structural_errors: usize,
    pub integrity_errors: usize,
    pub graph_errors: usize,
    pub inconclusive: usize,
    /// Non-fatal reconstruction oddities, such as a query value with no name.
    pub anomalies: usize,
}

impl BatchSummary {
    /// Count a candidate-local failure. Batch-level errors are handed back.
    pub fn absorb(&mut self, error: OracleError) -> Result<(), OracleError> {
        if error.classify().scope != ErrorScope::Candidate {
            return Err(error);
        }
        match error {
            OracleError::Structural { .. } => self.structural_errors += 1,
            OracleError::Integrity(_) => self.integrity_errors += 1,
            _ => self.graph_errors += 1,
        }
        Ok(())
    }

    pub fn failed(&self) -> usize {
        self.structural_errors + self.integrity_errors + self.graph_errors
    }
}

impl std::fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "generated={} skipped={} structural_errors={} integrity_errors={} graph_errors={} inconclusive={} anomalies={}",
            self.generated,
            self.skipped,
            self.structural_errors,
            self.integrity_errors,
            self.graph_errors,
            self.inconclusive,
            self.anomalies
        )
    }
}
