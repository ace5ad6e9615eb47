use regex::Regex;
use crate::errors::OracleError;
use crate::models::Variable;

/// Variable names that never count as anti-CSRF tokens: session cookies,
/// multipart framing fields and parameter-name placeholders.
pub const DEFAULT_DENYLIST: &[&str] = &[".*cookie-pair.*", ".*multipart.*", ".*param-name"];

/// Decides whether a request carries an anti-CSRF token.
#[derive(Debug, Clone)]
pub struct ProtectionPolicy {
    denylist: Vec<Regex>,
}

impl ProtectionPolicy {
    /// Patterns match from the start of the variable name, case-sensitively.
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self, OracleError> {
        let mut denylist = Vec::with_capacity(patterns.len());
        for pattern in patterns {
            let pattern = pattern.as_ref();
            if pattern.is_empty() {
                return Err(OracleError::Config("Empty denylist pattern".into()));
            }
            let re = Regex::new(&format!("^(?:{})", pattern))
                .map_err(|e| OracleError::Config(format!("Invalid denylist pattern '{}': {}", pattern, e)))?;
            denylist.push(re);
        }
        Ok(Self { denylist })
    }

    pub fn standard() -> Result<Self, OracleError> {
        Self::new(DEFAULT_DENYLIST)
    }

    pub fn is_denylisted(&self, name: &str) -> bool {
        self.denylist.iter().any(|re| re.is_match(name))
    }

    /// A unique, non-attacker-controlled, non-denylisted variable.
    pub fn is_token(&self, var: &Variable) -> bool {
        var.is_unique() && !var.is_user_generated() && !self.is_denylisted(&var.name)
    }

    pub fn is_protected<'v>(&self, variables: impl IntoIterator<Item = &'v Variable>) -> bool {
        variables.into_iter().any(|v| self.is_token(v))
    }
}
