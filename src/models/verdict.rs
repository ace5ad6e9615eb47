use serde::{Deserialize, Serialize};

/// Final judgement on a replayed test case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    /// The mutated request still produced a modeled, mutation-specific state change.
    Vulnerable,
    NotVulnerable,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Vulnerable => "VULNERABLE",
            Self::NotVulnerable => "NOT_VULNERABLE",
        }
    }

    pub fn is_vulnerable(&self) -> bool {
        matches!(self, Verdict::Vulnerable)
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How often an abstract query fires within one execution scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QueryPattern {
    /// Fires exactly once: a reliable state-change anchor.
    Singleton,
    Repeated,
}

impl QueryPattern {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Singleton => "SINGLETON",
            Self::Repeated => "REPEATED",
        }
    }

    pub fn from_str_opt(s: &str) -> Option<Self> {
        match s {
            "SINGLETON" => Some(Self::Singleton),
            "REPEATED" => Some(Self::Repeated),
            _ => None,
        }
    }
}

impl std::fmt::Display for QueryPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
