use serde::{Deserialize, Serialize};
use super::parse_tree::DmType;

pub const SESSION_UNIQUE: &str = "session_unique";
pub const USER_UNIQUE: &str = "user_unique";
/// Propagation type of attacker-controllable values.
pub const USER_GENERATED: &str = "UG";

/// One concrete occurrence: an HTTP request, a response or a backend query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub uuid: String,
    pub project: String,
    pub session: String,
    pub user: String,
    pub dm_type: DmType,
    /// Root of the parse tree that parses this event.
    #[serde(default)]
    pub parse_tree: Option<String>,
    /// Events causally produced by this one, e.g. the queries an HTTP request fired.
    #[serde(default)]
    pub caused: Vec<String>,
}

impl Event {
    pub fn scope(&self) -> Scope {
        Scope {
            project: self.project.clone(),
            session: self.session.clone(),
            user: self.user.clone(),
        }
    }
}

/// A named application-level operation grouping concrete events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbstractEvent {
    pub uuid: String,
    pub project: String,
    pub operation: String,
    pub dm_type: DmType,
    #[serde(default)]
    pub events: Vec<String>,
}

/// Equivalence class of normalized parse trees, identified by `message`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbstractParseTree {
    pub uuid: String,
    pub message: String,
    #[serde(default)]
    pub abstracts: Vec<String>,
}

/// A named value bound inside a request's parse tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Variable {
    pub uuid: String,
    pub name: String,
    #[serde(default)]
    pub value: String,
    /// Event whose parse tree binds the variable.
    pub event: String,
    /// Terminal node holding the concrete value.
    pub node: String,
    #[serde(default)]
    pub semtype: Vec<String>,
    #[serde(default)]
    pub proptype: Option<Vec<String>>,
}

impl Variable {
    pub fn has_semtype(&self, label: &str) -> bool {
        self.semtype.iter().any(|s| s == label)
    }

    pub fn is_unique(&self) -> bool {
        self.has_semtype(SESSION_UNIQUE) || self.has_semtype(USER_UNIQUE)
    }

    pub fn is_user_generated(&self) -> bool {
        self.proptype
            .as_ref()
            .is_some_and(|p| p.iter().any(|t| t == USER_GENERATED))
    }
}

/// Execution scope used by singleton classification.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Scope {
    pub project: String,
    pub session: String,
    pub user: String,
}

impl Scope {
    pub fn new(project: &str, session: &str, user: &str) -> Self {
        Self {
            project: project.to_string(),
            session: session.to_string(),
            user: user.to_string(),
        }
    }
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.project, self.session, self.user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var(semtype: &[&str], proptype: Option<&[&str]>) -> Variable {
        Variable {
            uuid: "v1".into(),
            name: "csrf".into(),
            value: "tok".into(),
            event: "e1".into(),
            node: "n1".into(),
            semtype: semtype.iter().map(|s| s.to_string()).collect(),
            proptype: proptype.map(|p| p.iter().map(|s| s.to_string()).collect()),
        }
    }

    #[test]
    fn test_unique_labels() {
        assert!(var(&[SESSION_UNIQUE], None).is_unique());
        assert!(var(&["constant", USER_UNIQUE], None).is_unique());
        assert!(!var(&["constant"], None).is_unique());
    }

    #[test]
    fn test_user_generated() {
        assert!(var(&[], Some(&[USER_GENERATED])).is_user_generated());
        assert!(!var(&[], Some(&["SV"])).is_user_generated());
        assert!(!var(&[], None).is_user_generated());
    }

    #[test]
    fn test_variable_defaults_on_deserialize() {
        let v: Variable = serde_json::from_str(r#"{"uuid":"v","name":"n","event":"e","node":"t"}"#).unwrap();
        assert!(v.semtype.is_empty());
        assert!(v.proptype.is_none());
    }
}
