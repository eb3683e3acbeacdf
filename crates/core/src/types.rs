use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::IDENTIFIER_SEPARATOR;
use crate::errors::{Error, Result};

/// The (type name, id) pair a storage location is derived from.
///
/// An identity without an id belongs to an entity that has not been persisted
/// yet; no storage path exists for it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityIdentity {
    type_name: String,
    id: Option<String>,
}

impl EntityIdentity {
    /// Create an identity for a persisted entity
    #[must_use]
    pub fn new(type_name: impl Into<String>, id: impl ToString) -> Self {
        Self {
            type_name: type_name.into(),
            id: Some(id.to_string()),
        }
    }

    /// Create an identity for an entity that has no id yet
    #[must_use]
    pub fn transient(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            id: None,
        }
    }

    /// Create an identity from an optional id
    #[must_use]
    pub fn from_parts(type_name: impl Into<String>, id: Option<String>) -> Self {
        Self {
            type_name: type_name.into(),
            id,
        }
    }

    /// Return a copy of this identity carrying the given id
    #[must_use]
    pub fn with_id(mut self, id: impl ToString) -> Self {
        self.id = Some(id.to_string());
        self
    }

    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Whether a storage path can be derived for this identity
    #[must_use]
    pub fn is_persistable(&self) -> bool {
        self.id.is_some()
    }

    /// The `<type>_<id>` string used as the leaf directory name
    #[must_use]
    pub fn identifier(&self) -> Option<String> {
        self.id
            .as_ref()
            .map(|id| format!("{}{IDENTIFIER_SEPARATOR}{id}", self.type_name))
    }
}

impl fmt::Display for EntityIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.id {
            Some(id) => write!(f, "{}#{id}", self.type_name),
            None => write!(f, "{}#<new>", self.type_name),
        }
    }
}

/// Host environment discriminator
///
/// Selects the storage backend at composition time and names the
/// environment subfolder under the storage root.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Environment {
    Test,
    Development,
    Production,
    Custom(String),
}

impl Environment {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Environment::Test => "test",
            Environment::Development => "development",
            Environment::Production => "production",
            Environment::Custom(name) => name,
        }
    }

    #[must_use]
    pub fn is_test(&self) -> bool {
        matches!(self, Environment::Test)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(Error::configuration("environment name must not be empty"));
        }
        if trimmed.contains(['/', '\\']) || trimmed == "." || trimmed == ".." {
            return Err(Error::configuration(format!(
                "environment name '{trimmed}' must be a single path segment"
            )));
        }

        Ok(match trimmed.to_ascii_lowercase().as_str() {
            "test" => Environment::Test,
            "development" | "dev" => Environment::Development,
            "production" | "prod" => Environment::Production,
            _ => Environment::Custom(trimmed.to_string()),
        })
    }
}

impl TryFrom<String> for Environment {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Environment> for String {
    fn from(env: Environment) -> Self {
        env.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_identifier_joins_type_and_id() {
        let identity = EntityIdentity::new("TestModel", 5);
        assert_eq!(identity.identifier().as_deref(), Some("TestModel_5"));
        assert!(identity.is_persistable());
    }

    #[test]
    fn test_transient_identity_has_no_identifier() {
        let identity = EntityIdentity::transient("TestModel");
        assert!(!identity.is_persistable());
        assert_eq!(identity.identifier(), None);
        assert_eq!(identity.to_string(), "TestModel#<new>");

        let persisted = identity.with_id(7);
        assert_eq!(persisted.id(), Some("7"));
    }

    #[test]
    fn test_environment_parsing() {
        assert_eq!("TEST".parse::<Environment>().unwrap(), Environment::Test);
        assert_eq!("prod".parse::<Environment>().unwrap(), Environment::Production);
        assert_eq!(
            "staging".parse::<Environment>().unwrap(),
            Environment::Custom("staging".to_string())
        );
        assert!("".parse::<Environment>().is_err());
        assert!("../etc".parse::<Environment>().is_err());
    }

    #[test]
    fn test_environment_serde() {
        let json = serde_json::to_string(&Environment::Production).unwrap();
        assert_eq!(json, "\"production\"");
        let env: Environment = serde_json::from_str("\"Test\"").unwrap();
        assert!(env.is_test());
        assert!(serde_json::from_str::<Environment>("\"\"").is_err());
    }

    proptest! {
        #[test]
        fn proptest_equal_parts_give_equal_identifiers(
            type_name in "[A-Z][a-zA-Z]{0,15}",
            id in 0u64..1_000_000
        ) {
            let a = EntityIdentity::new(type_name.clone(), id);
            let b = EntityIdentity::from_parts(type_name, Some(id.to_string()));
            prop_assert_eq!(a.identifier(), b.identifier());
            prop_assert_eq!(a, b);
        }
    }
}
