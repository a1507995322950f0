//! Coder identity configuration
//!
//! Each coder agent operates under an identity: a named analytical
//! perspective whose `prompt_prefix` becomes the system message of every
//! LLM call. Identities are loaded once at startup into an explicit
//! [`IdentityRegistry`] that callers pass to agent constructors; there is
//! deliberately no process-wide cached loader.

use crate::error::CoderError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// An analytical perspective a coder agent adopts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Unique identity key
    pub id: String,

    /// Human-readable name
    pub name: String,

    /// Instruction prefix used as the system prompt
    pub prompt_prefix: String,

    /// Optional free-form description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// On-disk layout: a TOML file with an `identities` array of tables.
#[derive(Debug, Deserialize)]
struct IdentityFile {
    #[serde(default)]
    identities: Vec<Identity>,
}

/// Validated collection of coder identities.
///
/// # Examples
///
/// ```
/// use codebook_coder::IdentityRegistry;
///
/// let registry = IdentityRegistry::from_toml_str(r#"
///     [[identities]]
///     id = "descriptive"
///     name = "Descriptive coder"
///     prompt_prefix = "You are a qualitative researcher focused on surface meaning."
/// "#).unwrap();
///
/// assert_eq!(registry.len(), 1);
/// assert!(registry.get("descriptive").is_some());
/// ```
#[derive(Debug, Clone)]
pub struct IdentityRegistry {
    identities: Vec<Identity>,
}

impl IdentityRegistry {
    /// Parse and validate identities from TOML text.
    ///
    /// Required fields (`id`, `name`, `prompt_prefix`) must be non-empty
    /// after trimming; ids must be unique; an empty registry is rejected.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, CoderError> {
        let file: IdentityFile = toml::from_str(toml_str)
            .map_err(|e| CoderError::Identity(format!("invalid identities file: {e}")))?;

        let mut identities = Vec::with_capacity(file.identities.len());
        let mut seen_ids = std::collections::HashSet::new();

        for mut identity in file.identities {
            identity.id = identity.id.trim().to_string();
            identity.name = identity.name.trim().to_string();
            identity.prompt_prefix = identity.prompt_prefix.trim().to_string();
            identity.description = identity
                .description
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty());

            for (field, value) in [
                ("id", &identity.id),
                ("name", &identity.name),
                ("prompt_prefix", &identity.prompt_prefix),
            ] {
                if value.is_empty() {
                    return Err(CoderError::Identity(format!(
                        "identity field must be non-empty: {field}"
                    )));
                }
            }

            if !seen_ids.insert(identity.id.clone()) {
                return Err(CoderError::Identity(format!(
                    "duplicate identity id: {}",
                    identity.id
                )));
            }

            identities.push(identity);
        }

        if identities.is_empty() {
            return Err(CoderError::Identity("no identities defined".to_string()));
        }

        Ok(Self { identities })
    }

    /// Load and validate identities from a TOML file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CoderError> {
        let toml_str = std::fs::read_to_string(path)?;
        Self::from_toml_str(&toml_str)
    }

    /// Look up an identity by id.
    pub fn get(&self, id: &str) -> Option<&Identity> {
        self.identities.iter().find(|i| i.id == id)
    }

    /// All identities, in file order.
    pub fn identities(&self) -> &[Identity] {
        &self.identities
    }

    /// Number of identities in the registry.
    pub fn len(&self) -> usize {
        self.identities.len()
    }

    /// Whether the registry is empty (never true for a validated registry).
    pub fn is_empty(&self) -> bool {
        self.identities.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"
        [[identities]]
        id = "descriptive"
        name = "Descriptive coder"
        prompt_prefix = "Focus on surface meaning."

        [[identities]]
        id = "critical"
        name = "Critical coder"
        prompt_prefix = "Focus on power dynamics."
        description = "Reads against the grain."
    "#;

    #[test]
    fn loads_valid_identities() {
        let registry = IdentityRegistry::from_toml_str(VALID).unwrap();
        assert_eq!(registry.len(), 2);

        let critical = registry.get("critical").unwrap();
        assert_eq!(critical.name, "Critical coder");
        assert_eq!(critical.description.as_deref(), Some("Reads against the grain."));
        assert_eq!(registry.get("descriptive").unwrap().description, None);
    }

    #[test]
    fn trims_whitespace_in_fields() {
        let registry = IdentityRegistry::from_toml_str(
            r#"
            [[identities]]
            id = "  padded  "
            name = " Padded "
            prompt_prefix = "  prefix  "
            "#,
        )
        .unwrap();

        let identity = registry.get("padded").unwrap();
        assert_eq!(identity.name, "Padded");
        assert_eq!(identity.prompt_prefix, "prefix");
    }

    #[test]
    fn rejects_missing_required_field() {
        let result = IdentityRegistry::from_toml_str(
            r#"
            [[identities]]
            id = "incomplete"
            name = "No prefix"
            "#,
        );
        assert!(matches!(result, Err(CoderError::Identity(_))));
    }

    #[test]
    fn rejects_blank_required_field() {
        let result = IdentityRegistry::from_toml_str(
            r#"
            [[identities]]
            id = "blank"
            name = "   "
            prompt_prefix = "x"
            "#,
        );
        assert!(matches!(result, Err(CoderError::Identity(_))));
    }

    #[test]
    fn rejects_duplicate_ids() {
        let result = IdentityRegistry::from_toml_str(
            r#"
            [[identities]]
            id = "dup"
            name = "One"
            prompt_prefix = "a"

            [[identities]]
            id = "dup"
            name = "Two"
            prompt_prefix = "b"
            "#,
        );
        match result {
            Err(CoderError::Identity(msg)) => assert!(msg.contains("duplicate")),
            other => panic!("expected duplicate id error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_empty_registry() {
        assert!(matches!(
            IdentityRegistry::from_toml_str(""),
            Err(CoderError::Identity(_))
        ));
        assert!(matches!(
            IdentityRegistry::from_toml_str("identities = []"),
            Err(CoderError::Identity(_))
        ));
    }

    #[test]
    fn rejects_malformed_toml() {
        assert!(matches!(
            IdentityRegistry::from_toml_str("not [ valid toml"),
            Err(CoderError::Identity(_))
        ));
    }

    #[test]
    fn blank_description_becomes_none() {
        let registry = IdentityRegistry::from_toml_str(
            r#"
            [[identities]]
            id = "x"
            name = "X"
            prompt_prefix = "p"
            description = "   "
            "#,
        )
        .unwrap();
        assert_eq!(registry.get("x").unwrap().description, None);
    }
}
