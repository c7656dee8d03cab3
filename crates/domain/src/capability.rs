use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// One granted capability as delivered by the session backend.
///
/// Backends return either a bare identifier (`"Update Role"`) or a descriptor
/// record (`{"id": 7, "name": "Update Role", ...}`). Both forms denote the same
/// capability once normalized through [`Capability::name`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Capability {
    /// Plain identifier form.
    Identifier(String),
    /// Descriptor record form.
    Descriptor(CapabilityDescriptor),
}

/// Descriptor record exposing a capability `name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilityDescriptor {
    /// Capability identifier.
    pub name: String,
    /// Optional human-readable description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Capability {
    /// Creates an identifier capability.
    #[must_use]
    pub fn identifier(name: impl Into<String>) -> Self {
        Self::Identifier(name.into())
    }

    /// Creates a descriptor capability.
    #[must_use]
    pub fn descriptor(name: impl Into<String>) -> Self {
        Self::Descriptor(CapabilityDescriptor {
            name: name.into(),
            description: None,
        })
    }

    /// Returns the canonical identifier for either representation.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Identifier(name) => name.trim(),
            Self::Descriptor(descriptor) => descriptor.name.trim(),
        }
    }
}

impl From<&str> for Capability {
    fn from(value: &str) -> Self {
        Self::identifier(value)
    }
}

/// Normalized set of capabilities granted to one principal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapabilitySet {
    names: BTreeSet<String>,
}

impl CapabilitySet {
    /// Creates an empty capability set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one capability, ignoring blank identifiers.
    pub fn insert(&mut self, capability: Capability) {
        let name = capability.name();
        if !name.is_empty() {
            self.names.insert(name.to_owned());
        }
    }

    /// Returns whether the set grants the required identifier.
    #[must_use]
    pub fn contains(&self, required: &str) -> bool {
        self.names.contains(required.trim())
    }

    /// Returns whether no capability is granted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Returns the number of distinct capabilities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Iterates canonical identifiers in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

impl FromIterator<Capability> for CapabilitySet {
    fn from_iter<T: IntoIterator<Item = Capability>>(iter: T) -> Self {
        let mut set = Self::new();
        for capability in iter {
            set.insert(capability);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{Capability, CapabilitySet};

    #[test]
    fn descriptor_and_identifier_collapse_to_one_entry() {
        let set: CapabilitySet = [
            Capability::identifier("Update Role"),
            Capability::descriptor("Update Role"),
            Capability::identifier(" Delete Role "),
        ]
        .into_iter()
        .collect();

        assert_eq!(set.len(), 2);
        assert!(set.contains("Update Role"));
        assert!(set.contains("Delete Role"));
    }

    #[test]
    fn blank_identifiers_are_ignored() {
        let set: CapabilitySet = [Capability::identifier("   ")].into_iter().collect();
        assert!(set.is_empty());
    }

    #[test]
    fn mixed_payload_deserializes() {
        let payload = json!([
            "View Users",
            {"id": 4, "name": "Update User", "module": "users", "method": "PUT"}
        ]);

        let capabilities = serde_json::from_value::<Vec<Capability>>(payload);
        assert!(capabilities.is_ok());

        let set: CapabilitySet = capabilities.unwrap_or_default().into_iter().collect();
        assert!(set.contains("View Users"));
        assert!(set.contains("Update User"));
    }
}
