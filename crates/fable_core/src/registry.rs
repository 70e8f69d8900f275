//! Write-once registry of character physical descriptions.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Outcome of a registry write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Registration {
    /// The name was new and its description was stored.
    Inserted,
    /// The name already had a description; the registry is unchanged.
    AlreadyPresent,
}

/// Maps a character's display name to their physical description.
///
/// Names are case-sensitive. The first description stored for a name is the
/// one that sticks: later writes for the same name are ignored, so a
/// conversation that drifts cannot give a character two different looks.
///
/// # Examples
///
/// ```
/// use fable_core::{CharacterRegistry, Registration};
///
/// let mut registry = CharacterRegistry::new();
/// assert_eq!(registry.register("Dog", "a scruffy terrier"), Registration::Inserted);
/// assert_eq!(registry.register("Dog", "a sleek greyhound"), Registration::AlreadyPresent);
/// assert_eq!(registry.get("Dog"), Some("a scruffy terrier"));
/// assert_eq!(registry.get("dog"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CharacterRegistry {
    descriptions: BTreeMap<String, String>,
}

impl CharacterRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a description unless the name already has one.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Registration {
        let name = name.into();
        if self.descriptions.contains_key(&name) {
            debug!(character = %name, "Character already registered, keeping first description");
            return Registration::AlreadyPresent;
        }

        let description = description.into();
        debug!(character = %name, description = %description, "Registering character");
        self.descriptions.insert(name, description);
        Registration::Inserted
    }

    /// Gets a character's description.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.descriptions.get(name).map(String::as_str)
    }

    /// Checks whether a character has a description.
    pub fn contains(&self, name: &str) -> bool {
        self.descriptions.contains_key(name)
    }

    /// Number of registered characters.
    pub fn len(&self) -> usize {
        self.descriptions.len()
    }

    /// Whether no character is registered.
    pub fn is_empty(&self) -> bool {
        self.descriptions.is_empty()
    }

    /// Iterates `(name, description)` pairs sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.descriptions
            .iter()
            .map(|(name, description)| (name.as_str(), description.as_str()))
    }
}
