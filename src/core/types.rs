//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable cross-reference key for a trait: the owning category plus the trait name.
///
/// Equality is case-sensitive and independent of any particular schema instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TraitId {
    pub category: String,
    pub name: String,
}

impl TraitId {
    pub fn new(category: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for TraitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.category, self.name)
    }
}

/// Anything a requirement can be evaluated against.
///
/// Implemented by the entity being assembled during generation and by the
/// finished `Npc`, so the same requirement tree serves both generation and
/// validation.
pub trait TraitSet {
    /// Whether the entity carries a trait from `id.category` whose visible name is `id.name`.
    fn has_trait(&self, id: &TraitId) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trait_id_equality_is_case_sensitive() {
        assert_eq!(TraitId::new("Colour", "Blue"), TraitId::new("Colour", "Blue"));
        assert_ne!(TraitId::new("Colour", "Blue"), TraitId::new("colour", "Blue"));
        assert_ne!(TraitId::new("Colour", "Blue"), TraitId::new("Colour", "blue"));
    }

    #[test]
    fn test_trait_id_display() {
        let id = TraitId::new("Animal", "Tyrannosaurus Rex");
        assert_eq!(id.to_string(), "Animal: Tyrannosaurus Rex");
    }
}
