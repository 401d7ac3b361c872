//! Trait name replacements.

use std::fmt;
use std::str::FromStr;

use crate::core::types::TraitId;

/// Schema-side declaration that a trait's visible name may be replaced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplacementSearch {
    pub trait_id: TraitId,
}

impl ReplacementSearch {
    pub fn new(trait_id: TraitId) -> Self {
        Self { trait_id }
    }
}

/// Substitutes the visible name of `original` whenever it is chosen
///
/// The owning category is `original.category`. The generated record keeps the
/// original name so validation can trace the substitution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replacement {
    pub original: TraitId,
    pub replacement_name: String,
}

impl Replacement {
    pub fn new(original: TraitId, replacement_name: impl Into<String>) -> Self {
        Self {
            original,
            replacement_name: replacement_name.into(),
        }
    }
}

impl fmt::Display for Replacement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} => {}", self.original, self.replacement_name)
    }
}

/// Parses `Category:Trait=Replacement Name`
impl FromStr for Replacement {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (original, replacement_name) = s
            .split_once('=')
            .ok_or_else(|| format!("Replacement '{}' is missing '='", s))?;
        let (category, trait_name) = original
            .split_once(':')
            .ok_or_else(|| format!("Replacement '{}' is missing ':' between category and trait", s))?;

        let category = category.trim();
        let trait_name = trait_name.trim();
        let replacement_name = replacement_name.trim();
        if category.is_empty() || trait_name.is_empty() || replacement_name.is_empty() {
            return Err(format!("Replacement '{}' has an empty part", s));
        }

        Ok(Replacement::new(
            TraitId::new(category, trait_name),
            replacement_name,
        ))
    }
}
