//! Violations found when checking generated NPCs against a schema.

use std::fmt;

use serde::Serialize;

use crate::core::types::TraitId;

/// A single way a generated group disagrees with its schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Violation {
    TooFewTraitsInCategory {
        category: String,
        expected: usize,
        actual: usize,
    },
    TooManyTraitsInCategory {
        category: String,
        expected: usize,
        actual: usize,
    },
    CategoryNotFoundInSchema {
        category: String,
    },
    TraitNotFoundInSchema {
        trait_id: TraitId,
    },
    TraitIsIncorrectlyHidden {
        trait_id: TraitId,
    },
    TraitIsIncorrectlyNotHidden {
        trait_id: TraitId,
    },
    CategoryIsIncorrectlyHidden {
        category: String,
    },
    CategoryIsIncorrectlyNotHidden {
        category: String,
    },
    HasLockedTrait {
        trait_id: TraitId,
    },
    HasTraitInLockedCategory {
        trait_id: TraitId,
    },
    UnusedReplacement {
        trait_id: TraitId,
        replacement_name: String,
    },
    CategoryOrderIncorrect {
        expected: Vec<String>,
        actual: Vec<String>,
    },
}

impl Violation {
    /// Category the violation concerns, if it concerns a single one
    pub fn category(&self) -> Option<&str> {
        match self {
            Violation::TooFewTraitsInCategory { category, .. }
            | Violation::TooManyTraitsInCategory { category, .. }
            | Violation::CategoryNotFoundInSchema { category }
            | Violation::CategoryIsIncorrectlyHidden { category }
            | Violation::CategoryIsIncorrectlyNotHidden { category } => Some(category.as_str()),
            Violation::TraitNotFoundInSchema { trait_id }
            | Violation::TraitIsIncorrectlyHidden { trait_id }
            | Violation::TraitIsIncorrectlyNotHidden { trait_id }
            | Violation::HasLockedTrait { trait_id }
            | Violation::HasTraitInLockedCategory { trait_id }
            | Violation::UnusedReplacement { trait_id, .. } => Some(trait_id.category.as_str()),
            Violation::CategoryOrderIncorrect { .. } => None,
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::TooFewTraitsInCategory {
                category,
                expected,
                actual,
            } => write!(
                f,
                "Category '{}' has {} traits, expected {}",
                category, actual, expected
            ),
            Violation::TooManyTraitsInCategory {
                category,
                expected,
                actual,
            } => write!(
                f,
                "Category '{}' has {} traits, expected at most {}",
                category, actual, expected
            ),
            Violation::CategoryNotFoundInSchema { category } => {
                write!(f, "Category '{}' is not in the schema", category)
            }
            Violation::TraitNotFoundInSchema { trait_id } => {
                write!(f, "Trait '{}' is not in the schema", trait_id)
            }
            Violation::TraitIsIncorrectlyHidden { trait_id } => {
                write!(f, "Trait '{}' is hidden but should be visible", trait_id)
            }
            Violation::TraitIsIncorrectlyNotHidden { trait_id } => {
                write!(f, "Trait '{}' is visible but should be hidden", trait_id)
            }
            Violation::CategoryIsIncorrectlyHidden { category } => {
                write!(f, "Category '{}' is hidden but should be visible", category)
            }
            Violation::CategoryIsIncorrectlyNotHidden { category } => {
                write!(f, "Category '{}' is visible but should be hidden", category)
            }
            Violation::HasLockedTrait { trait_id } => {
                write!(f, "Trait '{}' has an unmet requirement", trait_id)
            }
            Violation::HasTraitInLockedCategory { trait_id } => {
                write!(f, "Trait '{}' is in a locked category", trait_id)
            }
            Violation::UnusedReplacement {
                trait_id,
                replacement_name,
            } => write!(
                f,
                "Replacement of '{}' with '{}' was not used",
                trait_id, replacement_name
            ),
            Violation::CategoryOrderIncorrect { expected, actual } => write!(
                f,
                "Category order [{}] does not follow [{}]",
                actual.join(", "),
                expected.join(", ")
            ),
        }
    }
}

/// Violations split into group-level and per-entity lists
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub category_violations: Vec<Violation>,
    /// One list per entity, indexed like the group
    pub npc_violations: Vec<Vec<Violation>>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.category_violations.is_empty() && self.npc_violations.iter().all(Vec::is_empty)
    }

    pub fn violations_for(&self, npc_index: usize) -> &[Violation] {
        self.npc_violations
            .get(npc_index)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Every violation, group-level and per entity, concerning `category`
    pub fn violations_for_category(&self, category: &str) -> Vec<&Violation> {
        self.category_violations
            .iter()
            .chain(self.npc_violations.iter().flatten())
            .filter(|violation| violation.category() == Some(category))
            .collect()
    }

    pub fn total_count(&self) -> usize {
        self.category_violations.len() + self.npc_violations.iter().map(Vec::len).sum::<usize>()
    }
}
