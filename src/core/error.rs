use thiserror::Error;

use crate::core::types::TraitId;
use crate::definition::DefinitionError;
use crate::schema::Dependency;

/// Errors raised while assembling or validating a `TraitSchema`.
///
/// These indicate an invalid configuration and carry the offending names verbatim.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("Empty name for {kind}")]
    EmptyName { kind: &'static str },

    #[error("Duplicate category: {name}")]
    DuplicateCategory { name: String },

    #[error("Duplicate trait '{name}' in category '{category}'")]
    DuplicateTrait { category: String, name: String },

    #[error("Logical operator '{operator}' has no operands")]
    EmptyOperands { operator: String },

    #[error("Unknown logical operator: {operator}")]
    UnknownLogicalOperator { operator: String },

    #[error("Malformed requirement '{input}' at position {position}")]
    MalformedRequirement { input: String, position: usize },

    #[error("Requirement references missing category '{category}'")]
    MissingRequirementCategory { category: String },

    #[error("Replacement declared for missing trait '{trait_id}'")]
    MissingReplacementTrait { trait_id: TraitId },

    #[error("Trait '{trait_id}' has a bonus selection into missing category '{category}'")]
    MissingBonusSelectionCategory { trait_id: TraitId, category: String },

    #[error("Category order names unknown category '{name}'")]
    UnknownOrderedCategory { name: String },

    #[error("Category order names '{name}' more than once")]
    DuplicateOrderedCategory { name: String },

    #[error("Trait '{trait_id}' requires itself")]
    SelfRequiringTrait { trait_id: TraitId },

    #[error("Category '{category}' requires itself")]
    SelfRequiringCategory { category: String },

    #[error("Circular requirements: {}", format_cycle(.cycle))]
    CircularRequirements { cycle: Vec<Dependency> },
}

fn format_cycle(cycle: &[Dependency]) -> String {
    cycle
        .iter()
        .map(|dependency| dependency.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Errors raised while generating NPCs from a structurally valid schema.
///
/// Any of these aborts the whole generation call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    #[error(
        "Category '{category}' needs {requested} traits but only {available} pass their requirements"
    )]
    TooFewTraitsPassRequirements {
        category: String,
        requested: u32,
        available: usize,
    },

    #[error("No remaining weight among eligible traits in category '{category}'")]
    NoRemainingWeight { category: String },

    #[error("Trait '{trait_id}' has a bonus selection into missing category '{category}'")]
    MissingBonusSelectionCategory { trait_id: TraitId, category: String },

    #[error("Replacement targets trait '{trait_id}' which is not in the schema")]
    ReplacementTraitNotFound { trait_id: TraitId },

    #[error("More than one replacement targets trait '{trait_id}'")]
    DuplicateReplacement { trait_id: TraitId },
}

/// Crate-level error for binaries and callers that drive the whole pipeline
#[derive(Error, Debug)]
pub enum NpcError {
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("Generation error: {0}")]
    Generation(#[from] GenerationError),

    #[error("Definition error: {0}")]
    Definition(#[from] DefinitionError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, NpcError>;
