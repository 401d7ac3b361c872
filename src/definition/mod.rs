//! Declarative TOML schema definitions
//!
//! Definitions are deserialized with serde, requirement text is parsed into
//! expression trees, and the result is assembled into a validated
//! [`TraitSchema`](crate::schema::TraitSchema).

pub mod loader;
pub mod parser;

pub use loader::{
    load_schema_file, load_schema_str, BonusDefinition, CategoryDefinition, DefinitionError,
    ReplaceableDefinition, SchemaDefinition, TraitDefinition,
};
pub use parser::{parse_expression, parse_requirement};
