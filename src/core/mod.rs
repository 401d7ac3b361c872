pub mod config;
pub mod error;
pub mod types;

pub use config::GenerationConfig;
pub use error::{GenerationError, NpcError, SchemaError};
pub use types::{TraitId, TraitSet};
