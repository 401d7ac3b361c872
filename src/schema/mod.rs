//! Trait schema model
//!
//! This module defines the declarative model generation works from:
//! categories of weighted traits, requirement expressions that gate them,
//! bonus selections that cascade between categories, replacement
//! declarations, and the dependency graph used to reject cyclic schemas.

pub mod category;
pub mod dependency;
pub mod replacement;
pub mod requirement;
pub mod trait_schema;

pub use category::{BonusSelection, Trait, TraitCategory};
pub use dependency::{Dependency, DependencyGraph, DependencyType};
pub use replacement::{Replacement, ReplacementSearch};
pub use requirement::{LogicalExpression, LogicalOperator, Requirement};
pub use trait_schema::{OutputCategory, TraitSchema};
