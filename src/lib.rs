//! NPC Generator - schema-driven procedural generation of NPC traits
//!
//! A [`schema::TraitSchema`] declares categories of weighted traits, the
//! requirements gating them, and bonus selections cascading between them.
//! [`generation::NpcFactory`] draws populations from a schema and
//! [`validation::check_npcs`] verifies a population against one.

pub mod core;
pub mod definition;
pub mod export;
pub mod generation;
pub mod schema;
pub mod validation;
