//! NPC generation
//!
//! [`NpcFactory::create`] turns a schema, a count, a replacement list and a
//! random source into an [`NpcGroup`]. Per-category weighted draws are done by
//! [`TraitChooser`].

pub mod chooser;
pub mod factory;
pub mod npc;
pub mod random;

pub use crate::schema::OutputCategory;
pub use chooser::{Selection, TraitChooser};
pub use factory::NpcFactory;
pub use npc::{Npc, NpcGroup, TraitRecord};
pub use random::{RandomSource, RngSource, SequenceRandom};
