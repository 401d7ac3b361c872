//! Weighted sampling without replacement from one category's pool.

use crate::core::error::GenerationError;
use crate::core::types::TraitSet;
use crate::generation::random::RandomSource;
use crate::schema::{BonusSelection, Trait, TraitCategory};

/// Traits picked by one `choose` call and the bonus picks they trigger
#[derive(Debug, Clone, Default)]
pub struct Selection<'s> {
    pub traits: Vec<&'s Trait>,
    pub bonus_selections: Vec<&'s BonusSelection>,
}

/// Draws traits from a single category for a single entity
///
/// The chooser keeps the traits not yet drawn, so repeated calls for the same
/// entity (bonus selections back into the category) never pick a trait twice.
#[derive(Debug, Clone)]
pub struct TraitChooser<'s> {
    category: &'s TraitCategory,
    remaining: Vec<&'s Trait>,
}

impl<'s> TraitChooser<'s> {
    pub fn new(category: &'s TraitCategory) -> Self {
        Self {
            category,
            remaining: category.traits().iter().collect(),
        }
    }

    pub fn category(&self) -> &'s TraitCategory {
        self.category
    }

    /// Traits not drawn yet, in declaration order
    pub fn remaining(&self) -> &[&'s Trait] {
        &self.remaining
    }

    /// Draw `count` traits whose own requirements hold for `npc`
    ///
    /// Eligibility is evaluated once, at call time. Each draw calls
    /// `random.next_below(total_weight)` exactly once and takes the first
    /// eligible trait, in declaration order, whose cumulative weight exceeds
    /// the value, so zero-weight traits are never drawn.
    pub fn choose<S, R>(
        &mut self,
        count: u32,
        npc: &S,
        random: &mut R,
    ) -> Result<Selection<'s>, GenerationError>
    where
        S: TraitSet + ?Sized,
        R: RandomSource + ?Sized,
    {
        let mut pool: Vec<&'s Trait> = self
            .remaining
            .iter()
            .copied()
            .filter(|candidate| candidate.is_unlocked_for(npc))
            .collect();
        let available = pool.len();
        let mut selection = Selection::default();

        for _ in 0..count {
            if pool.is_empty() {
                return Err(GenerationError::TooFewTraitsPassRequirements {
                    category: self.category.name().to_string(),
                    requested: count,
                    available,
                });
            }

            let total: u64 = pool.iter().map(|candidate| u64::from(candidate.weight)).sum();
            if total == 0 {
                return Err(GenerationError::NoRemainingWeight {
                    category: self.category.name().to_string(),
                });
            }

            let roll = random.next_below(total);
            let mut cumulative = 0u64;
            let mut picked = pool.len() - 1;
            for (i, candidate) in pool.iter().enumerate() {
                cumulative += u64::from(candidate.weight);
                if cumulative > roll {
                    picked = i;
                    break;
                }
            }

            let chosen = pool.remove(picked);
            tracing::trace!(
                "Drew '{}' from '{}' (roll {} of {})",
                chosen.name,
                self.category.name(),
                roll,
                total
            );
            if let Some(bonus) = &chosen.bonus_selection {
                selection.bonus_selections.push(bonus);
            }
            selection.traits.push(chosen);
        }

        self.remaining
            .retain(|candidate| !selection.traits.iter().any(|t| t.name == candidate.name));
        Ok(selection)
    }
}
