//! Full NPC generation: fixed-point resolution of category requests.
//!
//! Each entity starts with one selection request per category at its default
//! count, queued in dependency order so a category's picks come after those of
//! the categories its requirements name. Requests are processed from a FIFO
//! queue. A request for a locked
//! category is deferred to the back of the queue, stamped with the entity's
//! current revision (the number of traits it holds); if it comes round again
//! with no trait added since, it is dropped. Bonus selections append new
//! requests. Since the trait pools shrink with every draw and deferred
//! requests only survive while the trait set grows, the queue always drains.

use std::collections::VecDeque;

use ahash::AHashMap;

use crate::core::error::GenerationError;
use crate::core::types::{TraitId, TraitSet};
use crate::generation::chooser::TraitChooser;
use crate::generation::npc::{Npc, NpcGroup, TraitRecord};
use crate::generation::random::RandomSource;
use crate::schema::{Replacement, TraitSchema};
use crate::validation::{check_npcs, ValidationReport};

#[derive(Debug, Clone, Copy)]
struct SelectionRequest {
    category: usize,
    count: u32,
    /// Entity revision at which the request was last deferred
    deferred_at: Option<usize>,
}

/// Entity under construction, records kept in pick order
struct NpcInProgress {
    picks: Vec<(usize, TraitRecord)>,
}

impl NpcInProgress {
    fn revision(&self) -> usize {
        self.picks.len()
    }
}

impl TraitSet for NpcInProgress {
    fn has_trait(&self, id: &TraitId) -> bool {
        self.picks.iter().any(|(_, record)| record.matches(id))
    }
}

/// Generates and checks populations of NPCs against a schema
pub struct NpcFactory;

impl NpcFactory {
    /// Generate `npc_count` entities
    ///
    /// Any error aborts the whole call; no partial group is returned.
    pub fn create<R>(
        schema: &TraitSchema,
        npc_count: usize,
        replacements: &[Replacement],
        random: &mut R,
    ) -> Result<NpcGroup, GenerationError>
    where
        R: RandomSource + ?Sized,
    {
        tracing::info!(
            "Generating {} NPCs from {} categories",
            npc_count,
            schema.categories().len()
        );
        let replacement_names = Self::replacement_map(schema, replacements)?;
        let output_categories = schema.output_categories();
        let seed_order = schema.dependency_graph().topological_order();

        let mut group = NpcGroup::new(output_categories.clone());
        for index in 0..npc_count {
            let picks = Self::resolve_npc(schema, &seed_order, &replacement_names, random)?;

            let mut npc = Npc::new();
            for output in &output_categories {
                npc.ensure_category(output.name.clone());
            }
            for (category, record) in picks {
                npc.add_trait(schema.categories()[category].output_name(), record);
            }
            tracing::trace!("NPC {} has {} traits", index, npc.trait_count());
            group.add(npc);
        }

        tracing::info!("Generated {} NPCs", group.len());
        Ok(group)
    }

    /// Whether the group satisfies the schema
    pub fn are_npcs_valid(
        group: &NpcGroup,
        schema: &TraitSchema,
        replacements: &[Replacement],
    ) -> bool {
        Self::find_violations(group, schema, replacements).is_valid()
    }

    pub fn find_violations(
        group: &NpcGroup,
        schema: &TraitSchema,
        replacements: &[Replacement],
    ) -> ValidationReport {
        check_npcs(group, schema, replacements)
    }

    fn replacement_map<'r>(
        schema: &TraitSchema,
        replacements: &'r [Replacement],
    ) -> Result<AHashMap<&'r TraitId, &'r str>, GenerationError> {
        let mut names = AHashMap::with_capacity(replacements.len());
        for replacement in replacements {
            if schema.find_trait(&replacement.original).is_none() {
                return Err(GenerationError::ReplacementTraitNotFound {
                    trait_id: replacement.original.clone(),
                });
            }
            if names
                .insert(&replacement.original, replacement.replacement_name.as_str())
                .is_some()
            {
                return Err(GenerationError::DuplicateReplacement {
                    trait_id: replacement.original.clone(),
                });
            }
        }
        Ok(names)
    }

    fn resolve_npc<R>(
        schema: &TraitSchema,
        seed_order: &[usize],
        replacement_names: &AHashMap<&TraitId, &str>,
        random: &mut R,
    ) -> Result<Vec<(usize, TraitRecord)>, GenerationError>
    where
        R: RandomSource + ?Sized,
    {
        let categories = schema.categories();
        let mut choosers: Vec<TraitChooser<'_>> = categories.iter().map(TraitChooser::new).collect();
        let mut npc = NpcInProgress { picks: Vec::new() };
        let mut queue: VecDeque<SelectionRequest> = seed_order
            .iter()
            .map(|&category| SelectionRequest {
                category,
                count: categories[category].default_selection_count(),
                deferred_at: None,
            })
            .collect();

        while let Some(request) = queue.pop_front() {
            if request.count == 0 {
                continue;
            }
            let category = &categories[request.category];

            if !category.is_unlocked_for(&npc) {
                let revision = npc.revision();
                if request.deferred_at == Some(revision) {
                    tracing::debug!(
                        "Dropping request for {} from locked category '{}'",
                        request.count,
                        category.name()
                    );
                } else {
                    tracing::debug!("Deferring locked category '{}'", category.name());
                    queue.push_back(SelectionRequest {
                        deferred_at: Some(revision),
                        ..request
                    });
                }
                continue;
            }

            let selection = choosers[request.category].choose(request.count, &npc, random)?;

            for chosen in &selection.traits {
                let id = category.trait_id(&chosen.name);
                let mut record = TraitRecord::new(category.name(), chosen.name.clone(), chosen.is_hidden);
                if let Some(name) = replacement_names.get(&id) {
                    record = record.replaced_with(*name);
                }
                npc.picks.push((request.category, record));
            }

            for (chosen, bonus) in selection
                .traits
                .iter()
                .filter_map(|t| t.bonus_selection.as_ref().map(|b| (t, b)))
            {
                let target = schema.category_index(&bonus.category_name).ok_or_else(|| {
                    GenerationError::MissingBonusSelectionCategory {
                        trait_id: category.trait_id(&chosen.name),
                        category: bonus.category_name.clone(),
                    }
                })?;
                tracing::debug!(
                    "'{}' grants {} bonus selections into '{}'",
                    chosen.name,
                    bonus.selection_count,
                    bonus.category_name
                );
                queue.push_back(SelectionRequest {
                    category: target,
                    count: bonus.selection_count,
                    deferred_at: None,
                });
            }
        }

        Ok(npc.picks)
    }
}
