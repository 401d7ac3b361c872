//! Generated entities and the group returned by a generation call.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::types::{TraitId, TraitSet};
use crate::schema::OutputCategory;

/// One chosen trait as recorded on an entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraitRecord {
    /// Visible name (the replacement name when a replacement applied)
    pub name: String,
    pub original_name: String,
    /// Schema category the trait was drawn from, independent of output merging
    pub original_category: String,
    pub is_hidden: bool,
}

impl TraitRecord {
    pub fn new(category: impl Into<String>, name: impl Into<String>, is_hidden: bool) -> Self {
        let name = name.into();
        Self {
            original_name: name.clone(),
            name,
            original_category: category.into(),
            is_hidden,
        }
    }

    pub fn replaced_with(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn is_replaced(&self) -> bool {
        self.name != self.original_name
    }

    /// Schema identity of the drawn trait
    pub fn original_id(&self) -> TraitId {
        TraitId::new(self.original_category.clone(), self.original_name.clone())
    }

    /// Identity seen by requirement evaluation
    pub fn visible_id(&self) -> TraitId {
        TraitId::new(self.original_category.clone(), self.name.clone())
    }

    pub(crate) fn matches(&self, id: &TraitId) -> bool {
        self.original_category == id.category && self.name == id.name
    }
}

/// A generated entity: chosen trait records keyed by output category name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Npc {
    traits: BTreeMap<String, Vec<TraitRecord>>,
}

impl Npc {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an output category with no traits yet
    pub fn ensure_category(&mut self, output_name: impl Into<String>) {
        self.traits.entry(output_name.into()).or_default();
    }

    pub fn add_trait(&mut self, output_name: impl Into<String>, record: TraitRecord) {
        self.traits.entry(output_name.into()).or_default().push(record);
    }

    pub fn has_output_category(&self, output_name: &str) -> bool {
        self.traits.contains_key(output_name)
    }

    /// Records under an output category; empty when the category is absent
    pub fn traits_of(&self, output_name: &str) -> &[TraitRecord] {
        self.traits
            .get(output_name)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn trait_names_of(&self, output_name: &str) -> Vec<&str> {
        self.traits_of(output_name)
            .iter()
            .map(|record| record.name.as_str())
            .collect()
    }

    /// Visible (non-hidden) trait names under an output category
    pub fn visible_trait_names_of(&self, output_name: &str) -> Vec<&str> {
        self.traits_of(output_name)
            .iter()
            .filter(|record| !record.is_hidden)
            .map(|record| record.name.as_str())
            .collect()
    }

    pub fn output_category_names(&self) -> impl Iterator<Item = &str> {
        self.traits.keys().map(String::as_str)
    }

    /// Every record paired with its output category name
    pub fn records(&self) -> impl Iterator<Item = (&str, &TraitRecord)> {
        self.traits.iter().flat_map(|(output_name, records)| {
            records
                .iter()
                .map(move |record| (output_name.as_str(), record))
        })
    }

    /// Number of records drawn from a schema category
    pub fn count_from(&self, category: &str) -> usize {
        self.records()
            .filter(|(_, record)| record.original_category == category)
            .count()
    }

    pub fn trait_count(&self) -> usize {
        self.traits.values().map(Vec::len).sum()
    }
}

impl TraitSet for Npc {
    fn has_trait(&self, id: &TraitId) -> bool {
        self.records().any(|(_, record)| record.matches(id))
    }
}

/// Ordered entities plus the display order of their output categories
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NpcGroup {
    category_order: Vec<OutputCategory>,
    npcs: Vec<Npc>,
}

impl NpcGroup {
    pub fn new(category_order: Vec<OutputCategory>) -> Self {
        Self {
            category_order,
            npcs: Vec::new(),
        }
    }

    pub fn add(&mut self, npc: Npc) {
        self.npcs.push(npc);
    }

    pub fn npcs(&self) -> &[Npc] {
        &self.npcs
    }

    pub fn get(&self, index: usize) -> Option<&Npc> {
        self.npcs.get(index)
    }

    pub fn len(&self) -> usize {
        self.npcs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.npcs.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Npc> {
        self.npcs.iter()
    }

    /// Full display order, hidden categories included
    pub fn category_order(&self) -> &[OutputCategory] {
        &self.category_order
    }

    pub fn visible_category_order(&self) -> Vec<&str> {
        self.category_order
            .iter()
            .filter(|category| !category.is_hidden)
            .map(|category| category.name.as_str())
            .collect()
    }
}

impl<'a> IntoIterator for &'a NpcGroup {
    type Item = &'a Npc;
    type IntoIter = std::slice::Iter<'a, Npc>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replaced_record_keeps_original() {
        let record = TraitRecord::new("Animal", "Velociraptor", false).replaced_with("Tyrannosaurus Rex");
        assert!(record.is_replaced());
        assert_eq!(record.original_id(), TraitId::new("Animal", "Velociraptor"));
        assert_eq!(record.visible_id(), TraitId::new("Animal", "Tyrannosaurus Rex"));
    }

    #[test]
    fn test_merged_output_category() {
        let mut npc = Npc::new();
        npc.ensure_category("Colour");
        npc.add_trait("Fame", TraitRecord::new("Young Fame", "Hero", false));
        npc.add_trait("Fame", TraitRecord::new("Old Fame", "Legend", true));

        assert!(npc.traits_of("Colour").is_empty());
        assert!(npc.traits_of("Young Fame").is_empty());
        assert_eq!(npc.trait_names_of("Fame"), vec!["Hero", "Legend"]);
        assert_eq!(npc.visible_trait_names_of("Fame"), vec!["Hero"]);
        assert_eq!(npc.count_from("Old Fame"), 1);
        assert_eq!(npc.trait_count(), 2);
        assert_eq!(npc.output_category_names().collect::<Vec<_>>(), vec!["Colour", "Fame"]);
    }

    #[test]
    fn test_trait_set_uses_visible_name() {
        let mut npc = Npc::new();
        npc.add_trait(
            "Animal",
            TraitRecord::new("Animal", "Velociraptor", false).replaced_with("Rex"),
        );
        assert!(npc.has_trait(&TraitId::new("Animal", "Rex")));
        assert!(!npc.has_trait(&TraitId::new("Animal", "Velociraptor")));
    }

    #[test]
    fn test_visible_category_order() {
        let group = NpcGroup::new(vec![
            OutputCategory {
                name: "Colour".to_string(),
                is_hidden: false,
            },
            OutputCategory {
                name: "Secret".to_string(),
                is_hidden: true,
            },
        ]);
        assert_eq!(group.visible_category_order(), vec!["Colour"]);
        assert_eq!(group.category_order().len(), 2);
        assert!(group.is_empty());
    }

    #[test]
    fn test_group_serializes() {
        let mut group = NpcGroup::new(vec![OutputCategory {
            name: "Colour".to_string(),
            is_hidden: false,
        }]);
        let mut npc = Npc::new();
        npc.add_trait("Colour", TraitRecord::new("Colour", "Blue", false));
        group.add(npc);

        let json = serde_json::to_string(&group).unwrap();
        let back: NpcGroup = serde_json::from_str(&json).unwrap();
        assert_eq!(back, group);
    }
}
