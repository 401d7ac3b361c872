//! Traits and the categories that pool them.

use crate::core::error::SchemaError;
use crate::core::types::{TraitId, TraitSet};
use crate::schema::requirement::Requirement;

/// Extra picks granted when the owning trait is chosen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BonusSelection {
    /// Category the extra picks are drawn from (may be the trait's own category)
    pub category_name: String,
    pub selection_count: u32,
}

impl BonusSelection {
    pub fn new(category_name: impl Into<String>, selection_count: u32) -> Self {
        Self {
            category_name: category_name.into(),
            selection_count,
        }
    }
}

/// A weighted option inside a category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trait {
    pub name: String,
    /// Relative draw weight; zero makes the trait unselectable
    pub weight: u32,
    /// Hidden traits are generated normally but left out of rendered output
    pub is_hidden: bool,
    pub requirement: Option<Requirement>,
    pub bonus_selection: Option<BonusSelection>,
}

impl Trait {
    pub fn new(name: impl Into<String>, weight: u32) -> Self {
        Self {
            name: name.into(),
            weight,
            is_hidden: false,
            requirement: None,
            bonus_selection: None,
        }
    }

    pub fn hidden(mut self) -> Self {
        self.is_hidden = true;
        self
    }

    pub fn with_requirement(mut self, requirement: impl Into<Requirement>) -> Self {
        self.requirement = Some(requirement.into());
        self
    }

    pub fn with_bonus_selection(mut self, bonus: BonusSelection) -> Self {
        self.bonus_selection = Some(bonus);
        self
    }

    /// Whether the trait's own requirement (if any) is satisfied
    pub fn is_unlocked_for<S: TraitSet + ?Sized>(&self, npc: &S) -> bool {
        self.requirement
            .as_ref()
            .map_or(true, |requirement| requirement.is_unlocked_for(npc))
    }
}

/// Named, weighted pool of traits
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraitCategory {
    name: String,
    output_name: String,
    default_selection_count: u32,
    is_hidden: bool,
    requirement: Option<Requirement>,
    traits: Vec<Trait>,
}

impl TraitCategory {
    pub fn new(name: impl Into<String>, default_selection_count: u32) -> Self {
        let name = name.into();
        Self {
            output_name: name.clone(),
            name,
            default_selection_count,
            is_hidden: false,
            requirement: None,
            traits: Vec::new(),
        }
    }

    /// Expose this category's picks under another (possibly shared) name
    pub fn with_output_name(mut self, output_name: impl Into<String>) -> Self {
        self.output_name = output_name.into();
        self
    }

    pub fn with_requirement(mut self, requirement: impl Into<Requirement>) -> Self {
        self.requirement = Some(requirement.into());
        self
    }

    pub fn hidden(mut self) -> Self {
        self.is_hidden = true;
        self
    }

    /// Append a trait; names must be unique within the category
    pub fn add_trait(&mut self, new_trait: Trait) -> Result<(), SchemaError> {
        if self.has_trait_named(&new_trait.name) {
            return Err(SchemaError::DuplicateTrait {
                category: self.name.clone(),
                name: new_trait.name,
            });
        }
        self.traits.push(new_trait);
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn output_name(&self) -> &str {
        &self.output_name
    }

    pub fn default_selection_count(&self) -> u32 {
        self.default_selection_count
    }

    pub fn is_hidden(&self) -> bool {
        self.is_hidden
    }

    pub fn requirement(&self) -> Option<&Requirement> {
        self.requirement.as_ref()
    }

    pub fn traits(&self) -> &[Trait] {
        &self.traits
    }

    pub fn get_trait(&self, name: &str) -> Option<&Trait> {
        self.traits.iter().find(|t| t.name == name)
    }

    pub fn has_trait_named(&self, name: &str) -> bool {
        self.get_trait(name).is_some()
    }

    pub fn trait_id(&self, trait_name: &str) -> TraitId {
        TraitId::new(self.name.clone(), trait_name)
    }

    /// Whether the category-level requirement (if any) is satisfied
    ///
    /// A locked category contributes nothing; that is not an error.
    pub fn is_unlocked_for<S: TraitSet + ?Sized>(&self, npc: &S) -> bool {
        self.requirement
            .as_ref()
            .map_or(true, |requirement| requirement.is_unlocked_for(npc))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::requirement::LogicalExpression;

    struct NoTraits;

    impl TraitSet for NoTraits {
        fn has_trait(&self, _id: &TraitId) -> bool {
            false
        }
    }

    #[test]
    fn test_output_name_defaults_to_name() {
        let category = TraitCategory::new("Colour", 1);
        assert_eq!(category.output_name(), "Colour");

        let merged = TraitCategory::new("Young Fame", 1).with_output_name("Fame");
        assert_eq!(merged.name(), "Young Fame");
        assert_eq!(merged.output_name(), "Fame");
    }

    #[test]
    fn test_duplicate_trait_rejected_even_with_other_attributes() {
        let mut category = TraitCategory::new("Colour", 1);
        category.add_trait(Trait::new("Blue", 1)).unwrap();
        let result = category.add_trait(Trait::new("Blue", 5).hidden());
        assert_eq!(
            result,
            Err(SchemaError::DuplicateTrait {
                category: "Colour".to_string(),
                name: "Blue".to_string(),
            })
        );
        assert_eq!(category.traits().len(), 1);
    }

    #[test]
    fn test_trait_lookup() {
        let mut category = TraitCategory::new("Colour", 1);
        category.add_trait(Trait::new("Blue", 1)).unwrap();
        category.add_trait(Trait::new("Red", 2)).unwrap();
        assert_eq!(category.get_trait("Red").map(|t| t.weight), Some(2));
        assert!(category.get_trait("Green").is_none());
        assert_eq!(category.trait_id("Red"), TraitId::new("Colour", "Red"));
    }

    #[test]
    fn test_category_lock() {
        let open = TraitCategory::new("Colour", 1);
        assert!(open.is_unlocked_for(&NoTraits));

        let locked = TraitCategory::new("Animal", 1)
            .with_requirement(LogicalExpression::has_trait("Colour", "Blue"));
        assert!(!locked.is_unlocked_for(&NoTraits));
    }

    #[test]
    fn test_trait_lock() {
        let gated = Trait::new("Bear", 1).with_requirement(LogicalExpression::AlwaysFalse);
        assert!(!gated.is_unlocked_for(&NoTraits));
        assert!(Trait::new("Wolf", 1).is_unlocked_for(&NoTraits));
    }
}
