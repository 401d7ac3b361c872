//! The complete trait schema: categories, replacement declarations and
//! category display order.
//!
//! A schema is assembled once (usually by the definition loader), checked with
//! [`TraitSchema::validate`], and then treated as read-only by generation and
//! validation.

use std::collections::HashSet;
use std::sync::OnceLock;

use crate::core::error::SchemaError;
use crate::core::types::TraitId;
use crate::schema::category::{Trait, TraitCategory};
use crate::schema::dependency::DependencyGraph;
use crate::schema::replacement::ReplacementSearch;
use crate::schema::requirement::Requirement;

/// One column of generated output: an output name and whether it is shown
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct OutputCategory {
    pub name: String,
    pub is_hidden: bool,
}

/// Full set of categories plus replacement declarations and display order
#[derive(Debug, Clone, Default)]
pub struct TraitSchema {
    categories: Vec<TraitCategory>,
    replacement_searches: Vec<ReplacementSearch>,
    category_order: Option<Vec<String>>,
    /// Built on first use, cleared whenever a category is added
    dependency_graph: OnceLock<DependencyGraph>,
}

impl TraitSchema {
    /// Create a new empty schema
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a category; names must be unique within the schema
    pub fn add_category(&mut self, category: TraitCategory) -> Result<(), SchemaError> {
        if self.category(category.name()).is_some() {
            return Err(SchemaError::DuplicateCategory {
                name: category.name().to_string(),
            });
        }
        self.categories.push(category);
        self.dependency_graph = OnceLock::new();
        Ok(())
    }

    pub fn add_replacement_search(&mut self, search: ReplacementSearch) {
        self.replacement_searches.push(search);
    }

    /// Declare a full or partial display order over output category names
    pub fn set_category_order(&mut self, order: Vec<String>) {
        self.category_order = Some(order);
    }

    pub fn categories(&self) -> &[TraitCategory] {
        &self.categories
    }

    pub fn category(&self, name: &str) -> Option<&TraitCategory> {
        self.categories.iter().find(|c| c.name() == name)
    }

    pub fn category_index(&self, name: &str) -> Option<usize> {
        self.categories.iter().position(|c| c.name() == name)
    }

    pub fn find_trait(&self, id: &TraitId) -> Option<&Trait> {
        self.category(&id.category)
            .and_then(|category| category.get_trait(&id.name))
    }

    pub fn replacement_searches(&self) -> &[ReplacementSearch] {
        &self.replacement_searches
    }

    pub fn is_replaceable(&self, id: &TraitId) -> bool {
        self.replacement_searches
            .iter()
            .any(|search| &search.trait_id == id)
    }

    pub fn declared_category_order(&self) -> Option<&[String]> {
        self.category_order.as_deref()
    }

    /// Categories merged under the given output name, in schema order
    pub fn categories_with_output(&self, output_name: &str) -> Vec<&TraitCategory> {
        self.categories
            .iter()
            .filter(|c| c.output_name() == output_name)
            .collect()
    }

    /// Display order of output categories
    ///
    /// Names from the declared order come first; remaining output names follow
    /// in the order they first appear among the categories. An output category
    /// is hidden only if every category merged into it is hidden.
    pub fn output_categories(&self) -> Vec<OutputCategory> {
        let mut names: Vec<&str> = Vec::new();
        if let Some(order) = &self.category_order {
            for name in order {
                if !names.contains(&name.as_str()) {
                    names.push(name);
                }
            }
        }
        for category in &self.categories {
            if !names.contains(&category.output_name()) {
                names.push(category.output_name());
            }
        }

        names
            .into_iter()
            .map(|name| OutputCategory {
                name: name.to_string(),
                is_hidden: self.categories_with_output(name).iter().all(|c| c.is_hidden()),
            })
            .collect()
    }

    pub fn dependency_graph(&self) -> &DependencyGraph {
        self.dependency_graph
            .get_or_init(|| DependencyGraph::build(&self.categories))
    }

    /// Check structural correctness and acyclicity
    ///
    /// Returns the first problem found. Checks run in a fixed order: names,
    /// expression structure, references, replacement targets, display order,
    /// self-reference, then cycles.
    pub fn validate(&self) -> Result<(), SchemaError> {
        for category in &self.categories {
            if category.name().is_empty() {
                return Err(SchemaError::EmptyName { kind: "category" });
            }
            if category.output_name().is_empty() {
                return Err(SchemaError::EmptyName {
                    kind: "output category",
                });
            }
            for item in category.traits() {
                if item.name.is_empty() {
                    return Err(SchemaError::EmptyName { kind: "trait" });
                }
            }
        }

        for category in &self.categories {
            if let Some(requirement) = category.requirement() {
                self.check_requirement(requirement)?;
            }
            for item in category.traits() {
                if let Some(requirement) = &item.requirement {
                    self.check_requirement(requirement)?;
                }
                if let Some(bonus) = &item.bonus_selection {
                    if self.category(&bonus.category_name).is_none() {
                        return Err(SchemaError::MissingBonusSelectionCategory {
                            trait_id: category.trait_id(&item.name),
                            category: bonus.category_name.clone(),
                        });
                    }
                }
            }
        }

        for search in &self.replacement_searches {
            if self.find_trait(&search.trait_id).is_none() {
                return Err(SchemaError::MissingReplacementTrait {
                    trait_id: search.trait_id.clone(),
                });
            }
        }

        if let Some(order) = &self.category_order {
            let mut seen = HashSet::new();
            for name in order {
                if self.categories_with_output(name).is_empty() {
                    return Err(SchemaError::UnknownOrderedCategory { name: name.clone() });
                }
                if !seen.insert(name.as_str()) {
                    return Err(SchemaError::DuplicateOrderedCategory { name: name.clone() });
                }
            }
        }

        for category in &self.categories {
            for item in category.traits() {
                let own_id = category.trait_id(&item.name);
                let requires_itself = item
                    .requirement
                    .as_ref()
                    .map_or(false, |r| r.referenced_traits().contains(&&own_id));
                if requires_itself {
                    return Err(SchemaError::SelfRequiringTrait { trait_id: own_id });
                }
            }
        }

        let graph = self.dependency_graph();
        tracing::debug!(
            "Checking {} dependency edges across {} categories",
            graph.edge_count(),
            graph.node_count()
        );
        if let Some(cycle) = graph.find_cycle() {
            tracing::warn!("Schema has a dependency cycle of length {}", cycle.len());
            if cycle.len() == 1 {
                return Err(SchemaError::SelfRequiringCategory {
                    category: cycle[0].dependent_category.clone(),
                });
            }
            return Err(SchemaError::CircularRequirements { cycle });
        }

        Ok(())
    }

    /// Unknown trait names in a known category are accepted; such a leaf
    /// never matches.
    fn check_requirement(&self, requirement: &Requirement) -> Result<(), SchemaError> {
        requirement.expression().check_structure()?;
        for id in requirement.referenced_traits() {
            if self.category(&id.category).is_none() {
                return Err(SchemaError::MissingRequirementCategory {
                    category: id.category.clone(),
                });
            }
        }
        Ok(())
    }
}
