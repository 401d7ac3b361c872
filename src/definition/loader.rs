//! TOML schema definitions and their assembly into a `TraitSchema`.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::core::error::SchemaError;
use crate::core::types::TraitId;
use crate::definition::parser::parse_requirement;
use crate::schema::{BonusSelection, ReplacementSearch, Trait, TraitCategory, TraitSchema};

/// Errors raised while reading or assembling a schema definition
#[derive(Error, Debug)]
pub enum DefinitionError {
    #[error("Failed to read schema file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse schema TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid schema: {0}")]
    Schema(#[from] SchemaError),
}

/// Root of a schema definition file
#[derive(Debug, Clone, Deserialize)]
pub struct SchemaDefinition {
    #[serde(default)]
    pub category_order: Option<Vec<String>>,
    #[serde(default)]
    pub categories: Vec<CategoryDefinition>,
    #[serde(default)]
    pub replaceable: Vec<ReplaceableDefinition>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CategoryDefinition {
    pub name: String,
    #[serde(default = "default_selections")]
    pub selections: u32,
    #[serde(default)]
    pub output_name: Option<String>,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub requires: Option<String>,
    #[serde(default)]
    pub traits: Vec<TraitDefinition>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TraitDefinition {
    pub name: String,
    #[serde(default = "default_weight")]
    pub weight: u32,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub requires: Option<String>,
    #[serde(default)]
    pub bonus: Option<BonusDefinition>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BonusDefinition {
    pub category: String,
    #[serde(default = "default_selections")]
    pub selections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReplaceableDefinition {
    pub category: String,
    #[serde(rename = "trait")]
    pub trait_name: String,
}

fn default_selections() -> u32 {
    1
}

fn default_weight() -> u32 {
    1
}

impl SchemaDefinition {
    pub fn from_toml_str(content: &str) -> Result<Self, DefinitionError> {
        Ok(toml::from_str(content)?)
    }

    /// Build the schema and run structural validation on it
    pub fn into_schema(self) -> Result<TraitSchema, DefinitionError> {
        let mut schema = TraitSchema::new();

        for category_def in self.categories {
            let mut category = TraitCategory::new(category_def.name, category_def.selections);
            if let Some(output_name) = category_def.output_name {
                category = category.with_output_name(output_name);
            }
            if category_def.hidden {
                category = category.hidden();
            }
            if let Some(text) = &category_def.requires {
                category = category.with_requirement(parse_requirement(text)?);
            }

            for trait_def in category_def.traits {
                let mut item = Trait::new(trait_def.name, trait_def.weight);
                if trait_def.hidden {
                    item = item.hidden();
                }
                if let Some(text) = &trait_def.requires {
                    item = item.with_requirement(parse_requirement(text)?);
                }
                if let Some(bonus) = trait_def.bonus {
                    item = item.with_bonus_selection(BonusSelection::new(
                        bonus.category,
                        bonus.selections,
                    ));
                }
                category.add_trait(item)?;
            }

            schema.add_category(category)?;
        }

        for replaceable in self.replaceable {
            schema.add_replacement_search(ReplacementSearch::new(TraitId::new(
                replaceable.category,
                replaceable.trait_name,
            )));
        }

        if let Some(order) = self.category_order {
            schema.set_category_order(order);
        }

        schema.validate()?;
        tracing::debug!(
            "Assembled schema with {} categories and {} replaceable traits",
            schema.categories().len(),
            schema.replacement_searches().len()
        );
        Ok(schema)
    }
}

/// Parse and validate a schema from TOML text
pub fn load_schema_str(content: &str) -> Result<TraitSchema, DefinitionError> {
    SchemaDefinition::from_toml_str(content)?.into_schema()
}

/// Load and validate a schema from a TOML file
pub fn load_schema_file(path: &Path) -> Result<TraitSchema, DefinitionError> {
    let content = std::fs::read_to_string(path)?;
    let schema = load_schema_str(&content)?;
    tracing::info!("Loaded schema from {}", path.display());
    Ok(schema)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::LogicalExpression;

    const ZOO: &str = r#"
category_order = ["Creature"]

[[categories]]
name = "Colour"

  [[categories.traits]]
  name = "Blue"
  bonus = { category = "Colour" }

  [[categories.traits]]
  name = "Red"
  weight = 3
  hidden = true

[[categories]]
name = "Animal"
selections = 2
output_name = "Creature"
requires = "Colour: Blue"

  [[categories.traits]]
  name = "Bear"

  [[categories.traits]]
  name = "Velociraptor"
  requires = "None[Colour: Red]"

[[replaceable]]
category = "Animal"
trait = "Velociraptor"
"#;

    #[test]
    fn test_defaults_applied() {
        let definition = SchemaDefinition::from_toml_str(ZOO).unwrap();
        let colour = &definition.categories[0];
        assert_eq!(colour.selections, 1);
        assert!(!colour.hidden);
        assert_eq!(colour.traits[0].weight, 1);
        assert_eq!(colour.traits[0].bonus.as_ref().map(|b| b.selections), Some(1));
    }

    #[test]
    fn test_into_schema() {
        let schema = load_schema_str(ZOO).unwrap();
        let animal = schema.category("Animal").unwrap();
        assert_eq!(animal.default_selection_count(), 2);
        assert_eq!(animal.output_name(), "Creature");
        assert_eq!(
            animal.requirement().map(|r| r.expression().clone()),
            Some(LogicalExpression::has_trait("Colour", "Blue"))
        );

        let red = schema.find_trait(&TraitId::new("Colour", "Red")).unwrap();
        assert_eq!(red.weight, 3);
        assert!(red.is_hidden);

        assert!(schema.is_replaceable(&TraitId::new("Animal", "Velociraptor")));
        assert_eq!(schema.declared_category_order(), Some(&["Creature".to_string()][..]));
    }

    #[test]
    fn test_negative_weight_rejected() {
        let text = r#"
[[categories]]
name = "Colour"
  [[categories.traits]]
  name = "Blue"
  weight = -1
"#;
        assert!(matches!(load_schema_str(text), Err(DefinitionError::Toml(_))));
    }

    #[test]
    fn test_duplicate_trait_surfaces_schema_error() {
        let text = r#"
[[categories]]
name = "Colour"
  [[categories.traits]]
  name = "Blue"
  [[categories.traits]]
  name = "Blue"
  weight = 4
"#;
        assert!(matches!(
            load_schema_str(text),
            Err(DefinitionError::Schema(SchemaError::DuplicateTrait { .. }))
        ));
    }

    #[test]
    fn test_bad_requirement_text() {
        let text = r#"
[[categories]]
name = "Colour"
requires = "Maybe[Animal: Bear]"
  [[categories.traits]]
  name = "Blue"
"#;
        assert!(matches!(
            load_schema_str(text),
            Err(DefinitionError::Schema(SchemaError::UnknownLogicalOperator { .. }))
        ));
    }

    #[test]
    fn test_missing_file() {
        let result = load_schema_file(Path::new("/definitely/not/here.toml"));
        assert!(matches!(result, Err(DefinitionError::Io(_))));
    }
}
