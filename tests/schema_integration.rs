//! Schema loading and cycle detection integration tests

use npc_generator::core::error::SchemaError;
use npc_generator::core::types::TraitId;
use npc_generator::definition::{load_schema_str, DefinitionError};
use npc_generator::schema::{Dependency, DependencyType};

fn schema_error(text: &str) -> SchemaError {
    match load_schema_str(text) {
        Err(DefinitionError::Schema(err)) => err,
        other => panic!("expected a schema error, got {:?}", other.map(|_| ())),
    }
}

/// k categories, each granting a bonus into the next, the last back into the first
fn bonus_ring(k: usize) -> String {
    let mut text = String::new();
    for i in 0..k {
        text.push_str(&format!(
            "[[categories]]\nname = \"C{i}\"\n  [[categories.traits]]\n  name = \"t{i}\"\n  bonus = {{ category = \"C{next}\" }}\n\n",
            i = i,
            next = (i + 1) % k
        ));
    }
    text
}

#[test]
fn test_two_category_requirement_cycle() {
    let err = schema_error(
        r#"
[[categories]]
name = "A"
requires = "B: b"
  [[categories.traits]]
  name = "a"

[[categories]]
name = "B"
requires = "A: a"
  [[categories.traits]]
  name = "b"
"#,
    );
    match err {
        SchemaError::CircularRequirements { cycle } => {
            assert_eq!(cycle.len(), 2);
            assert_eq!(
                cycle[0],
                Dependency::new("A", "B", DependencyType::Requirement)
            );
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn test_bonus_chain_cycles_of_length_k() {
    for k in 2..6 {
        match schema_error(&bonus_ring(k)) {
            SchemaError::CircularRequirements { cycle } => {
                assert_eq!(cycle.len(), k);
                assert!(cycle
                    .iter()
                    .all(|dependency| dependency.kind == DependencyType::BonusSelection));
            }
            other => panic!("k = {}: unexpected error {:?}", k, other),
        }
    }
}

#[test]
fn test_mixed_cycle_detected() {
    let err = schema_error(
        r#"
[[categories]]
name = "A"
requires = "B: b"
  [[categories.traits]]
  name = "a"

[[categories]]
name = "B"
  [[categories.traits]]
  name = "b"
  bonus = { category = "A" }
"#,
    );
    assert_eq!(
        err,
        SchemaError::CircularRequirements {
            cycle: vec![
                Dependency::new("A", "B", DependencyType::Requirement),
                Dependency::new("B", "A", DependencyType::BonusSelection),
            ]
        }
    );
    assert!(err.to_string().contains("B grants bonus selections into A"));
}

#[test]
fn test_self_references() {
    let err = schema_error(
        r#"
[[categories]]
name = "Colour"
  [[categories.traits]]
  name = "Blue"
  requires = "Colour: Blue"
"#,
    );
    assert_eq!(
        err,
        SchemaError::SelfRequiringTrait {
            trait_id: TraitId::new("Colour", "Blue")
        }
    );

    let err = schema_error(
        r#"
[[categories]]
name = "Colour"
requires = "Any[Colour: Blue, Animal: Bear]"
  [[categories.traits]]
  name = "Blue"

[[categories]]
name = "Animal"
  [[categories.traits]]
  name = "Bear"
"#,
    );
    assert_eq!(
        err,
        SchemaError::SelfRequiringCategory {
            category: "Colour".to_string()
        }
    );
}

#[test]
fn test_dependency_graph_exposed() {
    let schema = load_schema_str(
        r#"
[[categories]]
name = "Colour"
  [[categories.traits]]
  name = "Blue"
  bonus = { category = "Colour" }

[[categories]]
name = "Animal"
requires = "Colour: Blue"
  [[categories.traits]]
  name = "Bear"
  requires = "Colour: Blue"
  bonus = { category = "Fame", selections = 2 }

[[categories]]
name = "Fame"
selections = 0
  [[categories.traits]]
  name = "Hero"
  [[categories.traits]]
  name = "Legend"
"#,
    )
    .unwrap();

    let graph = schema.dependency_graph();
    assert_eq!(graph.node_count(), 3);
    assert_eq!(graph.edge_count(), 2);
    assert_eq!(
        graph.dependencies_of("Animal"),
        vec![
            Dependency::new("Animal", "Colour", DependencyType::Requirement),
            Dependency::new("Animal", "Fame", DependencyType::BonusSelection),
        ]
    );
    assert!(graph.dependencies_of("Colour").is_empty());
    assert!(graph.find_cycle().is_none());
}

#[test]
fn test_structural_errors_surface_names() {
    let err = schema_error(
        r#"
[[categories]]
name = "Colour"
  [[categories.traits]]
  name = "Blue"

[[categories]]
name = "Colour"
  [[categories.traits]]
  name = "Red"
"#,
    );
    assert_eq!(err.to_string(), "Duplicate category: Colour");

    let err = schema_error(
        r#"
[[categories]]
name = "Colour"
requires = "Any[]"
  [[categories.traits]]
  name = "Blue"
"#,
    );
    assert_eq!(
        err,
        SchemaError::EmptyOperands {
            operator: "Any".to_string()
        }
    );

    let err = schema_error(
        r#"
[[categories]]
name = "Colour"
  [[categories.traits]]
  name = "Blue"

[[replaceable]]
category = "Colour"
trait = "Purple"
"#,
    );
    assert_eq!(
        err,
        SchemaError::MissingReplacementTrait {
            trait_id: TraitId::new("Colour", "Purple")
        }
    );

    let err = schema_error(
        r#"
[[categories]]
name = "Colour"
  [[categories.traits]]
  name = "Blue"
  bonus = { category = "Animal" }
"#,
    );
    assert!(matches!(err, SchemaError::MissingBonusSelectionCategory { .. }));
}
