//! Schema compliance checks for an already generated group.
//!
//! Checking never fails; every problem found is collected into the report.
//! Results depend only on the inputs, so checking the same group twice yields
//! the same report.

use ahash::AHashMap;

use crate::core::types::TraitId;
use crate::generation::npc::{Npc, NpcGroup};
use crate::schema::{Replacement, TraitSchema};
use crate::validation::violation::{ValidationReport, Violation};

/// Check every entity of `group` against `schema`
pub fn check_npcs(
    group: &NpcGroup,
    schema: &TraitSchema,
    replacements: &[Replacement],
) -> ValidationReport {
    let mut replacement_names: AHashMap<&TraitId, &str> = AHashMap::new();
    for replacement in replacements {
        replacement_names
            .entry(&replacement.original)
            .or_insert(replacement.replacement_name.as_str());
    }

    let report = ValidationReport {
        category_violations: check_categories(group, schema, replacements),
        npc_violations: group
            .iter()
            .map(|npc| check_npc(npc, schema, &replacement_names))
            .collect(),
    };

    tracing::info!(
        "Validated {} NPCs: {} violations",
        group.len(),
        report.total_count()
    );
    report
}

/// Checks evaluated once for the whole group
fn check_categories(
    group: &NpcGroup,
    schema: &TraitSchema,
    replacements: &[Replacement],
) -> Vec<Violation> {
    let mut violations = Vec::new();
    let expected_outputs = schema.output_categories();

    for actual in group.category_order() {
        match expected_outputs.iter().find(|o| o.name == actual.name) {
            None => violations.push(Violation::CategoryNotFoundInSchema {
                category: actual.name.clone(),
            }),
            Some(expected) if actual.is_hidden && !expected.is_hidden => {
                violations.push(Violation::CategoryIsIncorrectlyHidden {
                    category: actual.name.clone(),
                })
            }
            Some(expected) if !actual.is_hidden && expected.is_hidden => {
                violations.push(Violation::CategoryIsIncorrectlyNotHidden {
                    category: actual.name.clone(),
                })
            }
            Some(_) => {}
        }
    }

    if let Some(declared) = schema.declared_category_order() {
        let actual: Vec<&str> = group
            .category_order()
            .iter()
            .map(|category| category.name.as_str())
            .collect();
        if !follows_order(declared, &actual) {
            violations.push(Violation::CategoryOrderIncorrect {
                expected: declared.to_vec(),
                actual: actual.iter().map(|name| name.to_string()).collect(),
            });
        }
    }

    for replacement in replacements {
        let used = group.iter().any(|npc| {
            npc.records().any(|(_, record)| {
                record.original_category == replacement.original.category
                    && record.original_name == replacement.original.name
                    && record.name == replacement.replacement_name
            })
        });
        if !used {
            violations.push(Violation::UnusedReplacement {
                trait_id: replacement.original.clone(),
                replacement_name: replacement.replacement_name.clone(),
            });
        }
    }

    violations
}

/// Whether every declared name appears in `actual`, in the declared relative order
///
/// Unlisted names may appear anywhere.
fn follows_order(declared: &[String], actual: &[&str]) -> bool {
    let mut last_position: Option<usize> = None;
    for name in declared {
        let Some(position) = actual.iter().position(|a| a == name) else {
            return false;
        };
        if last_position.map_or(false, |last| position <= last) {
            return false;
        }
        last_position = Some(position);
    }
    true
}

fn check_npc(
    npc: &Npc,
    schema: &TraitSchema,
    replacement_names: &AHashMap<&TraitId, &str>,
) -> Vec<Violation> {
    let mut violations = Vec::new();
    let mut unknown_categories: Vec<&str> = Vec::new();

    for output_name in npc.output_category_names() {
        if schema.categories_with_output(output_name).is_empty() {
            unknown_categories.push(output_name);
        }
    }

    for (_, record) in npc.records() {
        let Some(category) = schema.category(&record.original_category) else {
            if !unknown_categories.contains(&record.original_category.as_str()) {
                unknown_categories.push(&record.original_category);
            }
            continue;
        };
        let original_id = record.original_id();
        let Some(item) = category.get_trait(&record.original_name) else {
            violations.push(Violation::TraitNotFoundInSchema {
                trait_id: original_id,
            });
            continue;
        };

        let replacement = replacement_names.get(&original_id).copied();
        if record.is_replaced() {
            if replacement != Some(record.name.as_str()) {
                violations.push(Violation::TraitNotFoundInSchema {
                    trait_id: record.visible_id(),
                });
            }
        } else if let Some(name) = replacement {
            violations.push(Violation::UnusedReplacement {
                trait_id: original_id.clone(),
                replacement_name: name.to_string(),
            });
        }

        if record.is_hidden && !item.is_hidden {
            violations.push(Violation::TraitIsIncorrectlyHidden {
                trait_id: original_id.clone(),
            });
        } else if !record.is_hidden && item.is_hidden {
            violations.push(Violation::TraitIsIncorrectlyNotHidden {
                trait_id: original_id.clone(),
            });
        }

        if !category.is_unlocked_for(npc) {
            violations.push(Violation::HasTraitInLockedCategory {
                trait_id: original_id,
            });
        } else if !item.is_unlocked_for(npc) {
            violations.push(Violation::HasLockedTrait {
                trait_id: original_id,
            });
        }
    }

    // Locked categories are legitimately short, so only unlocked ones are counted
    for category in schema.categories() {
        if !category.is_unlocked_for(npc) {
            continue;
        }
        // Counts are unbounded, so the expectation saturates instead of overflowing
        let expected = npc
            .records()
            .filter_map(|(_, record)| schema.find_trait(&record.original_id()))
            .filter_map(|item| item.bonus_selection.as_ref())
            .filter(|bonus| bonus.category_name == category.name())
            .fold(u64::from(category.default_selection_count()), |total, bonus| {
                total.saturating_add(u64::from(bonus.selection_count))
            });
        let expected = usize::try_from(expected).unwrap_or(usize::MAX);
        let actual = npc.count_from(category.name());

        if actual < expected {
            violations.push(Violation::TooFewTraitsInCategory {
                category: category.name().to_string(),
                expected,
                actual,
            });
        } else if actual > expected {
            violations.push(Violation::TooManyTraitsInCategory {
                category: category.name().to_string(),
                expected,
                actual,
            });
        }
    }

    let mut all: Vec<Violation> = unknown_categories
        .into_iter()
        .map(|name| Violation::CategoryNotFoundInSchema {
            category: name.to_string(),
        })
        .collect();
    all.append(&mut violations);
    all
}
