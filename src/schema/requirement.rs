//! Requirement expressions that gate traits and categories.
//!
//! A requirement is a boolean expression tree whose leaves test whether the
//! entity under evaluation carries a particular trait. Evaluation is a pure
//! function of the expression and the entity passed in, so one tree built at
//! schema-assembly time can be checked against many entities, and against the
//! same entity repeatedly as its trait set grows during generation.

use std::collections::BTreeSet;
use std::fmt;

use crate::core::error::SchemaError;
use crate::core::types::{TraitId, TraitSet};

/// Logical operators that combine child expressions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalOperator {
    /// True when at least one operand is true
    Any,
    /// True when every operand is true
    All,
    /// True when no operand is true
    None,
}

impl LogicalOperator {
    pub fn name(self) -> &'static str {
        match self {
            LogicalOperator::Any => "Any",
            LogicalOperator::All => "All",
            LogicalOperator::None => "None",
        }
    }

    /// Look up an operator by its exact (case-sensitive) name
    pub fn from_name(name: &str) -> Result<Self, SchemaError> {
        match name {
            "Any" => Ok(LogicalOperator::Any),
            "All" => Ok(LogicalOperator::All),
            "None" => Ok(LogicalOperator::None),
            other => Err(SchemaError::UnknownLogicalOperator {
                operator: other.to_string(),
            }),
        }
    }
}

/// Expression tree node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogicalExpression {
    AlwaysTrue,
    AlwaysFalse,
    /// Satisfied when the entity currently carries the trait
    HasTrait(TraitId),
    /// Operator applied to nested expressions
    Operation {
        operator: LogicalOperator,
        operands: Vec<LogicalExpression>,
    },
}

impl LogicalExpression {
    pub fn has_trait(category: impl Into<String>, name: impl Into<String>) -> Self {
        LogicalExpression::HasTrait(TraitId::new(category, name))
    }

    /// Build an operator node, rejecting an empty operand list
    pub fn operation(
        operator: LogicalOperator,
        operands: Vec<LogicalExpression>,
    ) -> Result<Self, SchemaError> {
        if operands.is_empty() {
            return Err(SchemaError::EmptyOperands {
                operator: operator.name().to_string(),
            });
        }
        Ok(LogicalExpression::Operation { operator, operands })
    }

    pub fn any(operands: Vec<LogicalExpression>) -> Result<Self, SchemaError> {
        Self::operation(LogicalOperator::Any, operands)
    }

    pub fn all(operands: Vec<LogicalExpression>) -> Result<Self, SchemaError> {
        Self::operation(LogicalOperator::All, operands)
    }

    pub fn none(operands: Vec<LogicalExpression>) -> Result<Self, SchemaError> {
        Self::operation(LogicalOperator::None, operands)
    }

    /// Evaluate against the entity's current trait set
    pub fn evaluate<S: TraitSet + ?Sized>(&self, npc: &S) -> bool {
        match self {
            LogicalExpression::AlwaysTrue => true,
            LogicalExpression::AlwaysFalse => false,
            LogicalExpression::HasTrait(id) => npc.has_trait(id),
            LogicalExpression::Operation { operator, operands } => match operator {
                LogicalOperator::Any => operands.iter().any(|op| op.evaluate(npc)),
                LogicalOperator::All => operands.iter().all(|op| op.evaluate(npc)),
                LogicalOperator::None => !operands.iter().any(|op| op.evaluate(npc)),
            },
        }
    }

    /// Visit every `HasTrait` leaf in depth-first, left-to-right order
    pub fn for_each_trait<'a>(&'a self, visit: &mut impl FnMut(&'a TraitId)) {
        match self {
            LogicalExpression::HasTrait(id) => visit(id),
            LogicalExpression::Operation { operands, .. } => {
                for operand in operands {
                    operand.for_each_trait(visit);
                }
            }
            LogicalExpression::AlwaysTrue | LogicalExpression::AlwaysFalse => {}
        }
    }

    /// Reject operator nodes with no operands anywhere in the tree
    ///
    /// Nodes built through the constructors are already checked; this catches
    /// trees assembled directly from the enum variants.
    pub fn check_structure(&self) -> Result<(), SchemaError> {
        if let LogicalExpression::Operation { operator, operands } = self {
            if operands.is_empty() {
                return Err(SchemaError::EmptyOperands {
                    operator: operator.name().to_string(),
                });
            }
            for operand in operands {
                operand.check_structure()?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for LogicalExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogicalExpression::AlwaysTrue => write!(f, "True"),
            LogicalExpression::AlwaysFalse => write!(f, "False"),
            LogicalExpression::HasTrait(id) => write!(f, "{}", id),
            LogicalExpression::Operation { operator, operands } => {
                write!(f, "{}[", operator.name())?;
                for (i, operand) in operands.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", operand)?;
                }
                write!(f, "]")
            }
        }
    }
}

/// Gate attached to a trait or a whole category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    expression: LogicalExpression,
}

impl Requirement {
    pub fn new(expression: LogicalExpression) -> Self {
        Self { expression }
    }

    pub fn expression(&self) -> &LogicalExpression {
        &self.expression
    }

    pub fn is_unlocked_for<S: TraitSet + ?Sized>(&self, npc: &S) -> bool {
        self.expression.evaluate(npc)
    }

    /// Every category named by a `HasTrait` leaf anywhere in the tree
    pub fn dependent_category_names(&self) -> BTreeSet<String> {
        let mut names = BTreeSet::new();
        self.expression
            .for_each_trait(&mut |id| {
                names.insert(id.category.clone());
            });
        names
    }

    /// Every trait referenced by the tree, in first-appearance order
    pub fn referenced_traits(&self) -> Vec<&TraitId> {
        let mut traits = Vec::new();
        self.expression.for_each_trait(&mut |id| {
            if !traits.contains(&id) {
                traits.push(id);
            }
        });
        traits
    }
}

impl From<LogicalExpression> for Requirement {
    fn from(expression: LogicalExpression) -> Self {
        Requirement::new(expression)
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.expression)
    }
}
