//! Parser for requirement text such as `All[Colour: Blue, None[Animal: Bear]]`.
//!
//! Grammar:
//!
//! ```text
//! expr     := "True" | "False" | operator "[" expr ("," expr)* "]" | trait
//! operator := "Any" | "All" | "None"
//! trait    := category ":" trait-name
//! ```
//!
//! Names may contain spaces but not `[`, `]`, `,` or `:`; surrounding
//! whitespace is ignored. Parsing happens in two passes: nom builds a raw
//! syntax tree, then the tree is converted into a [`LogicalExpression`] so
//! operator names and empty operand lists get their own error variants.

use nom::branch::alt;
use nom::bytes::complete::is_not;
use nom::character::complete::{char, multispace0};
use nom::combinator::{all_consuming, map, verify};
use nom::multi::separated_list0;
use nom::sequence::{delimited, preceded, terminated};
use nom::{IResult, Parser};

use crate::core::error::SchemaError;
use crate::schema::requirement::{LogicalExpression, LogicalOperator, Requirement};

#[derive(Debug)]
enum RawNode<'a> {
    Word(&'a str),
    Leaf {
        category: &'a str,
        name: &'a str,
    },
    Operation {
        operator: &'a str,
        operands: Vec<RawNode<'a>>,
    },
}

fn name(input: &str) -> IResult<&str, &str> {
    verify(map(is_not("[],:"), str::trim), |s: &str| !s.is_empty()).parse(input)
}

fn operand_list(input: &str) -> IResult<&str, Vec<RawNode<'_>>> {
    delimited(
        char('['),
        separated_list0(char(','), terminated(node, multispace0)),
        preceded(multispace0, char(']')),
    )
    .parse(input)
}

fn node(input: &str) -> IResult<&str, RawNode<'_>> {
    let (rest, head) = name(input)?;
    alt((
        map(operand_list, |operands| RawNode::Operation {
            operator: head,
            operands,
        }),
        map(preceded(char(':'), name), |trait_name| RawNode::Leaf {
            category: head,
            name: trait_name,
        }),
    ))
    .parse(rest)
    .or(Ok((rest, RawNode::Word(head))))
}

fn offset_of(input: &str, part: &str) -> usize {
    (part.as_ptr() as usize).saturating_sub(input.as_ptr() as usize)
}

fn convert(input: &str, raw: RawNode<'_>) -> Result<LogicalExpression, SchemaError> {
    match raw {
        RawNode::Word("True") => Ok(LogicalExpression::AlwaysTrue),
        RawNode::Word("False") => Ok(LogicalExpression::AlwaysFalse),
        RawNode::Word(word) => Err(SchemaError::MalformedRequirement {
            input: input.to_string(),
            position: offset_of(input, word),
        }),
        RawNode::Leaf { category, name } => Ok(LogicalExpression::has_trait(category, name)),
        RawNode::Operation { operator, operands } => {
            let operator = LogicalOperator::from_name(operator)?;
            let operands = operands
                .into_iter()
                .map(|operand| convert(input, operand))
                .collect::<Result<Vec<_>, _>>()?;
            LogicalExpression::operation(operator, operands)
        }
    }
}

/// Parse requirement text into an expression tree
pub fn parse_expression(input: &str) -> Result<LogicalExpression, SchemaError> {
    let parsed = all_consuming(terminated(node, multispace0)).parse(input);
    match parsed {
        Ok((_, raw)) => convert(input, raw),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
            Err(SchemaError::MalformedRequirement {
                input: input.to_string(),
                position: input.len() - e.input.len(),
            })
        }
        Err(nom::Err::Incomplete(_)) => Err(SchemaError::MalformedRequirement {
            input: input.to_string(),
            position: input.len(),
        }),
    }
}

pub fn parse_requirement(input: &str) -> Result<Requirement, SchemaError> {
    parse_expression(input).map(Requirement::new)
}
