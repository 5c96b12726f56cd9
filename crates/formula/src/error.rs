// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Gridbase

use gridbase_type::{Diagnostic, Fragment, IntoDiagnostic, Type};

/// Every way a formula compilation can fail.
///
/// The code families map one-to-one onto the error contract: `PARSE_*`
/// (malformed syntax), `FUNCTION_*` (function vocabulary), `FIELD_*`
/// (reference resolution), `CYCLE_*` (dependency graph), `TYPE_*` (type
/// checking), `PATTERN_*` (regex literals), `LIMIT_*` (complexity guard) and
/// `INTERNAL_*` (compiler bugs surfaced as diagnostics instead of panics).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FormulaError {
	#[error("unexpected character")]
	UnexpectedCharacter {
		fragment: Fragment,
	},

	#[error("unterminated text literal")]
	UnterminatedText {
		fragment: Fragment,
	},

	#[error("unexpected end of formula")]
	UnexpectedEof,

	#[error("unexpected token: expected {expected}")]
	UnexpectedToken {
		expected: String,
		fragment: Fragment,
	},

	#[error("trailing input after expression")]
	TrailingTokens {
		fragment: Fragment,
	},

	#[error("unknown function '{name}'")]
	UnknownFunction {
		name: String,
		fragment: Fragment,
	},

	#[error("wrong number of arguments for {name}")]
	FunctionArity {
		name: &'static str,
		min: usize,
		max: usize,
		actual: usize,
		fragment: Fragment,
	},

	#[error("invalid argument type for {name}")]
	FunctionArgType {
		name: &'static str,
		index: usize,
		expected: &'static str,
		actual: Type,
		fragment: Fragment,
	},

	#[error("volatile function {name} is not allowed in a formula field")]
	VolatileFunction {
		name: &'static str,
		fragment: Fragment,
	},

	#[error("unknown date part")]
	UnknownDatePart {
		fragment: Fragment,
	},

	#[error("field '{name}' not found")]
	UnresolvedField {
		name: String,
		fragment: Fragment,
	},

	#[error("formula references its own field '{name}'")]
	SelfReference {
		name: String,
		fragment: Fragment,
	},

	#[error("circular dependency: {}", cycle.join(" -> "))]
	CircularDependency {
		cycle: Vec<String>,
	},

	#[error("operator {op} cannot be applied to {left} and {right}")]
	OperatorType {
		op: &'static str,
		left: Type,
		right: Type,
		fragment: Fragment,
	},

	#[error("operator {op} cannot be applied to {operand}")]
	PrefixOperatorType {
		op: &'static str,
		operand: Type,
		fragment: Fragment,
	},

	#[error("CASE branches have incompatible types {first} and {other}")]
	CaseBranchMismatch {
		first: Type,
		other: Type,
		fragment: Fragment,
	},

	#[error("CASE condition must be boolean, got {actual}")]
	CaseConditionNotBool {
		actual: Type,
		fragment: Fragment,
	},

	#[error("formula produces {actual} but the field declares {expected}")]
	ResultTypeMismatch {
		expected: Type,
		actual: Type,
		fragment: Fragment,
	},

	#[error("unknown cast target type")]
	UnknownCastType {
		fragment: Fragment,
	},

	#[error("malformed interval literal")]
	InvalidInterval {
		fragment: Fragment,
	},

	#[error("invalid regular expression: {details}")]
	InvalidPattern {
		details: String,
		fragment: Fragment,
	},

	#[error("formula nesting exceeds the maximum depth of {max_depth}")]
	TooDeep {
		max_depth: usize,
	},

	#[error("formula has {count} nodes, exceeding the maximum of {max_nodes}")]
	TooManyNodes {
		count: usize,
		max_nodes: usize,
	},

	#[error("internal compiler error: {details}")]
	Internal {
		details: String,
	},
}

impl IntoDiagnostic for FormulaError {
	fn into_diagnostic(self) -> Diagnostic {
		match self {
			FormulaError::UnexpectedCharacter {
				fragment,
			} => {
				let label = Some(format!("found `{}`", fragment.text()));
				Diagnostic {
					code: "PARSE_001".to_string(),
					message: "unexpected character".to_string(),
					fragment,
					label,
					help: Some("this character is not part of the formula syntax".to_string()),
					notes: vec![],
					cause: None,
				}
			}

			FormulaError::UnterminatedText {
				fragment,
			} => Diagnostic {
				code: "PARSE_002".to_string(),
				message: "unterminated text literal".to_string(),
				fragment,
				label: Some("missing closing quote".to_string()),
				help: Some("close the literal with `'`; escape an embedded quote as `''`".to_string()),
				notes: vec![],
				cause: None,
			},

			FormulaError::UnexpectedEof => Diagnostic {
				code: "PARSE_003".to_string(),
				message: "unexpected end of formula".to_string(),
				fragment: Fragment::None,
				label: None,
				help: Some("complete the expression".to_string()),
				notes: vec![],
				cause: None,
			},

			FormulaError::UnexpectedToken {
				expected,
				fragment,
			} => {
				let label = Some(format!("found `{}`", fragment.text()));
				Diagnostic {
					code: "PARSE_004".to_string(),
					message: format!("unexpected token: expected {}", expected),
					fragment,
					label,
					help: None,
					notes: vec![],
					cause: None,
				}
			}

			FormulaError::TrailingTokens {
				fragment,
			} => {
				let label = Some(format!("found `{}`", fragment.text()));
				Diagnostic {
					code: "PARSE_005".to_string(),
					message: "trailing input after expression".to_string(),
					fragment,
					label,
					help: Some("a formula is a single expression".to_string()),
					notes: vec![],
					cause: None,
				}
			}

			FormulaError::UnknownFunction {
				name,
				fragment,
			} => Diagnostic {
				code: "FUNCTION_001".to_string(),
				message: format!("unknown function '{}'", name),
				fragment,
				label: Some("not in the formula function vocabulary".to_string()),
				help: Some("check the function name against the supported function list".to_string()),
				notes: vec![],
				cause: None,
			},

			FormulaError::FunctionArity {
				name,
				min,
				max,
				actual,
				fragment,
			} => {
				let expected = if min == max {
					format!("{}", min)
				} else if max == usize::MAX {
					format!("at least {}", min)
				} else {
					format!("{} to {}", min, max)
				};
				Diagnostic {
					code: "FUNCTION_002".to_string(),
					message: format!(
						"wrong number of arguments for {}: expected {}, got {}",
						name, expected, actual
					),
					fragment,
					label: Some(format!("{} argument(s) supplied", actual)),
					help: None,
					notes: vec![],
					cause: None,
				}
			}

			FormulaError::FunctionArgType {
				name,
				index,
				expected,
				actual,
				fragment,
			} => Diagnostic {
				code: "FUNCTION_003".to_string(),
				message: format!(
					"invalid argument {} for {}: expected {}, got {}",
					index + 1,
					name,
					expected,
					actual
				),
				fragment,
				label: Some(format!("this argument is {}", actual)),
				help: Some("add an explicit cast if the conversion is intended".to_string()),
				notes: vec![],
				cause: None,
			},

			FormulaError::VolatileFunction {
				name,
				fragment,
			} => Diagnostic {
				code: "FUNCTION_004".to_string(),
				message: format!("volatile function {} is not allowed in a formula field", name),
				fragment,
				label: Some("result would change on every evaluation".to_string()),
				help: Some("stored generated columns only accept immutable expressions".to_string()),
				notes: vec![
					"the storage engine recomputes a formula only when referenced fields change"
						.to_string(),
				],
				cause: None,
			},

			FormulaError::UnknownDatePart {
				fragment,
			} => {
				let label = Some(format!("found `{}`", fragment.text()));
				Diagnostic {
					code: "FUNCTION_005".to_string(),
					message: "unknown date part".to_string(),
					fragment,
					label,
					help: Some(
						"valid parts: year, quarter, month, week, day, dow, doy, hour, minute, second, epoch"
							.to_string(),
					),
					notes: vec![],
					cause: None,
				}
			}

			FormulaError::UnresolvedField {
				name,
				fragment,
			} => Diagnostic {
				code: "FIELD_001".to_string(),
				message: format!("field '{}' not found", name),
				fragment,
				label: Some("no field with this name in the table".to_string()),
				help: Some("field references are case-sensitive and must match the field name exactly".to_string()),
				notes: vec![],
				cause: None,
			},

			FormulaError::SelfReference {
				name,
				fragment,
			} => Diagnostic {
				code: "FIELD_002".to_string(),
				message: format!("formula references its own field '{}'", name),
				fragment,
				label: Some("a formula cannot read the value it defines".to_string()),
				help: None,
				notes: vec![],
				cause: None,
			},

			FormulaError::CircularDependency {
				cycle,
			} => {
				let mut path = cycle.clone();
				if let Some(first) = cycle.first() {
					path.push(first.clone());
				}
				Diagnostic {
					code: "CYCLE_001".to_string(),
					message: format!("circular dependency: {}", path.join(" -> ")),
					fragment: Fragment::None,
					label: Some("formula fields may not depend on themselves, directly or indirectly".to_string()),
					help: Some("break the cycle by removing one of the references".to_string()),
					notes: cycle.iter().map(|name| format!("field '{}' is part of the cycle", name)).collect(),
					cause: None,
				}
			}

			FormulaError::OperatorType {
				op,
				left,
				right,
				fragment,
			} => Diagnostic {
				code: "TYPE_001".to_string(),
				message: format!("operator {} cannot be applied to {} and {}", op, left, right),
				fragment,
				label: Some(format!("{} {} {}", left, op, right)),
				help: Some("add an explicit cast if the conversion is intended".to_string()),
				notes: vec![],
				cause: None,
			},

			FormulaError::PrefixOperatorType {
				op,
				operand,
				fragment,
			} => Diagnostic {
				code: "TYPE_002".to_string(),
				message: format!("operator {} cannot be applied to {}", op, operand),
				fragment,
				label: None,
				help: None,
				notes: vec![],
				cause: None,
			},

			FormulaError::CaseBranchMismatch {
				first,
				other,
				fragment,
			} => Diagnostic {
				code: "TYPE_003".to_string(),
				message: format!("CASE branches have incompatible types {} and {}", first, other),
				fragment,
				label: Some("all THEN/ELSE results must share a coercible type".to_string()),
				help: Some("cast the branch results to a common type".to_string()),
				notes: vec![],
				cause: None,
			},

			FormulaError::CaseConditionNotBool {
				actual,
				fragment,
			} => Diagnostic {
				code: "TYPE_007".to_string(),
				message: format!("CASE condition must be boolean, got {}", actual),
				fragment,
				label: None,
				help: Some("use a comparison, e.g. `status = 'open'`".to_string()),
				notes: vec![],
				cause: None,
			},

			FormulaError::ResultTypeMismatch {
				expected,
				actual,
				fragment,
			} => Diagnostic {
				code: "TYPE_004".to_string(),
				message: format!("formula produces {} but the field declares {}", actual, expected),
				fragment,
				label: Some(format!("inferred type is {}", actual)),
				help: Some("change the declared result type or cast the expression".to_string()),
				notes: vec![],
				cause: None,
			},

			FormulaError::UnknownCastType {
				fragment,
			} => {
				let label = Some(format!("found `{}`", fragment.text()));
				Diagnostic {
					code: "TYPE_005".to_string(),
					message: "unknown cast target type".to_string(),
					fragment,
					label,
					help: Some(
						"valid targets: boolean, bigint, numeric, text, date, timestamp, interval"
							.to_string(),
					),
					notes: vec![],
					cause: None,
				}
			}

			FormulaError::InvalidInterval {
				fragment,
			} => {
				let label = Some(format!("found `{}`", fragment.text()));
				Diagnostic {
					code: "TYPE_006".to_string(),
					message: "malformed interval literal".to_string(),
					fragment,
					label,
					help: Some("write a count and a unit, e.g. INTERVAL '3 days'".to_string()),
					notes: vec![],
					cause: None,
				}
			}

			FormulaError::InvalidPattern {
				details,
				fragment,
			} => Diagnostic {
				code: "PATTERN_001".to_string(),
				message: format!("invalid regular expression: {}", details),
				fragment,
				label: None,
				help: None,
				notes: vec![],
				cause: None,
			},

			FormulaError::TooDeep {
				max_depth,
			} => Diagnostic {
				code: "LIMIT_001".to_string(),
				message: format!("formula nesting exceeds the maximum depth of {}", max_depth),
				fragment: Fragment::None,
				label: None,
				help: Some("simplify the formula or split it across several formula fields".to_string()),
				notes: vec![],
				cause: None,
			},

			FormulaError::TooManyNodes {
				count,
				max_nodes,
			} => Diagnostic {
				code: "LIMIT_002".to_string(),
				message: format!("formula has {} nodes, exceeding the maximum of {}", count, max_nodes),
				fragment: Fragment::None,
				label: None,
				help: Some("simplify the formula or split it across several formula fields".to_string()),
				notes: vec![],
				cause: None,
			},

			FormulaError::Internal {
				details,
			} => Diagnostic {
				code: "INTERNAL_001".to_string(),
				message: format!("internal compiler error: {}", details),
				fragment: Fragment::None,
				label: None,
				help: Some("this is a bug in the formula compiler, not in the submitted schema".to_string()),
				notes: vec![],
				cause: None,
			},
		}
	}
}
