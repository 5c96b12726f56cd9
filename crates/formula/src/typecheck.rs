// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Gridbase

use std::sync::LazyLock;

use gridbase_type::{Type, err, return_error};
use regex::Regex;

use crate::{
	ast::{CallExpr, Expr, InfixExpr, InfixOp, LiteralValue, PrefixOp},
	error::FormulaError,
	function::{ArgRule, FunctionKind, ResultRule, is_date_part},
};

static INTERVAL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"(?i)^\s*(\d+\s*(year|month|week|day|hour|minute|second)s?\s*)+$").unwrap()
});

/// Type-check a resolved expression against the declared result type of its
/// field. Fills the type slot of every node along the way.
pub fn check(expr: &mut Expr, declared: Type) -> crate::Result<()> {
	let actual = infer(expr)?;
	if !is_assignable(actual, declared) {
		return_error!(FormulaError::ResultTypeMismatch {
			expected: declared,
			actual,
			fragment: expr.fragment().clone(),
		});
	}
	Ok(())
}

/// Infer the type of an expression bottom-up. NULL carries [`Type::Undefined`]
/// and coerces into any context; operators with an undefined operand produce
/// undefined themselves, which is how NULL propagation falls out of the rules.
pub fn infer(expr: &mut Expr) -> crate::Result<Type> {
	let ty = match expr {
		Expr::Literal(node) => {
			let ty = match &node.value {
				LiteralValue::Number(text) => {
					if text.contains('.') {
						Type::Decimal
					} else {
						Type::Int
					}
				}
				LiteralValue::Text(_) => Type::Utf8,
				LiteralValue::Bool(_) => Type::Bool,
				LiteralValue::Null => Type::Undefined,
				LiteralValue::Interval(body) => {
					if !INTERVAL_PATTERN.is_match(body) {
						return_error!(FormulaError::InvalidInterval {
							fragment: node.fragment.clone(),
						});
					}
					Type::Interval
				}
			};
			node.ty = Some(ty);
			ty
		}

		Expr::FieldRef(node) => {
			let Some(target) = &node.target else {
				return_error!(FormulaError::Internal {
					details: format!("field reference '{}' was not resolved", node.name),
				});
			};
			node.ty = Some(target.value_type);
			target.value_type
		}

		Expr::Prefix(node) => {
			let operand = infer(&mut node.operand)?;
			let ty = match node.op {
				PrefixOp::Minus | PrefixOp::Plus => {
					if operand.is_number() || operand.is_undefined() {
						operand
					} else {
						return err!(FormulaError::PrefixOperatorType {
							op: node.op.as_str(),
							operand,
							fragment: node.fragment.clone(),
						});
					}
				}
				PrefixOp::Not => {
					if operand.is_bool() || operand.is_undefined() {
						if operand.is_undefined() {
							Type::Undefined
						} else {
							Type::Bool
						}
					} else {
						return err!(FormulaError::PrefixOperatorType {
							op: node.op.as_str(),
							operand,
							fragment: node.fragment.clone(),
						});
					}
				}
			};
			node.ty = Some(ty);
			ty
		}

		Expr::Infix(node) => {
			let ty = infer_infix(node)?;
			node.ty = Some(ty);
			ty
		}

		Expr::Call(node) => {
			let ty = infer_call(node)?;
			node.ty = Some(ty);
			ty
		}

		Expr::Case(node) => {
			let mut result: Option<Type> = None;
			for branch in &mut node.branches {
				let condition = infer(&mut branch.condition)?;
				if !condition.is_bool() && !condition.is_undefined() {
					return err!(FormulaError::CaseConditionNotBool {
						actual: condition,
						fragment: branch.condition.fragment().clone(),
					});
				}
				let branch_ty = infer(&mut branch.result)?;
				result = Some(merge_case_branch(result, branch_ty, &branch.result)?);
			}
			if let Some(otherwise) = &mut node.otherwise {
				let branch_ty = infer(otherwise)?;
				result = Some(merge_case_branch(result, branch_ty, otherwise)?);
			}
			// A CASE has at least one branch by construction
			let ty = result.unwrap_or(Type::Undefined);
			node.ty = Some(ty);
			ty
		}

		Expr::Cast(node) => {
			infer(&mut node.operand)?;
			node.ty = Some(node.target);
			node.target
		}
	};
	Ok(ty)
}

fn merge_case_branch(current: Option<Type>, branch: Type, expr: &Expr) -> crate::Result<Type> {
	match current {
		None => Ok(branch),
		Some(current) => match common_type(current, branch) {
			Some(merged) => Ok(merged),
			None => err!(FormulaError::CaseBranchMismatch {
				first: current,
				other: branch,
				fragment: expr.fragment().clone(),
			}),
		},
	}
}

fn infer_infix(node: &mut InfixExpr) -> crate::Result<Type> {
	let left = infer(&mut node.left)?;
	let right = infer(&mut node.right)?;

	let result = if node.op.is_arithmetic() {
		arithmetic_result(node.op, left, right)
	} else if node.op.is_comparison() {
		comparison_result(node.op, left, right)
	} else if node.op.is_logical() {
		logical_result(left, right)
	} else {
		match node.op {
			InfixOp::Concat => concat_result(left, right),
			InfixOp::RegexMatch => {
				if (left.is_text() || left.is_undefined())
					&& (right.is_text() || right.is_undefined())
				{
					validate_pattern_literal(&node.right)?;
					Some(Type::Bool)
				} else {
					None
				}
			}
			_ => None,
		}
	};

	match result {
		Some(ty) => Ok(ty),
		None => err!(FormulaError::OperatorType {
			op: node.op.as_str(),
			left,
			right,
			fragment: node.fragment.clone(),
		}),
	}
}

fn arithmetic_result(op: InfixOp, left: Type, right: Type) -> Option<Type> {
	if left.is_undefined() || right.is_undefined() {
		return Some(Type::Undefined);
	}

	if left.is_number() && right.is_number() {
		return Some(match op {
			// Division always produces a decimal, so 1 / 2 is 0.5
			InfixOp::Divide => Type::Decimal,
			_ => {
				if left == Type::Int && right == Type::Int {
					Type::Int
				} else {
					Type::Decimal
				}
			}
		});
	}

	match (op, left, right) {
		(InfixOp::Add, temporal, Type::Interval) if temporal.is_temporal() => Some(temporal),
		(InfixOp::Add, Type::Interval, temporal) if temporal.is_temporal() => Some(temporal),
		(InfixOp::Add, Type::Date, Type::Int) | (InfixOp::Add, Type::Int, Type::Date) => Some(Type::Date),
		(InfixOp::Add, Type::Interval, Type::Interval) => Some(Type::Interval),
		(InfixOp::Subtract, temporal, Type::Interval) if temporal.is_temporal() => Some(temporal),
		(InfixOp::Subtract, Type::Date, Type::Int) => Some(Type::Date),
		// date - date is the day count, timestamp - timestamp a duration
		(InfixOp::Subtract, Type::Date, Type::Date) => Some(Type::Int),
		(InfixOp::Subtract, Type::Timestamp, Type::Timestamp) => Some(Type::Interval),
		(InfixOp::Subtract, Type::Interval, Type::Interval) => Some(Type::Interval),
		_ => None,
	}
}

fn comparison_result(op: InfixOp, left: Type, right: Type) -> Option<Type> {
	if left.is_undefined() || right.is_undefined() {
		return Some(Type::Bool);
	}
	let comparable = (left.is_number() && right.is_number())
		|| (left.is_text() && right.is_text())
		|| (left.is_bool() && right.is_bool())
		|| (left.is_temporal() && right.is_temporal())
		|| (left == Type::Interval && right == Type::Interval);
	if comparable {
		return Some(Type::Bool);
	}
	// Arrays support equality only, not ordering
	if left.is_array() && right.is_array() && matches!(op, InfixOp::Equal | InfixOp::NotEqual) {
		return Some(Type::Bool);
	}
	None
}

fn logical_result(left: Type, right: Type) -> Option<Type> {
	let ok = |ty: Type| ty.is_bool() || ty.is_undefined();
	if ok(left) && ok(right) {
		Some(Type::Bool)
	} else {
		None
	}
}

fn concat_result(left: Type, right: Type) -> Option<Type> {
	let text = |ty: Type| ty.is_text() || ty.is_undefined();
	if text(left) && text(right) {
		return Some(Type::Utf8);
	}
	if left.is_array() && right.is_array() {
		return Some(Type::TextArray);
	}
	None
}

/// The narrowest type two branch or argument types both coerce to.
pub fn common_type(left: Type, right: Type) -> Option<Type> {
	if left == right {
		return Some(left);
	}
	if left.is_undefined() {
		return Some(right);
	}
	if right.is_undefined() {
		return Some(left);
	}
	if left.is_number() && right.is_number() {
		return Some(Type::Decimal);
	}
	if left.is_temporal() && right.is_temporal() {
		return Some(Type::Timestamp);
	}
	None
}

/// Whether a formula producing `actual` satisfies a field declaring
/// `declared`: exact match, NULL into anything, and the two widenings.
pub fn is_assignable(actual: Type, declared: Type) -> bool {
	actual == declared
		|| actual.is_undefined()
		|| (actual == Type::Int && declared == Type::Decimal)
		|| (actual == Type::Date && declared == Type::Timestamp)
}

fn infer_call(node: &mut CallExpr) -> crate::Result<Type> {
	let Some(kind) = node.function else {
		return_error!(FormulaError::Internal {
			details: format!("function call '{}' was not resolved", node.name),
		});
	};
	let signature = kind.signature();

	let mut arg_types = Vec::with_capacity(node.args.len());
	for arg in &mut node.args {
		arg_types.push(infer(arg)?);
	}

	for (index, &actual) in arg_types.iter().enumerate() {
		let rule = expected_rule(kind, &signature.args, index, &arg_types);
		let accepted = match rule {
			ArgRule::Number => actual.is_number() || actual.is_undefined(),
			ArgRule::Text => actual.is_text() || actual.is_undefined(),
			ArgRule::Temporal => actual.is_temporal() || actual.is_undefined(),
			ArgRule::Array => actual.is_array() || actual.is_undefined(),
			ArgRule::Any => true,
			ArgRule::SameAsFirst => common_type(arg_types[0], actual).is_some(),
		};
		if !accepted {
			return err!(FormulaError::FunctionArgType {
				name: kind.as_str(),
				index,
				expected: rule.as_str(),
				actual,
				fragment: node.args[index].fragment().clone(),
			});
		}
	}

	check_special_forms(kind, node)?;

	let ty = match signature.result {
		ResultRule::Fixed(ty) => ty,
		ResultRule::SameAsArg(index) => arg_types.get(index).copied().unwrap_or(Type::Undefined),
		ResultRule::CommonOfArgs => {
			let mut common = Type::Undefined;
			for (index, &actual) in arg_types.iter().enumerate() {
				match common_type(common, actual) {
					Some(merged) => common = merged,
					None => {
						return err!(FormulaError::FunctionArgType {
							name: kind.as_str(),
							index,
							expected: ArgRule::SameAsFirst.as_str(),
							actual,
							fragment: node.args[index].fragment().clone(),
						});
					}
				}
			}
			common
		}
	};
	Ok(ty)
}

/// The rule for one argument position, with the SUBSTRING pattern form
/// special-cased: a two-argument call with a text second argument is the
/// pattern form, everything else follows the declared positional rules.
fn expected_rule(kind: FunctionKind, rules: &'static [ArgRule], index: usize, arg_types: &[Type]) -> ArgRule {
	if kind == FunctionKind::Substring && index == 1 {
		if arg_types.len() == 2 && (arg_types[1].is_text() || arg_types[1].is_undefined()) {
			return ArgRule::Text;
		}
		return ArgRule::Number;
	}
	match rules.get(index) {
		Some(&rule) => rule,
		// Variadic calls repeat the last rule
		None => rules.last().copied().unwrap_or(ArgRule::Any),
	}
}

fn check_special_forms(kind: FunctionKind, node: &mut CallExpr) -> crate::Result<()> {
	match kind {
		FunctionKind::Extract | FunctionKind::DateTrunc => {
			if let Some(Expr::Literal(part)) = node.args.first() {
				if let LiteralValue::Text(text) = &part.value {
					if !is_date_part(text) {
						return_error!(FormulaError::UnknownDatePart {
							fragment: part.fragment.clone(),
						});
					}
				}
			}
		}
		FunctionKind::Substring => {
			// Pattern form: validate the regex when it is a literal
			if node.args.len() == 2 && node.args[1].ty() == Some(Type::Utf8) {
				validate_pattern_literal(&node.args[1])?;
			}
		}
		FunctionKind::RegexpReplace => {
			if let Some(pattern) = node.args.get(1) {
				validate_pattern_literal(pattern)?;
			}
		}
		_ => {}
	}
	Ok(())
}

/// When the expression is a text literal, compile it as a regular expression
/// and reject malformed patterns at schema time instead of at row time.
fn validate_pattern_literal(expr: &Expr) -> crate::Result<()> {
	let Expr::Literal(node) = expr else {
		return Ok(());
	};
	let LiteralValue::Text(pattern) = &node.value else {
		return Ok(());
	};
	if let Err(error) = Regex::new(pattern) {
		let details = match error {
			regex::Error::Syntax(text) => {
				text.lines().next().unwrap_or("syntax error").to_string()
			}
			other => other.to_string(),
		};
		return_error!(FormulaError::InvalidPattern {
			details,
			fragment: node.fragment.clone(),
		});
	}
	Ok(())
}
