// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Gridbase

use gridbase_catalog::FieldId;
use gridbase_type::{Fragment, Type};

use crate::function::FunctionKind;

/// A parsed formula expression.
///
/// Nodes carry the [`Fragment`] they were parsed from and two annotation
/// slots filled by later stages: field references gain a [`FieldTarget`]
/// during resolution, every node gains its [`Type`] during type checking.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
	Literal(LiteralExpr),
	FieldRef(FieldRefExpr),
	Prefix(PrefixExpr),
	Infix(InfixExpr),
	Call(CallExpr),
	Case(CaseExpr),
	Cast(CastExpr),
}

#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
	/// Numeric literal, kept as written (e.g. `42`, `0.9`).
	Number(String),
	/// Unescaped text literal.
	Text(String),
	Bool(bool),
	Null,
	/// The body of `INTERVAL '...'`, validated during type checking.
	Interval(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct LiteralExpr {
	pub value: LiteralValue,
	pub fragment: Fragment,
	pub ty: Option<Type>,
}

/// What a field reference resolved to.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldTarget {
	pub id: FieldId,
	pub value_type: Type,
	pub is_formula: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldRefExpr {
	pub name: String,
	pub fragment: Fragment,
	pub target: Option<FieldTarget>,
	pub ty: Option<Type>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefixOp {
	Minus,
	Plus,
	Not,
}

impl PrefixOp {
	pub fn as_str(&self) -> &'static str {
		match self {
			PrefixOp::Minus => "-",
			PrefixOp::Plus => "+",
			PrefixOp::Not => "NOT",
		}
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct PrefixExpr {
	pub op: PrefixOp,
	pub operand: Box<Expr>,
	pub fragment: Fragment,
	pub ty: Option<Type>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfixOp {
	Add,
	Subtract,
	Multiply,
	Divide,
	Remainder,
	Concat,
	Equal,
	NotEqual,
	LessThan,
	LessThanEqual,
	GreaterThan,
	GreaterThanEqual,
	And,
	Or,
	RegexMatch,
}

impl InfixOp {
	pub fn as_str(&self) -> &'static str {
		match self {
			InfixOp::Add => "+",
			InfixOp::Subtract => "-",
			InfixOp::Multiply => "*",
			InfixOp::Divide => "/",
			InfixOp::Remainder => "%",
			InfixOp::Concat => "||",
			InfixOp::Equal => "=",
			InfixOp::NotEqual => "!=",
			InfixOp::LessThan => "<",
			InfixOp::LessThanEqual => "<=",
			InfixOp::GreaterThan => ">",
			InfixOp::GreaterThanEqual => ">=",
			InfixOp::And => "AND",
			InfixOp::Or => "OR",
			InfixOp::RegexMatch => "~",
		}
	}

	pub fn is_arithmetic(&self) -> bool {
		matches!(
			self,
			InfixOp::Add | InfixOp::Subtract | InfixOp::Multiply | InfixOp::Divide | InfixOp::Remainder
		)
	}

	pub fn is_comparison(&self) -> bool {
		matches!(
			self,
			InfixOp::Equal
				| InfixOp::NotEqual | InfixOp::LessThan
				| InfixOp::LessThanEqual
				| InfixOp::GreaterThan
				| InfixOp::GreaterThanEqual
		)
	}

	pub fn is_logical(&self) -> bool {
		matches!(self, InfixOp::And | InfixOp::Or)
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct InfixExpr {
	pub op: InfixOp,
	pub left: Box<Expr>,
	pub right: Box<Expr>,
	pub fragment: Fragment,
	pub ty: Option<Type>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CallExpr {
	/// Function name as written in the formula.
	pub name: String,
	/// Filled by resolution; `None` until the name has been looked up.
	pub function: Option<FunctionKind>,
	pub args: Vec<Expr>,
	pub fragment: Fragment,
	pub ty: Option<Type>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CaseBranch {
	pub condition: Expr,
	pub result: Expr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CaseExpr {
	pub branches: Vec<CaseBranch>,
	pub otherwise: Option<Box<Expr>>,
	pub fragment: Fragment,
	pub ty: Option<Type>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CastExpr {
	pub operand: Box<Expr>,
	pub target: Type,
	pub fragment: Fragment,
	pub ty: Option<Type>,
}

impl Expr {
	pub fn fragment(&self) -> &Fragment {
		match self {
			Expr::Literal(node) => &node.fragment,
			Expr::FieldRef(node) => &node.fragment,
			Expr::Prefix(node) => &node.fragment,
			Expr::Infix(node) => &node.fragment,
			Expr::Call(node) => &node.fragment,
			Expr::Case(node) => &node.fragment,
			Expr::Cast(node) => &node.fragment,
		}
	}

	/// The inferred type, once type checking has run.
	pub fn ty(&self) -> Option<Type> {
		match self {
			Expr::Literal(node) => node.ty,
			Expr::FieldRef(node) => node.ty,
			Expr::Prefix(node) => node.ty,
			Expr::Infix(node) => node.ty,
			Expr::Call(node) => node.ty,
			Expr::Case(node) => node.ty,
			Expr::Cast(node) => node.ty,
		}
	}

	/// Total number of nodes in this expression tree.
	pub fn node_count(&self) -> usize {
		let mut count = 0;
		let mut stack = vec![self];
		while let Some(expr) = stack.pop() {
			count += 1;
			match expr {
				Expr::Literal(_) | Expr::FieldRef(_) => {}
				Expr::Prefix(node) => stack.push(&node.operand),
				Expr::Infix(node) => {
					stack.push(&node.left);
					stack.push(&node.right);
				}
				Expr::Call(node) => stack.extend(node.args.iter()),
				Expr::Case(node) => {
					for branch in &node.branches {
						stack.push(&branch.condition);
						stack.push(&branch.result);
					}
					if let Some(otherwise) = &node.otherwise {
						stack.push(otherwise);
					}
				}
				Expr::Cast(node) => stack.push(&node.operand),
			}
		}
		count
	}
}
