// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Gridbase

use gridbase_catalog::{FieldId, TableDef};
use gridbase_type::{Error, error};

use crate::{
	ast::{Expr, FieldTarget},
	error::FormulaError,
	function,
};

/// The outcome of resolving one formula: the fields it reads, in first-use
/// order, deduplicated.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
	pub dependencies: Vec<FieldId>,
}

/// Resolve every field reference and function name in the expression
/// against the table, annotating the nodes in place.
///
/// Collects all violations instead of stopping at the first, so a formula
/// with three bad references reports three errors.
pub fn resolve(expr: &mut Expr, table: &TableDef, current_field: &str) -> Result<Resolution, Vec<Error>> {
	let mut resolver = Resolver {
		table,
		current_field,
		dependencies: Vec::new(),
		errors: Vec::new(),
	};
	resolver.resolve_expr(expr);
	if resolver.errors.is_empty() {
		Ok(Resolution {
			dependencies: resolver.dependencies,
		})
	} else {
		Err(resolver.errors)
	}
}

struct Resolver<'a> {
	table: &'a TableDef,
	current_field: &'a str,
	dependencies: Vec<FieldId>,
	errors: Vec<Error>,
}

impl Resolver<'_> {
	fn resolve_expr(&mut self, expr: &mut Expr) {
		match expr {
			Expr::Literal(_) => {}

			Expr::FieldRef(node) => {
				if node.name == self.current_field {
					self.errors.push(error!(FormulaError::SelfReference {
						name: node.name.clone(),
						fragment: node.fragment.clone(),
					}));
					return;
				}
				match self.table.field(&node.name) {
					Some(field) => {
						if !self.dependencies.contains(&field.id) {
							self.dependencies.push(field.id);
						}
						node.target = Some(FieldTarget {
							id: field.id,
							value_type: field.value_type(),
							is_formula: field.is_formula(),
						});
					}
					None => {
						self.errors.push(error!(FormulaError::UnresolvedField {
							name: node.name.clone(),
							fragment: node.fragment.clone(),
						}));
					}
				}
			}

			Expr::Prefix(node) => self.resolve_expr(&mut node.operand),

			Expr::Infix(node) => {
				self.resolve_expr(&mut node.left);
				self.resolve_expr(&mut node.right);
			}

			Expr::Call(node) => {
				match function::lookup(&node.name) {
					Some(kind) => {
						node.function = Some(kind);
						let signature = kind.signature();
						if signature.volatile {
							self.errors.push(error!(FormulaError::VolatileFunction {
								name: kind.as_str(),
								fragment: node.fragment.clone(),
							}));
						} else if node.args.len() < signature.min_args
							|| node.args.len() > signature.max_args
						{
							self.errors.push(error!(FormulaError::FunctionArity {
								name: kind.as_str(),
								min: signature.min_args,
								max: signature.max_args,
								actual: node.args.len(),
								fragment: node.fragment.clone(),
							}));
						}
					}
					None => {
						self.errors.push(error!(FormulaError::UnknownFunction {
							name: node.name.clone(),
							fragment: node.fragment.clone(),
						}));
					}
				}
				for arg in &mut node.args {
					self.resolve_expr(arg);
				}
			}

			Expr::Case(node) => {
				for branch in &mut node.branches {
					self.resolve_expr(&mut branch.condition);
					self.resolve_expr(&mut branch.result);
				}
				if let Some(otherwise) = &mut node.otherwise {
					self.resolve_expr(otherwise);
				}
			}

			Expr::Cast(node) => self.resolve_expr(&mut node.operand),
		}
	}
}

#[cfg(test)]
mod tests {
	use gridbase_catalog::{FieldDef, FieldType};
	use gridbase_type::Type;

	use super::*;
	use crate::{parse::parse_formula, tokenize::tokenize};

	fn table() -> TableDef {
		TableDef::new(
			"products",
			vec![
				FieldDef {
					id: FieldId(1),
					name: "price".to_string(),
					ty: FieldType::Decimal,
					required: false,
				},
				FieldDef {
					id: FieldId(2),
					name: "quantity".to_string(),
					ty: FieldType::Int,
					required: false,
				},
				FieldDef {
					id: FieldId(3),
					name: "total".to_string(),
					ty: FieldType::Formula {
						expression: "price * quantity".to_string(),
						result_type: Type::Decimal,
					},
					required: false,
				},
			],
		)
	}

	fn resolved(input: &str, current_field: &str) -> (Expr, Result<Resolution, Vec<Error>>) {
		let mut expr = parse_formula(tokenize(input).unwrap(), 64).unwrap();
		let result = resolve(&mut expr, &table(), current_field);
		(expr, result)
	}

	#[test]
	fn test_resolves_field_references() {
		let (expr, result) = resolved("price * quantity", "total");
		let resolution = result.unwrap();
		assert_eq!(resolution.dependencies, vec![FieldId(1), FieldId(2)]);

		let Expr::Infix(node) = &expr else {
			panic!()
		};
		let Expr::FieldRef(left) = node.left.as_ref() else {
			panic!()
		};
		let target = left.target.as_ref().unwrap();
		assert_eq!(target.id, FieldId(1));
		assert_eq!(target.value_type, Type::Decimal);
		assert!(!target.is_formula);
	}

	#[test]
	fn test_dependencies_are_deduplicated() {
		let (_, result) = resolved("price + price + price", "total");
		assert_eq!(result.unwrap().dependencies, vec![FieldId(1)]);
	}

	#[test]
	fn test_formula_reference_is_marked() {
		let (expr, result) = resolved("total * 2", "discounted");
		assert!(result.is_ok());
		let Expr::Infix(node) = &expr else {
			panic!()
		};
		let Expr::FieldRef(left) = node.left.as_ref() else {
			panic!()
		};
		assert!(left.target.as_ref().unwrap().is_formula);
	}

	#[test]
	fn test_unresolved_field() {
		let (_, result) = resolved("price * qty", "total");
		let errors = result.unwrap_err();
		assert_eq!(errors.len(), 1);
		assert_eq!(errors[0].code(), "FIELD_001");
	}

	#[test]
	fn test_field_names_are_case_sensitive() {
		let (_, result) = resolved("Price", "total");
		assert_eq!(result.unwrap_err()[0].code(), "FIELD_001");
	}

	#[test]
	fn test_self_reference() {
		let (_, result) = resolved("total + 1", "total");
		assert_eq!(result.unwrap_err()[0].code(), "FIELD_002");
	}

	#[test]
	fn test_unknown_function() {
		let (_, result) = resolved("FROBNICATE(price)", "total");
		assert_eq!(result.unwrap_err()[0].code(), "FUNCTION_001");
	}

	#[test]
	fn test_function_arity() {
		let (_, result) = resolved("ROUND(price, 2, 3)", "total");
		assert_eq!(result.unwrap_err()[0].code(), "FUNCTION_002");
	}

	#[test]
	fn test_volatile_function_rejected() {
		let (_, result) = resolved("NOW()", "stamp");
		assert_eq!(result.unwrap_err()[0].code(), "FUNCTION_004");
	}

	#[test]
	fn test_multiple_errors_are_collected() {
		let (_, result) = resolved("missing_a + missing_b + FROBNICATE(1)", "total");
		let errors = result.unwrap_err();
		assert_eq!(errors.len(), 3);
	}

	#[test]
	fn test_function_name_is_not_a_field_reference() {
		// ROUND resolves in call position; a bare `round` is a field
		let (_, result) = resolved("ROUND(price)", "total");
		assert!(result.is_ok());
		let (_, result) = resolved("round", "total");
		assert_eq!(result.unwrap_err()[0].code(), "FIELD_001");
	}
}
