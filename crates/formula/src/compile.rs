// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Gridbase

use std::collections::HashMap;

use gridbase_catalog::{FieldDef, FieldId, TableDef};
use gridbase_type::{Error, Type, error};
use serde::Serialize;
use tracing::{debug, instrument};

use crate::{
	ast::Expr,
	error::FormulaError,
	generate, graph::DependencyGraph, parse::parse_formula, resolve, tokenize::tokenize, typecheck,
};

/// Complexity limits applied to every formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompileOptions {
	pub max_depth: usize,
	pub max_nodes: usize,
}

impl Default for CompileOptions {
	fn default() -> Self {
		Self {
			max_depth: 64,
			max_nodes: 4096,
		}
	}
}

/// One compiled formula field, ready to become a generated column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompiledFormula {
	#[serde(rename = "fieldId")]
	pub field_id: FieldId,
	#[serde(rename = "columnName")]
	pub column_name: String,
	/// The generated-column expression, e.g. `("price" * "quantity")`.
	pub expression: String,
	#[serde(rename = "resultType")]
	pub result_type: Type,
	/// Fields this formula reads, in first-use order.
	#[serde(rename = "dependsOn")]
	pub depends_on: Vec<FieldId>,
}

impl CompiledFormula {
	/// The column clause for a CREATE TABLE / ADD COLUMN statement.
	pub fn column_clause(&self) -> String {
		format!(
			"{} {} GENERATED ALWAYS AS ({}) STORED",
			generate::quote_ident(&self.column_name),
			self.result_type.postgres_name(),
			self.expression
		)
	}
}

#[derive(Debug, Default)]
pub struct Compiler {
	options: CompileOptions,
}

impl Compiler {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_options(options: CompileOptions) -> Self {
		Self {
			options,
		}
	}

	/// Compile every formula field of the table, or report every reason it
	/// cannot be done.
	///
	/// All-or-nothing: a single bad formula rejects the whole table, and
	/// the error list covers all fields, not just the first broken one.
	/// Cycle detection only runs once every formula parses and resolves,
	/// so a cycle report is never based on a half-understood schema.
	#[instrument(name = "formula::compile", level = "debug", skip_all, fields(table = %table.name))]
	pub fn compile(&self, table: &TableDef) -> Result<Vec<CompiledFormula>, Vec<Error>> {
		table.validate()?;

		let mut errors = Vec::new();
		let mut parsed: Vec<(usize, Expr, Vec<FieldId>)> = Vec::new();
		let formula_fields: Vec<&FieldDef> = table.formula_fields().collect();

		for (index, field) in formula_fields.iter().enumerate() {
			match self.parse_and_resolve(table, field) {
				Ok((expr, dependencies)) => parsed.push((index, expr, dependencies)),
				Err(mut field_errors) => {
					for error in &mut field_errors {
						error.notes.push(format!("in formula field '{}'", field.name));
					}
					errors.append(&mut field_errors);
				}
			}
		}
		if !errors.is_empty() {
			debug!(count = errors.len(), "rejected during parse/resolve");
			return Err(errors);
		}

		if let Some(cycle) = self.find_cycle(&formula_fields, &parsed) {
			return Err(vec![error!(FormulaError::CircularDependency {
				cycle,
			})]);
		}

		let mut compiled = Vec::with_capacity(parsed.len());
		for (index, mut expr, dependencies) in parsed {
			let field = formula_fields[index];
			// Validated formula fields always carry an expression
			let Some((_, result_type)) = field.ty.formula() else {
				continue;
			};
			match self.check_and_render(&mut expr, result_type) {
				Ok(expression) => {
					debug!(field = %field.name, %expression, "compiled");
					compiled.push(CompiledFormula {
						field_id: field.id,
						column_name: field.name.clone(),
						expression,
						result_type,
						depends_on: dependencies,
					});
				}
				Err(mut error) => {
					error.notes.push(format!("in formula field '{}'", field.name));
					errors.push(error);
				}
			}
		}
		if errors.is_empty() {
			Ok(compiled)
		} else {
			debug!(count = errors.len(), "rejected during type check");
			Err(errors)
		}
	}

	fn parse_and_resolve(&self, table: &TableDef, field: &FieldDef) -> Result<(Expr, Vec<FieldId>), Vec<Error>> {
		let Some((expression, _)) = field.ty.formula() else {
			return Err(vec![error!(FormulaError::Internal {
				details: format!("field '{}' is not a formula field", field.name),
			})]);
		};

		let tokens = tokenize(expression).map_err(|error| vec![error])?;
		let expr = parse_formula(tokens, self.options.max_depth).map_err(|error| vec![error])?;

		let count = expr.node_count();
		if count > self.options.max_nodes {
			return Err(vec![error!(FormulaError::TooManyNodes {
				count,
				max_nodes: self.options.max_nodes,
			})]);
		}

		let mut expr = expr;
		let resolution = resolve::resolve(&mut expr, table, &field.name)?;
		Ok((expr, resolution.dependencies))
	}

	fn find_cycle(&self, fields: &[&FieldDef], parsed: &[(usize, Expr, Vec<FieldId>)]) -> Option<Vec<String>> {
		let mut graph = DependencyGraph::new();
		let mut nodes: HashMap<FieldId, usize> = HashMap::new();
		for field in fields {
			let node = graph.add_node(&field.name);
			nodes.insert(field.id, node);
		}
		for (index, _, dependencies) in parsed {
			for dependency in dependencies {
				// Only formula fields have nodes; stored fields cannot cycle
				if let Some(&to) = nodes.get(dependency) {
					graph.add_edge(*index, to);
				}
			}
		}
		graph.find_cycle()
	}

	fn check_and_render(&self, expr: &mut Expr, result_type: Type) -> Result<String, Error> {
		typecheck::check(expr, result_type)?;
		generate::render(expr)
	}
}

/// Compile a table with the default limits.
pub fn compile_table(table: &TableDef) -> Result<Vec<CompiledFormula>, Vec<Error>> {
	Compiler::new().compile(table)
}
