// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Gridbase

use gridbase_type::{Type, err};

use crate::{
	ast::{CallExpr, CastExpr, Expr, InfixOp, LiteralValue, PrefixOp},
	error::FormulaError,
	function::FunctionKind,
};

/// Render a resolved, type-checked expression as a PostgreSQL expression
/// suitable for a `GENERATED ALWAYS AS (...) STORED` column.
///
/// Every composite node is parenthesized, so operator precedence of the
/// output never depends on the precedence rules of the target dialect.
pub fn render(expr: &Expr) -> crate::Result<String> {
	let sql = match expr {
		Expr::Literal(node) => match &node.value {
			LiteralValue::Number(text) => text.clone(),
			LiteralValue::Text(text) => quote_text(text),
			LiteralValue::Bool(true) => "TRUE".to_string(),
			LiteralValue::Bool(false) => "FALSE".to_string(),
			LiteralValue::Null => "NULL".to_string(),
			LiteralValue::Interval(body) => format!("INTERVAL {}", quote_text(body)),
		},

		Expr::FieldRef(node) => {
			if node.target.is_none() {
				return err!(FormulaError::Internal {
					details: format!("rendering unresolved field reference '{}'", node.name),
				});
			}
			quote_ident(&node.name)
		}

		Expr::Prefix(node) => {
			let operand = render(&node.operand)?;
			match node.op {
				PrefixOp::Minus => format!("(- {operand})"),
				PrefixOp::Plus => format!("(+ {operand})"),
				PrefixOp::Not => format!("(NOT {operand})"),
			}
		}

		Expr::Infix(node) => {
			let left = render(&node.left)?;
			let right = render(&node.right)?;
			// Integer division would truncate, so cast one side
			if node.op == InfixOp::Divide
				&& node.left.ty() == Some(Type::Int)
				&& node.right.ty() == Some(Type::Int)
			{
				format!("(({left})::numeric / {right})")
			} else {
				format!("({left} {} {right})", node.op.as_str())
			}
		}

		Expr::Call(node) => render_call(node)?,

		Expr::Case(node) => {
			let mut sql = String::from("(CASE");
			for branch in &node.branches {
				sql.push_str(" WHEN ");
				sql.push_str(&render(&branch.condition)?);
				sql.push_str(" THEN ");
				sql.push_str(&render(&branch.result)?);
			}
			if let Some(otherwise) = &node.otherwise {
				sql.push_str(" ELSE ");
				sql.push_str(&render(otherwise)?);
			}
			sql.push_str(" END)");
			sql
		}

		Expr::Cast(node) => render_cast(node)?,
	};
	Ok(sql)
}

fn render_cast(node: &CastExpr) -> crate::Result<String> {
	let operand = render(&node.operand)?;
	Ok(format!("({operand})::{}", node.target.postgres_name()))
}

fn render_call(node: &CallExpr) -> crate::Result<String> {
	let Some(kind) = node.function else {
		return err!(FormulaError::Internal {
			details: format!("rendering unresolved function call '{}'", node.name),
		});
	};

	let mut args = Vec::with_capacity(node.args.len());
	for arg in &node.args {
		args.push(render(arg)?);
	}

	let sql = match kind {
		// EXTRACT uses its field-name syntax, the part is not a string
		FunctionKind::Extract => {
			let part = date_part(node, 0)?;
			format!("EXTRACT({} FROM {})", part.to_uppercase(), args[1])
		}

		FunctionKind::DateTrunc => {
			let part = date_part(node, 0)?;
			format!("DATE_TRUNC({}, {})", quote_text(&part.to_lowercase()), args[1])
		}

		FunctionKind::Substring => {
			// Two text arguments is the pattern form
			if node.args.len() == 2 && node.args[1].ty() == Some(Type::Utf8) {
				format!("SUBSTRING({} FROM {})", args[0], args[1])
			} else {
				format!("SUBSTRING({})", args.join(", "))
			}
		}

		// Subscripting, not a function, on the PostgreSQL side
		FunctionKind::ArraySlice => format!("({})[{}:{}]", args[0], args[1], args[2]),

		// text[] is one-dimensional; default the dimension
		FunctionKind::ArrayLength => {
			if args.len() == 1 {
				format!("ARRAY_LENGTH({}, 1)", args[0])
			} else {
				format!("ARRAY_LENGTH({})", args.join(", "))
			}
		}

		FunctionKind::Now | FunctionKind::CurrentDate => {
			return err!(FormulaError::Internal {
				details: format!("volatile function {} survived resolution", kind.as_str()),
			});
		}

		_ => format!("{}({})", kind.as_str(), args.join(", ")),
	};
	Ok(sql)
}

fn date_part<'a>(node: &'a CallExpr, index: usize) -> crate::Result<&'a str> {
	if let Some(Expr::Literal(part)) = node.args.get(index) {
		if let LiteralValue::Text(text) = &part.value {
			return Ok(text);
		}
	}
	err!(FormulaError::Internal {
		details: format!("{} call without a date-part literal", node.name),
	})
}

/// Always double-quote, so reserved words and mixed-case names are safe as
/// column references.
pub fn quote_ident(name: &str) -> String {
	format!("\"{}\"", name.replace('"', "\"\""))
}

/// Single-quote a text literal, doubling embedded quotes.
pub fn quote_text(text: &str) -> String {
	format!("'{}'", text.replace('\'', "''"))
}
