// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Gridbase

use gridbase_type::err;

use super::{Parser, Precedence};
use crate::{
	ast::{CallExpr, Expr, LiteralExpr, LiteralValue},
	error::FormulaError,
	tokenize::{Keyword, Operator, Separator, Token},
};

impl Parser {
	/// A regular function call: the name token has already been consumed and
	/// the current token is `(`.
	pub(crate) fn parse_call(&mut self, name: Token) -> crate::Result<Expr> {
		self.consume_operator(Operator::OpenParen)?;
		let mut args = Vec::new();
		if !self.consume_if_operator(Operator::CloseParen) {
			loop {
				args.push(self.parse_expr(Precedence::None)?);
				if !self.consume_if_separator(Separator::Comma) {
					break;
				}
			}
			self.consume_operator(Operator::CloseParen)?;
		}
		Ok(Expr::Call(CallExpr {
			name: name.text().to_string(),
			function: None,
			args,
			fragment: name.fragment,
			ty: None,
		}))
	}

	/// EXTRACT(<part> FROM <expr>). The part travels as a text literal in
	/// argument position 0 and is validated during type checking.
	pub(crate) fn parse_extract(&mut self) -> crate::Result<Expr> {
		let keyword = self.consume_keyword(Keyword::Extract)?;
		self.consume_operator(Operator::OpenParen)?;

		let part = self.current()?;
		if !part.is_identifier() {
			return err!(FormulaError::UnexpectedToken {
				expected: "a date part such as `year` or `month`".to_string(),
				fragment: part.fragment.clone(),
			});
		}
		let part = self.advance()?;

		self.consume_keyword(Keyword::From)?;
		let source = self.parse_expr(Precedence::None)?;
		self.consume_operator(Operator::CloseParen)?;

		Ok(Expr::Call(CallExpr {
			name: "EXTRACT".to_string(),
			function: None,
			args: vec![
				Expr::Literal(LiteralExpr {
					value: LiteralValue::Text(part.text().to_string()),
					fragment: part.fragment,
					ty: None,
				}),
				source,
			],
			fragment: keyword.fragment,
			ty: None,
		}))
	}

	/// SUBSTRING(<text> FROM <start> [FOR <count>]) or the plain call form
	/// SUBSTRING(<text>, <start> [, <count>]).
	pub(crate) fn parse_substring(&mut self) -> crate::Result<Expr> {
		let keyword = self.consume_keyword(Keyword::Substring)?;
		self.consume_operator(Operator::OpenParen)?;

		let mut args = vec![self.parse_expr(Precedence::None)?];
		if self.consume_if_keyword(Keyword::From) {
			args.push(self.parse_expr(Precedence::None)?);
			if self.consume_if_keyword(Keyword::For) {
				args.push(self.parse_expr(Precedence::None)?);
			}
		} else {
			while self.consume_if_separator(Separator::Comma) {
				args.push(self.parse_expr(Precedence::None)?);
			}
		}
		self.consume_operator(Operator::CloseParen)?;

		Ok(Expr::Call(CallExpr {
			name: "SUBSTRING".to_string(),
			function: None,
			args,
			fragment: keyword.fragment,
			ty: None,
		}))
	}

	pub(crate) fn consume_if_separator(&mut self, separator: Separator) -> bool {
		if self.current_opt().is_some_and(|token| token.is_separator(separator)) {
			self.position += 1;
			true
		} else {
			false
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{parse::parse_formula, tokenize::tokenize};

	fn parse(input: &str) -> crate::Result<Expr> {
		parse_formula(tokenize(input)?, 64)
	}

	fn call(input: &str) -> CallExpr {
		match parse(input).unwrap() {
			Expr::Call(node) => node,
			other => panic!("expected call, got {:?}", other),
		}
	}

	#[test]
	fn test_call_with_arguments() {
		let node = call("ROUND(total, 2)");
		assert_eq!(node.name, "ROUND");
		assert_eq!(node.args.len(), 2);
		assert!(node.function.is_none());
	}

	#[test]
	fn test_call_without_arguments() {
		let node = call("NOW()");
		assert_eq!(node.name, "NOW");
		assert!(node.args.is_empty());
	}

	#[test]
	fn test_nested_calls() {
		let node = call("COALESCE(ROUND(a), 0)");
		assert_eq!(node.args.len(), 2);
		assert!(matches!(node.args[0], Expr::Call(_)));
	}

	#[test]
	fn test_extract() {
		let node = call("EXTRACT(year FROM created_at)");
		assert_eq!(node.name, "EXTRACT");
		assert_eq!(node.args.len(), 2);
		let Expr::Literal(part) = &node.args[0] else {
			panic!()
		};
		assert_eq!(part.value, LiteralValue::Text("year".to_string()));
	}

	#[test]
	fn test_substring_from_for() {
		let node = call("SUBSTRING(name FROM 2 FOR 3)");
		assert_eq!(node.name, "SUBSTRING");
		assert_eq!(node.args.len(), 3);
	}

	#[test]
	fn test_substring_call_form() {
		let node = call("SUBSTRING(name, 2)");
		assert_eq!(node.args.len(), 2);
	}

	#[test]
	fn test_missing_close_paren() {
		let err = parse("ROUND(total").unwrap_err();
		assert_eq!(err.code(), "PARSE_003");
	}
}
