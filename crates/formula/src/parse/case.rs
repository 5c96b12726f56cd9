// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Gridbase

use super::{Parser, Precedence};
use crate::{
	ast::{CaseBranch, CaseExpr, Expr},
	tokenize::Keyword,
};

impl Parser {
	/// CASE WHEN <cond> THEN <result> [WHEN ...] [ELSE <result>] END
	pub(crate) fn parse_case(&mut self) -> crate::Result<Expr> {
		let keyword = self.consume_keyword(Keyword::Case)?;

		let mut branches = Vec::new();
		self.consume_keyword(Keyword::When)?;
		loop {
			let condition = self.parse_expr(Precedence::None)?;
			self.consume_keyword(Keyword::Then)?;
			let result = self.parse_expr(Precedence::None)?;
			branches.push(CaseBranch {
				condition,
				result,
			});
			if !self.consume_if_keyword(Keyword::When) {
				break;
			}
		}

		let otherwise = if self.consume_if_keyword(Keyword::Else) {
			Some(Box::new(self.parse_expr(Precedence::None)?))
		} else {
			None
		};
		self.consume_keyword(Keyword::End)?;

		Ok(Expr::Case(CaseExpr {
			branches,
			otherwise,
			fragment: keyword.fragment,
			ty: None,
		}))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{parse::parse_formula, tokenize::tokenize};

	fn parse(input: &str) -> crate::Result<Expr> {
		parse_formula(tokenize(input)?, 64)
	}

	fn case(input: &str) -> CaseExpr {
		match parse(input).unwrap() {
			Expr::Case(node) => node,
			other => panic!("expected case, got {:?}", other),
		}
	}

	#[test]
	fn test_case_with_else() {
		let node = case("CASE WHEN on_sale THEN price * 0.9 ELSE price END");
		assert_eq!(node.branches.len(), 1);
		assert!(node.otherwise.is_some());
	}

	#[test]
	fn test_case_without_else() {
		let node = case("CASE WHEN qty > 0 THEN 'in stock' END");
		assert_eq!(node.branches.len(), 1);
		assert!(node.otherwise.is_none());
	}

	#[test]
	fn test_case_with_multiple_branches() {
		let node = case("CASE WHEN a THEN 1 WHEN b THEN 2 WHEN c THEN 3 ELSE 0 END");
		assert_eq!(node.branches.len(), 3);
	}

	#[test]
	fn test_nested_case() {
		let node = case("CASE WHEN a THEN CASE WHEN b THEN 1 ELSE 2 END ELSE 3 END");
		assert!(matches!(node.branches[0].result, Expr::Case(_)));
	}

	#[test]
	fn test_case_requires_when() {
		let err = parse("CASE ELSE 1 END").unwrap_err();
		assert_eq!(err.code(), "PARSE_004");
	}

	#[test]
	fn test_case_requires_end() {
		let err = parse("CASE WHEN a THEN 1").unwrap_err();
		assert_eq!(err.code(), "PARSE_003");
	}
}
