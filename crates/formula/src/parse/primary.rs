// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Gridbase

use gridbase_type::err;

use super::{Parser, Precedence};
use crate::{
	ast::{Expr, FieldRefExpr, LiteralExpr, LiteralValue, PrefixExpr, PrefixOp},
	error::FormulaError,
	tokenize::{Keyword, Literal, Operator, TokenKind},
};

impl Parser {
	pub(crate) fn parse_primary(&mut self) -> crate::Result<Expr> {
		let token = self.current()?;
		match token.kind {
			TokenKind::Literal(literal) => {
				let token = self.advance()?;
				let value = match literal {
					Literal::Number => LiteralValue::Number(token.text().to_string()),
					Literal::Text => LiteralValue::Text(token.text().to_string()),
					Literal::True => LiteralValue::Bool(true),
					Literal::False => LiteralValue::Bool(false),
					Literal::Null => LiteralValue::Null,
				};
				Ok(Expr::Literal(LiteralExpr {
					value,
					fragment: token.fragment,
					ty: None,
				}))
			}

			TokenKind::Operator(Operator::Minus) => self.parse_prefix(PrefixOp::Minus),
			TokenKind::Operator(Operator::Plus) => self.parse_prefix(PrefixOp::Plus),
			TokenKind::Operator(Operator::Not) => self.parse_prefix(PrefixOp::Not),

			TokenKind::Operator(Operator::OpenParen) => {
				self.advance()?;
				let expr = self.parse_expr(Precedence::None)?;
				self.consume_operator(Operator::CloseParen)?;
				Ok(expr)
			}

			TokenKind::Keyword(Keyword::Case) => self.parse_case(),
			TokenKind::Keyword(Keyword::Cast) => self.parse_cast(),
			TokenKind::Keyword(Keyword::Extract) => self.parse_extract(),
			TokenKind::Keyword(Keyword::Substring) => self.parse_substring(),
			TokenKind::Keyword(Keyword::Interval) => self.parse_interval(),

			TokenKind::Identifier => {
				let token = self.advance()?;
				if self.current_opt().is_some_and(|next| next.is_operator(Operator::OpenParen)) {
					return self.parse_call(token);
				}
				Ok(Expr::FieldRef(FieldRefExpr {
					name: token.text().to_string(),
					fragment: token.fragment,
					target: None,
					ty: None,
				}))
			}

			_ => err!(FormulaError::UnexpectedToken {
				expected: "an expression".to_string(),
				fragment: token.fragment.clone(),
			}),
		}
	}

	fn parse_prefix(&mut self, op: PrefixOp) -> crate::Result<Expr> {
		let token = self.advance()?;
		// NOT binds looser than comparisons, so `NOT a = b` negates the
		// comparison; - and + bind tightest
		let precedence = match op {
			PrefixOp::Not => Precedence::LogicAnd,
			PrefixOp::Minus | PrefixOp::Plus => Precedence::Prefix,
		};
		let operand = self.parse_expr(precedence)?;
		Ok(Expr::Prefix(PrefixExpr {
			op,
			operand: Box::new(operand),
			fragment: token.fragment,
			ty: None,
		}))
	}

	/// INTERVAL '<count> <unit>', e.g. `INTERVAL '3 days'`
	fn parse_interval(&mut self) -> crate::Result<Expr> {
		let keyword = self.consume_keyword(Keyword::Interval)?;
		let token = self.current()?;
		if !token.is_literal(Literal::Text) {
			return err!(FormulaError::UnexpectedToken {
				expected: "a quoted interval like `'3 days'`".to_string(),
				fragment: token.fragment.clone(),
			});
		}
		let token = self.advance()?;
		Ok(Expr::Literal(LiteralExpr {
			value: LiteralValue::Interval(token.text().to_string()),
			fragment: keyword.fragment,
			ty: None,
		}))
	}
}
