// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Gridbase

use gridbase_type::{Type, err};

use super::{Parser, precedence_of};
use crate::{
	ast::{CastExpr, Expr, InfixExpr, InfixOp},
	error::FormulaError,
	tokenize::{Operator, TokenKind},
};

impl Parser {
	pub(crate) fn parse_infix(&mut self, left: Expr) -> crate::Result<Expr> {
		let token = self.advance()?;
		let TokenKind::Operator(operator) = token.kind else {
			return err!(FormulaError::UnexpectedToken {
				expected: "an operator".to_string(),
				fragment: token.fragment,
			});
		};

		// `x::type` is a cast suffix, not a binary expression
		if operator == Operator::DoubleColon {
			return self.parse_cast_suffix(left);
		}

		let op = match operator {
			Operator::Plus => InfixOp::Add,
			Operator::Minus => InfixOp::Subtract,
			Operator::Asterisk => InfixOp::Multiply,
			Operator::Slash => InfixOp::Divide,
			Operator::Percent => InfixOp::Remainder,
			Operator::DoublePipe => InfixOp::Concat,
			Operator::Equal => InfixOp::Equal,
			Operator::BangEqual => InfixOp::NotEqual,
			Operator::LeftAngle => InfixOp::LessThan,
			Operator::LeftAngleEqual => InfixOp::LessThanEqual,
			Operator::RightAngle => InfixOp::GreaterThan,
			Operator::RightAngleEqual => InfixOp::GreaterThanEqual,
			Operator::And => InfixOp::And,
			Operator::Or => InfixOp::Or,
			Operator::Tilde => InfixOp::RegexMatch,
			_ => {
				return err!(FormulaError::UnexpectedToken {
					expected: "a binary operator".to_string(),
					fragment: token.fragment,
				});
			}
		};

		let right = self.parse_expr(precedence_of(operator))?;
		Ok(Expr::Infix(InfixExpr {
			op,
			left: Box::new(left),
			right: Box::new(right),
			fragment: token.fragment,
			ty: None,
		}))
	}

	fn parse_cast_suffix(&mut self, operand: Expr) -> crate::Result<Expr> {
		let (target, token) = self.parse_cast_target()?;
		Ok(Expr::Cast(CastExpr {
			operand: Box::new(operand),
			target,
			fragment: token.fragment,
			ty: None,
		}))
	}

	/// A cast target type name. `interval` tokenizes as a keyword, every
	/// other accepted spelling as an identifier.
	pub(crate) fn parse_cast_target(&mut self) -> crate::Result<(Type, crate::tokenize::Token)> {
		let token = self.current()?;
		if token.is_keyword(crate::tokenize::Keyword::Interval) {
			let token = self.advance()?;
			return Ok((Type::Interval, token));
		}
		if !token.is_identifier() {
			return err!(FormulaError::UnknownCastType {
				fragment: token.fragment.clone(),
			});
		}
		let token = self.advance()?;
		let Some(target) = Type::parse_cast_target(token.text()) else {
			return err!(FormulaError::UnknownCastType {
				fragment: token.fragment,
			});
		};
		Ok((target, token))
	}
}
