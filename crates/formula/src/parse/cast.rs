// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Gridbase

use super::{Parser, Precedence};
use crate::{
	ast::{CastExpr, Expr},
	tokenize::{Keyword, Operator},
};

impl Parser {
	/// CAST(<expr> AS <type>)
	pub(crate) fn parse_cast(&mut self) -> crate::Result<Expr> {
		self.consume_keyword(Keyword::Cast)?;
		self.consume_operator(Operator::OpenParen)?;
		let operand = self.parse_expr(Precedence::None)?;
		self.consume_keyword(Keyword::As)?;
		let (target, token) = self.parse_cast_target()?;
		self.consume_operator(Operator::CloseParen)?;
		Ok(Expr::Cast(CastExpr {
			operand: Box::new(operand),
			target,
			fragment: token.fragment,
			ty: None,
		}))
	}
}
