// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Gridbase

pub mod call;
pub mod case;
pub mod cast;
pub mod infix;
pub mod primary;

use gridbase_type::{err, return_error};

use crate::{
	ast::Expr,
	error::FormulaError,
	tokenize::{Keyword, Operator, Token, TokenKind},
};

/// Binding strength, weakest first. An infix operator consumes its right
/// operand at its own precedence, which makes every operator left-associative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
	None,
	LogicOr,
	LogicAnd,
	Comparison,
	Concat,
	Term,
	Factor,
	Prefix,
	Primary,
}

pub const fn precedence_of(operator: Operator) -> Precedence {
	match operator {
		Operator::Or => Precedence::LogicOr,
		Operator::And => Precedence::LogicAnd,
		Operator::Equal
		| Operator::BangEqual
		| Operator::LeftAngle
		| Operator::LeftAngleEqual
		| Operator::RightAngle
		| Operator::RightAngleEqual
		| Operator::Tilde => Precedence::Comparison,
		Operator::DoublePipe => Precedence::Concat,
		Operator::Plus | Operator::Minus => Precedence::Term,
		Operator::Asterisk | Operator::Slash | Operator::Percent => Precedence::Factor,
		Operator::DoubleColon => Precedence::Primary,
		_ => Precedence::None,
	}
}

/// Parse a token stream into a single expression.
///
/// Anything left over after the expression is a trailing-input error, so a
/// formula is always exactly one expression.
pub fn parse_formula(tokens: Vec<Token>, max_depth: usize) -> crate::Result<Expr> {
	let mut parser = Parser::new(tokens, max_depth);
	let expr = parser.parse_expr(Precedence::None)?;
	if let Some(token) = parser.current_opt() {
		return err!(FormulaError::TrailingTokens {
			fragment: token.fragment.clone(),
		});
	}
	Ok(expr)
}

pub struct Parser {
	tokens: Vec<Token>,
	position: usize,
	depth: usize,
	max_depth: usize,
}

impl Parser {
	pub fn new(tokens: Vec<Token>, max_depth: usize) -> Self {
		Self {
			tokens,
			position: 0,
			depth: 0,
			max_depth,
		}
	}

	pub(crate) fn parse_expr(&mut self, precedence: Precedence) -> crate::Result<Expr> {
		self.enter()?;
		let mut left = self.parse_primary()?;
		loop {
			let Some(token) = self.current_opt() else {
				break;
			};
			let TokenKind::Operator(operator) = token.kind else {
				break;
			};
			let next = precedence_of(operator);
			if next <= precedence {
				break;
			}
			left = self.parse_infix(left)?;
		}
		self.leave();
		Ok(left)
	}

	fn enter(&mut self) -> crate::Result<()> {
		self.depth += 1;
		if self.depth > self.max_depth {
			return_error!(FormulaError::TooDeep {
				max_depth: self.max_depth,
			});
		}
		Ok(())
	}

	fn leave(&mut self) {
		self.depth -= 1;
	}

	pub(crate) fn current_opt(&self) -> Option<&Token> {
		self.tokens.get(self.position)
	}

	pub(crate) fn current(&self) -> crate::Result<&Token> {
		match self.tokens.get(self.position) {
			Some(token) => Ok(token),
			None => err!(FormulaError::UnexpectedEof),
		}
	}

	pub(crate) fn advance(&mut self) -> crate::Result<Token> {
		match self.tokens.get(self.position) {
			Some(token) => {
				let token = token.clone();
				self.position += 1;
				Ok(token)
			}
			None => err!(FormulaError::UnexpectedEof),
		}
	}

	pub(crate) fn consume_operator(&mut self, operator: Operator) -> crate::Result<Token> {
		let token = self.current()?;
		if !token.is_operator(operator) {
			return err!(FormulaError::UnexpectedToken {
				expected: format!("`{}`", operator.as_str()),
				fragment: token.fragment.clone(),
			});
		}
		self.advance()
	}

	pub(crate) fn consume_keyword(&mut self, keyword: Keyword) -> crate::Result<Token> {
		let token = self.current()?;
		if !token.is_keyword(keyword) {
			return err!(FormulaError::UnexpectedToken {
				expected: format!("`{}`", keyword.as_str()),
				fragment: token.fragment.clone(),
			});
		}
		self.advance()
	}

	/// Consume the current token when it is the given operator.
	pub(crate) fn consume_if_operator(&mut self, operator: Operator) -> bool {
		if self.current_opt().is_some_and(|token| token.is_operator(operator)) {
			self.position += 1;
			true
		} else {
			false
		}
	}

	pub(crate) fn consume_if_keyword(&mut self, keyword: Keyword) -> bool {
		if self.current_opt().is_some_and(|token| token.is_keyword(keyword)) {
			self.position += 1;
			true
		} else {
			false
		}
	}
}
