// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Gridbase

use gridbase_type::Fragment;

use super::{keyword::Keyword, operator::Operator, separator::Separator};

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
	pub kind: TokenKind,
	pub fragment: Fragment,
}

impl Token {
	pub fn text(&self) -> &str {
		self.fragment.text()
	}

	pub fn is_identifier(&self) -> bool {
		self.kind == TokenKind::Identifier
	}

	pub fn is_keyword(&self, keyword: Keyword) -> bool {
		self.kind == TokenKind::Keyword(keyword)
	}

	pub fn is_operator(&self, operator: Operator) -> bool {
		self.kind == TokenKind::Operator(operator)
	}

	pub fn is_separator(&self, separator: Separator) -> bool {
		self.kind == TokenKind::Separator(separator)
	}

	pub fn is_literal(&self, literal: Literal) -> bool {
		self.kind == TokenKind::Literal(literal)
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
	Identifier,
	Keyword(Keyword),
	Literal(Literal),
	Operator(Operator),
	Separator(Separator),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Literal {
	Number,
	Text,
	True,
	False,
	Null,
}
