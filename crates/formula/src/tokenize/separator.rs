// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Gridbase

use super::{
	cursor::Cursor,
	token::{Token, TokenKind},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Separator {
	Comma,
}

impl Separator {
	pub fn as_str(&self) -> &'static str {
		match self {
			Separator::Comma => ",",
		}
	}
}

pub fn scan_separator(cursor: &mut Cursor) -> Option<Token> {
	let start_pos = cursor.pos();
	let start_line = cursor.line();
	let start_column = cursor.column();

	match cursor.peek()? {
		',' => {
			cursor.consume();
			Some(Token {
				kind: TokenKind::Separator(Separator::Comma),
				fragment: cursor.make_fragment(start_pos, start_line, start_column),
			})
		}
		_ => None,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::tokenize::tokenize;

	#[test]
	fn test_comma() {
		let tokens = tokenize("a, b").unwrap();
		assert_eq!(tokens[1].kind, TokenKind::Separator(Separator::Comma));
		assert_eq!(tokens[1].fragment.text(), ",");
		assert_eq!(tokens[1].fragment.column().map(|column| column.0), Some(2));
	}
}
