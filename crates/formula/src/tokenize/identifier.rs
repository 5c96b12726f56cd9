// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Gridbase

use super::{
	cursor::Cursor,
	token::{Token, TokenKind},
};

pub fn is_identifier_start(ch: char) -> bool {
	ch.is_ascii_alphabetic() || ch == '_'
}

pub fn is_identifier_char(ch: char) -> bool {
	ch.is_ascii_alphanumeric() || ch == '_'
}

/// Scan for an identifier token (field or function name)
pub fn scan_identifier(cursor: &mut Cursor) -> Option<Token> {
	let start_pos = cursor.pos();
	let start_line = cursor.line();
	let start_column = cursor.column();

	let ch = cursor.peek()?;
	if !is_identifier_start(ch) {
		return None;
	}

	while let Some(ch) = cursor.peek() {
		if is_identifier_char(ch) {
			cursor.consume();
		} else {
			break;
		}
	}

	Some(Token {
		kind: TokenKind::Identifier,
		fragment: cursor.make_fragment(start_pos, start_line, start_column),
	})
}
