// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Gridbase

pub mod cursor;
pub mod identifier;
pub mod keyword;
pub mod literal;
pub mod operator;
pub mod separator;
pub mod token;

use gridbase_type::err;

pub use self::{
	keyword::Keyword,
	operator::Operator,
	separator::Separator,
	token::{Literal, Token, TokenKind},
};
use self::{
	cursor::Cursor,
	identifier::scan_identifier,
	keyword::scan_keyword,
	literal::{scan_number, scan_text, scan_word_literal},
	operator::scan_operator,
	separator::scan_separator,
};
use crate::error::FormulaError;

/// Split a formula string into tokens.
///
/// Scan order matters: keywords and word literals before word operators,
/// word operators before identifiers, so that `CASE`, `TRUE` and `AND` never
/// scan as field names while `android` still does.
pub fn tokenize(input: &str) -> crate::Result<Vec<Token>> {
	let mut cursor = Cursor::new(input);
	let mut tokens = Vec::new();

	loop {
		cursor.skip_whitespace();
		if cursor.is_eof() {
			break;
		}

		if let Some(token) = scan_keyword(&mut cursor) {
			tokens.push(token);
			continue;
		}
		if let Some(token) = scan_word_literal(&mut cursor) {
			tokens.push(token);
			continue;
		}
		if let Some(token) = scan_operator(&mut cursor) {
			tokens.push(token);
			continue;
		}
		if let Some(token) = scan_number(&mut cursor) {
			tokens.push(token);
			continue;
		}
		if let Some(token) = scan_text(&mut cursor)? {
			tokens.push(token);
			continue;
		}
		if let Some(token) = scan_identifier(&mut cursor) {
			tokens.push(token);
			continue;
		}
		if let Some(token) = scan_separator(&mut cursor) {
			tokens.push(token);
			continue;
		}

		let start_pos = cursor.pos();
		let start_line = cursor.line();
		let start_column = cursor.column();
		cursor.consume();
		return err!(FormulaError::UnexpectedCharacter {
			fragment: cursor.make_fragment(start_pos, start_line, start_column),
		});
	}

	Ok(tokens)
}
