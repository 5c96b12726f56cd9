// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Gridbase

use gridbase_type::{Fragment, err};

use super::{
	cursor::Cursor,
	identifier::is_identifier_char,
	token::{Literal, Token, TokenKind},
};
use crate::error::FormulaError;

/// Scan for a number literal: digits with an optional fraction part
pub fn scan_number(cursor: &mut Cursor) -> Option<Token> {
	let start_pos = cursor.pos();
	let start_line = cursor.line();
	let start_column = cursor.column();

	let ch = cursor.peek()?;
	if !ch.is_ascii_digit() {
		return None;
	}

	while cursor.peek().is_some_and(|ch| ch.is_ascii_digit()) {
		cursor.consume();
	}

	// Fraction part, only when a digit follows the dot
	if cursor.peek() == Some('.') && cursor.peek_ahead(1).is_some_and(|ch| ch.is_ascii_digit()) {
		cursor.consume();
		while cursor.peek().is_some_and(|ch| ch.is_ascii_digit()) {
			cursor.consume();
		}
	}

	Some(Token {
		kind: TokenKind::Literal(Literal::Number),
		fragment: cursor.make_fragment(start_pos, start_line, start_column),
	})
}

/// Scan for a text literal: single-quoted, with `''` as the escape for an
/// embedded quote. The token fragment carries the unescaped value.
pub fn scan_text(cursor: &mut Cursor) -> crate::Result<Option<Token>> {
	let start_pos = cursor.pos();
	let start_line = cursor.line();
	let start_column = cursor.column();

	if cursor.peek() != Some('\'') {
		return Ok(None);
	}
	cursor.consume();

	let mut value = String::new();
	loop {
		match cursor.consume() {
			Some('\'') => {
				if cursor.peek() == Some('\'') {
					cursor.consume();
					value.push('\'');
				} else {
					break;
				}
			}
			Some(ch) => value.push(ch),
			None => {
				return err!(FormulaError::UnterminatedText {
					fragment: cursor.make_fragment(start_pos, start_line, start_column),
				});
			}
		}
	}

	Ok(Some(Token {
		kind: TokenKind::Literal(Literal::Text),
		fragment: Fragment::statement(value, start_line, start_column),
	}))
}

/// Scan for the word literals TRUE, FALSE and NULL (case-insensitive)
pub fn scan_word_literal(cursor: &mut Cursor) -> Option<Token> {
	let start_pos = cursor.pos();
	let start_line = cursor.line();
	let start_column = cursor.column();

	let ch = cursor.peek()?;
	if !ch.is_ascii_alphabetic() {
		return None;
	}

	let remaining = cursor.remaining_input();
	let word_len = remaining.chars().take_while(|&c| is_identifier_char(c)).map(|c| c.len_utf8()).sum::<usize>();
	let word = &remaining[..word_len];

	let literal = match word.to_uppercase().as_str() {
		"TRUE" => Literal::True,
		"FALSE" => Literal::False,
		"NULL" => Literal::Null,
		_ => return None,
	};

	let next_char = cursor.peek_ahead(word.chars().count());
	if next_char.is_some_and(is_identifier_char) {
		return None;
	}

	for _ in 0..word.chars().count() {
		cursor.consume();
	}
	Some(Token {
		kind: TokenKind::Literal(literal),
		fragment: cursor.make_fragment(start_pos, start_line, start_column),
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::tokenize::tokenize;

	#[test]
	fn test_integer() {
		let tokens = tokenize("42").unwrap();
		assert_eq!(tokens[0].kind, TokenKind::Literal(Literal::Number));
		assert_eq!(tokens[0].fragment.text(), "42");
	}

	#[test]
	fn test_decimal() {
		let tokens = tokenize("3.25").unwrap();
		assert_eq!(tokens.len(), 1);
		assert_eq!(tokens[0].kind, TokenKind::Literal(Literal::Number));
		assert_eq!(tokens[0].fragment.text(), "3.25");
	}

	#[test]
	fn test_trailing_dot_is_not_part_of_the_number() {
		// `1.` scans as the number 1 followed by an unexpected `.`
		let err = tokenize("1.").unwrap_err();
		assert_eq!(err.code(), "PARSE_001");
	}

	#[test]
	fn test_text() {
		let tokens = tokenize("'hello'").unwrap();
		assert_eq!(tokens[0].kind, TokenKind::Literal(Literal::Text));
		assert_eq!(tokens[0].fragment.text(), "hello");
	}

	#[test]
	fn test_text_with_escaped_quote() {
		let tokens = tokenize("'it''s'").unwrap();
		assert_eq!(tokens[0].fragment.text(), "it's");
	}

	#[test]
	fn test_empty_text() {
		let tokens = tokenize("''").unwrap();
		assert_eq!(tokens[0].kind, TokenKind::Literal(Literal::Text));
		assert_eq!(tokens[0].fragment.text(), "");
	}

	#[test]
	fn test_unterminated_text() {
		let err = tokenize("'oops").unwrap_err();
		assert_eq!(err.code(), "PARSE_002");
	}

	#[test]
	fn test_word_literals() {
		let tokens = tokenize("TRUE false Null").unwrap();
		assert_eq!(tokens[0].kind, TokenKind::Literal(Literal::True));
		assert_eq!(tokens[1].kind, TokenKind::Literal(Literal::False));
		assert_eq!(tokens[2].kind, TokenKind::Literal(Literal::Null));
	}

	#[test]
	fn test_word_literal_prefix_is_an_identifier() {
		let tokens = tokenize("nullable").unwrap();
		assert_eq!(tokens[0].kind, TokenKind::Identifier);
	}
}
