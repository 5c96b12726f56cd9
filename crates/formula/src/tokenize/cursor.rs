// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Gridbase

use gridbase_type::Fragment;

/// A character cursor over the formula text, tracking byte offset plus
/// 1-based line/column for fragments.
pub struct Cursor<'a> {
	input: &'a str,
	offset: usize,
	line: u32,
	column: u32,
}

impl<'a> Cursor<'a> {
	pub fn new(input: &'a str) -> Self {
		Self {
			input,
			offset: 0,
			line: 1,
			column: 1,
		}
	}

	pub fn pos(&self) -> usize {
		self.offset
	}

	pub fn line(&self) -> u32 {
		self.line
	}

	pub fn column(&self) -> u32 {
		self.column
	}

	pub fn is_eof(&self) -> bool {
		self.offset >= self.input.len()
	}

	pub fn remaining_input(&self) -> &'a str {
		&self.input[self.offset..]
	}

	pub fn peek(&self) -> Option<char> {
		self.remaining_input().chars().next()
	}

	pub fn peek_ahead(&self, n: usize) -> Option<char> {
		self.remaining_input().chars().nth(n)
	}

	/// The next `n` characters as a string slice (fewer if near EOF).
	pub fn peek_str(&self, n: usize) -> &'a str {
		let rest = self.remaining_input();
		let end = rest.char_indices().nth(n).map(|(idx, _)| idx).unwrap_or(rest.len());
		&rest[..end]
	}

	pub fn consume(&mut self) -> Option<char> {
		let ch = self.peek()?;
		self.offset += ch.len_utf8();
		if ch == '\n' {
			self.line += 1;
			self.column = 1;
		} else {
			self.column += 1;
		}
		Some(ch)
	}

	/// Consume `s` if (and only if) the remaining input starts with it.
	pub fn consume_str(&mut self, s: &str) -> bool {
		if self.remaining_input().starts_with(s) {
			for _ in s.chars() {
				self.consume();
			}
			true
		} else {
			false
		}
	}

	pub fn skip_whitespace(&mut self) {
		while let Some(ch) = self.peek() {
			if ch.is_whitespace() {
				self.consume();
			} else {
				break;
			}
		}
	}

	/// Fragment covering everything consumed since the given start state.
	pub fn make_fragment(&self, start_pos: usize, start_line: u32, start_column: u32) -> Fragment {
		Fragment::statement(&self.input[start_pos..self.offset], start_line, start_column)
	}
}
