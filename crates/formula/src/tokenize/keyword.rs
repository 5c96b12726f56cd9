// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Gridbase

use std::{collections::HashMap, sync::LazyLock};

use super::{
	cursor::Cursor,
	identifier::is_identifier_char,
	token::{Token, TokenKind},
};

macro_rules! keyword {
    (
        $( $value:ident => $tag:literal ),*
    ) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Keyword {  $( $value ),* }

        impl Keyword {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $( Keyword::$value => $tag ),*
                }
            }
        }

        static KEYWORDS: LazyLock<HashMap<&'static str, Keyword>> = LazyLock::new(|| {
            let mut map = HashMap::new();
            $( map.insert($tag, Keyword::$value); )*
            map
        });
    };
}

keyword! {
	Case      => "CASE",
	When      => "WHEN",
	Then      => "THEN",
	Else      => "ELSE",
	End       => "END",
	Cast      => "CAST",
	As        => "AS",
	Extract   => "EXTRACT",
	Substring => "SUBSTRING",
	From      => "FROM",
	For       => "FOR",
	Interval  => "INTERVAL"
}

/// Scan for a keyword token (case-insensitive, whole word only)
pub fn scan_keyword(cursor: &mut Cursor) -> Option<Token> {
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
	let uppercase_word = word.to_uppercase();

	let keyword = *KEYWORDS.get(uppercase_word.as_str())?;

	// Must end at a word boundary, otherwise it is an identifier
	let next_char = cursor.peek_ahead(word.chars().count());
	if next_char.is_some_and(is_identifier_char) {
		return None;
	}

	for _ in 0..word.chars().count() {
		cursor.consume();
	}
	Some(Token {
		kind: TokenKind::Keyword(keyword),
		fragment: cursor.make_fragment(start_pos, start_line, start_column),
	})
}
