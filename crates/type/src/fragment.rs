// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Gridbase

use std::ops::Deref;

use serde::{Deserialize, Serialize};

#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StatementLine(pub u32);

impl Deref for StatementLine {
	type Target = u32;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

impl PartialEq<u32> for StatementLine {
	fn eq(&self, other: &u32) -> bool {
		self.0 == *other
	}
}

#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StatementColumn(pub u32);

impl Deref for StatementColumn {
	type Target = u32;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

impl PartialEq<u32> for StatementColumn {
	fn eq(&self, other: &u32) -> bool {
		self.0 == *other
	}
}

/// A slice of submitted formula text, carried through every compiler stage so
/// diagnostics can point at the offending characters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Fragment {
	/// Text taken from the submitted formula, with its 1-based position.
	Statement {
		text: String,
		line: StatementLine,
		column: StatementColumn,
	},
	/// Text produced by the compiler itself, with no source position.
	Internal {
		text: String,
	},
	None,
}

impl Fragment {
	pub fn statement(text: impl Into<String>, line: u32, column: u32) -> Self {
		Fragment::Statement {
			text: text.into(),
			line: StatementLine(line),
			column: StatementColumn(column),
		}
	}

	pub fn internal(text: impl Into<String>) -> Self {
		Fragment::Internal {
			text: text.into(),
		}
	}

	pub fn text(&self) -> &str {
		match self {
			Fragment::Statement {
				text,
				..
			} => text,
			Fragment::Internal {
				text,
			} => text,
			Fragment::None => "",
		}
	}

	/// The 1-based line, present only for submitted text.
	pub fn line(&self) -> Option<StatementLine> {
		match self {
			Fragment::Statement {
				line,
				..
			} => Some(*line),
			_ => None,
		}
	}

	/// The 1-based column, present only for submitted text.
	pub fn column(&self) -> Option<StatementColumn> {
		match self {
			Fragment::Statement {
				column,
				..
			} => Some(*column),
			_ => None,
		}
	}

	pub fn is_none(&self) -> bool {
		matches!(self, Fragment::None)
	}
}

impl Default for Fragment {
	fn default() -> Self {
		Fragment::None
	}
}
