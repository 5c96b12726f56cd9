// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Gridbase

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::fragment::Fragment;

/// A structured, machine-readable compiler diagnostic.
///
/// The `code` is stable and identifies the error kind (`PARSE_004`,
/// `CYCLE_001`, ...); everything else exists to render a precise,
/// human-readable message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
	pub code: String,
	pub message: String,
	pub fragment: Fragment,
	pub label: Option<String>,
	pub help: Option<String>,
	pub notes: Vec<String>,
	pub cause: Option<Box<Diagnostic>>,
}

impl Diagnostic {
	pub fn render(&self) -> String {
		let mut out = format!("error[{}]: {}", self.code, self.message);

		if let Fragment::Statement {
			text,
			line,
			column,
		} = &self.fragment
		{
			out.push_str(&format!("\n  --> line {}, column {}: `{}`", line.0, column.0, text));
		}

		if let Some(label) = &self.label {
			out.push_str(&format!("\n  = {}", label));
		}

		if let Some(help) = &self.help {
			out.push_str(&format!("\n  help: {}", help));
		}

		for note in &self.notes {
			out.push_str(&format!("\n  note: {}", note));
		}

		if let Some(cause) = &self.cause {
			out.push_str(&format!("\n  caused by: {}", cause.render()));
		}

		out
	}
}

impl Display for Diagnostic {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.render().as_str())
	}
}
