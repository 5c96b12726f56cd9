// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Gridbase

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// A gridbase value type: the closed set of types a field can store and a
/// formula expression can produce.
///
/// The wire spellings accept the same aliases everywhere they appear, so a
/// stored field's `type` and a formula field's `resultType` can use the same
/// names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Type {
	/// A boolean: true or false.
	#[serde(alias = "boolean")]
	Bool,
	/// An 8-byte signed integer.
	#[serde(alias = "integer")]
	Int,
	/// An arbitrary-precision decimal number.
	Decimal,
	/// A UTF-8 encoded text.
	#[serde(alias = "text")]
	Utf8,
	/// A calendar date (year, month, day).
	Date,
	/// A point in time with time zone.
	Timestamp,
	/// A duration; only occurs as an intermediate in date arithmetic.
	Interval,
	/// An array of text values.
	#[serde(alias = "text[]")]
	TextArray,
	/// The type of the NULL literal before it is coerced into context.
	Undefined,
}

impl Type {
	pub fn is_number(&self) -> bool {
		matches!(self, Type::Int | Type::Decimal)
	}

	pub fn is_text(&self) -> bool {
		matches!(self, Type::Utf8)
	}

	pub fn is_bool(&self) -> bool {
		matches!(self, Type::Bool)
	}

	pub fn is_temporal(&self) -> bool {
		matches!(self, Type::Date | Type::Timestamp)
	}

	pub fn is_array(&self) -> bool {
		matches!(self, Type::TextArray)
	}

	pub fn is_undefined(&self) -> bool {
		matches!(self, Type::Undefined)
	}

	/// Whether a field can declare this type as its storage/result type.
	pub fn is_storable(&self) -> bool {
		!matches!(self, Type::Interval | Type::Undefined)
	}

	/// Resolve a cast target as written in a formula (`x::BIGINT`,
	/// `CAST(x AS NUMERIC)`). Accepts the usual SQL spellings.
	pub fn parse_cast_target(name: &str) -> Option<Type> {
		match name.to_ascii_uppercase().as_str() {
			"BOOL" | "BOOLEAN" => Some(Type::Bool),
			"INT" | "INTEGER" | "BIGINT" | "INT8" => Some(Type::Int),
			"DECIMAL" | "NUMERIC" => Some(Type::Decimal),
			"TEXT" | "VARCHAR" => Some(Type::Utf8),
			"DATE" => Some(Type::Date),
			"TIMESTAMP" | "TIMESTAMPTZ" => Some(Type::Timestamp),
			"INTERVAL" => Some(Type::Interval),
			_ => None,
		}
	}

	/// The PostgreSQL type name used when rendering casts and column DDL.
	pub fn postgres_name(&self) -> &'static str {
		match self {
			Type::Bool => "boolean",
			Type::Int => "bigint",
			Type::Decimal => "numeric",
			Type::Utf8 => "text",
			Type::Date => "date",
			Type::Timestamp => "timestamptz",
			Type::Interval => "interval",
			Type::TextArray => "text[]",
			Type::Undefined => "unknown",
		}
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			Type::Bool => "bool",
			Type::Int => "int",
			Type::Decimal => "decimal",
			Type::Utf8 => "utf8",
			Type::Date => "date",
			Type::Timestamp => "timestamp",
			Type::Interval => "interval",
			Type::TextArray => "textarray",
			Type::Undefined => "undefined",
		}
	}
}

impl Display for Type {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}
