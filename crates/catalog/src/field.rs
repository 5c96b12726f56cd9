// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Gridbase

use std::fmt::{Display, Formatter};

use gridbase_type::Type;
use serde::{Deserialize, Serialize};

#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FieldId(pub u64);

impl Display for FieldId {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		Display::fmt(&self.0, f)
	}
}

/// The declared type of a field: either a stored value type or a formula
/// computed from sibling fields.
///
/// Encoding the formula payload in the variant keeps the descriptor
/// structural: a stored field cannot carry formula text, and a formula field
/// cannot exist without its expression and asserted result type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FieldType {
	#[serde(alias = "boolean")]
	Bool,
	#[serde(alias = "integer")]
	Int,
	Decimal,
	#[serde(alias = "utf8")]
	Text,
	Date,
	Timestamp,
	Formula {
		#[serde(rename = "formula")]
		expression: String,
		#[serde(rename = "resultType")]
		result_type: Type,
	},
}

impl FieldType {
	pub fn is_formula(&self) -> bool {
		matches!(self, FieldType::Formula { .. })
	}

	/// The formula expression and its asserted result type, if this is a
	/// formula field.
	pub fn formula(&self) -> Option<(&str, Type)> {
		match self {
			FieldType::Formula {
				expression,
				result_type,
			} => Some((expression.as_str(), *result_type)),
			_ => None,
		}
	}

	/// The storage type of a non-formula field.
	pub fn storage_type(&self) -> Option<Type> {
		match self {
			FieldType::Bool => Some(Type::Bool),
			FieldType::Int => Some(Type::Int),
			FieldType::Decimal => Some(Type::Decimal),
			FieldType::Text => Some(Type::Utf8),
			FieldType::Date => Some(Type::Date),
			FieldType::Timestamp => Some(Type::Timestamp),
			FieldType::Formula {
				..
			} => None,
		}
	}

	/// The type a reference to this field reads: the storage type for
	/// stored fields, the asserted result type for formula fields.
	pub fn value_type(&self) -> Type {
		match self {
			FieldType::Formula {
				result_type,
				..
			} => *result_type,
			other => match other.storage_type() {
				Some(ty) => ty,
				None => Type::Undefined,
			},
		}
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
	pub id: FieldId,
	pub name: String,
	#[serde(flatten)]
	pub ty: FieldType,
	#[serde(default)]
	pub required: bool,
}

impl FieldDef {
	pub fn is_formula(&self) -> bool {
		self.ty.is_formula()
	}

	pub fn value_type(&self) -> Type {
		self.ty.value_type()
	}
}
