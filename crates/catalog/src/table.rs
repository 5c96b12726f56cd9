// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Gridbase

use std::collections::HashSet;

use gridbase_type::Error;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::{
	error::CatalogError,
	field::{FieldDef, FieldId},
};

/// A table descriptor as submitted by the schema-application subsystem.
/// Field order is the submission order; it matters for column ordering, not
/// for compilation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableDef {
	pub name: String,
	pub fields: Vec<FieldDef>,
}

impl TableDef {
	pub fn new(name: impl Into<String>, fields: Vec<FieldDef>) -> Self {
		Self {
			name: name.into(),
			fields,
		}
	}

	/// Find a field by exact, case-sensitive name.
	pub fn field(&self, name: &str) -> Option<&FieldDef> {
		self.fields.iter().find(|field| field.name == name)
	}

	pub fn field_by_id(&self, id: FieldId) -> Option<&FieldDef> {
		self.fields.iter().find(|field| field.id == id)
	}

	/// Name → field index, preserving submission order.
	pub fn name_index(&self) -> IndexMap<&str, &FieldDef> {
		self.fields.iter().map(|field| (field.name.as_str(), field)).collect()
	}

	pub fn formula_fields(&self) -> impl Iterator<Item = &FieldDef> {
		self.fields.iter().filter(|field| field.is_formula())
	}

	/// Structural validation of the descriptor itself: unique names and
	/// ids, non-empty formula text, storable result types. Collects every
	/// violation rather than stopping at the first.
	#[instrument(name = "catalog::table::validate", level = "debug", skip(self), fields(table = %self.name))]
	pub fn validate(&self) -> Result<(), Vec<Error>> {
		let mut errors = Vec::new();
		let mut names: HashSet<&str> = HashSet::new();
		let mut ids: HashSet<FieldId> = HashSet::new();

		for field in &self.fields {
			if !names.insert(field.name.as_str()) {
				errors.push(gridbase_type::error!(CatalogError::DuplicateFieldName {
					name: field.name.clone(),
				}));
			}
			if !ids.insert(field.id) {
				errors.push(gridbase_type::error!(CatalogError::DuplicateFieldId {
					id: field.id,
				}));
			}
			if let Some((expression, result_type)) = field.ty.formula() {
				if expression.trim().is_empty() {
					errors.push(gridbase_type::error!(CatalogError::EmptyFormula {
						name: field.name.clone(),
					}));
				}
				if !result_type.is_storable() {
					errors.push(gridbase_type::error!(CatalogError::NonStorableResultType {
						name: field.name.clone(),
						ty: result_type,
					}));
				}
			}
		}

		if errors.is_empty() {
			Ok(())
		} else {
			Err(errors)
		}
	}
}

#[cfg(test)]
mod tests {
	use gridbase_type::Type;

	use super::*;
	use crate::field::FieldType;

	fn stored(id: u64, name: &str, ty: FieldType) -> FieldDef {
		FieldDef {
			id: FieldId(id),
			name: name.to_string(),
			ty,
			required: false,
		}
	}

	fn formula(id: u64, name: &str, expression: &str, result_type: Type) -> FieldDef {
		FieldDef {
			id: FieldId(id),
			name: name.to_string(),
			ty: FieldType::Formula {
				expression: expression.to_string(),
				result_type,
			},
			required: false,
		}
	}

	#[test]
	fn test_field_lookup_is_case_sensitive() {
		let table = TableDef::new("orders", vec![stored(1, "Price", FieldType::Decimal)]);
		assert!(table.field("Price").is_some());
		assert!(table.field("price").is_none());
	}

	#[test]
	fn test_validate_ok() {
		let table = TableDef::new("orders", vec![
			stored(1, "quantity", FieldType::Int),
			stored(2, "unit_price", FieldType::Decimal),
			formula(3, "total", "quantity * unit_price", Type::Decimal),
		]);
		assert!(table.validate().is_ok());
	}

	#[test]
	fn test_validate_collects_all_errors() {
		let table = TableDef::new("orders", vec![
			stored(1, "a", FieldType::Int),
			stored(1, "a", FieldType::Int),
			formula(2, "b", "   ", Type::Decimal),
		]);
		let errors = table.validate().unwrap_err();
		let codes: Vec<&str> = errors.iter().map(|error| error.code()).collect();
		assert!(codes.contains(&"CATALOG_001"));
		assert!(codes.contains(&"CATALOG_002"));
		assert!(codes.contains(&"CATALOG_003"));
	}

	#[test]
	fn test_validate_rejects_interval_result_type() {
		let table = TableDef::new("t", vec![formula(1, "gap", "a - b", Type::Interval)]);
		let errors = table.validate().unwrap_err();
		assert_eq!(errors[0].code(), "CATALOG_004");
	}

	#[test]
	fn test_table_from_json_submission() {
		let table: TableDef = serde_json::from_str(
			r#"{
				"name": "orders",
				"fields": [
					{"id": 1, "name": "quantity", "type": "int", "required": true},
					{"id": 2, "name": "unit_price", "type": "decimal"},
					{
						"id": 3,
						"name": "total",
						"type": "formula",
						"formula": "quantity * unit_price",
						"resultType": "decimal"
					}
				]
			}"#,
		)
		.unwrap();
		assert_eq!(table.fields.len(), 3);
		assert_eq!(table.formula_fields().count(), 1);
		assert!(table.validate().is_ok());
	}

	#[test]
	fn test_name_index_preserves_submission_order() {
		let table = TableDef::new("orders", vec![
			stored(7, "zebra", FieldType::Int),
			stored(3, "apple", FieldType::Int),
		]);
		let names: Vec<&str> = table.name_index().keys().copied().collect();
		assert_eq!(names, vec!["zebra", "apple"]);
		assert_eq!(table.field_by_id(FieldId(3)).map(|field| field.name.as_str()), Some("apple"));
	}

	#[test]
	fn test_formula_fields_iterator_preserves_order() {
		let table = TableDef::new("t", vec![
			formula(1, "x", "1", Type::Int),
			stored(2, "y", FieldType::Int),
			formula(3, "z", "2", Type::Int),
		]);
		let names: Vec<&str> = table.formula_fields().map(|field| field.name.as_str()).collect();
		assert_eq!(names, vec!["x", "z"]);
	}
}
