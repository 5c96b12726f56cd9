// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Gridbase

use gridbase_type::{Diagnostic, Fragment, IntoDiagnostic, Type};

use crate::field::FieldId;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CatalogError {
	#[error("duplicate field name '{name}'")]
	DuplicateFieldName {
		name: String,
	},

	#[error("duplicate field id {id}")]
	DuplicateFieldId {
		id: FieldId,
	},

	#[error("formula field '{name}' has empty formula text")]
	EmptyFormula {
		name: String,
	},

	#[error("field '{name}' declares non-storable result type {ty}")]
	NonStorableResultType {
		name: String,
		ty: Type,
	},
}

impl IntoDiagnostic for CatalogError {
	fn into_diagnostic(self) -> Diagnostic {
		match self {
			CatalogError::DuplicateFieldName {
				name,
			} => Diagnostic {
				code: "CATALOG_001".to_string(),
				message: format!("duplicate field name '{}'", name),
				fragment: Fragment::internal(name),
				label: Some("field names must be unique within a table".to_string()),
				help: Some("rename one of the conflicting fields".to_string()),
				notes: vec!["field names are case-sensitive; 'Price' and 'price' are distinct".to_string()],
				cause: None,
			},

			CatalogError::DuplicateFieldId {
				id,
			} => Diagnostic {
				code: "CATALOG_002".to_string(),
				message: format!("duplicate field id {}", id),
				fragment: Fragment::None,
				label: None,
				help: Some("field ids must be unique within a table".to_string()),
				notes: vec![],
				cause: None,
			},

			CatalogError::EmptyFormula {
				name,
			} => Diagnostic {
				code: "CATALOG_003".to_string(),
				message: format!("formula field '{}' has empty formula text", name),
				fragment: Fragment::internal(name),
				label: Some("formula fields require an expression".to_string()),
				help: Some("provide an expression, e.g. `quantity * unit_price`".to_string()),
				notes: vec![],
				cause: None,
			},

			CatalogError::NonStorableResultType {
				name,
				ty,
			} => Diagnostic {
				code: "CATALOG_004".to_string(),
				message: format!("field '{}' declares non-storable result type {}", name, ty),
				fragment: Fragment::internal(name),
				label: Some(format!("{} cannot be stored in a column", ty)),
				help: Some("declare one of: bool, int, decimal, utf8, date, timestamp, textarray".to_string()),
				notes: vec![],
				cause: None,
			},
		}
	}
}
