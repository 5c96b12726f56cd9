// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Gridbase

pub mod error;
pub mod field;
pub mod table;

pub use error::CatalogError;
pub use field::{FieldDef, FieldId, FieldType};
pub use table::TableDef;

pub type Result<T> = gridbase_type::Result<T>;
