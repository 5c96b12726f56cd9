// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Gridbase

pub mod diagnostic;
pub mod error;
pub mod fragment;
pub mod value;

pub use diagnostic::Diagnostic;
pub use error::{Error, IntoDiagnostic};
pub use fragment::{Fragment, StatementColumn, StatementLine};
pub use value::Type;

pub type Result<T> = std::result::Result<T, Error>;
