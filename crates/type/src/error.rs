// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Gridbase

use std::{
	fmt::{Display, Formatter},
	ops::{Deref, DerefMut},
};

use crate::diagnostic::Diagnostic;

#[derive(Debug, Clone, PartialEq)]
pub struct Error(pub Diagnostic);

impl Deref for Error {
	type Target = Diagnostic;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

impl DerefMut for Error {
	fn deref_mut(&mut self) -> &mut Self::Target {
		&mut self.0
	}
}

impl Display for Error {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.0.render().as_str())
	}
}

impl std::error::Error for Error {}

impl Error {
	pub fn diagnostic(self) -> Diagnostic {
		self.0
	}

	pub fn code(&self) -> &str {
		&self.0.code
	}
}

/// Conversion of crate-local error enums into the unified [`Diagnostic`]
/// shape. Implemented once per error enum, exhaustively.
pub trait IntoDiagnostic {
	fn into_diagnostic(self) -> Diagnostic;
}

impl IntoDiagnostic for Diagnostic {
	fn into_diagnostic(self) -> Diagnostic {
		self
	}
}

/// Construct an [`Error`] from anything that converts into a diagnostic.
#[macro_export]
macro_rules! error {
	($diagnostic:expr) => {
		$crate::error::Error($crate::error::IntoDiagnostic::into_diagnostic($diagnostic))
	};
}

/// Construct an `Err(Error)` value.
#[macro_export]
macro_rules! err {
	($diagnostic:expr) => {
		Err($crate::error!($diagnostic))
	};
}

/// Return early with an `Err(Error)`.
#[macro_export]
macro_rules! return_error {
	($diagnostic:expr) => {
		return Err($crate::error!($diagnostic))
	};
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::fragment::Fragment;

	fn diagnostic() -> Diagnostic {
		Diagnostic {
			code: "TEST_001".to_string(),
			message: "boom".to_string(),
			fragment: Fragment::None,
			label: None,
			help: None,
			notes: vec![],
			cause: None,
		}
	}

	#[test]
	fn test_error_derefs_to_diagnostic() {
		let error = Error(diagnostic());
		assert_eq!(error.code(), "TEST_001");
		assert_eq!(error.message, "boom");
	}

	#[test]
	fn test_error_macro() {
		let error = crate::error!(diagnostic());
		assert_eq!(error, Error(diagnostic()));
	}

	#[test]
	fn test_err_macro() {
		let result: Result<(), Error> = crate::err!(diagnostic());
		assert_eq!(result, Err(Error(diagnostic())));
	}
}
