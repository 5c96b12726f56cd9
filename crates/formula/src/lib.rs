// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Gridbase

pub mod ast;
pub mod compile;
pub mod error;
pub mod function;
pub mod generate;
pub mod graph;
pub mod parse;
pub mod resolve;
pub mod tokenize;
pub mod typecheck;

pub use compile::{CompileOptions, CompiledFormula, Compiler, compile_table};
pub use error::FormulaError;

pub type Result<T> = gridbase_type::Result<T>;
