// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Gridbase

use std::{collections::HashMap, sync::LazyLock};

use gridbase_type::Type;

macro_rules! functions {
    (
        $( $value:ident => $tag:literal ),*
    ) => {
        /// Every function in the formula vocabulary.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum FunctionKind {  $( $value ),* }

        impl FunctionKind {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $( FunctionKind::$value => $tag ),*
                }
            }
        }

        static FUNCTIONS: LazyLock<HashMap<&'static str, FunctionKind>> = LazyLock::new(|| {
            let mut map = HashMap::new();
            $( map.insert($tag, FunctionKind::$value); )*
            map
        });
    };
}

functions! {
	Abs           => "ABS",
	Round         => "ROUND",
	Ceil          => "CEIL",
	Floor         => "FLOOR",
	Trunc         => "TRUNC",
	Power         => "POWER",
	Sqrt          => "SQRT",
	Exp           => "EXP",
	Log           => "LOG",
	Ln            => "LN",
	Mod           => "MOD",
	Greatest      => "GREATEST",
	Least         => "LEAST",
	Left          => "LEFT",
	Right         => "RIGHT",
	Substring     => "SUBSTRING",
	Length        => "LENGTH",
	Lower         => "LOWER",
	Upper         => "UPPER",
	Trim          => "TRIM",
	Replace       => "REPLACE",
	Repeat        => "REPEAT",
	Strpos        => "STRPOS",
	Concat        => "CONCAT",
	Coalesce      => "COALESCE",
	Nullif        => "NULLIF",
	Extract       => "EXTRACT",
	DateTrunc     => "DATE_TRUNC",
	Now           => "NOW",
	CurrentDate   => "CURRENT_DATE",
	StringToArray => "STRING_TO_ARRAY",
	ArrayToString => "ARRAY_TO_STRING",
	ArrayLength   => "ARRAY_LENGTH",
	Cardinality   => "CARDINALITY",
	ArraySlice    => "ARRAY_SLICE",
	RegexpReplace => "REGEXP_REPLACE"
}

/// Look a function name up, case-insensitively, resolving the accepted
/// aliases to their canonical kind.
pub fn lookup(name: &str) -> Option<FunctionKind> {
	let upper = name.to_uppercase();
	let canonical = match upper.as_str() {
		"SUBSTR" => "SUBSTRING",
		"CEILING" => "CEIL",
		"POW" => "POWER",
		other => other,
	};
	FUNCTIONS.get(canonical).copied()
}

/// What an argument position accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgRule {
	Number,
	Text,
	Temporal,
	Array,
	Any,
	/// Must be coercible to the type of the first argument.
	SameAsFirst,
}

impl ArgRule {
	pub fn as_str(&self) -> &'static str {
		match self {
			ArgRule::Number => "a number",
			ArgRule::Text => "text",
			ArgRule::Temporal => "a date or timestamp",
			ArgRule::Array => "an array",
			ArgRule::Any => "any value",
			ArgRule::SameAsFirst => "the type of the first argument",
		}
	}
}

/// How the result type is derived from the arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultRule {
	Fixed(Type),
	SameAsArg(usize),
	/// The narrowest type all arguments coerce to.
	CommonOfArgs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature {
	pub min_args: usize,
	pub max_args: usize,
	/// Per-position rules; the last rule repeats for variadic calls.
	pub args: &'static [ArgRule],
	pub result: ResultRule,
	pub volatile: bool,
}

const fn fixed(min: usize, max: usize, args: &'static [ArgRule], result: ResultRule) -> Signature {
	Signature {
		min_args: min,
		max_args: max,
		args,
		result,
		volatile: false,
	}
}

const fn volatile(args: &'static [ArgRule], result: ResultRule) -> Signature {
	Signature {
		min_args: 0,
		max_args: 0,
		args,
		result,
		volatile: true,
	}
}

impl FunctionKind {
	pub fn signature(&self) -> Signature {
		use ArgRule::*;
		use ResultRule::*;
		match self {
			FunctionKind::Abs => fixed(1, 1, &[Number], SameAsArg(0)),
			FunctionKind::Round => fixed(1, 2, &[Number, Number], SameAsArg(0)),
			FunctionKind::Ceil => fixed(1, 1, &[Number], SameAsArg(0)),
			FunctionKind::Floor => fixed(1, 1, &[Number], SameAsArg(0)),
			FunctionKind::Trunc => fixed(1, 2, &[Number, Number], SameAsArg(0)),
			FunctionKind::Power => fixed(2, 2, &[Number, Number], Fixed(Type::Decimal)),
			FunctionKind::Sqrt => fixed(1, 1, &[Number], Fixed(Type::Decimal)),
			FunctionKind::Exp => fixed(1, 1, &[Number], Fixed(Type::Decimal)),
			// One argument is base-10, two is LOG(base, value)
			FunctionKind::Log => fixed(1, 2, &[Number, Number], Fixed(Type::Decimal)),
			FunctionKind::Ln => fixed(1, 1, &[Number], Fixed(Type::Decimal)),
			FunctionKind::Mod => fixed(2, 2, &[Number, Number], CommonOfArgs),
			FunctionKind::Greatest => fixed(1, usize::MAX, &[Any, SameAsFirst], CommonOfArgs),
			FunctionKind::Least => fixed(1, usize::MAX, &[Any, SameAsFirst], CommonOfArgs),
			FunctionKind::Left => fixed(2, 2, &[Text, Number], Fixed(Type::Utf8)),
			FunctionKind::Right => fixed(2, 2, &[Text, Number], Fixed(Type::Utf8)),
			// Positional (text, start [, count]) or pattern (text, pattern);
			// the second argument is disambiguated during type checking
			FunctionKind::Substring => fixed(2, 3, &[Text, Any, Number], Fixed(Type::Utf8)),
			FunctionKind::Length => fixed(1, 1, &[Text], Fixed(Type::Int)),
			FunctionKind::Lower => fixed(1, 1, &[Text], Fixed(Type::Utf8)),
			FunctionKind::Upper => fixed(1, 1, &[Text], Fixed(Type::Utf8)),
			FunctionKind::Trim => fixed(1, 1, &[Text], Fixed(Type::Utf8)),
			FunctionKind::Replace => fixed(3, 3, &[Text, Text, Text], Fixed(Type::Utf8)),
			FunctionKind::Repeat => fixed(2, 2, &[Text, Number], Fixed(Type::Utf8)),
			FunctionKind::Strpos => fixed(2, 2, &[Text, Text], Fixed(Type::Int)),
			FunctionKind::Concat => fixed(1, usize::MAX, &[Any], Fixed(Type::Utf8)),
			FunctionKind::Coalesce => fixed(1, usize::MAX, &[Any, SameAsFirst], CommonOfArgs),
			FunctionKind::Nullif => fixed(2, 2, &[Any, SameAsFirst], SameAsArg(0)),
			// The date part arrives as a text literal in argument position 0
			FunctionKind::Extract => fixed(2, 2, &[Text, Temporal], Fixed(Type::Decimal)),
			FunctionKind::DateTrunc => fixed(2, 2, &[Text, Temporal], Fixed(Type::Timestamp)),
			FunctionKind::Now => volatile(&[], Fixed(Type::Timestamp)),
			FunctionKind::CurrentDate => volatile(&[], Fixed(Type::Date)),
			FunctionKind::StringToArray => fixed(2, 2, &[Text, Text], Fixed(Type::TextArray)),
			FunctionKind::ArrayToString => fixed(2, 2, &[Array, Text], Fixed(Type::Utf8)),
			FunctionKind::ArrayLength => fixed(1, 2, &[Array, Number], Fixed(Type::Int)),
			FunctionKind::Cardinality => fixed(1, 1, &[Array], Fixed(Type::Int)),
			FunctionKind::ArraySlice => fixed(3, 3, &[Array, Number, Number], Fixed(Type::TextArray)),
			FunctionKind::RegexpReplace => {
				fixed(3, 4, &[Text, Text, Text, Text], Fixed(Type::Utf8))
			}
		}
	}
}

/// Date parts accepted by EXTRACT and DATE_TRUNC.
pub const DATE_PARTS: &[&str] =
	&["year", "quarter", "month", "week", "day", "dow", "doy", "hour", "minute", "second", "epoch"];

pub fn is_date_part(part: &str) -> bool {
	DATE_PARTS.contains(&part.to_lowercase().as_str())
}
