// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Comparison operators and the per-type operator table.
//!
//! Every operator the filter engine knows is a [`FilterOperator`] variant;
//! the wire and JSON forms are the human-readable literals (`contains`,
//! `any of`, `>=`, ...). Which operators are legal for a value type is a
//! fixed table, exposed as [`ValueType::operators`]. The table never fails:
//! once a type is represented it has an operator set, and unknown type
//! strings are rejected where text enters the system.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::column::ValueType;
use crate::error::FiltersError;

/// A comparison verb a filter can apply to a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilterOperator {
	#[serde(rename = "=")]
	Equals,
	#[serde(rename = "<>")]
	NotEquals,
	#[serde(rename = ">")]
	GreaterThan,
	#[serde(rename = "<")]
	LessThan,
	#[serde(rename = ">=")]
	GreaterThanOrEquals,
	#[serde(rename = "<=")]
	LessThanOrEquals,
	#[serde(rename = "contains")]
	Contains,
	#[serde(rename = "does not contain")]
	DoesNotContain,
	#[serde(rename = "starts with")]
	StartsWith,
	#[serde(rename = "ends with")]
	EndsWith,
	#[serde(rename = "any of")]
	AnyOf,
	#[serde(rename = "none of")]
	NoneOf,
	#[serde(rename = "all of")]
	AllOf,
	#[serde(rename = "is null")]
	IsNull,
	#[serde(rename = "is not null")]
	IsNotNull,
}

impl FilterOperator {
	/// Every operator, in declaration order.
	pub const ALL: [FilterOperator; 15] = [
		FilterOperator::Equals,
		FilterOperator::NotEquals,
		FilterOperator::GreaterThan,
		FilterOperator::LessThan,
		FilterOperator::GreaterThanOrEquals,
		FilterOperator::LessThanOrEquals,
		FilterOperator::Contains,
		FilterOperator::DoesNotContain,
		FilterOperator::StartsWith,
		FilterOperator::EndsWith,
		FilterOperator::AnyOf,
		FilterOperator::NoneOf,
		FilterOperator::AllOf,
		FilterOperator::IsNull,
		FilterOperator::IsNotNull,
	];

	/// The wire literal for this operator.
	pub fn as_str(&self) -> &'static str {
		match self {
			FilterOperator::Equals => "=",
			FilterOperator::NotEquals => "<>",
			FilterOperator::GreaterThan => ">",
			FilterOperator::LessThan => "<",
			FilterOperator::GreaterThanOrEquals => ">=",
			FilterOperator::LessThanOrEquals => "<=",
			FilterOperator::Contains => "contains",
			FilterOperator::DoesNotContain => "does not contain",
			FilterOperator::StartsWith => "starts with",
			FilterOperator::EndsWith => "ends with",
			FilterOperator::AnyOf => "any of",
			FilterOperator::NoneOf => "none of",
			FilterOperator::AllOf => "all of",
			FilterOperator::IsNull => "is null",
			FilterOperator::IsNotNull => "is not null",
		}
	}

	/// True if this operator appears in the operator set for `value_type`.
	pub fn is_valid_for(&self, value_type: ValueType) -> bool {
		value_type.operators().contains(self)
	}
}

impl std::fmt::Display for FilterOperator {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for FilterOperator {
	type Err = FiltersError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"=" => Ok(FilterOperator::Equals),
			"<>" => Ok(FilterOperator::NotEquals),
			">" => Ok(FilterOperator::GreaterThan),
			"<" => Ok(FilterOperator::LessThan),
			">=" => Ok(FilterOperator::GreaterThanOrEquals),
			"<=" => Ok(FilterOperator::LessThanOrEquals),
			"contains" => Ok(FilterOperator::Contains),
			"does not contain" => Ok(FilterOperator::DoesNotContain),
			"starts with" => Ok(FilterOperator::StartsWith),
			"ends with" => Ok(FilterOperator::EndsWith),
			"any of" => Ok(FilterOperator::AnyOf),
			"none of" => Ok(FilterOperator::NoneOf),
			"all of" => Ok(FilterOperator::AllOf),
			"is null" => Ok(FilterOperator::IsNull),
			"is not null" => Ok(FilterOperator::IsNotNull),
			_ => Err(FiltersError::UnknownOperator(s.to_string())),
		}
	}
}

const STRING_OPERATORS: &[FilterOperator] = &[
	FilterOperator::Equals,
	FilterOperator::Contains,
	FilterOperator::DoesNotContain,
	FilterOperator::StartsWith,
	FilterOperator::EndsWith,
];

const NUMERIC_OPERATORS: &[FilterOperator] = &[
	FilterOperator::Equals,
	FilterOperator::GreaterThan,
	FilterOperator::LessThan,
	FilterOperator::GreaterThanOrEquals,
	FilterOperator::LessThanOrEquals,
];

const DATETIME_OPERATORS: &[FilterOperator] = &[
	FilterOperator::GreaterThan,
	FilterOperator::LessThan,
	FilterOperator::GreaterThanOrEquals,
	FilterOperator::LessThanOrEquals,
];

const BOOLEAN_OPERATORS: &[FilterOperator] = &[FilterOperator::Equals, FilterOperator::NotEquals];

const STRING_OPTIONS_OPERATORS: &[FilterOperator] =
	&[FilterOperator::AnyOf, FilterOperator::NoneOf];

const ARRAY_OPTIONS_OPERATORS: &[FilterOperator] = &[
	FilterOperator::AnyOf,
	FilterOperator::NoneOf,
	FilterOperator::AllOf,
];

const CATEGORY_OPTIONS_OPERATORS: &[FilterOperator] =
	&[FilterOperator::AnyOf, FilterOperator::NoneOf];

const NULL_OPERATORS: &[FilterOperator] = &[FilterOperator::IsNull, FilterOperator::IsNotNull];

impl ValueType {
	/// The fixed set of operators legal for this value type.
	pub fn operators(&self) -> &'static [FilterOperator] {
		match self {
			ValueType::String | ValueType::StringObject => STRING_OPERATORS,
			ValueType::Number | ValueType::NumberObject => NUMERIC_OPERATORS,
			ValueType::Datetime => DATETIME_OPERATORS,
			ValueType::Boolean => BOOLEAN_OPERATORS,
			ValueType::StringOptions => STRING_OPTIONS_OPERATORS,
			ValueType::ArrayOptions => ARRAY_OPTIONS_OPERATORS,
			ValueType::CategoryOptions => CATEGORY_OPTIONS_OPERATORS,
			ValueType::Null => NULL_OPERATORS,
		}
	}
}
