// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The filter condition type.
//!
//! A [`FilterSpec`] is one active condition: a column name, an operator, and
//! a value whose shape is fixed by the variant. The serde form is an
//! internally tagged union whose `type` tag carries the
//! [`ValueType`](crate::ValueType) literal, so the JSON of a validated list
//! is exactly the payload handed to the remote query layer:
//!
//! ```json
//! {"type":"stringOptions","column":"Name","operator":"any of","value":["alpha"]}
//! ```
//!
//! Structural shape is the type system's job; the residual semantic rules
//! (operator legality, non-empty option lists, required sub-field keys) live
//! in [`FilterSpec::validate`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::column::ValueType;
use crate::error::{FiltersError, Result};
use crate::operators::FilterOperator;

/// One active filter condition, tagged by value type.
///
/// Variants carry only the fields legal for their type: the three structured
/// types (`stringObject`, `numberObject`, `categoryOptions`) have a `key`
/// naming the sub-field inside the column; the others do not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum FilterSpec {
	#[serde(rename = "string")]
	String {
		column: String,
		operator: FilterOperator,
		value: String,
	},
	#[serde(rename = "number")]
	Number {
		column: String,
		operator: FilterOperator,
		value: f64,
	},
	#[serde(rename = "datetime")]
	Datetime {
		column: String,
		operator: FilterOperator,
		value: DateTime<Utc>,
	},
	#[serde(rename = "boolean")]
	Boolean {
		column: String,
		operator: FilterOperator,
		value: bool,
	},
	#[serde(rename = "stringOptions")]
	StringOptions {
		column: String,
		operator: FilterOperator,
		value: Vec<String>,
	},
	#[serde(rename = "arrayOptions")]
	ArrayOptions {
		column: String,
		operator: FilterOperator,
		value: Vec<String>,
	},
	#[serde(rename = "stringObject")]
	StringObject {
		column: String,
		key: String,
		operator: FilterOperator,
		value: String,
	},
	#[serde(rename = "numberObject")]
	NumberObject {
		column: String,
		key: String,
		operator: FilterOperator,
		value: f64,
	},
	#[serde(rename = "categoryOptions")]
	CategoryOptions {
		column: String,
		key: String,
		operator: FilterOperator,
		value: Vec<String>,
	},
	/// Presence test for nullable columns. The wire form carries an empty
	/// `value` string; it may be omitted in JSON input.
	#[serde(rename = "null")]
	Null {
		column: String,
		operator: FilterOperator,
		#[serde(default)]
		value: String,
	},
}

impl FilterSpec {
	/// The name of the column this filter addresses.
	pub fn column(&self) -> &str {
		match self {
			FilterSpec::String { column, .. }
			| FilterSpec::Number { column, .. }
			| FilterSpec::Datetime { column, .. }
			| FilterSpec::Boolean { column, .. }
			| FilterSpec::StringOptions { column, .. }
			| FilterSpec::ArrayOptions { column, .. }
			| FilterSpec::StringObject { column, .. }
			| FilterSpec::NumberObject { column, .. }
			| FilterSpec::CategoryOptions { column, .. }
			| FilterSpec::Null { column, .. } => column,
		}
	}

	/// The operator this filter applies.
	pub fn operator(&self) -> FilterOperator {
		match self {
			FilterSpec::String { operator, .. }
			| FilterSpec::Number { operator, .. }
			| FilterSpec::Datetime { operator, .. }
			| FilterSpec::Boolean { operator, .. }
			| FilterSpec::StringOptions { operator, .. }
			| FilterSpec::ArrayOptions { operator, .. }
			| FilterSpec::StringObject { operator, .. }
			| FilterSpec::NumberObject { operator, .. }
			| FilterSpec::CategoryOptions { operator, .. }
			| FilterSpec::Null { operator, .. } => *operator,
		}
	}

	/// The value type tag of this filter.
	pub fn value_type(&self) -> ValueType {
		match self {
			FilterSpec::String { .. } => ValueType::String,
			FilterSpec::Number { .. } => ValueType::Number,
			FilterSpec::Datetime { .. } => ValueType::Datetime,
			FilterSpec::Boolean { .. } => ValueType::Boolean,
			FilterSpec::StringOptions { .. } => ValueType::StringOptions,
			FilterSpec::ArrayOptions { .. } => ValueType::ArrayOptions,
			FilterSpec::StringObject { .. } => ValueType::StringObject,
			FilterSpec::NumberObject { .. } => ValueType::NumberObject,
			FilterSpec::CategoryOptions { .. } => ValueType::CategoryOptions,
			FilterSpec::Null { .. } => ValueType::Null,
		}
	}

	/// The sub-field key, for the structured types that carry one.
	pub fn key(&self) -> Option<&str> {
		match self {
			FilterSpec::StringObject { key, .. }
			| FilterSpec::NumberObject { key, .. }
			| FilterSpec::CategoryOptions { key, .. } => Some(key),
			_ => None,
		}
	}

	/// Checks the semantic rules the type system cannot express.
	///
	/// - `column` must be non-empty
	/// - `operator` must belong to the operator set for the value type
	/// - structured types must carry a non-empty `key`
	/// - `stringOptions` and `arrayOptions` must select at least one value
	///   (`categoryOptions` may be empty)
	/// - `null` filters must carry an empty value string
	///
	/// All-or-nothing: the first violated rule is returned and the filter is
	/// never partially accepted.
	pub fn validate(&self) -> Result<()> {
		if self.column().is_empty() {
			return Err(FiltersError::InvalidField {
				field: "column",
				expected: "non-empty string",
			});
		}

		let operator = self.operator();
		let value_type = self.value_type();
		if !operator.is_valid_for(value_type) {
			return Err(FiltersError::OperatorNotAllowed {
				operator,
				value_type,
			});
		}

		if let Some(key) = self.key() {
			if key.is_empty() {
				return Err(FiltersError::InvalidField {
					field: "key",
					expected: "non-empty string",
				});
			}
		}

		match self {
			FilterSpec::StringOptions { column, value, .. }
			| FilterSpec::ArrayOptions { column, value, .. } => {
				if value.is_empty() {
					return Err(FiltersError::EmptyOptions(column.clone()));
				}
			}
			FilterSpec::Null { value, .. } => {
				if !value.is_empty() {
					return Err(FiltersError::InvalidField {
						field: "value",
						expected: "empty string for null filters",
					});
				}
			}
			_ => {}
		}

		Ok(())
	}
}


#[cfg(test)]
mod proptests {
	use super::*;
	use chrono::TimeZone;
	use proptest::prelude::*;

	prop_compose! {
		fn arb_column()(name in "[A-Za-z][A-Za-z0-9 ]{0,15}") -> String {
			name
		}
	}

	fn arb_filter() -> impl Strategy<Value = FilterSpec> {
		prop_oneof![
			(arb_column(), "[ -~]{0,30}").prop_map(|(column, value)| FilterSpec::String {
				column,
				operator: FilterOperator::Contains,
				value,
			}),
			(arb_column(), -1.0e9f64..1.0e9).prop_map(|(column, value)| FilterSpec::Number {
				column,
				operator: FilterOperator::LessThanOrEquals,
				value,
			}),
			(arb_column(), 0i64..4_102_444_800_000i64).prop_map(|(column, millis)| {
				FilterSpec::Datetime {
					column,
					operator: FilterOperator::GreaterThan,
					value: Utc.timestamp_millis_opt(millis).single().unwrap(),
				}
			}),
			(arb_column(), proptest::bool::ANY).prop_map(|(column, value)| FilterSpec::Boolean {
				column,
				operator: FilterOperator::Equals,
				value,
			}),
			(arb_column(), prop::collection::vec("[ -~]{1,10}", 1..4)).prop_map(|(column, value)| {
				FilterSpec::StringOptions {
					column,
					operator: FilterOperator::AnyOf,
					value,
				}
			}),
			(arb_column(), prop::collection::vec("[ -~]{1,10}", 1..4)).prop_map(|(column, value)| {
				FilterSpec::ArrayOptions {
					column,
					operator: FilterOperator::AllOf,
					value,
				}
			}),
			(arb_column(), "[a-z]{1,12}", "[ -~]{0,20}").prop_map(|(column, key, value)| {
				FilterSpec::StringObject {
					column,
					key,
					operator: FilterOperator::EndsWith,
					value,
				}
			}),
			(arb_column(), "[a-z]{1,12}", -1.0e9f64..1.0e9).prop_map(|(column, key, value)| {
				FilterSpec::NumberObject {
					column,
					key,
					operator: FilterOperator::GreaterThanOrEquals,
					value,
				}
			}),
			(arb_column(), "[a-z]{1,12}", prop::collection::vec("[ -~]{1,10}", 0..4)).prop_map(
				|(column, key, value)| FilterSpec::CategoryOptions {
					column,
					key,
					operator: FilterOperator::AnyOf,
					value,
				}
			),
			arb_column().prop_map(|column| FilterSpec::Null {
				column,
				operator: FilterOperator::IsNull,
				value: String::new(),
			}),
		]
	}

	proptest! {
		#[test]
		fn filter_serde_roundtrip(filter in arb_filter()) {
			let json = serde_json::to_string(&filter).unwrap();
			let parsed: FilterSpec = serde_json::from_str(&json).unwrap();
			prop_assert_eq!(parsed, filter);
		}

		#[test]
		fn tag_matches_value_type(filter in arb_filter()) {
			let json = serde_json::to_value(&filter).unwrap();
			prop_assert_eq!(json["type"].as_str().unwrap(), filter.value_type().as_str());
		}
	}
}
