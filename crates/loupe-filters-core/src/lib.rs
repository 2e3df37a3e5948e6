// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core types for the Loupe table filtering system.
//!
//! This crate provides the typed filter model shared by every filterable
//! Loupe surface: traces, observations, evaluation scores, and sessions. It
//! is used by the state-sync SDK (`loupe-filters`) and by server code that
//! translates validated filters into queries.
//!
//! # Overview
//!
//! The filtering system supports:
//! - Column registries describing what a surface lets users filter on
//! - Ten value types, from plain strings to keyed score objects
//! - A fixed operator table per value type
//! - Validation of loose JSON candidates with narrow coercion
//! - A compact, URL-safe codec so filter state survives in a share link
//!
//! # Example
//!
//! ```
//! use loupe_filters_core::{
//!     decode_filters, encode_filters, ColumnDefinition, ColumnRegistry,
//!     FilterOperator, FilterSpec, ValueType,
//! };
//!
//! # fn main() -> loupe_filters_core::Result<()> {
//! let registry = ColumnRegistry::new(vec![
//!     ColumnDefinition::new("bk", "Bookmarked", ValueType::Boolean),
//!     ColumnDefinition::new("nm", "Name", ValueType::StringOptions),
//! ])?;
//!
//! let filters = vec![FilterSpec::StringOptions {
//!     column: "Name".to_string(),
//!     operator: FilterOperator::AnyOf,
//!     value: vec!["alpha".to_string(), "be ta".to_string()],
//! }];
//!
//! let encoded = encode_filters(&registry, &filters);
//! assert_eq!(encoded, "nm;stringOptions;;any%20of;alpha%7Cbe%20ta");
//! assert_eq!(decode_filters(&registry, &encoded), filters);
//! # Ok(())
//! # }
//! ```

pub mod codec;
pub mod column;
pub mod error;
pub mod filter;
pub mod operators;
pub mod validate;

pub use codec::{decode_filter, decode_filters, encode_filter, encode_filters};
pub use column::{ColumnDefinition, ColumnRegistry, ValueType};
pub use error::{FiltersError, Result};
pub use filter::FilterSpec;
pub use operators::FilterOperator;
pub use validate::{check_filter, validate_filter, validate_filters};

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	fn create_test_registry() -> ColumnRegistry {
		ColumnRegistry::new(vec![
			ColumnDefinition::new("nm", "Name", ValueType::String),
			ColumnDefinition::new("lat", "Latency (s)", ValueType::Number),
			ColumnDefinition::new("bk", "Bookmarked", ValueType::Boolean),
			ColumnDefinition::new("tags", "Tags", ValueType::ArrayOptions).nullable(),
		])
		.unwrap()
	}

	fn arb_valid_filter() -> impl Strategy<Value = FilterSpec> {
		prop_oneof![
			"[ -~]{0,20}".prop_map(|value| FilterSpec::String {
				column: "Name".to_string(),
				operator: FilterOperator::StartsWith,
				value,
			}),
			(-1.0e9f64..1.0e9).prop_map(|value| FilterSpec::Number {
				column: "Latency (s)".to_string(),
				operator: FilterOperator::GreaterThan,
				value,
			}),
			proptest::bool::ANY.prop_map(|value| FilterSpec::Boolean {
				column: "Bookmarked".to_string(),
				operator: FilterOperator::NotEquals,
				value,
			}),
			prop::collection::vec("[ -{]{1,8}", 1..4).prop_map(|value| {
				FilterSpec::ArrayOptions {
					column: "Tags".to_string(),
					operator: FilterOperator::NoneOf,
					value,
				}
			}),
			Just(FilterSpec::Null {
				column: "Tags".to_string(),
				operator: FilterOperator::IsNotNull,
				value: String::new(),
			}),
		]
	}

	// End-to-end: candidate JSON -> validate -> encode -> decode -> check.
	proptest! {
		#[test]
		fn validated_filters_survive_the_url(filters in prop::collection::vec(arb_valid_filter(), 0..5)) {
			let registry = create_test_registry();

			let candidates: Vec<serde_json::Value> = filters
				.iter()
				.map(|filter| serde_json::to_value(filter).unwrap())
				.collect();
			let validated = validate_filters(&registry, &candidates);
			prop_assert_eq!(&validated, &filters);

			let encoded = encode_filters(&registry, &validated);
			let decoded = decode_filters(&registry, &encoded);
			prop_assert_eq!(&decoded, &filters);

			for filter in &decoded {
				prop_assert!(check_filter(&registry, filter).is_ok());
			}
		}
	}

	// The operator and type tables are closed under their own literals.
	proptest! {
		#[test]
		fn value_type_literals_roundtrip(idx in 0usize..ValueType::ALL.len()) {
			let value_type = ValueType::ALL[idx];
			prop_assert_eq!(value_type.as_str().parse::<ValueType>().unwrap(), value_type);
		}

		#[test]
		fn operator_table_literals_roundtrip(idx in 0usize..ValueType::ALL.len()) {
			let value_type = ValueType::ALL[idx];
			for operator in value_type.operators() {
				let parsed: FilterOperator = operator.as_str().parse().unwrap();
				prop_assert_eq!(parsed, *operator);
				prop_assert!(parsed.is_valid_for(value_type));
			}
		}
	}
}
