// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! URL-safe filter serialization.
//!
//! A filter list travels inside a single query parameter as comma-separated
//! tokens, each token five semicolon-separated fields:
//!
//! ```text
//! <column id>;<type>;<key>;<operator>;<value>
//! ```
//!
//! Columns are referenced by their short id on the wire and resolved back to
//! display names through the registry. The value field is percent-encoded in
//! full, which keeps the `;`, `,`, and `|` delimiters unambiguous; operator
//! literals only need their spaces escaped (`any of` becomes `any%20of`).
//! Multiselect values are joined with `|` before encoding.
//!
//! Decoding is lenient. A token that is structurally broken, or that
//! references a column id this surface no longer registers, is skipped so
//! that one stale token never invalidates the rest of the URL.

use std::borrow::Cow;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::column::{ColumnRegistry, ValueType};
use crate::error::{FiltersError, Result};
use crate::filter::FilterSpec;
use crate::operators::FilterOperator;

const TOKEN_SEPARATOR: &str = ",";
const FIELD_SEPARATOR: &str = ";";
const OPTION_SEPARATOR: &str = "|";

/// Encodes a filter list into the query parameter form.
///
/// Filters whose column is not registered are dropped. An empty result means
/// the parameter should be removed from the URL rather than written empty.
pub fn encode_filters(registry: &ColumnRegistry, filters: &[FilterSpec]) -> String {
	let tokens: Vec<String> = filters
		.iter()
		.filter_map(|filter| encode_filter(registry, filter).ok())
		.collect();

	tokens.join(TOKEN_SEPARATOR)
}

/// Encodes one filter as a wire token.
pub fn encode_filter(registry: &ColumnRegistry, filter: &FilterSpec) -> Result<String> {
	let column = registry
		.by_name(filter.column())
		.ok_or_else(|| FiltersError::ColumnNotFound(filter.column().to_string()))?;

	let operator = filter.operator().as_str().replace(' ', "%20");
	let value = encode_value(filter);

	Ok([
		column.id.as_str(),
		filter.value_type().as_str(),
		filter.key().unwrap_or(""),
		operator.as_str(),
		value.as_str(),
	]
	.join(FIELD_SEPARATOR))
}

/// Decodes a query parameter back into filters.
///
/// Unparseable tokens are skipped; an empty input decodes to an empty list.
pub fn decode_filters(registry: &ColumnRegistry, input: &str) -> Vec<FilterSpec> {
	if input.is_empty() {
		return Vec::new();
	}

	input
		.split(TOKEN_SEPARATOR)
		.filter_map(|token| decode_filter(registry, token).ok())
		.collect()
}

/// Decodes one wire token.
///
/// Only structure is checked here: field count, known column id, known type
/// and operator literals, and a value parseable for the token's type.
/// Semantic rules (operator sets, option list arity, nullability) are left
/// to [`check_filter`](crate::validate::check_filter) so callers can decide
/// how strict to be.
pub fn decode_filter(registry: &ColumnRegistry, token: &str) -> Result<FilterSpec> {
	let fields: Vec<&str> = token.split(FIELD_SEPARATOR).collect();
	if fields.len() != 5 {
		return Err(FiltersError::InvalidField {
			field: "token",
			expected: "five semicolon-separated fields",
		});
	}
	let (id, type_raw, key_raw, operator_raw, value_raw) =
		(fields[0], fields[1], fields[2], fields[3], fields[4]);

	let column = registry
		.by_id(id)
		.ok_or_else(|| FiltersError::ColumnNotFound(id.to_string()))?;
	let value_type: ValueType = percent_decode(type_raw)?.parse()?;
	let operator: FilterOperator = percent_decode(operator_raw)?.parse()?;
	let value = percent_decode(value_raw)?;

	let filter = match value_type {
		ValueType::String => FilterSpec::String {
			column: column.name,
			operator,
			value,
		},
		ValueType::Number => FilterSpec::Number {
			column: column.name,
			operator,
			value: parse_number(&value)?,
		},
		ValueType::Datetime => FilterSpec::Datetime {
			column: column.name,
			operator,
			value: parse_datetime(&value)?,
		},
		ValueType::Boolean => FilterSpec::Boolean {
			column: column.name,
			operator,
			value: parse_boolean(&value),
		},
		ValueType::StringOptions => FilterSpec::StringOptions {
			column: column.name,
			operator,
			value: split_options(&value),
		},
		ValueType::ArrayOptions => FilterSpec::ArrayOptions {
			column: column.name,
			operator,
			value: split_options(&value),
		},
		ValueType::StringObject => FilterSpec::StringObject {
			column: column.name,
			key: key_raw.to_string(),
			operator,
			value,
		},
		ValueType::NumberObject => FilterSpec::NumberObject {
			column: column.name,
			key: key_raw.to_string(),
			operator,
			value: parse_number(&value)?,
		},
		ValueType::CategoryOptions => FilterSpec::CategoryOptions {
			column: column.name,
			key: key_raw.to_string(),
			operator,
			value: split_options(&value),
		},
		ValueType::Null => FilterSpec::Null {
			column: column.name,
			operator,
			value,
		},
	};

	Ok(filter)
}

fn encode_value(filter: &FilterSpec) -> String {
	let raw = match filter {
		FilterSpec::String { value, .. } | FilterSpec::StringObject { value, .. } => value.clone(),
		FilterSpec::Number { value, .. } | FilterSpec::NumberObject { value, .. } => {
			value.to_string()
		}
		FilterSpec::Datetime { value, .. } => {
			value.to_rfc3339_opts(SecondsFormat::AutoSi, true)
		}
		FilterSpec::Boolean { value, .. } => value.to_string(),
		FilterSpec::StringOptions { value, .. }
		| FilterSpec::ArrayOptions { value, .. }
		| FilterSpec::CategoryOptions { value, .. } => value.join(OPTION_SEPARATOR),
		FilterSpec::Null { value, .. } => value.clone(),
	};

	urlencoding::encode(&raw).into_owned()
}

fn percent_decode(raw: &str) -> Result<String> {
	urlencoding::decode(raw)
		.map(Cow::into_owned)
		.map_err(|_| FiltersError::InvalidField {
			field: "token",
			expected: "percent-encoded UTF-8",
		})
}

fn parse_number(value: &str) -> Result<f64> {
	value
		.parse::<f64>()
		.ok()
		.filter(|number| number.is_finite())
		.ok_or(FiltersError::InvalidField {
			field: "value",
			expected: "a finite number",
		})
}

fn parse_datetime(value: &str) -> Result<DateTime<Utc>> {
	DateTime::parse_from_rfc3339(value)
		.map(|datetime| datetime.with_timezone(&Utc))
		.map_err(|_| FiltersError::InvalidField {
			field: "value",
			expected: "an RFC 3339 timestamp",
		})
}

// The wire form for true is exactly "true"; anything else is false.
fn parse_boolean(value: &str) -> bool {
	value == "true"
}

fn split_options(value: &str) -> Vec<String> {
	if value.is_empty() {
		return Vec::new();
	}
	value.split(OPTION_SEPARATOR).map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::column::ColumnDefinition;
	use chrono::TimeZone;

	fn create_test_registry() -> ColumnRegistry {
		ColumnRegistry::new(vec![
			ColumnDefinition::new("bk", "Bookmarked", ValueType::Boolean),
			ColumnDefinition::new("nm", "Name", ValueType::StringOptions),
			ColumnDefinition::new("in", "Input", ValueType::String),
			ColumnDefinition::new("lat", "Latency (s)", ValueType::Number),
			ColumnDefinition::new("ts", "Timestamp", ValueType::Datetime),
			ColumnDefinition::new("tags", "Tags", ValueType::ArrayOptions).nullable(),
			ColumnDefinition::new("md", "Metadata", ValueType::StringObject),
			ColumnDefinition::new("sc", "Scores", ValueType::NumberObject),
			ColumnDefinition::new("ann", "Annotations", ValueType::CategoryOptions),
		])
		.unwrap()
	}

	#[test]
	fn test_encode_matches_documented_format() {
		let registry = create_test_registry();
		let filters = vec![
			FilterSpec::Boolean {
				column: "Bookmarked".to_string(),
				operator: FilterOperator::Equals,
				value: true,
			},
			FilterSpec::StringOptions {
				column: "Name".to_string(),
				operator: FilterOperator::AnyOf,
				value: vec!["alpha".to_string(), "be ta".to_string()],
			},
		];

		assert_eq!(
			encode_filters(&registry, &filters),
			"bk;boolean;;=;true,nm;stringOptions;;any%20of;alpha%7Cbe%20ta"
		);
	}

	#[test]
	fn test_decode_documented_format() {
		let registry = create_test_registry();
		let filters =
			decode_filters(&registry, "bk;boolean;;=;true,nm;stringOptions;;any%20of;alpha%7Cbe%20ta");

		assert_eq!(
			filters,
			vec![
				FilterSpec::Boolean {
					column: "Bookmarked".to_string(),
					operator: FilterOperator::Equals,
					value: true,
				},
				FilterSpec::StringOptions {
					column: "Name".to_string(),
					operator: FilterOperator::AnyOf,
					value: vec!["alpha".to_string(), "be ta".to_string()],
				},
			]
		);
	}

	#[test]
	fn test_value_delimiters_are_escaped() {
		let registry = create_test_registry();
		let filter = FilterSpec::String {
			column: "Input".to_string(),
			operator: FilterOperator::Contains,
			value: "a,b;c|d".to_string(),
		};

		let token = encode_filter(&registry, &filter).unwrap();
		assert_eq!(token, "in;string;;contains;a%2Cb%3Bc%7Cd");

		let decoded = decode_filters(&registry, &token);
		assert_eq!(decoded, vec![filter]);
	}

	#[test]
	fn test_number_formatting() {
		let registry = create_test_registry();
		let whole = FilterSpec::Number {
			column: "Latency (s)".to_string(),
			operator: FilterOperator::GreaterThan,
			value: 3.0,
		};
		let fractional = FilterSpec::Number {
			column: "Latency (s)".to_string(),
			operator: FilterOperator::LessThanOrEquals,
			value: 0.25,
		};

		assert_eq!(encode_filter(&registry, &whole).unwrap(), "lat;number;;>;3");
		assert_eq!(
			encode_filter(&registry, &fractional).unwrap(),
			"lat;number;;<=;0.25"
		);
	}

	#[test]
	fn test_datetime_roundtrip() {
		let registry = create_test_registry();
		let filter = FilterSpec::Datetime {
			column: "Timestamp".to_string(),
			operator: FilterOperator::GreaterThanOrEquals,
			value: Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap(),
		};

		let token = encode_filter(&registry, &filter).unwrap();
		assert_eq!(token, "ts;datetime;;>=;2024-05-01T12%3A30%3A00Z");

		let decoded = decode_filter(&registry, &token).unwrap();
		assert_eq!(decoded, filter);
	}

	#[test]
	fn test_key_field_carried_for_object_types() {
		let registry = create_test_registry();
		let filter = FilterSpec::NumberObject {
			column: "Scores".to_string(),
			key: "accuracy".to_string(),
			operator: FilterOperator::GreaterThanOrEquals,
			value: 0.8,
		};

		let token = encode_filter(&registry, &filter).unwrap();
		assert_eq!(token, "sc;numberObject;accuracy;>=;0.8");

		let decoded = decode_filter(&registry, &token).unwrap();
		assert_eq!(decoded, filter);
	}

	#[test]
	fn test_null_filter_roundtrip() {
		let registry = create_test_registry();
		let filter = FilterSpec::Null {
			column: "Tags".to_string(),
			operator: FilterOperator::IsNull,
			value: String::new(),
		};

		let token = encode_filter(&registry, &filter).unwrap();
		assert_eq!(token, "tags;null;;is%20null;");

		let decoded = decode_filter(&registry, &token).unwrap();
		assert_eq!(decoded, filter);
	}

	#[test]
	fn test_empty_options_value_decodes_to_empty_list() {
		let registry = create_test_registry();
		let decoded = decode_filter(&registry, "ann;categoryOptions;quality;any%20of;").unwrap();

		assert_eq!(
			decoded,
			FilterSpec::CategoryOptions {
				column: "Annotations".to_string(),
				key: "quality".to_string(),
				operator: FilterOperator::AnyOf,
				value: vec![],
			}
		);
	}

	#[test]
	fn test_encode_drops_filters_on_unknown_columns() {
		let registry = create_test_registry();
		let filters = vec![
			FilterSpec::String {
				column: "Session".to_string(),
				operator: FilterOperator::Equals,
				value: "x".to_string(),
			},
			FilterSpec::Boolean {
				column: "Bookmarked".to_string(),
				operator: FilterOperator::Equals,
				value: false,
			},
		];

		assert_eq!(encode_filters(&registry, &filters), "bk;boolean;;=;false");
	}

	#[test]
	fn test_encode_empty_list_is_empty_string() {
		let registry = create_test_registry();
		assert_eq!(encode_filters(&registry, &[]), "");
	}

	#[test]
	fn test_decode_empty_input_is_empty_list() {
		let registry = create_test_registry();
		assert!(decode_filters(&registry, "").is_empty());
	}

	#[test]
	fn test_decode_skips_malformed_tokens() {
		let registry = create_test_registry();
		let input = concat!(
			"junk,",
			"xx;boolean;;=;true,",
			"bk;bool;;=;true,",
			"bk;boolean;;===;true,",
			"lat;number;;<;fast,",
			"bk;boolean;=;true,",
			"bk;boolean;;=;true"
		);

		let filters = decode_filters(&registry, input);
		assert_eq!(
			filters,
			vec![FilterSpec::Boolean {
				column: "Bookmarked".to_string(),
				operator: FilterOperator::Equals,
				value: true,
			}]
		);
	}

	#[test]
	fn test_boolean_decode_is_literal_true_or_false() {
		let registry = create_test_registry();

		let decoded = decode_filter(&registry, "bk;boolean;;=;true").unwrap();
		assert!(matches!(decoded, FilterSpec::Boolean { value: true, .. }));

		// Anything other than the exact literal reads as false.
		for raw in ["false", "TRUE", "1", ""] {
			let token = format!("bk;boolean;;=;{raw}");
			let decoded = decode_filter(&registry, &token).unwrap();
			assert!(matches!(decoded, FilterSpec::Boolean { value: false, .. }), "{raw}");
		}
	}

	#[test]
	fn test_decode_leaves_semantic_checks_to_validation() {
		let registry = create_test_registry();
		let decoded = decode_filter(&registry, "lat;number;;contains;5").unwrap();

		assert_eq!(decoded.operator(), FilterOperator::Contains);
		assert!(crate::validate::check_filter(&registry, &decoded).is_err());
	}

	#[test]
	fn test_decode_reports_unknown_column_id() {
		let registry = create_test_registry();
		let err = decode_filter(&registry, "zz;string;;=;x").unwrap_err();
		assert!(matches!(err, FiltersError::ColumnNotFound(id) if id == "zz"));
	}
}
