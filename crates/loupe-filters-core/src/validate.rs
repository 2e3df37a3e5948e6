// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Candidate filter validation.
//!
//! Candidates arrive as loose JSON, from a saved view, a URL, or a UI that
//! assembled the object field by field. [`validate_filter`] turns one
//! candidate into a typed [`FilterSpec`] or says exactly why it cannot;
//! [`validate_filters`] keeps the valid subset of a list and drops the rest.
//!
//! Coercion is deliberately narrow: datetime values may be RFC 3339 strings
//! or epoch milliseconds, number values may be numeric strings. Every other
//! field must already have the right JSON shape.

use chrono::{DateTime, TimeZone, Utc};
use serde_json::{Map, Value};

use crate::column::{ColumnRegistry, ValueType};
use crate::error::{FiltersError, Result};
use crate::filter::FilterSpec;
use crate::operators::FilterOperator;

/// Validates a single candidate against the registry.
///
/// The candidate must be a JSON object with `type`, `column`, `operator`,
/// and (except for `null` filters) `value` fields, plus `key` for the
/// structured types. The column must be registered under the candidate's
/// `column` name with the same value type; `null` candidates match a
/// registered column of any type.
pub fn validate_filter(registry: &ColumnRegistry, candidate: &Value) -> Result<FilterSpec> {
	let obj = candidate.as_object().ok_or(FiltersError::InvalidField {
		field: "filter",
		expected: "a JSON object",
	})?;

	let value_type: ValueType = require_str(obj, "type")?.parse()?;
	let column = require_str(obj, "column")?.to_string();
	let operator: FilterOperator = require_str(obj, "operator")?.parse()?;

	let filter = match value_type {
		ValueType::String => FilterSpec::String {
			column,
			operator,
			value: string_value(require_value(obj)?)?,
		},
		ValueType::Number => FilterSpec::Number {
			column,
			operator,
			value: number_value(require_value(obj)?)?,
		},
		ValueType::Datetime => FilterSpec::Datetime {
			column,
			operator,
			value: datetime_value(require_value(obj)?)?,
		},
		ValueType::Boolean => FilterSpec::Boolean {
			column,
			operator,
			value: bool_value(require_value(obj)?)?,
		},
		ValueType::StringOptions => FilterSpec::StringOptions {
			column,
			operator,
			value: options_value(require_value(obj)?)?,
		},
		ValueType::ArrayOptions => FilterSpec::ArrayOptions {
			column,
			operator,
			value: options_value(require_value(obj)?)?,
		},
		ValueType::StringObject => FilterSpec::StringObject {
			column,
			key: require_str(obj, "key")?.to_string(),
			operator,
			value: string_value(require_value(obj)?)?,
		},
		ValueType::NumberObject => FilterSpec::NumberObject {
			column,
			key: require_str(obj, "key")?.to_string(),
			operator,
			value: number_value(require_value(obj)?)?,
		},
		ValueType::CategoryOptions => FilterSpec::CategoryOptions {
			column,
			key: require_str(obj, "key")?.to_string(),
			operator,
			value: options_value(require_value(obj)?)?,
		},
		ValueType::Null => FilterSpec::Null {
			column,
			operator,
			value: null_value(obj)?,
		},
	};

	check_filter(registry, &filter)?;
	Ok(filter)
}

/// Validates a candidate list, keeping the valid subset in order.
pub fn validate_filters(registry: &ColumnRegistry, candidates: &[Value]) -> Vec<FilterSpec> {
	candidates
		.iter()
		.filter_map(|candidate| validate_filter(registry, candidate).ok())
		.collect()
}

/// Checks an already-typed filter against the registry.
///
/// Null filters are a presence test and match a registered column of any
/// value type; every other filter must name a column registered with the
/// filter's own value type. The filter's semantic rules are checked last.
pub fn check_filter(registry: &ColumnRegistry, filter: &FilterSpec) -> Result<()> {
	let column = registry
		.by_name(filter.column())
		.ok_or_else(|| FiltersError::ColumnNotFound(filter.column().to_string()))?;

	let value_type = filter.value_type();
	if value_type != ValueType::Null && value_type != column.value_type {
		return Err(FiltersError::TypeMismatch {
			column: column.name,
			expected: column.value_type,
			actual: value_type,
		});
	}

	filter.validate()
}

fn require_str<'a>(obj: &'a Map<String, Value>, field: &'static str) -> Result<&'a str> {
	obj.get(field)
		.ok_or(FiltersError::MissingField(field))?
		.as_str()
		.ok_or(FiltersError::InvalidField {
			field,
			expected: "a string",
		})
}

fn require_value<'a>(obj: &'a Map<String, Value>) -> Result<&'a Value> {
	obj.get("value").ok_or(FiltersError::MissingField("value"))
}

fn string_value(value: &Value) -> Result<String> {
	value
		.as_str()
		.map(str::to_string)
		.ok_or(FiltersError::InvalidField {
			field: "value",
			expected: "a string",
		})
}

fn bool_value(value: &Value) -> Result<bool> {
	value.as_bool().ok_or(FiltersError::InvalidField {
		field: "value",
		expected: "a boolean",
	})
}

fn number_value(value: &Value) -> Result<f64> {
	let parsed = match value {
		Value::Number(number) => number.as_f64(),
		Value::String(text) => text.trim().parse::<f64>().ok(),
		_ => None,
	};

	parsed
		.filter(|number| number.is_finite())
		.ok_or(FiltersError::InvalidField {
			field: "value",
			expected: "a finite number",
		})
}

fn datetime_value(value: &Value) -> Result<DateTime<Utc>> {
	let parsed = match value {
		Value::String(text) => DateTime::parse_from_rfc3339(text)
			.ok()
			.map(|datetime| datetime.with_timezone(&Utc)),
		Value::Number(number) => number
			.as_i64()
			.and_then(|millis| Utc.timestamp_millis_opt(millis).single()),
		_ => None,
	};

	parsed.ok_or(FiltersError::InvalidField {
		field: "value",
		expected: "an RFC 3339 timestamp or epoch milliseconds",
	})
}

fn options_value(value: &Value) -> Result<Vec<String>> {
	let invalid = FiltersError::InvalidField {
		field: "value",
		expected: "an array of strings",
	};

	let Some(items) = value.as_array() else {
		return Err(invalid);
	};

	let mut options = Vec::with_capacity(items.len());
	for item in items {
		match item.as_str() {
			Some(text) => options.push(text.to_string()),
			None => return Err(invalid),
		}
	}
	Ok(options)
}

fn null_value(obj: &Map<String, Value>) -> Result<String> {
	match obj.get("value") {
		None | Some(Value::Null) => Ok(String::new()),
		Some(Value::String(text)) => Ok(text.clone()),
		Some(_) => Err(FiltersError::InvalidField {
			field: "value",
			expected: "an empty string",
		}),
	}
}
