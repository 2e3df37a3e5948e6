// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for the filter model.

use thiserror::Error;

use crate::{FilterOperator, ValueType};

/// Errors that can occur while building, validating, or registering filters.
#[derive(Debug, Error)]
pub enum FiltersError {
	/// A required field was absent from a candidate filter
	#[error("missing required field: {0}")]
	MissingField(&'static str),

	/// A field was present but had the wrong shape
	#[error("invalid value for {field}: expected {expected}")]
	InvalidField {
		field: &'static str,
		expected: &'static str,
	},

	/// The type tag did not name a known value type
	#[error("unknown filter type: {0}")]
	UnknownType(String),

	/// The operator string did not name a known operator
	#[error("unknown operator: {0}")]
	UnknownOperator(String),

	/// The operator exists but is not in the operator set for the type
	#[error("operator {operator} is not valid for {value_type} filters")]
	OperatorNotAllowed {
		operator: FilterOperator,
		value_type: ValueType,
	},

	/// Option filters must carry at least one selected value
	#[error("option filter for column {0} has an empty value list")]
	EmptyOptions(String),

	/// A column id contains a character reserved by the URL token format
	#[error("column id {0} contains a reserved delimiter")]
	InvalidColumnId(String),

	/// Two column definitions share an id
	#[error("duplicate column id: {0}")]
	DuplicateColumnId(String),

	/// Two column definitions share a display name
	#[error("duplicate column name: {0}")]
	DuplicateColumnName(String),

	/// A column id was not present in the registry
	#[error("column not found: {0}")]
	ColumnNotFound(String),

	/// A candidate's type tag disagrees with the registered column type
	#[error("column {column} is {expected}, not {actual}")]
	TypeMismatch {
		column: String,
		expected: ValueType,
		actual: ValueType,
	},
}

pub type Result<T> = std::result::Result<T, FiltersError>;
