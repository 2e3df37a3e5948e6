// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Column definitions and the per-view column registry.
//!
//! A [`ColumnDefinition`] describes one filterable field: its stable short id
//! (the form used inside URL tokens), its display name (the form filters
//! reference), its value type, and the opaque backing-field reference the
//! remote query layer understands. A [`ColumnRegistry`] holds the ordered
//! definitions for one view and resolves ids and names to definitions.
//!
//! Registries are shared handles: cloning one yields a second view onto the
//! same column list, so option lists populated after a remote lookup become
//! visible to every holder without re-registration.

use std::collections::HashSet;
use std::str::FromStr;
use std::sync::{Arc, PoisonError, RwLock};

use serde::{Deserialize, Serialize};

use crate::error::{FiltersError, Result};

/// The value domain of a filterable column.
///
/// The same tags discriminate [`FilterSpec`](crate::FilterSpec) variants and
/// appear verbatim in URL tokens and in the JSON handed to the remote query
/// layer. `Null` never describes a column; it exists so is-null conditions on
/// nullable columns carry a tag of their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ValueType {
	String,
	Number,
	Datetime,
	Boolean,
	StringOptions,
	ArrayOptions,
	StringObject,
	NumberObject,
	CategoryOptions,
	Null,
}

impl ValueType {
	/// Every value type, in declaration order.
	pub const ALL: [ValueType; 10] = [
		ValueType::String,
		ValueType::Number,
		ValueType::Datetime,
		ValueType::Boolean,
		ValueType::StringOptions,
		ValueType::ArrayOptions,
		ValueType::StringObject,
		ValueType::NumberObject,
		ValueType::CategoryOptions,
		ValueType::Null,
	];

	/// The wire literal for this type.
	pub fn as_str(&self) -> &'static str {
		match self {
			ValueType::String => "string",
			ValueType::Number => "number",
			ValueType::Datetime => "datetime",
			ValueType::Boolean => "boolean",
			ValueType::StringOptions => "stringOptions",
			ValueType::ArrayOptions => "arrayOptions",
			ValueType::StringObject => "stringObject",
			ValueType::NumberObject => "numberObject",
			ValueType::CategoryOptions => "categoryOptions",
			ValueType::Null => "null",
		}
	}

	/// True for types that address a sub-field inside a structured column and
	/// therefore require a `key`.
	pub fn requires_key(&self) -> bool {
		matches!(
			self,
			ValueType::StringObject | ValueType::NumberObject | ValueType::CategoryOptions
		)
	}
}

impl std::fmt::Display for ValueType {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for ValueType {
	type Err = FiltersError;

	fn from_str(s: &str) -> Result<Self> {
		match s {
			"string" => Ok(ValueType::String),
			"number" => Ok(ValueType::Number),
			"datetime" => Ok(ValueType::Datetime),
			"boolean" => Ok(ValueType::Boolean),
			"stringOptions" => Ok(ValueType::StringOptions),
			"arrayOptions" => Ok(ValueType::ArrayOptions),
			"stringObject" => Ok(ValueType::StringObject),
			"numberObject" => Ok(ValueType::NumberObject),
			"categoryOptions" => Ok(ValueType::CategoryOptions),
			"null" => Ok(ValueType::Null),
			_ => Err(FiltersError::UnknownType(s.to_string())),
		}
	}
}

/// Describes one filterable field exposed by a view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDefinition {
	/// Stable short identifier, unique within a registry. This is the form
	/// written into URL tokens, so it must stay stable across releases that
	/// share bookmarked URLs.
	pub id: String,
	/// Human-readable label; filters reference columns by this name.
	pub name: String,
	/// The value domain of the column.
	pub value_type: ValueType,
	/// Opaque reference to the remote field behind this column. Passed
	/// through untouched; the filter engine never interprets it.
	#[serde(default)]
	pub backing_field: String,
	/// Discrete values offered for option columns. May be empty at
	/// registration and filled later; filters accepted before that stay
	/// valid, and membership is never enforced.
	#[serde(default)]
	pub options: Vec<String>,
	/// Whether the absence of a value is meaningful for this column.
	/// Informational only; it does not affect filter validity.
	#[serde(default)]
	pub nullable: bool,
}

impl ColumnDefinition {
	/// Creates a definition with no backing field, no options, not nullable.
	pub fn new(id: impl Into<String>, name: impl Into<String>, value_type: ValueType) -> Self {
		Self {
			id: id.into(),
			name: name.into(),
			value_type,
			backing_field: String::new(),
			options: Vec::new(),
			nullable: false,
		}
	}

	/// Sets the opaque backing-field reference.
	pub fn with_backing_field(mut self, backing_field: impl Into<String>) -> Self {
		self.backing_field = backing_field.into();
		self
	}

	/// Sets the option list.
	pub fn with_options(mut self, options: Vec<String>) -> Self {
		self.options = options;
		self
	}

	/// Marks the column as nullable.
	pub fn nullable(mut self) -> Self {
		self.nullable = true;
		self
	}
}

/// The ordered collection of column definitions for one view.
///
/// Lookups by id and by name are both unique (enforced at construction) and
/// always agree on which definition they return. The registry is a shared
/// handle; [`Clone`] yields another view onto the same columns, and
/// [`set_options`](ColumnRegistry::set_options) mutations are visible to all
/// holders. Lookups read the live list rather than a snapshot, so options
/// populated after an async fetch are honoured immediately.
#[derive(Debug)]
pub struct ColumnRegistry {
	inner: Arc<RwLock<Vec<ColumnDefinition>>>,
}

impl ColumnRegistry {
	/// Creates a registry from an ordered column list.
	///
	/// Fails if a column id contains `;` or `,` (ids travel raw inside URL
	/// tokens, where those characters delimit fields and tokens), or if two
	/// definitions share an id or a name.
	pub fn new(columns: Vec<ColumnDefinition>) -> Result<Self> {
		let mut ids = HashSet::new();
		let mut names = HashSet::new();
		for column in &columns {
			if column.id.contains([';', ',']) {
				return Err(FiltersError::InvalidColumnId(column.id.clone()));
			}
			if !ids.insert(column.id.as_str()) {
				return Err(FiltersError::DuplicateColumnId(column.id.clone()));
			}
			if !names.insert(column.name.as_str()) {
				return Err(FiltersError::DuplicateColumnName(column.name.clone()));
			}
		}

		Ok(Self {
			inner: Arc::new(RwLock::new(columns)),
		})
	}

	/// Resolves a column by its short id.
	pub fn by_id(&self, id: &str) -> Option<ColumnDefinition> {
		self.read().iter().find(|column| column.id == id).cloned()
	}

	/// Resolves a column by its display name.
	pub fn by_name(&self, name: &str) -> Option<ColumnDefinition> {
		self.read().iter().find(|column| column.name == name).cloned()
	}

	/// Returns an ordered snapshot of every definition.
	pub fn columns(&self) -> Vec<ColumnDefinition> {
		self.read().clone()
	}

	/// Replaces the option list of the column with the given id.
	///
	/// This is how lazily fetched option values land in the registry. Filters
	/// accepted before the options arrived are not re-validated; option
	/// membership is intentionally not a validity rule.
	pub fn set_options(&self, id: &str, options: Vec<String>) -> Result<()> {
		let mut columns = self.inner.write().unwrap_or_else(PoisonError::into_inner);
		match columns.iter_mut().find(|column| column.id == id) {
			Some(column) => {
				column.options = options;
				Ok(())
			}
			None => Err(FiltersError::ColumnNotFound(id.to_string())),
		}
	}

	/// Returns the number of registered columns.
	pub fn len(&self) -> usize {
		self.read().len()
	}

	/// Returns true if the registry has no columns.
	pub fn is_empty(&self) -> bool {
		self.read().is_empty()
	}

	fn read(&self) -> std::sync::RwLockReadGuard<'_, Vec<ColumnDefinition>> {
		self.inner.read().unwrap_or_else(PoisonError::into_inner)
	}
}

impl Clone for ColumnRegistry {
	fn clone(&self) -> Self {
		Self {
			inner: Arc::clone(&self.inner),
		}
	}
}
