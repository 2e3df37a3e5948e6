// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The filter state store.
//!
//! [`FilterStore`] owns the active filter list for one table surface and
//! keeps it in lockstep with a URL query parameter. Every mutation is
//! encoded and written through the [`Location`] backend; after external
//! navigation, [`FilterStore::refresh`] re-reads the parameter. Clones share
//! state, so a filter toolbar and a table body can hold the same store.
//!
//! The store holds state, it does not judge it: callers validate candidates
//! with `loupe-filters-core` before handing them over. The one place
//! validation happens inside the store is the URL read path, governed by
//! [`DecodePolicy`].

use std::sync::{Arc, PoisonError, RwLock};

use loupe_filters_core::{
	check_filter, decode_filters, encode_filters, ColumnRegistry, FilterSpec,
};
use tracing::{debug, warn};

use crate::error::{Result, StoreError};
use crate::location::{Location, SharedLocation};

const DEFAULT_PARAM: &str = "filter";

/// How strictly URL state is checked when it is loaded into the store.
///
/// The query parameter may come from an old bookmark or a hand-edited link,
/// so a decoded filter can be well-formed yet no longer legal for the
/// current registry (an operator removed from a type's set, a column
/// re-registered under a different type). This policy decides what happens
/// to those filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodePolicy {
	/// Drop decoded filters that fail validation against the registry.
	Validate,
	/// Keep every filter the codec could structurally decode.
	Permissive,
}

impl Default for DecodePolicy {
	fn default() -> Self {
		DecodePolicy::Validate
	}
}

/// Builder for constructing a [`FilterStore`].
pub struct FilterStoreBuilder {
	registry: Option<ColumnRegistry>,
	location: Option<SharedLocation>,
	param: String,
	policy: DecodePolicy,
	initial: Vec<FilterSpec>,
}

impl FilterStoreBuilder {
	/// Creates a new builder with default settings.
	pub fn new() -> Self {
		Self {
			registry: None,
			location: None,
			param: DEFAULT_PARAM.to_string(),
			policy: DecodePolicy::default(),
			initial: Vec::new(),
		}
	}

	/// Sets the column registry the store encodes and decodes against.
	///
	/// Registries share their column set across clones, so options loaded
	/// later are visible to a store built earlier.
	pub fn registry(mut self, registry: ColumnRegistry) -> Self {
		self.registry = Some(registry);
		self
	}

	/// Sets the location backend holding the query parameter.
	pub fn location(mut self, location: impl Location) -> Self {
		self.location = Some(Arc::new(location));
		self
	}

	/// Sets the query parameter name. Defaults to `filter`.
	///
	/// Surfaces that live on the same page must use distinct names.
	pub fn param(mut self, name: impl Into<String>) -> Self {
		self.param = name.into();
		self
	}

	/// Sets the decode policy for URL state.
	pub fn decode_policy(mut self, policy: DecodePolicy) -> Self {
		self.policy = policy;
		self
	}

	/// Sets the filters to start from when the query parameter is absent.
	///
	/// A present parameter always wins, even when it decodes to nothing;
	/// the initial list is a default, not an override. It is not written to
	/// the location until the first mutation.
	pub fn initial_filters(mut self, filters: Vec<FilterSpec>) -> Self {
		self.initial = filters;
		self
	}

	/// Builds the store and loads initial state from the location.
	pub fn build(self) -> Result<FilterStore> {
		let registry = self.registry.ok_or(StoreError::MissingRegistry)?;
		let location = self.location.ok_or(StoreError::MissingLocation)?;
		if self.param.is_empty() {
			return Err(StoreError::EmptyParamName);
		}

		let store = FilterStore {
			registry,
			location,
			param: self.param,
			policy: self.policy,
			inner: Arc::new(RwLock::new(StoreInner::default())),
		};

		if store.location.get_param(&store.param).is_some() {
			store.refresh();
		} else if !self.initial.is_empty() {
			let mut inner = store.inner.write().unwrap_or_else(PoisonError::into_inner);
			inner.filters = self.initial;
		}

		Ok(store)
	}
}

impl Default for FilterStoreBuilder {
	fn default() -> Self {
		Self::new()
	}
}

/// Filter state for one table surface, synchronized with a query parameter.
pub struct FilterStore {
	registry: ColumnRegistry,
	location: SharedLocation,
	param: String,
	policy: DecodePolicy,
	inner: Arc<RwLock<StoreInner>>,
}

#[derive(Debug, Default)]
struct StoreInner {
	/// The filters currently applied, in display order.
	filters: Vec<FilterSpec>,
}

impl FilterStore {
	/// Creates a builder for a filter store.
	pub fn builder() -> FilterStoreBuilder {
		FilterStoreBuilder::new()
	}

	/// Returns the filters currently applied, in order.
	pub fn filters(&self) -> Vec<FilterSpec> {
		self.read().filters.clone()
	}

	/// Returns the number of filters currently applied.
	pub fn len(&self) -> usize {
		self.read().filters.len()
	}

	/// Returns true if no filters are applied.
	pub fn is_empty(&self) -> bool {
		self.read().filters.is_empty()
	}

	/// Returns the query parameter name this store owns.
	pub fn param(&self) -> &str {
		&self.param
	}

	/// Returns the column registry this store encodes against.
	pub fn registry(&self) -> &ColumnRegistry {
		&self.registry
	}

	/// Replaces the filter list and writes it to the location.
	///
	/// The list is taken as given; validate candidates with
	/// [`check_filter`] or
	/// [`validate_filter`](loupe_filters_core::validate_filter) before
	/// calling. An empty list removes the query parameter.
	pub fn set_filters(&self, filters: Vec<FilterSpec>) {
		self.write_state(filters);
	}

	/// Appends one filter and writes the new list to the location.
	pub fn add_filter(&self, filter: FilterSpec) {
		let mut filters = self.filters();
		filters.push(filter);
		self.write_state(filters);
	}

	/// Removes the filter at `index`, returning it.
	///
	/// Out-of-range indexes are a no-op.
	pub fn remove_filter(&self, index: usize) -> Option<FilterSpec> {
		let (removed, snapshot) = {
			let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
			if index >= inner.filters.len() {
				return None;
			}
			let removed = inner.filters.remove(index);
			(removed, inner.filters.clone())
		};

		self.write_param(&snapshot);
		Some(removed)
	}

	/// Clears all filters and removes the query parameter.
	pub fn clear(&self) {
		self.write_state(Vec::new());
	}

	/// Re-reads the query parameter and replaces in-memory state.
	///
	/// Call this after external navigation (back/forward, a pasted link).
	/// The read side never writes the parameter back, so a URL the user
	/// typed stays exactly as typed.
	pub fn refresh(&self) {
		let raw = self.location.get_param(&self.param).unwrap_or_default();
		let decoded = decode_filters(&self.registry, &raw);
		let total = decoded.len();

		let filters: Vec<FilterSpec> = match self.policy {
			DecodePolicy::Validate => decoded
				.into_iter()
				.filter(|filter| match check_filter(&self.registry, filter) {
					Ok(()) => true,
					Err(error) => {
						warn!(column = %filter.column(), %error, "dropping filter from url");
						false
					}
				})
				.collect(),
			DecodePolicy::Permissive => decoded,
		};

		debug!(
			param = %self.param,
			loaded = filters.len(),
			decoded = total,
			"filter state loaded"
		);

		let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
		inner.filters = filters;
	}

	fn write_state(&self, filters: Vec<FilterSpec>) {
		self.write_param(&filters);
		let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
		inner.filters = filters;
	}

	fn write_param(&self, filters: &[FilterSpec]) {
		let encoded = encode_filters(&self.registry, filters);
		if encoded.is_empty() {
			self.location.remove_param(&self.param);
			debug!(param = %self.param, "filter parameter removed");
		} else {
			self.location.set_param(&self.param, &encoded);
			debug!(param = %self.param, count = filters.len(), "filter parameter written");
		}
	}

	fn read(&self) -> std::sync::RwLockReadGuard<'_, StoreInner> {
		self.inner.read().unwrap_or_else(PoisonError::into_inner)
	}
}

impl Clone for FilterStore {
	fn clone(&self) -> Self {
		Self {
			registry: self.registry.clone(),
			location: Arc::clone(&self.location),
			param: self.param.clone(),
			policy: self.policy,
			inner: Arc::clone(&self.inner),
		}
	}
}
