// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Filter state sync SDK for Loupe.
//!
//! This crate keeps a table surface's filter state in lockstep with a URL
//! query parameter. It builds on the typed filter model in
//! `loupe-filters-core` and adds the stateful part: a store that loads
//! filters from a location, validates them, and writes every change back.
//!
//! # Features
//!
//! - **Location Injection**: URL access goes through the [`Location`] trait,
//!   so the store runs against a browser adapter, a webview, or memory
//! - **Shareable State**: encoded filter state survives copy-pasted links
//! - **Lenient Loading**: stale or hand-edited tokens are dropped, never fatal
//! - **Decode Policies**: choose between validated and permissive URL loading
//! - **Cheap Clones**: clones share state, one store per surface
//!
//! # Example
//!
//! ```
//! use loupe_filters::{
//!     ColumnDefinition, ColumnRegistry, FilterOperator, FilterSpec, FilterStore,
//!     InMemoryLocation, Location, ValueType,
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = ColumnRegistry::new(vec![
//!     ColumnDefinition::new("bk", "Bookmarked", ValueType::Boolean),
//!     ColumnDefinition::new("nm", "Name", ValueType::StringOptions),
//! ])?;
//!
//! let location = InMemoryLocation::new();
//! let store = FilterStore::builder()
//!     .registry(registry)
//!     .location(location.clone())
//!     .build()?;
//!
//! store.set_filters(vec![FilterSpec::Boolean {
//!     column: "Bookmarked".to_string(),
//!     operator: FilterOperator::Equals,
//!     value: true,
//! }]);
//!
//! assert_eq!(location.get_param("filter").as_deref(), Some("bk;boolean;;=;true"));
//!
//! store.clear();
//! assert_eq!(location.get_param("filter"), None);
//! # Ok(())
//! # }
//! ```

mod error;
mod location;
mod store;

pub use error::{Result, StoreError};
pub use location::{InMemoryLocation, Location, SharedLocation};
pub use store::{DecodePolicy, FilterStore, FilterStoreBuilder};

// Re-export core types for convenience
pub use loupe_filters_core::{
	ColumnDefinition, ColumnRegistry, FilterOperator, FilterSpec, FiltersError, ValueType,
};
