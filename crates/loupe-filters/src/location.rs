// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Location backends for filter state persistence.
//!
//! The store never touches a URL directly. It reads and writes one query
//! parameter through the [`Location`] trait, so the same store runs against
//! a browser history adapter, a desktop webview, or plain memory in tests.
//!
//! # Example
//!
//! ```
//! use loupe_filters::{InMemoryLocation, Location};
//!
//! let location = InMemoryLocation::new().with_param("filter", "bk;boolean;;=;true");
//! assert_eq!(location.get_param("filter").as_deref(), Some("bk;boolean;;=;true"));
//!
//! location.remove_param("filter");
//! assert_eq!(location.get_param("filter"), None);
//! ```

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Trait for reading and writing URL query parameters.
///
/// Implementations adapt the store to wherever filter state should live.
/// Methods take `&self`; implementations are expected to manage their own
/// interior mutability, the way a browser's location bar does.
pub trait Location: Send + Sync + 'static {
	/// Returns the raw value of a query parameter, if present.
	fn get_param(&self, name: &str) -> Option<String>;

	/// Sets a query parameter, replacing any previous value.
	///
	/// History-backed implementations must replace the current entry rather
	/// than push a new one; each filter tweak must not become a back-button
	/// stop.
	fn set_param(&self, name: &str, value: &str);

	/// Removes a query parameter entirely.
	///
	/// Removal and setting an empty value are different states in a URL;
	/// the store always removes rather than writing an empty string.
	fn remove_param(&self, name: &str);
}

/// Type alias for a shared location backend.
pub type SharedLocation = Arc<dyn Location>;

/// A location backend that keeps query parameters in memory.
///
/// Clones share the same underlying parameters, which makes it easy to hold
/// one handle in a test while a store writes through another.
#[derive(Debug, Default)]
pub struct InMemoryLocation {
	inner: Arc<RwLock<HashMap<String, String>>>,
}

impl InMemoryLocation {
	/// Creates an empty in-memory location.
	pub fn new() -> Self {
		Self::default()
	}

	/// Seeds a parameter, builder style.
	pub fn with_param(self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.set_param(&name.into(), &value.into());
		self
	}
}

impl Location for InMemoryLocation {
	fn get_param(&self, name: &str) -> Option<String> {
		self.inner
			.read()
			.unwrap_or_else(PoisonError::into_inner)
			.get(name)
			.cloned()
	}

	fn set_param(&self, name: &str, value: &str) {
		self.inner
			.write()
			.unwrap_or_else(PoisonError::into_inner)
			.insert(name.to_string(), value.to_string());
	}

	fn remove_param(&self, name: &str) {
		self.inner
			.write()
			.unwrap_or_else(PoisonError::into_inner)
			.remove(name);
	}
}

impl Clone for InMemoryLocation {
	fn clone(&self) -> Self {
		Self {
			inner: Arc::clone(&self.inner),
		}
	}
}
