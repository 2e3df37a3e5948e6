// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for the filter state SDK.

use thiserror::Error;

/// Result type alias for the filter state SDK.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur while building a filter store.
///
/// Running stores never fail: reads degrade by dropping bad tokens and
/// writes always succeed, so only construction is fallible.
#[derive(Error, Debug)]
pub enum StoreError {
	/// No column registry was given to the builder.
	#[error("Filter store requires a column registry")]
	MissingRegistry,

	/// No location backend was given to the builder.
	#[error("Filter store requires a location backend")]
	MissingLocation,

	/// The query parameter name is empty.
	#[error("Query parameter name must not be empty")]
	EmptyParamName,
}
