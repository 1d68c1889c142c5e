// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Lenient query-string access.

use axum::{extract::Query, http::Uri};

/// Decoded query pairs in request order.
///
/// Parsing never fails: a query string that cannot be decoded is treated as
/// empty, so handlers report missing parameters instead of a framework
/// rejection. Repeated keys keep every value; [`QueryParams::first`] returns
/// the earliest one.
#[derive(Debug, Clone, Default)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
	pub fn from_uri(uri: &Uri) -> Self {
		match Query::<Vec<(String, String)>>::try_from_uri(uri) {
			Ok(Query(pairs)) => QueryParams(pairs),
			Err(e) => {
				tracing::debug!(error = %e, "ignoring undecodable query string");
				QueryParams::default()
			}
		}
	}

	pub fn first(&self, name: &str) -> Option<&str> {
		self.0
			.iter()
			.find(|(key, _)| key == name)
			.map(|(_, value)| value.as_str())
	}
}
