// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Request parameter validation.

/// Upper bound on routes returned by one search, and the default when the
/// caller does not ask for fewer.
pub const MAX_RESULTS: u32 = 20;

pub const MAX_COUNT_FIELD: &str = "maxCount";
pub const MAX_COUNT_NOT_POSITIVE: &str = "maxCount must be a positive integer";

/// A validation failure attached to one request field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
	pub field: &'static str,
	pub message: String,
}

impl FieldError {
	pub fn new(field: &'static str, message: impl Into<String>) -> Self {
		Self {
			field,
			message: message.into(),
		}
	}
}

/// Number of routes a caller may receive, always within `1..=MAX_RESULTS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ResultLimit(u32);

impl ResultLimit {
	pub fn get(self) -> u32 {
		self.0
	}

	/// Rows to request from the store: one more than the limit, so a full
	/// page plus one proves the result was truncated.
	pub fn fetch_size(self) -> u32 {
		self.0 + 1
	}
}

impl Default for ResultLimit {
	fn default() -> Self {
		ResultLimit(MAX_RESULTS)
	}
}

/// Validate the `maxCount` query parameter.
///
/// An absent or empty value yields the default of [`MAX_RESULTS`].
pub fn parse_max_count(raw: Option<&str>) -> Result<ResultLimit, FieldError> {
	let raw = match raw {
		Some(value) if !value.is_empty() => value,
		_ => return Ok(ResultLimit::default()),
	};

	let parsed: i64 = raw
		.parse()
		.map_err(|_| FieldError::new(MAX_COUNT_FIELD, MAX_COUNT_NOT_POSITIVE))?;

	if parsed <= 0 {
		return Err(FieldError::new(MAX_COUNT_FIELD, MAX_COUNT_NOT_POSITIVE));
	}

	if parsed > i64::from(MAX_RESULTS) {
		return Err(FieldError::new(
			MAX_COUNT_FIELD,
			format!("maxCount must not exceed {MAX_RESULTS}"),
		));
	}

	Ok(ResultLimit(parsed as u32))
}
