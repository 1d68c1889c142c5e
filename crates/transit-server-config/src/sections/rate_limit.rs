// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Per-caller rate limiting configuration.

use serde::Deserialize;

#[derive(Debug, Clone, PartialEq)]
pub struct RateLimitConfig {
	/// Requests admitted per caller per window. Zero disables limiting.
	pub requests_per_window: u32,
	/// Buckets untouched for this long are evicted by the cleanup task.
	pub idle_ttl_secs: u64,
	pub cleanup_interval_secs: u64,
	/// Keys that are never limited.
	pub exempt_keys: Vec<String>,
}

impl RateLimitConfig {
	pub fn is_enabled(&self) -> bool {
		self.requests_per_window > 0
	}
}

impl Default for RateLimitConfig {
	fn default() -> Self {
		Self {
			requests_per_window: 100,
			idle_ttl_secs: 300,
			cleanup_interval_secs: 60,
			exempt_keys: Vec::new(),
		}
	}
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct RateLimitConfigLayer {
	pub requests_per_window: Option<u32>,
	pub idle_ttl_secs: Option<u64>,
	pub cleanup_interval_secs: Option<u64>,
	pub exempt_keys: Option<Vec<String>>,
}

impl RateLimitConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.requests_per_window.is_some() {
			self.requests_per_window = other.requests_per_window;
		}
		if other.idle_ttl_secs.is_some() {
			self.idle_ttl_secs = other.idle_ttl_secs;
		}
		if other.cleanup_interval_secs.is_some() {
			self.cleanup_interval_secs = other.cleanup_interval_secs;
		}
		if other.exempt_keys.is_some() {
			self.exempt_keys = other.exempt_keys;
		}
	}

	pub fn finalize(self) -> RateLimitConfig {
		let defaults = RateLimitConfig::default();
		RateLimitConfig {
			requests_per_window: self
				.requests_per_window
				.unwrap_or(defaults.requests_per_window),
			idle_ttl_secs: self.idle_ttl_secs.unwrap_or(defaults.idle_ttl_secs),
			cleanup_interval_secs: self
				.cleanup_interval_secs
				.unwrap_or(defaults.cleanup_interval_secs),
			exempt_keys: self.exempt_keys.unwrap_or(defaults.exempt_keys),
		}
	}
}
