// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! API key configuration.

use serde::Deserialize;

/// Auth configuration (runtime, fully resolved).
#[derive(Clone, Default)]
pub struct AuthConfig {
	/// Keys accepted in the `key` query parameter.
	pub api_keys: Vec<String>,
}

impl AuthConfig {
	pub fn is_valid_key(&self, key: &str) -> bool {
		!key.is_empty() && self.api_keys.iter().any(|k| k == key)
	}
}

// Keys are credentials; only the count is printed.
impl std::fmt::Debug for AuthConfig {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("AuthConfig")
			.field("api_keys", &format_args!("[{} redacted]", self.api_keys.len()))
			.finish()
	}
}

/// Auth configuration layer (partial, for merging).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthConfigLayer {
	#[serde(default)]
	pub api_keys: Option<Vec<String>>,
}

impl AuthConfigLayer {
	pub fn merge(&mut self, other: AuthConfigLayer) {
		if other.api_keys.is_some() {
			self.api_keys = other.api_keys;
		}
	}

	pub fn finalize(self) -> AuthConfig {
		AuthConfig {
			api_keys: self
				.api_keys
				.unwrap_or_default()
				.into_iter()
				.map(|k| k.trim().to_string())
				.filter(|k| !k.is_empty())
				.collect(),
		}
	}
}
