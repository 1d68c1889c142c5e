// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sources: environment variables and TOML files.

use std::path::PathBuf;

use tracing::{debug, trace};

use crate::error::ConfigError;
use crate::layer::ServerConfigLayer;
use crate::sections::{
	AuthConfigLayer, DatabaseConfigLayer, FeedConfigLayer, HttpConfigLayer, LogFormat,
	LoggingConfigLayer, RateLimitConfigLayer,
};

/// Source precedence levels (higher = overrides lower).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
	Defaults = 10,
	ConfigFile = 20,
	Environment = 50,
}

/// Trait for configuration sources.
pub trait ConfigSource: Send + Sync {
	fn name(&self) -> &'static str;
	fn precedence(&self) -> Precedence;
	fn load(&self) -> Result<ServerConfigLayer, ConfigError>;
}

/// Built-in defaults source.
pub struct DefaultsSource;

impl ConfigSource for DefaultsSource {
	fn name(&self) -> &'static str {
		"defaults"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Defaults
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		debug!("loading defaults");
		Ok(ServerConfigLayer::default())
	}
}

/// TOML file configuration source.
pub struct TomlSource {
	path: PathBuf,
}

impl TomlSource {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	pub fn system() -> Self {
		Self::new("/etc/transit/server.toml")
	}
}

impl ConfigSource for TomlSource {
	fn name(&self) -> &'static str {
		"toml-config"
	}

	fn precedence(&self) -> Precedence {
		Precedence::ConfigFile
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		if !self.path.exists() {
			debug!(path = %self.path.display(), "config file not found, skipping");
			return Ok(ServerConfigLayer::default());
		}

		debug!(path = %self.path.display(), "loading config file");
		let content = std::fs::read_to_string(&self.path).map_err(|e| ConfigError::FileRead {
			path: self.path.clone(),
			source: e,
		})?;

		let layer: ServerConfigLayer =
			toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
				path: self.path.clone(),
				source: e,
			})?;

		trace!("parsed config layer from TOML");
		Ok(layer)
	}
}

/// Environment variable source.
///
/// Convention: TRANSIT_SERVER_<SECTION>_<FIELD>
pub struct EnvSource;

impl ConfigSource for EnvSource {
	fn name(&self) -> &'static str {
		"environment"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Environment
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		debug!("loading environment variables");
		Ok(ServerConfigLayer {
			http: Some(load_http_from_env()?),
			database: Some(load_database_from_env()),
			auth: Some(load_auth_from_env()),
			rate_limit: Some(load_rate_limit_from_env()?),
			feed: Some(load_feed_from_env()),
			logging: Some(load_logging_from_env()?),
		})
	}
}

fn env_var(name: &str) -> Option<String> {
	std::env::var(name).ok().filter(|s| !s.is_empty())
}

fn env_list(name: &str) -> Option<Vec<String>> {
	env_var(name).map(|s| split_list(&s))
}

fn split_list(value: &str) -> Vec<String> {
	value
		.split(',')
		.map(|s| s.trim().to_string())
		.filter(|s| !s.is_empty())
		.collect()
}

fn env_parsed<T: std::str::FromStr>(name: &str, kind: &str) -> Result<Option<T>, ConfigError> {
	match env_var(name) {
		Some(v) => v.parse().map(Some).map_err(|_| ConfigError::InvalidValue {
			key: name.to_string(),
			message: format!("invalid {kind} value '{v}'"),
		}),
		None => Ok(None),
	}
}

fn load_http_from_env() -> Result<HttpConfigLayer, ConfigError> {
	Ok(HttpConfigLayer {
		host: env_var("TRANSIT_SERVER_HOST"),
		port: env_parsed("TRANSIT_SERVER_PORT", "u16")?,
		request_timeout_secs: env_parsed("TRANSIT_SERVER_REQUEST_TIMEOUT_SECS", "u64")?,
	})
}

fn load_database_from_env() -> DatabaseConfigLayer {
	DatabaseConfigLayer {
		url: env_var("TRANSIT_SERVER_DATABASE_URL"),
	}
}

fn load_auth_from_env() -> AuthConfigLayer {
	AuthConfigLayer {
		api_keys: env_list("TRANSIT_SERVER_API_KEYS"),
	}
}

fn load_rate_limit_from_env() -> Result<RateLimitConfigLayer, ConfigError> {
	Ok(RateLimitConfigLayer {
		requests_per_window: env_parsed("TRANSIT_SERVER_RATE_LIMIT", "u32")?,
		idle_ttl_secs: env_parsed("TRANSIT_SERVER_RATE_LIMIT_IDLE_TTL_SECS", "u64")?,
		cleanup_interval_secs: env_parsed(
			"TRANSIT_SERVER_RATE_LIMIT_CLEANUP_INTERVAL_SECS",
			"u64",
		)?,
		exempt_keys: env_list("TRANSIT_SERVER_RATE_LIMIT_EXEMPT_KEYS"),
	})
}

fn load_feed_from_env() -> FeedConfigLayer {
	FeedConfigLayer {
		snapshot_path: env_var("TRANSIT_SERVER_FEED_SNAPSHOT").map(PathBuf::from),
	}
}

fn load_logging_from_env() -> Result<LoggingConfigLayer, ConfigError> {
	let format = match env_var("TRANSIT_SERVER_LOG_FORMAT") {
		Some(v) => Some(LogFormat::parse(&v).ok_or_else(|| ConfigError::InvalidValue {
			key: "TRANSIT_SERVER_LOG_FORMAT".to_string(),
			message: format!("expected 'pretty' or 'json', got '{v}'"),
		})?),
		None => None,
	};

	Ok(LoggingConfigLayer {
		level: env_var("TRANSIT_SERVER_LOG_LEVEL"),
		format,
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_precedence_ordering() {
		assert!(Precedence::Environment > Precedence::ConfigFile);
		assert!(Precedence::ConfigFile > Precedence::Defaults);
	}

	#[test]
	fn test_defaults_source_returns_empty_layer() {
		let source = DefaultsSource;
		let layer = source.load().unwrap();
		assert!(layer.http.is_none());
		assert!(layer.database.is_none());
	}

	#[test]
	fn test_toml_source_missing_file_returns_empty() {
		let source = TomlSource::new("/nonexistent/config.toml");
		let layer = source.load().unwrap();
		assert!(layer.http.is_none());
	}

	#[test]
	fn test_toml_source_invalid_file_errors() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("broken.toml");
		std::fs::write(&path, "[http\nport = ").unwrap();

		let err = TomlSource::new(path).load().unwrap_err();
		assert!(matches!(err, ConfigError::TomlParse { .. }));
	}

	#[test]
	fn test_split_list_trims_and_drops_empty() {
		assert_eq!(split_list(" a, b ,,c "), vec!["a", "b", "c"]);
		assert!(split_list(" , ").is_empty());
	}

	mod property_tests {
		use super::*;
		use proptest::prelude::*;

		proptest! {
			#[test]
			fn prop_split_list_entries_are_trimmed_and_non_empty(input in "[a-z ,]{0,40}") {
				for entry in split_list(&input) {
					prop_assert!(!entry.is_empty());
					prop_assert_eq!(entry.trim(), entry.as_str());
					prop_assert!(!entry.contains(','));
				}
			}
		}
	}
}
