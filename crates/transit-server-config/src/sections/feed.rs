// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Static feed snapshot configuration.

use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Default)]
pub struct FeedConfig {
	/// JSON snapshot loaded into the store at startup.
	pub snapshot_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedConfigLayer {
	#[serde(default)]
	pub snapshot_path: Option<PathBuf>,
}

impl FeedConfigLayer {
	pub fn merge(&mut self, other: FeedConfigLayer) {
		if other.snapshot_path.is_some() {
			self.snapshot_path = other.snapshot_path;
		}
	}

	pub fn finalize(self) -> FeedConfig {
		FeedConfig {
			snapshot_path: self.snapshot_path,
		}
	}
}
