// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Static feed import for the transit search server.

pub mod snapshot;

pub use snapshot::{
	apply_feed_snapshot, import_feed_snapshot, load_feed_snapshot, read_feed_snapshot,
	FeedSnapshot, SnapshotAgency, SnapshotRoute,
};
