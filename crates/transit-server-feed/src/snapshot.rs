// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Load a JSON feed snapshot into the agency and route tables.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use tracing::{info, warn};
use transit_server_db::{AgencyRow, FeedCounts, RouteRow, StaticFeedRepository};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotAgency {
	pub id: String,
	pub name: String,
	pub url: String,
	pub timezone: String,
	#[serde(default)]
	pub lang: Option<String>,
	#[serde(default)]
	pub phone: Option<String>,
	#[serde(default)]
	pub fare_url: Option<String>,
	#[serde(default)]
	pub email: Option<String>,
	#[serde(default)]
	pub disclaimer: Option<String>,
	#[serde(default)]
	pub private_service: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotRoute {
	pub id: String,
	pub agency_id: String,
	#[serde(default)]
	pub short_name: Option<String>,
	#[serde(default)]
	pub long_name: Option<String>,
	#[serde(default, alias = "desc")]
	pub description: Option<String>,
	#[serde(rename = "type")]
	pub route_type: i64,
	#[serde(default)]
	pub url: Option<String>,
	#[serde(default)]
	pub color: Option<String>,
	#[serde(default)]
	pub text_color: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedSnapshot {
	#[serde(default)]
	pub generated_at: String,
	pub agencies: Vec<SnapshotAgency>,
	pub routes: Vec<SnapshotRoute>,
}

impl From<&SnapshotAgency> for AgencyRow {
	fn from(agency: &SnapshotAgency) -> Self {
		AgencyRow {
			id: agency.id.clone(),
			name: agency.name.clone(),
			url: agency.url.clone(),
			timezone: agency.timezone.clone(),
			lang: agency.lang.clone(),
			phone: agency.phone.clone(),
			fare_url: agency.fare_url.clone(),
			email: agency.email.clone(),
			disclaimer: agency.disclaimer.clone(),
			private_service: agency.private_service,
		}
	}
}

impl From<&SnapshotRoute> for RouteRow {
	fn from(route: &SnapshotRoute) -> Self {
		RouteRow {
			id: route.id.clone(),
			agency_id: route.agency_id.clone(),
			short_name: route.short_name.clone(),
			long_name: route.long_name.clone(),
			description: route.description.clone(),
			route_type: route.route_type,
			url: route.url.clone(),
			color: route.color.clone(),
			text_color: route.text_color.clone(),
		}
	}
}

impl FeedSnapshot {
	/// Reject routes that point at an agency the snapshot does not define.
	fn check_references(&self) -> Result<()> {
		let known: HashSet<&str> = self.agencies.iter().map(|a| a.id.as_str()).collect();
		for route in &self.routes {
			if !known.contains(route.agency_id.as_str()) {
				bail!(
					"route {} references unknown agency {}",
					route.id,
					route.agency_id
				);
			}
		}
		Ok(())
	}
}

/// Read and parse a snapshot file. A missing file is an error here.
pub async fn read_feed_snapshot(path: impl AsRef<Path>) -> Result<FeedSnapshot> {
	let path = path.as_ref();
	let bytes = tokio::fs::read(path)
		.await
		.with_context(|| format!("Failed to read feed snapshot at {}", path.display()))?;

	let snapshot: FeedSnapshot =
		serde_json::from_slice(&bytes).context("Failed to parse feed snapshot JSON")?;
	snapshot.check_references()?;
	Ok(snapshot)
}

/// Replace the stored feed with the snapshot contents in one transaction.
pub async fn apply_feed_snapshot(
	repo: &StaticFeedRepository,
	snapshot: &FeedSnapshot,
) -> Result<FeedCounts> {
	let agencies: Vec<AgencyRow> = snapshot.agencies.iter().map(AgencyRow::from).collect();
	let routes: Vec<RouteRow> = snapshot.routes.iter().map(RouteRow::from).collect();

	let counts = repo
		.replace(&agencies, &routes)
		.await
		.context("Failed to store feed snapshot")?;
	Ok(counts)
}

/// Read a snapshot and apply it. Used by the `import` command.
pub async fn import_feed_snapshot(
	repo: &StaticFeedRepository,
	path: impl AsRef<Path>,
) -> Result<FeedCounts> {
	let snapshot = read_feed_snapshot(path).await?;
	info!(
		"Importing feed snapshot: {} agencies, {} routes, generated at {}",
		snapshot.agencies.len(),
		snapshot.routes.len(),
		snapshot.generated_at
	);
	apply_feed_snapshot(repo, &snapshot).await
}

/// Startup variant of [`import_feed_snapshot`].
///
/// An unreadable file leaves the current tables untouched and loads nothing;
/// a malformed one is still an error.
pub async fn load_feed_snapshot(
	repo: &StaticFeedRepository,
	path: impl AsRef<Path>,
) -> Result<FeedCounts> {
	let path = path.as_ref();
	if let Err(e) = tokio::fs::metadata(path).await {
		warn!(
			"Could not read feed snapshot at {}: {}. Route search will use the existing data.",
			path.display(),
			e
		);
		return Ok(FeedCounts::default());
	}

	let counts = import_feed_snapshot(repo, path).await?;
	info!(
		"Loaded {} agencies and {} routes into the route index",
		counts.agencies, counts.routes
	);
	Ok(counts)
}
