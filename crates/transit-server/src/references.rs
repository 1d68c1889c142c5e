// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Reference assembly for route search results.

use std::collections::BTreeSet;

use transit_server_db::{AgencyStore, DbError};

use crate::models::{AgencyReference, References, RouteRecord};

/// Agency ids referenced by `routes`, each once.
pub fn distinct_agency_ids(routes: &[RouteRecord]) -> BTreeSet<String> {
	routes.iter().map(|r| r.agency_id.clone()).collect()
}

/// Look up the agencies behind `routes` in a single store call.
///
/// No call is made when `routes` is empty.
#[tracing::instrument(skip_all, fields(routes = routes.len()))]
pub async fn assemble_references(
	store: &dyn AgencyStore,
	routes: &[RouteRecord],
) -> Result<References, DbError> {
	let ids = distinct_agency_ids(routes);
	if ids.is_empty() {
		return Ok(References::default());
	}

	let agencies: Vec<AgencyReference> = store
		.get_agencies_by_ids(&ids)
		.await?
		.into_iter()
		.map(AgencyReference::from)
		.collect();

	if agencies.len() < ids.len() {
		tracing::warn!(
			requested = ids.len(),
			found = agencies.len(),
			"route references agencies missing from the store"
		);
	}

	Ok(References {
		agencies,
		..References::default()
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::models::RouteType;
	use async_trait::async_trait;
	use std::sync::Mutex;
	use transit_server_db::testing::sample_agency;
	use transit_server_db::AgencyRow;

	struct RecordingAgencies {
		rows: Vec<AgencyRow>,
		calls: Mutex<Vec<BTreeSet<String>>>,
	}

	#[async_trait]
	impl AgencyStore for RecordingAgencies {
		async fn get_agencies_by_ids(
			&self,
			ids: &BTreeSet<String>,
		) -> Result<Vec<AgencyRow>, DbError> {
			self.calls.lock().unwrap().push(ids.clone());
			Ok(self
				.rows
				.iter()
				.filter(|a| ids.contains(&a.id))
				.cloned()
				.collect())
		}
	}

	fn store() -> RecordingAgencies {
		RecordingAgencies {
			rows: vec![
				sample_agency("1", "Metro Transit"),
				sample_agency("40", "Sound Transit"),
				sample_agency("97", "Everett Transit"),
			],
			calls: Mutex::new(Vec::new()),
		}
	}

	fn route(agency_id: &str, id: &str) -> RouteRecord {
		RouteRecord {
			id: format!("{agency_id}_{id}"),
			agency_id: agency_id.to_string(),
			short_name: id.to_string(),
			long_name: String::new(),
			description: String::new(),
			route_type: RouteType::Bus,
			url: String::new(),
			color: String::new(),
			text_color: String::new(),
			null_safe_short_name: id.to_string(),
		}
	}

	#[tokio::test]
	async fn test_each_agency_once() {
		let store = store();
		let routes = vec![route("1", "10"), route("40", "1LINE"), route("1", "11")];

		let references = assemble_references(&store, &routes).await.unwrap();
		let ids: Vec<_> = references.agencies.iter().map(|a| a.id.as_str()).collect();
		assert_eq!(ids, vec!["1", "40"]);

		let calls = store.calls.lock().unwrap();
		assert_eq!(calls.len(), 1);
		assert_eq!(calls[0].len(), 2);
	}

	#[tokio::test]
	async fn test_empty_routes_skip_lookup() {
		let store = store();
		let references = assemble_references(&store, &[]).await.unwrap();
		assert!(references.agencies.is_empty());
		assert!(references.stops.is_empty());
		assert!(store.calls.lock().unwrap().is_empty());
	}

	#[tokio::test]
	async fn test_other_collections_stay_empty() {
		let store = store();
		let references = assemble_references(&store, &[route("97", "7")]).await.unwrap();
		assert_eq!(references.agencies.len(), 1);
		assert!(references.routes.is_empty());
		assert!(references.situations.is_empty());
		assert!(references.stop_times.is_empty());
		assert!(references.trips.is_empty());
	}

	#[test]
	fn test_distinct_agency_ids() {
		let ids = distinct_agency_ids(&[route("b", "1"), route("a", "2"), route("b", "3")]);
		assert_eq!(ids.into_iter().collect::<Vec<_>>(), vec!["a", "b"]);
	}
}
