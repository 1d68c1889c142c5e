// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Bounded route lookup with truncation detection.

use transit_server_db::{DbError, RouteRow, RouteStore};

use crate::search_expression::SearchExpression;
use crate::validation::ResultLimit;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteSearchOutcome {
	pub rows: Vec<RouteRow>,
	pub limit_exceeded: bool,
}

/// Keep at most `limit` rows in their original order and report whether
/// anything was cut.
pub fn truncate_to_limit<T>(mut rows: Vec<T>, limit: ResultLimit) -> (Vec<T>, bool) {
	let limit = limit.get() as usize;
	let limit_exceeded = rows.len() > limit;
	if limit_exceeded {
		rows.truncate(limit);
	}
	(rows, limit_exceeded)
}

/// Run one store query for `limit + 1` rows and trim the extra.
///
/// The extra row is only a truncation probe; no separate count query is made.
#[tracing::instrument(skip(store, expression), fields(expression = %expression, limit = limit.get()))]
pub async fn search_routes(
	store: &dyn RouteStore,
	expression: &SearchExpression,
	limit: ResultLimit,
) -> Result<RouteSearchOutcome, DbError> {
	let rows = store
		.search_routes_by_name(expression.as_str(), limit.fetch_size())
		.await?;

	let (rows, limit_exceeded) = truncate_to_limit(rows, limit);
	tracing::debug!(returned = rows.len(), limit_exceeded, "route search finished");

	Ok(RouteSearchOutcome {
		rows,
		limit_exceeded,
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::search_expression::build_search_expression;
	use crate::validation::parse_max_count;
	use async_trait::async_trait;
	use std::sync::Mutex;

	fn limit(v: u32) -> ResultLimit {
		parse_max_count(Some(&v.to_string())).unwrap()
	}

	fn row(id: usize) -> RouteRow {
		RouteRow {
			id: id.to_string(),
			agency_id: "1".to_string(),
			short_name: Some(id.to_string()),
			long_name: None,
			description: None,
			route_type: 3,
			url: None,
			color: None,
			text_color: None,
		}
	}

	/// Returns `available` rows, capped by the requested maximum, and records
	/// each call.
	struct RecordingStore {
		available: usize,
		calls: Mutex<Vec<(String, u32)>>,
	}

	impl RecordingStore {
		fn new(available: usize) -> Self {
			Self {
				available,
				calls: Mutex::new(Vec::new()),
			}
		}
	}

	#[async_trait]
	impl RouteStore for RecordingStore {
		async fn search_routes_by_name(
			&self,
			search_term: &str,
			max_rows: u32,
		) -> Result<Vec<RouteRow>, DbError> {
			self.calls
				.lock()
				.unwrap()
				.push((search_term.to_string(), max_rows));
			Ok((0..self.available.min(max_rows as usize)).map(row).collect())
		}
	}

	#[test]
	fn test_truncate_under_limit() {
		let (rows, exceeded) = truncate_to_limit(vec![1, 2, 3], limit(5));
		assert_eq!(rows, vec![1, 2, 3]);
		assert!(!exceeded);
	}

	#[test]
	fn test_truncate_exactly_at_limit() {
		let (rows, exceeded) = truncate_to_limit(vec![1, 2, 3], limit(3));
		assert_eq!(rows, vec![1, 2, 3]);
		assert!(!exceeded);
	}

	#[test]
	fn test_truncate_drops_last_row() {
		let (rows, exceeded) = truncate_to_limit(vec![1, 2, 3, 4], limit(3));
		assert_eq!(rows, vec![1, 2, 3]);
		assert!(exceeded);
	}

	#[test]
	fn test_truncate_empty() {
		let (rows, exceeded) = truncate_to_limit(Vec::<u8>::new(), limit(1));
		assert!(rows.is_empty());
		assert!(!exceeded);
	}

	#[tokio::test]
	async fn test_search_requests_one_extra_row() {
		let store = RecordingStore::new(50);
		let expr = build_search_expression("downtown").unwrap();

		let outcome = search_routes(&store, &expr, limit(7)).await.unwrap();
		assert_eq!(outcome.rows.len(), 7);
		assert!(outcome.limit_exceeded);

		let calls = store.calls.lock().unwrap();
		assert_eq!(calls.as_slice(), &[("\"downtown\"*".to_string(), 8)]);
	}

	#[tokio::test]
	async fn test_search_not_exceeded_when_store_runs_short() {
		let store = RecordingStore::new(4);
		let expr = build_search_expression("downtown").unwrap();

		let outcome = search_routes(&store, &expr, limit(4)).await.unwrap();
		assert_eq!(outcome.rows.len(), 4);
		assert!(!outcome.limit_exceeded);
	}

	mod property_tests {
		use super::*;
		use proptest::prelude::*;

		proptest! {
			#[test]
			fn prop_truncation_invariants(v in 1u32..=20, n in 0usize..=21) {
				let rows: Vec<usize> = (0..n).collect();
				let (kept, exceeded) = truncate_to_limit(rows.clone(), limit(v));
				prop_assert!(kept.len() <= v as usize);
				prop_assert_eq!(exceeded, n > v as usize);
				prop_assert_eq!(&kept[..], &rows[..kept.len()]);
			}

			#[test]
			fn prop_executor_fetches_limit_plus_one(v in 1u32..=20, available in 0usize..=30) {
				let runtime = tokio::runtime::Builder::new_current_thread()
					.build()
					.unwrap();
				let store = RecordingStore::new(available);
				let expr = build_search_expression("line").unwrap();

				let outcome = runtime
					.block_on(search_routes(&store, &expr, limit(v)))
					.unwrap();

				let calls = store.calls.lock().unwrap();
				prop_assert_eq!(calls.len(), 1);
				prop_assert_eq!(calls[0].1, v + 1);
				prop_assert!(outcome.rows.len() <= v as usize);
				prop_assert_eq!(outcome.limit_exceeded, available > v as usize);
			}
		}
	}
}
