// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use sqlx::sqlite::SqlitePool;

use crate::agency::{insert_agency, AgencyRow};
use crate::error::DbError;
use crate::route::{insert_route, RouteRow};

/// Row counts written by a feed replacement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FeedCounts {
	pub agencies: usize,
	pub routes: usize,
}

/// Swaps the whole static feed in a single transaction.
///
/// Readers see either the previous feed or the new one, never a mix. The
/// route index is maintained by triggers, so deletes and inserts here keep
/// `routes_fts` in step.
#[derive(Clone)]
pub struct StaticFeedRepository {
	pool: SqlitePool,
}

impl StaticFeedRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	#[tracing::instrument(skip(self, agencies, routes), fields(agencies = agencies.len(), routes = routes.len()))]
	pub async fn replace(
		&self,
		agencies: &[AgencyRow],
		routes: &[RouteRow],
	) -> Result<FeedCounts, DbError> {
		let mut tx = self.pool.begin().await?;

		sqlx::query("DELETE FROM routes").execute(&mut *tx).await?;
		sqlx::query("DELETE FROM agencies").execute(&mut *tx).await?;

		for agency in agencies {
			insert_agency(&mut tx, agency).await?;
		}
		for route in routes {
			insert_route(&mut tx, route).await?;
		}

		tx.commit().await?;

		let counts = FeedCounts {
			agencies: agencies.len(),
			routes: routes.len(),
		};
		tracing::info!(
			agencies = counts.agencies,
			routes = counts.routes,
			"static feed replaced"
		);
		Ok(counts)
	}
}
