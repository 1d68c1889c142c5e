// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Route repository backed by the `routes_fts` FTS5 index.

use async_trait::async_trait;
use sqlx::{sqlite::SqlitePool, FromRow};

use crate::error::DbError;

/// A route as stored, before any presentation mapping.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct RouteRow {
	pub id: String,
	pub agency_id: String,
	pub short_name: Option<String>,
	pub long_name: Option<String>,
	pub description: Option<String>,
	pub route_type: i64,
	pub url: Option<String>,
	pub color: Option<String>,
	pub text_color: Option<String>,
}

#[derive(Clone)]
pub struct RouteRepository {
	pool: SqlitePool,
}

impl RouteRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	/// Run a prebuilt FTS5 match expression against route names.
	///
	/// The expression is bound as a parameter and must already be safe for
	/// the MATCH grammar. Rows come back best match first; ties are broken by
	/// agency id and then route id so repeated calls return the same order.
	#[tracing::instrument(skip(self, search_term), fields(search_term = %search_term))]
	pub async fn search_routes_by_name(
		&self,
		search_term: &str,
		max_rows: u32,
	) -> Result<Vec<RouteRow>, DbError> {
		let rows: Vec<RouteRow> = sqlx::query_as(
			r#"
			SELECT
				r.id,
				r.agency_id,
				r.short_name,
				r.long_name,
				r.description,
				r.route_type,
				r.url,
				r.color,
				r.text_color
			FROM routes_fts
			JOIN routes r ON r.rowid = routes_fts.rowid
			WHERE routes_fts MATCH ?1
			ORDER BY bm25(routes_fts), r.agency_id, r.id
			LIMIT ?2
			"#,
		)
		.bind(search_term)
		.bind(i64::from(max_rows))
		.fetch_all(&self.pool)
		.await?;

		tracing::debug!(count = rows.len(), "route search completed");
		Ok(rows)
	}
}

pub(crate) async fn insert_route(
	tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
	route: &RouteRow,
) -> Result<(), DbError> {
	sqlx::query(
		r#"
		INSERT INTO routes (
			id, agency_id, short_name, long_name, description,
			route_type, url, color, text_color
		)
		VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
		"#,
	)
	.bind(&route.id)
	.bind(&route.agency_id)
	.bind(&route.short_name)
	.bind(&route.long_name)
	.bind(&route.description)
	.bind(route.route_type)
	.bind(&route.url)
	.bind(&route.color)
	.bind(&route.text_color)
	.execute(&mut **tx)
	.await?;
	Ok(())
}

#[async_trait]
pub trait RouteStore: Send + Sync {
	async fn search_routes_by_name(
		&self,
		search_term: &str,
		max_rows: u32,
	) -> Result<Vec<RouteRow>, DbError>;
}

#[async_trait]
impl RouteStore for RouteRepository {
	async fn search_routes_by_name(
		&self,
		search_term: &str,
		max_rows: u32,
	) -> Result<Vec<RouteRow>, DbError> {
		self.search_routes_by_name(search_term, max_rows).await
	}
}
