// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Test helpers: an in-memory store with the schema applied, plus row builders.

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::agency::AgencyRow;
use crate::error::DbError;
use crate::route::RouteRow;
use crate::schema::run_migrations;
use crate::static_feed::StaticFeedRepository;

/// In-memory pool pinned to one connection so every query sees the same database.
pub async fn create_test_pool() -> Result<SqlitePool, DbError> {
	let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
	let pool = SqlitePoolOptions::new()
		.max_connections(1)
		.connect_with(options)
		.await?;
	run_migrations(&pool).await?;
	Ok(pool)
}

/// Replace the store's contents with `agencies` and `routes`.
pub async fn seed_feed(
	pool: &SqlitePool,
	agencies: &[AgencyRow],
	routes: &[RouteRow],
) -> Result<(), DbError> {
	StaticFeedRepository::new(pool.clone())
		.replace(agencies, routes)
		.await?;
	Ok(())
}

pub fn sample_agency(id: &str, name: &str) -> AgencyRow {
	AgencyRow {
		id: id.to_string(),
		name: name.to_string(),
		url: format!("https://{}.example.com", id.to_lowercase()),
		timezone: "America/Los_Angeles".to_string(),
		lang: Some("en".to_string()),
		phone: None,
		fare_url: None,
		email: None,
		disclaimer: None,
		private_service: false,
	}
}

pub fn sample_route(agency_id: &str, id: &str, short_name: &str, long_name: &str) -> RouteRow {
	RouteRow {
		id: id.to_string(),
		agency_id: agency_id.to_string(),
		short_name: Some(short_name.to_string()),
		long_name: Some(long_name.to_string()),
		description: None,
		route_type: 3,
		url: None,
		color: None,
		text_color: None,
	}
}
