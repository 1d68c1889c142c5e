// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::collections::BTreeSet;

use async_trait::async_trait;
use sqlx::{sqlite::SqlitePool, FromRow, QueryBuilder, Sqlite};

use crate::error::DbError;

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct AgencyRow {
	pub id: String,
	pub name: String,
	pub url: String,
	pub timezone: String,
	pub lang: Option<String>,
	pub phone: Option<String>,
	pub fare_url: Option<String>,
	pub email: Option<String>,
	pub disclaimer: Option<String>,
	pub private_service: bool,
}

const AGENCY_COLUMNS: &str =
	"id, name, url, timezone, lang, phone, fare_url, email, disclaimer, private_service";

#[derive(Clone)]
pub struct AgencyRepository {
	pool: SqlitePool,
}

impl AgencyRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	/// Fetch the agencies whose ids are in `ids`, ordered by id.
	///
	/// An empty set returns immediately without touching the database.
	#[tracing::instrument(skip(self, ids), fields(count = ids.len()))]
	pub async fn get_agencies_by_ids(
		&self,
		ids: &BTreeSet<String>,
	) -> Result<Vec<AgencyRow>, DbError> {
		if ids.is_empty() {
			return Ok(vec![]);
		}

		let mut builder: QueryBuilder<Sqlite> =
			QueryBuilder::new(format!("SELECT {AGENCY_COLUMNS} FROM agencies WHERE id IN ("));
		let mut separated = builder.separated(", ");
		for id in ids {
			separated.push_bind(id.clone());
		}
		separated.push_unseparated(") ORDER BY id");

		let rows = builder
			.build_query_as::<AgencyRow>()
			.fetch_all(&self.pool)
			.await?;

		tracing::debug!(found = rows.len(), "agency lookup completed");
		Ok(rows)
	}
}

pub(crate) async fn insert_agency(
	tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
	agency: &AgencyRow,
) -> Result<(), DbError> {
	sqlx::query(
		r#"
		INSERT INTO agencies (
			id, name, url, timezone, lang, phone,
			fare_url, email, disclaimer, private_service
		)
		VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
		"#,
	)
	.bind(&agency.id)
	.bind(&agency.name)
	.bind(&agency.url)
	.bind(&agency.timezone)
	.bind(&agency.lang)
	.bind(&agency.phone)
	.bind(&agency.fare_url)
	.bind(&agency.email)
	.bind(&agency.disclaimer)
	.bind(agency.private_service)
	.execute(&mut **tx)
	.await?;
	Ok(())
}

#[async_trait]
pub trait AgencyStore: Send + Sync {
	async fn get_agencies_by_ids(&self, ids: &BTreeSet<String>) -> Result<Vec<AgencyRow>, DbError>;
}

#[async_trait]
impl AgencyStore for AgencyRepository {
	async fn get_agencies_by_ids(&self, ids: &BTreeSet<String>) -> Result<Vec<AgencyRow>, DbError> {
		self.get_agencies_by_ids(ids).await
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testing::{create_test_pool, sample_agency, seed_feed};

	async fn seeded_repo() -> AgencyRepository {
		let pool = create_test_pool().await.unwrap();
		seed_feed(
			&pool,
			&[
				sample_agency("40", "Sound Transit"),
				sample_agency("1", "Metro Transit"),
				sample_agency("97", "Everett Transit"),
			],
			&[],
		)
		.await
		.unwrap();
		AgencyRepository::new(pool)
	}

	fn ids(values: &[&str]) -> BTreeSet<String> {
		values.iter().map(|s| s.to_string()).collect()
	}

	#[tokio::test]
	async fn test_get_by_ids_returns_only_requested_in_id_order() {
		let repo = seeded_repo().await;
		let rows = repo.get_agencies_by_ids(&ids(&["40", "1"])).await.unwrap();
		let found: Vec<_> = rows.iter().map(|a| a.id.as_str()).collect();
		assert_eq!(found, vec!["1", "40"]);
	}

	#[tokio::test]
	async fn test_get_by_ids_skips_unknown() {
		let repo = seeded_repo().await;
		let rows = repo
			.get_agencies_by_ids(&ids(&["97", "missing"]))
			.await
			.unwrap();
		assert_eq!(rows.len(), 1);
		assert_eq!(rows[0].name, "Everett Transit");
	}

	#[tokio::test]
	async fn test_get_by_empty_set() {
		let repo = seeded_repo().await;
		let rows = repo.get_agencies_by_ids(&BTreeSet::new()).await.unwrap();
		assert!(rows.is_empty());
	}

	#[tokio::test]
	async fn test_optional_fields_round_trip() {
		let pool = create_test_pool().await.unwrap();
		let mut agency = sample_agency("KC", "King County");
		agency.phone = Some("206-553-3000".to_string());
		agency.private_service = true;
		seed_feed(&pool, &[agency.clone()], &[]).await.unwrap();

		let rows = AgencyRepository::new(pool)
			.get_agencies_by_ids(&ids(&["KC"]))
			.await
			.unwrap();
		assert_eq!(rows, vec![agency]);
	}
}
