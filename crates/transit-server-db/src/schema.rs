// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Schema for the static feed tables and the route name index.

use sqlx::sqlite::SqlitePool;

use crate::error::DbError;

/// DDL applied in order by [`run_migrations`]. Every statement is idempotent.
const MIGRATIONS: &[&str] = &[
	r#"
	CREATE TABLE IF NOT EXISTS agencies (
		id TEXT PRIMARY KEY,
		name TEXT NOT NULL,
		url TEXT NOT NULL,
		timezone TEXT NOT NULL,
		lang TEXT,
		phone TEXT,
		fare_url TEXT,
		email TEXT,
		disclaimer TEXT,
		private_service INTEGER NOT NULL DEFAULT 0
	)
	"#,
	r#"
	CREATE TABLE IF NOT EXISTS routes (
		id TEXT NOT NULL,
		agency_id TEXT NOT NULL REFERENCES agencies(id) ON DELETE CASCADE,
		short_name TEXT,
		long_name TEXT,
		description TEXT,
		route_type INTEGER NOT NULL,
		url TEXT,
		color TEXT,
		text_color TEXT,
		PRIMARY KEY (agency_id, id)
	)
	"#,
	r#"
	CREATE VIRTUAL TABLE IF NOT EXISTS routes_fts USING fts5(
		short_name,
		long_name,
		description,
		content='routes',
		content_rowid='rowid',
		tokenize='unicode61 remove_diacritics 2'
	)
	"#,
	r#"
	CREATE TRIGGER IF NOT EXISTS routes_fts_insert AFTER INSERT ON routes BEGIN
		INSERT INTO routes_fts (rowid, short_name, long_name, description)
		VALUES (new.rowid, new.short_name, new.long_name, new.description);
	END
	"#,
	r#"
	CREATE TRIGGER IF NOT EXISTS routes_fts_delete AFTER DELETE ON routes BEGIN
		INSERT INTO routes_fts (routes_fts, rowid, short_name, long_name, description)
		VALUES ('delete', old.rowid, old.short_name, old.long_name, old.description);
	END
	"#,
	r#"
	CREATE TRIGGER IF NOT EXISTS routes_fts_update AFTER UPDATE ON routes BEGIN
		INSERT INTO routes_fts (routes_fts, rowid, short_name, long_name, description)
		VALUES ('delete', old.rowid, old.short_name, old.long_name, old.description);
		INSERT INTO routes_fts (rowid, short_name, long_name, description)
		VALUES (new.rowid, new.short_name, new.long_name, new.description);
	END
	"#,
];

/// Create the feed tables, the FTS5 route index and its sync triggers.
#[tracing::instrument(skip(pool))]
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), DbError> {
	let mut tx = pool.begin().await?;
	for statement in MIGRATIONS {
		sqlx::query(statement).execute(&mut *tx).await?;
	}
	tx.commit().await?;

	tracing::info!(statements = MIGRATIONS.len(), "database migrations applied");
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testing::create_test_pool;

	#[tokio::test]
	async fn test_migrations_are_idempotent() {
		let pool = create_test_pool().await.unwrap();
		run_migrations(&pool).await.unwrap();
		run_migrations(&pool).await.unwrap();
	}

	#[tokio::test]
	async fn test_fts_index_follows_route_changes() {
		let pool = create_test_pool().await.unwrap();
		sqlx::query("INSERT INTO agencies (id, name, url, timezone) VALUES ('1', 'Metro', 'https://metro.example', 'UTC')")
			.execute(&pool)
			.await
			.unwrap();
		sqlx::query("INSERT INTO routes (id, agency_id, short_name, long_name, route_type) VALUES ('10', '1', '10', 'Downtown Loop', 3)")
			.execute(&pool)
			.await
			.unwrap();

		let count = |q: &'static str| {
			let pool = pool.clone();
			async move {
				let (n,): (i64,) = sqlx::query_as(
					"SELECT COUNT(*) FROM routes_fts WHERE routes_fts MATCH ?1",
				)
				.bind(q)
				.fetch_one(&pool)
				.await
				.unwrap();
				n
			}
		};

		assert_eq!(count("\"downtown\"*").await, 1);

		sqlx::query("UPDATE routes SET long_name = 'Harbor Express' WHERE id = '10'")
			.execute(&pool)
			.await
			.unwrap();
		assert_eq!(count("\"downtown\"*").await, 0);
		assert_eq!(count("\"harbor\"*").await, 1);

		sqlx::query("DELETE FROM routes")
			.execute(&pool)
			.await
			.unwrap();
		assert_eq!(count("\"harbor\"*").await, 0);
	}
}
