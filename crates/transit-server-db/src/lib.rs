// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Database layer for the transit search server.
//!
//! Static GTFS data (agencies and routes) lives in SQLite. Route names are
//! indexed by an external-content FTS5 table kept in sync by triggers, so the
//! search path only ever reads.
//!
//! - [`RouteRepository`] / [`RouteStore`]: full-text route lookup
//! - [`AgencyRepository`] / [`AgencyStore`]: agency lookup by id set
//! - [`StaticFeedRepository`]: transactional replacement of the static feed

pub mod agency;
pub mod error;
pub mod pool;
pub mod route;
pub mod schema;
pub mod static_feed;
pub mod testing;

pub use agency::{AgencyRepository, AgencyRow, AgencyStore};
pub use error::DbError;
pub use pool::{create_pool, health_check};
pub use route::{RouteRepository, RouteRow, RouteStore};
pub use schema::run_migrations;
pub use static_feed::{FeedCounts, StaticFeedRepository};
