// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Transit route search server.
//!
//! This crate serves `GET /api/where/search/route.json`: free rider text is
//! turned into a safe FTS5 expression, matched against the static route
//! index, trimmed to the requested size and returned with the agencies it
//! references.

pub mod api;
pub mod api_docs;
pub mod api_response;
pub mod auth_middleware;
pub mod error;
pub mod models;
pub mod query;
pub mod rate_limit;
pub mod references;
pub mod request_context;
pub mod routes;
pub mod search;
pub mod search_expression;
pub mod validation;
pub mod version;

pub use api::{AppState, RestApi, RATE_LIMIT_WINDOW};
pub use api_docs::ApiDoc;
pub use error::ServerError;
pub use rate_limit::{RateLimitDecision, RateLimiter};
pub use request_context::RequestContext;
pub use search_expression::{build_search_expression, sanitize_query_text, SearchExpression};
pub use transit_server_config::ServerConfig;
pub use validation::{parse_max_count, FieldError, ResultLimit, MAX_RESULTS};
