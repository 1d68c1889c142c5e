// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Router assembly and application state.

use std::sync::Arc;
use std::time::Duration;

use axum::{middleware::from_fn_with_state, routing::get, Router};
use sqlx::SqlitePool;
use transit_server_config::{AuthConfig, ServerConfig};
use transit_server_db::{AgencyRepository, AgencyStore, RouteRepository, RouteStore};

use crate::{
	api_docs,
	auth_middleware::require_api_key,
	rate_limit::{rate_limit_layer, RateLimitGate, RateLimiter},
	request_context::request_context_layer,
	routes::{self, search::SEARCH_ROUTE_PATH},
};

/// Granularity of the rate limit budget.
pub const RATE_LIMIT_WINDOW: Duration = Duration::from_secs(1);

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
	pub pool: SqlitePool,
	pub route_store: Arc<dyn RouteStore>,
	pub agency_store: Arc<dyn AgencyStore>,
	pub auth: Arc<AuthConfig>,
}

impl AppState {
	/// State backed by SQLite repositories on `pool`.
	pub fn new(pool: SqlitePool, auth: AuthConfig) -> Self {
		let route_store = Arc::new(RouteRepository::new(pool.clone()));
		let agency_store = Arc::new(AgencyRepository::new(pool.clone()));
		Self::with_stores(pool, route_store, agency_store, auth)
	}

	pub fn with_stores(
		pool: SqlitePool,
		route_store: Arc<dyn RouteStore>,
		agency_store: Arc<dyn AgencyStore>,
		auth: AuthConfig,
	) -> Self {
		Self {
			pool,
			route_store,
			agency_store,
			auth: Arc::new(auth),
		}
	}
}

/// The HTTP surface plus the background resources it owns.
pub struct RestApi {
	state: AppState,
	rate_limiter: Arc<RateLimiter>,
	request_timeout: Duration,
}

impl RestApi {
	pub fn new(state: AppState, config: &ServerConfig) -> Self {
		Self {
			state,
			rate_limiter: Arc::new(RateLimiter::new(&config.rate_limit, RATE_LIMIT_WINDOW)),
			request_timeout: Duration::from_secs(config.http.request_timeout_secs),
		}
	}

	pub fn rate_limiter(&self) -> &Arc<RateLimiter> {
		&self.rate_limiter
	}

	/// Build the router.
	///
	/// Search requests pass, outermost first, through the request context,
	/// the rate limiter and the API key gate. Health and OpenAPI routes skip
	/// the last two.
	pub fn router(&self) -> Router {
		let search = Router::new()
			.route(SEARCH_ROUTE_PATH, get(routes::search::search_route_handler))
			.route_layer(from_fn_with_state(self.state.clone(), require_api_key))
			.route_layer(from_fn_with_state(
				RateLimitGate {
					limiter: Arc::clone(&self.rate_limiter),
					auth: Arc::clone(&self.state.auth),
				},
				rate_limit_layer,
			));

		Router::new()
			.merge(search)
			.route("/healthz", get(routes::health::health_check))
			.route("/api-docs/openapi.json", get(api_docs::openapi_json))
			.layer(from_fn_with_state(
				self.request_timeout,
				request_context_layer,
			))
			.with_state(self.state.clone())
	}

	/// Stop background work. Call once the server has stopped accepting
	/// requests.
	pub async fn shutdown(&self) {
		self.rate_limiter.stop().await;
		tracing::info!("REST API shut down");
	}
}
