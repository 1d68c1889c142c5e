// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Liveness endpoint.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::api::AppState;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
	Ok,
	Unavailable,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
	pub status: HealthStatus,
}

#[utoipa::path(
    get,
    path = "/healthz",
    responses(
        (status = 200, description = "Store reachable", body = HealthResponse),
        (status = 503, description = "Store unreachable", body = HealthResponse)
    ),
    tag = "health"
)]
/// GET /healthz - Store ping
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
	match transit_server_db::health_check(&state.pool).await {
		Ok(()) => (
			StatusCode::OK,
			Json(HealthResponse {
				status: HealthStatus::Ok,
			}),
		),
		Err(e) => {
			tracing::error!(error = %e, "health check failed");
			(
				StatusCode::SERVICE_UNAVAILABLE,
				Json(HealthResponse {
					status: HealthStatus::Unavailable,
				}),
			)
		}
	}
}
