// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! API key gate for the `/api/where` endpoints.

use axum::{
	body::Body,
	extract::State,
	http::Request,
	middleware::Next,
	response::{IntoResponse, Response},
};

use crate::api::AppState;
use crate::error::ServerError;
use crate::query::QueryParams;

/// Reject requests whose `key` parameter is missing or not configured.
pub async fn require_api_key(
	State(state): State<AppState>,
	request: Request<Body>,
	next: Next,
) -> Response {
	let params = QueryParams::from_uri(request.uri());
	if !state.auth.is_valid_key(params.first("key").unwrap_or_default()) {
		tracing::debug!(path = %request.uri().path(), "missing or unknown API key");
		return ServerError::Unauthorized.into_response();
	}

	next.run(request).await
}
