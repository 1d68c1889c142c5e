// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Route search endpoint.

use axum::{extract::State, http::Uri, response::Response};

use crate::api::AppState;
use crate::api_response::ok_response;
use crate::error::ServerError;
use crate::models::{RouteRecord, SearchRouteData};
use crate::query::QueryParams;
use crate::references::assemble_references;
use crate::request_context::RequestContext;
use crate::search::search_routes;
use crate::search_expression::build_search_expression;
use crate::validation::parse_max_count;

pub const SEARCH_ROUTE_PATH: &str = "/api/where/search/route.json";

#[utoipa::path(
    get,
    path = "/api/where/search/route.json",
    params(
        ("input" = String, Query, description = "Free text matched against route short name, long name and description"),
        ("maxCount" = Option<u32>, Query, description = "Maximum routes to return (1-20, default: 20)"),
        ("key" = String, Query, description = "API key")
    ),
    responses(
        (status = 200, description = "Matching routes, wrapped in the response envelope as `data`", body = SearchRouteData),
        (status = 400, description = "Invalid parameters", body = crate::api_response::FieldErrors),
        (status = 401, description = "Missing or unknown API key", body = crate::api_response::StatusEnvelope),
        (status = 429, description = "Rate limit exceeded", body = crate::api_response::StatusEnvelope),
        (status = 500, description = "Search failed", body = crate::api_response::StatusEnvelope)
    ),
    tag = "search"
)]
/// GET /api/where/search/route.json - Search routes by name
#[tracing::instrument(
	skip_all,
	fields(expression = tracing::field::Empty, limit = tracing::field::Empty)
)]
pub async fn search_route_handler(
	State(state): State<AppState>,
	ctx: RequestContext,
	uri: Uri,
) -> Result<Response, ServerError> {
	let params = QueryParams::from_uri(&uri);

	let expression = build_search_expression(params.first("input").unwrap_or_default())?;
	let limit = parse_max_count(params.first("maxCount"))?;

	let span = tracing::Span::current();
	span.record("expression", expression.as_str());
	span.record("limit", limit.get());

	if ctx.is_expired() {
		return Err(ServerError::Canceled);
	}

	let outcome = search_routes(state.route_store.as_ref(), &expression, limit).await?;

	let list: Vec<RouteRecord> = outcome.rows.iter().map(RouteRecord::from).collect();
	let references = assemble_references(state.agency_store.as_ref(), &list).await?;

	Ok(ok_response(SearchRouteData {
		limit_exceeded: outcome.limit_exceeded,
		list,
		references,
	}))
}
