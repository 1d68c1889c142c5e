// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! OpenAPI documentation for transit-server.

use axum::Json;
use utoipa::OpenApi;

use crate::api_response::{FieldErrors, StatusEnvelope};
use crate::models::{AgencyReference, References, RouteRecord, SearchRouteData};
use crate::routes::health::{HealthResponse, HealthStatus};

/// Served as JSON at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Transit Server API",
        version = "1.0.0",
        description = "Transit data query service. Route search over the static GTFS feed.",
        license(name = "Proprietary")
    ),
    servers(
        (url = "/", description = "Local server")
    ),
    tags(
        (name = "search", description = "Free-text search over static transit data"),
        (name = "health", description = "Health checks")
    ),
    paths(
        crate::routes::search::search_route_handler,
        crate::routes::health::health_check,
    ),
    components(schemas(
        SearchRouteData,
        RouteRecord,
        AgencyReference,
        References,
        FieldErrors,
        StatusEnvelope,
        HealthResponse,
        HealthStatus,
    ))
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
	Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_document_lists_search_path() {
		let doc = serde_json::to_value(ApiDoc::openapi()).unwrap();
		assert!(doc["paths"]["/api/where/search/route.json"]["get"].is_object());
		assert!(doc["paths"]["/healthz"]["get"].is_object());
		assert!(doc["components"]["schemas"]["RouteRecord"].is_object());
	}
}
