// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Integration tests for the health and OpenAPI endpoints.

use axum::{
	body::{to_bytes, Body},
	http::{header, Request, StatusCode},
};
use serde_json::Value;
use tower::ServiceExt;
use transit_server::{AppState, RestApi, ServerConfig};
use transit_server_db::testing::create_test_pool;

async fn setup_api() -> RestApi {
	let config = ServerConfig::default();
	let pool = create_test_pool().await.unwrap();
	RestApi::new(AppState::new(pool, config.auth.clone()), &config)
}

async fn get(api: &RestApi, uri: &str) -> (StatusCode, Option<String>, Value) {
	let response = api
		.router()
		.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
		.await
		.unwrap();
	let status = response.status();
	let content_type = response
		.headers()
		.get(header::CONTENT_TYPE)
		.map(|v| v.to_str().unwrap().to_string());
	let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
	(status, content_type, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_health_ok_without_key() {
	let api = setup_api().await;
	let (status, content_type, body) = get(&api, "/healthz").await;

	assert_eq!(status, StatusCode::OK);
	assert!(content_type.unwrap().starts_with("application/json"));
	assert_eq!(body, serde_json::json!({"status": "ok"}));
	api.shutdown().await;
}

#[tokio::test]
async fn test_health_unavailable_when_pool_closed() {
	let config = ServerConfig::default();
	let pool = create_test_pool().await.unwrap();
	let api = RestApi::new(AppState::new(pool.clone(), config.auth.clone()), &config);
	pool.close().await;

	let (status, _, body) = get(&api, "/healthz").await;
	assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
	assert_eq!(body["status"], "unavailable");
	api.shutdown().await;
}

#[tokio::test]
async fn test_openapi_document_served() {
	let api = setup_api().await;
	let (status, _, body) = get(&api, "/api-docs/openapi.json").await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["info"]["title"], "Transit Server API");
	assert!(body["paths"]["/api/where/search/route.json"].is_object());
	api.shutdown().await;
}
