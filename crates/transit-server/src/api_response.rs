// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Response envelope shared by the `/api/where` endpoints.
//!
//! Successful and failed calls share one shape:
//! `{code, currentTime, text, version[, data]}`. Validation failures are the
//! exception and carry only `{fieldErrors}`.

use std::collections::BTreeMap;

use axum::{
	http::StatusCode,
	response::{IntoResponse, Response},
	Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::validation::FieldError;

/// Envelope schema version emitted on every response.
pub const RESPONSE_VERSION: u32 = 2;

pub const TEXT_OK: &str = "OK";
pub const TEXT_PERMISSION_DENIED: &str = "permission denied";
pub const TEXT_RATE_LIMITED: &str = "rate limit exceeded";
pub const TEXT_INTERNAL_ERROR: &str = "internal server error";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope<T> {
	pub code: u16,
	pub current_time: i64,
	pub text: String,
	pub version: u32,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub data: Option<T>,
}

/// Envelope without a payload, as sent for 401, 429 and 500.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusEnvelope {
	pub code: u16,
	/// Milliseconds since the Unix epoch.
	pub current_time: i64,
	pub text: String,
	pub version: u32,
}

/// Milliseconds since the Unix epoch.
pub fn current_time_millis() -> i64 {
	chrono::Utc::now().timestamp_millis()
}

pub fn ok_response<T: Serialize>(data: T) -> Response {
	let envelope = ResponseEnvelope {
		code: StatusCode::OK.as_u16(),
		current_time: current_time_millis(),
		text: TEXT_OK.to_string(),
		version: RESPONSE_VERSION,
		data: Some(data),
	};
	(StatusCode::OK, Json(envelope)).into_response()
}

pub fn status_response(status: StatusCode, text: &str) -> Response {
	let envelope = StatusEnvelope {
		code: status.as_u16(),
		current_time: current_time_millis(),
		text: text.to_string(),
		version: RESPONSE_VERSION,
	};
	(status, Json(envelope)).into_response()
}

/// Field-keyed validation messages, serialized as `{"fieldErrors": {...}}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FieldErrors {
	pub field_errors: BTreeMap<String, Vec<String>>,
}

impl FieldErrors {
	pub fn push(&mut self, error: FieldError) {
		self.field_errors
			.entry(error.field.to_string())
			.or_default()
			.push(error.message);
	}
}

impl From<FieldError> for FieldErrors {
	fn from(error: FieldError) -> Self {
		let mut errors = FieldErrors::default();
		errors.push(error);
		errors
	}
}

impl std::fmt::Display for FieldErrors {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let mut first = true;
		for (field, messages) in &self.field_errors {
			for message in messages {
				if !first {
					f.write_str("; ")?;
				}
				write!(f, "{field}: {message}")?;
				first = false;
			}
		}
		Ok(())
	}
}

pub fn validation_error_response(errors: &FieldErrors) -> Response {
	(StatusCode::BAD_REQUEST, Json(errors)).into_response()
}

#[cfg(test)]
mod tests {
	use super::*;
	use axum::body::to_bytes;
	use serde_json::{json, Value};

	async fn body_json(response: Response) -> Value {
		let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
		serde_json::from_slice(&bytes).unwrap()
	}

	#[tokio::test]
	async fn test_ok_response_shape() {
		let response = ok_response(json!({"list": []}));
		assert_eq!(response.status(), StatusCode::OK);

		let body = body_json(response).await;
		assert_eq!(body["code"], 200);
		assert_eq!(body["text"], "OK");
		assert_eq!(body["version"], 2);
		assert!(body["currentTime"].as_i64().unwrap() > 0);
		assert_eq!(body["data"], json!({"list": []}));
	}

	#[tokio::test]
	async fn test_status_response_has_no_data() {
		let response = status_response(StatusCode::UNAUTHORIZED, TEXT_PERMISSION_DENIED);
		assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

		let body = body_json(response).await;
		assert_eq!(body["code"], 401);
		assert_eq!(body["text"], "permission denied");
		assert!(body.get("data").is_none());
	}

	#[tokio::test]
	async fn test_validation_error_shape() {
		let mut errors = FieldErrors::default();
		errors.push(FieldError::new("input", "input parameter is required"));
		errors.push(FieldError::new("maxCount", "maxCount must not exceed 20"));

		let response = validation_error_response(&errors);
		assert_eq!(response.status(), StatusCode::BAD_REQUEST);
		assert_eq!(
			body_json(response).await,
			json!({
				"fieldErrors": {
					"input": ["input parameter is required"],
					"maxCount": ["maxCount must not exceed 20"]
				}
			})
		);
	}

	#[test]
	fn test_field_errors_display() {
		let errors = FieldErrors::from(FieldError::new("input", "required"));
		assert_eq!(errors.to_string(), "input: required");
		assert_eq!(errors.field_errors.len(), 1);
	}
}
