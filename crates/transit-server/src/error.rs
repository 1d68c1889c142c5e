// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Server error types and HTTP response conversions.

use std::time::Duration;

use axum::{
	http::{header, HeaderValue, StatusCode},
	response::{IntoResponse, Response},
};
use transit_server_db::DbError;

use crate::api_response::{
	status_response, validation_error_response, FieldErrors, TEXT_INTERNAL_ERROR,
	TEXT_PERMISSION_DENIED, TEXT_RATE_LIMITED,
};
use crate::validation::FieldError;

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
	/// One or more request parameters were rejected.
	#[error("Validation failed: {0}")]
	Validation(FieldErrors),

	/// Missing or unknown API key.
	#[error("Unauthorized")]
	Unauthorized,

	/// Caller exhausted its request budget.
	#[error("Rate limited, retry after {retry_after:?}")]
	RateLimited { retry_after: Duration },

	/// The request deadline passed before the store was queried.
	#[error("Request canceled")]
	Canceled,

	#[error("Database error: {0}")]
	Database(#[from] DbError),
}

impl From<FieldError> for ServerError {
	fn from(error: FieldError) -> Self {
		ServerError::Validation(FieldErrors::from(error))
	}
}

/// Whole seconds for a `Retry-After` header, never below one.
pub fn retry_after_secs(retry_after: Duration) -> u64 {
	let secs = retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);
	secs.max(1)
}

impl IntoResponse for ServerError {
	fn into_response(self) -> Response {
		match self {
			ServerError::Validation(errors) => {
				tracing::debug!(errors = %errors, "request validation failed");
				validation_error_response(&errors)
			}
			ServerError::Unauthorized => {
				status_response(StatusCode::UNAUTHORIZED, TEXT_PERMISSION_DENIED)
			}
			ServerError::RateLimited { retry_after } => {
				let mut response =
					status_response(StatusCode::TOO_MANY_REQUESTS, TEXT_RATE_LIMITED);
				response.headers_mut().insert(
					header::RETRY_AFTER,
					HeaderValue::from(retry_after_secs(retry_after)),
				);
				response
			}
			ServerError::Canceled => {
				tracing::warn!("request canceled before completion");
				status_response(StatusCode::INTERNAL_SERVER_ERROR, TEXT_INTERNAL_ERROR)
			}
			ServerError::Database(e) => {
				tracing::error!(error = %e, "database error");
				status_response(StatusCode::INTERNAL_SERVER_ERROR, TEXT_INTERNAL_ERROR)
			}
		}
	}
}
