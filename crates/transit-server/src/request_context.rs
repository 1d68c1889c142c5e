// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Per-request deadline carried in request extensions.

use std::convert::Infallible;
use std::time::{Duration, Instant};

use axum::{
	body::Body,
	extract::{FromRequestParts, State},
	http::{request::Parts, Request},
	middleware::Next,
	response::Response,
};

#[derive(Debug, Clone, Copy, Default)]
pub struct RequestContext {
	deadline: Option<Instant>,
}

impl RequestContext {
	pub fn with_deadline(deadline: Instant) -> Self {
		Self {
			deadline: Some(deadline),
		}
	}

	/// A context whose deadline is `timeout` from now. A zero timeout, or one
	/// too large to represent as an instant, means no deadline.
	pub fn with_timeout(timeout: Duration) -> Self {
		if timeout.is_zero() {
			return Self::default();
		}
		Self {
			deadline: Instant::now().checked_add(timeout),
		}
	}

	#[cfg(test)]
	fn deadline(&self) -> Option<Instant> {
		self.deadline
	}

	pub fn is_expired(&self) -> bool {
		self.deadline.is_some_and(|d| Instant::now() >= d)
	}
}

/// Requests that did not pass through [`request_context_layer`] get a
/// context without a deadline.
impl<S: Send + Sync> FromRequestParts<S> for RequestContext {
	type Rejection = Infallible;

	async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
		Ok(parts
			.extensions
			.get::<RequestContext>()
			.copied()
			.unwrap_or_default())
	}
}

/// Attach a [`RequestContext`] whose deadline is the configured timeout.
pub async fn request_context_layer(
	State(timeout): State<Duration>,
	mut request: Request<Body>,
	next: Next,
) -> Response {
	request
		.extensions_mut()
		.insert(RequestContext::with_timeout(timeout));
	next.run(request).await
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_default_never_expires() {
		let ctx = RequestContext::default();
		assert!(ctx.deadline().is_none());
		assert!(!ctx.is_expired());
	}

	#[test]
	fn test_zero_timeout_has_no_deadline() {
		assert!(RequestContext::with_timeout(Duration::ZERO).deadline().is_none());
	}

	#[test]
	fn test_unrepresentable_timeout_has_no_deadline() {
		let ctx = RequestContext::with_timeout(Duration::from_secs(u64::MAX));
		assert!(ctx.deadline().is_none());
		assert!(!ctx.is_expired());
	}

	#[test]
	fn test_past_deadline_is_expired() {
		let ctx = RequestContext::with_deadline(Instant::now() - Duration::from_millis(1));
		assert!(ctx.is_expired());
	}

	#[test]
	fn test_future_deadline_is_live() {
		let ctx = RequestContext::with_timeout(Duration::from_secs(60));
		assert!(!ctx.is_expired());
	}
}
