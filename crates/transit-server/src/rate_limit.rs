// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Per-caller request rate limiting.
//!
//! Each caller owns a token bucket holding up to `requests_per_window` tokens
//! and refilling continuously at that many tokens per window. Buckets idle for
//! longer than the configured TTL are evicted by a background task that runs
//! until [`RateLimiter::stop`] is called.

use std::collections::{HashMap, HashSet};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use axum::{
	body::Body,
	extract::{ConnectInfo, State},
	http::Request,
	middleware::Next,
	response::{IntoResponse, Response},
};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use transit_server_config::{AuthConfig, RateLimitConfig};

use crate::error::ServerError;
use crate::query::QueryParams;

/// Bucket shared by callers with neither a valid key nor a known address.
pub const ANONYMOUS_CALLER: &str = "anonymous";

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RateLimitDecision {
	Allowed,
	Limited { retry_after: Duration },
}

#[derive(Debug, Clone)]
struct TokenBucket {
	tokens: f64,
	last_refill: Instant,
	last_seen: Instant,
}

impl TokenBucket {
	fn full(capacity: f64, now: Instant) -> Self {
		Self {
			tokens: capacity,
			last_refill: now,
			last_seen: now,
		}
	}

	fn refill(&mut self, now: Instant, capacity: f64, refill_per_sec: f64) {
		let elapsed = now.saturating_duration_since(self.last_refill);
		self.tokens = (self.tokens + elapsed.as_secs_f64() * refill_per_sec).min(capacity);
		self.last_refill = now;
	}
}

type Buckets = Arc<Mutex<HashMap<String, TokenBucket>>>;

fn lock_buckets(buckets: &Buckets) -> MutexGuard<'_, HashMap<String, TokenBucket>> {
	// A panic while holding the lock leaves bucket counts valid, so keep going.
	buckets.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn evict_idle(buckets: &Buckets, idle_ttl: Duration, now: Instant) -> usize {
	let mut buckets = lock_buckets(buckets);
	let before = buckets.len();
	buckets.retain(|_, bucket| now.saturating_duration_since(bucket.last_seen) < idle_ttl);
	before - buckets.len()
}

pub struct RateLimiter {
	buckets: Buckets,
	capacity: f64,
	refill_per_sec: f64,
	idle_ttl: Duration,
	exempt_keys: HashSet<String>,
	enabled: bool,
	shutdown_tx: broadcast::Sender<()>,
	cleanup: tokio::sync::Mutex<Option<JoinHandle<()>>>,
}

impl RateLimiter {
	/// Create a limiter allowing `config.requests_per_window` requests per
	/// `window` for each caller.
	///
	/// When limiting is enabled and a Tokio runtime is available, the idle
	/// bucket sweep starts immediately.
	pub fn new(config: &RateLimitConfig, window: Duration) -> Self {
		let (shutdown_tx, _) = broadcast::channel(1);
		let capacity = f64::from(config.requests_per_window);
		let window_secs = window.as_secs_f64().max(f64::EPSILON);

		let mut limiter = Self {
			buckets: Arc::new(Mutex::new(HashMap::new())),
			capacity,
			refill_per_sec: capacity / window_secs,
			idle_ttl: Duration::from_secs(config.idle_ttl_secs),
			exempt_keys: config.exempt_keys.iter().cloned().collect(),
			enabled: config.is_enabled(),
			shutdown_tx,
			cleanup: tokio::sync::Mutex::new(None),
		};

		if limiter.enabled {
			let interval = Duration::from_secs(config.cleanup_interval_secs.max(1));
			match tokio::runtime::Handle::try_current() {
				Ok(handle) => {
					let task = limiter.spawn_cleanup(&handle, interval);
					*limiter.cleanup.get_mut() = Some(task);
				}
				Err(_) => warn!("no Tokio runtime, idle rate limit buckets will not be evicted"),
			}
			info!(
				requests_per_window = config.requests_per_window,
				window_ms = window.as_millis() as u64,
				exempt_keys = limiter.exempt_keys.len(),
				"rate limiting enabled"
			);
		} else {
			info!("rate limiting disabled");
		}

		limiter
	}

	fn spawn_cleanup(&self, handle: &tokio::runtime::Handle, interval: Duration) -> JoinHandle<()> {
		let buckets = Arc::clone(&self.buckets);
		let idle_ttl = self.idle_ttl;
		let mut shutdown_rx = self.shutdown_tx.subscribe();

		handle.spawn(async move {
			loop {
				tokio::select! {
					_ = tokio::time::sleep(interval) => {
						let evicted = evict_idle(&buckets, idle_ttl, Instant::now());
						debug!(evicted, "rate limit bucket sweep");
					}
					_ = shutdown_rx.recv() => {
						debug!("rate limit cleanup stopping");
						break;
					}
				}
			}
		})
	}

	pub fn is_enabled(&self) -> bool {
		self.enabled
	}

	/// Spend one token from `caller`'s bucket if one is available.
	pub fn check(&self, caller: &str) -> RateLimitDecision {
		self.check_at(caller, Instant::now())
	}

	pub(crate) fn check_at(&self, caller: &str, now: Instant) -> RateLimitDecision {
		if !self.enabled || self.exempt_keys.contains(caller) {
			return RateLimitDecision::Allowed;
		}

		let mut buckets = lock_buckets(&self.buckets);
		let bucket = buckets
			.entry(caller.to_string())
			.or_insert_with(|| TokenBucket::full(self.capacity, now));

		bucket.refill(now, self.capacity, self.refill_per_sec);
		bucket.last_seen = now;

		if bucket.tokens >= 1.0 {
			bucket.tokens -= 1.0;
			RateLimitDecision::Allowed
		} else {
			let missing = 1.0 - bucket.tokens;
			RateLimitDecision::Limited {
				retry_after: Duration::from_secs_f64(missing / self.refill_per_sec),
			}
		}
	}

	/// Drop buckets idle for longer than the TTL. Returns how many went.
	pub(crate) fn evict_idle_at(&self, now: Instant) -> usize {
		evict_idle(&self.buckets, self.idle_ttl, now)
	}

	pub fn tracked_callers(&self) -> usize {
		lock_buckets(&self.buckets).len()
	}

	pub async fn is_cleanup_running(&self) -> bool {
		self.cleanup
			.lock()
			.await
			.as_ref()
			.is_some_and(|task| !task.is_finished())
	}

	/// Stop the background sweep and wait for it to exit. Safe to call more
	/// than once.
	pub async fn stop(&self) {
		let Some(task) = self.cleanup.lock().await.take() else {
			return;
		};

		let _ = self.shutdown_tx.send(());
		if let Err(e) = task.await {
			warn!(error = %e, "rate limit cleanup task failed");
		}
		info!("rate limiter stopped");
	}
}

/// Identity a request is charged against: the `key` parameter when it is an
/// accepted key, then the peer address, then the shared anonymous bucket.
///
/// Unaccepted keys never name a bucket, so rotating junk keys cannot mint
/// fresh budgets.
pub fn caller_identity(request: &Request<Body>, auth: &AuthConfig) -> String {
	let params = QueryParams::from_uri(request.uri());
	if let Some(key) = params.first("key").filter(|k| auth.is_valid_key(k)) {
		return key.to_string();
	}

	if let Some(ConnectInfo(addr)) = request.extensions().get::<ConnectInfo<SocketAddr>>() {
		return addr.ip().to_string();
	}

	ANONYMOUS_CALLER.to_string()
}

/// State for [`rate_limit_layer`].
#[derive(Clone)]
pub struct RateLimitGate {
	pub limiter: Arc<RateLimiter>,
	pub auth: Arc<AuthConfig>,
}

pub async fn rate_limit_layer(
	State(gate): State<RateLimitGate>,
	request: Request<Body>,
	next: Next,
) -> Response {
	let caller = caller_identity(&request, &gate.auth);
	match gate.limiter.check(&caller) {
		RateLimitDecision::Allowed => next.run(request).await,
		RateLimitDecision::Limited { retry_after } => {
			debug!(caller = %caller, ?retry_after, "rate limit exceeded");
			ServerError::RateLimited { retry_after }.into_response()
		}
	}
}
