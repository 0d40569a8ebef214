// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Axum/tower middleware for the Faultline SDK.
//!
//! [`CaptureLayer`] wraps each request; when the inner service panics, the
//! panic is reported with the request URL, method and (if present) the
//! authenticated [`RequestUser`], and the unwind is resumed unchanged so the
//! framework's own error handling is unaffected.
//!
//! # Example
//!
//! ```ignore
//! let app = Router::new()
//!     .route("/", get(handler))
//!     .layer(faultline_axum::CaptureLayer::global());
//! ```

use std::panic::AssertUnwindSafe;
use std::task::{Context, Poll};

use faultline::Tracker;
use futures::future::BoxFuture;
use futures::FutureExt;
use http::Request;
use serde_json::{json, Map, Value};
use tower::{Layer, Service};
use tracing::debug;

/// Authenticated user identity for the current request.
///
/// Host applications insert this as a request extension after authentication;
/// the capture layer folds it into report metadata.
#[derive(Debug, Clone)]
pub struct RequestUser {
	pub id: Option<String>,
	pub username: Option<String>,
}

/// Tower layer that reports request-scope panics to Faultline.
#[derive(Clone)]
pub struct CaptureLayer {
	tracker: Tracker,
}

impl CaptureLayer {
	/// Wraps a specific tracker handle.
	pub fn new(tracker: Tracker) -> Self {
		Self { tracker }
	}

	/// Wraps the process-wide tracker.
	pub fn global() -> Self {
		Self::new(faultline::tracker().clone())
	}
}

impl<S> Layer<S> for CaptureLayer {
	type Service = CaptureService<S>;

	fn layer(&self, inner: S) -> Self::Service {
		CaptureService {
			inner,
			tracker: self.tracker.clone(),
		}
	}
}

/// Service produced by [`CaptureLayer`].
#[derive(Clone)]
pub struct CaptureService<S> {
	inner: S,
	tracker: Tracker,
}

impl<S, B> Service<Request<B>> for CaptureService<S>
where
	S: Service<Request<B>>,
	S::Future: Send + 'static,
{
	type Response = S::Response;
	type Error = S::Error;
	type Future = BoxFuture<'static, Result<S::Response, S::Error>>;

	fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), S::Error>> {
		self.inner.poll_ready(cx)
	}

	fn call(&mut self, request: Request<B>) -> Self::Future {
		let url = request.uri().to_string();
		let method = request.method().to_string();
		let user = request.extensions().get::<RequestUser>().cloned();
		let tracker = self.tracker.clone();

		let future = self.inner.call(request);
		Box::pin(async move {
			match AssertUnwindSafe(future).catch_unwind().await {
				Ok(result) => result,
				Err(payload) => {
					debug!(%url, %method, "request handler panicked, reporting");
					tracker.capture_unwind(
						payload.as_ref(),
						Some(request_metadata(url, method, user)),
					);
					std::panic::resume_unwind(payload)
				}
			}
		})
	}
}

fn request_metadata(
	url: String,
	method: String,
	user: Option<RequestUser>,
) -> Map<String, Value> {
	let mut metadata = Map::new();
	metadata.insert("url".to_string(), json!(url));
	metadata.insert("method".to_string(), json!(method));

	if let Some(user) = user {
		if let Some(id) = user.id {
			metadata.insert("userId".to_string(), json!(id));
		}
		if let Some(username) = user.username {
			metadata.insert("userName".to_string(), json!(username));
		}
	}

	metadata
}
