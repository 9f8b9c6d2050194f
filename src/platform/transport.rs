//! Network transport used by [`use_fetch`](crate::hooks::use_fetch).
//!
//! The hook only depends on [`Transport`]; a `reqwest`-backed implementation
//! is available behind the `http` feature and [`MockTransport`] serves tests
//! and offline rendering.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;

use async_trait::async_trait;
use futures::channel::oneshot;
use serde::de::DeserializeOwned;

use crate::error::{RequestError, TransportError};

/// HTTP method of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Method {
	/// `GET`
	#[default]
	Get,
	/// `POST`
	Post,
	/// `PUT`
	Put,
	/// `PATCH`
	Patch,
	/// `DELETE`
	Delete,
	/// `HEAD`
	Head,
}

impl Method {
	/// Upper-case method name.
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Get => "GET",
			Self::Post => "POST",
			Self::Put => "PUT",
			Self::Patch => "PATCH",
			Self::Delete => "DELETE",
			Self::Head => "HEAD",
		}
	}
}

impl fmt::Display for Method {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Per-request options (`RequestInit` in the Fetch API).
///
/// Equality is structural, so two separately built but identical option sets
/// do not trigger a refetch.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RequestOptions {
	/// HTTP method
	pub method: Method,
	/// Header name/value pairs, sent in order
	pub headers: Vec<(String, String)>,
	/// Optional request body
	pub body: Option<String>,
}

impl RequestOptions {
	/// `GET` with no headers and no body.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the method.
	pub fn method(mut self, method: Method) -> Self {
		self.method = method;
		self
	}

	/// Appends a header.
	pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.headers.push((name.into(), value.into()));
		self
	}

	/// Sets the body.
	pub fn body(mut self, body: impl Into<String>) -> Self {
		self.body = Some(body.into());
		self
	}
}

/// A completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
	/// `true` for 2xx statuses
	pub ok: bool,
	/// Numeric status code
	pub status: u16,
	/// Reason phrase (`"Not Found"`)
	pub status_text: String,
	/// Raw body
	pub body: Vec<u8>,
}

impl Response {
	/// Builds a response; `ok` is derived from `status`.
	pub fn new(status: u16, status_text: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
		Self {
			ok: (200..300).contains(&status),
			status,
			status_text: status_text.into(),
			body: body.into(),
		}
	}

	/// `200 OK` with a JSON body.
	pub fn json_ok(value: &serde_json::Value) -> Self {
		Self::new(200, "OK", value.to_string())
	}

	/// Decodes the body as JSON.
	pub fn json<T: DeserializeOwned>(&self) -> Result<T, RequestError> {
		Ok(serde_json::from_slice(&self.body)?)
	}

	/// Fails with [`RequestError::Status`] unless the status is successful.
	pub fn error_for_status(self) -> Result<Self, RequestError> {
		if self.ok {
			Ok(self)
		} else {
			Err(RequestError::Status {
				status: self.status,
				status_text: self.status_text,
			})
		}
	}
}

/// Asynchronous request issuer (`fetch`).
///
/// The futures are `!Send`: the hook runtime is single-threaded and runs them
/// through a [`Spawner`](super::Spawner).
#[async_trait(?Send)]
pub trait Transport {
	/// Issues a request. Non-2xx responses are returned as `Ok`.
	async fn request(&self, url: &str, options: &RequestOptions) -> Result<Response, TransportError>;
}

enum MockRoute {
	Ready(Result<Response, TransportError>),
	Deferred(Option<oneshot::Receiver<Result<Response, TransportError>>>),
}

/// Scripted [`Transport`].
///
/// Routes are keyed by URL. A ready route answers every request with the same
/// result; a deferred route answers exactly one request once its sender is
/// used, which lets tests hold a request in flight.
#[derive(Default)]
pub struct MockTransport {
	routes: RefCell<HashMap<String, MockRoute>>,
	requests: RefCell<Vec<(String, RequestOptions)>>,
}

impl MockTransport {
	/// Creates a transport with no routes.
	pub fn new() -> Self {
		Self::default()
	}

	/// Answers requests for `url` with `result`.
	pub fn respond(&self, url: impl Into<String>, result: Result<Response, TransportError>) {
		self.routes
			.borrow_mut()
			.insert(url.into(), MockRoute::Ready(result));
	}

	/// Answers requests for `url` with `200 OK` and `value` as JSON.
	pub fn respond_json(&self, url: impl Into<String>, value: serde_json::Value) {
		self.respond(url, Ok(Response::json_ok(&value)));
	}

	/// Holds the next request for `url` until the returned sender is used.
	///
	/// Dropping the sender fails the request with an unknown transport error.
	pub fn defer(&self, url: impl Into<String>) -> oneshot::Sender<Result<Response, TransportError>> {
		let (sender, receiver) = oneshot::channel();
		self.routes
			.borrow_mut()
			.insert(url.into(), MockRoute::Deferred(Some(receiver)));
		sender
	}

	/// Every request issued so far, in order.
	pub fn requests(&self) -> Vec<(String, RequestOptions)> {
		self.requests.borrow().clone()
	}

	/// Number of requests issued so far.
	pub fn request_count(&self) -> usize {
		self.requests.borrow().len()
	}
}

#[async_trait(?Send)]
impl Transport for MockTransport {
	async fn request(&self, url: &str, options: &RequestOptions) -> Result<Response, TransportError> {
		self.requests
			.borrow_mut()
			.push((url.to_string(), options.clone()));

		let pending = {
			let mut routes = self.routes.borrow_mut();
			match routes.get_mut(url) {
				Some(MockRoute::Ready(result)) => return result.clone(),
				Some(MockRoute::Deferred(receiver)) => receiver.take(),
				None => {
					return Err(TransportError::new(format!(
						"no mock response registered for {url}"
					)));
				}
			}
		};

		match pending {
			Some(receiver) => receiver.await.unwrap_or_else(|_| Err(TransportError::unknown())),
			None => Err(TransportError::new(format!(
				"deferred mock response for {url} already consumed"
			))),
		}
	}
}

impl fmt::Debug for MockTransport {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("MockTransport")
			.field("routes", &self.routes.borrow().len())
			.field("requests", &self.request_count())
			.finish()
	}
}

#[cfg(feature = "http")]
pub use self::http_backend::HttpTransport;

#[cfg(feature = "http")]
mod http_backend {
	use async_trait::async_trait;

	use super::{Method, RequestOptions, Response, Transport};
	use crate::error::TransportError;

	/// [`Transport`] backed by `reqwest`.
	#[derive(Debug, Clone, Default)]
	pub struct HttpTransport {
		client: reqwest::Client,
	}

	impl HttpTransport {
		/// Creates a transport with a default client.
		pub fn new() -> Self {
			Self::default()
		}

		/// Wraps an existing client (custom TLS, timeouts, proxies).
		pub fn with_client(client: reqwest::Client) -> Self {
			Self { client }
		}
	}

	fn to_reqwest_method(method: Method) -> reqwest::Method {
		match method {
			Method::Get => reqwest::Method::GET,
			Method::Post => reqwest::Method::POST,
			Method::Put => reqwest::Method::PUT,
			Method::Patch => reqwest::Method::PATCH,
			Method::Delete => reqwest::Method::DELETE,
			Method::Head => reqwest::Method::HEAD,
		}
	}

	#[async_trait(?Send)]
	impl Transport for HttpTransport {
		async fn request(
			&self,
			url: &str,
			options: &RequestOptions,
		) -> Result<Response, TransportError> {
			let mut builder = self
				.client
				.request(to_reqwest_method(options.method), url);
			for (name, value) in &options.headers {
				builder = builder.header(name.as_str(), value.as_str());
			}
			if let Some(body) = &options.body {
				builder = builder.body(body.clone());
			}

			let response = builder
				.send()
				.await
				.map_err(|e| TransportError::new(e.to_string()))?;
			let status = response.status();
			let status_text = status.canonical_reason().unwrap_or_default().to_string();
			let body = response
				.bytes()
				.await
				.map_err(|e| TransportError::new(e.to_string()))?;

			Ok(Response::new(status.as_u16(), status_text, body.to_vec()))
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use futures::executor::block_on;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	#[case(200, true)]
	#[case(204, true)]
	#[case(301, false)]
	#[case(404, false)]
	#[case(500, false)]
	fn test_response_ok_from_status(#[case] status: u16, #[case] ok: bool) {
		assert_eq!(Response::new(status, "", Vec::new()).ok, ok);
	}

	#[rstest]
	fn test_response_json() {
		let response = Response::json_ok(&json!({ "message": "Hello, World!" }));
		let value: serde_json::Value = response.json().unwrap();
		assert_eq!(value, json!({ "message": "Hello, World!" }));
	}

	#[rstest]
	fn test_error_for_status() {
		let error = Response::new(404, "Not Found", Vec::new())
			.error_for_status()
			.unwrap_err();
		assert_eq!(error.to_string(), "Error: Not Found");
	}

	#[rstest]
	fn test_request_options_equality() {
		let a = RequestOptions::new()
			.method(Method::Post)
			.header("Content-Type", "application/json")
			.body("{}");
		let b = RequestOptions::new()
			.method(Method::Post)
			.header("Content-Type", "application/json")
			.body("{}");
		assert_eq!(a, b);
		assert_ne!(a, RequestOptions::new());
	}

	#[rstest]
	fn test_mock_transport_ready_route() {
		let transport = MockTransport::new();
		transport.respond_json("/api/hello", json!({ "message": "hi" }));

		let response = block_on(transport.request("/api/hello", &RequestOptions::new())).unwrap();
		assert!(response.ok);
		assert_eq!(transport.request_count(), 1);
	}

	#[rstest]
	fn test_mock_transport_unknown_route() {
		let transport = MockTransport::new();
		let error = block_on(transport.request("/missing", &RequestOptions::new())).unwrap_err();
		assert_eq!(error.to_string(), "no mock response registered for /missing");
	}

	#[rstest]
	fn test_mock_transport_deferred_route() {
		let transport = MockTransport::new();
		let sender = transport.defer("/slow");
		sender
			.send(Ok(Response::new(503, "Service Unavailable", Vec::new())))
			.unwrap();

		let response = block_on(transport.request("/slow", &RequestOptions::new())).unwrap();
		assert_eq!(response.status, 503);

		let error = block_on(transport.request("/slow", &RequestOptions::new())).unwrap_err();
		assert!(error.to_string().contains("already consumed"));
	}

	#[rstest]
	fn test_mock_transport_dropped_sender() {
		let transport = MockTransport::new();
		drop(transport.defer("/dropped"));

		let error = block_on(transport.request("/dropped", &RequestOptions::new())).unwrap_err();
		assert_eq!(error, TransportError::unknown());
	}
}
