//! Client for the shortest-path service.
//!
//! The service takes a graph file as multipart field `file` on `POST /inc` and answers
//! with every edge of the graph plus the route it found:
//!
//! ```json
//! {"edges": [{"source": 0, "target": 1, "weight": 2}], "route": [{"source": 0, "target": 1}], "route_cost": 2}
//! ```
//!
//! Failures come back as `{"error": "..."}` with a non-success status.

use log::{info, warn};
use serde::Deserialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{File, FormData, Request, RequestInit, Response};

use crate::components::force_graph::{Edge, PathEdge};
use crate::config::AppConfig;
use crate::error::{AppError, Result};

const FALLBACK_ERROR: &str = "An error occurred";

/// Successful answer of the service.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ShortestPath {
	/// Every edge of the uploaded graph.
	pub edges: Vec<Edge>,
	/// Steps of the shortest route, source first.
	pub route: Vec<PathEdge>,
	/// Total weight of `route`, when the service reports it.
	#[serde(default)]
	pub route_cost: Option<f64>,
}

#[derive(Deserialize)]
struct ErrorBody {
	error: Option<String>,
}

/// Turns a response body into a result; `ok` is the HTTP success flag.
pub fn decode_response(ok: bool, body: &str) -> Result<ShortestPath> {
	if ok {
		return Ok(serde_json::from_str(body)?);
	}
	let message = serde_json::from_str::<ErrorBody>(body)
		.ok()
		.and_then(|b| b.error)
		.unwrap_or_else(|| FALLBACK_ERROR.to_string());
	Err(AppError::Server(message))
}

fn network_error(err: JsValue) -> AppError {
	AppError::Network(err.as_string().unwrap_or_else(|| format!("{err:?}")))
}

/// Talks to the shortest-path service at one base URL.
#[derive(Clone, Debug)]
pub struct ApiClient {
	base_url: String,
}

impl ApiClient {
	/// Client for `config.api_base_url`.
	pub fn new(config: &AppConfig) -> Self {
		Self {
			base_url: config.api_base_url.clone(),
		}
	}

	/// Full URL of the upload endpoint.
	pub fn endpoint(&self) -> String {
		format!("{}/inc", self.base_url)
	}

	/// Uploads a graph file and returns the graph with its shortest route.
	pub async fn compute_shortest_path(&self, file: &File) -> Result<ShortestPath> {
		let url = self.endpoint();
		info!("Uploading {} to {}", file.name(), url);

		let form = FormData::new().map_err(network_error)?;
		form.append_with_blob_and_filename("file", file, &file.name())
			.map_err(network_error)?;

		let opts = RequestInit::new();
		opts.set_method("POST");
		opts.set_body(&JsValue::from(form));
		let request = Request::new_with_str_and_init(&url, &opts).map_err(network_error)?;

		let window =
			web_sys::window().ok_or_else(|| AppError::Network("no browser window".into()))?;
		let response: Response = JsFuture::from(window.fetch_with_request(&request))
			.await
			.map_err(network_error)?
			.dyn_into()
			.map_err(network_error)?;
		let body = JsFuture::from(response.text().map_err(network_error)?)
			.await
			.map_err(network_error)?
			.as_string()
			.unwrap_or_default();

		let result = decode_response(response.ok(), &body);
		if let Err(err) = &result {
			warn!("Shortest path request failed ({}): {}", response.status(), err);
		}
		result
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn decodes_success_body() {
		let body = r#"{
			"edges": [{"source": 0, "target": 1, "weight": 2}, {"source": 1, "target": 4, "weight": 3}],
			"route": [{"source": 0, "target": 1}, {"source": 1, "target": 4}],
			"route_cost": 5
		}"#;
		let result = decode_response(true, body).unwrap();
		assert_eq!(result.edges[1], Edge::new(1, 4, 3.0));
		assert_eq!(result.route[0], PathEdge::new(0, 1));
		assert_eq!(result.route_cost, Some(5.0));
	}

	#[test]
	fn route_cost_is_optional() {
		let result = decode_response(true, r#"{"edges": [], "route": []}"#).unwrap();
		assert!(result.edges.is_empty());
		assert_eq!(result.route_cost, None);
	}

	#[test]
	fn error_payload_becomes_server_error() {
		let err = decode_response(false, r#"{"error": "Invalid data in file"}"#).unwrap_err();
		assert!(matches!(err, AppError::Server(ref m) if m == "Invalid data in file"));
	}

	#[test]
	fn unreadable_error_body_uses_fallback() {
		let err = decode_response(false, "<html>502</html>").unwrap_err();
		assert!(matches!(err, AppError::Server(ref m) if m == FALLBACK_ERROR));
	}

	#[test]
	fn malformed_success_body_is_decode_error() {
		let err = decode_response(true, r#"{"edges": "nope"}"#).unwrap_err();
		assert!(matches!(err, AppError::Decode(_)));
	}

	#[test]
	fn endpoint_uses_base_url() {
		let client = ApiClient::new(&AppConfig::with_api_url("http://localhost:8000/"));
		assert_eq!(client.endpoint(), "http://localhost:8000/inc");
	}
}
