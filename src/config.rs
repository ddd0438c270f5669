//! Application settings.

/// Backend used when `GRAPH_API_URL` is not set at build time.
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5000";

/// Settings shared by the pages.
#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
	/// Base URL of the shortest-path service, without a trailing slash.
	pub api_base_url: String,
	/// Graph canvas width in pixels.
	pub canvas_width: f64,
	/// Graph canvas height in pixels.
	pub canvas_height: f64,
}

impl AppConfig {
	/// Defaults, with the API URL taken from `GRAPH_API_URL` when it was set at compile time.
	pub fn from_env() -> Self {
		match option_env!("GRAPH_API_URL") {
			Some(url) => Self::with_api_url(url),
			None => Self::default(),
		}
	}

	/// Defaults pointed at `url`.
	pub fn with_api_url(url: &str) -> Self {
		Self {
			api_base_url: url.trim_end_matches('/').to_string(),
			..Self::default()
		}
	}
}

impl Default for AppConfig {
	fn default() -> Self {
		Self {
			api_base_url: DEFAULT_API_URL.to_string(),
			canvas_width: 600.0,
			canvas_height: 400.0,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn strips_trailing_slash() {
		let config = AppConfig::with_api_url("https://paths.example.com/");
		assert_eq!(config.api_base_url, "https://paths.example.com");
		assert_eq!(config.canvas_width, 600.0);
	}
}
