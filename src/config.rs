//! Runtime configuration for talking to the knowledge-base backend.

/// Used when `KNOWLEDGE_API_URL` is not set at build time.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";

/// Used when `KNOWLEDGE_API_TIMEOUT_MS` is not set or does not parse.
pub const DEFAULT_TIMEOUT_MS: u32 = 10_000;

/// Backend location and request policy, provided to components via context.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiConfig {
	pub base_url: String,
	pub timeout_ms: u32,
}

impl Default for ApiConfig {
	fn default() -> Self {
		Self::from_values(
			option_env!("KNOWLEDGE_API_URL"),
			option_env!("KNOWLEDGE_API_TIMEOUT_MS"),
		)
	}
}

impl ApiConfig {
	fn from_values(base_url: Option<&str>, timeout_ms: Option<&str>) -> Self {
		let base_url = base_url
			.map(str::trim)
			.filter(|url| !url.is_empty())
			.unwrap_or(DEFAULT_API_BASE_URL)
			.trim_end_matches('/')
			.to_string();
		let timeout_ms = timeout_ms
			.and_then(|ms| ms.trim().parse::<u32>().ok())
			.filter(|&ms| ms > 0)
			.unwrap_or(DEFAULT_TIMEOUT_MS);
		Self {
			base_url,
			timeout_ms,
		}
	}

	/// Absolute URL for an endpoint path such as `/api/network/graph`.
	pub fn endpoint(&self, path: &str) -> String {
		format!("{}/{}", self.base_url, path.trim_start_matches('/'))
	}
}
