use futures::future::{Either, select};
use futures::pin_mut;
use gloo_net::http::Request;
use gloo_timers::future::TimeoutFuture;
use log::debug;
use serde::de::DeserializeOwned;

use crate::config::ApiConfig;
use crate::error::GraphError;

/// `GET` an endpoint and decode its JSON body.
pub async fn get_json<T: DeserializeOwned>(
	config: &ApiConfig,
	endpoint: &str,
) -> Result<T, GraphError> {
	let url = config.endpoint(endpoint);
	debug!("GET {url}");

	let request = Request::get(&url)
		.header("Accept", "application/json")
		.send();
	let timeout = TimeoutFuture::new(config.timeout_ms);
	pin_mut!(request, timeout);

	let response = match select(request, timeout).await {
		Either::Left((result, _)) => result.map_err(|e| GraphError::Network(e.to_string()))?,
		Either::Right(_) => return Err(GraphError::Timeout(config.timeout_ms)),
	};

	let status = response.status();
	let body = response
		.text()
		.await
		.map_err(|e| GraphError::Network(e.to_string()))?;

	if !response.ok() {
		let message = error_message(&body)
			.unwrap_or_else(|| format!("{} {}", status, response.status_text()));
		return Err(GraphError::Status { status, message });
	}

	serde_json::from_str(&body).map_err(|e| GraphError::Decode(e.to_string()))
}

/// Pull a readable message out of an error body: the `detail` field of a JSON
/// object if present, otherwise the raw text.
fn error_message(body: &str) -> Option<String> {
	let body = body.trim();
	if body.is_empty() {
		return None;
	}
	match serde_json::from_str::<serde_json::Value>(body) {
		Ok(serde_json::Value::Object(map)) => match map.get("detail") {
			Some(serde_json::Value::String(detail)) => Some(detail.clone()),
			Some(other) => Some(other.to_string()),
			None => Some(body.to_string()),
		},
		_ => Some(body.to_string()),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn prefers_detail_field() {
		assert_eq!(
			error_message(r#"{"detail": "Genre not found"}"#).as_deref(),
			Some("Genre not found")
		);
	}

	#[test]
	fn stringifies_structured_detail() {
		let message = error_message(r#"{"detail": [{"loc": ["query", "genre_id"]}]}"#).unwrap();
		assert!(message.contains("genre_id"));
	}

	#[test]
	fn falls_back_to_text_or_nothing() {
		assert_eq!(
			error_message("upstream unavailable").as_deref(),
			Some("upstream unavailable")
		);
		assert_eq!(error_message("   "), None);
	}
}
