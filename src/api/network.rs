//! Network graph endpoint: query construction and wire-format validation.

use std::collections::HashSet;

use log::warn;
use serde::Deserialize;

use super::client::get_json;
use crate::components::force_graph::{GraphData, GraphLink, GraphNode, LinkKind, NodeDetail, NodeKind};
use crate::config::ApiConfig;
use crate::error::GraphError;

const GRAPH_ENDPOINT: &str = "/api/network/graph";

/// Which slice of the knowledge graph to request.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GraphFilter {
	pub genre_id: Option<u32>,
	pub include_inactive: bool,
}

impl GraphFilter {
	pub fn is_filtered(&self) -> bool {
		self.genre_id.is_some()
	}

	pub fn endpoint(&self) -> String {
		let mut params = Vec::new();
		if let Some(genre_id) = self.genre_id {
			params.push(format!("genre_id={genre_id}"));
		}
		if self.include_inactive {
			params.push("include_inactive=true".to_string());
		}
		if params.is_empty() {
			GRAPH_ENDPOINT.to_string()
		} else {
			format!("{GRAPH_ENDPOINT}?{}", params.join("&"))
		}
	}
}

/// Fetch and validate the graph for `filter`. Every call hits the network.
pub async fn fetch_graph(config: &ApiConfig, filter: &GraphFilter) -> Result<GraphData, GraphError> {
	let raw: RawGraph = get_json(config, &filter.endpoint()).await?;
	raw.validate()
}

#[derive(Debug, Deserialize)]
struct RawGraph {
	nodes: Vec<RawNode>,
	links: Vec<RawLink>,
}

#[derive(Debug, Deserialize)]
struct RawNode {
	id: String,
	label: String,
	#[serde(rename = "type")]
	kind: NodeKind,
	genre_id: Option<u32>,
	document_id: Option<u32>,
	level: Option<u32>,
	document_count: Option<u32>,
	view_count: Option<u32>,
	helpful_count: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct RawLink {
	source: String,
	target: String,
	#[serde(rename = "type")]
	kind: LinkKind,
}

impl RawNode {
	fn into_node(self) -> Result<GraphNode, GraphError> {
		let missing = |field: &str| {
			GraphError::Decode(format!("{:?} node {:?} is missing `{field}`", self.kind, self.id))
		};
		let detail = match self.kind {
			NodeKind::Genre => NodeDetail::Genre {
				genre_id: self.genre_id.ok_or_else(|| missing("genre_id"))?,
				level: self.level.ok_or_else(|| missing("level"))?,
				document_count: self.document_count.unwrap_or(0),
			},
			NodeKind::Document => NodeDetail::Document {
				document_id: self.document_id.ok_or_else(|| missing("document_id"))?,
				view_count: self.view_count.unwrap_or(0),
				helpful_count: self.helpful_count.unwrap_or(0),
			},
		};
		Ok(GraphNode {
			id: self.id,
			label: self.label,
			detail,
		})
	}
}

impl RawGraph {
	/// Reject the whole response on a malformed node or duplicate id; drop
	/// links whose endpoints are not in the graph.
	fn validate(self) -> Result<GraphData, GraphError> {
		let mut seen = HashSet::with_capacity(self.nodes.len());
		let mut nodes = Vec::with_capacity(self.nodes.len());
		for raw in self.nodes {
			if !seen.insert(raw.id.clone()) {
				return Err(GraphError::Decode(format!("duplicate node id {:?}", raw.id)));
			}
			nodes.push(raw.into_node()?);
		}

		let links = self
			.links
			.into_iter()
			.filter_map(|raw| {
				if seen.contains(&raw.source) && seen.contains(&raw.target) {
					Some(GraphLink {
						source: raw.source,
						target: raw.target,
						kind: raw.kind,
					})
				} else {
					warn!(
						"skipping link {}-{}: endpoint not in graph",
						raw.source, raw.target
					);
					None
				}
			})
			.collect();

		Ok(GraphData { nodes, links })
	}
}

/// Decode a response body into a validated graph.
#[cfg(test)]
fn decode_graph(body: &str) -> Result<GraphData, GraphError> {
	let raw: RawGraph = serde_json::from_str(body).map_err(|e| GraphError::Decode(e.to_string()))?;
	raw.validate()
}

#[cfg(test)]
mod tests {
	use super::*;

	const SAMPLE: &str = r#"{
		"nodes": [
			{"id": "genre_1", "label": "Engineering", "type": "genre", "genre_id": 1, "level": 1, "document_count": 9},
			{"id": "genre_4", "label": "Backend", "type": "genre", "genre_id": 4, "level": 2},
			{"id": "doc_42", "label": "Deploy checklist", "type": "document", "document_id": 42, "view_count": 120, "helpful_count": 7}
		],
		"links": [
			{"source": "genre_1", "target": "genre_4", "type": "genre_hierarchy"},
			{"source": "genre_4", "target": "doc_42", "type": "genre_document"}
		]
	}"#;

	#[test]
	fn builds_endpoint_from_filter() {
		assert_eq!(GraphFilter::default().endpoint(), "/api/network/graph");
		assert_eq!(
			GraphFilter {
				genre_id: Some(7),
				include_inactive: false
			}
			.endpoint(),
			"/api/network/graph?genre_id=7"
		);
		assert_eq!(
			GraphFilter {
				genre_id: Some(3),
				include_inactive: true
			}
			.endpoint(),
			"/api/network/graph?genre_id=3&include_inactive=true"
		);
		assert_eq!(
			GraphFilter {
				genre_id: None,
				include_inactive: true
			}
			.endpoint(),
			"/api/network/graph?include_inactive=true"
		);
	}

	#[test]
	fn decodes_typed_nodes_and_links() {
		let graph = decode_graph(SAMPLE).unwrap();
		assert_eq!(graph.nodes.len(), 3);
		assert_eq!(graph.links.len(), 2);

		assert_eq!(
			graph.node("genre_4").unwrap().detail,
			NodeDetail::Genre {
				genre_id: 4,
				level: 2,
				document_count: 0
			}
		);
		assert_eq!(
			graph.node("doc_42").unwrap().detail,
			NodeDetail::Document {
				document_id: 42,
				view_count: 120,
				helpful_count: 7
			}
		);
		assert_eq!(graph.links[0].kind, LinkKind::GenreHierarchy);
		assert_eq!(graph.links[1].key(), "genre_4-doc_42");
	}

	#[test]
	fn rejects_document_without_document_id() {
		let body = r#"{"nodes": [{"id": "doc_1", "label": "x", "type": "document"}], "links": []}"#;
		assert!(matches!(decode_graph(body), Err(GraphError::Decode(_))));
	}

	#[test]
	fn rejects_genre_without_level() {
		let body = r#"{"nodes": [{"id": "genre_1", "label": "x", "type": "genre", "genre_id": 1}], "links": []}"#;
		assert!(matches!(decode_graph(body), Err(GraphError::Decode(_))));
	}

	#[test]
	fn rejects_unknown_node_type() {
		let body = r#"{"nodes": [{"id": "tag_1", "label": "x", "type": "keyword"}], "links": []}"#;
		assert!(matches!(decode_graph(body), Err(GraphError::Decode(_))));
	}

	#[test]
	fn rejects_duplicate_ids() {
		let body = r#"{"nodes": [
			{"id": "doc_1", "label": "a", "type": "document", "document_id": 1},
			{"id": "doc_1", "label": "b", "type": "document", "document_id": 2}
		], "links": []}"#;
		assert!(matches!(decode_graph(body), Err(GraphError::Decode(_))));
	}

	#[test]
	fn drops_dangling_links() {
		let body = r#"{"nodes": [
			{"id": "genre_1", "label": "a", "type": "genre", "genre_id": 1, "level": 1}
		], "links": [
			{"source": "genre_1", "target": "doc_9", "type": "genre_document"}
		]}"#;
		let graph = decode_graph(body).unwrap();
		assert_eq!(graph.nodes.len(), 1);
		assert!(graph.links.is_empty());
	}
}
