use serde::Deserialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
	Genre,
	Document,
}

/// Kind-specific payload of a node.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeDetail {
	Genre {
		genre_id: u32,
		/// 1-based depth in the genre hierarchy.
		level: u32,
		document_count: u32,
	},
	Document {
		document_id: u32,
		view_count: u32,
		helpful_count: u32,
	},
}

#[derive(Clone, Debug, PartialEq)]
pub struct GraphNode {
	pub id: String,
	pub label: String,
	pub detail: NodeDetail,
}

impl GraphNode {
	pub fn level(&self) -> Option<u32> {
		match self.detail {
			NodeDetail::Genre { level, .. } => Some(level),
			NodeDetail::Document { .. } => None,
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkKind {
	GenreHierarchy,
	GenreDocument,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GraphLink {
	pub source: String,
	pub target: String,
	pub kind: LinkKind,
}

impl GraphLink {
	/// Canonical `source-target` key used by the highlight sets.
	pub fn key(&self) -> String {
		format!("{}-{}", self.source, self.target)
	}

	pub fn touches(&self, node_id: &str) -> bool {
		self.source == node_id || self.target == node_id
	}
}

/// A validated graph: unique node ids, every link resolves.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphData {
	pub nodes: Vec<GraphNode>,
	pub links: Vec<GraphLink>,
}

impl GraphData {
	pub fn node(&self, id: &str) -> Option<&GraphNode> {
		self.nodes.iter().find(|node| node.id == id)
	}
}
