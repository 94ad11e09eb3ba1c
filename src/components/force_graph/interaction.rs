use std::collections::HashSet;

use super::types::{GraphData, NodeDetail};

/// Hovered node and everything lit up with it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HighlightState {
	pub selected_node_id: Option<String>,
	pub highlighted_node_ids: HashSet<String>,
	pub highlighted_link_keys: HashSet<String>,
}

impl HighlightState {
	pub fn is_active(&self) -> bool {
		self.selected_node_id.is_some()
	}
}

/// Outbound actions raised by clicking a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GraphEvent {
	NavigateToDocument { document_id: u32 },
	GenreSelected { genre_id: u32 },
}

impl GraphEvent {
	/// Route used when no collaborator handles the event.
	pub fn default_route(&self) -> String {
		match self {
			GraphEvent::NavigateToDocument { document_id } => format!("/documents/{document_id}"),
			GraphEvent::GenreSelected { genre_id } => format!("/document-list?genre={genre_id}"),
		}
	}

	/// Where the event goes. A genre selection stays in place when the host
	/// listens for it; everything else navigates.
	pub fn dispatch(self, has_genre_listener: bool) -> Dispatch {
		match self {
			GraphEvent::GenreSelected { genre_id } if has_genre_listener => {
				Dispatch::SelectGenre(Some(genre_id))
			}
			_ => Dispatch::Navigate(self.default_route()),
		}
	}
}

/// Resolved target of a [`GraphEvent`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Dispatch {
	SelectGenre(Option<u32>),
	Navigate(String),
}

/// Sole writer of [`HighlightState`]. Reads the graph, never mutates it.
#[derive(Debug, Default)]
pub struct InteractionController {
	highlight: HighlightState,
}

impl InteractionController {
	/// Recompute highlighting for `node_id`; `None` or an unknown id clears it.
	/// Returns whether anything changed.
	pub fn on_hover(&mut self, graph: &GraphData, node_id: Option<&str>) -> bool {
		if self.highlight.selected_node_id.as_deref() == node_id {
			return false;
		}
		let Some(id) = node_id.filter(|id| graph.node(id).is_some()) else {
			let changed = self.highlight.is_active();
			self.highlight = HighlightState::default();
			return changed;
		};

		let mut nodes = HashSet::from([id.to_string()]);
		let mut links = HashSet::new();
		for link in graph.links.iter().filter(|link| link.touches(id)) {
			links.insert(link.key());
			nodes.insert(link.source.clone());
			nodes.insert(link.target.clone());
		}
		self.highlight = HighlightState {
			selected_node_id: Some(id.to_string()),
			highlighted_node_ids: nodes,
			highlighted_link_keys: links,
		};
		true
	}

	pub fn on_click(&self, graph: &GraphData, node_id: &str) -> Option<GraphEvent> {
		match graph.node(node_id)?.detail {
			NodeDetail::Document { document_id, .. } => {
				Some(GraphEvent::NavigateToDocument { document_id })
			}
			NodeDetail::Genre { genre_id, .. } => Some(GraphEvent::GenreSelected { genre_id }),
		}
	}

	/// Drop highlighting that refers to a replaced graph.
	pub fn reset(&mut self) {
		self.highlight = HighlightState::default();
	}

	pub fn highlight(&self) -> &HighlightState {
		&self.highlight
	}

	pub fn is_node_highlighted(&self, id: &str) -> bool {
		self.highlight.highlighted_node_ids.contains(id)
	}

	pub fn is_link_highlighted(&self, key: &str) -> bool {
		self.highlight.highlighted_link_keys.contains(key)
	}

	pub fn is_hovered(&self, id: &str) -> bool {
		self.highlight.selected_node_id.as_deref() == Some(id)
	}
}
