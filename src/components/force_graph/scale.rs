//! Visual encodings: how node kind, hierarchy level and highlight state map
//! to radius, color, label visibility and link stroke.

use super::types::{GraphNode, LinkKind, NodeDetail};

pub const BACKGROUND: &str = "#FFFFFF";
pub const TEXT: &str = "#111827";
pub const HIGHLIGHT: &str = "#3B82F6";
pub const DOCUMENT_FILL: &str = "#6B7280";
pub const HIERARCHY_LINK: &str = "#1E40AF";
pub const DOCUMENT_LINK: &str = "#D1D5DB";

/// Level 1 (darkest) to level 5 (lightest).
pub const GENRE_LEVEL_COLORS: [&str; 5] = ["#1E3A8A", "#1D4ED8", "#3B82F6", "#60A5FA", "#93C5FD"];

pub const DOCUMENT_RADIUS: f64 = 4.0;
pub const GENRE_RADIUS_MIN: f64 = 4.0;
pub const GENRE_RADIUS_MAX: f64 = 14.0;
pub const HIGHLIGHT_STROKE_WIDTH: f64 = 1.5;

/// Zoom at which every label becomes visible.
pub const LABEL_ZOOM_THRESHOLD: f64 = 1.5;
const LABEL_FONT_PX: f64 = 12.0;
const LABEL_GAP_PX: f64 = 8.0;

/// Grows with the square root of the document count so large genres do not
/// swamp the canvas.
pub fn genre_radius(document_count: u32) -> f64 {
	(GENRE_RADIUS_MIN + (document_count as f64).sqrt() * 1.5).min(GENRE_RADIUS_MAX)
}

pub fn node_radius(node: &GraphNode) -> f64 {
	match node.detail {
		NodeDetail::Genre { document_count, .. } => genre_radius(document_count),
		NodeDetail::Document { .. } => DOCUMENT_RADIUS,
	}
}

/// Levels outside 1..=5 use the middle of the ramp.
pub fn genre_color(level: u32) -> &'static str {
	match level {
		1..=5 => GENRE_LEVEL_COLORS[level as usize - 1],
		_ => GENRE_LEVEL_COLORS[2],
	}
}

pub fn node_fill(node: &GraphNode, highlighted: bool) -> &'static str {
	if highlighted {
		return HIGHLIGHT;
	}
	match node.detail {
		NodeDetail::Genre { level, .. } => genre_color(level),
		NodeDetail::Document { .. } => DOCUMENT_FILL,
	}
}

pub fn label_visible(node: &GraphNode, zoom: f64, highlighted: bool) -> bool {
	node.level() == Some(1) || highlighted || zoom >= LABEL_ZOOM_THRESHOLD
}

/// Font size in graph units; constant on screen regardless of zoom.
pub fn label_font_size(zoom: f64) -> f64 {
	LABEL_FONT_PX / zoom
}

/// Distance from node center to label baseline, in graph units.
pub fn label_offset(radius: f64, zoom: f64) -> f64 {
	radius + LABEL_GAP_PX / zoom
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinkStyle {
	pub color: &'static str,
	pub alpha: f64,
	pub width: f64,
}

/// Non-highlighted links recede but stay visible.
pub fn link_style(kind: LinkKind, highlighted: bool) -> LinkStyle {
	if highlighted {
		return LinkStyle {
			color: HIGHLIGHT,
			alpha: 1.0,
			width: 2.0,
		};
	}
	let color = match kind {
		LinkKind::GenreHierarchy => HIERARCHY_LINK,
		LinkKind::GenreDocument => DOCUMENT_LINK,
	};
	LinkStyle {
		color,
		alpha: 0.3,
		width: 1.0,
	}
}
