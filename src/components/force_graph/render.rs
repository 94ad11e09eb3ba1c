use std::collections::HashMap;
use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::layout::Point;
use super::scale;
use super::state::ForceGraphState;
use super::types::GraphNode;
use crate::error::GraphError;

pub fn render(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) -> Result<(), GraphError> {
	if !state.viewport.has_area() {
		return Err(GraphError::RenderPrecondition("graph container has no size"));
	}
	let vp = state.viewport.state();
	ctx.set_fill_style_str(scale::BACKGROUND);
	ctx.fill_rect(0.0, 0.0, vp.width, vp.height);
	ctx.save();
	let _ = ctx.translate(vp.width / 2.0, vp.height / 2.0);
	let _ = ctx.scale(vp.zoom, vp.zoom);
	let _ = ctx.translate(-vp.center_x, -vp.center_y);
	draw_links(state, ctx);
	draw_nodes(state, ctx);
	ctx.restore();
	Ok(())
}

fn draw_links(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	let positions: HashMap<&str, Point> = state
		.placed_nodes()
		.map(|(node, p)| (node.id.as_str(), p))
		.collect();

	// Highlighted links go last so they sit on top.
	for highlighted_pass in [false, true] {
		for link in &state.data.links {
			let highlighted = state.interaction.is_link_highlighted(&link.key());
			if highlighted != highlighted_pass {
				continue;
			}
			let (Some(a), Some(b)) = (
				positions.get(link.source.as_str()),
				positions.get(link.target.as_str()),
			) else {
				continue;
			};
			let style = scale::link_style(link.kind, highlighted);
			ctx.set_global_alpha(style.alpha);
			ctx.set_stroke_style_str(style.color);
			ctx.set_line_width(style.width);
			ctx.begin_path();
			ctx.move_to(a.x, a.y);
			ctx.line_to(b.x, b.y);
			ctx.stroke();
		}
	}
	ctx.set_global_alpha(1.0);
}

fn draw_nodes(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	let zoom = state.viewport.zoom();
	ctx.set_font(&format!("{}px sans-serif", scale::label_font_size(zoom)));
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");

	for highlighted_pass in [false, true] {
		for (node, p) in state.placed_nodes() {
			let highlighted = state.interaction.is_node_highlighted(&node.id)
				|| state.interaction.is_hovered(&node.id);
			if highlighted != highlighted_pass {
				continue;
			}
			draw_node(ctx, node, p, zoom, highlighted);
		}
	}
}

fn draw_node(
	ctx: &CanvasRenderingContext2d,
	node: &GraphNode,
	p: Point,
	zoom: f64,
	highlighted: bool,
) {
	let radius = scale::node_radius(node);
	ctx.begin_path();
	let _ = ctx.arc(p.x, p.y, radius, 0.0, 2.0 * PI);
	ctx.set_fill_style_str(scale::node_fill(node, highlighted));
	ctx.fill();

	if highlighted {
		ctx.set_stroke_style_str(scale::HIGHLIGHT);
		ctx.set_line_width(scale::HIGHLIGHT_STROKE_WIDTH);
		ctx.stroke();
	}

	if scale::label_visible(node, zoom, highlighted) {
		ctx.set_fill_style_str(scale::TEXT);
		let _ = ctx.fill_text(&node.label, p.x, p.y + scale::label_offset(radius, zoom));
	}
}
