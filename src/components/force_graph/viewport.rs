use super::layout::Point;

pub const MIN_ZOOM: f64 = 0.1;
pub const MAX_ZOOM: f64 = 10.0;
pub const INITIAL_ZOOM: f64 = 1.5;
/// Screen-space margin kept around the graph by `fit_to_view`.
pub const FIT_PADDING: f64 = 150.0;
pub const BUTTON_ZOOM_STEP: f64 = 1.2;
pub const WHEEL_ZOOM_STEP: f64 = 1.1;

/// Axis-aligned box in graph units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
	pub min_x: f64,
	pub min_y: f64,
	pub max_x: f64,
	pub max_y: f64,
}

impl Bounds {
	/// Smallest box containing every circle `(center, radius)`.
	pub fn of_circles(circles: impl IntoIterator<Item = (Point, f64)>) -> Option<Self> {
		circles.into_iter().fold(None, |acc, (p, r)| {
			let b = Bounds {
				min_x: p.x - r,
				min_y: p.y - r,
				max_x: p.x + r,
				max_y: p.y + r,
			};
			Some(match acc {
				None => b,
				Some(a) => Bounds {
					min_x: a.min_x.min(b.min_x),
					min_y: a.min_y.min(b.min_y),
					max_x: a.max_x.max(b.max_x),
					max_y: a.max_y.max(b.max_y),
				},
			})
		})
	}

	pub fn width(&self) -> f64 {
		self.max_x - self.min_x
	}

	pub fn height(&self) -> f64 {
		self.max_y - self.min_y
	}

	pub fn center(&self) -> Point {
		Point {
			x: (self.min_x + self.max_x) / 2.0,
			y: (self.min_y + self.max_y) / 2.0,
		}
	}
}

/// Camera over the graph. Screen = (graph - center) * zoom + size / 2.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewportState {
	pub width: f64,
	pub height: f64,
	pub zoom: f64,
	pub center_x: f64,
	pub center_y: f64,
	pub has_auto_fitted: bool,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub moved: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub center_start_x: f64,
	pub center_start_y: f64,
}

/// Pointer travel (px) below which a press-release counts as a click.
const CLICK_SLOP: f64 = 3.0;

pub struct ViewportController {
	state: ViewportState,
	pub pan: PanState,
}

impl ViewportController {
	pub fn new(width: f64, height: f64) -> Self {
		Self {
			state: ViewportState {
				width,
				height,
				zoom: INITIAL_ZOOM,
				center_x: 0.0,
				center_y: 0.0,
				has_auto_fitted: false,
			},
			pan: PanState::default(),
		}
	}

	pub fn state(&self) -> &ViewportState {
		&self.state
	}

	pub fn zoom(&self) -> f64 {
		self.state.zoom
	}

	pub fn has_area(&self) -> bool {
		self.state.width > 0.0 && self.state.height > 0.0
	}

	/// Returns whether the size actually changed.
	pub fn resize(&mut self, width: f64, height: f64) -> bool {
		if self.state.width == width && self.state.height == height {
			return false;
		}
		self.state.width = width;
		self.state.height = height;
		true
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> Point {
		let s = &self.state;
		Point {
			x: (sx - s.width / 2.0) / s.zoom + s.center_x,
			y: (sy - s.height / 2.0) / s.zoom + s.center_y,
		}
	}

	#[cfg(test)]
	pub fn graph_to_screen(&self, p: Point) -> (f64, f64) {
		let s = &self.state;
		(
			(p.x - s.center_x) * s.zoom + s.width / 2.0,
			(p.y - s.center_y) * s.zoom + s.height / 2.0,
		)
	}

	/// Center on `bounds` and zoom so it fits inside the padded viewport.
	/// Returns false when there is nothing to fit or nowhere to fit it.
	pub fn fit_to_view(&mut self, bounds: Option<Bounds>) -> bool {
		let Some(bounds) = bounds else {
			return false;
		};
		if !self.has_area() {
			return false;
		}
		let s = &mut self.state;
		let padding = FIT_PADDING.min(s.width.min(s.height) / 4.0);
		let (avail_w, avail_h) = (s.width - 2.0 * padding, s.height - 2.0 * padding);
		let zoom = (avail_w / bounds.width().max(f64::EPSILON))
			.min(avail_h / bounds.height().max(f64::EPSILON));
		let center = bounds.center();
		s.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
		s.center_x = center.x;
		s.center_y = center.y;
		true
	}

	/// Fit once, after the first stabilized layout, and only if that layout
	/// was unfiltered. Later calls never move the camera.
	pub fn auto_fit(&mut self, bounds: Option<Bounds>, filtered: bool) -> bool {
		if self.state.has_auto_fitted {
			return false;
		}
		self.state.has_auto_fitted = true;
		!filtered && self.fit_to_view(bounds)
	}

	/// Zoom by `factor` keeping the graph point under `(sx, sy)` fixed.
	pub fn zoom_at(&mut self, sx: f64, sy: f64, factor: f64) {
		let anchor = self.screen_to_graph(sx, sy);
		let s = &mut self.state;
		s.zoom = (s.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
		s.center_x = anchor.x - (sx - s.width / 2.0) / s.zoom;
		s.center_y = anchor.y - (sy - s.height / 2.0) / s.zoom;
	}

	pub fn zoom_in(&mut self) {
		let (w, h) = (self.state.width, self.state.height);
		self.zoom_at(w / 2.0, h / 2.0, BUTTON_ZOOM_STEP);
	}

	pub fn zoom_out(&mut self) {
		let (w, h) = (self.state.width, self.state.height);
		self.zoom_at(w / 2.0, h / 2.0, 1.0 / BUTTON_ZOOM_STEP);
	}

	pub fn begin_pan(&mut self, sx: f64, sy: f64) {
		self.pan = PanState {
			active: true,
			moved: false,
			start_x: sx,
			start_y: sy,
			center_start_x: self.state.center_x,
			center_start_y: self.state.center_y,
		};
	}

	/// Returns whether the camera moved.
	pub fn drag_pan(&mut self, sx: f64, sy: f64) -> bool {
		if !self.pan.active {
			return false;
		}
		let (dx, dy) = (sx - self.pan.start_x, sy - self.pan.start_y);
		if !self.pan.moved && dx.hypot(dy) < CLICK_SLOP {
			return false;
		}
		self.pan.moved = true;
		self.state.center_x = self.pan.center_start_x - dx / self.state.zoom;
		self.state.center_y = self.pan.center_start_y - dy / self.state.zoom;
		true
	}

	/// Finish a pan; true if the gesture was a click rather than a drag.
	pub fn end_pan(&mut self) -> bool {
		let was_click = self.pan.active && !self.pan.moved;
		self.pan = PanState::default();
		was_click
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn approx(a: f64, b: f64) -> bool {
		(a - b).abs() < 1e-9
	}

	fn bounds() -> Option<Bounds> {
		Bounds::of_circles([
			(Point { x: -100.0, y: -50.0 }, 4.0),
			(Point { x: 300.0, y: 150.0 }, 14.0),
		])
	}

	#[test]
	fn bounds_include_radius() {
		let b = bounds().unwrap();
		assert_eq!(b.min_x, -104.0);
		assert_eq!(b.max_x, 314.0);
		assert_eq!(b.min_y, -54.0);
		assert_eq!(b.max_y, 164.0);
		assert_eq!(Bounds::of_circles(Vec::new()), None);
	}

	#[test]
	fn starts_at_initial_camera() {
		let vp = ViewportController::new(800.0, 600.0);
		assert_eq!(vp.zoom(), INITIAL_ZOOM);
		assert_eq!(vp.graph_to_screen(Point::default()), (400.0, 300.0));
	}

	#[test]
	fn screen_and_graph_round_trip() {
		let mut vp = ViewportController::new(800.0, 600.0);
		vp.zoom_at(123.0, 456.0, 2.5);
		let p = vp.screen_to_graph(10.0, 20.0);
		let (sx, sy) = vp.graph_to_screen(p);
		assert!(approx(sx, 10.0) && approx(sy, 20.0));
	}

	#[test]
	fn fit_shows_every_node() {
		let mut vp = ViewportController::new(1000.0, 800.0);
		assert!(vp.fit_to_view(bounds()));
		let b = bounds().unwrap();
		for (x, y) in [(b.min_x, b.min_y), (b.max_x, b.max_y)] {
			let (sx, sy) = vp.graph_to_screen(Point { x, y });
			assert!((0.0..=1000.0).contains(&sx) && (0.0..=800.0).contains(&sy));
		}
		assert!(approx(vp.state().center_x, b.center().x));
	}

	#[test]
	fn fit_is_idempotent() {
		let mut vp = ViewportController::new(1000.0, 800.0);
		vp.zoom_at(10.0, 10.0, 3.0);
		vp.fit_to_view(bounds());
		let once = vp.state().clone();
		vp.fit_to_view(bounds());
		assert_eq!(vp.state(), &once);
	}

	#[test]
	fn fit_needs_nodes_and_area() {
		let mut vp = ViewportController::new(0.0, 0.0);
		assert!(!vp.fit_to_view(bounds()));
		assert_eq!(vp.zoom(), INITIAL_ZOOM);
		let mut vp = ViewportController::new(800.0, 600.0);
		assert!(!vp.fit_to_view(None));
	}

	#[test]
	fn auto_fit_happens_once() {
		let mut vp = ViewportController::new(1000.0, 800.0);
		assert!(vp.auto_fit(bounds(), false));
		assert!(vp.state().has_auto_fitted);

		vp.zoom_at(500.0, 400.0, 2.0);
		let user_camera = vp.state().clone();
		assert!(!vp.auto_fit(bounds(), false));
		assert_eq!(vp.state(), &user_camera);
	}

	#[test]
	fn filtered_first_load_keeps_camera() {
		let mut vp = ViewportController::new(1000.0, 800.0);
		let before = vp.state().clone();
		assert!(!vp.auto_fit(bounds(), true));
		assert_eq!(vp.state().zoom, before.zoom);
		assert!(!vp.auto_fit(bounds(), false));
		assert_eq!(vp.state().center_x, before.center_x);
	}

	#[test]
	fn resize_keeps_camera() {
		let mut vp = ViewportController::new(800.0, 600.0);
		vp.zoom_in();
		let zoom = vp.zoom();
		assert!(vp.resize(1024.0, 768.0));
		assert!(!vp.resize(1024.0, 768.0));
		assert_eq!(vp.zoom(), zoom);
		assert_eq!(vp.state().center_x, 0.0);
	}

	#[test]
	fn zoom_is_clamped() {
		let mut vp = ViewportController::new(800.0, 600.0);
		for _ in 0..100 {
			vp.zoom_in();
		}
		assert_eq!(vp.zoom(), MAX_ZOOM);
		for _ in 0..100 {
			vp.zoom_out();
		}
		assert_eq!(vp.zoom(), MIN_ZOOM);
	}

	#[test]
	fn wheel_zoom_keeps_cursor_anchor() {
		let mut vp = ViewportController::new(800.0, 600.0);
		let before = vp.screen_to_graph(200.0, 100.0);
		vp.zoom_at(200.0, 100.0, WHEEL_ZOOM_STEP);
		let after = vp.screen_to_graph(200.0, 100.0);
		assert!(approx(before.x, after.x) && approx(before.y, after.y));
	}

	#[test]
	fn small_moves_are_clicks() {
		let mut vp = ViewportController::new(800.0, 600.0);
		vp.begin_pan(100.0, 100.0);
		assert!(!vp.drag_pan(101.0, 101.0));
		assert!(vp.end_pan());

		vp.begin_pan(100.0, 100.0);
		assert!(vp.drag_pan(160.0, 100.0));
		assert!(!vp.end_pan());
		assert!(approx(vp.state().center_x, -60.0 / INITIAL_ZOOM));
	}
}
