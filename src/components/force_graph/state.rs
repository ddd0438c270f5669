use std::rc::Rc;

use log::debug;

use super::highlight::classify_links;
use super::model::GraphModel;
use super::simulation::{LayoutConfig, LayoutFrame, LayoutSession, SubscriptionId};
use super::surface::{RenderSurface, Scene};
use super::types::{Edge, NodeId, NodeKey, PathEdge};

/// Zoom factor limits for wheel zooming.
pub const MIN_ZOOM: f64 = 0.1;
/// See [`MIN_ZOOM`].
pub const MAX_ZOOM: f64 = 10.0;

/// Pan offset and zoom factor mapping graph space onto the canvas.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewTransform {
	/// Horizontal offset in pixels.
	pub x: f64,
	/// Vertical offset in pixels.
	pub y: f64,
	/// Scale factor.
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self {
			x: 0.0,
			y: 0.0,
			k: 1.0,
		}
	}
}

/// Background drag in progress.
#[derive(Clone, Debug, Default)]
pub struct PanState {
	/// Pointer is down on the background.
	pub active: bool,
	/// Pointer position when the drag began.
	pub start_x: f64,
	/// See `start_x`.
	pub start_y: f64,
	/// Transform offset when the drag began.
	pub transform_start_x: f64,
	/// See `transform_start_x`.
	pub transform_start_y: f64,
}

type Observer<Id> = Rc<dyn Fn(&LayoutFrame<'_, Id>)>;

/// Everything one rendered graph needs: inputs, derived model, highlight flags,
/// the running layout and the scene drawn from it.
pub struct ForceGraphState<Id = NodeId> {
	config: LayoutConfig,
	edges: Vec<Edge<Id>>,
	path: Vec<PathEdge<Id>>,
	model: GraphModel<Id>,
	highlighted: Vec<bool>,
	session: Option<LayoutSession<Id>>,
	scene: Scene,
	observer: Option<Observer<Id>>,
	/// Subscription of `observer` on the current session.
	observer_subscription: Option<SubscriptionId>,
	rebuilds: u64,
	/// Current pan and zoom.
	pub transform: ViewTransform,
	/// Drag bookkeeping for panning.
	pub pan: PanState,
}

impl<Id: NodeKey + 'static> ForceGraphState<Id> {
	/// Empty view; nothing is laid out until the first [`Self::update`].
	pub fn new(config: LayoutConfig) -> Self {
		Self {
			config,
			edges: Vec::new(),
			path: Vec::new(),
			model: GraphModel::default(),
			highlighted: Vec::new(),
			session: None,
			scene: Scene::default(),
			observer: None,
			observer_subscription: None,
			rebuilds: 0,
			transform: ViewTransform::default(),
			pan: PanState::default(),
		}
	}

	/// Feeds new inputs. Rebuilds only when they differ from the current ones and
	/// returns whether it did.
	pub fn update(&mut self, edges: &[Edge<Id>], path: &[PathEdge<Id>]) -> bool {
		if self.edges == edges && self.path == path {
			return false;
		}
		self.rebuild(edges, path);
		true
	}

	fn rebuild(&mut self, edges: &[Edge<Id>], path: &[PathEdge<Id>]) {
		self.stop_layout();

		self.edges = edges.to_vec();
		self.path = path.to_vec();
		self.model = GraphModel::from_edges(edges);
		self.highlighted = classify_links(&self.model, path);

		let mut session = LayoutSession::new(self.model.clone(), self.config.clone());
		self.observer_subscription = self.observer.as_ref().map(|observer| {
			let observer = Rc::clone(observer);
			session.subscribe(move |frame| observer(frame))
		});
		self.scene = Scene::build(session.nodes(), session.links(), &self.highlighted);
		self.session = Some(session);
		self.rebuilds += 1;

		debug!(
			"Graph rebuilt: {} nodes, {} links, {} highlighted",
			self.model.nodes().len(),
			self.model.links().len(),
			self.highlighted.iter().filter(|h| **h).count()
		);
	}

	/// Registers a listener for layout frames; it follows the graph across rebuilds.
	/// Replaces any previously registered listener.
	pub fn observe(&mut self, listener: impl Fn(&LayoutFrame<'_, Id>) + 'static) {
		let observer: Observer<Id> = Rc::new(listener);
		if let Some(session) = self.session.as_mut() {
			if let Some(previous) = self.observer_subscription.take() {
				session.unsubscribe(previous);
			}
			let attached = Rc::clone(&observer);
			self.observer_subscription = Some(session.subscribe(move |frame| attached(frame)));
		}
		self.observer = Some(observer);
	}

	/// Advances the layout one step and moves the scene along with it.
	pub fn tick(&mut self) -> bool {
		let Some(session) = self.session.as_mut() else {
			return false;
		};
		if !session.tick() {
			return false;
		}
		self.scene.sync(session.nodes());
		true
	}

	/// Draws the current scene.
	pub fn paint(&self, surface: &mut impl RenderSurface) {
		self.scene.paint(surface);
	}

	/// Stops the layout and drops every visual element. Safe to call repeatedly.
	pub fn dispose(&mut self) {
		self.stop_layout();
		self.session = None;
		self.observer_subscription = None;
		self.scene.clear();
		self.edges.clear();
		self.path.clear();
		self.model = GraphModel::default();
		self.highlighted.clear();
	}

	fn stop_layout(&mut self) {
		if let Some(session) = self.session.as_mut() {
			session.stop();
		}
	}

	/// Model derived from the current edges.
	pub fn model(&self) -> &GraphModel<Id> {
		&self.model
	}

	/// One flag per link, in edge order.
	pub fn highlighted(&self) -> &[bool] {
		&self.highlighted
	}

	/// Marks as last synced with the layout.
	pub fn scene(&self) -> &Scene {
		&self.scene
	}

	/// Layout of the current graph; `None` before the first rebuild and after disposal.
	pub fn session(&self) -> Option<&LayoutSession<Id>> {
		self.session.as_ref()
	}

	/// How many times inputs changed and the view was rebuilt.
	pub fn rebuilds(&self) -> u64 {
		self.rebuilds
	}

	/// True while the layout still moves nodes.
	pub fn is_animating(&self) -> bool {
		self.session.as_ref().is_some_and(|s| s.is_active())
	}

	/// Canvas pixel to graph coordinates.
	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	/// Starts a background drag at canvas position `(x, y)`.
	pub fn begin_pan(&mut self, x: f64, y: f64) {
		self.pan.active = true;
		self.pan.start_x = x;
		self.pan.start_y = y;
		self.pan.transform_start_x = self.transform.x;
		self.pan.transform_start_y = self.transform.y;
	}

	/// Follows the pointer while a drag is active.
	pub fn pan_to(&mut self, x: f64, y: f64) {
		if !self.pan.active {
			return;
		}
		self.transform.x = self.pan.transform_start_x + (x - self.pan.start_x);
		self.transform.y = self.pan.transform_start_y + (y - self.pan.start_y);
	}

	/// Releases the drag.
	pub fn end_pan(&mut self) {
		self.pan.active = false;
	}

	/// Zooms in or out around the screen point `(x, y)`.
	pub fn zoom_at(&mut self, x: f64, y: f64, delta_y: f64) {
		let factor = if delta_y > 0.0 { 0.9 } else { 1.1 };
		let new_k = (self.transform.k * factor).clamp(MIN_ZOOM, MAX_ZOOM);
		let ratio = new_k / self.transform.k;
		self.transform.x = x - (x - self.transform.x) * ratio;
		self.transform.y = y - (y - self.transform.y) * ratio;
		self.transform.k = new_k;
	}
}

#[cfg(test)]
mod tests {
	use std::cell::Cell;

	use super::super::simulation::LayoutStatus;
	use super::super::surface::{LINK_HIGHLIGHTED, LINK_NORMAL, RecordingSurface};
	use super::*;

	fn edges(raw: &[(i64, i64, f64)]) -> Vec<Edge> {
		raw.iter().map(|&(s, t, w)| Edge::new(s, t, w)).collect()
	}

	fn path(raw: &[(i64, i64)]) -> Vec<PathEdge> {
		raw.iter().map(|&(s, t)| PathEdge::new(s, t)).collect()
	}

	fn state() -> ForceGraphState {
		ForceGraphState::new(LayoutConfig::default())
	}

	#[test]
	fn highlights_path_links() {
		let mut s = state();
		assert!(s.update(&edges(&[(0, 1, 2.0), (0, 2, 1.0), (1, 3, 2.0)]), &path(&[(0, 1)])));

		let ids: Vec<i64> = s.model().nodes().iter().map(|n| n.id).collect();
		assert_eq!(ids, vec![0, 1, 2, 3]);
		assert_eq!(s.highlighted(), &[true, false, false]);
		assert_eq!(s.scene().links()[0].style, LINK_HIGHLIGHTED);
		assert_eq!(s.scene().links()[1].style, LINK_NORMAL);
		assert!(s.is_animating());
	}

	#[test]
	fn empty_input_creates_nothing() {
		let mut s = state();
		assert!(!s.update(&[], &[]));
		assert!(s.model().is_empty());
		assert!(s.scene().is_empty());
		assert!(!s.tick());

		let mut surface = RecordingSurface::default();
		s.paint(&mut surface);
		assert!(surface.nodes.is_empty() && surface.links.is_empty() && surface.labels.is_empty());
	}

	#[test]
	fn rebuilds_only_on_change() {
		let mut s = state();
		let e = edges(&[(0, 1, 5.0)]);
		assert!(s.update(&e, &[]));
		assert!(!s.update(&e, &[]));
		assert_eq!(s.rebuilds(), 1);

		s.tick();
		s.tick();
		assert!(s.update(&e, &path(&[(1, 0)])));
		assert_eq!(s.rebuilds(), 2);
		assert_eq!(s.highlighted(), &[true]);
		assert_eq!(s.session().map(|l| l.ticks()), Some(0));
	}

	#[test]
	fn tick_moves_scene_with_layout() {
		let mut s = state();
		s.update(&edges(&[(0, 1, 1.0), (1, 2, 1.0)]), &[]);
		assert!(s.tick());

		let Some(session) = s.session() else {
			panic!("no layout session");
		};
		for (mark, node) in s.scene().nodes().iter().zip(session.nodes()) {
			assert_eq!((mark.at.x, mark.at.y), (node.x, node.y));
		}
	}

	#[test]
	fn dispose_stops_everything() {
		let mut s = state();
		s.update(&edges(&[(0, 1, 1.0)]), &path(&[(0, 1)]));
		s.dispose();
		s.dispose();

		assert!(!s.tick());
		assert!(!s.is_animating());
		assert!(s.scene().is_empty());
		assert!(s.highlighted().is_empty());
		// The same inputs count as new after disposal.
		assert!(s.update(&edges(&[(0, 1, 1.0)]), &path(&[(0, 1)])));
	}

	#[test]
	fn observer_follows_rebuilds() {
		let mut s = state();
		let frames = Rc::new(Cell::new(0u32));
		let seen = frames.clone();
		s.observe(move |_| seen.set(seen.get() + 1));

		s.update(&edges(&[(0, 1, 1.0)]), &[]);
		s.tick();
		s.update(&edges(&[(0, 1, 1.0), (1, 2, 1.0)]), &[]);
		s.tick();
		s.tick();
		assert_eq!(frames.get(), 3);
	}

	#[test]
	fn replaced_observer_stops_receiving_frames() {
		let mut s = state();
		let first = Rc::new(Cell::new(0u32));
		let second = Rc::new(Cell::new(0u32));
		let (a, b) = (first.clone(), second.clone());

		s.update(&edges(&[(0, 1, 1.0)]), &[]);
		s.observe(move |_| a.set(a.get() + 1));
		s.tick();
		s.observe(move |_| b.set(b.get() + 1));
		s.tick();
		assert_eq!((first.get(), second.get()), (1, 1));

		s.update(&edges(&[(0, 1, 1.0), (1, 2, 1.0)]), &[]);
		s.tick();
		assert_eq!((first.get(), second.get()), (1, 2));
	}

	#[test]
	fn runs_until_settled() {
		let mut s = state();
		s.update(&edges(&[(0, 1, 2.0), (1, 2, 1.0), (2, 0, 3.0)]), &[]);
		let mut ticks = 0;
		while s.tick() {
			ticks += 1;
			assert!(ticks < 1_000);
		}
		assert_eq!(s.session().map(|l| l.status()), Some(LayoutStatus::Settled));
	}

	#[test]
	fn zoom_keeps_anchor_fixed() {
		let mut s = state();
		let before = s.screen_to_graph(120.0, 80.0);
		s.zoom_at(120.0, 80.0, -1.0);
		let after = s.screen_to_graph(120.0, 80.0);
		assert!((before.0 - after.0).abs() < 1e-9 && (before.1 - after.1).abs() < 1e-9);
		assert!(s.transform.k > 1.0);
	}

	#[test]
	fn pan_offsets_transform() {
		let mut s = state();
		s.begin_pan(10.0, 10.0);
		s.pan_to(40.0, 25.0);
		s.end_pan();
		s.pan_to(100.0, 100.0);
		assert_eq!((s.transform.x, s.transform.y), (30.0, 15.0));
	}
}
