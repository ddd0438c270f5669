//! Force-directed layout.
//!
//! A [`LayoutSession`] owns the nodes and links of one rendered graph and relaxes their
//! positions under four forces: link springs, many-body repulsion, centering and collision.
//! The session cools down (`alpha` decays towards zero) and settles by itself; callers drive
//! it with [`LayoutSession::tick`] once per animation frame.

use std::f64::consts::{PI, TAU};

use log::debug;

use super::model::GraphModel;
use super::types::{Link, Node, NodeId, NodeKey};

/// Axis-aligned clamping rectangle for node centers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
	/// Left edge.
	pub min_x: f64,
	/// Right edge.
	pub max_x: f64,
	/// Top edge.
	pub min_y: f64,
	/// Bottom edge.
	pub max_y: f64,
}

impl Bounds {
	/// Inclusive on every edge.
	pub fn contains(&self, x: f64, y: f64) -> bool {
		x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
	}
}

const VIEWPORT_MARGIN: f64 = 20.0;
/// Extra room at the bottom for node labels drawn below the marker.
const LABEL_MARGIN: f64 = 10.0;

/// Simulation parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutConfig {
	/// Rest length of every link.
	pub link_distance: f64,
	/// Spring passes per tick.
	pub link_iterations: usize,
	/// Negative values repel.
	pub charge_strength: f64,
	/// Repulsion is capped below this distance.
	pub charge_distance_min: f64,
	/// Point the centroid is pulled to.
	pub center: (f64, f64),
	/// 1.0 moves the centroid onto `center` every tick.
	pub center_strength: f64,
	/// Per-node collision radius; two nodes stay `2 * collide_radius` apart.
	pub collide_radius: f64,
	/// Share of an overlap resolved per tick.
	pub collide_strength: f64,
	/// Fraction of velocity lost every tick.
	pub velocity_decay: f64,
	/// The session settles once alpha drops below this.
	pub alpha_min: f64,
	/// Fraction of alpha lost every tick.
	pub alpha_decay: f64,
	/// `None` disables clamping.
	pub bounds: Option<Bounds>,
}

impl LayoutConfig {
	/// Parameters for a canvas of the given size: centered, clamped inside a margin.
	pub fn for_viewport(width: f64, height: f64) -> Self {
		Self {
			center: (width / 2.0, height / 2.0),
			bounds: Some(Bounds {
				min_x: VIEWPORT_MARGIN,
				max_x: width - VIEWPORT_MARGIN,
				min_y: VIEWPORT_MARGIN,
				max_y: height - VIEWPORT_MARGIN - LABEL_MARGIN,
			}),
			..Self::default()
		}
	}
}

impl Default for LayoutConfig {
	fn default() -> Self {
		let alpha_min = 0.001;
		Self {
			link_distance: 100.0,
			link_iterations: 1,
			charge_strength: -300.0,
			charge_distance_min: 1.0,
			center: (300.0, 200.0),
			center_strength: 1.0,
			collide_radius: 30.0,
			collide_strength: 1.0,
			velocity_decay: 0.4,
			alpha_min,
			alpha_decay: 1.0 - alpha_min.powf(1.0 / 300.0),
			bounds: Some(Bounds {
				min_x: 20.0,
				max_x: 580.0,
				min_y: 20.0,
				max_y: 370.0,
			}),
		}
	}
}

/// Lifecycle of a [`LayoutSession`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayoutStatus {
	/// Emitting an update on every tick.
	Running,
	/// Cooled below `alpha_min`.
	Settled,
	/// Halted by [`LayoutSession::stop`].
	Stopped,
}

/// Position update handed to subscribers after every tick.
pub struct LayoutFrame<'a, Id = NodeId> {
	/// 1 for the first update of a session.
	pub tick: u64,
	/// Temperature after this tick.
	pub alpha: f64,
	/// Positions after this tick.
	pub nodes: &'a [Node<Id>],
}

/// Handle returned by [`LayoutSession::subscribe`].
pub type SubscriptionId = usize;

type Listener<Id> = Box<dyn FnMut(&LayoutFrame<'_, Id>)>;

/// One running layout. Owned by the caller and driven by [`LayoutSession::tick`].
pub struct LayoutSession<Id = NodeId> {
	nodes: Vec<Node<Id>>,
	links: Vec<Link>,
	link_strength: Vec<f64>,
	link_bias: Vec<f64>,
	config: LayoutConfig,
	alpha: f64,
	ticks: u64,
	status: LayoutStatus,
	listeners: Vec<(SubscriptionId, Listener<Id>)>,
	next_subscription: SubscriptionId,
}

impl<Id: NodeKey> LayoutSession<Id> {
	/// Seeds positions on a spiral around `config.center`. An empty model starts settled.
	pub fn new(model: GraphModel<Id>, config: LayoutConfig) -> Self {
		let (mut nodes, links) = model.into_parts();
		place_phyllotaxis(&mut nodes, config.center);

		let mut degree = vec![0usize; nodes.len()];
		for link in &links {
			degree[link.source] += 1;
			degree[link.target] += 1;
		}
		let link_strength = links
			.iter()
			.map(|l| 1.0 / degree[l.source].min(degree[l.target]).max(1) as f64)
			.collect();
		let link_bias = links
			.iter()
			.map(|l| {
				let (s, t) = (degree[l.source] as f64, degree[l.target] as f64);
				s / (s + t)
			})
			.collect();

		let status = if nodes.is_empty() {
			LayoutStatus::Settled
		} else {
			LayoutStatus::Running
		};

		Self {
			nodes,
			links,
			link_strength,
			link_bias,
			config,
			alpha: 1.0,
			ticks: 0,
			status,
			listeners: Vec::new(),
			next_subscription: 0,
		}
	}

	/// Current positions, in model order.
	pub fn nodes(&self) -> &[Node<Id>] {
		&self.nodes
	}

	/// Links as given by the model.
	pub fn links(&self) -> &[Link] {
		&self.links
	}

	/// Current temperature, starting at 1.
	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	/// Updates emitted so far.
	pub fn ticks(&self) -> u64 {
		self.ticks
	}

	/// Whether the session runs, settled or was stopped.
	pub fn status(&self) -> LayoutStatus {
		self.status
	}

	/// True while ticks still produce updates.
	pub fn is_active(&self) -> bool {
		self.status == LayoutStatus::Running
	}

	/// Parameters the session was started with.
	pub fn config(&self) -> &LayoutConfig {
		&self.config
	}

	/// Registers a listener called with the node positions after every tick.
	pub fn subscribe(
		&mut self,
		listener: impl FnMut(&LayoutFrame<'_, Id>) + 'static,
	) -> SubscriptionId {
		let id = self.next_subscription;
		self.next_subscription += 1;
		if self.status != LayoutStatus::Stopped {
			self.listeners.push((id, Box::new(listener)));
		}
		id
	}

	/// Unknown ids are ignored.
	pub fn unsubscribe(&mut self, id: SubscriptionId) {
		self.listeners.retain(|(sid, _)| *sid != id);
	}

	/// Halts the session for good and drops every listener. Safe to call repeatedly.
	pub fn stop(&mut self) {
		if self.status == LayoutStatus::Stopped {
			return;
		}
		debug!(
			"Layout stopped after {} ticks ({} nodes)",
			self.ticks,
			self.nodes.len()
		);
		self.status = LayoutStatus::Stopped;
		self.listeners.clear();
	}

	/// Advances the simulation one step. Returns `false` without touching any state
	/// once the session has settled or been stopped.
	pub fn tick(&mut self) -> bool {
		if self.status != LayoutStatus::Running {
			return false;
		}

		self.alpha -= self.alpha * self.config.alpha_decay;

		for _ in 0..self.config.link_iterations {
			self.apply_links();
		}
		self.apply_charge();

		let retain = 1.0 - self.config.velocity_decay;
		for node in &mut self.nodes {
			node.vx *= retain;
			node.vy *= retain;
			node.x += node.vx;
			node.y += node.vy;
		}

		self.apply_center();
		self.apply_collision();
		if let Some(bounds) = self.config.bounds {
			for node in &mut self.nodes {
				node.x = node.x.min(bounds.max_x).max(bounds.min_x);
				node.y = node.y.min(bounds.max_y).max(bounds.min_y);
			}
		}

		self.ticks += 1;
		let frame = LayoutFrame {
			tick: self.ticks,
			alpha: self.alpha,
			nodes: &self.nodes,
		};
		for (_, listener) in &mut self.listeners {
			listener(&frame);
		}

		if self.alpha < self.config.alpha_min {
			debug!("Layout settled after {} ticks", self.ticks);
			self.status = LayoutStatus::Settled;
		}
		true
	}

	fn apply_links(&mut self) {
		let distance = self.config.link_distance;
		for (i, link) in self.links.iter().enumerate() {
			if link.source == link.target {
				continue;
			}
			let (s, t) = (&self.nodes[link.source], &self.nodes[link.target]);
			let mut dx = t.x + t.vx - s.x - s.vx;
			let mut dy = t.y + t.vy - s.y - s.vy;
			if dx == 0.0 && dy == 0.0 {
				(dx, dy) = jiggle(link.source, link.target);
			}
			let len = (dx * dx + dy * dy).sqrt();
			let k = (len - distance) / len * self.alpha * self.link_strength[i];
			let (fx, fy) = (dx * k, dy * k);
			let bias = self.link_bias[i];

			let target = &mut self.nodes[link.target];
			target.vx -= fx * bias;
			target.vy -= fy * bias;
			let source = &mut self.nodes[link.source];
			source.vx += fx * (1.0 - bias);
			source.vy += fy * (1.0 - bias);
		}
	}

	fn apply_charge(&mut self) {
		let strength = self.config.charge_strength * self.alpha;
		if strength == 0.0 {
			return;
		}
		let min_sq = self.config.charge_distance_min * self.config.charge_distance_min;
		let count = self.nodes.len();
		for i in 0..count {
			for j in (i + 1)..count {
				let mut dx = self.nodes[j].x - self.nodes[i].x;
				let mut dy = self.nodes[j].y - self.nodes[i].y;
				let mut len_sq = dx * dx + dy * dy;
				if len_sq == 0.0 {
					(dx, dy) = jiggle(i, j);
					len_sq = dx * dx + dy * dy;
				}
				if len_sq < min_sq {
					len_sq = (min_sq * len_sq).sqrt();
				}
				let w = strength / len_sq;
				self.nodes[i].vx += dx * w;
				self.nodes[i].vy += dy * w;
				self.nodes[j].vx -= dx * w;
				self.nodes[j].vy -= dy * w;
			}
		}
	}

	fn apply_center(&mut self) {
		if self.nodes.is_empty() {
			return;
		}
		let n = self.nodes.len() as f64;
		let (sx, sy) = self
			.nodes
			.iter()
			.fold((0.0, 0.0), |(sx, sy), node| (sx + node.x, sy + node.y));
		let (cx, cy) = self.config.center;
		let shift_x = (sx / n - cx) * self.config.center_strength;
		let shift_y = (sy / n - cy) * self.config.center_strength;
		for node in &mut self.nodes {
			node.x -= shift_x;
			node.y -= shift_y;
		}
	}

	/// Pushes overlapping pairs apart by moving their positions; velocities are untouched.
	fn apply_collision(&mut self) {
		let min_distance = self.config.collide_radius * 2.0;
		if min_distance <= 0.0 {
			return;
		}
		let count = self.nodes.len();
		for i in 0..count {
			for j in (i + 1)..count {
				let mut dx = self.nodes[j].x - self.nodes[i].x;
				let mut dy = self.nodes[j].y - self.nodes[i].y;
				let mut len_sq = dx * dx + dy * dy;
				if len_sq >= min_distance * min_distance {
					continue;
				}
				if len_sq == 0.0 {
					(dx, dy) = jiggle(i, j);
					len_sq = dx * dx + dy * dy;
				}
				let len = len_sq.sqrt();
				let k = (min_distance - len) / len * self.config.collide_strength * 0.5;
				self.nodes[i].x -= dx * k;
				self.nodes[i].y -= dy * k;
				self.nodes[j].x += dx * k;
				self.nodes[j].y += dy * k;
			}
		}
	}
}

/// Tiny deterministic offset for coincident points.
fn jiggle(a: usize, b: usize) -> (f64, f64) {
	let angle = ((a as f64) * 0.618_034 + (b as f64) * 0.414_214 + 0.37) * TAU;
	(angle.cos() * 1e-6, angle.sin() * 1e-6)
}

/// Spreads nodes on a sunflower spiral around `center`.
fn place_phyllotaxis<Id>(nodes: &mut [Node<Id>], center: (f64, f64)) {
	const INITIAL_RADIUS: f64 = 10.0;
	let initial_angle = PI * (3.0 - 5.0_f64.sqrt());
	for (i, node) in nodes.iter_mut().enumerate() {
		let radius = INITIAL_RADIUS * (0.5 + i as f64).sqrt();
		let angle = i as f64 * initial_angle;
		node.x = center.0 + radius * angle.cos();
		node.y = center.1 + radius * angle.sin();
		node.vx = 0.0;
		node.vy = 0.0;
	}
}
