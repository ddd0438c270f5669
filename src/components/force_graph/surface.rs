//! Drawing capability and the retained scene painted through it.

use super::types::{Link, Node, NodeKey};

/// A position in graph space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
	/// Horizontal coordinate.
	pub x: f64,
	/// Vertical coordinate.
	pub y: f64,
}

impl Point {
	/// Point at `(x, y)`.
	pub fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}

	/// Halfway between `self` and `other`.
	pub fn midpoint(self, other: Point) -> Point {
		Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
	}
}

/// Stroke of a link line.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinkStyle {
	/// CSS color.
	pub color: &'static str,
	/// Line width in graph units.
	pub width: f64,
	/// 0 is transparent, 1 opaque.
	pub opacity: f64,
}

/// Links off the route.
pub const LINK_NORMAL: LinkStyle = LinkStyle {
	color: "#999",
	width: 2.0,
	opacity: 0.6,
};

/// Links on the route.
pub const LINK_HIGHLIGHTED: LinkStyle = LinkStyle {
	color: "#ff0000",
	width: 4.0,
	opacity: 0.6,
};

impl LinkStyle {
	/// Picks the style for a link's highlight flag.
	pub fn for_highlight(highlighted: bool) -> Self {
		if highlighted {
			LINK_HIGHLIGHTED
		} else {
			LINK_NORMAL
		}
	}
}

/// Look of a node marker.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeStyle {
	/// Circle radius in graph units.
	pub radius: f64,
	/// CSS fill color.
	pub fill: &'static str,
	/// CSS outline color.
	pub stroke: &'static str,
	/// Outline width in graph units.
	pub stroke_width: f64,
}

/// Every node marker.
pub const NODE: NodeStyle = NodeStyle {
	radius: 10.0,
	fill: "#69b3a2",
	stroke: "#fff",
	stroke_width: 1.5,
};

/// Text label look. Labels are centered on their anchor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LabelStyle {
	/// Font size in pixels at zoom 1.
	pub size: f64,
	/// Bold face.
	pub bold: bool,
	/// CSS color.
	pub color: &'static str,
}

/// Link weight labels.
pub const WEIGHT_LABEL: LabelStyle = LabelStyle {
	size: 12.0,
	bold: false,
	color: "#333",
};

/// Node id labels.
pub const NODE_LABEL: LabelStyle = LabelStyle {
	size: 14.0,
	bold: true,
	color: "#000",
};

/// Weight labels sit this far above the link midpoint.
pub const WEIGHT_LABEL_LIFT: f64 = 5.0;
/// Node labels sit this far below the node center.
pub const NODE_LABEL_DROP: f64 = 20.0;

/// Backend able to draw graph primitives. Coordinates are in graph space.
pub trait RenderSurface {
	/// Wipes the previous frame.
	fn clear(&mut self);
	/// Straight line between two points.
	fn draw_link(&mut self, from: Point, to: Point, style: LinkStyle);
	/// Circle marker centered on `at`.
	fn draw_node(&mut self, at: Point, style: NodeStyle);
	/// Text centered on `at`.
	fn draw_label(&mut self, at: Point, text: &str, style: LabelStyle);
}

/// Marker and label of one node.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeMark {
	/// Marker center.
	pub at: Point,
	/// Node id as text.
	pub label: String,
	/// Label anchor, below the marker.
	pub label_at: Point,
}

/// Line and weight label of one link.
#[derive(Clone, Debug, PartialEq)]
pub struct LinkMark {
	/// Source node index.
	pub source: usize,
	/// Target node index.
	pub target: usize,
	/// Line start.
	pub from: Point,
	/// Line end.
	pub to: Point,
	/// Weight as text.
	pub label: String,
	/// Label anchor, just above the midpoint.
	pub label_at: Point,
	/// Normal or highlighted stroke.
	pub style: LinkStyle,
}

/// Visual elements of one graph: a marker and label per node, a line and weight label per link.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scene {
	nodes: Vec<NodeMark>,
	links: Vec<LinkMark>,
}

impl Scene {
	/// One mark per node and link, placed at the current positions.
	pub fn build<Id: NodeKey>(nodes: &[Node<Id>], links: &[Link], highlighted: &[bool]) -> Self {
		let mut scene = Self {
			nodes: nodes
				.iter()
				.map(|node| NodeMark {
					at: Point::default(),
					label: node.id.to_string(),
					label_at: Point::default(),
				})
				.collect(),
			links: links
				.iter()
				.enumerate()
				.map(|(i, link)| LinkMark {
					source: link.source,
					target: link.target,
					from: Point::default(),
					to: Point::default(),
					label: format_weight(link.weight),
					label_at: Point::default(),
					style: LinkStyle::for_highlight(highlighted.get(i).copied().unwrap_or(false)),
				})
				.collect(),
		};
		scene.sync(nodes);
		scene
	}

	/// Moves every mark to the current node positions.
	pub fn sync<Id>(&mut self, nodes: &[Node<Id>]) {
		for (mark, node) in self.nodes.iter_mut().zip(nodes) {
			mark.at = Point::new(node.x, node.y);
			mark.label_at = Point::new(node.x, node.y + NODE_LABEL_DROP);
		}
		for mark in &mut self.links {
			let (Some(source), Some(target)) = (nodes.get(mark.source), nodes.get(mark.target))
			else {
				continue;
			};
			mark.from = Point::new(source.x, source.y);
			mark.to = Point::new(target.x, target.y);
			let mid = mark.from.midpoint(mark.to);
			mark.label_at = Point::new(mid.x, mid.y - WEIGHT_LABEL_LIFT);
		}
	}

	/// Clears the surface, then draws links, weight labels, nodes and node labels in that order.
	pub fn paint(&self, surface: &mut impl RenderSurface) {
		surface.clear();
		for mark in &self.links {
			surface.draw_link(mark.from, mark.to, mark.style);
		}
		for mark in &self.links {
			surface.draw_label(mark.label_at, &mark.label, WEIGHT_LABEL);
		}
		for mark in &self.nodes {
			surface.draw_node(mark.at, NODE);
		}
		for mark in &self.nodes {
			surface.draw_label(mark.label_at, &mark.label, NODE_LABEL);
		}
	}

	/// Node marks, in model order.
	pub fn nodes(&self) -> &[NodeMark] {
		&self.nodes
	}

	/// Link marks, in edge order.
	pub fn links(&self) -> &[LinkMark] {
		&self.links
	}

	/// True when there is nothing to draw.
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty() && self.links.is_empty()
	}

	/// Drops every mark.
	pub fn clear(&mut self) {
		self.nodes.clear();
		self.links.clear();
	}
}

/// Integral weights print without a fractional part.
fn format_weight(weight: f64) -> String {
	if weight.fract() == 0.0 && weight.abs() < 1e15 {
		format!("{}", weight as i64)
	} else {
		weight.to_string()
	}
}

/// Headless surface recording every draw call.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct RecordingSurface {
	pub clears: usize,
	pub links: Vec<(Point, Point, LinkStyle)>,
	pub nodes: Vec<Point>,
	pub labels: Vec<(Point, String)>,
}

#[cfg(test)]
impl RenderSurface for RecordingSurface {
	fn clear(&mut self) {
		self.clears += 1;
		self.links.clear();
		self.nodes.clear();
		self.labels.clear();
	}

	fn draw_link(&mut self, from: Point, to: Point, style: LinkStyle) {
		self.links.push((from, to, style));
	}

	fn draw_node(&mut self, at: Point, _style: NodeStyle) {
		self.nodes.push(at);
	}

	fn draw_label(&mut self, at: Point, text: &str, _style: LabelStyle) {
		self.labels.push((at, text.to_string()));
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn node(id: i64, x: f64, y: f64) -> Node {
		Node {
			id,
			x,
			y,
			vx: 0.0,
			vy: 0.0,
		}
	}

	#[test]
	fn places_labels_relative_to_marks() {
		let nodes = vec![node(0, 10.0, 20.0), node(1, 30.0, 60.0)];
		let links = vec![Link {
			source: 0,
			target: 1,
			weight: 2.0,
		}];
		let scene = Scene::build(&nodes, &links, &[true]);

		assert_eq!(scene.nodes()[0].label_at, Point::new(10.0, 40.0));
		assert_eq!(scene.links()[0].label_at, Point::new(20.0, 35.0));
		assert_eq!(scene.links()[0].label, "2");
		assert_eq!(scene.links()[0].style, LINK_HIGHLIGHTED);
	}

	#[test]
	fn sync_moves_marks() {
		let mut nodes = vec![node(0, 0.0, 0.0), node(1, 10.0, 0.0)];
		let links = vec![Link {
			source: 0,
			target: 1,
			weight: 1.5,
		}];
		let mut scene = Scene::build(&nodes, &links, &[]);
		nodes[1].x = 50.0;
		scene.sync(&nodes);
		assert_eq!(scene.links()[0].to, Point::new(50.0, 0.0));
		assert_eq!(scene.links()[0].label, "1.5");
		assert_eq!(scene.links()[0].style, LINK_NORMAL);
	}

	#[test]
	fn paint_draws_every_element() {
		let nodes = vec![node(0, 0.0, 0.0), node(1, 10.0, 0.0), node(2, 5.0, 5.0)];
		let links = vec![
			Link {
				source: 0,
				target: 1,
				weight: 1.0,
			},
			Link {
				source: 1,
				target: 2,
				weight: 3.0,
			},
		];
		let scene = Scene::build(&nodes, &links, &[false, true]);
		let mut surface = RecordingSurface::default();
		scene.paint(&mut surface);

		assert_eq!(surface.clears, 1);
		assert_eq!(surface.links.len(), 2);
		assert_eq!(surface.nodes.len(), 3);
		assert_eq!(surface.labels.len(), 5);
		assert_eq!(surface.links[1].2, LINK_HIGHLIGHTED);
	}

	#[test]
	fn empty_scene_only_clears() {
		let scene = Scene::build::<i64>(&[], &[], &[]);
		let mut surface = RecordingSurface::default();
		scene.paint(&mut surface);
		assert!(scene.is_empty());
		assert_eq!(surface.clears, 1);
		assert!(surface.links.is_empty() && surface.nodes.is_empty() && surface.labels.is_empty());
	}
}
