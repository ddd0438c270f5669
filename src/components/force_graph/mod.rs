//! Weighted graph on a canvas, laid out by a force simulation, with a route highlighted.
//!
//! Pure parts ([`GraphModel`], [`LayoutSession`], [`classify_links`], [`Scene`]) are
//! independent of the browser; [`ForceGraphCanvas`] wires them to a `<canvas>`.

mod component;
mod highlight;
mod model;
mod render;
mod simulation;
mod state;
mod surface;
mod types;

pub use component::ForceGraphCanvas;
pub use highlight::{PathSet, classify_links, route_nodes};
pub use model::GraphModel;
pub use simulation::{Bounds, LayoutConfig, LayoutFrame, LayoutSession, LayoutStatus, SubscriptionId};
pub use state::{ForceGraphState, ViewTransform};
pub use surface::{
	LabelStyle, LinkMark, LinkStyle, NodeMark, NodeStyle, Point, RenderSurface, Scene,
};
pub use types::{Edge, Link, Node, NodeId, NodeKey, PathEdge};
