use std::fmt::Display;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

/// Identifier used by the backend for graph vertices.
pub type NodeId = i64;

/// Anything usable as a vertex identifier.
pub trait NodeKey: Clone + Eq + Hash + Display {}

impl<T: Clone + Eq + Hash + Display> NodeKey for T {}

/// A weighted edge as delivered by the backend or a graph file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Edge<Id = NodeId> {
	/// First endpoint.
	pub source: Id,
	/// Second endpoint.
	pub target: Id,
	/// Shown as the link label; the layout ignores it.
	pub weight: f64,
}

impl<Id> Edge<Id> {
	/// Edge from `source` to `target`.
	pub fn new(source: Id, target: Id, weight: f64) -> Self {
		Self {
			source,
			target,
			weight,
		}
	}
}

/// One hop of the highlighted route. Direction is ignored when matching.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PathEdge<Id = NodeId> {
	/// Endpoint the hop leaves from.
	pub source: Id,
	/// Endpoint the hop arrives at.
	pub target: Id,
}

impl<Id> PathEdge<Id> {
	/// Hop from `source` to `target`.
	pub fn new(source: Id, target: Id) -> Self {
		Self { source, target }
	}
}

/// A vertex with its layout state.
#[derive(Clone, Debug, PartialEq)]
pub struct Node<Id = NodeId> {
	/// Identifier, also used as the label.
	pub id: Id,
	/// Horizontal position in graph units.
	pub x: f64,
	/// Vertical position in graph units.
	pub y: f64,
	/// Horizontal velocity.
	pub vx: f64,
	/// Vertical velocity.
	pub vy: f64,
}

impl<Id> Node<Id> {
	/// Node at the origin, at rest.
	pub fn new(id: Id) -> Self {
		Self {
			id,
			x: 0.0,
			y: 0.0,
			vx: 0.0,
			vy: 0.0,
		}
	}
}

/// An edge whose endpoints are indices into the node list.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Link {
	/// Index of the source node.
	pub source: usize,
	/// Index of the target node.
	pub target: usize,
	/// Weight of the originating edge.
	pub weight: f64,
}
