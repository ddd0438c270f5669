use std::collections::HashMap;

use super::types::{Edge, Link, Node, NodeId, NodeKey};

/// Nodes and links derived from a flat edge list.
///
/// Nodes appear in first-occurrence order (source before target, edges left to right).
/// Links keep the order and length of the input edges.
#[derive(Clone, Debug)]
pub struct GraphModel<Id = NodeId> {
	nodes: Vec<Node<Id>>,
	links: Vec<Link>,
	index: HashMap<Id, usize>,
}

impl<Id: NodeKey> GraphModel<Id> {
	/// Interns every endpoint and resolves each edge to a link. Never fails.
	pub fn from_edges(edges: &[Edge<Id>]) -> Self {
		let mut nodes = Vec::new();
		let mut index = HashMap::new();
		let mut links = Vec::with_capacity(edges.len());

		for edge in edges {
			let source = Self::intern(&mut nodes, &mut index, &edge.source);
			let target = Self::intern(&mut nodes, &mut index, &edge.target);
			links.push(Link {
				source,
				target,
				weight: edge.weight,
			});
		}

		Self {
			nodes,
			links,
			index,
		}
	}

	fn intern(nodes: &mut Vec<Node<Id>>, index: &mut HashMap<Id, usize>, id: &Id) -> usize {
		if let Some(&idx) = index.get(id) {
			return idx;
		}
		let idx = nodes.len();
		nodes.push(Node::new(id.clone()));
		index.insert(id.clone(), idx);
		idx
	}

	/// Unique vertices, in first-occurrence order.
	pub fn nodes(&self) -> &[Node<Id>] {
		&self.nodes
	}

	/// One link per input edge.
	pub fn links(&self) -> &[Link] {
		&self.links
	}

	/// Position of `id` in [`Self::nodes`].
	pub fn index_of(&self, id: &Id) -> Option<usize> {
		self.index.get(id).copied()
	}

	/// Endpoint ids of a link belonging to this model.
	pub fn link_ids(&self, link: &Link) -> (&Id, &Id) {
		(&self.nodes[link.source].id, &self.nodes[link.target].id)
	}

	/// True when built from no edges.
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	pub(super) fn into_parts(self) -> (Vec<Node<Id>>, Vec<Link>) {
		(self.nodes, self.links)
	}
}

// The index is derived from `nodes`, so it takes no part in equality.
impl<Id: NodeKey> PartialEq for GraphModel<Id> {
	fn eq(&self, other: &Self) -> bool {
		self.nodes == other.nodes && self.links == other.links
	}
}

impl<Id> Default for GraphModel<Id> {
	fn default() -> Self {
		Self {
			nodes: Vec::new(),
			links: Vec::new(),
			index: HashMap::new(),
		}
	}
}

#[cfg(test)]
mod tests {
	use std::collections::HashSet;

	use proptest::prelude::*;

	use super::*;

	fn edges(raw: &[(i64, i64, f64)]) -> Vec<Edge> {
		raw.iter().map(|&(s, t, w)| Edge::new(s, t, w)).collect()
	}

	#[test]
	fn builds_nodes_in_first_occurrence_order() {
		let model = GraphModel::from_edges(&edges(&[(0, 1, 2.0), (0, 2, 1.0), (1, 3, 2.0)]));
		let ids: Vec<i64> = model.nodes().iter().map(|n| n.id).collect();
		assert_eq!(ids, vec![0, 1, 2, 3]);
		assert_eq!(model.links().len(), 3);
		assert_eq!(model.link_ids(&model.links()[2]), (&1, &3));
		assert_eq!(model.links()[1].weight, 1.0);
	}

	#[test]
	fn target_can_come_first() {
		let model = GraphModel::from_edges(&edges(&[(5, 2, 1.0), (2, 7, 1.0)]));
		let ids: Vec<i64> = model.nodes().iter().map(|n| n.id).collect();
		assert_eq!(ids, vec![5, 2, 7]);
		assert_eq!(model.index_of(&7), Some(2));
		assert_eq!(model.index_of(&9), None);
	}

	#[test]
	fn empty_edges_give_empty_model() {
		let model: GraphModel = GraphModel::from_edges(&[]);
		assert!(model.is_empty());
		assert!(model.links().is_empty());
	}

	#[test]
	fn keeps_parallel_links_and_self_loops() {
		let model = GraphModel::from_edges(&edges(&[(2, 3, 1.0), (2, 3, 4.0), (3, 3, 0.5)]));
		assert_eq!(model.nodes().len(), 2);
		assert_eq!(model.links().len(), 3);
		assert_eq!(model.links()[0].source, model.links()[1].source);
		assert_eq!(model.links()[2].source, model.links()[2].target);
	}

	#[test]
	fn equality_compares_nodes_and_links() {
		let a = GraphModel::from_edges(&edges(&[(0, 1, 2.0), (1, 2, 3.0)]));
		let b = GraphModel::from_edges(&edges(&[(0, 1, 2.0), (1, 2, 3.0)]));
		let reweighted = GraphModel::from_edges(&edges(&[(0, 1, 2.0), (1, 2, 4.0)]));
		let reordered = GraphModel::from_edges(&edges(&[(1, 2, 3.0), (0, 1, 2.0)]));
		assert_eq!(a, b);
		assert_ne!(a, reweighted);
		assert_ne!(a, reordered);
		assert_eq!(GraphModel::<String>::default(), GraphModel::from_edges(&[]));
	}

	#[test]
	fn works_with_string_ids() {
		let raw = vec![Edge::new("a".to_string(), "b".to_string(), 1.0)];
		let model = GraphModel::from_edges(&raw);
		assert_eq!(model.link_ids(&model.links()[0]), (&"a".to_string(), &"b".to_string()));
	}

	fn arb_edges() -> impl Strategy<Value = Vec<Edge>> {
		prop::collection::vec((0i64..12, 0i64..12, 0.0f64..10.0), 0..40)
			.prop_map(|raw| raw.into_iter().map(|(s, t, w)| Edge::new(s, t, w)).collect())
	}

	proptest! {
		#[test]
		fn node_count_matches_distinct_ids(raw in arb_edges()) {
			let model = GraphModel::from_edges(&raw);
			let distinct: HashSet<i64> = raw.iter().flat_map(|e| [e.source, e.target]).collect();
			prop_assert_eq!(model.nodes().len(), distinct.len());
		}

		#[test]
		fn links_resolve_back_to_edge_ids(raw in arb_edges()) {
			let model = GraphModel::from_edges(&raw);
			prop_assert_eq!(model.links().len(), raw.len());
			for (link, edge) in model.links().iter().zip(&raw) {
				prop_assert_eq!(model.link_ids(link), (&edge.source, &edge.target));
				prop_assert_eq!(link.weight, edge.weight);
			}
		}

		#[test]
		fn rebuilding_is_idempotent(raw in arb_edges()) {
			prop_assert_eq!(GraphModel::from_edges(&raw), GraphModel::from_edges(&raw));
		}
	}
}
