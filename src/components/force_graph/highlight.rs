use std::collections::HashSet;

use super::model::GraphModel;
use super::types::{NodeId, NodeKey, PathEdge};

/// Unordered endpoint pairs of a highlighted route.
#[derive(Clone, Debug, Default)]
pub struct PathSet<Id = NodeId> {
	pairs: HashSet<(Id, Id)>,
}

impl<Id: NodeKey> PathSet<Id> {
	/// Collects the steps of `path`. Shape is not checked.
	pub fn new(path: &[PathEdge<Id>]) -> Self {
		let mut pairs = HashSet::with_capacity(path.len() * 2);
		for step in path {
			pairs.insert((step.source.clone(), step.target.clone()));
			pairs.insert((step.target.clone(), step.source.clone()));
		}
		Self { pairs }
	}

	/// True if `a`-`b` is a path step in either direction.
	pub fn contains(&self, a: &Id, b: &Id) -> bool {
		// Both orientations are stored, so one lookup suffices.
		self.pairs.contains(&(a.clone(), b.clone()))
	}

	/// True for an empty route.
	pub fn is_empty(&self) -> bool {
		self.pairs.is_empty()
	}
}

/// One flag per link of `model`, set when the link's endpoints form a path step.
///
/// Parallel links between the same pair are all flagged. Steps naming unknown ids
/// simply match nothing.
pub fn classify_links<Id: NodeKey>(model: &GraphModel<Id>, path: &[PathEdge<Id>]) -> Vec<bool> {
	if path.is_empty() {
		return vec![false; model.links().len()];
	}
	let set = PathSet::new(path);
	model
		.links()
		.iter()
		.map(|link| {
			let (source, target) = model.link_ids(link);
			set.contains(source, target)
		})
		.collect()
}

/// Node sequence of a route: the first step's source followed by every step's target.
///
/// Steps are not checked for continuity.
pub fn route_nodes<Id: Clone>(path: &[PathEdge<Id>]) -> Vec<Id> {
	let Some(first) = path.first() else {
		return Vec::new();
	};
	std::iter::once(first.source.clone())
		.chain(path.iter().map(|step| step.target.clone()))
		.collect()
}

#[cfg(test)]
mod tests {
	use proptest::prelude::*;

	use super::super::types::Edge;
	use super::*;

	fn model(raw: &[(i64, i64, f64)]) -> GraphModel {
		let edges: Vec<Edge> = raw.iter().map(|&(s, t, w)| Edge::new(s, t, w)).collect();
		GraphModel::from_edges(&edges)
	}

	fn path(raw: &[(i64, i64)]) -> Vec<PathEdge> {
		raw.iter().map(|&(s, t)| PathEdge::new(s, t)).collect()
	}

	#[test]
	fn highlights_only_path_links() {
		let m = model(&[(0, 1, 2.0), (0, 2, 1.0), (1, 3, 2.0)]);
		assert_eq!(classify_links(&m, &path(&[(0, 1)])), vec![true, false, false]);
	}

	#[test]
	fn reversed_step_still_matches() {
		let m = model(&[(0, 1, 5.0)]);
		assert_eq!(classify_links(&m, &path(&[(1, 0)])), vec![true]);
	}

	#[test]
	fn parallel_links_are_all_highlighted() {
		let m = model(&[(2, 3, 1.0), (2, 3, 4.0), (3, 4, 1.0)]);
		assert_eq!(classify_links(&m, &path(&[(2, 3)])), vec![true, true, false]);
	}

	#[test]
	fn empty_path_highlights_nothing() {
		let m = model(&[(0, 1, 1.0), (1, 2, 1.0)]);
		assert_eq!(classify_links(&m, &[]), vec![false, false]);
	}

	#[test]
	fn unknown_ids_never_match() {
		let m = model(&[(0, 1, 1.0)]);
		assert_eq!(classify_links(&m, &path(&[(7, 9), (1, 42)])), vec![false]);
	}

	#[test]
	fn route_chains_targets() {
		assert_eq!(route_nodes(&path(&[(0, 1), (1, 4), (4, 5)])), vec![0, 1, 4, 5]);
		assert!(route_nodes::<i64>(&[]).is_empty());
	}

	fn arb_model() -> impl Strategy<Value = GraphModel> {
		prop::collection::vec((0i64..8, 0i64..8), 0..24).prop_map(|raw| {
			let edges: Vec<Edge> = raw.into_iter().map(|(s, t)| Edge::new(s, t, 1.0)).collect();
			GraphModel::from_edges(&edges)
		})
	}

	fn arb_path() -> impl Strategy<Value = Vec<PathEdge>> {
		prop::collection::vec((0i64..10, 0i64..10), 0..8)
			.prop_map(|raw| raw.into_iter().map(|(s, t)| PathEdge::new(s, t)).collect())
	}

	proptest! {
		#[test]
		fn matching_is_symmetric(m in arb_model(), p in arb_path()) {
			let swapped: Vec<PathEdge> = p.iter().map(|e| PathEdge::new(e.target, e.source)).collect();
			prop_assert_eq!(classify_links(&m, &p), classify_links(&m, &swapped));
		}

		#[test]
		fn matching_is_monotonic(m in arb_model(), p in arb_path(), extra in arb_path()) {
			let before = classify_links(&m, &p);
			let union: Vec<PathEdge> = p.iter().chain(&extra).cloned().collect();
			let after = classify_links(&m, &union);
			for (b, a) in before.iter().zip(&after) {
				prop_assert!(!b || *a);
			}
		}

		#[test]
		fn one_flag_per_link(m in arb_model(), p in arb_path()) {
			prop_assert_eq!(classify_links(&m, &p).len(), m.links().len());
		}
	}
}
