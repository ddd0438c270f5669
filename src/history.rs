//! Results computed during this session.

use crate::components::force_graph::{Edge, PathEdge};

/// A computed result, kept as it was when stored.
#[derive(Clone, Debug, PartialEq)]
pub struct HistoryEntry {
	/// Shown in the list, usually the file name.
	pub label: String,
	/// Local time the result arrived.
	pub timestamp: String,
	/// Graph edges of the result.
	pub edges: Vec<Edge>,
	/// Highlighted route of the result.
	pub path: Vec<PathEdge>,
}

/// Ordered, in-memory list of results.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HistoryStore {
	entries: Vec<HistoryEntry>,
}

impl HistoryStore {
	/// Empty history.
	pub fn new() -> Self {
		Self::default()
	}

	/// Appends `entry` as the newest result.
	pub fn push(&mut self, entry: HistoryEntry) {
		self.entries.push(entry);
	}

	/// Removes the entry at `index`, or returns `None` when out of range.
	pub fn remove(&mut self, index: usize) -> Option<HistoryEntry> {
		(index < self.entries.len()).then(|| self.entries.remove(index))
	}

	/// Entry at `index`, oldest first.
	pub fn get(&self, index: usize) -> Option<&HistoryEntry> {
		self.entries.get(index)
	}

	/// Entries, oldest first.
	pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
		self.entries.iter()
	}

	/// Number of stored results.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// True before the first result.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}
