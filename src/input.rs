//! Graph files loaded in the browser.
//!
//! The format is the one the shortest-path service accepts: a header line
//! `source,destination` followed by one `source,target,weight` line per edge.

use wasm_bindgen_futures::JsFuture;
use web_sys::File;

use crate::components::force_graph::{Edge, NodeId};
use crate::error::{AppError, Result};

/// Contents of a graph file.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphFile {
	/// Route start named in the header.
	pub source: NodeId,
	/// Route end named in the header.
	pub destination: NodeId,
	/// One edge per data line, in file order.
	pub edges: Vec<Edge>,
}

fn field<T: std::str::FromStr>(raw: &str, name: &str, line: usize) -> Result<T> {
	raw.trim().parse().map_err(|_| AppError::Csv {
		line,
		reason: format!("{name} {:?} is not a number", raw.trim()),
	})
}

/// Parses the text of a graph file. Blank lines are skipped.
pub fn parse_graph_csv(text: &str) -> Result<GraphFile> {
	let mut lines = text
		.lines()
		.enumerate()
		.map(|(i, l)| (i + 1, l.trim()))
		.filter(|(_, l)| !l.is_empty());

	let Some((line, header)) = lines.next() else {
		return Err(AppError::Csv {
			line: 1,
			reason: "file is empty".into(),
		});
	};
	let cols: Vec<&str> = header.split(',').collect();
	if cols.len() < 2 {
		return Err(AppError::Csv {
			line,
			reason: "expected `source,destination`".into(),
		});
	}
	let source = field(cols[0], "source", line)?;
	let destination = field(cols[1], "destination", line)?;

	let mut edges = Vec::new();
	for (line, row) in lines {
		let cols: Vec<&str> = row.split(',').collect();
		let [s, t, w] = cols.as_slice() else {
			return Err(AppError::Csv {
				line,
				reason: format!("expected 3 columns, found {}", cols.len()),
			});
		};
		edges.push(Edge::new(
			field(s, "source", line)?,
			field(t, "target", line)?,
			field(w, "weight", line)?,
		));
	}

	Ok(GraphFile {
		source,
		destination,
		edges,
	})
}

/// Reads a picked file as text.
pub async fn read_text(file: &File) -> Result<String> {
	let text = JsFuture::from(file.text())
		.await
		.map_err(|err| AppError::Read(format!("{err:?}")))?;
	text.as_string()
		.ok_or_else(|| AppError::Read(format!("{} is not text", file.name())))
}
