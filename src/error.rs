//! Errors surfaced to the user by the page around the graph.

use thiserror::Error;

/// Result alias for the upload and file-loading paths.
pub type Result<T> = std::result::Result<T, AppError>;

/// Failures of the collaborators around the graph view. The view itself never fails.
#[derive(Error, Debug)]
pub enum AppError {
	/// No file was chosen before submitting.
	#[error("Choose a file first.")]
	NoFile,

	/// The request never produced a response.
	#[error("Could not connect to the server: {0}")]
	Network(String),

	/// The server answered with an error payload.
	#[error("Server error: {0}")]
	Server(String),

	/// The response body was not the expected JSON.
	#[error("Unreadable server response: {0}")]
	Decode(#[from] serde_json::Error),

	/// A graph file line could not be parsed.
	#[error("Invalid graph file, line {line}: {reason}")]
	Csv {
		/// 1-based line number.
		line: usize,
		/// What was wrong with it.
		reason: String,
	},

	/// The local file could not be read.
	#[error("Could not read file: {0}")]
	Read(String),
}
