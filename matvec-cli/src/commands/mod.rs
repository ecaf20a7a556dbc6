//! Subcommand implementations and shared file helpers.

pub mod expm;
pub mod solve;
pub mod sparse;

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use matvec_linalg::{io, DenseMatrix};

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

/// Load a matrix from a text file, or from JSON when the path ends in `.json`.
pub fn read_matrix_file(path: &Path) -> Result<DenseMatrix> {
    if is_json(path) {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Invalid JSON matrix in {}", path.display()))
    } else {
        io::load_matrix(path).with_context(|| format!("Failed to load matrix {}", path.display()))
    }
}

/// Write a matrix to `path` (text or JSON by extension), or to stdout in
/// the text format when no path is given.
pub fn write_matrix_output(path: Option<&Path>, a: &DenseMatrix) -> Result<()> {
    match path {
        None => write_matrix_stream(std::io::stdout().lock(), a),
        Some(p) if is_json(p) => {
            let json = serde_json::to_string_pretty(a)?;
            std::fs::write(p, json).with_context(|| format!("Failed to write {}", p.display()))
        }
        Some(p) => {
            io::save_matrix(p, a).with_context(|| format!("Failed to write {}", p.display()))
        }
    }
}

/// Write a matrix in the exact text format, so piped output (a packed
/// matrix included) reads back bit for bit.
pub fn write_matrix_stream<W: Write>(writer: W, a: &DenseMatrix) -> Result<()> {
    io::write_matrix(writer, a).context("Failed to write matrix")
}
