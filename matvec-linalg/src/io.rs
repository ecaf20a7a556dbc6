//! Plain-text matrix and vector files.
//!
//! Format: a header line with the dimensions (`nrows ncols` for a matrix,
//! `n` for a vector) followed by whitespace-separated values, one matrix
//! row per line. Blank lines and lines starting with `#` are skipped.
//! Values are written with shortest round-trip formatting so a packed
//! matrix, sentinel included, reads back bit-for-bit.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::dense::DenseMatrix;
use crate::error::{LinalgError, LinalgResult};

/// Format a value so that parsing it yields the identical `f64`.
pub fn format_exact(v: f64) -> String {
    let a = v.abs();
    if v == 0.0 || !v.is_finite() || (1e-5..1e16).contains(&a) {
        format!("{v}")
    } else {
        format!("{v:e}")
    }
}

struct Lines<R> {
    inner: std::io::Lines<R>,
    line_no: usize,
}

impl<R: BufRead> Lines<R> {
    fn new(reader: R) -> Self {
        Self {
            inner: reader.lines(),
            line_no: 0,
        }
    }

    /// Next line with content, or `None` at end of input.
    fn next_content(&mut self) -> LinalgResult<Option<String>> {
        for line in self.inner.by_ref() {
            self.line_no += 1;
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            return Ok(Some(trimmed.to_string()));
        }
        Ok(None)
    }

    fn expect_content(&mut self, what: &str) -> LinalgResult<String> {
        self.next_content()?.ok_or_else(|| LinalgError::Parse {
            line: self.line_no,
            message: format!("unexpected end of input, expected {what}"),
        })
    }

    fn error(&self, message: String) -> LinalgError {
        LinalgError::Parse {
            line: self.line_no,
            message,
        }
    }
}

fn parse_dims<R: BufRead>(lines: &mut Lines<R>, count: usize) -> LinalgResult<Vec<usize>> {
    let header = lines.expect_content("dimension header")?;
    let dims = header
        .split_whitespace()
        .map(|t| {
            t.parse::<usize>()
                .map_err(|e| lines.error(format!("bad dimension '{t}': {e}")))
        })
        .collect::<LinalgResult<Vec<usize>>>()?;
    if dims.len() != count {
        return Err(lines.error(format!(
            "expected {count} dimension(s), found {}",
            dims.len()
        )));
    }
    Ok(dims)
}

fn parse_values<R: BufRead>(lines: &Lines<R>, line: &str) -> LinalgResult<Vec<f64>> {
    line.split_whitespace()
        .map(|t| {
            t.parse::<f64>()
                .map_err(|e| lines.error(format!("bad value '{t}': {e}")))
        })
        .collect()
}

/// Read a matrix in the text format.
pub fn read_matrix<R: BufRead>(reader: R) -> LinalgResult<DenseMatrix> {
    let mut lines = Lines::new(reader);
    let dims = parse_dims(&mut lines, 2)?;
    let (nrows, ncols) = (dims[0], dims[1]);

    let mut data = Vec::with_capacity(nrows * ncols);
    for i in 0..nrows {
        let line = lines.expect_content(&format!("row {i}"))?;
        let row = parse_values(&lines, &line)?;
        if row.len() != ncols {
            return Err(lines.error(format!(
                "row {i} has {} values, expected {ncols}",
                row.len()
            )));
        }
        data.extend(row);
    }
    DenseMatrix::try_from_vec(nrows, ncols, data)
}

/// Write a matrix in the text format.
pub fn write_matrix<W: Write>(mut writer: W, a: &DenseMatrix) -> LinalgResult<()> {
    writeln!(writer, "{} {}", a.nrows(), a.ncols())?;
    for i in 0..a.nrows() {
        let row: Vec<String> = a.row(i).iter().map(|&v| format_exact(v)).collect();
        writeln!(writer, "{}", row.join(" "))?;
    }
    writer.flush()?;
    Ok(())
}

/// Read a vector: a length line followed by the values on any number of lines.
pub fn read_vector<R: BufRead>(reader: R) -> LinalgResult<Vec<f64>> {
    let mut lines = Lines::new(reader);
    let n = parse_dims(&mut lines, 1)?[0];
    let mut v = Vec::with_capacity(n);
    while v.len() < n {
        let line = lines.expect_content(&format!("{} more value(s)", n - v.len()))?;
        v.extend(parse_values(&lines, &line)?);
    }
    if v.len() != n {
        return Err(lines.error(format!("expected {n} values, found {}", v.len())));
    }
    Ok(v)
}

/// Write a vector: its length, then all values on one line.
pub fn write_vector<W: Write>(mut writer: W, v: &[f64]) -> LinalgResult<()> {
    writeln!(writer, "{}", v.len())?;
    let vals: Vec<String> = v.iter().map(|&x| format_exact(x)).collect();
    writeln!(writer, "{}", vals.join(" "))?;
    writer.flush()?;
    Ok(())
}

/// Pretty-print a vector as a single tab-separated line.
pub fn format_vector(v: &[f64]) -> String {
    v.iter()
        .map(|x| format!("{x:.6}"))
        .collect::<Vec<_>>()
        .join("\t")
}

pub fn load_matrix(path: &Path) -> LinalgResult<DenseMatrix> {
    read_matrix(BufReader::new(File::open(path)?))
}

pub fn save_matrix(path: &Path, a: &DenseMatrix) -> LinalgResult<()> {
    write_matrix(BufWriter::new(File::create(path)?), a)
}

pub fn load_vector(path: &Path) -> LinalgResult<Vec<f64>> {
    read_vector(BufReader::new(File::open(path)?))
}

pub fn save_vector(path: &Path, v: &[f64]) -> LinalgResult<()> {
    write_vector(BufWriter::new(File::create(path)?), v)
}
