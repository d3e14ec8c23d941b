//! Loading `x,y` sample files.
//!
//! The first line names the two columns, every other line holds one sample.
//! Fields are split on the first comma and are not trimmed.

use std::{
  fmt,
  fs::File,
  io::{self, BufRead, BufReader},
  path::Path,
};

use polars::prelude::*;
use tracing::debug;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sample {
  pub x: f64,
  pub y: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Dataset {
  samples: Vec<Sample>,
  x_label: String,
  y_label: String,
}

#[derive(Debug)]
pub enum LoadError {
  /// The file could not be opened or read.
  Io(io::Error),
  /// The input has no header line.
  MissingHeader,
  /// A line has no comma separating its two fields.
  MissingSeparator { line: usize },
  /// A field is not a floating point number.
  InvalidNumber { line: usize, field: String },
}

impl Sample {
  pub const fn new(x: f64, y: f64) -> Self { Sample { x, y } }
}

impl From<(f64, f64)> for Sample {
  fn from((x, y): (f64, f64)) -> Self { Sample { x, y } }
}

impl Dataset {
  pub fn new(samples: Vec<Sample>, x_label: &str, y_label: &str) -> Self {
    Dataset { samples, x_label: x_label.to_string(), y_label: y_label.to_string() }
  }

  pub fn load(path: impl AsRef<Path>) -> Result<Dataset, LoadError> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let dataset = Dataset::read(BufReader::new(file))?;
    debug!(path = %path.display(), samples = dataset.len(), "loaded dataset");
    Ok(dataset)
  }

  /// Parses a header line followed by one sample per line.
  pub fn read(reader: impl BufRead) -> Result<Dataset, LoadError> {
    let mut lines = reader.lines();

    let header = lines.next().ok_or(LoadError::MissingHeader)??;
    let (x_label, y_label) =
      header.split_once(',').ok_or(LoadError::MissingSeparator { line: 1 })?;

    let mut samples = vec![];
    for (i, line) in lines.enumerate() {
      let line = line?;
      samples.push(parse_sample(&line, i + 2)?);
    }

    Ok(Dataset::new(samples, x_label, y_label))
  }

  pub fn samples(&self) -> &[Sample] { &self.samples }
  pub fn x_label(&self) -> &str { &self.x_label }
  pub fn y_label(&self) -> &str { &self.y_label }
  pub fn len(&self) -> usize { self.samples.len() }
  pub fn is_empty(&self) -> bool { self.samples.is_empty() }

  /// Splits the samples into an x and a y column, named after the labels.
  pub fn columns(&self) -> (Column, Column) {
    let xs = self.samples.iter().map(|s| s.x).collect::<Vec<_>>();
    let ys = self.samples.iter().map(|s| s.y).collect::<Vec<_>>();

    (Column::new(self.x_label.as_str().into(), xs), Column::new(self.y_label.as_str().into(), ys))
  }
}

fn parse_sample(line: &str, number: usize) -> Result<Sample, LoadError> {
  let (x, y) = line.split_once(',').ok_or(LoadError::MissingSeparator { line: number })?;

  Ok(Sample { x: parse_field(x, number)?, y: parse_field(y, number)? })
}

fn parse_field(field: &str, line: usize) -> Result<f64, LoadError> {
  field.parse::<f64>().map_err(|_| LoadError::InvalidNumber { line, field: field.to_string() })
}

impl From<io::Error> for LoadError {
  fn from(err: io::Error) -> Self { LoadError::Io(err) }
}

impl fmt::Display for LoadError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      LoadError::Io(err) => write!(f, "{err}"),
      LoadError::MissingHeader => write!(f, "missing header line"),
      LoadError::MissingSeparator { line } => {
        write!(f, "line {line}: expected two comma separated fields")
      }
      LoadError::InvalidNumber { line, field } => {
        write!(f, "line {line}: `{field}` is not a number")
      }
    }
  }
}

impl std::error::Error for LoadError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      LoadError::Io(err) => Some(err),
      _ => None,
    }
  }
}
