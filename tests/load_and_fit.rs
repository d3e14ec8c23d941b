use std::{
  fs,
  io::ErrorKind,
  path::{Path, PathBuf},
};

use approx::assert_relative_eq;
use fitplot::{
  data::{Dataset, LoadError, Sample},
  fit_segment,
  regression::{self, RegressionError},
};
use polars::prelude::*;

/// A file in the temp dir, removed on drop.
struct TempFile(PathBuf);

impl TempFile {
  fn new(name: &str, contents: &str) -> Self {
    let path = std::env::temp_dir().join(format!("fitplot-{}-{name}", std::process::id()));
    fs::write(&path, contents).unwrap();
    TempFile(path)
  }

  fn path(&self) -> &Path { &self.0 }
}

impl Drop for TempFile {
  fn drop(&mut self) { let _ = fs::remove_file(&self.0); }
}

#[test]
fn doubling_file() {
  let file = TempFile::new("doubling.csv", "x,y\n1,2\n2,4\n3,6\n");
  let dataset = Dataset::load(file.path()).unwrap();

  assert_eq!((dataset.x_label(), dataset.y_label()), ("x", "y"));
  assert_eq!(
    dataset.samples(),
    &[Sample::new(1.0, 2.0), Sample::new(2.0, 4.0), Sample::new(3.0, 6.0)]
  );
  assert_relative_eq!(regression::slope(dataset.samples()).unwrap(), 2.0, epsilon = 1e-12);

  let line = fit_segment(dataset.samples()).unwrap();
  assert_relative_eq!(line.p0.y, 0.0, epsilon = 1e-12);
  assert_relative_eq!(line.p1.x, 3.0);
  assert_relative_eq!(line.p1.y, 6.0, epsilon = 1e-12);
}

#[test]
fn random_rows_round_trip() {
  const ROWS: usize = 500;

  let xs = Float64Chunked::rand_standard_normal("a".into(), ROWS);
  let ys = Float64Chunked::rand_standard_normal("b".into(), ROWS);
  let expected = xs
    .into_no_null_iter()
    .zip(ys.into_no_null_iter())
    .map(|(x, y)| Sample::new(x * 100.0, y * 1e-3))
    .collect::<Vec<_>>();

  let mut contents = String::from("a,b\n");
  for sample in &expected {
    contents.push_str(&format!("{},{}\n", sample.x, sample.y));
  }

  let file = TempFile::new("random.csv", &contents);
  let dataset = Dataset::load(file.path()).unwrap();

  assert_eq!(dataset.x_label(), "a");
  assert_eq!(dataset.y_label(), "b");
  assert_eq!(dataset.len(), ROWS);
  assert_eq!(dataset.samples(), expected.as_slice());
}

#[test]
fn missing_file() {
  let path = std::env::temp_dir().join("fitplot-does-not-exist.csv");

  match Dataset::load(&path) {
    Err(LoadError::Io(err)) => assert_eq!(err.kind(), ErrorKind::NotFound),
    other => panic!("unexpected result: {other:?}"),
  }
}

#[test]
fn constant_x_file() {
  let file = TempFile::new("constant.csv", "time,temp\n5,20.1\n5,20.4\n5,19.9\n");
  let dataset = Dataset::load(file.path()).unwrap();

  assert_eq!(regression::slope(dataset.samples()), Err(RegressionError::ZeroVariance));
  assert_eq!(fit_segment(dataset.samples()), Err(RegressionError::ZeroVariance));
}

#[test]
fn header_only_file() {
  let file = TempFile::new("header.csv", "x,y\n");
  let dataset = Dataset::load(file.path()).unwrap();

  assert!(dataset.is_empty());
  assert_eq!(regression::slope(dataset.samples()), Err(RegressionError::Empty));
}

#[test]
fn malformed_row_reports_line() {
  let file = TempFile::new("malformed.csv", "x,y\n1,2\n2;4\n");
  let err = Dataset::load(file.path()).unwrap_err();

  assert!(matches!(err, LoadError::MissingSeparator { line: 3 }));
  assert_eq!(err.to_string(), "line 3: expected two comma separated fields");
}
