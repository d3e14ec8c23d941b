//! Ordinary least squares fit of `y` against `x`.

use std::fmt;

use tracing::debug;

use crate::data::Sample;

/// A fitted line, anchored at the mean point of the samples.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fit {
  pub slope:  f64,
  pub mean_x: f64,
  pub mean_y: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegressionError {
  /// There are no samples to fit.
  Empty,
  /// Every sample has the same x value, so the slope is undefined.
  ZeroVariance,
  /// The slope overflowed or the samples contain NaN or infinite values.
  NonFinite,
}

/// Returns `(mean_x, mean_y)`, or `None` if there are no samples.
pub fn mean_point(samples: &[Sample]) -> Option<(f64, f64)> {
  if samples.is_empty() {
    return None;
  }

  let n = samples.len() as f64;
  let (sum_x, sum_y) = samples.iter().fold((0.0, 0.0), |(x, y), s| (x + s.x, y + s.y));
  Some((sum_x / n, sum_y / n))
}

/// Computes the least squares slope:
///
/// ```text
/// slope = (Σxy − n·mean_x·mean_y) / (Σx² − n·mean_x²)
/// ```
///
/// It is evaluated as `Σ(x − mean_x)(y − mean_y) / Σ(x − mean_x)²`, which is the
/// same quantity but keeps its precision when x is far from zero.
pub fn slope(samples: &[Sample]) -> Result<f64, RegressionError> { fit(samples).map(|f| f.slope) }

pub fn fit(samples: &[Sample]) -> Result<Fit, RegressionError> {
  let first = samples.first().ok_or(RegressionError::Empty)?;
  if samples.iter().all(|s| s.x == first.x) {
    return Err(RegressionError::ZeroVariance);
  }

  let (mean_x, mean_y) = mean_point(samples).ok_or(RegressionError::Empty)?;
  let (sxy, sxx) = samples.iter().fold((0.0, 0.0), |(sxy, sxx), s| {
    let (dx, dy) = (s.x - mean_x, s.y - mean_y);
    (sxy + dx * dy, sxx + dx * dx)
  });
  let slope = sxy / sxx;

  if !slope.is_finite() {
    return Err(RegressionError::NonFinite);
  }

  debug!(samples = samples.len(), slope, mean_x, mean_y, "fitted line");
  Ok(Fit { slope, mean_x, mean_y })
}

impl Fit {
  /// Evaluates the line at `x`.
  pub fn at(&self, x: f64) -> f64 { self.mean_y + self.slope * (x - self.mean_x) }

  pub fn intercept(&self) -> f64 { self.at(0.0) }
}

impl fmt::Display for RegressionError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      RegressionError::Empty => write!(f, "no samples to fit"),
      RegressionError::ZeroVariance => {
        write!(f, "every sample has the same x value, the slope is undefined")
      }
      RegressionError::NonFinite => write!(f, "the fitted slope is not a finite number"),
    }
  }
}

impl std::error::Error for RegressionError {}
