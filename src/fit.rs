use kurbo::{Line, Point};

use crate::{
  LineAxes, Plot,
  data::Sample,
  regression::{self, Fit, RegressionError},
};

/// The fitted line between `x = 0` and the largest x of the samples.
pub fn fit_segment(samples: &[Sample]) -> Result<Line, RegressionError> {
  let fit = regression::fit(samples)?;
  segment_of(&fit, samples)
}

fn segment_of(fit: &Fit, samples: &[Sample]) -> Result<Line, RegressionError> {
  let first = samples.first().ok_or(RegressionError::Empty)?;
  let x_max = samples.iter().map(|s| s.x).fold(first.x, f64::max);

  Ok(Line::new(Point::new(0.0, fit.at(0.0)), Point::new(x_max, fit.at(x_max))))
}

impl<'a> Plot<'a> {
  /// Draws the least squares line of `samples`, from `x = 0` to their largest x.
  pub fn regression_line(
    &mut self,
    samples: &[Sample],
  ) -> Result<&mut LineAxes<'a>, RegressionError> {
    let fit = regression::fit(samples)?;
    self.fitted_line(&fit, samples)
  }

  /// Like [`regression_line`](Self::regression_line), for a `fit` that was
  /// already computed from `samples`.
  pub fn fitted_line(
    &mut self,
    fit: &Fit,
    samples: &[Sample],
  ) -> Result<&mut LineAxes<'a>, RegressionError> {
    let line = segment_of(fit, samples)?;
    Ok(self.segment(line.p0, line.p1))
  }
}

#[cfg(test)]
mod tests {
  use approx::assert_relative_eq;

  use super::*;

  fn samples(points: &[(f64, f64)]) -> Vec<Sample> {
    points.iter().copied().map(Sample::from).collect()
  }

  #[test]
  fn segment_spans_zero_to_largest_x() {
    let line = fit_segment(&samples(&[(1.0, 2.0), (3.0, 6.0), (2.0, 4.0)])).unwrap();

    assert_relative_eq!(line.p0.x, 0.0);
    assert_relative_eq!(line.p0.y, 0.0, epsilon = 1e-12);
    assert_relative_eq!(line.p1.x, 3.0);
    assert_relative_eq!(line.p1.y, 6.0, epsilon = 1e-12);
  }

  #[test]
  fn segment_follows_fit() {
    let data = samples(&[(1.0, 1.0), (2.0, 3.0), (4.0, 3.0), (5.0, 6.0)]);
    let fit = regression::fit(&data).unwrap();
    let line = fit_segment(&data).unwrap();

    assert_relative_eq!(line.p0.y, fit.intercept(), epsilon = 1e-12);
    assert_relative_eq!(line.p1.y, fit.at(5.0), epsilon = 1e-12);
  }

  #[test]
  fn all_negative_x() {
    let line = fit_segment(&samples(&[(-4.0, 1.0), (-2.0, 2.0), (-3.0, 1.5)])).unwrap();

    assert_relative_eq!(line.p1.x, -2.0);
    assert_relative_eq!(line.p0.y, 3.0, epsilon = 1e-12);
    assert_relative_eq!(line.p1.y, 2.0, epsilon = 1e-12);
  }

  #[test]
  fn degenerate_input_draws_nothing() {
    let mut plot = Plot::new();

    assert!(matches!(
      plot.regression_line(&samples(&[(1.0, 1.0), (1.0, 2.0)])),
      Err(RegressionError::ZeroVariance)
    ));
    assert!(matches!(plot.regression_line(&[]), Err(RegressionError::Empty)));
    assert!(plot.axes.is_empty());
  }

  #[test]
  fn regression_line_adds_segment() {
    let mut plot = Plot::new();
    let axes = plot.regression_line(&samples(&[(0.0, 1.0), (1.0, 1.0), (2.0, 1.0)])).unwrap();

    let line = axes.endpoints().unwrap();
    assert_eq!(line.p0, Point::new(0.0, 1.0));
    assert_eq!(line.p1, Point::new(2.0, 1.0));
  }

  #[test]
  fn fitted_line_uses_the_given_fit() {
    let data = samples(&[(1.0, 1.0), (2.0, 3.0), (4.0, 3.0), (5.0, 6.0)]);
    let fit = Fit { slope: -1.0, mean_x: 2.0, mean_y: 4.0 };

    let mut plot = Plot::new();
    let line = plot.fitted_line(&fit, &data).unwrap().endpoints().unwrap();
    assert_eq!(line.p0, Point::new(0.0, 6.0));
    assert_eq!(line.p1, Point::new(5.0, 1.0));

    let mut plot = Plot::new();
    let fitted = regression::fit(&data).unwrap();
    let from_fit = plot.fitted_line(&fitted, &data).unwrap().endpoints().unwrap();
    assert_eq!(from_fit, fit_segment(&data).unwrap());
  }

  #[test]
  fn fitted_line_needs_samples() {
    let fit = Fit { slope: 1.0, mean_x: 0.0, mean_y: 0.0 };
    let mut plot = Plot::new();

    assert!(matches!(plot.fitted_line(&fit, &[]), Err(RegressionError::Empty)));
    assert!(plot.axes.is_empty());
  }
}
