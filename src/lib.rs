//! Fits a least squares line through `x,y` samples and plots both.
//!
//! ```no_run
//! use fitplot::{Plot, data::Dataset};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let dataset = Dataset::load("heights.csv")?;
//! let (x, y) = dataset.columns();
//!
//! let mut plot = Plot::new();
//! plot.scatter(&x, &y);
//! plot.regression_line(dataset.samples())?;
//! plot.x.title(dataset.x_label());
//! plot.y.title(dataset.y_label());
//! plot.show()?;
//! # Ok(())
//! # }
//! ```

use std::fmt;

use kurbo::{Cap, Line, Point, Stroke};
use parley::FontWeight;
use polars::error::{PolarsError, PolarsResult};
use tracing::warn;

use crate::{
  axes::Axes,
  render::{Align, DrawText, Render},
};

mod axes;
mod bounds;
pub mod data;
mod fit;
pub mod regression;
mod render;
mod theme;

pub use axes::{LineAxes, ScatterAxes};
pub use bounds::{Bounds, Range};
pub use fit::fit_segment;

/// A figure: two axes and the items drawn against them.
#[derive(Default)]
pub struct Plot<'a> {
  title: Option<String>,

  pub x: Axis,
  pub y: Axis,

  axes: Vec<Axes<'a>>,
}

#[derive(Default)]
pub struct Axis {
  title: Option<String>,
  min:   Option<f64>,
  max:   Option<f64>,
}

#[derive(Debug)]
pub enum PlotError {
  /// A column could not be read as numbers.
  Data(PolarsError),
  EventLoop(winit::error::EventLoopError),
  Window(winit::error::OsError),
  Surface(vello::wgpu::CreateSurfaceError),
  Adapter(vello::wgpu::RequestAdapterError),
  Device(vello::wgpu::RequestDeviceError),
  Render(vello::Error),
}

impl<'a> Plot<'a> {
  pub fn new() -> Plot<'a> { Plot::default() }

  pub fn title(&mut self, title: &str) -> &mut Self {
    self.title = Some(title.to_string());
    self
  }

  /// Opens a window with the plot, and blocks until it is closed.
  pub fn show(&self) -> Result<(), PlotError> {
    let bounds = self.data_bounds()?;
    render::window::show(self, bounds)
  }

  /// The region of data space shown: every item's extent with a margin, unless
  /// overridden on the axis.
  pub fn data_bounds(&self) -> PolarsResult<Bounds> {
    let mut bounds = Bounds::empty();
    for ax in &self.axes {
      bounds = bounds.union(ax.data_bounds()?);
    }

    let bounds = bounds.widen_degenerate().expand_by(0.05);
    Ok(Bounds::new(self.x.clamp(bounds.x), self.y.clamp(bounds.y)))
  }
}

impl Axis {
  pub fn title(&mut self, title: &str) -> &mut Self {
    self.title = Some(title.to_string());
    self
  }

  pub fn min(&mut self, min: f64) -> &mut Self {
    self.min = Some(min);
    self
  }

  pub fn max(&mut self, max: f64) -> &mut Self {
    self.max = Some(max);
    self
  }

  fn clamp(&self, range: Range) -> Range {
    Range::new(self.min.unwrap_or(range.min), self.max.unwrap_or(range.max)).widen_degenerate()
  }
}

impl Plot<'_> {
  pub(crate) fn draw(&self, render: &mut Render, data_bounds: Bounds) {
    const TICKS: u32 = 10;

    let size = render.size();
    let viewport =
      Bounds::new(Range::new(0.0, size.width), Range::new(size.height, 0.0)).shrink(80.0);

    if let Some(title) = &self.title {
      render.draw_text(DrawText {
        text: title,
        size: 32.0,
        weight: FontWeight::BOLD,
        position: Point { x: size.width / 2.0, y: viewport.y.max - 30.0 },
        brush: theme::TEXT.into(),
        horizontal_align: Align::Center,
        vertical_align: Align::End,
        ..Default::default()
      });
    }

    if let Some(x_title) = &self.x.title {
      render.draw_text(DrawText {
        text: x_title,
        size: 24.0,
        position: Point { x: size.width / 2.0, y: viewport.y.min + 40.0 },
        brush: theme::TEXT.into(),
        horizontal_align: Align::Center,
        vertical_align: Align::Start,
        ..Default::default()
      });
    }

    if let Some(y_title) = &self.y.title {
      render.draw_text(DrawText {
        text: y_title,
        size: 24.0,
        position: Point { x: viewport.x.min - 50.0, y: size.height / 2.0 },
        brush: theme::TEXT.into(),
        transform: kurbo::Affine::rotate(-std::f64::consts::FRAC_PI_2),
        horizontal_align: Align::Center,
        vertical_align: Align::End,
        ..Default::default()
      });
    }

    let border_stroke = Stroke::new(2.0);
    render.stroke(
      &Line::new(
        Point::new(viewport.x.min, viewport.y.min),
        Point::new(viewport.x.max, viewport.y.min),
      ),
      kurbo::Affine::IDENTITY,
      theme::SPINE,
      &border_stroke,
    );
    render.stroke(
      &Line::new(
        Point::new(viewport.x.min, viewport.y.min),
        Point::new(viewport.x.min, viewport.y.max),
      ),
      kurbo::Affine::IDENTITY,
      theme::SPINE,
      &border_stroke,
    );

    let transform = data_bounds.transform_to(viewport);
    let tick_stroke = border_stroke.clone().with_start_cap(Cap::Butt);

    let iter = data_bounds.y.nice_ticks(TICKS);
    let digits = iter.label_digits();
    for (y, vy) in iter
      .map(|v| (v, (transform * Point::new(0.0, v)).y))
      .filter(|(_, vy)| viewport.y.contains(vy))
    {
      render.stroke(
        &Line::new(Point::new(viewport.x.min, vy), Point::new(viewport.x.min - 10.0, vy)),
        kurbo::Affine::IDENTITY,
        theme::SPINE,
        &tick_stroke,
      );
      render.draw_text(DrawText {
        text: &format!("{y:.digits$}"),
        size: 12.0,
        position: Point { x: viewport.x.min - 15.0, y: vy },
        brush: theme::TEXT.into(),
        horizontal_align: Align::End,
        vertical_align: Align::Center,
        ..Default::default()
      });
    }

    let iter = data_bounds.x.nice_ticks(TICKS);
    let digits = iter.label_digits();
    for (x, vx) in iter
      .map(|v| (v, (transform * Point::new(v, 0.0)).x))
      .filter(|(_, vx)| viewport.x.contains(vx))
    {
      render.stroke(
        &Line::new(Point::new(vx, viewport.y.min), Point::new(vx, viewport.y.min + 10.0)),
        kurbo::Affine::IDENTITY,
        theme::SPINE,
        &tick_stroke,
      );
      render.draw_text(DrawText {
        text: &format!("{x:.digits$}"),
        size: 12.0,
        position: Point { x: vx, y: viewport.y.min + 15.0 },
        brush: theme::TEXT.into(),
        horizontal_align: Align::Center,
        vertical_align: Align::Start,
        ..Default::default()
      });
    }

    for ax in &self.axes {
      ax.draw(render, transform);
    }
  }
}

pub(crate) trait ResultExt<T> {
  /// Logs the error, and drops it.
  fn log_err(self) -> Option<T>;
}

impl<T, E: fmt::Display> ResultExt<T> for Result<T, E> {
  fn log_err(self) -> Option<T> {
    match self {
      Ok(v) => Some(v),
      Err(e) => {
        warn!("{e}");
        None
      }
    }
  }
}

impl fmt::Display for PlotError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      PlotError::Data(e) => write!(f, "cannot plot column: {e}"),
      PlotError::EventLoop(e) => write!(f, "event loop failed: {e}"),
      PlotError::Window(e) => write!(f, "cannot open window: {e}"),
      PlotError::Surface(e) => write!(f, "cannot create surface: {e}"),
      PlotError::Adapter(e) => write!(f, "no graphics adapter: {e}"),
      PlotError::Device(e) => write!(f, "no graphics device: {e}"),
      PlotError::Render(e) => write!(f, "rendering failed: {e}"),
    }
  }
}

impl std::error::Error for PlotError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      PlotError::Data(e) => Some(e),
      PlotError::EventLoop(e) => Some(e),
      PlotError::Window(e) => Some(e),
      PlotError::Surface(e) => Some(e),
      PlotError::Adapter(e) => Some(e),
      PlotError::Device(e) => Some(e),
      PlotError::Render(e) => Some(e),
    }
  }
}

macro_rules! impl_from {
  ($($variant:ident($ty:ty)),* $(,)?) => {
    $(
      impl From<$ty> for PlotError {
        fn from(e: $ty) -> Self { PlotError::$variant(e) }
      }
    )*
  };
}

impl_from! {
  Data(PolarsError),
  EventLoop(winit::error::EventLoopError),
  Window(winit::error::OsError),
  Surface(vello::wgpu::CreateSurfaceError),
  Adapter(vello::wgpu::RequestAdapterError),
  Device(vello::wgpu::RequestDeviceError),
  Render(vello::Error),
}

#[cfg(test)]
mod tests {
  use approx::assert_relative_eq;
  use polars::prelude::Column;

  use super::*;

  #[test]
  fn bounds_cover_points_and_segment() {
    let x = Column::new("x".into(), vec![1.0, 2.0, 3.0]);
    let y = Column::new("y".into(), vec![2.0, 4.0, 6.0]);

    let mut plot = Plot::new();
    plot.scatter(&x, &y);
    plot.segment(Point::new(0.0, 0.0), Point::new(3.0, 6.0));

    let bounds = plot.data_bounds().unwrap();
    assert_relative_eq!(bounds.x.min, -0.15, epsilon = 1e-12);
    assert_relative_eq!(bounds.x.max, 3.15, epsilon = 1e-12);
    assert_relative_eq!(bounds.y.min, -0.3, epsilon = 1e-12);
    assert_relative_eq!(bounds.y.max, 6.3, epsilon = 1e-12);
  }

  #[test]
  fn flat_data_has_visible_bounds() {
    let x = Column::new("x".into(), vec![0.0, 1.0, 2.0]);
    let y = Column::new("y".into(), vec![1.0, 1.0, 1.0]);

    let mut plot = Plot::new();
    plot.scatter(&x, &y);

    let bounds = plot.data_bounds().unwrap();
    assert!(bounds.y.size() > 0.0);
    assert!(bounds.y.contains(&1.0));
  }

  #[test]
  fn titles() {
    let mut plot = Plot::new();
    assert_eq!(plot.title, None);

    plot.title("Height against age").title("Height by age");
    plot.x.title("age");
    assert_eq!(plot.title.as_deref(), Some("Height by age"));
    assert_eq!(plot.x.title.as_deref(), Some("age"));
    assert_eq!(plot.y.title, None);
  }

  #[test]
  fn plot_error_keeps_its_source() {
    fn send_sync<E: std::error::Error + Send + Sync + 'static>(_: &E) {}

    let err = PlotError::from(PolarsError::ComputeError("not numeric".into()));
    send_sync(&err);

    let err = anyhow::Error::new(err).context("cannot show the plot");
    let chain = err.chain().map(|e| e.to_string()).collect::<Vec<_>>();
    assert_eq!(chain[0], "cannot show the plot");
    assert!(chain[1].starts_with("cannot plot column"));
    assert!(chain[2].contains("not numeric"));
  }

  #[test]
  fn axis_overrides() {
    let x = Column::new("x".into(), vec![1.0, 9.0]);
    let y = Column::new("y".into(), vec![5.0, 7.0]);

    let mut plot = Plot::new();
    plot.scatter(&x, &y);
    plot.x.min(0.0).max(10.0);
    plot.y.min(0.0);

    let bounds = plot.data_bounds().unwrap();
    assert_eq!(bounds.x, Range::new(0.0, 10.0));
    assert_eq!(bounds.y.min, 0.0);
    assert_relative_eq!(bounds.y.max, 7.1, epsilon = 1e-12);
  }
}
