use std::borrow::Cow;

use kurbo::{Affine, BezPath, Line, Stroke};
use peniko::Brush;
use polars::prelude::*;

use crate::{Bounds, render::Render, theme};

pub struct LineAxes<'a> {
  x:       Cow<'a, Column>,
  y:       Cow<'a, Column>,
  options: LineOptions,
}

pub struct LineOptions {
  pub width: f64,
  pub color: Brush,
}

impl Default for LineOptions {
  fn default() -> Self {
    LineOptions { width: 2.0, color: Brush::Solid(theme::ROCKET.color(1.0)) }
  }
}

impl<'a> LineAxes<'a> {
  pub(crate) fn new(x: Cow<'a, Column>, y: Cow<'a, Column>) -> Self {
    LineAxes { x, y, options: LineOptions::default() }
  }

  pub(crate) fn data_bounds(&self) -> PolarsResult<Bounds> {
    super::column_bounds(&self.x, &self.y)
  }

  /// The first and last point, if the line has at least two.
  pub fn endpoints(&self) -> Option<Line> {
    let mut points = super::points(&self.x, &self.y);
    let first = points.next()?;
    let last = points.last()?;

    Some(Line::new(first, last))
  }

  pub(crate) fn draw(&self, render: &mut Render, transform: Affine) {
    let mut shape = BezPath::new();

    for (i, point) in super::points(&self.x, &self.y).enumerate() {
      if i == 0 {
        shape.move_to(point);
      } else {
        shape.line_to(point);
      }
    }

    let stroke = Stroke::new(self.options.width);
    render.stroke(&(transform * shape), Affine::IDENTITY, &self.options.color, &stroke);
  }
}
