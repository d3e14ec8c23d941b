use kurbo::{Affine, Circle};
use peniko::Brush;
use polars::prelude::*;

use crate::{Bounds, render::Render, theme};

pub struct ScatterAxes<'a> {
  x:       &'a Column,
  y:       &'a Column,
  options: ScatterOptions,
}

pub struct ScatterOptions {
  pub size:  f64,
  pub color: Brush,
}

impl Default for ScatterOptions {
  fn default() -> Self {
    ScatterOptions { size: 5.0, color: Brush::Solid(theme::ROCKET.color(0.0)) }
  }
}

impl<'a> ScatterAxes<'a> {
  pub(crate) fn new(x: &'a Column, y: &'a Column) -> Self {
    ScatterAxes { x, y, options: ScatterOptions::default() }
  }

  pub(crate) fn data_bounds(&self) -> PolarsResult<Bounds> { super::column_bounds(self.x, self.y) }

  pub(crate) fn draw(&self, render: &mut Render, transform: Affine) {
    for point in super::points(self.x, self.y).map(|p| transform * p) {
      render.fill(&Circle::new(point, self.options.size), Affine::IDENTITY, &self.options.color);
    }
  }
}
