mod line;
mod scatter;

pub use line::LineAxes;
pub use scatter::ScatterAxes;

use std::borrow::Cow;

use kurbo::{Affine, Point};
use polars::prelude::*;

use crate::{Bounds, Plot, Range, ResultExt, render::Render};

pub enum Axes<'a> {
  Scatter(ScatterAxes<'a>),
  Line(LineAxes<'a>),
}

impl<'a> Plot<'a> {
  pub fn scatter(&mut self, x: &'a Column, y: &'a Column) -> &mut ScatterAxes<'a> {
    self.axes.push(Axes::Scatter(ScatterAxes::new(x, y)));
    match self.axes.last_mut().unwrap() {
      Axes::Scatter(sa) => sa,
      _ => unreachable!(),
    }
  }

  /// Adds a straight line from `start` to `end`.
  pub fn segment(&mut self, start: Point, end: Point) -> &mut LineAxes<'a> {
    let x = Column::new("x".into(), vec![start.x, end.x]);
    let y = Column::new("y".into(), vec![start.y, end.y]);

    self.axes.push(Axes::Line(LineAxes::new(Cow::Owned(x), Cow::Owned(y))));
    match self.axes.last_mut().unwrap() {
      Axes::Line(la) => la,
      _ => unreachable!(),
    }
  }
}

impl Axes<'_> {
  pub(crate) fn data_bounds(&self) -> PolarsResult<Bounds> {
    match self {
      Axes::Scatter(sa) => sa.data_bounds(),
      Axes::Line(la) => la.data_bounds(),
    }
  }

  pub(crate) fn draw(&self, render: &mut Render, transform: Affine) {
    match self {
      Axes::Scatter(sa) => sa.draw(render, transform),
      Axes::Line(la) => la.draw(render, transform),
    }
  }
}

fn column_range(column: &Column) -> PolarsResult<Range> {
  Ok(Range::new(
    column.min_reduce()?.into_value().try_extract::<f64>()?,
    column.max_reduce()?.into_value().try_extract::<f64>()?,
  ))
}

fn column_bounds(x: &Column, y: &Column) -> PolarsResult<Bounds> {
  Ok(Bounds::new(column_range(x)?, column_range(y)?))
}

/// Pairs up the rows of `x` and `y`, skipping rows that aren't numbers.
fn points<'b>(x: &'b Column, y: &'b Column) -> impl Iterator<Item = Point> + 'b {
  (0..x.len().min(y.len())).filter_map(move |i| {
    let x = x.get(i).and_then(|v| v.try_extract::<f64>()).log_err()?;
    let y = y.get(i).and_then(|v| v.try_extract::<f64>()).log_err()?;

    Some(Point::new(x, y))
  })
}
