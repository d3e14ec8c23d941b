use kurbo::Affine;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
  pub x: Range,
  pub y: Range,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Range {
  pub min: f64,
  pub max: f64,
}

impl Bounds {
  pub const fn empty() -> Self { Bounds { x: Range::empty(), y: Range::empty() } }
  pub const fn new(x: Range, y: Range) -> Self { Bounds { x, y } }

  pub const fn shrink(self, amount: f64) -> Self {
    Bounds { x: self.x.shrink(amount), y: self.y.shrink(amount) }
  }

  pub const fn expand_by(self, fract: f64) -> Self {
    Bounds { x: self.x.expand_by(fract), y: self.y.expand_by(fract) }
  }

  pub fn union(&self, other: Bounds) -> Bounds {
    Bounds { x: self.x.union(other.x), y: self.y.union(other.y) }
  }

  pub fn widen_degenerate(self) -> Self {
    Bounds { x: self.x.widen_degenerate(), y: self.y.widen_degenerate() }
  }

  /// Maps data coordinates onto `viewport`, which may have a flipped y axis.
  pub(crate) fn transform_to(&self, viewport: Bounds) -> Affine {
    let scale_x = viewport.x.size() / self.x.size();
    let scale_y = viewport.y.size() / self.y.size();
    let translate_x = viewport.x.min - self.x.min * scale_x;
    let translate_y = viewport.y.min - self.y.min * scale_y;

    Affine::new([scale_x, 0.0, 0.0, scale_y, translate_x, translate_y])
  }
}

impl Default for Range {
  fn default() -> Self { Range::empty() }
}

impl Range {
  /// The identity for [`Range::union`].
  pub const fn empty() -> Self { Range { min: f64::INFINITY, max: f64::NEG_INFINITY } }
  pub const fn new(min: f64, max: f64) -> Self { Range { min, max } }
  pub const fn size(&self) -> f64 { self.max - self.min }
  pub const fn is_empty(&self) -> bool { self.min > self.max }

  pub const fn shrink(self, amount: f64) -> Self { self.expand(-amount) }
  pub const fn expand(self, amount: f64) -> Self {
    Range {
      min: self.min - amount * self.size().signum(),
      max: self.max + amount * self.size().signum(),
    }
  }
  pub const fn expand_by(self, fract: f64) -> Self { self.expand(self.size() * fract) }

  pub const fn contains(&self, value: &f64) -> bool {
    (*value >= self.min && *value <= self.max) || (*value <= self.min && *value >= self.max)
  }

  pub fn union(&self, other: Range) -> Range {
    Range { min: self.min.min(other.min), max: self.max.max(other.max) }
  }

  /// Gives a range with no extent some room, so that it can be scaled onto the
  /// screen. An empty range becomes `0..1`.
  pub fn widen_degenerate(self) -> Self {
    if self.is_empty() {
      Range::new(0.0, 1.0)
    } else if self.size() == 0.0 {
      let pad = if self.min == 0.0 { 0.5 } else { self.min.abs() * 0.1 };
      Range::new(self.min - pad, self.max + pad)
    } else {
      self
    }
  }

  pub fn nice_ticks(&self, count: u32) -> NiceTicksIter {
    let step = (self.max - self.min) / f64::from(count);
    if !step.is_finite() || step <= 0.0 {
      return NiceTicksIter::new(0.0, -1.0, 1.0, 0);
    }

    let k = step.log10().floor();
    let base = step / 10f64.powf(k);

    let nice_base = match base {
      b if b < 1.0 => 1.0,
      b if b < 2.0 => 2.0,
      b if b < 2.5 => 2.5,
      b if b < 5.0 => 5.0,
      _ => 10.0,
    };

    let step = nice_base * 10f64.powf(k);
    let lo = (self.min / step).floor() * step;
    let hi = (self.max / step).ceil() * step;

    let precision = (-k as i32 + 4).max(0) as usize;
    NiceTicksIter::new(lo, hi, step, precision)
  }
}

pub struct NiceTicksIter {
  current:   f64,
  step:      f64,
  hi:        f64,
  precision: usize,
}

impl NiceTicksIter {
  fn new(lo: f64, hi: f64, step: f64, precision: usize) -> Self {
    NiceTicksIter { current: lo, step, hi, precision }
  }

  /// Number of decimals to print tick labels with.
  pub fn label_digits(&self) -> usize { self.precision.saturating_sub(3) }
}

impl Iterator for NiceTicksIter {
  type Item = f64;
  fn next(&mut self) -> Option<Self::Item> {
    if self.current < self.hi + self.step * 0.5 {
      let p = 10f64.powi(self.precision as i32);
      let result = (self.current * p).round() / p;
      self.current += self.step;
      Some(result)
    } else {
      None
    }
  }
}
