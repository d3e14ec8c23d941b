use color::{Oklch, OpaqueColor, Srgb};
use peniko::Color;

pub struct LinearPalette {
  start: OpaqueColor<Oklch>,
  end:   OpaqueColor<Oklch>,
}

pub const ROCKET: LinearPalette =
  LinearPalette::new(OpaqueColor::new([0.7, 0.13, 50.0]), OpaqueColor::new([0.7, 0.13, 290.0]));

pub const TEXT: Color = Color::from_rgb8(32, 32, 32);
pub const SPINE: Color = Color::from_rgb8(128, 128, 128);
pub const BACKGROUND: Color = Color::WHITE;

impl LinearPalette {
  pub const fn new(start: OpaqueColor<Oklch>, end: OpaqueColor<Oklch>) -> Self {
    Self { start, end }
  }

  pub fn sample(&self, t: f32) -> OpaqueColor<Oklch> {
    let t = t.clamp(0.0, 1.0);
    self.start.lerp(self.end, t, color::HueDirection::Shorter)
  }

  pub fn color(&self, t: f32) -> Color { self.sample(t).convert::<Srgb>().with_alpha(1.0) }
}
