use kurbo::{Affine, Point, Shape, Size, Stroke, Vec2};
use parley::{Alignment, FontWeight, Layout, PositionedLayoutItem, StyleProperty};
use peniko::{Brush, BrushRef, Color, Fill};
use vello::wgpu::{self, TextureDescriptor};

pub(crate) mod window;

/// A scene being built for one frame, plus the text shaping state that
/// outlives it.
pub(crate) struct Render {
  scene:  vello::Scene,
  font:   parley::FontContext,
  layout: parley::LayoutContext<Brush>,

  /// Logical pixels to physical pixels.
  scale: f64,
  size:  Size,

  pub background: Color,
}

pub(crate) struct GpuHandle {
  pub device: wgpu::Device,
  pub queue:  wgpu::Queue,
  /// The texture vello renders into, before it gets copied to the window.
  pub view:   wgpu::TextureView,
}

pub(crate) struct RenderConfig {
  pub width:  u32,
  pub height: u32,
}

#[derive(Clone, Copy)]
pub(crate) enum Align {
  Start,
  Center,
  End,
}

pub(crate) struct DrawText<'a> {
  pub text:             &'a str,
  pub size:             f32,
  pub weight:           FontWeight,
  pub brush:            Brush,
  pub position:         Point,
  /// Applied around `position`, after alignment.
  pub transform:        Affine,
  pub horizontal_align: Align,
  pub vertical_align:   Align,
}

impl Default for DrawText<'_> {
  fn default() -> Self {
    DrawText {
      text:             "",
      size:             16.0,
      weight:           FontWeight::NORMAL,
      brush:            Brush::Solid(Color::BLACK),
      position:         Point::ZERO,
      transform:        Affine::IDENTITY,
      horizontal_align: Align::Start,
      vertical_align:   Align::Start,
    }
  }
}

impl Render {
  pub fn new(background: Color) -> Self {
    Render {
      scene:  vello::Scene::new(),
      font:   parley::FontContext::new(),
      layout: parley::LayoutContext::new(),
      scale:  1.0,
      size:   Size::ZERO,
      background,
    }
  }

  pub fn scene(&self) -> &vello::Scene { &self.scene }

  /// Clears the scene and sets up the physical size and scale factor of the
  /// next frame.
  pub fn begin(&mut self, config: &RenderConfig, scale: f64) {
    self.scene.reset();
    self.scale = scale;
    self.size = Size::new(f64::from(config.width) / scale, f64::from(config.height) / scale);
  }

  /// Size of the frame in logical pixels.
  pub fn size(&self) -> Size { self.size }

  pub fn fill<'b>(
    &mut self,
    shape: &impl Shape,
    transform: Affine,
    brush: impl Into<BrushRef<'b>>,
  ) {
    self.scene.fill(Fill::NonZero, self.base() * transform, brush, None, shape);
  }

  pub fn stroke<'b>(
    &mut self,
    shape: &impl Shape,
    transform: Affine,
    brush: impl Into<BrushRef<'b>>,
    stroke: &Stroke,
  ) {
    self.scene.stroke(stroke, self.base() * transform, brush, None, shape);
  }

  pub fn draw_text(&mut self, text: DrawText) {
    let layout = self.layout_text(&text);
    self.draw_text_layout(layout, text);
  }

  pub fn layout_text(&mut self, text: &DrawText) -> Layout<Brush> {
    let mut builder = self.layout.ranged_builder(&mut self.font, text.text, 1.0, true);

    builder.push_default(StyleProperty::FontSize(text.size));
    builder.push_default(StyleProperty::FontWeight(text.weight));
    builder.push_default(StyleProperty::Brush(text.brush.clone()));

    let mut layout = builder.build(text.text);
    layout.break_all_lines(None);
    layout.align(None, Alignment::Start, Default::default());
    layout
  }

  pub fn draw_text_layout(&mut self, layout: Layout<Brush>, text: DrawText) {
    let offset = Vec2::new(
      text.horizontal_align.offset(f64::from(layout.width())),
      text.vertical_align.offset(f64::from(layout.height())),
    );
    let transform = self.base()
      * Affine::translate(text.position.to_vec2())
      * text.transform
      * Affine::translate(offset);

    for line in layout.lines() {
      for item in line.items() {
        let PositionedLayoutItem::GlyphRun(glyph_run) = item else { continue };

        let run = glyph_run.run();
        let mut x = glyph_run.offset();
        let baseline = glyph_run.baseline();

        self
          .scene
          .draw_glyphs(run.font())
          .brush(&glyph_run.style().brush)
          .hint(false)
          .transform(transform)
          .glyph_transform(
            run.synthesis().skew().map(|angle| Affine::skew(angle.to_radians().tan() as f64, 0.0)),
          )
          .font_size(run.font_size())
          .normalized_coords(run.normalized_coords())
          .draw(
            Fill::NonZero,
            glyph_run.glyphs().map(|glyph| {
              let gx = x + glyph.x;
              let gy = baseline + glyph.y;
              x += glyph.advance;
              vello::Glyph { id: glyph.id.into(), x: gx, y: gy }
            }),
          );
      }
    }
  }

  fn base(&self) -> Affine { Affine::scale(self.scale) }
}

impl Align {
  /// Offset of the start of a box of `size`, relative to its anchor.
  fn offset(self, size: f64) -> f64 {
    match self {
      Align::Start => 0.0,
      Align::Center => -size / 2.0,
      Align::End => -size,
    }
  }
}

impl GpuHandle {
  pub fn new(
    config: &RenderConfig,
    adapter: &wgpu::Adapter,
  ) -> Result<Self, wgpu::RequestDeviceError> {
    let (device, queue) = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
      label:             None,
      required_features: wgpu::Features::empty(),
      required_limits:   wgpu::Limits::default(),
      memory_hints:      wgpu::MemoryHints::MemoryUsage,
      trace:             wgpu::Trace::Off,
    }))?;

    let view = create_target(&device, config);

    Ok(GpuHandle { device, queue, view })
  }

  pub fn resize(&mut self, config: &RenderConfig) {
    self.view = create_target(&self.device, config);
  }
}

fn create_target(device: &wgpu::Device, config: &RenderConfig) -> wgpu::TextureView {
  let texture = device.create_texture(&TextureDescriptor {
    label:           Some("Render Texture"),
    size:            config.extent_3d(),
    mip_level_count: 1,
    sample_count:    1,
    dimension:       wgpu::TextureDimension::D2,
    format:          wgpu::TextureFormat::Rgba8Unorm,
    usage:           wgpu::TextureUsages::STORAGE_BINDING
      | wgpu::TextureUsages::TEXTURE_BINDING
      | wgpu::TextureUsages::COPY_SRC,
    view_formats:    &[],
  });
  texture.create_view(&wgpu::TextureViewDescriptor::default())
}

impl RenderConfig {
  fn extent_3d(&self) -> wgpu::Extent3d {
    wgpu::Extent3d {
      width:                 self.width,
      height:                self.height,
      depth_or_array_layers: 1,
    }
  }
}
