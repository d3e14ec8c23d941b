use std::sync::Arc;

use tracing::{info, warn};
use vello::wgpu;
use winit::{
  application::ApplicationHandler,
  dpi::LogicalSize,
  event::{KeyEvent, WindowEvent},
  event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
  keyboard::Key,
  window::{Window, WindowId},
};

use crate::{
  Bounds, Plot, PlotError,
  render::{GpuHandle, Render, RenderConfig},
  theme,
};

/// Opens a window showing `plot`, and blocks until it is closed.
pub(crate) fn show(plot: &Plot, bounds: Bounds) -> Result<(), PlotError> {
  let event_loop = EventLoop::new()?;
  event_loop.set_control_flow(ControlFlow::Wait);

  let render = Render::new(theme::BACKGROUND);
  let mut app = App { plot, bounds, render, init: None, error: None };
  event_loop.run_app(&mut app)?;
  info!("viewer closed");

  match app.error.take() {
    Some(err) => Err(err),
    None => Ok(()),
  }
}

struct App<'a> {
  plot:   &'a Plot<'a>,
  bounds: Bounds,
  render: Render,

  init:  Option<Init>,
  error: Option<PlotError>,
}

// Fields drop in declaration order, and the surface must go before the window
// it was created from.
struct Init {
  surface: wgpu::Surface<'static>,
  config:  wgpu::SurfaceConfiguration,
  handle:  GpuHandle,

  blit:  wgpu::util::TextureBlitter,
  vello: vello::Renderer,
  stale: bool,

  window: Arc<Window>,
}

impl ApplicationHandler for App<'_> {
  fn resumed(&mut self, event_loop: &ActiveEventLoop) {
    if self.init.is_some() {
      return;
    }

    match Init::new(event_loop) {
      Ok(init) => {
        info!(width = init.config.width, height = init.config.height, "viewer opened");
        self.init = Some(init);
      }
      Err(err) => {
        self.error = Some(err);
        event_loop.exit();
      }
    }
  }

  fn window_event(&mut self, event_loop: &ActiveEventLoop, _: WindowId, event: WindowEvent) {
    match event {
      WindowEvent::CloseRequested => {
        event_loop.exit();
      }

      WindowEvent::KeyboardInput {
        event: KeyEvent { logical_key: Key::Character(c), .. }, ..
      } if c == "q" => {
        event_loop.exit();
      }

      WindowEvent::Resized(new_size) => {
        if let Some(init) = &mut self.init {
          if new_size.width > 0 && new_size.height > 0 {
            init.config.width = new_size.width;
            init.config.height = new_size.height;
            init
              .handle
              .resize(&RenderConfig { width: init.config.width, height: init.config.height });
            init.surface.configure(&init.handle.device, &init.config);

            init.stale = true;
            init.window.request_redraw();
          }
        }
      }

      WindowEvent::RedrawRequested => {
        if let Some(init) = &mut self.init {
          if init.stale {
            if let Err(err) = init.draw(&mut self.render, self.plot, self.bounds) {
              self.error = Some(err);
              event_loop.exit();
              return;
            }
          }
          init.present();
        }
      }

      _ => (),
    }
  }

  fn exiting(&mut self, _: &ActiveEventLoop) {
    // The window has to go while the event loop is still alive.
    self.init = None;
  }
}

impl Init {
  fn new(event_loop: &ActiveEventLoop) -> Result<Self, PlotError> {
    let window = Arc::new(
      event_loop.create_window(
        Window::default_attributes()
          .with_title("fitplot")
          .with_inner_size(LogicalSize::new(1000, 1000))
          .with_min_inner_size(LogicalSize::new(100, 100)),
      )?,
    );
    let size = window.inner_size();

    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
    let surface = instance.create_surface(window.clone())?;

    let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
      compatible_surface: Some(&surface),
      ..Default::default()
    }))?;

    // vello renders linear rgba8, which is blitted as-is.
    let surface_caps = surface.get_capabilities(&adapter);
    let surface_format = surface_caps
      .formats
      .iter()
      .copied()
      .find(|f| !f.is_srgb())
      .unwrap_or(surface_caps.formats[0]);

    let config = wgpu::SurfaceConfiguration {
      usage:                         wgpu::TextureUsages::RENDER_ATTACHMENT
        | wgpu::TextureUsages::COPY_DST,
      format:                        surface_format,
      width:                         size.width.max(1),
      height:                        size.height.max(1),
      present_mode:                  wgpu::PresentMode::AutoVsync,
      alpha_mode:                    surface_caps.alpha_modes[0],
      view_formats:                  vec![],
      desired_maximum_frame_latency: 2,
    };

    let handle =
      GpuHandle::new(&RenderConfig { width: config.width, height: config.height }, &adapter)?;
    surface.configure(&handle.device, &config);

    let vello = vello::Renderer::new(&handle.device, vello::RendererOptions::default())?;
    let blit = wgpu::util::TextureBlitter::new(&handle.device, config.format);

    Ok(Init { surface, config, handle, blit, vello, stale: true, window })
  }

  /// Rebuilds the scene and renders it into the offscreen texture.
  fn draw(&mut self, render: &mut Render, plot: &Plot, bounds: Bounds) -> Result<(), PlotError> {
    let config = RenderConfig { width: self.config.width, height: self.config.height };
    render.begin(&config, self.window.scale_factor());
    plot.draw(render, bounds);

    self.vello.render_to_texture(
      &self.handle.device,
      &self.handle.queue,
      render.scene(),
      &self.handle.view,
      &vello::RenderParams {
        base_color:          render.background,
        width:               config.width,
        height:              config.height,
        antialiasing_method: vello::AaConfig::Msaa16,
      },
    )?;

    self.stale = false;
    Ok(())
  }

  fn present(&mut self) {
    let frame = match self.surface.get_current_texture() {
      Ok(frame) => frame,
      Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
        self.surface.configure(&self.handle.device, &self.config);
        self.window.request_redraw();
        return;
      }
      Err(e) => {
        warn!("dropped frame: {e}");
        return;
      }
    };

    let surface_view = frame.texture.create_view(&wgpu::TextureViewDescriptor::default());

    let mut encoder = self
      .handle
      .device
      .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: Some("Render Encoder") });

    self.blit.copy(&self.handle.device, &mut encoder, &self.handle.view, &surface_view);

    self.handle.queue.submit(std::iter::once(encoder.finish()));

    self.window.pre_present_notify();
    frame.present();
  }
}
