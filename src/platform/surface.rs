//=========================================================================
// Wgpu Surface
//=========================================================================
//
// `GraphicsContext` backed by a wgpu swapchain on the winit window.
//
// Per frame:
//   clear()  ──► acquire surface texture, record a clear pass
//   swap()   ──► submit the encoder, present the texture
//
// Sprite renderers downcast the context to `WgpuSurface` and call
// `render_frame()` for the device, the tracked viewport and blend state,
// and the frame's encoder.
//
//   render_frame() ──► (RenderCtx, RenderTarget)
//
//=========================================================================

//=== External Dependencies ===============================================

use std::any::Any;
use std::sync::Arc;

use glam::Vec4;
use log::{debug, error, info, warn};
use winit::window::Window;

//=== Internal Dependencies ===============================================

use crate::core::graphics::GraphicsContext;
use crate::core::platform_bridge::PlatformError;

//=== Render Handles ======================================================

/// Device-side state a sprite renderer needs to build and feed its
/// pipeline.
pub struct RenderCtx<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    pub surface_format: wgpu::TextureFormat,
    /// Physical size of the surface texture.
    pub surface_size: (u32, u32),
    /// Last viewport set by the engine.
    pub viewport: (u32, u32),
    /// Whether alpha blending is enabled for this draw.
    pub blending: bool,
}

/// Where to record draws for the frame being built.
pub struct RenderTarget<'a> {
    pub encoder: &'a mut wgpu::CommandEncoder,
    pub color_view: &'a wgpu::TextureView,
}

//=== Frame ===============================================================

struct Frame {
    texture: wgpu::SurfaceTexture,
    view: wgpu::TextureView,
    encoder: wgpu::CommandEncoder,
}

//=== WgpuSurface =========================================================

pub struct WgpuSurface {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    frame: Option<Frame>,
    viewport: (u32, u32),
    blending: bool,
}

impl WgpuSurface {
    //--- Construction -----------------------------------------------------

    /// Creates the surface and acquires an adapter and device for it.
    pub fn new(window: Arc<Window>) -> Result<Self, PlatformError> {
        pollster::block_on(Self::create(window))
    }

    async fn create(window: Arc<Window>) -> Result<Self, PlatformError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(Arc::clone(&window))
            .map_err(|e| PlatformError::GraphicsContext(e.to_string()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| PlatformError::GraphicsLoader(e.to_string()))?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("stagehand device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
            })
            .await
            .map_err(|e| PlatformError::GraphicsLoader(e.to_string()))?;

        let caps = surface.get_capabilities(&adapter);
        let format = choose_surface_format(&caps).ok_or_else(|| {
            PlatformError::GraphicsContext("surface reports no supported formats".to_string())
        })?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        info!(
            target: "graphics",
            "Surface ready: {}x{} {:?} on {}",
            config.width,
            config.height,
            format,
            adapter.get_info().name
        );

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            frame: None,
            viewport: (size.width, size.height),
            blending: false,
        })
    }

    //--- Renderer Access --------------------------------------------------

    /// Handles for recording into the current frame. Acquires the frame if
    /// `clear()` has not. `None` when the surface texture is unavailable.
    pub fn render_frame(&mut self) -> Option<(RenderCtx<'_>, RenderTarget<'_>)> {
        self.acquire()?;
        let frame = self.frame.as_mut()?;

        let ctx = RenderCtx {
            device: &self.device,
            queue: &self.queue,
            surface_format: self.config.format,
            surface_size: (self.config.width, self.config.height),
            viewport: self.viewport,
            blending: self.blending,
        };
        let target = RenderTarget {
            encoder: &mut frame.encoder,
            color_view: &frame.view,
        };
        Some((ctx, target))
    }

    //--- Internal Helpers -------------------------------------------------

    /// Follows window size changes. A zero-sized window (minimised) keeps
    /// the previous configuration.
    fn sync_size(&mut self) {
        let size = self.window.inner_size();
        if size.width == 0 || size.height == 0 {
            return;
        }
        if (size.width, size.height) != (self.config.width, self.config.height) {
            self.config.width = size.width;
            self.config.height = size.height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    fn acquire(&mut self) -> Option<&mut Frame> {
        if self.frame.is_none() {
            let texture = match self.surface.get_current_texture() {
                Ok(texture) => texture,
                Err(e) => {
                    self.handle_surface_error(e);
                    return None;
                }
            };
            let view = texture
                .texture
                .create_view(&wgpu::TextureViewDescriptor::default());
            let encoder = self
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("stagehand frame encoder"),
                });
            self.frame = Some(Frame {
                texture,
                view,
                encoder,
            });
        }
        self.frame.as_mut()
    }

    fn handle_surface_error(&mut self, err: wgpu::SurfaceError) {
        match err {
            wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => {
                debug!(target: "graphics", "Surface {:?}, reconfiguring", err);
                self.surface.configure(&self.device, &self.config);
            }
            wgpu::SurfaceError::OutOfMemory => {
                error!(target: "graphics", "Surface out of memory, frame dropped");
            }
            wgpu::SurfaceError::Timeout | wgpu::SurfaceError::Other => {
                warn!(target: "graphics", "Surface {:?}, frame skipped", err);
            }
        }
    }
}

impl GraphicsContext for WgpuSurface {
    fn set_swap_interval(&mut self, vsync: bool) {
        self.config.present_mode = if vsync {
            wgpu::PresentMode::AutoVsync
        } else {
            wgpu::PresentMode::AutoNoVsync
        };
        self.surface.configure(&self.device, &self.config);
        debug!(target: "graphics", "Present mode {:?}", self.config.present_mode);
    }

    fn set_viewport(&mut self, width: u32, height: u32) {
        self.viewport = (width, height);
        self.sync_size();
    }

    fn clear(&mut self, color: Vec4) {
        let Some(frame) = self.acquire() else {
            return;
        };

        let _pass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("stagehand clear pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &frame.view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color {
                        r: color.x as f64,
                        g: color.y as f64,
                        b: color.z as f64,
                        a: color.w as f64,
                    }),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });
    }

    fn set_blending(&mut self, enabled: bool) {
        self.blending = enabled;
    }

    fn swap(&mut self) {
        let Some(frame) = self.frame.take() else {
            return;
        };
        self.queue.submit(std::iter::once(frame.encoder.finish()));
        drop(frame.view);
        frame.texture.present();
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

//=== Helpers =============================================================

fn choose_surface_format(caps: &wgpu::SurfaceCapabilities) -> Option<wgpu::TextureFormat> {
    let preferred = [
        wgpu::TextureFormat::Bgra8UnormSrgb,
        wgpu::TextureFormat::Rgba8UnormSrgb,
    ];
    preferred
        .into_iter()
        .find(|f| caps.formats.contains(f))
        .or_else(|| caps.formats.first().copied())
}
