//=========================================================================
// Quad Sprite
//=========================================================================
//
// Solid-colour rectangle drawn through the wgpu backend.
//
// render():
//   1. upload `model` to the shared sprite shader
//   2. read back `view` / `projection` (pushed by the engine's camera)
//   3. downcast the context to `WgpuSurface`, record one pass (LoadOp::Load)
//
// On any other backend only step 1 happens.
//
//=========================================================================

//=== External Dependencies ===============================================

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Quat, Vec2, Vec4};
use log::trace;

//=== Internal Dependencies ===============================================

use super::surface::{RenderCtx, RenderTarget, WgpuSurface};
use crate::core::graphics::{GraphicsContext, Shader, Sprite};

//=== Constants ===========================================================

const SHADER_SOURCE: &str = include_str!("../../resource/shaders/sprite.wgsl");

//=== QuadSprite ==========================================================

/// Axis-aligned (optionally rotated) coloured quad. Position is the
/// centre, in the camera's world units.
#[derive(Default)]
pub struct QuadSprite {
    pub position: Vec2,
    pub size: Vec2,
    /// Radians, counter-clockwise.
    pub rotation: f32,
    pub color: Vec4,
    pipeline: Option<QuadPipeline>,
}

impl QuadSprite {
    pub fn new(position: Vec2, size: Vec2, color: Vec4) -> Self {
        Self {
            position,
            size,
            rotation: 0.0,
            color,
            pipeline: None,
        }
    }

    pub fn model(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            self.size.extend(1.0),
            Quat::from_rotation_z(self.rotation),
            self.position.extend(0.0),
        )
    }

    //--- GPU Path ---------------------------------------------------------

    fn draw(&mut self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>, mvp: Mat4) {
        self.ensure_pipeline(ctx);
        let Some(pipeline) = self.pipeline.as_ref() else {
            return;
        };

        let uniform = QuadUniform {
            mvp: mvp.to_cols_array_2d(),
            color: self.color.to_array(),
        };
        ctx.queue
            .write_buffer(&pipeline.uniform, 0, bytemuck::bytes_of(&uniform));

        let mut pass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("stagehand quad pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        // The engine viewport is in window units; the surface may be larger
        // (HiDPI) but never smaller.
        let width = ctx.viewport.0.min(ctx.surface_size.0).max(1) as f32;
        let height = ctx.viewport.1.min(ctx.surface_size.1).max(1) as f32;
        pass.set_viewport(0.0, 0.0, width, height, 0.0, 1.0);

        pass.set_pipeline(&pipeline.pipeline);
        pass.set_bind_group(0, &pipeline.bind_group, &[]);
        pass.draw(0..6, 0..1);
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        let current = self
            .pipeline
            .as_ref()
            .is_some_and(|p| p.format == ctx.surface_format && p.blending == ctx.blending);
        if !current {
            self.pipeline = Some(QuadPipeline::new(ctx));
        }
    }
}

impl Sprite for QuadSprite {
    fn render(&mut self, gfx: &mut dyn GraphicsContext, shader: &mut dyn Shader) {
        let model = self.model();
        shader.set_matrix4("model", &model, true);

        let view = shader.matrix4("view").unwrap_or(Mat4::IDENTITY);
        let projection = shader.matrix4("projection").unwrap_or(Mat4::IDENTITY);

        let Some(surface) = gfx.as_any_mut().downcast_mut::<WgpuSurface>() else {
            trace!(target: "graphics", "QuadSprite: no wgpu surface, nothing recorded");
            return;
        };
        let Some((ctx, mut target)) = surface.render_frame() else {
            return;
        };
        self.draw(&ctx, &mut target, projection * view * model);
    }
}

//=== QuadPipeline ========================================================

struct QuadPipeline {
    format: wgpu::TextureFormat,
    blending: bool,
    pipeline: wgpu::RenderPipeline,
    uniform: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl QuadPipeline {
    fn new(ctx: &RenderCtx<'_>) -> Self {
        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("stagehand quad shader"),
            source: wgpu::ShaderSource::Wgsl(SHADER_SOURCE.into()),
        });

        let bind_group_layout = ctx
            .device
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("stagehand quad bgl"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: wgpu::BufferSize::new(
                            std::mem::size_of::<QuadUniform>() as u64,
                        ),
                    },
                    count: None,
                }],
            });

        let layout = ctx
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("stagehand quad pipeline layout"),
                bind_group_layouts: &[&bind_group_layout],
                immediate_size: 0,
            });

        let blend = ctx.blending.then_some(wgpu::BlendState::ALPHA_BLENDING);

        let pipeline = ctx
            .device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("stagehand quad pipeline"),
                layout: Some(&layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    compilation_options: Default::default(),
                    buffers: &[],
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some("fs_main"),
                    compilation_options: Default::default(),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: ctx.surface_format,
                        blend,
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: None,
                    polygon_mode: wgpu::PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },
                depth_stencil: None,
                multisample: wgpu::MultisampleState::default(),
                multiview_mask: None,
                cache: None,
            });

        let uniform = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("stagehand quad ubo"),
            size: std::mem::size_of::<QuadUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("stagehand quad bind group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform.as_entire_binding(),
            }],
        });

        Self {
            format: ctx.surface_format,
            blending: ctx.blending,
            pipeline,
            uniform,
            bind_group,
        }
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
struct QuadUniform {
    mvp: [[f32; 4]; 4],
    color: [f32; 4],
}

//=========================================================================
// Unit Tests
//=========================================================================
