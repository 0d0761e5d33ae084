use bytemuck::{Pod, Zeroable};
use glam::Mat4;

use crate::device::DEPTH_FORMAT;
use crate::render::{alpha_blend, RenderCtx, RenderTarget};

use super::gizmos::{GizmoConfig, Gizmos};
use super::vertex::{GizmoVertex, LineSeg, Tri};

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct GizmoUniforms {
    view_proj: [[f32; 4]; 4],
}

/// Per-frame gizmo submitter.
///
/// GPU vertex buffers are allocated once, sized to the arena capacities, and
/// released together with the renderer; per frame only the used portion of
/// each arena is uploaded. Each nonempty buffer costs exactly one draw call,
/// issued in a fixed order: opaque lines, opaque triangles, transparent
/// triangles (2D: lines, then triangles).
///
/// Transparent triangles draw through a dedicated pipeline with alpha
/// blending on and depth writes off; the override is scoped to that pipeline,
/// so no state leaks into surrounding draws.
pub struct GizmoRenderer {
    uniforms_3d: wgpu::Buffer,
    bind_group_3d: wgpu::BindGroup,
    uniforms_2d: wgpu::Buffer,
    bind_group_2d: wgpu::BindGroup,

    line_pipeline: wgpu::RenderPipeline,
    tri_pipeline: wgpu::RenderPipeline,
    transparent_tri_pipeline: wgpu::RenderPipeline,
    line_2d_pipeline: wgpu::RenderPipeline,
    tri_2d_pipeline: wgpu::RenderPipeline,

    line_vbo: wgpu::Buffer,
    tri_vbo: wgpu::Buffer,
    transparent_tri_vbo: wgpu::Buffer,
    line_2d_vbo: wgpu::Buffer,
    tri_2d_vbo: wgpu::Buffer,
}

impl GizmoRenderer {
    /// Creates the shared shader, uniform bindings, pipelines and the
    /// fixed-capacity vertex buffers matching `config`.
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        config: &GizmoConfig,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("ochre gizmo shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/gizmo.wgsl").into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("ochre gizmo bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: std::num::NonZeroU64::new(
                        std::mem::size_of::<GizmoUniforms>() as u64,
                    ),
                },
                count: None,
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("ochre gizmo pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let depth_write = Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        });
        let depth_read_only = Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: false,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        });

        let make_pipeline = |label: &str,
                             topology: wgpu::PrimitiveTopology,
                             blend: Option<wgpu::BlendState>,
                             depth_stencil: Option<wgpu::DepthStencilState>| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(&pipeline_layout),

                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    compilation_options: Default::default(),
                    buffers: &[vertex_layout()],
                },

                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some("fs_main"),
                    compilation_options: Default::default(),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: surface_format,
                        blend,
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),

                primitive: wgpu::PrimitiveState {
                    topology,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    // Filled gizmo shapes emit both windings; never cull.
                    cull_mode: None,
                    polygon_mode: wgpu::PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },

                depth_stencil,
                multisample: wgpu::MultisampleState::default(),
                multiview_mask: None,
                cache: None,
            })
        };

        let line_pipeline = make_pipeline(
            "ochre gizmo lines",
            wgpu::PrimitiveTopology::LineList,
            None,
            depth_write.clone(),
        );
        let tri_pipeline = make_pipeline(
            "ochre gizmo tris",
            wgpu::PrimitiveTopology::TriangleList,
            None,
            depth_write,
        );
        let transparent_tri_pipeline = make_pipeline(
            "ochre gizmo transparent tris",
            wgpu::PrimitiveTopology::TriangleList,
            Some(alpha_blend()),
            depth_read_only,
        );
        let line_2d_pipeline = make_pipeline(
            "ochre gizmo 2d lines",
            wgpu::PrimitiveTopology::LineList,
            None,
            None,
        );
        let tri_2d_pipeline = make_pipeline(
            "ochre gizmo 2d tris",
            wgpu::PrimitiveTopology::TriangleList,
            Some(alpha_blend()),
            None,
        );

        let make_uniforms = |label: &str| {
            device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(label),
                size: std::mem::size_of::<GizmoUniforms>() as u64,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            })
        };
        let uniforms_3d = make_uniforms("ochre gizmo uniforms 3d");
        let uniforms_2d = make_uniforms("ochre gizmo uniforms 2d");

        let make_bind_group = |label: &str, buffer: &wgpu::Buffer| {
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(label),
                layout: &bind_group_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: buffer.as_entire_binding(),
                }],
            })
        };
        let bind_group_3d = make_bind_group("ochre gizmo bind group 3d", &uniforms_3d);
        let bind_group_2d = make_bind_group("ochre gizmo bind group 2d", &uniforms_2d);

        let make_vbo = |label: &str, size: usize| {
            device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(label),
                size: size.max(1) as u64,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            })
        };

        Self {
            uniforms_3d,
            bind_group_3d,
            uniforms_2d,
            bind_group_2d,
            line_pipeline,
            tri_pipeline,
            transparent_tri_pipeline,
            line_2d_pipeline,
            tri_2d_pipeline,
            line_vbo: make_vbo(
                "ochre gizmo lines vbo",
                config.max_lines * std::mem::size_of::<LineSeg>(),
            ),
            tri_vbo: make_vbo(
                "ochre gizmo tris vbo",
                config.max_tris * std::mem::size_of::<Tri>(),
            ),
            transparent_tri_vbo: make_vbo(
                "ochre gizmo transparent tris vbo",
                config.max_tris * std::mem::size_of::<Tri>(),
            ),
            line_2d_vbo: make_vbo(
                "ochre gizmo 2d lines vbo",
                config.max_2d_lines * std::mem::size_of::<LineSeg>(),
            ),
            tri_2d_vbo: make_vbo(
                "ochre gizmo 2d tris vbo",
                config.max_2d_tris * std::mem::size_of::<Tri>(),
            ),
        }
    }

    /// Draws the accumulated 3D buffers with a combined projection-view
    /// matrix. No-op when all three buffers are empty.
    pub fn draw(
        &self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        projection_view: Mat4,
        gizmos: &Gizmos,
    ) {
        if gizmos.is_empty_3d() {
            return;
        }

        ctx.queue.write_buffer(
            &self.uniforms_3d,
            0,
            bytemuck::bytes_of(&GizmoUniforms {
                view_proj: projection_view.to_cols_array_2d(),
            }),
        );

        if !gizmos.lines().is_empty() {
            ctx.queue
                .write_buffer(&self.line_vbo, 0, bytemuck::cast_slice(gizmos.lines().as_slice()));
        }
        if !gizmos.tris().is_empty() {
            ctx.queue
                .write_buffer(&self.tri_vbo, 0, bytemuck::cast_slice(gizmos.tris().as_slice()));
        }
        if !gizmos.transparent_tris().is_empty() {
            ctx.queue.write_buffer(
                &self.transparent_tri_vbo,
                0,
                bytemuck::cast_slice(gizmos.transparent_tris().as_slice()),
            );
        }

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("ochre gizmo pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: target.depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_bind_group(0, &self.bind_group_3d, &[]);

        // Opaque geometry first so the depth buffer can occlude the
        // transparent pass.
        if !gizmos.lines().is_empty() {
            rpass.set_pipeline(&self.line_pipeline);
            rpass.set_vertex_buffer(0, self.line_vbo.slice(..));
            rpass.draw(0..gizmos.lines().len() as u32 * 2, 0..1);
        }
        if !gizmos.tris().is_empty() {
            rpass.set_pipeline(&self.tri_pipeline);
            rpass.set_vertex_buffer(0, self.tri_vbo.slice(..));
            rpass.draw(0..gizmos.tris().len() as u32 * 3, 0..1);
        }
        if !gizmos.transparent_tris().is_empty() {
            rpass.set_pipeline(&self.transparent_tri_pipeline);
            rpass.set_vertex_buffer(0, self.transparent_tri_vbo.slice(..));
            rpass.draw(0..gizmos.transparent_tris().len() as u32 * 3, 0..1);
        }
    }

    /// Draws the accumulated 2D buffers with a screen-space orthographic
    /// projection. No-op when both buffers are empty.
    pub fn draw_2d(
        &self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        projection: Mat4,
        gizmos: &Gizmos,
    ) {
        if gizmos.is_empty_2d() {
            return;
        }

        ctx.queue.write_buffer(
            &self.uniforms_2d,
            0,
            bytemuck::bytes_of(&GizmoUniforms {
                view_proj: projection.to_cols_array_2d(),
            }),
        );

        if !gizmos.lines_2d().is_empty() {
            ctx.queue.write_buffer(
                &self.line_2d_vbo,
                0,
                bytemuck::cast_slice(gizmos.lines_2d().as_slice()),
            );
        }
        if !gizmos.tris_2d().is_empty() {
            ctx.queue.write_buffer(
                &self.tri_2d_vbo,
                0,
                bytemuck::cast_slice(gizmos.tris_2d().as_slice()),
            );
        }

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("ochre gizmo 2d pass"),
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

        rpass.set_bind_group(0, &self.bind_group_2d, &[]);

        if !gizmos.lines_2d().is_empty() {
            rpass.set_pipeline(&self.line_2d_pipeline);
            rpass.set_vertex_buffer(0, self.line_2d_vbo.slice(..));
            rpass.draw(0..gizmos.lines_2d().len() as u32 * 2, 0..1);
        }
        if !gizmos.tris_2d().is_empty() {
            rpass.set_pipeline(&self.tri_2d_pipeline);
            rpass.set_vertex_buffer(0, self.tri_2d_vbo.slice(..));
            rpass.draw(0..gizmos.tris_2d().len() as u32 * 3, 0..1);
        }
    }
}

const VERTEX_ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
    0 => Float32x4, // position
    1 => Float32x4  // color
];

fn vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<GizmoVertex>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &VERTEX_ATTRS,
    }
}
