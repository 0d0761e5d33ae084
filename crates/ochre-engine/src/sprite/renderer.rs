use bytemuck::{Pod, Zeroable};

use crate::device::DEPTH_FORMAT;
use crate::render::{alpha_blend, RenderCtx, RenderTarget};
use crate::texture::Texture;

use super::batch::{SpriteBatch, SpriteVertex, TEXTURE_SLOTS};

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct SpriteUniforms {
    projection: [[f32; 4]; 4],
}

/// Sprite batch submitter.
///
/// Uploads the frame's accumulated vertices/indices once and issues exactly
/// one indexed draw call per sealed segment, binding that segment's texture
/// slots (unused slots fall back to the built-in white texture). GPU buffers
/// grow power-of-two as needed; segment bounds stay fixed on the CPU side.
#[derive(Default)]
pub struct SpriteRenderer {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,
    bind_group_layout: Option<wgpu::BindGroupLayout>,

    sampler: Option<wgpu::Sampler>,
    uniforms: Option<wgpu::Buffer>,
    white: Option<Texture>,

    vbo: Option<wgpu::Buffer>,
    vbo_capacity: usize,
    ibo: Option<wgpu::Buffer>,
    ibo_capacity: usize,
}

impl SpriteRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Device features the sprite shader's texture binding array requires.
    pub fn required_features() -> wgpu::Features {
        wgpu::Features::TEXTURE_BINDING_ARRAY
            | wgpu::Features::SAMPLED_TEXTURE_AND_STORAGE_BUFFER_ARRAY_NON_UNIFORM_INDEXING
    }

    /// Device limits raised for the texture binding array.
    pub fn required_limits() -> wgpu::Limits {
        let mut limits = wgpu::Limits::default();
        limits.max_binding_array_elements_per_shader_stage = TEXTURE_SLOTS as u32;
        limits
    }

    /// Submits a finished batch: one upload, then one indexed draw call per
    /// sealed segment, in order. No-op for a batch with no segments.
    pub fn draw(&mut self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>, batch: &SpriteBatch) {
        if batch.segments().is_empty() {
            return;
        }

        self.ensure_pipeline(ctx);
        self.ensure_static_resources(ctx);
        self.ensure_buffer_capacity(ctx, batch.vertices().len(), batch.indices().len());

        let (Some(pipeline), Some(layout), Some(sampler), Some(uniforms)) = (
            self.pipeline.as_ref(),
            self.bind_group_layout.as_ref(),
            self.sampler.as_ref(),
            self.uniforms.as_ref(),
        ) else {
            return;
        };
        let (Some(vbo), Some(ibo)) = (self.vbo.as_ref(), self.ibo.as_ref()) else {
            return;
        };
        let Some(white_view) = self.white.as_ref().and_then(Texture::view) else {
            return;
        };

        ctx.queue.write_buffer(
            uniforms,
            0,
            bytemuck::bytes_of(&SpriteUniforms {
                projection: batch.projection().to_cols_array_2d(),
            }),
        );
        ctx.queue
            .write_buffer(vbo, 0, bytemuck::cast_slice(batch.vertices()));
        ctx.queue
            .write_buffer(ibo, 0, bytemuck::cast_slice(batch.indices()));

        // One bind group per segment; slots the segment did not use are
        // bound to white.
        let bind_groups: Vec<wgpu::BindGroup> = batch
            .segments()
            .iter()
            .map(|segment| {
                let mut views: Vec<&wgpu::TextureView> = segment
                    .textures
                    .iter()
                    .map(|bound| {
                        bound
                            .texture
                            .as_deref()
                            .and_then(Texture::view)
                            .unwrap_or(white_view)
                    })
                    .collect();
                views.resize(TEXTURE_SLOTS, white_view);

                ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some("ochre sprite bind group"),
                    layout,
                    entries: &[
                        wgpu::BindGroupEntry {
                            binding: 0,
                            resource: uniforms.as_entire_binding(),
                        },
                        wgpu::BindGroupEntry {
                            binding: 1,
                            resource: wgpu::BindingResource::Sampler(sampler),
                        },
                        wgpu::BindGroupEntry {
                            binding: 2,
                            resource: wgpu::BindingResource::TextureViewArray(&views),
                        },
                    ],
                })
            })
            .collect();

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("ochre sprite pass"),
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

        rpass.set_pipeline(pipeline);
        rpass.set_vertex_buffer(0, vbo.slice(..));
        rpass.set_index_buffer(ibo.slice(..), wgpu::IndexFormat::Uint32);

        for (segment, bind_group) in batch.segments().iter().zip(&bind_groups) {
            rpass.set_bind_group(0, bind_group, &[]);
            rpass.draw_indexed(
                segment.index_start..segment.index_start + segment.index_count,
                0,
                0..1,
            );
        }
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("ochre sprite shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/sprite.wgsl").into()),
        });

        let bind_group_layout =
            ctx.device
                .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some("ochre sprite bgl"),
                    entries: &[
                        wgpu::BindGroupLayoutEntry {
                            binding: 0,
                            visibility: wgpu::ShaderStages::VERTEX,
                            ty: wgpu::BindingType::Buffer {
                                ty: wgpu::BufferBindingType::Uniform,
                                has_dynamic_offset: false,
                                min_binding_size: std::num::NonZeroU64::new(
                                    std::mem::size_of::<SpriteUniforms>() as u64,
                                ),
                            },
                            count: None,
                        },
                        wgpu::BindGroupLayoutEntry {
                            binding: 1,
                            visibility: wgpu::ShaderStages::FRAGMENT,
                            ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                            count: None,
                        },
                        wgpu::BindGroupLayoutEntry {
                            binding: 2,
                            visibility: wgpu::ShaderStages::FRAGMENT,
                            ty: wgpu::BindingType::Texture {
                                sample_type: wgpu::TextureSampleType::Float { filterable: true },
                                view_dimension: wgpu::TextureViewDimension::D2,
                                multisampled: false,
                            },
                            count: std::num::NonZeroU32::new(TEXTURE_SLOTS as u32),
                        },
                    ],
                });

        let pipeline_layout =
            ctx.device
                .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                    label: Some("ochre sprite pipeline layout"),
                    bind_group_layouts: &[&bind_group_layout],
                    immediate_size: 0,
                });

        let pipeline = ctx
            .device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("ochre sprite pipeline"),
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
                        format: ctx.surface_format,
                        blend: Some(alpha_blend()),
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

                depth_stencil: Some(wgpu::DepthStencilState {
                    format: DEPTH_FORMAT,
                    depth_write_enabled: true,
                    depth_compare: wgpu::CompareFunction::LessEqual,
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
                multisample: wgpu::MultisampleState::default(),
                multiview_mask: None,
                cache: None,
            });

        self.pipeline_format = Some(ctx.surface_format);
        self.pipeline = Some(pipeline);
        self.bind_group_layout = Some(bind_group_layout);
    }

    fn ensure_static_resources(&mut self, ctx: &RenderCtx<'_>) {
        if self.sampler.is_none() {
            self.sampler = Some(ctx.device.create_sampler(&wgpu::SamplerDescriptor {
                label: Some("ochre sprite sampler"),
                address_mode_u: wgpu::AddressMode::ClampToEdge,
                address_mode_v: wgpu::AddressMode::ClampToEdge,
                address_mode_w: wgpu::AddressMode::ClampToEdge,
                mag_filter: wgpu::FilterMode::Linear,
                min_filter: wgpu::FilterMode::Linear,
                mipmap_filter: wgpu::MipmapFilterMode::Nearest,
                ..Default::default()
            }));
        }

        if self.uniforms.is_none() {
            self.uniforms = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("ochre sprite uniforms"),
                size: std::mem::size_of::<SpriteUniforms>() as u64,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }));
        }

        if self.white.is_none() {
            self.white = Some(Texture::white(ctx.device, ctx.queue));
        }
    }

    fn ensure_buffer_capacity(&mut self, ctx: &RenderCtx<'_>, vertices: usize, indices: usize) {
        if vertices > self.vbo_capacity || self.vbo.is_none() {
            let new_cap = vertices.next_power_of_two().max(2048);
            self.vbo = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("ochre sprite vbo"),
                size: (new_cap * std::mem::size_of::<SpriteVertex>()) as u64,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }));
            self.vbo_capacity = new_cap;
        }

        if indices > self.ibo_capacity || self.ibo.is_none() {
            let new_cap = indices.next_power_of_two().max(4096);
            self.ibo = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("ochre sprite ibo"),
                size: (new_cap * std::mem::size_of::<u32>()) as u64,
                usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }));
            self.ibo_capacity = new_cap;
        }
    }
}

const VERTEX_ATTRS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
    0 => Float32x4, // position (xy, depth, slot)
    1 => Float32x4, // color
    2 => Float32x2  // texcoord
];

fn vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<SpriteVertex>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &VERTEX_ATTRS,
    }
}
