use bytemuck::{NoUninit, bytes_of};
use lib_gpu::{
    AddressMode, BindGroup, BindGroupDescriptor, BindGroupEntry, BindGroupLayout,
    BindGroupLayoutDescriptor, BindGroupLayoutEntry, BindingResource, BindingType, BlendComponent,
    BlendFactor, BlendOperation, BlendState, Buffer, BufferBindingType, BufferDescriptor,
    BufferUsages, ColorTargetState, ColorWrites, CommandEncoderDescriptor, Device, Extent3d,
    FilterMode, FragmentState, FrontFace, LoadOp, MipmapFilterMode, MultisampleState, Operations,
    Origin3d, PipelineCompilationOptions, PipelineLayoutDescriptor, PolygonMode, PrimitiveState,
    PrimitiveTopology, Queue, RenderPassColorAttachment, RenderPassDescriptor, RenderPipeline,
    RenderPipelineDescriptor, Sampler, SamplerBindingType, SamplerDescriptor, ShaderStages,
    StoreOp, TexelCopyBufferLayout, TexelCopyTextureInfo, TextureAspect, TextureDescriptor,
    TextureDimension, TextureFormat, TextureSampleType, TextureUsages, TextureView,
    TextureViewDescriptor, TextureViewDimension, VertexState, include_wgsl,
};
use lib_math::{Color, Vec2, vec2};

use crate::{
    Quad, QuadBuffer, RenderBackend, RenderContext, Renderer, RendererConfig, Texture, TextureId,
};

/// [`RenderBackend`] drawing into `wgpu` texture views, usually the swapchain's.
///
/// The quad storage buffer follows the batch capacity up to the device's storage binding
/// limit. Larger batches are drawn in consecutive chunks.
#[derive(Debug)]
pub struct WgpuBackend {
    device: Device,
    queue: Queue,
    pipeline: RenderPipeline,
    frame_layout: BindGroupLayout,
    texture_layout: BindGroupLayout,
    sampler: Sampler,
    frame_uniform_buf: Buffer,
    quad_buf: QuadBuffer,
    max_quads: usize,
    frame_bind_group: BindGroup,
    textures: Vec<BindGroup>,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, NoUninit)]
struct FrameUniform {
    surface_size: Vec2,
    _pad: Vec2,
}

/// Straight alpha over, for both color and alpha channels.
const QUAD_BLEND: BlendComponent = BlendComponent {
    src_factor: BlendFactor::SrcAlpha,
    dst_factor: BlendFactor::OneMinusSrcAlpha,
    operation: BlendOperation::Add,
};

impl Renderer<WgpuBackend> {
    pub fn new(ctx: RenderContext<'_>, config: &RendererConfig) -> Self {
        Self::with_backend(WgpuBackend::new(ctx, config.batch_capacity), config)
    }
}

impl WgpuBackend {
    pub fn new(ctx: RenderContext<'_>, batch_capacity: usize) -> Self {
        let frame_uniform_buf = ctx.device.create_buffer(&BufferDescriptor {
            label: Some("lib_renderer frame uniform buffer"),
            size: size_of::<FrameUniform>() as u64,
            usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let max_quads = max_storage_quads(ctx.device);
        let quad_buf = QuadBuffer::new(batch_capacity.min(max_quads), ctx.device);

        let sampler = ctx.device.create_sampler(&SamplerDescriptor {
            label: Some("lib_renderer sampler"),
            address_mode_u: AddressMode::ClampToEdge,
            address_mode_v: AddressMode::ClampToEdge,
            address_mode_w: AddressMode::ClampToEdge,
            anisotropy_clamp: 1,
            border_color: None,
            compare: None,
            lod_max_clamp: 1.0,
            lod_min_clamp: 1.0,
            mag_filter: FilterMode::Nearest,
            min_filter: FilterMode::Nearest,
            mipmap_filter: MipmapFilterMode::Nearest,
        });

        let shader = ctx.device.create_shader_module(include_wgsl!("quad.wgsl"));

        let frame_layout = ctx
            .device
            .create_bind_group_layout(&BindGroupLayoutDescriptor {
                label: Some("lib_renderer frame bind group layout"),
                entries: &[
                    BindGroupLayoutEntry {
                        binding: 0,
                        ty: BindingType::Buffer {
                            ty: BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: None,
                        },
                        count: None,
                        visibility: ShaderStages::VERTEX | ShaderStages::FRAGMENT,
                    },
                    BindGroupLayoutEntry {
                        binding: 1,
                        ty: BindingType::Buffer {
                            ty: BufferBindingType::Storage { read_only: true },
                            has_dynamic_offset: false,
                            min_binding_size: None,
                        },
                        count: None,
                        visibility: ShaderStages::VERTEX,
                    },
                ],
            });

        let texture_layout = ctx
            .device
            .create_bind_group_layout(&BindGroupLayoutDescriptor {
                label: Some("lib_renderer texture bind group layout"),
                entries: &[
                    BindGroupLayoutEntry {
                        binding: 0,
                        ty: BindingType::Texture {
                            sample_type: TextureSampleType::Float { filterable: false },
                            view_dimension: TextureViewDimension::D2,
                            multisampled: false,
                        },
                        count: None,
                        visibility: ShaderStages::FRAGMENT,
                    },
                    BindGroupLayoutEntry {
                        binding: 1,
                        ty: BindingType::Sampler(SamplerBindingType::NonFiltering),
                        count: None,
                        visibility: ShaderStages::FRAGMENT,
                    },
                ],
            });

        let pipeline = ctx
            .device
            .create_render_pipeline(&RenderPipelineDescriptor {
                label: Some("lib_renderer quad pipeline"),
                cache: None,
                depth_stencil: None,
                layout: Some(
                    &ctx.device
                        .create_pipeline_layout(&PipelineLayoutDescriptor {
                            label: Some("lib_renderer quad pipeline layout"),
                            bind_group_layouts: &[&frame_layout, &texture_layout],
                            immediate_size: 0,
                        }),
                ),
                multiview_mask: None,
                primitive: PrimitiveState {
                    front_face: FrontFace::Ccw,
                    conservative: false,
                    cull_mode: None,
                    polygon_mode: PolygonMode::Fill,
                    strip_index_format: None,
                    topology: PrimitiveTopology::TriangleList,
                    unclipped_depth: false,
                },
                vertex: VertexState {
                    module: &shader,
                    entry_point: None,
                    compilation_options: PipelineCompilationOptions::default(),
                    buffers: &[],
                },
                fragment: Some(FragmentState {
                    module: &shader,
                    targets: &[Some(ColorTargetState {
                        blend: Some(BlendState {
                            color: QUAD_BLEND,
                            alpha: QUAD_BLEND,
                        }),
                        format: ctx.surface_format,
                        write_mask: ColorWrites::all(),
                    })],
                    entry_point: None,
                    compilation_options: PipelineCompilationOptions::default(),
                }),
                multisample: MultisampleState::default(),
            });

        let frame_bind_group =
            create_frame_bind_group(ctx.device, &frame_layout, &frame_uniform_buf, &quad_buf);

        Self {
            device: ctx.device.clone(),
            queue: ctx.queue.clone(),
            pipeline,
            frame_layout,
            texture_layout,
            sampler,
            frame_uniform_buf,
            quad_buf,
            max_quads,
            frame_bind_group,
            textures: Vec::new(),
        }
    }

    /// Capacity, in quads, of the GPU storage buffer.
    pub fn quad_buffer_capacity(&self) -> usize {
        self.quad_buf.capacity()
    }

    /// Most quads one draw can bind.
    pub fn max_quads_per_draw(&self) -> usize {
        self.max_quads
    }

    fn resize_quad_buffer(&mut self, capacity: usize) {
        log::debug!(
            "recreating quad storage buffer {} -> {}",
            self.quad_buf.capacity(),
            capacity
        );

        self.quad_buf = QuadBuffer::new(capacity, &self.device);
        self.frame_bind_group = create_frame_bind_group(
            &self.device,
            &self.frame_layout,
            &self.frame_uniform_buf,
            &self.quad_buf,
        );
    }
}

impl RenderBackend for WgpuBackend {
    type Target = TextureView;

    fn create_texture(&mut self, texture: &Texture, rgba: &[u8]) {
        debug_assert_eq!(texture.id().index(), self.textures.len());

        let gpu_texture = self.device.create_texture(&TextureDescriptor {
            label: Some("lib_renderer texture"),
            size: Extent3d {
                width: texture.width(),
                height: texture.height(),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: TextureDimension::D2,
            format: TextureFormat::Rgba8Unorm,
            usage: TextureUsages::TEXTURE_BINDING | TextureUsages::COPY_DST,
            view_formats: &[],
        });

        self.queue.write_texture(
            TexelCopyTextureInfo {
                texture: &gpu_texture,
                aspect: TextureAspect::All,
                mip_level: 0,
                origin: Origin3d::ZERO,
            },
            rgba,
            TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(texture.width() * 4),
                rows_per_image: Some(texture.height()),
            },
            gpu_texture.size(),
        );

        let bind_group = self.device.create_bind_group(&BindGroupDescriptor {
            label: Some("lib_renderer texture bind group"),
            layout: &self.texture_layout,
            entries: &[
                BindGroupEntry {
                    binding: 0,
                    resource: BindingResource::TextureView(
                        &gpu_texture.create_view(&TextureViewDescriptor::default()),
                    ),
                },
                BindGroupEntry {
                    binding: 1,
                    resource: BindingResource::Sampler(&self.sampler),
                },
            ],
        });

        self.textures.push(bind_group);
    }

    fn begin_frame(&mut self, target: &TextureView) {
        let uniform = FrameUniform {
            surface_size: vec2(
                target.texture().width() as f32,
                target.texture().height() as f32,
            ),
            _pad: Vec2::ZERO,
        };

        self.queue
            .write_buffer(&self.frame_uniform_buf, 0, bytes_of(&uniform));
    }

    fn clear(&mut self, target: &TextureView, color: Color) {
        let mut encoder = self
            .device
            .create_command_encoder(&CommandEncoderDescriptor::default());

        encoder.begin_render_pass(&RenderPassDescriptor {
            label: Some("lib_renderer clear pass"),
            color_attachments: &[Some(RenderPassColorAttachment {
                view: target,
                ops: Operations {
                    load: LoadOp::Clear(lib_gpu::Color {
                        r: color.r as f64,
                        g: color.g as f64,
                        b: color.b as f64,
                        a: color.a as f64,
                    }),
                    store: StoreOp::Store,
                },
                depth_slice: None,
                resolve_target: None,
            })],
            timestamp_writes: None,
            occlusion_query_set: None,
            depth_stencil_attachment: None,
            multiview_mask: None,
        });

        self.queue.submit([encoder.finish()]);
    }

    fn draw_batch(
        &mut self,
        target: &TextureView,
        texture: TextureId,
        quads: &[Quad],
        capacity: usize,
    ) {
        if texture.index() >= self.textures.len() {
            log::warn!("texture {} is not known to this renderer", texture.index());
            return;
        }

        let capacity = capacity.min(self.max_quads);
        if capacity != self.quad_buf.capacity() {
            self.resize_quad_buffer(capacity);
        }

        for chunk in quads.chunks(self.quad_buf.capacity()) {
            self.draw_chunk(target, texture, chunk);
        }
    }
}

impl WgpuBackend {
    fn draw_chunk(&self, target: &TextureView, texture: TextureId, quads: &[Quad]) {
        self.quad_buf.write(quads, &self.queue);

        let mut encoder = self
            .device
            .create_command_encoder(&CommandEncoderDescriptor::default());

        let mut pass = encoder.begin_render_pass(&RenderPassDescriptor {
            label: Some("lib_renderer quad pass"),
            color_attachments: &[Some(RenderPassColorAttachment {
                view: target,
                ops: Operations {
                    load: LoadOp::Load,
                    store: StoreOp::Store,
                },
                depth_slice: None,
                resolve_target: None,
            })],
            timestamp_writes: None,
            occlusion_query_set: None,
            depth_stencil_attachment: None,
            multiview_mask: None,
        });

        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.frame_bind_group, &[]);
        pass.set_bind_group(1, &self.textures[texture.index()], &[]);
        pass.draw(0..quads.len() as u32 * 6, 0..1);

        drop(pass);

        self.queue.submit([encoder.finish()]);
    }
}

fn max_storage_quads(device: &Device) -> usize {
    (device.limits().max_storage_buffer_binding_size as usize / size_of::<Quad>()).max(1)
}

fn create_frame_bind_group(
    device: &Device,
    layout: &BindGroupLayout,
    uniform_buf: &Buffer,
    quad_buf: &QuadBuffer,
) -> BindGroup {
    device.create_bind_group(&BindGroupDescriptor {
        label: Some("lib_renderer frame bind group"),
        layout,
        entries: &[
            BindGroupEntry {
                binding: 0,
                resource: uniform_buf.as_entire_binding(),
            },
            BindGroupEntry {
                binding: 1,
                resource: quad_buf.as_binding(),
            },
        ],
    })
}

#[cfg(test)]
mod tests {
    use lib_gpu::{
        Adapter, BackendOptions, Backends, DeviceDescriptor, Instance, InstanceDescriptor, Limits,
        NoopBackendOptions, RequestAdapterOptions,
    };
    use lib_math::Rect;

    use super::*;
    use crate::{FlushPolicy, FrameStats};

    fn noop_adapter() -> Adapter {
        let instance = Instance::new(&InstanceDescriptor {
            backends: Backends::NOOP,
            backend_options: BackendOptions {
                noop: NoopBackendOptions { enable: true },
                ..Default::default()
            },
            ..Default::default()
        });

        pollster::block_on(instance.request_adapter(&RequestAdapterOptions::default())).unwrap()
    }

    fn noop_device(limits: Limits) -> (Device, Queue) {
        pollster::block_on(noop_adapter().request_device(&DeviceDescriptor {
            required_limits: limits,
            ..Default::default()
        }))
        .unwrap()
    }

    fn target(device: &Device) -> TextureView {
        device
            .create_texture(&TextureDescriptor {
                label: None,
                size: Extent3d {
                    width: 64,
                    height: 64,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: TextureDimension::D2,
                format: TextureFormat::Rgba8Unorm,
                usage: TextureUsages::RENDER_ATTACHMENT,
                view_formats: &[],
            })
            .create_view(&TextureViewDescriptor::default())
    }

    fn draw_rects(
        device: &Device,
        queue: &Queue,
        batch_capacity: usize,
        count: usize,
    ) -> (Renderer, FrameStats) {
        let mut renderer = Renderer::new(
            RenderContext {
                device,
                queue,
                surface_format: TextureFormat::Rgba8Unorm,
            },
            &RendererConfig {
                batch_capacity,
                flush_policy: FlushPolicy::OnTextureChange,
            },
        );

        renderer.begin_frame(Some(target(device))).unwrap();
        for i in 0..count {
            renderer.draw_rect(Rect::new(i as f32, 0.0, 1.0, 1.0), Color::RED);
        }
        let stats = renderer.end_frame().unwrap();

        (renderer, stats)
    }

    #[test]
    fn storage_buffer_follows_batch_growth() {
        let (device, queue) = noop_device(Limits::default());

        let (renderer, stats) = draw_rects(&device, &queue, 4, 5);

        assert_eq!(renderer.batch().capacity(), 8);
        assert_eq!(renderer.backend().quad_buffer_capacity(), 8);
        assert_eq!(stats.draw_calls, 1);
        assert_eq!(stats.quads_drawn, 5);
    }

    #[test]
    fn storage_buffer_is_clamped_to_binding_limit() {
        let (device, queue) = noop_device(Limits {
            max_storage_buffer_binding_size: (4 * size_of::<Quad>()) as _,
            ..Limits::default()
        });

        let (renderer, stats) = draw_rects(&device, &queue, 2, 11);

        assert_eq!(renderer.batch().capacity(), 16);
        assert_eq!(renderer.backend().max_quads_per_draw(), 4);
        assert_eq!(renderer.backend().quad_buffer_capacity(), 4);
        assert_eq!(stats.quads_drawn, 11);
    }

    #[test]
    fn initial_capacity_above_limit_is_clamped() {
        let (device, queue) = noop_device(Limits {
            max_storage_buffer_binding_size: (4 * size_of::<Quad>()) as _,
            ..Limits::default()
        });

        let (renderer, _) = draw_rects(&device, &queue, 1024, 3);

        assert_eq!(renderer.backend().quad_buffer_capacity(), 4);
    }
}
