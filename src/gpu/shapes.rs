use wgpu::{
    BindGroupLayout, BlendComponent, BlendState, Device, RenderPipeline, TextureFormat, TextureView,
};

use crate::gpu::buffers::{ShapeBuffers, ShapeInstance};
use crate::gpu::layer::LAYER_FORMAT;

/// Per-channel maximum. All traces share one colour, so overlapping segment
/// ends and vias keep the trace alpha instead of stacking it.
const MAX_BLEND: BlendState = BlendState {
    color: BlendComponent {
        src_factor: wgpu::BlendFactor::One,
        dst_factor: wgpu::BlendFactor::One,
        operation: wgpu::BlendOperation::Max,
    },
    alpha: BlendComponent {
        src_factor: wgpu::BlendFactor::One,
        dst_factor: wgpu::BlendFactor::One,
        operation: wgpu::BlendOperation::Max,
    },
};

/// Instanced shape drawing: traces into the layer texture, pulses onto the window
pub struct ShapeRenderer {
    bind_group_layout: BindGroupLayout,
    layer_pipeline: RenderPipeline,
    overlay_pipeline: RenderPipeline,
}

impl ShapeRenderer {
    pub fn new(device: &Device, surface_format: TextureFormat) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("shape-shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/shapes.wgsl").into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("shape-bind-group-layout"),
            entries: &[
                // View params
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("shape-pipeline-layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = |label: &str, format: TextureFormat, blend: BlendState| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    buffers: &[ShapeInstance::layout()],
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some("fs_main"),
                    targets: &[Some(wgpu::ColorTargetState {
                        format,
                        blend: Some(blend),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: Default::default(),
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
                multiview: None,
                cache: None,
            })
        };

        let layer_pipeline = pipeline("trace-layer-pipeline", LAYER_FORMAT, MAX_BLEND);
        let overlay_pipeline = pipeline(
            "pulse-overlay-pipeline",
            surface_format,
            BlendState::PREMULTIPLIED_ALPHA_BLENDING,
        );

        Self {
            bind_group_layout,
            layer_pipeline,
            overlay_pipeline,
        }
    }

    pub fn bind_group_layout(&self) -> &BindGroupLayout {
        &self.bind_group_layout
    }

    /// Clear `target` to transparent and draw the buffered traces into it
    pub fn render_layer(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        target: &TextureView,
        shapes: &ShapeBuffers,
    ) {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("trace-layer-pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        Self::draw(&mut pass, &self.layer_pipeline, shapes);
    }

    /// Draw the buffered pulses over whatever the pass already holds
    pub fn draw_overlay(&self, pass: &mut wgpu::RenderPass<'_>, shapes: &ShapeBuffers) {
        Self::draw(pass, &self.overlay_pipeline, shapes);
    }

    fn draw(pass: &mut wgpu::RenderPass<'_>, pipeline: &RenderPipeline, shapes: &ShapeBuffers) {
        let Some((instances, count)) = shapes.instances() else {
            return;
        };
        pass.set_pipeline(pipeline);
        pass.set_bind_group(0, &shapes.bind_group, &[]);
        pass.set_vertex_buffer(0, instances.slice(..));
        pass.draw(0..6, 0..count); // Two triangles per shape
    }
}
