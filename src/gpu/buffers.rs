use wgpu::{BindGroup, BindGroupLayout, Buffer, BufferUsages, Device, Queue};

/// Solid capsule; a disc when `start == end`
pub const SHAPE_CAPSULE: u32 = 0;
/// Disc filled from `color` at `inner_radius` to `outer_color` at `radius`
pub const SHAPE_RADIAL: u32 = 1;

/// Instance slots allocated up front, enough for a typical pulse pool
const INITIAL_CAPACITY: usize = 64;

/// One anti-aliased shape, drawn as an instanced quad (64 bytes, no padding holes)
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ShapeInstance {
    pub start: [f32; 2],
    pub end: [f32; 2],
    /// Premultiplied RGBA
    pub color: [f32; 4],
    /// Premultiplied RGBA at the rim of a radial shape
    pub outer_color: [f32; 4],
    /// Half the stroke width, or the outer radius
    pub radius: f32,
    pub inner_radius: f32,
    pub kind: u32,
    pub _padding: u32,
}

impl ShapeInstance {
    const ATTRIBUTES: [wgpu::VertexAttribute; 7] = wgpu::vertex_attr_array![
        0 => Float32x2,
        1 => Float32x2,
        2 => Float32x4,
        3 => Float32x4,
        4 => Float32,
        5 => Float32,
        6 => Uint32
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<ShapeInstance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Pixel size of the board the shapes were recorded against (16 bytes)
#[repr(C)]
#[derive(Clone, Copy, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ViewParams {
    pub width: f32,
    pub height: f32,
    pub _padding: [f32; 2],
}

/// Instance buffer plus view uniform for one batch of shapes
pub struct ShapeBuffers {
    label: &'static str,
    instances: Buffer,
    capacity: usize,
    count: u32,
    view_buffer: Buffer,
    pub bind_group: BindGroup,
}

impl ShapeBuffers {
    pub fn new(device: &Device, layout: &BindGroupLayout, label: &'static str) -> Self {
        let view_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("view-params-buffer"),
            size: std::mem::size_of::<ViewParams>() as u64,
            usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("shape-bind-group"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: view_buffer.as_entire_binding(),
            }],
        });

        Self {
            label,
            instances: Self::create_instance_buffer(device, label, INITIAL_CAPACITY),
            capacity: INITIAL_CAPACITY,
            count: 0,
            view_buffer,
            bind_group,
        }
    }

    fn create_instance_buffer(device: &Device, label: &str, capacity: usize) -> Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: (capacity * std::mem::size_of::<ShapeInstance>()) as u64,
            usage: BufferUsages::VERTEX | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    /// Replace the buffered shapes, growing the instance buffer if they no longer fit
    pub fn upload(
        &mut self,
        device: &Device,
        queue: &Queue,
        size: (u32, u32),
        shapes: &[ShapeInstance],
    ) {
        let capacity = grown_capacity(self.capacity, shapes.len());
        if capacity != self.capacity {
            log::debug!("Growing {} to {} shapes", self.label, capacity);
            self.instances = Self::create_instance_buffer(device, self.label, capacity);
            self.capacity = capacity;
        }

        let view = ViewParams {
            width: size.0.max(1) as f32,
            height: size.1.max(1) as f32,
            _padding: [0.0; 2],
        };
        queue.write_buffer(&self.view_buffer, 0, bytemuck::bytes_of(&view));
        if !shapes.is_empty() {
            queue.write_buffer(&self.instances, 0, bytemuck::cast_slice(shapes));
        }
        self.count = shapes.len() as u32;
    }

    /// The live part of the instance buffer, or None when there is nothing to draw
    pub fn instances(&self) -> Option<(&Buffer, u32)> {
        (self.count > 0).then_some((&self.instances, self.count))
    }
}

/// Capacity able to hold `needed` shapes; never shrinks
fn grown_capacity(current: usize, needed: usize) -> usize {
    if needed <= current {
        current
    } else {
        needed.next_power_of_two()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gpu_struct_sizes_match_shader() {
        assert_eq!(std::mem::size_of::<ShapeInstance>(), 64);
        assert_eq!(std::mem::size_of::<ViewParams>(), 16);
    }

    #[test]
    fn test_attribute_offsets_follow_fields() {
        let offsets: Vec<u64> = ShapeInstance::ATTRIBUTES.iter().map(|a| a.offset).collect();
        assert_eq!(offsets, vec![0, 8, 16, 32, 48, 52, 56]);
    }

    #[test]
    fn test_capacity_grows_to_power_of_two_and_never_shrinks() {
        assert_eq!(grown_capacity(64, 10), 64);
        assert_eq!(grown_capacity(64, 64), 64);
        assert_eq!(grown_capacity(64, 65), 128);
        assert_eq!(grown_capacity(64, 1000), 1024);
        assert_eq!(grown_capacity(1024, 3), 1024);
    }
}
