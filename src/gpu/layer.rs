use wgpu::{Device, Texture, TextureView};

/// Premultiplied, sRGB-encoded values stored as written
pub const LAYER_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

/// Offscreen target holding the static traces, redrawn only on regeneration
pub struct LayerTexture {
    texture: Texture,
    pub view: TextureView,
}

impl LayerTexture {
    pub fn new(device: &Device, width: u32, height: u32) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("trace-layer-texture"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: LAYER_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        Self { texture, view }
    }

    /// Whether the board size fits this texture as-is
    pub fn matches(&self, width: u32, height: u32) -> bool {
        self.texture.width() == width.max(1) && self.texture.height() == height.max(1)
    }
}
