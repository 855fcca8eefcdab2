//! GPU texture upload: PNG decode, raw RGBA, and procedural placeholders.
//!
//! Sampling is nearest-neighbor -- the art is low-resolution sprite sheets and
//! bilinear filtering would bleed neighboring frames into each other at the
//! frame rectangle edges.

use image::GenericImageView;

pub struct Texture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
    pub size: (u32, u32),
}

impl Texture {
    pub fn from_bytes(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        bytes: &[u8],
        label: &str,
    ) -> Self {
        let img = image::load_from_memory(bytes)
            .unwrap_or_else(|err| panic!("Failed to decode texture '{label}': {err}"));
        let (width, height) = img.dimensions();
        let rgba = img.to_rgba8();
        Self::from_rgba8(device, queue, &rgba, width, height, label)
    }

    pub fn from_rgba8(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        rgba: &[u8],
        width: u32,
        height: u32,
        label: &str,
    ) -> Self {
        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            rgba,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(label),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        Self {
            texture,
            view,
            sampler,
            size: (width, height),
        }
    }

    /// A checkerboard stand-in with the dimensions the real asset would have,
    /// so sheet layouts derived from texture size keep working when an asset
    /// file is missing.
    pub fn placeholder(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        width: u32,
        height: u32,
        tint: [u8; 3],
        label: &str,
    ) -> Self {
        let rgba = checkerboard_rgba(width, height, tint);
        Self::from_rgba8(device, queue, &rgba, width, height, label)
    }
}

fn checkerboard_rgba(width: u32, height: u32, tint: [u8; 3]) -> Vec<u8> {
    const CELL: u32 = 8;
    let mut rgba = Vec::with_capacity((width * height * 4) as usize);
    for y in 0..height {
        for x in 0..width {
            let dark = ((x / CELL) + (y / CELL)) % 2 == 0;
            let scale: u32 = if dark { 100 } else { 255 };
            rgba.push((tint[0] as u32 * scale / 255) as u8);
            rgba.push((tint[1] as u32 * scale / 255) as u8);
            rgba.push((tint[2] as u32 * scale / 255) as u8);
            rgba.push(255);
        }
    }
    rgba
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checkerboard_has_one_rgba_pixel_per_texel() {
        let data = checkerboard_rgba(16, 8, [255, 255, 255]);
        assert_eq!(data.len(), 16 * 8 * 4);
        // Alpha is fully opaque everywhere.
        assert!(data.chunks_exact(4).all(|px| px[3] == 255));
    }

    #[test]
    fn checkerboard_alternates_cells() {
        let data = checkerboard_rgba(16, 16, [255, 255, 255]);
        let px = |x: usize, y: usize| data[(y * 16 + x) * 4];
        // Adjacent 8x8 cells differ in brightness.
        assert_ne!(px(0, 0), px(8, 0));
        assert_ne!(px(0, 0), px(0, 8));
        assert_eq!(px(0, 0), px(8, 8));
    }
}
