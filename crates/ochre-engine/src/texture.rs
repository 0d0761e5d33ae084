//! GPU texture wrapper used by the sprite batch.

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::{Context, Result};

/// Identity of a texture, used for texture-slot equality inside a batch
/// segment.
///
/// Id 0 is reserved for the built-in 1×1 white texture the sprite renderer
/// substitutes for untextured primitives.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct TextureId(u64);

impl TextureId {
    pub(crate) const WHITE: TextureId = TextureId(0);
}

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

fn next_id() -> TextureId {
    TextureId(NEXT_ID.fetch_add(1, Ordering::Relaxed))
}

struct TextureGpu {
    // Held so the view stays valid for the texture's lifetime.
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
}

/// An immutable RGBA texture plus its sampled view.
pub struct Texture {
    id: TextureId,
    width: u32,
    height: u32,
    gpu: Option<TextureGpu>,
}

impl Texture {
    /// Decodes an encoded image (PNG, JPEG, …) and uploads it.
    pub fn from_encoded(device: &wgpu::Device, queue: &wgpu::Queue, bytes: &[u8]) -> Result<Self> {
        let image = image::load_from_memory(bytes)
            .context("failed to decode image")?
            .to_rgba8();
        let (width, height) = image.dimensions();
        Ok(Self::from_rgba(device, queue, width, height, image.as_raw()))
    }

    /// Reads and decodes an image file.
    pub fn from_file(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        path: impl AsRef<Path>,
    ) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .with_context(|| format!("failed to read texture file {}", path.display()))?;
        Self::from_encoded(device, queue, &bytes)
    }

    /// Uploads raw RGBA8 pixels (row-major, top row first).
    pub fn from_rgba(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        width: u32,
        height: u32,
        pixels: &[u8],
    ) -> Self {
        Self::upload(device, queue, next_id(), width, height, pixels)
    }

    /// The built-in 1×1 opaque white texture.
    pub(crate) fn white(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        Self::upload(device, queue, TextureId::WHITE, 1, 1, &[0xff; 4])
    }

    fn upload(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        id: TextureId,
        width: u32,
        height: u32,
        pixels: &[u8],
    ) -> Self {
        debug_assert_eq!(pixels.len(), (width * height * 4) as usize);

        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("ochre texture"),
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
            pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        Self {
            id,
            width,
            height,
            gpu: Some(TextureGpu {
                _texture: texture,
                view,
            }),
        }
    }

    /// Test-only texture with no GPU storage; the sprite renderer falls back
    /// to the white view for it.
    #[cfg(test)]
    pub(crate) fn headless(width: u32, height: u32) -> Self {
        Self {
            id: next_id(),
            width,
            height,
            gpu: None,
        }
    }

    #[inline]
    pub fn id(&self) -> TextureId {
        self.id
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub(crate) fn view(&self) -> Option<&wgpu::TextureView> {
        self.gpu.as_ref().map(|g| &g.view)
    }
}
