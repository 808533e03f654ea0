//! Texture resource management for wgpu
//!
//! Depth buffers and sampled colour textures decoded from image files.

use std::path::Path;

use crate::error::{Result, SceneError};

/// GPU texture resource containing texture, view, and sampler
pub struct TextureResource {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
}

impl TextureResource {
    /// Standard depth buffer format used throughout the renderer
    pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

    /// Creates a depth texture matching the surface configuration
    pub fn create_depth_texture(
        device: &wgpu::Device,
        config: &wgpu::SurfaceConfiguration,
        label: &str,
    ) -> Self {
        let size = wgpu::Extent3d {
            width: config.width.max(1),
            height: config.height.max(1),
            depth_or_array_layers: 1,
        };

        let desc = wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[Self::DEPTH_FORMAT],
        };

        let texture = device.create_texture(&desc);
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            compare: Some(wgpu::CompareFunction::LessEqual),
            lod_min_clamp: 0.0,
            lod_max_clamp: 100.0,
            ..Default::default()
        });

        Self {
            texture,
            view,
            sampler,
        }
    }

    /// Creates a repeating sRGB texture from raw RGBA8 data.
    ///
    /// # Arguments
    /// * `data` - Raw RGBA8 pixel data (4 bytes per pixel), rows top to bottom
    /// * `filter_mode` - Texture filtering mode (Nearest for sharp, Linear for smooth)
    pub fn create_from_rgba_data_with_filter(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        data: &[u8],
        width: u32,
        height: u32,
        label: &str,
        filter_mode: wgpu::FilterMode,
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
            data,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(&format!("{} Sampler", label)),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: filter_mode,
            min_filter: filter_mode,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        Self {
            texture,
            view,
            sampler,
        }
    }

    /// Decodes an image file and uploads it with linear filtering.
    ///
    /// Images larger than the device's 2D texture limit are downscaled to fit.
    pub fn load_from_file(device: &wgpu::Device, queue: &wgpu::Queue, path: &Path) -> Result<Self> {
        let max_dim = device.limits().max_texture_dimension_2d;
        let rgba = fit_within(decode_rgba(path)?, max_dim, path);
        let (width, height) = rgba.dimensions();
        log::debug!("Loaded texture {} ({}x{})", path.display(), width, height);

        Ok(Self::create_from_rgba_data_with_filter(
            device,
            queue,
            &rgba,
            width,
            height,
            &path.display().to_string(),
            wgpu::FilterMode::Linear,
        ))
    }

    /// Like [`TextureResource::load_from_file`], but falls back to a 1x1 white
    /// texture when the file is missing or cannot be decoded.
    pub fn load_or_white(device: &wgpu::Device, queue: &wgpu::Queue, path: &Path) -> Self {
        match Self::load_from_file(device, queue, path) {
            Ok(texture) => texture,
            Err(err) => {
                log::warn!("{err}; using a white texture instead");
                Self::white(device, queue)
            }
        }
    }

    pub fn white(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        Self::create_from_rgba_data_with_filter(
            device,
            queue,
            &WHITE_PIXEL,
            1,
            1,
            "White Texture",
            wgpu::FilterMode::Nearest,
        )
    }
}

const WHITE_PIXEL: [u8; 4] = [255, 255, 255, 255];

fn decode_rgba(path: &Path) -> Result<image::RgbaImage> {
    let img = image::open(path).map_err(|source| SceneError::Texture {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(img.to_rgba8())
}

/// Shrinks `img` so neither side exceeds `max_dim`, keeping its aspect ratio.
fn fit_within(img: image::RgbaImage, max_dim: u32, path: &Path) -> image::RgbaImage {
    let (width, height) = img.dimensions();
    let longest = width.max(height);
    if longest <= max_dim || max_dim == 0 {
        return img;
    }

    let scaled = |side: u32| ((side as u64 * max_dim as u64 / longest as u64) as u32).max(1);
    let (new_width, new_height) = (scaled(width), scaled(height));
    log::warn!(
        "Texture {} is {}x{}, above the {} limit; downscaling to {}x{}",
        path.display(),
        width,
        height,
        max_dim,
        new_width,
        new_height
    );
    image::imageops::resize(&img, new_width, new_height, image::imageops::FilterType::Triangle)
}
