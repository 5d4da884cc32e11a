//! Image decoding and texture upload.

use std::path::{Path, PathBuf};

use image::RgbaImage;
use wgpu::util::DeviceExt;

use crate::error::{Result, SeaglowError};
use crate::lighting::{IlluminationTable, LTC_TABLE_SIZE};

pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Decode any image the `image` crate understands into RGBA8
pub fn load_rgba<P: AsRef<Path>>(path: P) -> Result<RgbaImage> {
    let path = path.as_ref();
    let image = image::open(path).map_err(|e| SeaglowError::asset(path, e))?;
    Ok(image.to_rgba8())
}

/// Six square RGBA8 faces of equal size, packed layer after layer
#[derive(Debug, Clone)]
pub struct CubeFaces {
    pub size: u32,
    pub data: Vec<u8>,
}

impl CubeFaces {
    /// Check and pack already decoded faces (+X, -X, +Y, -Y, +Z, -Z)
    pub fn from_images(faces: &[RgbaImage; 6], names: &[PathBuf; 6]) -> Result<Self> {
        let size = faces[0].width();
        let mut data = Vec::with_capacity((size * size * 4 * 6) as usize);
        for (face, name) in faces.iter().zip(names) {
            if face.width() != face.height() || face.width() != size {
                return Err(SeaglowError::asset(
                    name,
                    format!(
                        "cube face is {}x{}, expected {}x{}",
                        face.width(),
                        face.height(),
                        size,
                        size
                    ),
                ));
            }
            data.extend_from_slice(face.as_raw());
        }
        if size == 0 {
            return Err(SeaglowError::asset(&names[0], "cube face is empty"));
        }
        Ok(Self { size, data })
    }

    pub fn load(paths: &[PathBuf; 6]) -> Result<Self> {
        let mut faces = Vec::with_capacity(6);
        for path in paths {
            faces.push(load_rgba(path)?);
        }
        let faces: [RgbaImage; 6] = faces
            .try_into()
            .map_err(|_| SeaglowError::asset(&paths[0], "expected six cube faces"))?;
        let cube = Self::from_images(&faces, paths)?;
        log::info!("Loaded sky cube map ({}x{} per face)", cube.size, cube.size);
        Ok(cube)
    }
}

/// Upload the sky faces as a cube texture view
pub fn create_cube_texture(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    faces: &CubeFaces,
) -> wgpu::TextureView {
    let texture = device.create_texture_with_data(
        queue,
        &wgpu::TextureDescriptor {
            label: Some("Sky Cube Texture"),
            size: wgpu::Extent3d {
                width: faces.size,
                height: faces.size,
                depth_or_array_layers: 6,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        },
        wgpu::util::TextureDataOrder::LayerMajor,
        &faces.data,
    );
    texture.create_view(&wgpu::TextureViewDescriptor {
        label: Some("Sky Cube View"),
        dimension: Some(wgpu::TextureViewDimension::Cube),
        array_layer_count: Some(6),
        ..Default::default()
    })
}

/// Upload an RGBA8 image as a 2D sRGB texture view
pub fn create_rgba_texture(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    label: &str,
    width: u32,
    height: u32,
    pixels: &[u8],
) -> wgpu::TextureView {
    let texture = device.create_texture_with_data(
        queue,
        &wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        },
        wgpu::util::TextureDataOrder::LayerMajor,
        pixels,
    );
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

/// Upload one illumination table as a 64x64 `Rgba32Float` texture view
pub fn create_table_texture(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    label: &str,
    table: &IlluminationTable,
) -> wgpu::TextureView {
    let texture = device.create_texture_with_data(
        queue,
        &wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width: LTC_TABLE_SIZE,
                height: LTC_TABLE_SIZE,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba32Float,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        },
        wgpu::util::TextureDataOrder::LayerMajor,
        table.as_bytes(),
    );
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

/// Depth attachment sized to the surface
pub struct DepthBuffer {
    pub view: wgpu::TextureView,
}

impl DepthBuffer {
    pub fn new(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Depth Texture"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self { view }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names() -> [PathBuf; 6] {
        crate::params::AssetPaths::default().skybox_faces()
    }

    fn face(size: u32, shade: u8) -> RgbaImage {
        RgbaImage::from_pixel(size, size, image::Rgba([shade, shade, shade, 255]))
    }

    #[test]
    fn test_cube_faces_pack_in_layer_order() {
        let faces = [0u8, 1, 2, 3, 4, 5].map(|i| face(4, i * 10));
        let cube = CubeFaces::from_images(&faces, &names()).unwrap();
        assert_eq!(cube.size, 4);
        assert_eq!(cube.data.len(), 4 * 4 * 4 * 6);
        let layer = 4 * 4 * 4;
        assert_eq!(cube.data[0], 0);
        assert_eq!(cube.data[layer * 3], 30);
        assert_eq!(cube.data[layer * 5 + 7], 255);
    }

    #[test]
    fn test_mismatched_faces_are_rejected() {
        let mut faces = [0u8; 6].map(|_| face(4, 0));
        faces[2] = face(8, 0);
        let err = CubeFaces::from_images(&faces, &names()).unwrap_err();
        assert!(matches!(err, SeaglowError::AssetLoad { .. }));
        assert!(err.to_string().contains("posy.png"));

        faces[2] = RgbaImage::new(4, 2);
        assert!(CubeFaces::from_images(&faces, &names()).is_err());
    }

    #[test]
    fn test_missing_face_is_asset_failure() {
        let err = CubeFaces::load(&names()).unwrap_err();
        assert!(!err.is_fatal());
    }
}
