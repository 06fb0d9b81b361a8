//! Texture loading and data structures.

use std::path::Path;

use anyhow::{Context, Result};

/// Texture data in CPU-friendly format before GPU upload.
#[derive(Clone, Debug, PartialEq)]
pub struct TextureData {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub format: TextureFormat,
}

/// Supported texture formats.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TextureFormat {
    Rgba8,
}

impl TextureData {
    /// Create a new texture with given dimensions and RGBA8 format.
    pub fn new_rgba8(width: u32, height: u32, data: Vec<u8>) -> Self {
        assert_eq!(
            data.len(),
            (width * height * 4) as usize,
            "Data size doesn't match RGBA8 format"
        );
        Self {
            data,
            width,
            height,
            format: TextureFormat::Rgba8,
        }
    }

    /// Load a texture from any image format the `image` crate was built with.
    ///
    /// Rows are flipped so that `v = 0` addresses the bottom of the picture,
    /// matching OBJ texture coordinates.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        log::info!("Loading texture from {:?}", path);

        let img = image::open(path)
            .with_context(|| format!("Failed to open image {}", path.display()))?
            .flipv();

        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        let data = rgba.into_raw();

        log::info!("Loaded texture {}x{} with {} bytes", width, height, data.len());

        Ok(Self::new_rgba8(width, height, data))
    }

    /// Like [`Self::load`], but logs the failure and returns `fallback` instead.
    pub fn load_or<P: AsRef<Path>>(path: P, fallback: impl FnOnce() -> Self) -> Self {
        match Self::load(path) {
            Ok(tex) => tex,
            Err(err) => {
                log::warn!("Failed to load texture: {err:#}");
                fallback()
            }
        }
    }

    /// Create a simple test texture (checkerboard pattern).
    pub fn create_test_texture(size: u32) -> Self {
        let mut data = Vec::with_capacity((size * size * 4) as usize);

        for y in 0..size {
            for x in 0..size {
                let checker = ((x / 8) + (y / 8)) % 2;
                if checker == 0 {
                    data.extend_from_slice(&[255, 255, 255, 255]);
                } else {
                    data.extend_from_slice(&[128, 128, 128, 255]);
                }
            }
        }

        Self::new_rgba8(size, size, data)
    }

    /// 1x1 opaque white; sampling it leaves vertex colors and lighting unchanged.
    pub fn white() -> Self {
        Self::new_rgba8(1, 1, vec![255; 4])
    }

    /// Get the number of bytes per pixel for the format.
    pub fn bytes_per_pixel(&self) -> u32 {
        match self.format {
            TextureFormat::Rgba8 => 4,
        }
    }

    /// Check if the texture data is valid.
    pub fn is_valid(&self) -> bool {
        let expected_size = (self.width * self.height * self.bytes_per_pixel()) as usize;
        self.data.len() == expected_size && self.width > 0 && self.height > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checkerboard_alternates_every_eight_pixels() {
        let tex = TextureData::create_test_texture(16);
        assert!(tex.is_valid());
        assert_eq!(&tex.data[0..4], &[255, 255, 255, 255]);
        let px = |x: usize, y: usize| &tex.data[(y * 16 + x) * 4..(y * 16 + x) * 4 + 4];
        assert_eq!(px(8, 0), &[128, 128, 128, 255]);
        assert_eq!(px(8, 8), &[255, 255, 255, 255]);
    }

    #[test]
    fn loaded_png_is_flipped_vertically() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("two_rows.png");
        let mut img = image::RgbaImage::new(1, 2);
        img.put_pixel(0, 0, image::Rgba([255, 0, 0, 255]));
        img.put_pixel(0, 1, image::Rgba([0, 0, 255, 255]));
        img.save(&path).unwrap();

        let tex = TextureData::load(&path).unwrap();
        assert_eq!((tex.width, tex.height), (1, 2));
        // The bottom (blue) row now comes first.
        assert_eq!(&tex.data[0..4], &[0, 0, 255, 255]);
        assert_eq!(&tex.data[4..8], &[255, 0, 0, 255]);
    }

    #[test]
    fn missing_texture_falls_back() {
        let tex = TextureData::load_or("no/such/texture.png", TextureData::white);
        assert_eq!(tex, TextureData::white());
    }
}
