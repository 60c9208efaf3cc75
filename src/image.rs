use crate::error::{DemoError, Result};
use gl::types::GLenum;
use stb_image::image::LoadResult;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    Red,
    Rgb,
    Rgba,
}

impl PixelFormat {
    pub fn from_channels(channels: usize) -> Result<Self> {
        match channels {
            1 => Ok(PixelFormat::Red),
            3 => Ok(PixelFormat::Rgb),
            4 => Ok(PixelFormat::Rgba),
            n => Err(DemoError::PixelFormat(n)),
        }
    }

    pub fn gl_format(&self) -> GLenum {
        match self {
            PixelFormat::Red => gl::RED,
            PixelFormat::Rgb => gl::RGB,
            PixelFormat::Rgba => gl::RGBA,
        }
    }
}

/// Decoded 8-bit image, rows stored bottom-up when loaded with `flip`.
pub struct Image {
    pub width: usize,
    pub height: usize,
    pub format: PixelFormat,
    pub data: Vec<u8>,
}

impl Image {
    pub fn load(path: impl AsRef<Path>, flip: bool) -> Result<Self> {
        let path = path.as_ref();
        let image = match stb_image::image::load(path) {
            LoadResult::ImageU8(image) => image,
            LoadResult::ImageF32(_) => {
                return Err(DemoError::Image {
                    path: path.to_path_buf(),
                    reason: "HDR images are not supported".to_string(),
                })
            }
            LoadResult::Error(reason) => {
                return Err(DemoError::Image {
                    path: path.to_path_buf(),
                    reason,
                })
            }
        };

        let format = PixelFormat::from_channels(image.depth)?;
        let mut data = image.data;
        if flip {
            flip_vertically(&mut data, image.width, image.height, image.depth);
        }
        log::debug!(
            "Loaded {} ({}x{}, {:?})",
            path.display(),
            image.width,
            image.height,
            format
        );

        Ok(Self {
            width: image.width,
            height: image.height,
            format,
            data,
        })
    }
}

/// Swaps rows in place so the first row becomes the last. OpenGL expects
/// texture data starting at the bottom-left corner.
pub fn flip_vertically(data: &mut [u8], width: usize, height: usize, channels: usize) {
    let row_len = width * channels;
    assert_eq!(data.len(), row_len * height, "Image data size mismatch");
    for row in 0..height / 2 {
        let (top, bottom) = data.split_at_mut((height - row - 1) * row_len);
        top[row * row_len..(row + 1) * row_len].swap_with_slice(&mut bottom[..row_len]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_count_selects_format() {
        assert_eq!(PixelFormat::from_channels(1).unwrap(), PixelFormat::Red);
        assert_eq!(PixelFormat::from_channels(3).unwrap().gl_format(), gl::RGB);
        assert_eq!(PixelFormat::from_channels(4).unwrap().gl_format(), gl::RGBA);
        assert!(matches!(
            PixelFormat::from_channels(2),
            Err(DemoError::PixelFormat(2))
        ));
    }

    #[test]
    fn flip_reverses_row_order() {
        // 2x3 image, one channel
        let mut data = vec![1, 2, 3, 4, 5, 6];
        flip_vertically(&mut data, 2, 3, 1);
        assert_eq!(data, vec![5, 6, 3, 4, 1, 2]);
    }

    #[test]
    fn flip_even_height_multi_channel() {
        let mut data = vec![1, 1, 1, 2, 2, 2, 3, 3, 3, 4, 4, 4];
        flip_vertically(&mut data, 1, 4, 3);
        assert_eq!(data, vec![4, 4, 4, 3, 3, 3, 2, 2, 2, 1, 1, 1]);
    }

    #[test]
    fn missing_file_reports_path() {
        let err = Image::load("assets/textures/nope.png", true).err().unwrap();
        assert!(err.to_string().contains("nope.png"));
    }
}
