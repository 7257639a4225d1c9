//! Frame buffer handed between pipeline stages.

use std::fmt;

use ::image::{DynamicImage, ImageBuffer};
use serde::{Deserialize, Serialize};

use crate::error::{Result, StageError};

/// Element type of a single channel value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BitDepth {
    /// 8-bit unsigned integer.
    U8,
    /// 16-bit unsigned integer.
    U16,
    /// 32-bit floating point.
    F32,
}

impl BitDepth {
    /// Size of one channel value in bytes.
    pub const fn bytes(self) -> usize {
        match self {
            Self::U8 => 1,
            Self::U16 => 2,
            Self::F32 => 4,
        }
    }
}

impl fmt::Display for BitDepth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::U8 => write!(f, "8-bit"),
            Self::U16 => write!(f, "16-bit"),
            Self::F32 => write!(f, "32-bit float"),
        }
    }
}

/// A rectangular, interleaved image buffer.
///
/// Pixel data is stored row-major as raw native-endian bytes, `channels`
/// values per pixel. The byte length always equals
/// `rows * cols * channels * depth.bytes()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    rows: u32,
    cols: u32,
    channels: u32,
    depth: BitDepth,
    data: Vec<u8>,
}

impl Frame {
    /// Wrap an existing buffer, checking its length against the shape.
    pub fn new(
        rows: u32,
        cols: u32,
        channels: u32,
        depth: BitDepth,
        data: Vec<u8>,
    ) -> Result<Self> {
        let expected = byte_len(rows, cols, channels, depth)?;
        if data.len() != expected {
            return Err(StageError::BufferSize {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            rows,
            cols,
            channels,
            depth,
            data,
        })
    }

    /// Wrap an 8-bit buffer.
    pub fn from_u8(rows: u32, cols: u32, channels: u32, data: Vec<u8>) -> Result<Self> {
        Self::new(rows, cols, channels, BitDepth::U8, data)
    }

    /// A zero-filled frame of the given shape.
    pub fn zeros(rows: u32, cols: u32, channels: u32, depth: BitDepth) -> Result<Self> {
        let len = byte_len(rows, cols, channels, depth)?;
        Ok(Self {
            rows,
            cols,
            channels,
            depth,
            data: vec![0; len],
        })
    }

    /// A zero-filled frame with the same shape and element type as `self`.
    pub fn zeros_like(&self) -> Self {
        Self {
            rows: self.rows,
            cols: self.cols,
            channels: self.channels,
            depth: self.depth,
            data: vec![0; self.data.len()],
        }
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    pub fn channels(&self) -> u32 {
        self.channels
    }

    pub fn depth(&self) -> BitDepth {
        self.depth
    }

    /// Number of channel values (`rows * cols * channels`).
    pub fn len(&self) -> usize {
        self.data.len() / self.depth.bytes()
    }

    /// `true` when any dimension is zero.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Whether `other` has the same dimensions and element type.
    pub fn same_shape(&self, other: &Frame) -> bool {
        self.rows == other.rows
            && self.cols == other.cols
            && self.channels == other.channels
            && self.depth == other.depth
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Convert a decoded `image` buffer into a frame.
    ///
    /// 8-bit, 16-bit and 32-bit float Luma/LumaA/Rgb/Rgba layouts are supported.
    pub fn from_dynamic(img: &DynamicImage) -> Result<Self> {
        let (rows, cols) = (img.height(), img.width());
        match img {
            DynamicImage::ImageLuma8(buf) => Self::from_u8(rows, cols, 1, buf.as_raw().clone()),
            DynamicImage::ImageLumaA8(buf) => Self::from_u8(rows, cols, 2, buf.as_raw().clone()),
            DynamicImage::ImageRgb8(buf) => Self::from_u8(rows, cols, 3, buf.as_raw().clone()),
            DynamicImage::ImageRgba8(buf) => Self::from_u8(rows, cols, 4, buf.as_raw().clone()),
            DynamicImage::ImageLuma16(buf) => Self::from_u16(rows, cols, 1, buf.as_raw()),
            DynamicImage::ImageLumaA16(buf) => Self::from_u16(rows, cols, 2, buf.as_raw()),
            DynamicImage::ImageRgb16(buf) => Self::from_u16(rows, cols, 3, buf.as_raw()),
            DynamicImage::ImageRgba16(buf) => Self::from_u16(rows, cols, 4, buf.as_raw()),
            DynamicImage::ImageRgb32F(buf) => Self::from_f32(rows, cols, 3, buf.as_raw()),
            DynamicImage::ImageRgba32F(buf) => Self::from_f32(rows, cols, 4, buf.as_raw()),
            other => Err(StageError::InvalidArgument(format!(
                "unsupported color type {:?}",
                other.color()
            ))),
        }
    }

    /// Convert this frame back into an `image` buffer.
    pub fn into_dynamic(self) -> Result<DynamicImage> {
        let (w, h, channels) = (self.cols, self.rows, self.channels);
        let supported = match self.depth {
            BitDepth::U8 | BitDepth::U16 => (1..=4).contains(&channels),
            BitDepth::F32 => matches!(channels, 3 | 4),
        };
        if !supported {
            return Err(StageError::InvalidArgument(format!(
                "no image layout for {channels}-channel {} frames",
                self.depth
            )));
        }

        let img = match self.depth {
            BitDepth::U8 => {
                let data = self.data;
                match channels {
                    1 => ImageBuffer::from_raw(w, h, data).map(DynamicImage::ImageLuma8),
                    2 => ImageBuffer::from_raw(w, h, data).map(DynamicImage::ImageLumaA8),
                    3 => ImageBuffer::from_raw(w, h, data).map(DynamicImage::ImageRgb8),
                    _ => ImageBuffer::from_raw(w, h, data).map(DynamicImage::ImageRgba8),
                }
            }
            BitDepth::U16 => {
                let data: Vec<u16> = bytemuck::pod_collect_to_vec(&self.data);
                match channels {
                    1 => ImageBuffer::from_raw(w, h, data).map(DynamicImage::ImageLuma16),
                    2 => ImageBuffer::from_raw(w, h, data).map(DynamicImage::ImageLumaA16),
                    3 => ImageBuffer::from_raw(w, h, data).map(DynamicImage::ImageRgb16),
                    _ => ImageBuffer::from_raw(w, h, data).map(DynamicImage::ImageRgba16),
                }
            }
            BitDepth::F32 => {
                let data: Vec<f32> = bytemuck::pod_collect_to_vec(&self.data);
                match channels {
                    3 => ImageBuffer::from_raw(w, h, data).map(DynamicImage::ImageRgb32F),
                    _ => ImageBuffer::from_raw(w, h, data).map(DynamicImage::ImageRgba32F),
                }
            }
        };
        img.ok_or_else(|| {
            StageError::InvalidArgument("frame does not fit an image buffer".to_string())
        })
    }

    fn from_u16(rows: u32, cols: u32, channels: u32, raw: &[u16]) -> Result<Self> {
        let data = bytemuck::pod_collect_to_vec(raw);
        Self::new(rows, cols, channels, BitDepth::U16, data)
    }

    fn from_f32(rows: u32, cols: u32, channels: u32, raw: &[f32]) -> Result<Self> {
        let data = bytemuck::pod_collect_to_vec(raw);
        Self::new(rows, cols, channels, BitDepth::F32, data)
    }
}

fn byte_len(rows: u32, cols: u32, channels: u32, depth: BitDepth) -> Result<usize> {
    (rows as usize)
        .checked_mul(cols as usize)
        .and_then(|n| n.checked_mul(channels as usize))
        .and_then(|n| n.checked_mul(depth.bytes()))
        .ok_or_else(|| {
            StageError::InvalidArgument(format!("frame shape {rows}x{cols}x{channels} overflows"))
        })
}

#[cfg(test)]
mod tests {
    use ::image::{Luma, Rgb, Rgba};

    use super::*;

    #[test]
    fn test_new_rejects_wrong_length() {
        let err = Frame::from_u8(2, 2, 3, vec![0; 11]).unwrap_err();
        assert!(matches!(
            err,
            StageError::BufferSize {
                expected: 12,
                actual: 11
            }
        ));
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_len_counts_channel_values() {
        let frame = Frame::zeros(2, 3, 4, BitDepth::U16).unwrap();
        assert_eq!(frame.len(), 24);
        assert_eq!(frame.as_bytes().len(), 48);
        assert!(!frame.is_empty());
    }

    #[test]
    fn test_zero_dimension_is_empty() {
        let frame = Frame::from_u8(0, 5, 1, Vec::new()).unwrap();
        assert!(frame.is_empty());
        assert_eq!(frame.len(), 0);
    }

    #[test]
    fn test_zeros_like_matches_shape() {
        let frame = Frame::from_u8(1, 2, 3, vec![9; 6]).unwrap();
        let zeros = frame.zeros_like();
        assert!(zeros.same_shape(&frame));
        assert!(zeros.as_bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_from_dynamic_rgb8() {
        let mut buf = ::image::RgbImage::new(3, 2);
        buf.put_pixel(2, 1, Rgb([10, 20, 30]));
        let frame = Frame::from_dynamic(&DynamicImage::ImageRgb8(buf)).unwrap();
        assert_eq!((frame.rows(), frame.cols(), frame.channels()), (2, 3, 3));
        assert_eq!(frame.depth(), BitDepth::U8);
        assert_eq!(&frame.as_bytes()[15..18], &[10, 20, 30]);
    }

    #[test]
    fn test_from_dynamic_luma16_keeps_depth() {
        let mut buf = ImageBuffer::<Luma<u16>, Vec<u16>>::new(2, 2);
        buf.put_pixel(1, 0, Luma([0xBEEF]));
        let frame = Frame::from_dynamic(&DynamicImage::ImageLuma16(buf)).unwrap();
        assert_eq!(frame.depth(), BitDepth::U16);
        assert_eq!(frame.len(), 4);

        let back = frame.into_dynamic().unwrap();
        assert_eq!(back.as_luma16().unwrap().get_pixel(1, 0).0, [0xBEEF]);
    }

    #[test]
    fn test_rgba32f_round_trip() {
        let mut buf = ImageBuffer::<Rgba<f32>, Vec<f32>>::new(3, 1);
        buf.put_pixel(2, 0, Rgba([0.25, -1.5, 8.0, 1.0]));
        let frame = Frame::from_dynamic(&DynamicImage::ImageRgba32F(buf)).unwrap();
        assert_eq!(frame.depth(), BitDepth::F32);
        assert_eq!(frame.as_bytes().len(), 3 * 4 * 4);

        let back = frame.into_dynamic().unwrap();
        assert_eq!(
            back.as_rgba32f().unwrap().get_pixel(2, 0).0,
            [0.25, -1.5, 8.0, 1.0]
        );
    }

    #[test]
    fn test_into_dynamic_rejects_single_channel_float() {
        let frame = Frame::zeros(1, 1, 1, BitDepth::F32).unwrap();
        assert!(frame.into_dynamic().unwrap_err().is_invalid_argument());
    }

    #[test]
    fn test_into_dynamic_rejects_unknown_layout() {
        let frame = Frame::zeros(1, 1, 5, BitDepth::U8).unwrap();
        assert!(frame.into_dynamic().unwrap_err().is_invalid_argument());
    }
}
