use crate::foundation::error::{ChromaError, ChromaResult};

/// Bytes per pixel: straight RGBA8.
pub const PIXEL_STRIDE: usize = 4;

/// Monotonic index of one composite cycle within a session, starting at 0.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct CycleIndex(pub u64);

/// A dense `width x height` pixel buffer in row-major straight RGBA8 order.
///
/// `data.len()` is always exactly `width * height * 4`; the validating
/// constructors are the only way to build one, so downstream code may index
/// without re-checking.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Frame {
    /// Wrap an existing RGBA8 buffer.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> ChromaResult<Self> {
        let expected = byte_len(width, height)?;
        if data.len() != expected {
            return Err(ChromaError::dimension(format!(
                "frame buffer has {} bytes, expected {} for {}x{} rgba8",
                data.len(),
                expected,
                width,
                height
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Allocate a frame with every pixel set to `rgba`.
    pub fn filled(width: u32, height: u32, rgba: [u8; PIXEL_STRIDE]) -> ChromaResult<Self> {
        let len = byte_len(width, height)?;
        let mut data = vec![0u8; len];
        for px in data.chunks_exact_mut(PIXEL_STRIDE) {
            px.copy_from_slice(&rgba);
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn pixel_count(&self) -> usize {
        self.data.len() / PIXEL_STRIDE
    }

    /// Row length in bytes.
    pub fn row_stride(&self) -> usize {
        self.width as usize * PIXEL_STRIDE
    }

    pub fn same_dimensions(&self, other: &Frame) -> bool {
        self.width == other.width && self.height == other.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// RGBA of the pixel at `(x, y)`, or `None` when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; PIXEL_STRIDE]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * PIXEL_STRIDE;
        Some([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ])
    }
}

fn byte_len(width: u32, height: u32) -> ChromaResult<usize> {
    if width == 0 || height == 0 {
        return Err(ChromaError::dimension(format!(
            "frame dimensions must be non-zero, got {width}x{height}"
        )));
    }
    let len = (width as u64)
        .checked_mul(height as u64)
        .and_then(|n| n.checked_mul(PIXEL_STRIDE as u64))
        .ok_or_else(|| {
            ChromaError::dimension(format!("frame dimensions {width}x{height} overflow"))
        })?;
    usize::try_from(len)
        .map_err(|_| ChromaError::dimension(format!("frame {width}x{height} exceeds usize")))
}
