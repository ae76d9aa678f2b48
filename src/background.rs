use std::path::Path;
use std::sync::Arc;

use image::imageops::FilterType;

use crate::foundation::core::Frame;
use crate::foundation::error::{ChromaError, ChromaResult};

/// The session's background buffer: decoded once, resampled to the session
/// dimensions, then shared read-only with every cycle.
pub type BackgroundFrame = Arc<Frame>;

/// Holds the one decoded-and-resampled background frame of a session.
///
/// Loading is the single one-shot IO step of the pipeline; the scheduler stays
/// in `Loading` until it returns and never exposes a partially built frame.
pub struct BackgroundStore {
    frame: BackgroundFrame,
}

impl BackgroundStore {
    /// Decode the image at `path` and resample it to exactly
    /// `width x height`.
    #[tracing::instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>, width: u32, height: u32) -> ChromaResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| {
            ChromaError::image_load(format!("read background '{}': {e}", path.display()))
        })?;
        Self::load_from_memory(&bytes, width, height)
    }

    /// Decode an already-read image byte buffer and resample it to exactly
    /// `width x height`.
    pub fn load_from_memory(bytes: &[u8], width: u32, height: u32) -> ChromaResult<Self> {
        if width == 0 || height == 0 {
            return Err(ChromaError::dimension(format!(
                "background target dimensions must be non-zero, got {width}x{height}"
            )));
        }

        let decoded = image::load_from_memory(bytes)
            .map_err(|e| ChromaError::image_load(format!("decode background image: {e}")))?;
        let rgba = decoded.to_rgba8();

        let rgba = if rgba.dimensions() == (width, height) {
            rgba
        } else {
            tracing::debug!(
                from_width = rgba.width(),
                from_height = rgba.height(),
                to_width = width,
                to_height = height,
                "resampling background"
            );
            image::imageops::resize(&rgba, width, height, FilterType::Triangle)
        };

        let frame = Frame::new(width, height, rgba.into_raw())?;
        Ok(Self {
            frame: Arc::new(frame),
        })
    }

    /// Cheap handle to the immutable background frame.
    pub fn frame(&self) -> BackgroundFrame {
        Arc::clone(&self.frame)
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.frame.dimensions()
    }
}
