use rayon::prelude::*;

use crate::{
    foundation::core::{Frame, PIXEL_STRIDE},
    foundation::error::{ChromaError, ChromaResult},
    key::{KeyThreshold, is_key},
};

/// Threading controls for the per-frame pixel pass.
#[derive(Clone, Copy, Debug, Default)]
pub struct CompositeOpts {
    /// Split the pass over rows with rayon when `true`.
    pub parallel: bool,
    /// Optional explicit worker thread count (parallel mode only).
    pub threads: Option<usize>,
}

/// Applies the key classifier across whole frames.
///
/// The compositor is read-only during a cycle: the threshold is fixed at
/// construction and the background is borrowed per call, so one instance can
/// serve every cycle of a session.
pub struct Compositor {
    threshold: KeyThreshold,
    pool: Option<rayon::ThreadPool>,
}

impl Compositor {
    pub fn new(threshold: KeyThreshold, opts: CompositeOpts) -> ChromaResult<Self> {
        let pool = if opts.parallel {
            let mut builder = rayon::ThreadPoolBuilder::new();
            if let Some(threads) = opts.threads {
                builder = builder.num_threads(threads);
            }
            Some(
                builder
                    .build()
                    .map_err(|e| anyhow::anyhow!("build compositor thread pool: {e}"))?,
            )
        } else {
            None
        };
        Ok(Self { threshold, pool })
    }

    pub fn threshold(&self) -> KeyThreshold {
        self.threshold
    }

    /// Replace every key pixel of `frame` with the background pixel at the
    /// same index, in place.
    ///
    /// Alpha is passed through byte-for-byte and non-key pixels are left
    /// untouched. Dimension mismatch fails before any pixel is written, so the
    /// input is never partially mutated.
    pub fn composite_in_place(&self, frame: &mut Frame, background: &Frame) -> ChromaResult<()> {
        if !frame.same_dimensions(background) {
            return Err(ChromaError::dimension_mismatch(format!(
                "input frame is {}x{}, background is {}x{}",
                frame.width(),
                frame.height(),
                background.width(),
                background.height()
            )));
        }

        let stride = frame.row_stride();
        let threshold = self.threshold;
        match &self.pool {
            Some(pool) => pool.install(|| {
                frame
                    .data_mut()
                    .par_chunks_mut(stride)
                    .zip(background.data().par_chunks(stride))
                    .for_each(|(row, bg_row)| key_replace_row(row, bg_row, threshold));
            }),
            None => {
                for (row, bg_row) in frame
                    .data_mut()
                    .chunks_mut(stride)
                    .zip(background.data().chunks(stride))
                {
                    key_replace_row(row, bg_row, threshold);
                }
            }
        }
        Ok(())
    }
}

fn key_replace_row(row: &mut [u8], bg_row: &[u8], threshold: KeyThreshold) {
    for (px, bg) in row
        .chunks_exact_mut(PIXEL_STRIDE)
        .zip(bg_row.chunks_exact(PIXEL_STRIDE))
    {
        if is_key(px[0], px[1], px[2], threshold) {
            px[0] = bg[0];
            px[1] = bg[1];
            px[2] = bg[2];
            // alpha stays as captured
        }
    }
}
