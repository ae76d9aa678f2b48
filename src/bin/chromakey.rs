use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::Parser;

use chromakey::{
    ChromaConfig, ChromaError, ChromaResult, CompositeOpts, CycleIndex, Frame, FrameSink,
    FrameSource, KeyThreshold, Playback, Scheduler, SessionControl, SinkConfig,
};

/// Composite a directory of frames over a background image.
///
/// Stands in for the live camera + display surrounding layer: frames are read
/// from `--frames` in name order and composited PNGs land in `--out`.
#[derive(Parser, Debug)]
#[command(name = "chromakey", version)]
struct Cli {
    /// Background image (decoded once, resampled to the frame dimensions).
    #[arg(long)]
    background: PathBuf,

    /// Directory of input frames (png/jpg), processed in name order.
    #[arg(long)]
    frames: PathBuf,

    /// Output directory for composited PNGs.
    #[arg(long)]
    out: PathBuf,

    /// Per-channel key threshold (strict `>` on R, G and B).
    #[arg(long, default_value_t = 150)]
    threshold: u8,

    /// Cycle interval in milliseconds; 0 runs as fast as possible.
    #[arg(long, default_value_t = 0)]
    interval_ms: u64,

    /// Parallelize the pixel pass over rows.
    #[arg(long, default_value_t = false)]
    parallel: bool,

    /// Override rayon worker threads (parallel mode only).
    #[arg(long)]
    threads: Option<usize>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = ChromaConfig::new(&cli.background);
    config.key_threshold = KeyThreshold(cli.threshold);
    config.cycle_interval_ms = cli.interval_ms;

    let mut source = ImageDirSource::open(&cli.frames)?;
    let mut sink = PngDirSink::create(&cli.out)?;
    let control = SessionControl::new();

    let scheduler = Scheduler::new(config, CompositeOpts {
        parallel: cli.parallel,
        threads: cli.threads,
    });
    let stats = scheduler.run(&mut source, &mut sink, &control)?;

    eprintln!(
        "composited {} of {} cycles into {} ({} skipped)",
        stats.cycles_composited,
        stats.cycles_total,
        cli.out.display(),
        stats.cycles_skipped
    );
    Ok(())
}

/// Serves the images of a directory as a frame stream, in name order.
struct ImageDirSource {
    files: Vec<PathBuf>,
    next: usize,
    width: u32,
    height: u32,
}

impl ImageDirSource {
    fn open(dir: &Path) -> anyhow::Result<Self> {
        let mut files: Vec<PathBuf> = std::fs::read_dir(dir)
            .with_context(|| format!("read frame dir '{}'", dir.display()))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| {
                matches!(
                    p.extension().and_then(|e| e.to_str()),
                    Some("png") | Some("jpg") | Some("jpeg")
                )
            })
            .collect();
        files.sort();
        if files.is_empty() {
            return Err(ChromaError::stream_unavailable(format!(
                "no frames found in '{}'",
                dir.display()
            ))
            .into());
        }

        let first = decode_frame(&files[0])?;
        let (width, height) = first.dimensions();
        Ok(Self {
            files,
            next: 0,
            width,
            height,
        })
    }
}

impl FrameSource for ImageDirSource {
    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn next_frame(&mut self) -> ChromaResult<Frame> {
        let path = &self.files[self.next];
        self.next += 1;
        decode_frame(path)
    }

    fn playback(&self) -> Playback {
        if self.next < self.files.len() {
            Playback::Playing
        } else {
            Playback::Ended
        }
    }
}

fn decode_frame(path: &Path) -> ChromaResult<Frame> {
    let img = image::open(path)
        .map_err(|e| ChromaError::stream_unavailable(format!("decode '{}': {e}", path.display())))?
        .to_rgba8();
    let (width, height) = img.dimensions();
    Frame::new(width, height, img.into_raw())
}

/// Writes each composited frame as `cycle_NNNNN.png`.
struct PngDirSink {
    dir: PathBuf,
}

impl PngDirSink {
    fn create(dir: &Path) -> anyhow::Result<Self> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("create output dir '{}'", dir.display()))?;
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }
}

impl FrameSink for PngDirSink {
    fn begin(&mut self, _cfg: SinkConfig) -> ChromaResult<()> {
        Ok(())
    }

    fn push_frame(&mut self, idx: CycleIndex, frame: &Frame) -> ChromaResult<()> {
        let path = self.dir.join(format!("cycle_{:05}.png", idx.0));
        image::save_buffer_with_format(
            &path,
            frame.data(),
            frame.width(),
            frame.height(),
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .map_err(|e| ChromaError::sink(format!("write '{}': {e}", path.display())))
    }

    fn end(&mut self) -> ChromaResult<()> {
        Ok(())
    }
}
