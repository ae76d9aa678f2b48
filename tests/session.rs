use std::io::Cursor;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use chromakey::{
    ChromaConfig, ChromaResult, CompositeOpts, CycleIndex, Frame, FrameSink, FrameSource,
    InMemorySink, Playback, Scheduler, SessionControl, SinkConfig,
};

/// Endless camera stand-in: always playing, always the same near-white frame.
struct EndlessSource {
    frame: Frame,
}

impl FrameSource for EndlessSource {
    fn dimensions(&self) -> (u32, u32) {
        self.frame.dimensions()
    }

    fn next_frame(&mut self) -> ChromaResult<Frame> {
        Ok(self.frame.clone())
    }

    fn playback(&self) -> Playback {
        Playback::Playing
    }
}

/// Finite source: serves `remaining` frames, then reports `Ended`.
struct FiniteSource {
    frame: Frame,
    remaining: usize,
}

impl FrameSource for FiniteSource {
    fn dimensions(&self) -> (u32, u32) {
        self.frame.dimensions()
    }

    fn next_frame(&mut self) -> ChromaResult<Frame> {
        self.remaining -= 1;
        Ok(self.frame.clone())
    }

    fn playback(&self) -> Playback {
        if self.remaining > 0 {
            Playback::Playing
        } else {
            Playback::Ended
        }
    }
}

/// Sink whose frame log is observable from another thread.
#[derive(Clone, Default)]
struct SharedSink {
    frames: Arc<Mutex<Vec<(CycleIndex, Frame)>>>,
}

impl FrameSink for SharedSink {
    fn begin(&mut self, _cfg: SinkConfig) -> ChromaResult<()> {
        Ok(())
    }

    fn push_frame(&mut self, idx: CycleIndex, frame: &Frame) -> ChromaResult<()> {
        self.frames.lock().unwrap().push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> ChromaResult<()> {
        Ok(())
    }
}

fn png_background(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
    let mut img = image::RgbaImage::new(width, height);
    for px in img.pixels_mut() {
        *px = image::Rgba(rgba);
    }
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn fast_scheduler(background_source: &str) -> Scheduler {
    let mut cfg = ChromaConfig::new(background_source);
    cfg.cycle_interval_ms = 0;
    Scheduler::new(cfg, CompositeOpts::default())
}

#[test]
fn full_session_composites_against_a_decoded_background() {
    init_tracing();
    // background decoded from encoded bytes and resampled to the source size
    let bytes = png_background(16, 16, [5, 6, 7, 255]);
    let store = chromakey::BackgroundStore::load_from_memory(&bytes, 4, 3).unwrap();

    let mut source = FiniteSource {
        frame: Frame::filled(4, 3, [200, 200, 200, 255]).unwrap(),
        remaining: 2,
    };
    let mut sink = InMemorySink::new();
    let control = SessionControl::new();

    let stats = fast_scheduler("unused.png")
        .run_with_background(&mut source, &mut sink, store.frame(), &control)
        .unwrap();

    assert_eq!(stats.cycles_composited, 2);
    assert_eq!(sink.config().map(|c| (c.width, c.height)), Some((4, 3)));
    for (_, frame) in &sink.frames {
        assert_eq!(frame.pixel(0, 0), Some([5, 6, 7, 255]));
        assert_eq!(frame.pixel(3, 2), Some([5, 6, 7, 255]));
    }
}

#[test]
fn session_loads_background_from_disk() {
    init_tracing();
    let dir = std::env::temp_dir().join(format!("chromakey_session_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let bg_path = dir.join("bg.png");
    std::fs::write(&bg_path, png_background(8, 8, [9, 10, 11, 255])).unwrap();

    let mut source = FiniteSource {
        frame: Frame::filled(2, 2, [255, 255, 255, 255]).unwrap(),
        remaining: 1,
    };
    let mut sink = InMemorySink::new();
    let control = SessionControl::new();

    let stats = fast_scheduler(bg_path.to_str().unwrap())
        .run(&mut source, &mut sink, &control)
        .unwrap();

    std::fs::remove_dir_all(&dir).ok();

    assert_eq!(stats.cycles_composited, 1);
    assert_eq!(sink.frames[0].1.pixel(1, 1), Some([9, 10, 11, 255]));
}

#[test]
fn stop_signal_halts_an_endless_session() {
    init_tracing();
    let control = SessionControl::new();
    let sink = SharedSink::default();
    let frames = Arc::clone(&sink.frames);

    let remote = Arc::clone(&control);
    let worker = std::thread::spawn(move || {
        let mut source = EndlessSource {
            frame: Frame::filled(2, 2, [200, 200, 200, 255]).unwrap(),
        };
        let mut sink = sink;
        let mut cfg = ChromaConfig::new("unused.png");
        cfg.cycle_interval_ms = 2;
        Scheduler::new(cfg, CompositeOpts::default()).run_with_background(
            &mut source,
            &mut sink,
            Arc::new(Frame::filled(2, 2, [1, 2, 3, 255]).unwrap()),
            &remote,
        )
    });

    // wait for the session to produce a few frames, then stop it
    let deadline = Instant::now() + Duration::from_secs(10);
    while frames.lock().unwrap().len() < 3 {
        assert!(Instant::now() < deadline, "session produced no frames");
        std::thread::sleep(Duration::from_millis(1));
    }
    control.stop();

    let stats = worker.join().unwrap().unwrap();
    let seen = frames.lock().unwrap().len();

    // no cycle runs after the stop signal is processed
    std::thread::sleep(Duration::from_millis(30));
    assert_eq!(frames.lock().unwrap().len(), seen);
    assert_eq!(stats.cycles_composited as usize, seen);
}
