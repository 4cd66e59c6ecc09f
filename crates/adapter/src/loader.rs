//! Image loading off the game loop.
//!
//! Decoding runs on tokio's blocking pool. Results come back through a channel
//! tagged with the generation they were requested in; [`ImageLoader::cancel`]
//! (or a newer request) bumps the generation so late results are discarded.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use tokio::runtime::Runtime;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::core::Bitmap;

/// Side of the procedural demo image in pixels
pub const DEMO_IMAGE_SIDE: u32 = 660;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    File(PathBuf),
    Demo { side: u32 },
}

impl ImageSource {
    pub fn from_path(path: Option<PathBuf>) -> Self {
        match path {
            Some(p) => ImageSource::File(p),
            None => ImageSource::Demo {
                side: DEMO_IMAGE_SIDE,
            },
        }
    }
}

/// Result delivered to the game loop.
#[derive(Debug)]
pub struct LoadedImage {
    pub generation: u64,
    pub source: ImageSource,
    pub result: Result<Bitmap>,
}

/// Decode an image file into an RGB8 bitmap.
pub fn decode_file(path: &Path) -> Result<Bitmap> {
    let decoded = image::open(path)
        .with_context(|| format!("failed to decode image {}", path.display()))?
        .to_rgb8();
    let (width, height) = decoded.dimensions();
    let pixels = decoded.pixels().map(|p| p.0).collect();
    Bitmap::from_pixels(width, height, pixels)
        .ok_or_else(|| anyhow!("decoded buffer does not match {}x{}", width, height))
}

/// Procedural image: diagonal color bands over a radial vignette, distinct
/// enough per tile to be solvable by eye.
pub fn demo_image(side: u32) -> Bitmap {
    let side_f = side.max(1) as f32;
    Bitmap::from_fn(side, side, |x, y| {
        let u = x as f32 / side_f;
        let v = y as f32 / side_f;
        let dx = u - 0.5;
        let dy = v - 0.5;
        let vignette = 1.0 - (dx * dx + dy * dy).sqrt().min(0.7);
        let band = ((u + v) * 6.0).fract();
        let r = 255.0 * u * vignette;
        let g = 255.0 * v * vignette;
        let b = 255.0 * (0.35 + 0.65 * band) * (1.0 - u * 0.5);
        [r as u8, g as u8, b as u8]
    })
}

/// Load from a source on the blocking pool.
pub async fn load(source: ImageSource) -> Result<Bitmap> {
    match source {
        ImageSource::Demo { side } => Ok(demo_image(side)),
        ImageSource::File(path) => tokio::task::spawn_blocking(move || decode_file(&path))
            .await
            .context("image decode task panicked")?,
    }
}

/// Owns a runtime and delivers at most one live result per request.
pub struct ImageLoader {
    rt: Runtime,
    tx: mpsc::UnboundedSender<LoadedImage>,
    rx: mpsc::UnboundedReceiver<LoadedImage>,
    generation: Arc<AtomicU64>,
}

impl ImageLoader {
    pub fn new() -> Result<Self> {
        let rt = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .context("failed to create tokio runtime")?;
        let (tx, rx) = mpsc::unbounded_channel();
        Ok(Self {
            rt,
            tx,
            rx,
            generation: Arc::new(AtomicU64::new(0)),
        })
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Start loading. Supersedes any request still in flight.
    pub fn request(&self, source: ImageSource) -> u64 {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let tx = self.tx.clone();
        let current = Arc::clone(&self.generation);
        self.rt.spawn(async move {
            let result = load(source.clone()).await;
            if current.load(Ordering::SeqCst) != generation {
                info!(generation, "discarding superseded image load");
                return;
            }
            if let Err(err) = &result {
                warn!(error = %err, "image load failed");
            }
            let _ = tx.send(LoadedImage {
                generation,
                source,
                result,
            });
        });
        generation
    }

    /// Invalidate every pending request.
    pub fn cancel(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    /// Non-blocking poll for the current request's result.
    pub fn try_recv(&mut self) -> Option<LoadedImage> {
        while let Ok(loaded) = self.rx.try_recv() {
            if loaded.generation == self.generation() {
                return Some(loaded);
            }
        }
        None
    }

    /// Wait up to `timeout` for the current request's result.
    pub fn recv_timeout(&mut self, timeout: Duration) -> Option<LoadedImage> {
        let generation = Arc::clone(&self.generation);
        let rx = &mut self.rx;
        self.rt.block_on(async move {
            tokio::time::timeout(timeout, async {
                while let Some(loaded) = rx.recv().await {
                    if loaded.generation == generation.load(Ordering::SeqCst) {
                        return Some(loaded);
                    }
                }
                None
            })
            .await
            .ok()
            .flatten()
        })
    }
}
