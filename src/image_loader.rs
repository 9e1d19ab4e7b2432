//! Decoding user-selected images into bitmaps.
//!
//! Decoding happens on a short-lived worker thread. The UI polls
//! [`ImageLoader::poll`] once per frame; only the result of the most recent
//! request is handed back, older ones are dropped.

use crate::error::{MeasureError, Result};
use image::{ImageReader, RgbaImage};
use std::io::Cursor;
use std::panic::AssertUnwindSafe;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};

/// extensions offered by the file picker
pub const IMAGE_EXTENSIONS: &[&str] = &["png"];

/// A decoded image, owned by the session until the next load replaces it.
#[derive(Clone, Debug)]
pub struct Bitmap {
    pixels: RgbaImage,
}

impl Bitmap {
    pub fn from_rgba(pixels: RgbaImage) -> Self {
        Bitmap { pixels }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    /// error out if either side exceeds `max_side`, the largest texture the
    /// display backend accepts.
    pub fn ensure_fits(&self, max_side: usize) -> Result<()> {
        let (width, height) = self.dimensions();
        if width as usize > max_side || height as usize > max_side {
            return Err(MeasureError::TooLarge {
                width,
                height,
                max_side,
            });
        }
        Ok(())
    }
}

/// decode the image at `path`, detecting the format from its content.
pub fn decode_file(path: &Path) -> Result<Bitmap> {
    let reader = ImageReader::open(path)?.with_guessed_format()?;
    if let Some(fmt) = reader.format() {
        log::debug!("decoding {:?} image from {}", fmt, path.display());
    }
    let image = reader.decode()?;
    Ok(Bitmap::from_rgba(image.to_rgba8()))
}

/// decode an in-memory image (e.g. a dropped file without a path).
pub fn decode_bytes(bytes: &[u8]) -> Result<Bitmap> {
    let image = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()?
        .decode()?;
    Ok(Bitmap::from_rgba(image.to_rgba8()))
}

/// Where an image comes from.
#[derive(Clone, Debug)]
pub enum LoadSource {
    Path(PathBuf),
    Bytes { name: String, bytes: Arc<[u8]> },
}

impl LoadSource {
    /// human readable name for logs and the status bar
    pub fn name(&self) -> String {
        match self {
            LoadSource::Path(path) => path.display().to_string(),
            LoadSource::Bytes { name, .. } => name.clone(),
        }
    }

    pub fn decode(&self) -> Result<Bitmap> {
        match self {
            LoadSource::Path(path) => decode_file(path),
            LoadSource::Bytes { bytes, .. } => decode_bytes(bytes),
        }
    }
}

/// run a decode, turning a decoder panic into an error so the worker
/// always reports back.
pub fn decode_guarded<F>(decode: F) -> Result<Bitmap>
where
    F: FnOnce() -> Result<Bitmap>,
{
    std::panic::catch_unwind(AssertUnwindSafe(decode)).unwrap_or_else(|payload| {
        let msg = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_owned());
        log::error!("image decoder panicked: {}", msg);
        Err(MeasureError::DecodePanic(msg))
    })
}

/// Outcome of one finished load request.
#[derive(Debug)]
pub struct LoadOutcome {
    pub source: String,
    pub result: Result<Bitmap>,
}

pub struct ImageLoader {
    tx: Sender<(u64, LoadOutcome)>,
    rx: Receiver<(u64, LoadOutcome)>,
    /// id of the most recent request; results with another id are stale
    latest: u64,
    pending: bool,
}

impl ImageLoader {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        ImageLoader {
            tx,
            rx,
            latest: 0,
            pending: false,
        }
    }

    /// start decoding `source` in the background, superseding any request
    /// still in flight.
    pub fn request(&mut self, source: LoadSource) {
        self.latest += 1;
        self.pending = true;
        let id = self.latest;
        let tx = self.tx.clone();
        log::info!("loading image {}", source.name());
        std::thread::spawn(move || {
            let outcome = LoadOutcome {
                source: source.name(),
                result: decode_guarded(|| source.decode()),
            };
            // the receiver only goes away when the app shuts down
            let _ = tx.send((id, outcome));
        });
    }

    /// the finished result of the latest request, if it has arrived.
    pub fn poll(&mut self) -> Option<LoadOutcome> {
        while let Ok((id, outcome)) = self.rx.try_recv() {
            if id == self.latest {
                self.pending = false;
                return Some(outcome);
            }
            log::debug!("dropping superseded load of {}", outcome.source);
        }
        None
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }
}

impl Default for ImageLoader {
    fn default() -> Self {
        Self::new()
    }
}
