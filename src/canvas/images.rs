//! Read-through image cache with deduplicated asynchronous loads.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use base64::Engine;
use futures::future::{BoxFuture, FutureExt, Shared};
use image::RgbaImage;
use parking_lot::Mutex;
use thiserror::Error;

/// Errors produced while resolving an image source.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ImageError {
    #[error("failed to read image '{src}': {message}")]
    Read { src: String, message: String },

    #[error("failed to decode image '{src}': {message}")]
    Decode { src: String, message: String },

    #[error("unsupported image source '{src}'")]
    Unsupported { src: String },

    #[error("image '{src}' failed to load earlier")]
    PreviouslyFailed { src: String },
}

/// Resolves an image source string into pixels.
pub trait ImageLoader: Send + Sync {
    fn load(&self, src: &str) -> BoxFuture<'static, Result<RgbaImage, ImageError>>;
}

type LoadResult = Result<Arc<RgbaImage>, ImageError>;
type InFlight = Shared<BoxFuture<'static, LoadResult>>;

enum Entry {
    Loading(InFlight),
    Ready(Arc<RgbaImage>),
    Failed,
}

/// Image cache owned by a canvas and injected at construction.
///
/// Entries are created on first reference and never evicted. Concurrent
/// misses for one source share a single in-flight load.
#[derive(Clone)]
pub struct ImageCache {
    entries: Arc<Mutex<HashMap<String, Entry>>>,
    loader: Arc<dyn ImageLoader>,
}

impl ImageCache {
    pub fn new(loader: impl ImageLoader + 'static) -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            loader: Arc::new(loader),
        }
    }

    /// Cache that resolves sources with [`SourceLoader`] relative to the
    /// current directory.
    pub fn with_default_loader() -> Self {
        Self::new(SourceLoader::default())
    }

    /// Preload `image` under `src`, replacing any existing entry.
    pub fn insert(&self, src: impl Into<String>, image: RgbaImage) {
        self.entries
            .lock()
            .insert(src.into(), Entry::Ready(Arc::new(image)));
    }

    /// Best-effort lookup for the current frame.
    ///
    /// Returns the image when it is loaded. On a miss the load is started
    /// in the background and `None` is returned; an in-flight or failed
    /// source also yields `None` without starting another load.
    ///
    /// Background loads need a tokio runtime. Without one a miss records
    /// nothing, so a later `get` or [`load`](Self::load) starts afresh.
    pub fn get(&self, src: &str) -> Option<Arc<RgbaImage>> {
        let mut entries = self.entries.lock();
        match entries.get(src) {
            Some(Entry::Ready(image)) => return Some(Arc::clone(image)),
            Some(Entry::Loading(_)) | Some(Entry::Failed) => return None,
            None => {}
        }

        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            tracing::warn!(src, "No async runtime; image load not started");
            return None;
        };
        let load = self.start_load(src);
        entries.insert(src.to_string(), Entry::Loading(load.clone()));
        drop(entries);

        handle.spawn(load.map(|_| ()));
        None
    }

    /// Resolve `src`, joining an in-flight load if there is one.
    pub async fn load(&self, src: &str) -> LoadResult {
        let load = {
            let mut entries = self.entries.lock();
            match entries.get(src) {
                Some(Entry::Ready(image)) => return Ok(Arc::clone(image)),
                Some(Entry::Failed) => {
                    return Err(ImageError::PreviouslyFailed {
                        src: src.to_string(),
                    })
                }
                Some(Entry::Loading(load)) => load.clone(),
                None => {
                    let load = self.start_load(src);
                    entries.insert(src.to_string(), Entry::Loading(load.clone()));
                    load
                }
            }
        };
        load.await
    }

    pub fn is_loaded(&self, src: &str) -> bool {
        matches!(self.entries.lock().get(src), Some(Entry::Ready(_)))
    }

    pub fn is_loading(&self, src: &str) -> bool {
        matches!(self.entries.lock().get(src), Some(Entry::Loading(_)))
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    fn start_load(&self, src: &str) -> InFlight {
        tracing::debug!(src, "Loading image");
        let pending = self.loader.load(src);
        let entries = Arc::clone(&self.entries);
        let key = src.to_string();
        async move {
            let result = pending.await.map(Arc::new);
            let entry = match &result {
                Ok(image) => Entry::Ready(Arc::clone(image)),
                Err(err) => {
                    tracing::warn!(src = %key, error = %err, "Image load failed");
                    Entry::Failed
                }
            };
            // An insert made while loading wins over the load's outcome.
            if let Some(slot) = entries.lock().get_mut(&key) {
                if matches!(slot, Entry::Loading(_)) {
                    *slot = entry;
                }
            }
            result
        }
        .boxed()
        .shared()
    }
}

/// Loads `data:` URIs and filesystem paths.
///
/// Relative paths resolve against `root`. A `file://` prefix is accepted.
#[derive(Debug, Clone, Default)]
pub struct SourceLoader {
    root: PathBuf,
}

impl SourceLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, src: &str) -> PathBuf {
        let path = Path::new(src.strip_prefix("file://").unwrap_or(src));
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}

impl ImageLoader for SourceLoader {
    fn load(&self, src: &str) -> BoxFuture<'static, Result<RgbaImage, ImageError>> {
        let src = src.to_string();
        if src.starts_with("data:") {
            let result = decode_data_uri(&src).and_then(|bytes| decode(&src, &bytes));
            return async move { result }.boxed();
        }
        if src.contains("://") && !src.starts_with("file://") {
            return async move { Err(ImageError::Unsupported { src }) }.boxed();
        }

        let path = self.resolve(&src);
        async move {
            let bytes = tokio::fs::read(&path).await.map_err(|e| ImageError::Read {
                src: src.clone(),
                message: e.to_string(),
            })?;
            decode(&src, &bytes)
        }
        .boxed()
    }
}

fn decode(src: &str, bytes: &[u8]) -> Result<RgbaImage, ImageError> {
    image::load_from_memory(bytes)
        .map(|img| img.to_rgba8())
        .map_err(|e| ImageError::Decode {
            src: src.to_string(),
            message: e.to_string(),
        })
}

/// Payload of a `data:[<mime>];base64,<payload>` URI.
fn decode_data_uri(src: &str) -> Result<Vec<u8>, ImageError> {
    let unsupported = || ImageError::Unsupported {
        src: src.to_string(),
    };
    let rest = src.strip_prefix("data:").ok_or_else(unsupported)?;
    let (meta, payload) = rest.split_once(',').ok_or_else(unsupported)?;
    if !meta.ends_with(";base64") {
        return Err(unsupported());
    }
    base64::engine::general_purpose::STANDARD
        .decode(payload.trim())
        .map_err(|e| ImageError::Decode {
            src: src.to_string(),
            message: e.to_string(),
        })
}
