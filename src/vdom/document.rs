//! In-process stand-in for the host document: drawing surfaces by element id.

use std::collections::HashMap;
use std::sync::Arc;

use image::RgbaImage;
use parking_lot::{Mutex, RwLock};
use thiserror::Error;

use crate::canvas::{DrawingContext, OpLog, RasterContext, RecordingContext};

type ContextFactory = Box<dyn Fn(u32, u32) -> Box<dyn DrawingContext + Send> + Send + Sync>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SnapshotError {
    #[error("no surface mounted with id '{id}'")]
    NotMounted { id: String },

    #[error("surface '{id}' is not backed by pixels")]
    NoPixels { id: String },
}

/// A mounted canvas element together with its 2D context.
pub struct Surface {
    width: u32,
    height: u32,
    context: Box<dyn DrawingContext + Send>,
}

impl Surface {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn context_mut(&mut self) -> &mut (dyn DrawingContext + Send) {
        self.context.as_mut()
    }

    pub fn snapshot(&self) -> Option<RgbaImage> {
        self.context.snapshot()
    }
}

/// Element registry the reconciler populates and the canvas renderer reads.
pub struct Document {
    surfaces: RwLock<HashMap<String, Arc<Mutex<Surface>>>>,
    factory: ContextFactory,
}

impl Document {
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn(u32, u32) -> Box<dyn DrawingContext + Send> + Send + Sync + 'static,
    {
        Self {
            surfaces: RwLock::new(HashMap::new()),
            factory: Box::new(factory),
        }
    }

    /// Surfaces backed by [`RasterContext`] pixel buffers.
    pub fn raster() -> Self {
        Self::new(|width, height| Box::new(RasterContext::new(width, height)))
    }

    /// Surfaces that record every call into `log`.
    pub fn recording(log: OpLog) -> Self {
        Self::new(move |_, _| Box::new(RecordingContext::new(log.clone())))
    }

    /// Look up a mounted surface by element id.
    pub fn surface(&self, id: &str) -> Option<Arc<Mutex<Surface>>> {
        self.surfaces.read().get(id).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.surfaces.read().contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.surfaces.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.surfaces.read().is_empty()
    }

    /// Mount a surface, or resize it in place. Resizing discards its pixels,
    /// as resizing a canvas element does.
    pub fn attach(&self, id: &str, width: u32, height: u32) {
        let mut surfaces = self.surfaces.write();
        if let Some(existing) = surfaces.get(id) {
            let mut surface = existing.lock();
            if surface.width != width || surface.height != height {
                tracing::debug!(id, width, height, "Resizing surface");
                *surface = self.build(width, height);
            }
            return;
        }
        tracing::debug!(id, width, height, "Mounting surface");
        surfaces.insert(id.to_string(), Arc::new(Mutex::new(self.build(width, height))));
    }

    pub fn detach(&self, id: &str) {
        if self.surfaces.write().remove(id).is_some() {
            tracing::debug!(id, "Unmounting surface");
        }
    }

    pub fn snapshot(&self, id: &str) -> Result<RgbaImage, SnapshotError> {
        let surface = self.surface(id).ok_or_else(|| SnapshotError::NotMounted {
            id: id.to_string(),
        })?;
        let snapshot = surface.lock().snapshot();
        snapshot.ok_or_else(|| SnapshotError::NoPixels { id: id.to_string() })
    }

    fn build(&self, width: u32, height: u32) -> Surface {
        Surface {
            width,
            height,
            context: (self.factory)(width, height),
        }
    }
}
