//! View boundary: node descriptions, the reconciler seam, and an in-memory
//! document that owns canvas drawing surfaces.

mod document;
mod node;
mod reconciler;

pub use document::{Document, SnapshotError, Surface};
pub use node::{CreateHook, MountGuard, PropValue, VNode};
pub use reconciler::{CommittedNode, DomReconciler, Reconciler};
