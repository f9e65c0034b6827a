//! Committing described nodes into a live tree.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use super::document::Document;
use super::node::{MountGuard, PropValue, VNode};

/// Render boundary: turns described nodes into a committed tree.
pub trait Reconciler {
    type Node;
    type Committed;

    /// Commit `node` with nothing previously mounted.
    fn mount(&mut self, node: Self::Node) -> Self::Committed;

    /// Reconcile `next` against the previously committed tree.
    fn patch(&mut self, previous: Self::Committed, next: Self::Node) -> Self::Committed;

    /// Release everything `committed` holds.
    fn unmount(&mut self, committed: Self::Committed) {
        drop(committed);
    }
}

/// A node as it currently exists in the document.
pub struct CommittedNode {
    tag: String,
    props: BTreeMap<String, PropValue>,
    children: Vec<CommittedNode>,
    guard: Option<MountGuard>,
}

impl CommittedNode {
    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn props(&self) -> &BTreeMap<String, PropValue> {
        &self.props
    }

    pub fn children(&self) -> &[CommittedNode] {
        &self.children
    }

    pub fn id(&self) -> Option<&str> {
        self.props.get("id").and_then(PropValue::as_str)
    }

    /// True while the node holds resources acquired by its create hook.
    pub fn is_holding_resources(&self) -> bool {
        self.guard.is_some()
    }

    /// Depth-first search by `id` prop.
    pub fn find(&self, id: &str) -> Option<&CommittedNode> {
        if self.id() == Some(id) {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }
}

/// Structural equality: tag, props and children. Mount guards are ignored.
impl PartialEq for CommittedNode {
    fn eq(&self, other: &Self) -> bool {
        self.tag == other.tag && self.props == other.props && self.children == other.children
    }
}

impl fmt::Debug for CommittedNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommittedNode")
            .field("tag", &self.tag)
            .field("props", &self.props)
            .field("children", &self.children)
            .finish()
    }
}

/// Positional reconciler over an in-memory [`Document`].
///
/// Nodes match when tag and `id` agree at the same position; a match keeps
/// its mount guard, anything else is torn down and created afresh. `canvas`
/// elements get a surface in the document for as long as they are mounted.
pub struct DomReconciler {
    document: Arc<Document>,
}

impl DomReconciler {
    pub fn new(document: Arc<Document>) -> Self {
        Self { document }
    }

    pub fn document(&self) -> &Arc<Document> {
        &self.document
    }

    fn create(&mut self, node: VNode) -> CommittedNode {
        let (tag, props, on_create, children) = node.into_parts();
        let children = children
            .into_iter()
            .map(|child| self.create(child))
            .collect();

        let committed = CommittedNode {
            tag,
            props,
            children,
            guard: None,
        };
        self.sync_surface(&committed);

        CommittedNode {
            guard: on_create.map(|hook| hook()),
            ..committed
        }
    }

    fn update(&mut self, previous: CommittedNode, next: VNode) -> CommittedNode {
        let CommittedNode {
            children: old_children,
            guard,
            ..
        } = previous;
        let (tag, props, _, new_children) = next.into_parts();

        let mut old_children = old_children.into_iter();
        let mut children = Vec::with_capacity(new_children.len());
        for child in new_children {
            let committed = match old_children.next() {
                Some(old) => self.patch(old, child),
                None => self.create(child),
            };
            children.push(committed);
        }
        for stale in old_children {
            self.destroy(stale);
        }

        let committed = CommittedNode {
            tag,
            props,
            children,
            guard,
        };
        self.sync_surface(&committed);
        committed
    }

    fn destroy(&mut self, node: CommittedNode) {
        let CommittedNode {
            tag,
            props,
            children,
            guard,
        } = node;
        for child in children {
            self.destroy(child);
        }
        if tag == "canvas" {
            if let Some(id) = props.get("id").and_then(PropValue::as_str) {
                self.document.detach(id);
            }
        }
        drop(guard);
    }

    fn sync_surface(&self, node: &CommittedNode) {
        if node.tag != "canvas" {
            return;
        }
        let Some(id) = node.id() else {
            return;
        };
        let dimension = |key: &str| {
            node.props
                .get(key)
                .and_then(PropValue::as_num)
                .map_or(0, |v| v.max(0.0) as u32)
        };
        self.document.attach(id, dimension("width"), dimension("height"));
    }
}

fn same_element(previous: &CommittedNode, next: &VNode) -> bool {
    previous.tag == next.tag() && previous.id() == next.id()
}

impl Reconciler for DomReconciler {
    type Node = VNode;
    type Committed = CommittedNode;

    fn mount(&mut self, node: VNode) -> CommittedNode {
        self.create(node)
    }

    fn patch(&mut self, previous: CommittedNode, next: VNode) -> CommittedNode {
        if same_element(&previous, &next) {
            self.update(previous, next)
        } else {
            self.destroy(previous);
            self.create(next)
        }
    }

    fn unmount(&mut self, committed: CommittedNode) {
        self.destroy(committed);
    }
}
