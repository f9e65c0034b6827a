//! Described (not yet committed) view nodes.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Resources held for as long as a node stays mounted. Dropped on unmount.
pub type MountGuard = Box<dyn Send>;

/// Fired once when a node is first mounted.
pub type CreateHook = Arc<dyn Fn() -> MountGuard + Send + Sync>;

#[derive(Debug, Clone, PartialEq)]
pub enum PropValue {
    Str(String),
    Num(f64),
    Bool(bool),
}

impl PropValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_num(&self) -> Option<f64> {
        match self {
            PropValue::Num(n) => Some(*n),
            _ => None,
        }
    }
}

impl From<&str> for PropValue {
    fn from(value: &str) -> Self {
        PropValue::Str(value.to_string())
    }
}

impl From<String> for PropValue {
    fn from(value: String) -> Self {
        PropValue::Str(value)
    }
}

impl From<f64> for PropValue {
    fn from(value: f64) -> Self {
        PropValue::Num(value)
    }
}

impl From<u32> for PropValue {
    fn from(value: u32) -> Self {
        PropValue::Num(value as f64)
    }
}

impl From<bool> for PropValue {
    fn from(value: bool) -> Self {
        PropValue::Bool(value)
    }
}

/// Element description handed to a [`Reconciler`](super::Reconciler).
#[derive(Clone)]
pub struct VNode {
    tag: String,
    props: BTreeMap<String, PropValue>,
    on_create: Option<CreateHook>,
    children: Vec<VNode>,
}

impl VNode {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            props: BTreeMap::new(),
            on_create: None,
            children: Vec::new(),
        }
    }

    pub fn prop(mut self, key: impl Into<String>, value: impl Into<PropValue>) -> Self {
        self.props.insert(key.into(), value.into());
        self
    }

    pub fn on_create<F>(mut self, hook: F) -> Self
    where
        F: Fn() -> MountGuard + Send + Sync + 'static,
    {
        self.on_create = Some(Arc::new(hook));
        self
    }

    pub fn child(mut self, child: VNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = VNode>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn props(&self) -> &BTreeMap<String, PropValue> {
        &self.props
    }

    pub fn id(&self) -> Option<&str> {
        self.props.get("id").and_then(PropValue::as_str)
    }

    pub fn child_nodes(&self) -> &[VNode] {
        &self.children
    }

    pub fn create_hook(&self) -> Option<&CreateHook> {
        self.on_create.as_ref()
    }

    pub(crate) fn into_parts(
        self,
    ) -> (
        String,
        BTreeMap<String, PropValue>,
        Option<CreateHook>,
        Vec<VNode>,
    ) {
        (self.tag, self.props, self.on_create, self.children)
    }
}

impl fmt::Debug for VNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VNode")
            .field("tag", &self.tag)
            .field("props", &self.props)
            .field("on_create", &self.on_create.is_some())
            .field("children", &self.children)
            .finish()
    }
}
