//! In-memory environment
//!
//! Implements every capability trait over plain data behind a shared lock.
//! Clones share state, so a test can hand one clone to a router and inspect
//! the element tree, location and outbound posts through another.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;

use super::{
    Document, ElementHandle, EventKind, EventSource, FrameMessaging, Layout, Navigation,
    ParentMessaging, Subscription,
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryElement {
    pub tag: String,
    pub attributes: BTreeMap<String, String>,
    pub class: Option<String>,
    pub style: BTreeMap<String, String>,
    pub parent: Option<ElementHandle>,
    pub children: Vec<ElementHandle>,
    /// Root elements are part of the page from the start (outlets).
    pub root: bool,
}

impl MemoryElement {
    pub fn id(&self) -> Option<&str> {
        self.attributes.get("id").map(String::as_str)
    }

    pub fn attached(&self) -> bool {
        self.root || self.parent.is_some()
    }
}

/// A post from the shell into a frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FramePost {
    pub frame: ElementHandle,
    pub payload: Value,
    pub target_origin: String,
}

/// A post from a guest to its parent.
#[derive(Debug, Clone, PartialEq)]
pub struct ParentPost {
    pub payload: Value,
    pub target_origin: String,
}

#[derive(Debug, Default)]
struct MemoryState {
    origin: String,
    hash: String,
    history: Vec<String>,
    elements: Vec<MemoryElement>,
    frame_posts: Vec<FramePost>,
    parent_posts: Vec<ParentPost>,
    listeners: BTreeMap<u64, EventKind>,
    next_listener: u64,
    document_height: f64,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryEnvironment {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryEnvironment {
    pub fn new(origin: impl Into<String>) -> Self {
        let hash = String::new();
        let state = MemoryState {
            origin: origin.into(),
            history: vec![hash.clone()],
            hash,
            ..MemoryState::default()
        };
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    /// Builder-style hash preset, as if the page was opened with it.
    pub fn with_hash(self, hash: &str) -> Self {
        {
            let mut state = self.state.lock();
            state.hash = strip_hash_sign(hash).to_string();
            state.history = vec![state.hash.clone()];
        }
        self
    }

    /// Add a root element carrying `id`, e.g. an outlet.
    pub fn add_root(&self, tag: &str, id: &str) -> ElementHandle {
        let mut state = self.state.lock();
        let handle = ElementHandle(state.elements.len() as u64);
        let mut element = MemoryElement {
            tag: tag.to_string(),
            root: true,
            ..MemoryElement::default()
        };
        element.attributes.insert("id".to_string(), id.to_string());
        state.elements.push(element);
        handle
    }

    pub fn add_outlet(&self, id: &str) -> ElementHandle {
        self.add_root("div", id)
    }

    /// Simulate the user editing the address bar: pushes a history entry.
    /// The caller dispatches the hash-change event.
    pub fn navigate_hash(&self, hash: &str) {
        let mut state = self.state.lock();
        state.hash = strip_hash_sign(hash).to_string();
        let hash = state.hash.clone();
        state.history.push(hash);
    }

    pub fn history_len(&self) -> usize {
        self.state.lock().history.len()
    }

    pub fn set_document_height(&self, height: f64) {
        self.state.lock().document_height = height;
    }

    pub fn element(&self, handle: ElementHandle) -> Option<MemoryElement> {
        self.state.lock().elements.get(handle.0 as usize).cloned()
    }

    pub fn element_by_id(&self, id: &str) -> Option<MemoryElement> {
        let handle = self.get_element_by_id(id)?;
        self.element(handle)
    }

    /// Number of elements (attached or not) whose id is `id`.
    pub fn count_with_id(&self, id: &str) -> usize {
        self.state
            .lock()
            .elements
            .iter()
            .filter(|e| e.id() == Some(id))
            .count()
    }

    pub fn style(&self, id: &str, property: &str) -> Option<String> {
        self.element_by_id(id)?.style.get(property).cloned()
    }

    pub fn is_displayed(&self, id: &str) -> bool {
        self.style(id, "display").as_deref() == Some("block")
    }

    pub fn frame_posts(&self) -> Vec<FramePost> {
        self.state.lock().frame_posts.clone()
    }

    pub fn take_frame_posts(&self) -> Vec<FramePost> {
        std::mem::take(&mut self.state.lock().frame_posts)
    }

    /// Payloads posted to the frame with element id `id`.
    pub fn posts_to(&self, id: &str) -> Vec<Value> {
        let Some(handle) = self.get_element_by_id(id) else {
            return Vec::new();
        };
        self.state
            .lock()
            .frame_posts
            .iter()
            .filter(|post| post.frame == handle)
            .map(|post| post.payload.clone())
            .collect()
    }

    pub fn parent_posts(&self) -> Vec<ParentPost> {
        self.state.lock().parent_posts.clone()
    }

    pub fn take_parent_posts(&self) -> Vec<ParentPost> {
        std::mem::take(&mut self.state.lock().parent_posts)
    }

    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.state
            .lock()
            .listeners
            .values()
            .filter(|k| **k == kind)
            .count()
    }
}

fn strip_hash_sign(hash: &str) -> &str {
    hash.strip_prefix('#').unwrap_or(hash)
}

impl Document for MemoryEnvironment {
    fn get_element_by_id(&self, id: &str) -> Option<ElementHandle> {
        self.state
            .lock()
            .elements
            .iter()
            .position(|e| e.attached() && e.id() == Some(id))
            .map(|index| ElementHandle(index as u64))
    }

    fn create_element(&mut self, tag: &str) -> ElementHandle {
        let mut state = self.state.lock();
        let handle = ElementHandle(state.elements.len() as u64);
        state.elements.push(MemoryElement {
            tag: tag.to_string(),
            ..MemoryElement::default()
        });
        handle
    }

    fn set_attribute(&mut self, element: ElementHandle, name: &str, value: &str) {
        if let Some(e) = self.state.lock().elements.get_mut(element.0 as usize) {
            e.attributes.insert(name.to_string(), value.to_string());
        }
    }

    fn set_class(&mut self, element: ElementHandle, class: &str) {
        if let Some(e) = self.state.lock().elements.get_mut(element.0 as usize) {
            e.class = Some(class.to_string());
        }
    }

    fn set_style_property(&mut self, element: ElementHandle, property: &str, value: &str) {
        if let Some(e) = self.state.lock().elements.get_mut(element.0 as usize) {
            e.style.insert(property.to_string(), value.to_string());
        }
    }

    fn append_child(&mut self, parent: ElementHandle, child: ElementHandle) {
        let mut state = self.state.lock();
        let in_bounds = |h: ElementHandle| (h.0 as usize) < state.elements.len();
        if !in_bounds(parent) || !in_bounds(child) {
            return;
        }
        state.elements[child.0 as usize].parent = Some(parent);
        state.elements[parent.0 as usize].children.push(child);
    }
}

impl Navigation for MemoryEnvironment {
    fn origin(&self) -> String {
        self.state.lock().origin.clone()
    }

    fn hash(&self) -> String {
        self.state.lock().hash.clone()
    }

    fn replace_hash(&mut self, hash: &str) {
        let mut state = self.state.lock();
        state.hash = strip_hash_sign(hash).to_string();
        let hash = state.hash.clone();
        if let Some(current) = state.history.last_mut() {
            *current = hash;
        }
    }
}

impl FrameMessaging for MemoryEnvironment {
    fn post_to_frame(&mut self, frame: ElementHandle, payload: &Value, target_origin: &str) {
        self.state.lock().frame_posts.push(FramePost {
            frame,
            payload: payload.clone(),
            target_origin: target_origin.to_string(),
        });
    }
}

impl ParentMessaging for MemoryEnvironment {
    fn post_to_parent(&mut self, payload: &Value, target_origin: &str) {
        self.state.lock().parent_posts.push(ParentPost {
            payload: payload.clone(),
            target_origin: target_origin.to_string(),
        });
    }
}

impl EventSource for MemoryEnvironment {
    fn subscribe(&mut self, kind: EventKind) -> Subscription {
        let mut state = self.state.lock();
        let id = state.next_listener;
        state.next_listener += 1;
        state.listeners.insert(id, kind);
        Subscription { id, kind }
    }

    fn unsubscribe(&mut self, subscription: Subscription) {
        self.state.lock().listeners.remove(&subscription.id);
    }
}

impl Layout for MemoryEnvironment {
    fn document_height(&self) -> f64 {
        self.state.lock().document_height
    }
}
