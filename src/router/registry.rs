//! Frame registry: route path → created frame

use std::collections::HashMap;

use crate::env::ElementHandle;

/// Frames created by the router, keyed by route path.
///
/// Entries are only ever added; a frame lives as long as the router.
#[derive(Debug, Default)]
pub struct FrameRegistry {
    frames: HashMap<String, ElementHandle>,
}

impl FrameRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Frame created for `path`, if any.
    pub fn get(&self, path: &str) -> Option<ElementHandle> {
        self.frames.get(path).copied()
    }

    /// Record a frame. Returns false, leaving the existing entry, if `path`
    /// already has one.
    pub fn register(&mut self, path: &str, frame: ElementHandle) -> bool {
        if self.frames.contains_key(path) {
            return false;
        }
        self.frames.insert(path.to_string(), frame);
        true
    }

    /// Number of frames created.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// True before the first frame is created.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}
