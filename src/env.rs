//! Capability traits for the browser collaborators
//!
//! The router and the adapter never touch a real document, location or
//! message channel directly; they go through these traits. A browser binding
//! implements them over the DOM, [`memory::MemoryEnvironment`] implements them
//! in memory for tests and the simulator.

pub mod memory;

use serde_json::Value;

/// Opaque reference to an element owned by the environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementHandle(pub u64);

/// Element tree operations used to create, find, show and hide frames.
pub trait Document {
    fn get_element_by_id(&self, id: &str) -> Option<ElementHandle>;

    fn create_element(&mut self, tag: &str) -> ElementHandle;

    fn set_attribute(&mut self, element: ElementHandle, name: &str, value: &str);

    fn set_class(&mut self, element: ElementHandle, class: &str);

    fn set_style_property(&mut self, element: ElementHandle, property: &str, value: &str);

    fn append_child(&mut self, parent: ElementHandle, child: ElementHandle);
}

/// The page location.
pub trait Navigation {
    /// Origin of the current page, e.g. `https://shell.example`.
    fn origin(&self) -> String;

    /// Current fragment without the leading `#`.
    fn hash(&self) -> String;

    /// Replace the current history entry with one carrying `hash`.
    /// Must not push a new entry and must not fire a hash-change event.
    fn replace_hash(&mut self, hash: &str);
}

/// Host side of the message channel.
pub trait FrameMessaging {
    fn post_to_frame(&mut self, frame: ElementHandle, payload: &Value, target_origin: &str);
}

/// Guest side of the message channel.
pub trait ParentMessaging {
    fn post_to_parent(&mut self, payload: &Value, target_origin: &str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventKind {
    Message,
    HashChange,
    Load,
    Resize,
}

/// Token for one registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Subscription {
    pub id: u64,
    pub kind: EventKind,
}

/// Listener registration. The environment dispatches subscribed events to
/// the owner's `handle_*` methods.
pub trait EventSource {
    fn subscribe(&mut self, kind: EventKind) -> Subscription;

    fn unsubscribe(&mut self, subscription: Subscription);
}

/// Rendered size of the guest document.
pub trait Layout {
    fn document_height(&self) -> f64;
}

/// Everything the shell router needs.
pub trait HostEnvironment: Document + Navigation + FrameMessaging + EventSource {}

impl<T: Document + Navigation + FrameMessaging + EventSource> HostEnvironment for T {}

/// Everything the embedded app adapter needs.
pub trait GuestEnvironment: Navigation + ParentMessaging + EventSource + Layout {}

impl<T: Navigation + ParentMessaging + EventSource + Layout> GuestEnvironment for T {}

/// Listeners acquired by an `init` call.
///
/// The copy returned to the caller is a read-only record of what was
/// registered. Listeners are released by the owner's `teardown` or drop;
/// dropping this value releases nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Subscriptions {
    entries: Vec<Subscription>,
}

impl Subscriptions {
    pub(crate) fn acquire<E: EventSource>(env: &mut E, kinds: &[EventKind]) -> Self {
        Self {
            entries: kinds.iter().map(|kind| env.subscribe(*kind)).collect(),
        }
    }

    pub(crate) fn release<E: EventSource>(self, env: &mut E) {
        for subscription in self.entries {
            env.unsubscribe(subscription);
        }
    }

    pub fn kinds(&self) -> Vec<EventKind> {
        self.entries.iter().map(|s| s.kind).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
