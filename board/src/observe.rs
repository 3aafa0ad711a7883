//! Listener registry shared by every observable model element.
//!
//! Listeners are delivered events synchronously, on the caller's stack, in
//! the order they were registered. A broadcast iterates a snapshot of the
//! registered handles, so the registry may change between broadcasts without
//! affecting one already in flight.

use std::{collections::BTreeMap, fmt, rc::Rc};

use fivetwelve_core::{Event, ListenerId};

/// Callback invoked for every event broadcast by an observable element.
pub type Listener = Rc<dyn Fn(&Event)>;

/// Ordered set of listeners keyed by the handle returned on registration.
#[derive(Clone, Default)]
pub struct Observers {
    next_id: u32,
    listeners: BTreeMap<ListenerId, Listener>,
}

impl Observers {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a listener, returning the handle needed to remove it.
    ///
    /// Handles wrap around after `u32::MAX` registrations but never collide
    /// with one still registered.
    pub fn add(&mut self, listener: Listener) -> ListenerId {
        let mut id = ListenerId::new(self.next_id);
        while self.listeners.contains_key(&id) {
            self.next_id = self.next_id.wrapping_add(1);
            id = ListenerId::new(self.next_id);
        }
        self.next_id = self.next_id.wrapping_add(1);
        let _ = self.listeners.insert(id, listener);
        id
    }

    /// Unregisters a listener. Returns `false` when the handle is unknown.
    pub fn remove(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(&id).is_some()
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Reports whether no listener is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Invokes every registered listener with the event, in registration order.
    pub fn notify_all(&self, event: &Event) {
        let snapshot: Vec<Listener> = self.listeners.values().cloned().collect();
        for listener in snapshot {
            listener(event);
        }
    }
}

impl fmt::Debug for Observers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observers")
            .field("listeners", &self.listeners.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Capability of model elements that broadcast [`Event`] values.
pub trait Observable {
    /// Registry backing this element.
    fn observers(&self) -> &Observers;

    /// Mutable registry backing this element.
    fn observers_mut(&mut self) -> &mut Observers;

    /// Registers a listener with this element.
    fn add_listener(&mut self, listener: Listener) -> ListenerId {
        self.observers_mut().add(listener)
    }

    /// Unregisters a listener from this element.
    fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.observers_mut().remove(id)
    }

    /// Broadcasts the event to every listener registered with this element.
    fn notify_all(&self, event: &Event) {
        self.observers().notify_all(event);
    }
}
