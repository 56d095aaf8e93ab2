//! Scoped keyboard subscriptions
//!
//! The hub plays the role of the window: it outlives any single view. A view
//! binds keys through [`KeyboardHub::subscribe`] and keeps the returned
//! [`KeySubscription`] guards; dropping a guard removes its binding, so a torn
//! down view never receives key events again.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

/// Keys the view reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Enter,
    Escape,
}

#[derive(Debug)]
struct Binding<A> {
    id: u64,
    key: Key,
    action: A,
}

#[derive(Debug)]
struct HubInner<A> {
    next_id: AtomicU64,
    bindings: Mutex<Vec<Binding<A>>>,
}

/// Registry of key bindings, each mapping a key to an action value
#[derive(Debug)]
pub struct KeyboardHub<A> {
    inner: Arc<HubInner<A>>,
}

impl<A: Clone> Default for KeyboardHub<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Clone> KeyboardHub<A> {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(HubInner {
                next_id: AtomicU64::new(1),
                bindings: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Bind `key` to `action` until the returned guard is dropped
    #[must_use = "dropping the subscription removes the binding immediately"]
    pub fn subscribe(&self, key: Key, action: A) -> KeySubscription<A> {
        let id = self.inner.next_id.fetch_add(1, Ordering::SeqCst);
        self.inner.bindings.lock().push(Binding { id, key, action });

        KeySubscription {
            id,
            key,
            hub: Arc::downgrade(&self.inner),
        }
    }

    /// Actions bound to `key`, in subscription order
    pub fn dispatch(&self, key: Key) -> Vec<A> {
        self.inner
            .bindings
            .lock()
            .iter()
            .filter(|binding| binding.key == key)
            .map(|binding| binding.action.clone())
            .collect()
    }

    /// Get the count of active bindings
    pub fn binding_count(&self) -> usize {
        self.inner.bindings.lock().len()
    }
}

/// Guard for a single key binding
#[derive(Debug)]
pub struct KeySubscription<A> {
    id: u64,
    key: Key,
    hub: Weak<HubInner<A>>,
}

impl<A> KeySubscription<A> {
    pub fn key(&self) -> Key {
        self.key
    }
}

impl<A> Drop for KeySubscription<A> {
    fn drop(&mut self) {
        if let Some(hub) = self.hub.upgrade() {
            hub.bindings.lock().retain(|binding| binding.id != self.id);
        }
    }
}
