//! Owned storage for callbacks bound to elements by id.
//!
//! Page loads rebind the same ids over and over. Keeping one slot per
//! `(id, event)` releases the previous callback when its element is rebound,
//! so the number of live callbacks is bounded by the number of distinct ids.

#[cfg(test)]
#[path = "handler_slots_test.rs"]
mod handler_slots_test;

use std::cell::RefCell;
use std::collections::HashMap;

pub struct HandlerSlots<T> {
    slots: RefCell<HashMap<(String, &'static str), T>>,
}

impl<T> Default for HandlerSlots<T> {
    fn default() -> Self {
        Self { slots: RefCell::new(HashMap::new()) }
    }
}

impl<T> HandlerSlots<T> {
    /// Keep `handler` for `event` on `id`, releasing the one it replaces.
    pub fn replace(&self, id: &str, event: &'static str, handler: T) {
        let previous = self.slots.borrow_mut().insert((id.to_owned(), event), handler);
        // Released after the borrow ends; dropping may run arbitrary code.
        drop(previous);
    }

    pub fn len(&self) -> usize {
        self.slots.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.borrow().is_empty()
    }
}
