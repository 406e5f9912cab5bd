//! Browser-host seam: the fragment, the document, and the task spawner.
//!
//! SYSTEM CONTEXT
//! ==============
//! The router and page behaviours touch the page only through [`Host`]. The
//! browser implementation lives in `util::dom_host`; tests use an in-memory
//! fake so routing, gating and page logic run natively.
//!
//! Elements are addressed by id. Operations on a missing element are no-ops
//! that report `false` (or `None`) so callers can decide whether absence is
//! fatal.

use std::rc::Rc;

use futures::future::LocalBoxFuture;

use crate::router::routes::PageId;

/// A unit of deferred work (page loads, listeners, submit handlers).
pub type Task = LocalBoxFuture<'static, ()>;

/// Click on an element or one of its descendants. Receives the `data-key`
/// attribute of the closest ancestor carrying one.
pub type ClickHandler = Rc<dyn Fn(Option<String>)>;
pub type SubmitHandler = Rc<dyn Fn()>;
/// Receives the element's current value.
pub type InputHandler = Rc<dyn Fn(String)>;
/// Receives the new fragment, including the leading `#`.
pub type HashHandler = Rc<dyn Fn(String)>;

pub trait Host {
    /// Current fragment including `#`, or empty.
    fn current_hash(&self) -> String;
    /// Replace the fragment; the host later fires the hash-change handler.
    fn set_hash(&self, hash: &str);
    fn on_hash_change(&self, handler: HashHandler);

    fn set_title(&self, title: &str);
    /// Mark the navigation tab for `page` active and every other tab inactive.
    fn set_active_tab(&self, page: PageId);

    fn set_html(&self, id: &str, html: &str) -> bool;
    fn set_text(&self, id: &str, text: &str) -> bool;
    fn set_attribute(&self, id: &str, name: &str, value: &str) -> bool;
    /// Toggle the `hidden` class.
    fn set_hidden(&self, id: &str, hidden: bool) -> bool;
    fn set_disabled(&self, id: &str, disabled: bool) -> bool;
    /// Value of an input, textarea or select.
    fn input_value(&self, id: &str) -> Option<String>;
    fn set_input_value(&self, id: &str, value: &str) -> bool;

    /// Replace any click handler previously bound to `id`.
    fn on_click(&self, id: &str, handler: ClickHandler) -> bool;
    /// Replace any submit handler previously bound to `id`; default form
    /// submission is suppressed.
    fn on_submit(&self, id: &str, handler: SubmitHandler) -> bool;
    fn on_input(&self, id: &str, handler: InputHandler) -> bool;

    /// Blocking user notice.
    fn notify(&self, message: &str);
    fn spawn(&self, task: Task);
    fn now_ms(&self) -> i64;
}
