//! [`Host`] over the live document.
//!
//! SYSTEM CONTEXT
//! ==============
//! Page behaviours bind handlers through the element's `on*` properties, so a
//! re-render of the same template replaces rather than stacks handlers. The
//! callbacks are owned by [`HandlerSlots`] and released on rebind.
//! Title and active tab go to the shell's chrome signal instead of the DOM.

use leptos::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{Element, HtmlElement, HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement};

use crate::host::{ClickHandler, HashHandler, Host, InputHandler, SubmitHandler, Task};
use crate::router::routes::PageId;
use crate::state::chrome::ChromeState;
use crate::util::handler_slots::HandlerSlots;

type EventCallback = Closure<dyn FnMut(web_sys::Event)>;

pub struct DomHost {
    chrome: RwSignal<ChromeState>,
    handlers: HandlerSlots<EventCallback>,
}

impl DomHost {
    pub fn new(chrome: RwSignal<ChromeState>) -> Self {
        Self { chrome, handlers: HandlerSlots::default() }
    }
}

fn element(id: &str) -> Option<Element> {
    web_sys::window()?.document()?.get_element_by_id(id)
}

fn html_element(id: &str) -> Option<HtmlElement> {
    element(id)?.dyn_into::<HtmlElement>().ok()
}

fn field_value(el: &Element) -> Option<String> {
    if let Some(input) = el.dyn_ref::<HtmlInputElement>() {
        return Some(input.value());
    }
    if let Some(area) = el.dyn_ref::<HtmlTextAreaElement>() {
        return Some(area.value());
    }
    el.dyn_ref::<HtmlSelectElement>().map(HtmlSelectElement::value)
}

/// `data-key` of the closest keyed ancestor of the event target.
fn data_key(event: &web_sys::Event) -> Option<String> {
    event
        .target()
        .and_then(|t| t.dyn_into::<Element>().ok())
        .and_then(|el| el.closest("[data-key]").ok().flatten())
        .and_then(|el| el.get_attribute("data-key"))
}

impl Host for DomHost {
    fn current_hash(&self) -> String {
        web_sys::window().and_then(|w| w.location().hash().ok()).unwrap_or_default()
    }

    fn set_hash(&self, hash: &str) {
        if let Some(window) = web_sys::window() {
            let _ = window.location().set_hash(hash);
        }
    }

    fn on_hash_change(&self, handler: HashHandler) {
        let Some(window) = web_sys::window() else {
            log::warn!("no window; hash changes will not be routed");
            return;
        };
        let cb = Closure::wrap(Box::new(move |_: web_sys::Event| {
            let hash = web_sys::window()
                .and_then(|w| w.location().hash().ok())
                .unwrap_or_default();
            handler(hash);
        }) as Box<dyn FnMut(web_sys::Event)>);
        if window.add_event_listener_with_callback("hashchange", cb.as_ref().unchecked_ref()).is_ok() {
            // Lives for the rest of the page.
            cb.forget();
        }
    }

    fn set_title(&self, title: &str) {
        let title = title.to_owned();
        self.chrome.update(|c| c.title = title);
    }

    fn set_active_tab(&self, page: PageId) {
        self.chrome.update(|c| c.active_tab = Some(page));
    }

    fn set_html(&self, id: &str, html: &str) -> bool {
        element(id).map(|el| el.set_inner_html(html)).is_some()
    }

    fn set_text(&self, id: &str, text: &str) -> bool {
        element(id).map(|el| el.set_text_content(Some(text))).is_some()
    }

    fn set_attribute(&self, id: &str, name: &str, value: &str) -> bool {
        element(id).is_some_and(|el| el.set_attribute(name, value).is_ok())
    }

    fn set_hidden(&self, id: &str, hidden: bool) -> bool {
        element(id).is_some_and(|el| el.class_list().toggle_with_force("hidden", hidden).is_ok())
    }

    fn set_disabled(&self, id: &str, disabled: bool) -> bool {
        element(id).is_some_and(|el| {
            if disabled {
                el.set_attribute("disabled", "").is_ok()
            } else {
                el.remove_attribute("disabled").is_ok()
            }
        })
    }

    fn input_value(&self, id: &str) -> Option<String> {
        field_value(&element(id)?)
    }

    fn set_input_value(&self, id: &str, value: &str) -> bool {
        let Some(el) = element(id) else {
            return false;
        };
        if let Some(input) = el.dyn_ref::<HtmlInputElement>() {
            input.set_value(value);
        } else if let Some(area) = el.dyn_ref::<HtmlTextAreaElement>() {
            area.set_value(value);
        } else if let Some(select) = el.dyn_ref::<HtmlSelectElement>() {
            select.set_value(value);
        } else {
            return false;
        }
        true
    }

    fn on_click(&self, id: &str, handler: ClickHandler) -> bool {
        let Some(el) = html_element(id) else {
            return false;
        };
        let cb = Closure::wrap(Box::new(move |ev: web_sys::Event| {
            handler(data_key(&ev));
        }) as Box<dyn FnMut(web_sys::Event)>);
        el.set_onclick(Some(cb.as_ref().unchecked_ref()));
        self.handlers.replace(id, "click", cb);
        true
    }

    fn on_submit(&self, id: &str, handler: SubmitHandler) -> bool {
        let Some(el) = html_element(id) else {
            return false;
        };
        let cb = Closure::wrap(Box::new(move |ev: web_sys::Event| {
            ev.prevent_default();
            handler();
        }) as Box<dyn FnMut(web_sys::Event)>);
        el.set_onsubmit(Some(cb.as_ref().unchecked_ref()));
        self.handlers.replace(id, "submit", cb);
        true
    }

    fn on_input(&self, id: &str, handler: InputHandler) -> bool {
        let Some(el) = html_element(id) else {
            return false;
        };
        let cb = Closure::wrap(Box::new(move |ev: web_sys::Event| {
            let value = ev
                .target()
                .and_then(|t| t.dyn_into::<Element>().ok())
                .and_then(|el| field_value(&el))
                .unwrap_or_default();
            handler(value);
        }) as Box<dyn FnMut(web_sys::Event)>);
        el.set_oninput(Some(cb.as_ref().unchecked_ref()));
        self.handlers.replace(id, "input", cb);
        true
    }

    fn notify(&self, message: &str) {
        match web_sys::window() {
            Some(window) => {
                let _ = window.alert_with_message(message);
            }
            None => log::warn!("notice: {message}"),
        }
    }

    fn spawn(&self, task: Task) {
        leptos::task::spawn_local(task);
    }

    #[allow(clippy::cast_possible_truncation)]
    fn now_ms(&self) -> i64 {
        js_sys::Date::now() as i64
    }
}
