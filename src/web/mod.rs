//! Browser bindings
//!
//! Finds triggers in the page, registers them and wires their click
//! listeners. Listener closures live in [`Bindings`] rather than being
//! forgotten, so disposing removes them from the page and frees them.

pub mod host;
pub mod popover;

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, HtmlElement};

use crate::actions;
use crate::binder::{register, Registration};
use crate::config::{BinderConfig, CONFIG_ELEMENT_ID};
use crate::error::{ActionError, ActionResult};
use crate::trigger::Role;

pub use host::WebHost;

// Bindings made by the page bootstrap stay alive for the page's lifetime
thread_local! {
    static PAGE_BINDINGS: RefCell<Option<Bindings>> = RefCell::new(None);
}

struct ClickListener {
    element: HtmlElement,
    callback: Closure<dyn FnMut(Event)>,
}

/// Live trigger bindings; dropping them unbinds everything
pub struct Bindings {
    listeners: Vec<ClickListener>,
    registration: Registration<WebHost>,
}

impl Bindings {
    pub fn len(&self) -> usize {
        self.registration.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registration.is_empty()
    }

    /// Remove click listeners, cancel pending feedback and restore labels
    pub fn dispose(&mut self) {
        for listener in self.listeners.drain(..) {
            listener
                .element
                .remove_event_listener_with_callback("click", listener.callback.as_ref().unchecked_ref())
                .ok();
        }
        self.registration.dispose();
    }
}

impl Drop for Bindings {
    fn drop(&mut self) {
        self.dispose();
    }
}

fn current_document() -> ActionResult<Document> {
    web_sys::window()
        .and_then(|w| w.document())
        .ok_or(ActionError::NoDocument)
}

/// Only links navigate on click; buttons and other triggers keep their default action
fn prevents_default(tag_name: &str) -> bool {
    tag_name.eq_ignore_ascii_case("a")
}

/// Matching elements under `root` that are `HtmlElement`s
fn collect(root: &Element, selector: &str, role: Role) -> ActionResult<Vec<(Role, HtmlElement)>> {
    let nodes = root.query_selector_all(selector)?;
    Ok((0..nodes.length())
        .filter_map(|i| nodes.item(i))
        .filter_map(|node| node.dyn_into::<HtmlElement>().ok())
        .map(|element| (role, element))
        .collect())
}

/// Bind every copy and download trigger under `root`
pub fn bind(root: &Element, config: BinderConfig) -> ActionResult<Bindings> {
    let document = root.owner_document().ok_or(ActionError::NoDocument)?;

    let mut candidates = collect(root, &config.copy_selector, Role::Copy)?;
    candidates.extend(collect(root, &config.download_selector, Role::Download)?);

    let host = Rc::new(WebHost::new(document, &config));
    let registration = register(host, Rc::new(config), candidates);

    let mut listeners = Vec::new();
    for trigger in registration.triggers() {
        let context = Rc::clone(registration.context());
        let target = Rc::clone(&trigger);
        let callback = Closure::wrap(Box::new(move |event: Event| {
            if prevents_default(&target.element.tag_name()) {
                event.prevent_default();
            }
            actions::run(&context, &target);
        }) as Box<dyn FnMut(Event)>);

        if let Err(e) = trigger
            .element
            .add_event_listener_with_callback("click", callback.as_ref().unchecked_ref())
        {
            log::warn!("Failed to add click listener to trigger {}: {:?}", trigger.id.0, e);
            continue;
        }
        listeners.push(ClickListener {
            element: trigger.element.clone(),
            callback,
        });
    }

    log::info!("Bound {} UI action trigger(s)", registration.len());
    Ok(Bindings {
        listeners,
        registration,
    })
}

/// Bind every trigger in the current document
pub fn bind_document(config: BinderConfig) -> ActionResult<Bindings> {
    let document = current_document()?;
    let root = document.document_element().ok_or(ActionError::NoDocument)?;
    bind(&root, config)
}

/// Configuration from the page's JSON config element, or the defaults
pub fn page_config(document: &Document) -> BinderConfig {
    let Some(element) = document.get_element_by_id(CONFIG_ELEMENT_ID) else {
        return BinderConfig::default();
    };
    let json = element.text_content().unwrap_or_default();
    match BinderConfig::from_json(&json) {
        Ok(config) => config,
        Err(e) => {
            log::warn!("Ignoring #{}: {}", CONFIG_ELEMENT_ID, e);
            BinderConfig::default()
        }
    }
}

fn bind_page() {
    let result = current_document().and_then(|document| bind_document(page_config(&document)));
    match result {
        Ok(bindings) => PAGE_BINDINGS.with(|slot| {
            // replacing drops (and disposes) any earlier bindings
            *slot.borrow_mut() = Some(bindings);
        }),
        Err(e) => log::error!("Failed to bind UI actions: {}", e),
    }
}

/// Bind the page once the DOM is ready
pub fn bind_when_ready() -> ActionResult<()> {
    let document = current_document()?;
    if document.ready_state() != "loading" {
        bind_page();
        return Ok(());
    }

    let on_ready = Closure::once_into_js(bind_page);
    document.add_event_listener_with_callback("DOMContentLoaded", on_ready.unchecked_ref())?;
    Ok(())
}

/// Unbind whatever the page bootstrap bound
pub fn unbind_page() {
    let bindings = PAGE_BINDINGS.with(|slot| slot.borrow_mut().take());
    drop(bindings);
}
