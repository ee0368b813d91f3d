//! Minimal popover widget
//!
//! Renders Bootstrap's popover markup (`.popover > .arrow + .popover-body`)
//! above a trigger, so existing stylesheets apply. The trigger records its
//! popover's id in [`POPOVER_ATTRIBUTE`], which is how the popover is found
//! again on hide.

use std::cell::RefCell;
use std::sync::atomic::{AtomicU32, Ordering};

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Event, HtmlElement};

use crate::error::{ActionError, ActionResult};

/// Gap between the popover and the top edge of its trigger
const ARROW_GAP_PX: f64 = 8.0;

/// Attribute on a trigger holding the id of its visible popover
pub const POPOVER_ATTRIBUTE: &str = "data-ui-actions-popover";

/// Counter for unique popover element ids
static POPOVER_ID: AtomicU32 = AtomicU32::new(0);

/// Hover and focus listeners attached to one trigger
struct HoverListeners {
    trigger: HtmlElement,
    show: Closure<dyn FnMut(Event)>,
    hide: Closure<dyn FnMut(Event)>,
}

const SHOW_EVENTS: [&str; 2] = ["mouseenter", "focus"];
const HIDE_EVENTS: [&str; 2] = ["mouseleave", "blur"];

pub struct PopoverLayer {
    document: Document,
    label_attribute: String,
    /// Content is markup rather than plain text
    html: bool,
    listeners: RefCell<Vec<HoverListeners>>,
}

impl PopoverLayer {
    pub fn new(document: Document, label_attribute: &str, html: bool) -> Self {
        Self {
            document,
            label_attribute: label_attribute.to_string(),
            html,
            listeners: RefCell::new(Vec::new()),
        }
    }

    /// Show the trigger's label on hover and focus, hide it on leave and blur
    pub fn configure(&self, trigger: &HtmlElement) {
        let document = self.document.clone();
        let label_attribute = self.label_attribute.clone();
        let html = self.html;
        let target = trigger.clone();
        let show = Closure::wrap(Box::new(move |_: Event| {
            if let Some(label) = target.get_attribute(&label_attribute) {
                if !label.is_empty() {
                    show(&document, &target, &label, html);
                }
            }
        }) as Box<dyn FnMut(Event)>);

        let document = self.document.clone();
        let target = trigger.clone();
        let hide = Closure::wrap(Box::new(move |_: Event| {
            hide(&document, &target);
        }) as Box<dyn FnMut(Event)>);

        for event in SHOW_EVENTS {
            if let Err(e) = trigger.add_event_listener_with_callback(event, show.as_ref().unchecked_ref()) {
                log::warn!("Failed to add {} listener: {:?}", event, e);
            }
        }
        for event in HIDE_EVENTS {
            if let Err(e) = trigger.add_event_listener_with_callback(event, hide.as_ref().unchecked_ref()) {
                log::warn!("Failed to add {} listener: {:?}", event, e);
            }
        }

        self.listeners.borrow_mut().push(HoverListeners {
            trigger: trigger.clone(),
            show,
            hide,
        });
    }

    /// Remove the hover listeners and any visible popover
    pub fn release(&self, trigger: &HtmlElement) {
        hide(&self.document, trigger);

        let released: Vec<HoverListeners> = {
            let mut listeners = self.listeners.borrow_mut();
            let (released, kept): (Vec<_>, Vec<_>) =
                listeners.drain(..).partition(|l| &l.trigger == trigger);
            *listeners = kept;
            released
        };

        for listener in released {
            for event in SHOW_EVENTS {
                trigger
                    .remove_event_listener_with_callback(event, listener.show.as_ref().unchecked_ref())
                    .ok();
            }
            for event in HIDE_EVENTS {
                trigger
                    .remove_event_listener_with_callback(event, listener.hide.as_ref().unchecked_ref())
                    .ok();
            }
        }
    }

    pub fn show(&self, trigger: &HtmlElement, content: &str) {
        show(&self.document, trigger, content, self.html);
    }

    pub fn hide(&self, trigger: &HtmlElement) {
        hide(&self.document, trigger);
    }
}

fn show(document: &Document, trigger: &HtmlElement, content: &str, html: bool) {
    if let Err(e) = try_show(document, trigger, content, html) {
        log::warn!("Failed to show popover: {}", e);
    }
}

fn try_show(document: &Document, trigger: &HtmlElement, content: &str, html: bool) -> ActionResult<()> {
    let popover = match current_popover(document, trigger) {
        Some(popover) => popover,
        None => {
            let popover = build_popover(document)?;
            let body = document.body().ok_or(ActionError::NoBody)?;
            body.append_child(&popover)?;
            trigger.set_attribute(POPOVER_ATTRIBUTE, &popover.id())?;
            popover
        }
    };

    if let Some(body) = popover.query_selector(".popover-body")? {
        if html {
            body.set_inner_html(content);
        } else {
            body.set_text_content(Some(content));
        }
    }
    place_above(trigger, &popover)?;
    Ok(())
}

fn hide(document: &Document, trigger: &HtmlElement) {
    if let Some(popover) = current_popover(document, trigger) {
        popover.remove();
    }
    trigger.remove_attribute(POPOVER_ATTRIBUTE).ok();
}

fn current_popover(document: &Document, trigger: &HtmlElement) -> Option<HtmlElement> {
    let id = trigger.get_attribute(POPOVER_ATTRIBUTE)?;
    document
        .get_element_by_id(&id)
        .and_then(|el| el.dyn_into::<HtmlElement>().ok())
}

/// `<div class="popover" role="tooltip"><div class="arrow"></div><div class="popover-body"></div></div>`
fn build_popover(document: &Document) -> ActionResult<HtmlElement> {
    let popover = document
        .create_element("div")?
        .dyn_into::<HtmlElement>()
        .map_err(|_| ActionError::Platform("div is not an HtmlElement".to_string()))?;
    let id = POPOVER_ID.fetch_add(1, Ordering::SeqCst);
    popover.set_id(&format!("ui-actions-popover-{}", id));
    popover.set_class_name("popover bs-popover-top fade show");
    popover.set_attribute("role", "tooltip")?;

    let arrow = document.create_element("div")?;
    arrow.set_class_name("arrow");
    popover.append_child(&arrow)?;

    let body = document.create_element("div")?;
    body.set_class_name("popover-body");
    popover.append_child(&body)?;

    let style = popover.style();
    style.set_property("position", "absolute")?;
    style.set_property("top", "0")?;
    style.set_property("left", "0")?;
    Ok(popover)
}

/// Centre the popover horizontally over the trigger, just above it
fn place_above(trigger: &HtmlElement, popover: &HtmlElement) -> ActionResult<()> {
    let (scroll_x, scroll_y) = web_sys::window()
        .map(|w| (w.scroll_x().unwrap_or(0.0), w.scroll_y().unwrap_or(0.0)))
        .unwrap_or((0.0, 0.0));

    let rect = trigger.get_bounding_client_rect();
    let top = rect.top() + scroll_y - f64::from(popover.offset_height()) - ARROW_GAP_PX;
    let left = rect.left() + scroll_x + rect.width() / 2.0 - f64::from(popover.offset_width()) / 2.0;

    let style = popover.style();
    style.set_property("top", &format!("{}px", top.max(0.0)))?;
    style.set_property("left", &format!("{}px", left.max(0.0)))?;
    Ok(())
}
