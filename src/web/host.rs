//! Browser implementation of [`Host`] on top of `web-sys`

use gloo_timers::callback::Timeout;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlAnchorElement, HtmlDocument, HtmlElement, HtmlTextAreaElement};

use crate::config::BinderConfig;
use crate::error::{ActionError, ActionResult};
use crate::host::Host;
use crate::web::popover::PopoverLayer;

pub struct WebHost {
    document: Document,
    popovers: PopoverLayer,
}

impl WebHost {
    pub fn new(document: Document, config: &BinderConfig) -> Self {
        let popovers = PopoverLayer::new(document.clone(), &config.attributes.feedback_label, config.html);
        Self { document, popovers }
    }

    fn create<T: JsCast>(&self, tag: &str) -> ActionResult<T> {
        self.document
            .create_element(tag)?
            .dyn_into::<T>()
            .map_err(|_| ActionError::Platform(format!("<{}> has unexpected type", tag)))
    }
}

/// Keep a temporary node out of sight and out of the accessibility tree
fn hide_offscreen(element: &HtmlElement) -> ActionResult<()> {
    let style = element.style();
    style.set_property("position", "absolute")?;
    style.set_property("left", "-9999px")?;
    style.set_property("top", "0")?;
    element.set_attribute("aria-hidden", "true")?;
    Ok(())
}

impl Host for WebHost {
    type Element = HtmlElement;
    type Task = Timeout;

    fn supports_copy_command(&self) -> bool {
        self.document
            .dyn_ref::<HtmlDocument>()
            .map(|doc| doc.query_command_supported("copy"))
            .unwrap_or(false)
    }

    fn supports_uri_encoding(&self) -> bool {
        js_sys::Reflect::get(&js_sys::global(), &JsValue::from_str("encodeURIComponent"))
            .map(|f| f.is_function())
            .unwrap_or(false)
    }

    fn attribute(&self, element: &HtmlElement, name: &str) -> Option<String> {
        element.get_attribute(name)
    }

    fn set_attribute(&self, element: &HtmlElement, name: &str, value: &str) -> ActionResult<()> {
        element.set_attribute(name, value)?;
        Ok(())
    }

    fn remove_attribute(&self, element: &HtmlElement, name: &str) -> ActionResult<()> {
        element.remove_attribute(name)?;
        Ok(())
    }

    fn source_text(&self, selector: &str) -> ActionResult<String> {
        let nodes = self.document.query_selector_all(selector)?;
        Ok((0..nodes.length())
            .filter_map(|i| nodes.item(i))
            .filter_map(|node| node.text_content())
            .collect())
    }

    fn create_text_container(&self, text: &str) -> ActionResult<HtmlElement> {
        let area: HtmlTextAreaElement = self.create("textarea")?;
        area.set_value(text);
        // read-only keeps mobile keyboards from popping up on select()
        area.set_read_only(true);
        let element: HtmlElement = area.into();
        hide_offscreen(&element)?;
        Ok(element)
    }

    fn create_download_link(&self, href: &str, filename: &str) -> ActionResult<HtmlElement> {
        let anchor: HtmlAnchorElement = self.create("a")?;
        anchor.set_href(href);
        anchor.set_download(filename);
        let element: HtmlElement = anchor.into();
        hide_offscreen(&element)?;
        Ok(element)
    }

    fn attach(&self, node: &HtmlElement) -> ActionResult<()> {
        let body = self.document.body().ok_or(ActionError::NoBody)?;
        body.append_child(node)?;
        Ok(())
    }

    fn detach(&self, node: &HtmlElement) {
        node.remove();
    }

    fn select_contents(&self, node: &HtmlElement) -> ActionResult<()> {
        let area = node
            .dyn_ref::<HtmlTextAreaElement>()
            .ok_or_else(|| ActionError::Platform("Copy source is not a textarea".to_string()))?;
        area.select();
        Ok(())
    }

    fn exec_copy(&self) -> ActionResult<bool> {
        let document = self
            .document
            .dyn_ref::<HtmlDocument>()
            .ok_or_else(|| ActionError::Platform("Not an HTML document".to_string()))?;
        Ok(document.exec_command("copy")?)
    }

    fn click(&self, node: &HtmlElement) -> ActionResult<()> {
        node.click();
        Ok(())
    }

    fn configure_popover(&self, trigger: &HtmlElement) {
        self.popovers.configure(trigger);
    }

    fn release_popover(&self, trigger: &HtmlElement) {
        self.popovers.release(trigger);
    }

    fn show_popover(&self, trigger: &HtmlElement, content: &str) {
        self.popovers.show(trigger, content);
    }

    fn hide_popover(&self, trigger: &HtmlElement) {
        self.popovers.hide(trigger);
    }

    fn schedule(&self, delay_ms: u32, callback: Box<dyn FnOnce()>) -> Timeout {
        Timeout::new(delay_ms, callback)
    }
}
