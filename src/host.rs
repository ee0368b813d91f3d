//! Host environment seam
//!
//! The copy and download handlers only talk to the page through [`Host`].
//! The browser implementation lives in `crate::web`; tests drive the same
//! handlers through an in-memory host.

use crate::error::ActionResult;

/// Everything a trigger action needs from the page.
///
/// `Element` is a cheap handle (a JS reference in the browser). `Task` is a
/// scheduled callback that is cancelled when dropped.
pub trait Host {
    type Element: Clone + 'static;
    type Task: 'static;

    /// Whether the selection copy command is available
    fn supports_copy_command(&self) -> bool;

    /// Whether URI encoding is available for building download links
    fn supports_uri_encoding(&self) -> bool;

    fn attribute(&self, element: &Self::Element, name: &str) -> Option<String>;

    fn set_attribute(&self, element: &Self::Element, name: &str, value: &str) -> ActionResult<()>;

    fn remove_attribute(&self, element: &Self::Element, name: &str) -> ActionResult<()>;

    /// Combined text content of every element matching `selector`, in document
    /// order; empty when nothing matches. Invalid selectors are an error.
    fn source_text(&self, selector: &str) -> ActionResult<String>;

    /// Create a detached, selectable text container holding `text`
    fn create_text_container(&self, text: &str) -> ActionResult<Self::Element>;

    /// Create a detached anchor that downloads `href` as `filename`
    fn create_download_link(&self, href: &str, filename: &str) -> ActionResult<Self::Element>;

    /// Insert a temporary node into the document body
    fn attach(&self, node: &Self::Element) -> ActionResult<()>;

    /// Remove a temporary node from the document
    fn detach(&self, node: &Self::Element);

    /// Select the full contents of a text container
    fn select_contents(&self, node: &Self::Element) -> ActionResult<()>;

    /// Run the platform copy command on the current selection
    fn exec_copy(&self) -> ActionResult<bool>;

    fn click(&self, node: &Self::Element) -> ActionResult<()>;

    /// Attach the popover widget to a trigger
    fn configure_popover(&self, trigger: &Self::Element);

    /// Tear the popover widget off a trigger
    fn release_popover(&self, trigger: &Self::Element);

    fn show_popover(&self, trigger: &Self::Element, content: &str);

    fn hide_popover(&self, trigger: &Self::Element);

    /// Run `callback` after `delay_ms`, unless the returned task is dropped first
    fn schedule(&self, delay_ms: u32, callback: Box<dyn FnOnce()>) -> Self::Task;
}
