//! Copy-to-clipboard and client-side download buttons with popover feedback.
//!
//! Elements marked as copy or download triggers get a click handler that
//! resolves a text payload from the page, performs the action and shows a
//! transient status in a popover above the button. See [`config::BinderConfig`]
//! for the attributes read from each trigger.

use wasm_bindgen::prelude::*;

pub mod actions;
pub mod binder;
pub mod config;
pub mod error;
pub mod feedback;
pub mod host;
pub mod trigger;
pub mod utils;
pub mod web;

#[cfg(test)]
pub(crate) mod testing;

pub use actions::ActionOutcome;
pub use binder::{register, Capabilities, Registration};
pub use config::BinderConfig;
pub use error::{ActionError, ActionResult};
pub use feedback::FeedbackPhase;
pub use host::Host;
pub use trigger::{Role, Trigger, TriggerId};

/// Handle returned to JavaScript by [`bind_ui_actions`]
#[wasm_bindgen]
pub struct UiActionBindings {
    inner: Option<web::Bindings>,
}

#[wasm_bindgen]
impl UiActionBindings {
    /// Number of triggers currently bound
    #[wasm_bindgen(getter, js_name = triggerCount)]
    pub fn trigger_count(&self) -> usize {
        self.inner.as_ref().map(|b| b.len()).unwrap_or(0)
    }

    /// Unbind every trigger and restore their labels
    pub fn dispose(&mut self) {
        if let Some(mut bindings) = self.inner.take() {
            bindings.dispose();
        }
    }
}

/// Bind copy and download triggers in the current document.
///
/// `options` is an optional partial [`BinderConfig`] with camelCase keys.
#[wasm_bindgen(js_name = bindUiActions)]
pub fn bind_ui_actions(options: JsValue) -> Result<UiActionBindings, JsValue> {
    let config = if options.is_undefined() || options.is_null() {
        BinderConfig::default()
    } else {
        serde_wasm_bindgen::from_value(options).map_err(|e| ActionError::Config(e.to_string()))?
    };

    let bindings = web::bind_document(config)?;
    Ok(UiActionBindings {
        inner: Some(bindings),
    })
}
