//! Trigger registration
//!
//! Capabilities are checked once up front. Triggers whose action the page
//! cannot perform are simply not registered; the DOM is left alone.

use std::cell::RefCell;
use std::rc::Rc;

use crate::actions::{self, ActionContext, ActionOutcome};
use crate::config::BinderConfig;
use crate::host::Host;
use crate::trigger::{Role, Trigger, TriggerId};

/// Platform features the two actions depend on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub copy_command: bool,
    pub uri_encoding: bool,
}

impl Capabilities {
    pub fn detect<H: Host>(host: &H) -> Self {
        Self {
            copy_command: host.supports_copy_command(),
            uri_encoding: host.supports_uri_encoding(),
        }
    }

    pub fn supports(&self, role: Role) -> bool {
        match role {
            Role::Copy => self.copy_command,
            Role::Download => self.uri_encoding,
        }
    }
}

/// Registered triggers plus the state their handlers share.
///
/// Disposing (or dropping) cancels pending restores and returns every
/// trigger to the state it was in before registration.
pub struct Registration<H: Host + 'static> {
    context: Rc<ActionContext<H>>,
    triggers: RefCell<Vec<Rc<Trigger<H::Element>>>>,
}

/// Register every supported candidate trigger
pub fn register<H, I>(host: Rc<H>, config: Rc<BinderConfig>, candidates: I) -> Registration<H>
where
    H: Host + 'static,
    I: IntoIterator<Item = (Role, H::Element)>,
{
    let capabilities = Capabilities::detect(host.as_ref());
    let mut triggers = Vec::new();
    let mut skipped_copy = 0usize;
    let mut skipped_download = 0usize;

    for (role, element) in candidates {
        if !capabilities.supports(role) {
            match role {
                Role::Copy => skipped_copy += 1,
                Role::Download => skipped_download += 1,
            }
            continue;
        }

        let trigger = Trigger::new(host.as_ref(), TriggerId(triggers.len()), role, element, &config);
        if trigger.original_title.is_some() {
            if let Err(e) = host.remove_attribute(&trigger.element, "title") {
                log::warn!("Failed to suppress title on trigger {}: {}", trigger.id.0, e);
            }
        }
        host.configure_popover(&trigger.element);
        triggers.push(Rc::new(trigger));
    }

    if skipped_copy > 0 {
        log::warn!("Copy command not supported, skipped {} copy trigger(s)", skipped_copy);
    }
    if skipped_download > 0 {
        log::warn!("URI encoding not supported, skipped {} download trigger(s)", skipped_download);
    }
    log::debug!("Registered {} trigger(s)", triggers.len());

    Registration {
        context: Rc::new(ActionContext::new(host, config)),
        triggers: RefCell::new(triggers),
    }
}

impl<H: Host + 'static> Registration<H> {
    pub fn context(&self) -> &Rc<ActionContext<H>> {
        &self.context
    }

    pub fn triggers(&self) -> Vec<Rc<Trigger<H::Element>>> {
        self.triggers.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.triggers.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.triggers.borrow().is_empty()
    }

    /// Run a trigger's action as if it had been clicked
    pub fn activate(&self, id: TriggerId) -> Option<ActionOutcome> {
        let trigger = self.triggers.borrow().iter().find(|t| t.id == id).cloned()?;
        Some(actions::run(&self.context, &trigger))
    }

    /// Unregister every trigger. Safe to call more than once.
    pub fn dispose(&self) {
        let triggers = std::mem::take(&mut *self.triggers.borrow_mut());
        if triggers.is_empty() {
            return;
        }

        let host = self.context.host.as_ref();
        for trigger in &triggers {
            self.context.feedback.reset(trigger);
            host.release_popover(&trigger.element);
            if let Some(title) = &trigger.original_title {
                if let Err(e) = host.set_attribute(&trigger.element, "title", title) {
                    log::warn!("Failed to restore title on trigger {}: {}", trigger.id.0, e);
                }
            }
        }
        log::debug!("Disposed {} trigger(s)", triggers.len());
    }
}

impl<H: Host + 'static> Drop for Registration<H> {
    fn drop(&mut self) {
        self.dispose();
    }
}
