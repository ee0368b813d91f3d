//! Popover feedback for trigger actions
//!
//! Each trigger moves Idle -> InProgress -> Success | Failure -> Idle. The
//! return to Idle is a scheduled restore that hides the popover and puts the
//! original label back. A new click cancels the pending restore and schedules
//! its own, so only one restore fires per quiet period.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::config::BinderConfig;
use crate::host::Host;
use crate::trigger::{Trigger, TriggerId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackPhase {
    Idle,
    InProgress,
    Success,
    Failure,
}

struct Slot<T> {
    phase: FeedbackPhase,
    /// Kept after firing; dropped (and so cancelled) on the next click or reset
    restore: Option<T>,
}

impl<T> Slot<T> {
    fn idle() -> Self {
        Self {
            phase: FeedbackPhase::Idle,
            restore: None,
        }
    }
}

type Slots<T> = Rc<RefCell<HashMap<TriggerId, Slot<T>>>>;

/// Feedback state of every registered trigger
pub struct FeedbackBoard<H: Host> {
    host: Rc<H>,
    label_attribute: String,
    restore_delay_ms: u32,
    slots: Slots<H::Task>,
}

impl<H: Host + 'static> FeedbackBoard<H> {
    pub fn new(host: Rc<H>, config: &BinderConfig) -> Self {
        Self {
            host,
            label_attribute: config.attributes.feedback_label.clone(),
            restore_delay_ms: config.restore_delay_ms,
            slots: Rc::new(RefCell::new(HashMap::new())),
        }
    }

    pub fn phase(&self, id: TriggerId) -> FeedbackPhase {
        self.slots
            .borrow()
            .get(&id)
            .map(|slot| slot.phase)
            .unwrap_or(FeedbackPhase::Idle)
    }

    /// Show the in-progress message, cancelling any restore still pending
    pub fn begin(&self, trigger: &Trigger<H::Element>, message: &str) {
        let previous = {
            let mut slots = self.slots.borrow_mut();
            let slot = slots.entry(trigger.id).or_insert_with(Slot::idle);
            slot.phase = FeedbackPhase::InProgress;
            slot.restore.take()
        };
        drop(previous);
        self.show(trigger, message);
    }

    /// Show the outcome and schedule the restore
    pub fn finish(&self, trigger: &Trigger<H::Element>, phase: FeedbackPhase, message: &str) {
        self.show(trigger, message);

        let host = Rc::clone(&self.host);
        let slots = Rc::clone(&self.slots);
        let element = trigger.element.clone();
        let original = trigger.original_label.clone();
        let attribute = self.label_attribute.clone();
        let id = trigger.id;

        let task = self.host.schedule(
            self.restore_delay_ms,
            Box::new(move || {
                host.hide_popover(&element);
                restore_label(host.as_ref(), &element, &attribute, original.as_deref());
                if let Some(slot) = slots.borrow_mut().get_mut(&id) {
                    slot.phase = FeedbackPhase::Idle;
                }
                log::debug!("Feedback restored for trigger {}", id.0);
            }),
        );

        let previous = {
            let mut slots = self.slots.borrow_mut();
            let slot = slots.entry(id).or_insert_with(Slot::idle);
            slot.phase = phase;
            slot.restore.replace(task)
        };
        drop(previous);
    }

    /// Cancel any pending restore and return the trigger to its bound state now
    pub fn reset(&self, trigger: &Trigger<H::Element>) {
        let slot = self.slots.borrow_mut().remove(&trigger.id);
        let Some(slot) = slot else {
            return;
        };
        if slot.phase != FeedbackPhase::Idle {
            self.host.hide_popover(&trigger.element);
            restore_label(
                self.host.as_ref(),
                &trigger.element,
                &self.label_attribute,
                trigger.original_label.as_deref(),
            );
        }
        drop(slot);
    }

    fn show(&self, trigger: &Trigger<H::Element>, message: &str) {
        if let Err(e) = self
            .host
            .set_attribute(&trigger.element, &self.label_attribute, message)
        {
            log::warn!("Failed to update feedback label: {}", e);
        }
        self.host.show_popover(&trigger.element, message);
    }
}

fn restore_label<H: Host>(host: &H, element: &H::Element, attribute: &str, original: Option<&str>) {
    let result = match original {
        Some(label) => host.set_attribute(element, attribute, label),
        None => host.remove_attribute(element, attribute),
    };
    if let Err(e) = result {
        log::warn!("Failed to restore feedback label: {}", e);
    }
}
