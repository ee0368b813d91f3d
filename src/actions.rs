//! Copy and download handlers
//!
//! Both handlers resolve the trigger's payload, show in-progress feedback,
//! perform the platform action through a temporary node and report the
//! outcome. Errors never leave the handler: they are logged and shown as the
//! generic failure message.

use std::rc::Rc;

use crate::config::{BinderConfig, FeedbackMessages};
use crate::error::{ActionError, ActionResult};
use crate::feedback::{FeedbackBoard, FeedbackPhase};
use crate::host::Host;
use crate::trigger::{DownloadTarget, PayloadSource, Role, Trigger};
use crate::utils::data_uri::build_data_uri;

/// What a single click did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    /// No payload declared, nothing touched
    Skipped,
    Succeeded,
    Failed,
}

/// Shared state every handler runs against
pub struct ActionContext<H: Host> {
    pub host: Rc<H>,
    pub config: Rc<BinderConfig>,
    pub feedback: FeedbackBoard<H>,
}

impl<H: Host + 'static> ActionContext<H> {
    pub fn new(host: Rc<H>, config: Rc<BinderConfig>) -> Self {
        let feedback = FeedbackBoard::new(Rc::clone(&host), &config);
        Self {
            host,
            config,
            feedback,
        }
    }
}

/// A temporary node in the document body, removed when dropped.
///
/// Only exists once attaching succeeded, so cleanup never touches a node
/// that was not created or not inserted.
struct TempNode<'h, H: Host> {
    host: &'h H,
    node: H::Element,
}

impl<'h, H: Host> TempNode<'h, H> {
    fn attach(host: &'h H, node: H::Element) -> ActionResult<Self> {
        host.attach(&node)?;
        Ok(Self { host, node })
    }

    fn node(&self) -> &H::Element {
        &self.node
    }
}

impl<H: Host> Drop for TempNode<'_, H> {
    fn drop(&mut self) {
        self.host.detach(&self.node);
    }
}

/// Run the action matching the trigger's role
pub fn run<H: Host + 'static>(ctx: &ActionContext<H>, trigger: &Trigger<H::Element>) -> ActionOutcome {
    match trigger.role {
        Role::Copy => copy(ctx, trigger),
        Role::Download => download(ctx, trigger),
    }
}

/// Copy the trigger's payload to the clipboard
pub fn copy<H: Host + 'static>(ctx: &ActionContext<H>, trigger: &Trigger<H::Element>) -> ActionOutcome {
    let host = ctx.host.as_ref();
    let source = PayloadSource::read(host, &trigger.element, &ctx.config);
    if source == PayloadSource::Missing {
        log::info!("Nothing to copy");
        return ActionOutcome::Skipped;
    }

    let messages = &ctx.config.copy_messages;
    ctx.feedback.begin(trigger, &messages.in_progress);

    let result = source
        .resolve(host)
        .and_then(|payload| copy_text(host, &payload));
    settle(ctx, trigger, messages, result, Role::Copy)
}

/// Start a client-side download of the trigger's payload
pub fn download<H: Host + 'static>(ctx: &ActionContext<H>, trigger: &Trigger<H::Element>) -> ActionOutcome {
    let host = ctx.host.as_ref();
    let source = PayloadSource::read(host, &trigger.element, &ctx.config);
    if source == PayloadSource::Missing {
        log::info!("Nothing to download");
        return ActionOutcome::Skipped;
    }

    let target = DownloadTarget::read(host, &trigger.element, &ctx.config);
    let messages = &ctx.config.download_messages;
    ctx.feedback.begin(trigger, &messages.in_progress);

    let result = source
        .resolve(host)
        .and_then(|payload| download_text(host, &target, &payload));
    settle(ctx, trigger, messages, result, Role::Download)
}

fn copy_text<H: Host>(host: &H, text: &str) -> ActionResult<()> {
    let container = TempNode::attach(host, host.create_text_container(text)?)?;
    host.select_contents(container.node())?;
    if host.exec_copy()? {
        Ok(())
    } else {
        Err(ActionError::CommandRejected)
    }
}

fn download_text<H: Host>(host: &H, target: &DownloadTarget, payload: &str) -> ActionResult<()> {
    let href = build_data_uri(&target.mime_type, payload);
    let link = TempNode::attach(host, host.create_download_link(&href, &target.filename)?)?;
    log::debug!("Starting download of {} ({})", target.filename, target.mime_type);
    host.click(link.node())
}

fn settle<H: Host + 'static>(
    ctx: &ActionContext<H>,
    trigger: &Trigger<H::Element>,
    messages: &FeedbackMessages,
    result: ActionResult<()>,
    role: Role,
) -> ActionOutcome {
    match result {
        Ok(()) => {
            ctx.feedback
                .finish(trigger, FeedbackPhase::Success, &messages.success);
            ActionOutcome::Succeeded
        }
        Err(e) => {
            log::error!("Unable to {}: {}", role.as_str(), e);
            ctx.feedback
                .finish(trigger, FeedbackPhase::Failure, &messages.failure);
            ActionOutcome::Failed
        }
    }
}
