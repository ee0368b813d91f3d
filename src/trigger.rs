//! Trigger elements and their declared payloads

use crate::config::BinderConfig;
use crate::error::{ActionError, ActionResult};
use crate::host::Host;

/// Stable identity of a registered trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TriggerId(pub usize);

/// What a trigger does when clicked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Copy,
    Download,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Copy => "copy",
            Role::Download => "download",
        }
    }
}

/// Where a trigger's payload comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadSource {
    /// Selector of another element whose text is the payload
    Reference(String),
    /// Inline payload
    Literal(String),
    Missing,
}

impl PayloadSource {
    /// Read the declared source; a reference takes precedence over a literal
    pub fn read<H: Host>(host: &H, element: &H::Element, config: &BinderConfig) -> Self {
        if let Some(selector) = host.attribute(element, &config.attributes.source) {
            PayloadSource::Reference(selector)
        } else if let Some(literal) = host.attribute(element, &config.attributes.literal) {
            PayloadSource::Literal(literal)
        } else {
            PayloadSource::Missing
        }
    }

    /// Turn the declared source into payload text
    pub fn resolve<H: Host>(&self, host: &H) -> ActionResult<String> {
        match self {
            // a blank selector matches nothing, so its text is empty
            PayloadSource::Reference(selector) if selector.trim().is_empty() => Ok(String::new()),
            PayloadSource::Reference(selector) => host.source_text(selector),
            PayloadSource::Literal(text) => Ok(text.clone()),
            PayloadSource::Missing => Err(ActionError::MissingPayload),
        }
    }
}

/// MIME type and filename of a download
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTarget {
    pub mime_type: String,
    pub filename: String,
}

impl DownloadTarget {
    pub fn read<H: Host>(host: &H, element: &H::Element, config: &BinderConfig) -> Self {
        let non_empty = |name: &str| host.attribute(element, name).filter(|v| !v.trim().is_empty());
        Self {
            mime_type: non_empty(&config.attributes.mime_type)
                .unwrap_or_else(|| config.default_mime_type.clone()),
            filename: non_empty(&config.attributes.filename)
                .unwrap_or_else(|| config.default_filename.clone()),
        }
    }
}

/// A bound copy or download button.
///
/// Payload and download target are read on every click, so pages can update
/// them after binding. The feedback label is captured once at registration:
/// mid-action the attribute holds a status message, not the original text.
#[derive(Debug, Clone)]
pub struct Trigger<E> {
    pub id: TriggerId,
    pub role: Role,
    pub element: E,
    pub original_label: Option<String>,
    /// Native tooltip suppressed while the popover is bound
    pub original_title: Option<String>,
}

impl<E: Clone> Trigger<E> {
    pub fn new<H: Host<Element = E>>(
        host: &H,
        id: TriggerId,
        role: Role,
        element: E,
        config: &BinderConfig,
    ) -> Self {
        let original_label = host.attribute(&element, &config.attributes.feedback_label);
        let original_title = host.attribute(&element, "title");
        Self {
            id,
            role,
            element,
            original_label,
            original_title,
        }
    }
}
