//! Binder configuration
//!
//! Every attribute name, selector and feedback message the binder uses lives
//! here so a page can rename them without touching the handlers. Missing keys
//! fall back to the defaults below, so a partial JSON object is enough.

use serde::Deserialize;

use crate::error::ActionError;

/// Id of the optional `<script type="application/json">` element holding page config
pub const CONFIG_ELEMENT_ID: &str = "ui-actions-config";

/// Delay before the popover hides and the label is restored
pub const DEFAULT_RESTORE_DELAY_MS: u32 = 2000;

/// Popover text for each phase of one action kind
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackMessages {
    pub in_progress: String,
    pub success: String,
    pub failure: String,
}

impl FeedbackMessages {
    fn copy_defaults() -> Self {
        Self {
            in_progress: r#"<i class="fas fa-spinner"></i> Copying..."#.to_string(),
            success: r#"<i class="fas fa-clipboard-check"></i> Copied to clipboard!"#.to_string(),
            failure: r#"<i class="fas fa-exclamation-circle"></i> Woops, copy failed!"#.to_string(),
        }
    }

    fn download_defaults() -> Self {
        Self {
            in_progress: r#"<i class="fas fa-spinner"></i> Starting..."#.to_string(),
            success: r#"<i class="fas fa-check-circle"></i> Download started!"#.to_string(),
            failure: r#"<i class="fas fa-exclamation-circle"></i> Woops, download failed!"#
                .to_string(),
        }
    }
}

/// Declarative attribute names read from each trigger
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct AttributeNames {
    /// CSS selector of the element whose text is the payload
    pub source: String,
    /// Inline payload
    pub literal: String,
    /// MIME type of a download
    pub mime_type: String,
    /// Suggested download filename
    pub filename: String,
    /// Popover text restored after each action
    pub feedback_label: String,
}

impl Default for AttributeNames {
    fn default() -> Self {
        Self {
            source: "data-src".to_string(),
            literal: "data-copy".to_string(),
            mime_type: "data-type".to_string(),
            filename: "data-filename".to_string(),
            feedback_label: "data-content".to_string(),
        }
    }
}

/// Complete binder configuration
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct BinderConfig {
    pub copy_selector: String,
    pub download_selector: String,
    pub attributes: AttributeNames,
    pub copy_messages: FeedbackMessages,
    pub download_messages: FeedbackMessages,
    /// Used when a download trigger has no MIME type attribute
    pub default_mime_type: String,
    /// Used when a download trigger has no filename attribute
    pub default_filename: String,
    pub restore_delay_ms: u32,
    /// Render popover messages as markup; plain text when false
    pub html: bool,
}

impl Default for BinderConfig {
    fn default() -> Self {
        Self {
            copy_selector: ".js-copy".to_string(),
            download_selector: ".js-download".to_string(),
            attributes: AttributeNames::default(),
            copy_messages: FeedbackMessages::copy_defaults(),
            download_messages: FeedbackMessages::download_defaults(),
            default_mime_type: "text/plain;charset=utf-8".to_string(),
            default_filename: "download.txt".to_string(),
            restore_delay_ms: DEFAULT_RESTORE_DELAY_MS,
            html: true,
        }
    }
}

impl BinderConfig {
    /// Parse a (possibly partial) JSON config
    pub fn from_json(json: &str) -> Result<Self, ActionError> {
        if json.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(json).map_err(|e| ActionError::Config(e.to_string()))
    }
}
