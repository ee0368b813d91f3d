//! Error types for copy and download actions

use wasm_bindgen::JsValue;

/// Error type for trigger actions and registration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionError {
    /// Trigger declares neither a source reference nor a literal payload
    MissingPayload,
    /// Copy command ran but reported failure
    CommandRejected,
    /// Browser API threw
    Platform(String),
    /// No document available (not running in a page)
    NoDocument,
    /// Document has no body to attach temporary nodes to
    NoBody,
    /// Configuration could not be parsed
    Config(String),
}

impl std::fmt::Display for ActionError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            ActionError::MissingPayload => write!(f, "No payload declared"),
            ActionError::CommandRejected => write!(f, "Copy command reported failure"),
            ActionError::Platform(e) => write!(f, "Platform error: {}", e),
            ActionError::NoDocument => write!(f, "No document available"),
            ActionError::NoBody => write!(f, "Document has no body"),
            ActionError::Config(e) => write!(f, "Invalid configuration: {}", e),
        }
    }
}

impl std::error::Error for ActionError {}

impl From<JsValue> for ActionError {
    fn from(value: JsValue) -> Self {
        ActionError::Platform(format!("{:?}", value))
    }
}

impl From<ActionError> for JsValue {
    fn from(err: ActionError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

/// Result type alias for trigger actions
pub type ActionResult<T> = Result<T, ActionError>;
