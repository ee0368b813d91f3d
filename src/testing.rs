//! In-memory [`Host`] for exercising the handlers without a browser.
//!
//! Records every page interaction in order and runs scheduled callbacks only
//! when the test advances the clock.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::{ActionError, ActionResult};
use crate::host::Host;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FakeNode(pub usize);

/// How the fake copy command behaves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyBehavior {
    Succeed,
    Reject,
    Throw,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    SetAttribute(FakeNode, String, String),
    RemoveAttribute(FakeNode, String),
    CreateTextContainer(FakeNode, String),
    CreateDownloadLink(FakeNode, String, String),
    Attach(FakeNode),
    Detach(FakeNode),
    Select(FakeNode),
    ExecCopy(Option<String>),
    Click(FakeNode),
    ConfigurePopover(FakeNode),
    ReleasePopover(FakeNode),
    ShowPopover(FakeNode, String),
    HidePopover(FakeNode),
}

struct Timer {
    due: u64,
    cancelled: Rc<Cell<bool>>,
    callback: Option<Box<dyn FnOnce()>>,
}

/// Handle returned by [`FakeHost::schedule`]; dropping it cancels the timer
pub struct FakeTask {
    cancelled: Rc<Cell<bool>>,
}

impl Drop for FakeTask {
    fn drop(&mut self) {
        self.cancelled.set(true);
    }
}

struct State {
    next_node: usize,
    attributes: HashMap<(FakeNode, String), String>,
    sources: HashMap<String, Vec<String>>,
    invalid_selectors: Vec<String>,
    values: HashMap<FakeNode, String>,
    attached: Vec<FakeNode>,
    selection: Option<String>,
    clipboard: Option<String>,
    visible_popovers: HashMap<FakeNode, String>,
    calls: Vec<Call>,
    timers: Vec<Timer>,
    now: u64,
    copy_supported: bool,
    encoding_supported: bool,
    copy_behavior: CopyBehavior,
    fail_attach: bool,
    fail_click: bool,
}

pub struct FakeHost {
    state: RefCell<State>,
}

impl FakeHost {
    pub fn new() -> Self {
        Self {
            state: RefCell::new(State {
                next_node: 0,
                attributes: HashMap::new(),
                sources: HashMap::new(),
                invalid_selectors: Vec::new(),
                values: HashMap::new(),
                attached: Vec::new(),
                selection: None,
                clipboard: None,
                visible_popovers: HashMap::new(),
                calls: Vec::new(),
                timers: Vec::new(),
                now: 0,
                copy_supported: true,
                encoding_supported: true,
                copy_behavior: CopyBehavior::Succeed,
                fail_attach: false,
                fail_click: false,
            }),
        }
    }

    fn new_node(&self) -> FakeNode {
        let mut state = self.state.borrow_mut();
        let node = FakeNode(state.next_node);
        state.next_node += 1;
        node
    }

    /// Create a page element (not recorded as a call)
    pub fn element(&self, _tag: &str) -> FakeNode {
        self.new_node()
    }

    /// Set an attribute as page markup would (not recorded as a call)
    pub fn put_attribute(&self, node: &FakeNode, name: &str, value: &str) {
        self.state
            .borrow_mut()
            .attributes
            .insert((*node, name.to_string()), value.to_string());
    }

    /// Register a single element matched by `selector` with the given text
    pub fn add_source(&self, selector: &str, text: &str) {
        self.add_sources(selector, &[text]);
    }

    /// Register several elements matched by `selector`, in document order
    pub fn add_sources(&self, selector: &str, texts: &[&str]) {
        self.state.borrow_mut().sources.insert(
            selector.to_string(),
            texts.iter().map(|t| t.to_string()).collect(),
        );
    }

    /// Make `selector` throw like a malformed CSS selector
    pub fn add_invalid_selector(&self, selector: &str) {
        self.state
            .borrow_mut()
            .invalid_selectors
            .push(selector.to_string());
    }

    pub fn set_copy_supported(&self, supported: bool) {
        self.state.borrow_mut().copy_supported = supported;
    }

    pub fn set_encoding_supported(&self, supported: bool) {
        self.state.borrow_mut().encoding_supported = supported;
    }

    pub fn set_copy_behavior(&self, behavior: CopyBehavior) {
        self.state.borrow_mut().copy_behavior = behavior;
    }

    pub fn fail_attach(&self) {
        self.state.borrow_mut().fail_attach = true;
    }

    pub fn fail_click(&self) {
        self.state.borrow_mut().fail_click = true;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.borrow().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.borrow_mut().calls.clear();
    }

    pub fn clipboard(&self) -> Option<String> {
        self.state.borrow().clipboard.clone()
    }

    pub fn attached(&self) -> Vec<FakeNode> {
        self.state.borrow().attached.clone()
    }

    pub fn popover(&self, node: &FakeNode) -> Option<String> {
        self.state.borrow().visible_popovers.get(node).cloned()
    }

    pub fn read(&self, node: &FakeNode, name: &str) -> Option<String> {
        self.attribute(node, name)
    }

    /// Timers that are neither fired nor cancelled
    pub fn pending_timers(&self) -> usize {
        self.state
            .borrow()
            .timers
            .iter()
            .filter(|t| t.callback.is_some() && !t.cancelled.get())
            .count()
    }

    /// Move the clock forward, running every live timer that comes due
    pub fn advance(&self, ms: u64) {
        let due: Vec<Box<dyn FnOnce()>> = {
            let mut state = self.state.borrow_mut();
            state.now += ms;
            let now = state.now;
            state
                .timers
                .iter_mut()
                .filter(|t| t.due <= now && !t.cancelled.get())
                .filter_map(|t| t.callback.take())
                .collect()
        };
        for callback in due {
            callback();
        }
    }

    fn record(&self, call: Call) {
        self.state.borrow_mut().calls.push(call);
    }
}

impl Default for FakeHost {
    fn default() -> Self {
        Self::new()
    }
}

impl Host for FakeHost {
    type Element = FakeNode;
    type Task = FakeTask;

    fn supports_copy_command(&self) -> bool {
        self.state.borrow().copy_supported
    }

    fn supports_uri_encoding(&self) -> bool {
        self.state.borrow().encoding_supported
    }

    fn attribute(&self, element: &FakeNode, name: &str) -> Option<String> {
        self.state
            .borrow()
            .attributes
            .get(&(*element, name.to_string()))
            .cloned()
    }

    fn set_attribute(&self, element: &FakeNode, name: &str, value: &str) -> ActionResult<()> {
        self.put_attribute(element, name, value);
        self.record(Call::SetAttribute(*element, name.to_string(), value.to_string()));
        Ok(())
    }

    fn remove_attribute(&self, element: &FakeNode, name: &str) -> ActionResult<()> {
        self.state
            .borrow_mut()
            .attributes
            .remove(&(*element, name.to_string()));
        self.record(Call::RemoveAttribute(*element, name.to_string()));
        Ok(())
    }

    fn source_text(&self, selector: &str) -> ActionResult<String> {
        let state = self.state.borrow();
        if state.invalid_selectors.iter().any(|s| s == selector) {
            return Err(ActionError::Platform(format!("SyntaxError: '{}'", selector)));
        }
        Ok(state
            .sources
            .get(selector)
            .map(|texts| texts.concat())
            .unwrap_or_default())
    }

    fn create_text_container(&self, text: &str) -> ActionResult<FakeNode> {
        let node = self.new_node();
        self.state.borrow_mut().values.insert(node, text.to_string());
        self.record(Call::CreateTextContainer(node, text.to_string()));
        Ok(node)
    }

    fn create_download_link(&self, href: &str, filename: &str) -> ActionResult<FakeNode> {
        let node = self.new_node();
        self.record(Call::CreateDownloadLink(node, href.to_string(), filename.to_string()));
        Ok(node)
    }

    fn attach(&self, node: &FakeNode) -> ActionResult<()> {
        if self.state.borrow().fail_attach {
            return Err(ActionError::NoBody);
        }
        self.state.borrow_mut().attached.push(*node);
        self.record(Call::Attach(*node));
        Ok(())
    }

    fn detach(&self, node: &FakeNode) {
        self.state.borrow_mut().attached.retain(|n| n != node);
        self.record(Call::Detach(*node));
    }

    fn select_contents(&self, node: &FakeNode) -> ActionResult<()> {
        let mut state = self.state.borrow_mut();
        state.selection = state.values.get(node).cloned();
        state.calls.push(Call::Select(*node));
        Ok(())
    }

    fn exec_copy(&self) -> ActionResult<bool> {
        let mut state = self.state.borrow_mut();
        let selection = state.selection.clone();
        state.calls.push(Call::ExecCopy(selection.clone()));
        match state.copy_behavior {
            CopyBehavior::Succeed => {
                state.clipboard = selection;
                Ok(true)
            }
            CopyBehavior::Reject => Ok(false),
            CopyBehavior::Throw => Err(ActionError::Platform("NotAllowedError".to_string())),
        }
    }

    fn click(&self, node: &FakeNode) -> ActionResult<()> {
        self.record(Call::Click(*node));
        if self.state.borrow().fail_click {
            return Err(ActionError::Platform("SecurityError".to_string()));
        }
        Ok(())
    }

    fn configure_popover(&self, trigger: &FakeNode) {
        self.record(Call::ConfigurePopover(*trigger));
    }

    fn release_popover(&self, trigger: &FakeNode) {
        self.record(Call::ReleasePopover(*trigger));
    }

    fn show_popover(&self, trigger: &FakeNode, content: &str) {
        self.state
            .borrow_mut()
            .visible_popovers
            .insert(*trigger, content.to_string());
        self.record(Call::ShowPopover(*trigger, content.to_string()));
    }

    fn hide_popover(&self, trigger: &FakeNode) {
        self.state.borrow_mut().visible_popovers.remove(trigger);
        self.record(Call::HidePopover(*trigger));
    }

    fn schedule(&self, delay_ms: u32, callback: Box<dyn FnOnce()>) -> FakeTask {
        let cancelled = Rc::new(Cell::new(false));
        let mut state = self.state.borrow_mut();
        let due = state.now + u64::from(delay_ms);
        state.timers.push(Timer {
            due,
            cancelled: Rc::clone(&cancelled),
            callback: Some(callback),
        });
        FakeTask { cancelled }
    }
}

thread_local! {
    static CAPTURED: RefCell<Vec<(log::Level, String)>> = RefCell::new(Vec::new());
}

/// Global logger that keeps records on the thread that emitted them, so
/// parallel tests only see their own output
struct CaptureLogger;

impl log::Log for CaptureLogger {
    fn enabled(&self, _metadata: &log::Metadata) -> bool {
        true
    }

    fn log(&self, record: &log::Record) {
        CAPTURED.with(|logs| {
            logs.borrow_mut()
                .push((record.level(), record.args().to_string()))
        });
    }

    fn flush(&self) {}
}

static LOGGER: CaptureLogger = CaptureLogger;

/// Start recording log output on the current thread, dropping earlier records
pub fn capture_logs() {
    // another test may have installed it already
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(log::LevelFilter::Trace);
    CAPTURED.with(|logs| logs.borrow_mut().clear());
}

pub fn captured_logs() -> Vec<(log::Level, String)> {
    CAPTURED.with(|logs| logs.borrow().clone())
}
