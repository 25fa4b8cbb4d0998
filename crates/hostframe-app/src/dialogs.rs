//! Native dialogs for `create-dialog` requests.
//!
//! Requests are queued when presented and shown from the event loop, so a
//! modal dialog never runs inside message dispatch.

use std::cell::RefCell;
use std::collections::VecDeque;

use hostframe_bridge::{DialogChoice, DialogCompletion, DialogRequest, DialogService};
use tracing::{debug, warn};

/// Buttons offered for a dialog kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Buttons {
    Ok,
    OkCancel,
    YesNo,
    YesNoCancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Level {
    Info,
    Warning,
    Error,
}

/// How a request is rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
struct MessageBox {
    title: String,
    message: String,
    buttons: Buttons,
    level: Level,
}

impl MessageBox {
    fn from_request(request: &DialogRequest) -> Self {
        let (buttons, level) = match request.kind.as_str() {
            "alert" => (Buttons::Ok, Level::Info),
            "warning" => (Buttons::Ok, Level::Warning),
            "error" => (Buttons::Ok, Level::Error),
            "confirm" => (Buttons::OkCancel, Level::Info),
            "question" => (Buttons::YesNo, Level::Info),
            "question-cancel" => (Buttons::YesNoCancel, Level::Info),
            other => {
                warn!(kind = other, "unsupported dialog kind, showing as alert");
                (Buttons::Ok, Level::Info)
            }
        };
        Self {
            title: request.title().unwrap_or("Hostframe").to_string(),
            message: request.message().unwrap_or_default().to_string(),
            buttons,
            level,
        }
    }

    fn show(&self) -> rfd::MessageDialogResult {
        let buttons = match self.buttons {
            Buttons::Ok => rfd::MessageButtons::Ok,
            Buttons::OkCancel => rfd::MessageButtons::OkCancel,
            Buttons::YesNo => rfd::MessageButtons::YesNo,
            Buttons::YesNoCancel => rfd::MessageButtons::YesNoCancel,
        };
        let level = match self.level {
            Level::Info => rfd::MessageLevel::Info,
            Level::Warning => rfd::MessageLevel::Warning,
            Level::Error => rfd::MessageLevel::Error,
        };
        rfd::MessageDialog::new()
            .set_level(level)
            .set_title(self.title.as_str())
            .set_description(self.message.as_str())
            .set_buttons(buttons)
            .show()
    }
}

/// The frame-facing answer for a dialog result.
fn choice_from(result: rfd::MessageDialogResult) -> DialogChoice {
    match result {
        rfd::MessageDialogResult::Ok => DialogChoice::button("ok"),
        rfd::MessageDialogResult::Cancel => DialogChoice::button("cancel"),
        rfd::MessageDialogResult::Yes => DialogChoice::button("yes"),
        rfd::MessageDialogResult::No => DialogChoice::button("no"),
        rfd::MessageDialogResult::Custom(label) => DialogChoice::button(label),
    }
}

/// `rfd` message dialogs, shown one at a time from the event loop.
#[derive(Default)]
pub struct NativeDialogs {
    pending: RefCell<VecDeque<(DialogRequest, DialogCompletion)>>,
}

impl NativeDialogs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.borrow().is_empty()
    }

    /// Show every queued dialog, completing each with the user's choice.
    pub fn show_pending(&self) {
        loop {
            // Completion may enqueue another dialog; release the queue first.
            let next = self.pending.borrow_mut().pop_front();
            let Some((request, completion)) = next else {
                break;
            };
            if completion.state().is_terminal() {
                debug!(token = %completion.token(), "dialog skipped: request already settled");
                continue;
            }
            let choice = choice_from(MessageBox::from_request(&request).show());
            if !completion.complete(choice) {
                debug!(token = %completion.token(), "dialog answer discarded");
            }
        }
    }
}

impl DialogService for NativeDialogs {
    fn present(&self, request: DialogRequest, completion: DialogCompletion) {
        debug!(kind = %request.kind, token = %completion.token(), "dialog queued");
        self.pending.borrow_mut().push_back((request, completion));
    }
}
