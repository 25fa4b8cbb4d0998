//! Request/response correlation for host-mediated dialogs.
//!
//! A frame asks the host to show a dialog; the host hands the request to a
//! [`DialogService`] and, when the service completes, sends exactly one
//! `dialog-response` envelope back. Each request carries a
//! [`CorrelationToken`] echoed in its response, so any number of requests
//! may be outstanding at once.

mod request;

#[cfg(test)]
mod tests;

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use hostframe_common::{BridgeError, CorrelationToken};
use tracing::{debug, info};

use crate::channel::Sender;
use crate::envelope::Envelope;

pub use request::{DialogChoice, DialogRequest, DIALOG_RESPONSE};

/// Lifecycle of a pending request.
///
/// `Created -> AwaitingResponse -> Responded | Discarded`. Both end states are
/// terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestState {
    Created,
    AwaitingResponse,
    Responded,
    Discarded,
}

impl RequestState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Responded | Self::Discarded)
    }
}

/// External collaborator that renders a dialog and reports the choice.
pub trait DialogService {
    /// Show `request`; call `completion.complete(..)` exactly once when the
    /// user has answered. May complete synchronously.
    fn present(&self, request: DialogRequest, completion: DialogCompletion);
}

struct PendingRequest {
    reply: Sender,
    state: Rc<Cell<RequestState>>,
}

#[derive(Default)]
struct PendingTable {
    requests: HashMap<CorrelationToken, PendingRequest>,
    closed: bool,
}

/// Tracks outstanding dialog requests for one process.
pub struct RequestCorrelator {
    pending: Rc<RefCell<PendingTable>>,
    dialogs: Rc<dyn DialogService>,
}

impl RequestCorrelator {
    pub fn new(dialogs: Rc<dyn DialogService>) -> Self {
        Self {
            pending: Rc::new(RefCell::new(PendingTable::default())),
            dialogs,
        }
    }

    /// Open a pending request and hand it to the dialog service.
    ///
    /// The request's own token is used when present, otherwise a fresh one is
    /// generated. Fails with `ProcessDestroyed` after [`discard_all`] and
    /// with `MalformedEnvelope` if the token is already outstanding.
    ///
    /// [`discard_all`]: RequestCorrelator::discard_all
    pub fn begin(
        &self,
        reply: Sender,
        mut request: DialogRequest,
    ) -> Result<CorrelationToken, BridgeError> {
        let token = request.token.take().unwrap_or_default();
        let state = Rc::new(Cell::new(RequestState::Created));

        {
            let mut table = self.pending.borrow_mut();
            if table.closed {
                return Err(BridgeError::ProcessDestroyed);
            }
            if table.requests.contains_key(&token) {
                return Err(BridgeError::MalformedEnvelope(format!(
                    "correlation token {token} is already outstanding"
                )));
            }
            table.requests.insert(
                token.clone(),
                PendingRequest {
                    reply,
                    state: Rc::clone(&state),
                },
            );
        }

        state.set(RequestState::AwaitingResponse);
        debug!(token = %token, kind = %request.kind, "dialog request opened");

        let completion = DialogCompletion {
            token: token.clone(),
            state,
            pending: Rc::downgrade(&self.pending),
        };
        // The table is not borrowed here: the service may complete inline.
        self.dialogs.present(request, completion);
        Ok(token)
    }

    /// State of an outstanding request. Settled requests are forgotten and
    /// report `None`; their [`DialogCompletion`] still knows the end state.
    pub fn state(&self, token: &CorrelationToken) -> Option<RequestState> {
        self.pending
            .borrow()
            .requests
            .get(token)
            .map(|req| req.state.get())
    }

    pub fn outstanding(&self) -> usize {
        self.pending.borrow().requests.len()
    }

    pub fn is_closed(&self) -> bool {
        self.pending.borrow().closed
    }

    /// Discard every outstanding request and refuse new ones.
    pub fn discard_all(&self) {
        let drained: Vec<(CorrelationToken, PendingRequest)> = {
            let mut table = self.pending.borrow_mut();
            table.closed = true;
            table.requests.drain().collect()
        };
        for (token, req) in &drained {
            req.state.set(RequestState::Discarded);
            debug!(token = %token, "dialog request discarded");
        }
        if !drained.is_empty() {
            info!(count = drained.len(), "discarded pending dialog requests");
        }
    }
}

/// Single-fire completion handed to the [`DialogService`].
///
/// Clones share state: whichever clone completes first wins and every later
/// call is a no-op.
#[derive(Clone)]
pub struct DialogCompletion {
    token: CorrelationToken,
    state: Rc<Cell<RequestState>>,
    pending: Weak<RefCell<PendingTable>>,
}

impl DialogCompletion {
    pub fn token(&self) -> &CorrelationToken {
        &self.token
    }

    pub fn state(&self) -> RequestState {
        self.state.get()
    }

    /// Deliver the user's choice. Returns `true` only when a response
    /// envelope was actually sent to the frame.
    pub fn complete(&self, choice: DialogChoice) -> bool {
        if self.state.get() != RequestState::AwaitingResponse {
            debug!(token = %self.token, state = ?self.state.get(), "dialog completion ignored");
            return false;
        }

        let entry = match self.pending.upgrade() {
            Some(table) => {
                let removed = table.borrow_mut().requests.remove(&self.token);
                removed
            }
            None => None,
        };
        let Some(entry) = entry else {
            self.state.set(RequestState::Discarded);
            debug!(token = %self.token, "dialog completion discarded: correlator gone");
            return false;
        };

        let envelope = Envelope::new(DIALOG_RESPONSE, vec![choice.into_payload(&self.token)]);
        match entry.reply.send(envelope) {
            Ok(()) => {
                entry.state.set(RequestState::Responded);
                debug!(token = %self.token, "dialog response sent");
                true
            }
            Err(e) => {
                entry.state.set(RequestState::Discarded);
                debug!(token = %self.token, error = %e, "dialog response discarded");
                false
            }
        }
    }
}

impl std::fmt::Debug for DialogCompletion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DialogCompletion")
            .field("token", &self.token)
            .field("state", &self.state.get())
            .finish()
    }
}
