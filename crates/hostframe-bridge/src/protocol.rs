//! Built-in methods every bridged application speaks.
//!
//! | method          | direction    | args                        |
//! |-----------------|--------------|-----------------------------|
//! | `init`          | host → frame | `[pid]`                     |
//! | `yo`            | both         | `[greeting]`                |
//! | `ping`          | frame → host | `[]`, answered by `pong []` |
//! | `create-dialog` | frame → host | `[kind?, options]`          |
//! | `dialog-response` | host → frame | `[{btn, value, token}]`   |

use std::rc::Rc;

use hostframe_common::BridgeError;
use tracing::{debug, warn};

use crate::channel::Sender;
use crate::correlator::DialogRequest;
use crate::envelope::Envelope;
use crate::session::Session;

pub use crate::correlator::DIALOG_RESPONSE;

pub const INIT: &str = "init";
pub const YO: &str = "yo";
pub const PING: &str = "ping";
pub const PONG: &str = "pong";
pub const CREATE_DIALOG: &str = "create-dialog";

/// Register the built-in handlers on `session`'s dispatcher.
pub fn install(session: &Session) -> Result<(), BridgeError> {
    let dispatcher = session.dispatcher();

    let greeting = format!("{} says hello", session.name());
    dispatcher.on(YO, move |send, args| {
        debug!(?args, "yo from frame");
        reply(send, Envelope::new(YO, vec![greeting.clone().into()]));
    })?;

    dispatcher.on(PING, |send, _| reply(send, Envelope::bare(PONG)))?;

    let correlator = Rc::downgrade(session.correlator());
    dispatcher.on(CREATE_DIALOG, move |send, args| {
        let Some(correlator) = correlator.upgrade() else {
            return;
        };
        let result = DialogRequest::from_args(args)
            .and_then(|request| correlator.begin(send.clone(), request));
        match result {
            Ok(token) => debug!(token = %token, "dialog requested"),
            Err(e) => warn!(error = %e, "create-dialog rejected"),
        }
    })?;

    Ok(())
}

fn reply(send: &Sender, envelope: Envelope) {
    let method = envelope.method().to_string();
    if let Err(e) = send.send(envelope) {
        warn!(frame_id = %send.frame_id(), method, error = %e, "reply not delivered");
    }
}
