//! Tests for dialog request correlation.

use super::*;
use crate::channel::Channel;
use crate::process::ProcessHandle;
use crate::testing::{RecordingFrame, ScriptedDialogs};
use hostframe_common::Pid;
use serde_json::json;

struct Fixture {
    channel: Channel,
    frame: Rc<RecordingFrame>,
    process: ProcessHandle,
    dialogs: Rc<ScriptedDialogs>,
    correlator: RequestCorrelator,
}

fn fixture() -> Fixture {
    let frame = RecordingFrame::new(1, "hostframe://localhost");
    let process = ProcessHandle::new(Pid(1), "app");
    let channel = Channel::new(frame.clone(), process.clone());
    channel.mark_ready();
    let dialogs = Rc::new(ScriptedDialogs::default());
    let correlator = RequestCorrelator::new(dialogs.clone());
    Fixture {
        channel,
        frame,
        process,
        dialogs,
        correlator,
    }
}

fn confirm(message: &str) -> DialogRequest {
    DialogRequest::new("confirm", json!({ "message": message }))
}

#[test]
fn begin_presents_request_and_awaits() {
    let fx = fixture();
    let token = fx
        .correlator
        .begin(fx.channel.sender(), confirm("x"))
        .unwrap();

    assert_eq!(fx.dialogs.count(), 1);
    assert_eq!(fx.dialogs.requests()[0].options, json!({"message": "x"}));
    assert_eq!(fx.correlator.state(&token), Some(RequestState::AwaitingResponse));
    assert_eq!(fx.correlator.outstanding(), 1);
    assert!(fx.frame.posted().is_empty());
}

#[test]
fn completion_sends_exactly_one_response() {
    let fx = fixture();
    let token = fx
        .correlator
        .begin(fx.channel.sender(), confirm("x"))
        .unwrap();
    let completion = fx.dialogs.completion(0);

    assert!(completion.complete(DialogChoice::new("ok", json!("value1"))));
    assert!(!completion.complete(DialogChoice::new("cancel", json!(null))));

    let posted = fx.frame.posted();
    assert_eq!(posted.len(), 1);
    assert_eq!(posted[0].method(), DIALOG_RESPONSE);
    assert_eq!(
        posted[0].args(),
        &[json!({"btn": "ok", "value": "value1", "token": token.as_str()})]
    );
    assert_eq!(completion.state(), RequestState::Responded);
    assert_eq!(fx.correlator.state(&token), None);
    assert_eq!(fx.correlator.outstanding(), 0);
}

#[test]
fn cloned_completion_cannot_respond_twice() {
    let fx = fixture();
    fx.correlator
        .begin(fx.channel.sender(), confirm("x"))
        .unwrap();
    let a = fx.dialogs.completion(0);
    let b = a.clone();

    assert!(b.complete(DialogChoice::button("ok")));
    assert!(!a.complete(DialogChoice::button("ok")));
    assert_eq!(fx.frame.posted().len(), 1);
}

#[test]
fn concurrent_requests_are_matched_by_token() {
    let fx = fixture();
    let first = fx
        .correlator
        .begin(fx.channel.sender(), confirm("one"))
        .unwrap();
    let second = fx
        .correlator
        .begin(fx.channel.sender(), confirm("two"))
        .unwrap();
    assert_ne!(first, second);
    assert_eq!(fx.correlator.outstanding(), 2);

    // Answer out of order.
    fx.dialogs.completion(1).complete(DialogChoice::button("no"));
    fx.dialogs.completion(0).complete(DialogChoice::button("yes"));

    let posted = fx.frame.posted();
    assert_eq!(posted[0].args()[0]["token"], json!(second.as_str()));
    assert_eq!(posted[0].args()[0]["btn"], json!("no"));
    assert_eq!(posted[1].args()[0]["token"], json!(first.as_str()));
    assert_eq!(posted[1].args()[0]["btn"], json!("yes"));
}

#[test]
fn frame_supplied_token_is_echoed() {
    let fx = fixture();
    let mut request = confirm("x");
    request.token = Some(CorrelationToken::from("frame-7"));

    let token = fx.correlator.begin(fx.channel.sender(), request).unwrap();
    assert_eq!(token.as_str(), "frame-7");
    assert_eq!(fx.dialogs.requests()[0].token, None);

    fx.dialogs.completion(0).complete(DialogChoice::button("ok"));
    assert_eq!(fx.frame.posted()[0].args()[0]["token"], json!("frame-7"));
}

#[test]
fn duplicate_outstanding_token_is_rejected() {
    let fx = fixture();
    let mut a = confirm("a");
    a.token = Some(CorrelationToken::from("same"));
    let mut b = confirm("b");
    b.token = Some(CorrelationToken::from("same"));

    fx.correlator.begin(fx.channel.sender(), a).unwrap();
    let err = fx.correlator.begin(fx.channel.sender(), b).unwrap_err();
    assert!(matches!(err, BridgeError::MalformedEnvelope(_)));
    assert_eq!(fx.dialogs.count(), 1);
}

#[test]
fn discard_all_discards_outstanding_requests() {
    let fx = fixture();
    let token = fx
        .correlator
        .begin(fx.channel.sender(), confirm("x"))
        .unwrap();
    let completion = fx.dialogs.completion(0);

    fx.correlator.discard_all();
    assert_eq!(completion.state(), RequestState::Discarded);
    assert_eq!(fx.correlator.state(&token), None);

    assert!(!completion.complete(DialogChoice::button("ok")));
    assert!(fx.frame.posted().is_empty());
    assert_eq!(completion.state(), RequestState::Discarded);
}

#[test]
fn closed_correlator_refuses_new_requests() {
    let fx = fixture();
    fx.correlator.discard_all();
    assert!(fx.correlator.is_closed());
    assert_eq!(
        fx.correlator
            .begin(fx.channel.sender(), confirm("x"))
            .unwrap_err(),
        BridgeError::ProcessDestroyed
    );
    assert_eq!(fx.dialogs.count(), 0);
}

#[test]
fn response_after_process_destroy_is_discarded() {
    let fx = fixture();
    fx.correlator
        .begin(fx.channel.sender(), confirm("x"))
        .unwrap();
    let completion = fx.dialogs.completion(0);

    // Destroyed without the correlator being told: the send path refuses.
    fx.process.destroy();
    assert!(!completion.complete(DialogChoice::button("ok")));
    assert_eq!(completion.state(), RequestState::Discarded);
    assert!(fx.frame.posted().is_empty());
}

#[test]
fn response_after_channel_dropped_is_discarded() {
    let fx = fixture();
    fx.correlator
        .begin(fx.channel.sender(), confirm("x"))
        .unwrap();
    let completion = fx.dialogs.completion(0);

    drop(fx.channel);
    assert!(!completion.complete(DialogChoice::button("ok")));
    assert_eq!(completion.state(), RequestState::Discarded);
}

#[test]
fn completion_outliving_correlator_is_discarded() {
    let fx = fixture();
    fx.correlator
        .begin(fx.channel.sender(), confirm("x"))
        .unwrap();
    let completion = fx.dialogs.completion(0);

    drop(fx.correlator);
    assert!(!completion.complete(DialogChoice::button("ok")));
    assert_eq!(completion.state(), RequestState::Discarded);
}

/// Completes every dialog inline, twice, the way a buggy service might.
struct DoubleFiringDialogs;

impl DialogService for DoubleFiringDialogs {
    fn present(&self, _request: DialogRequest, completion: DialogCompletion) {
        completion.complete(DialogChoice::button("ok"));
        completion.complete(DialogChoice::button("ok"));
    }
}

#[test]
fn synchronous_double_completion_sends_once() {
    let frame = RecordingFrame::new(1, "hostframe://localhost");
    let channel = Channel::new(frame.clone(), ProcessHandle::new(Pid(1), "app"));
    channel.mark_ready();
    let correlator = RequestCorrelator::new(Rc::new(DoubleFiringDialogs));

    correlator.begin(channel.sender(), confirm("x")).unwrap();
    assert_eq!(frame.posted().len(), 1);
    assert_eq!(correlator.outstanding(), 0);
}

#[test]
fn terminal_states() {
    assert!(RequestState::Responded.is_terminal());
    assert!(RequestState::Discarded.is_terminal());
    assert!(!RequestState::Created.is_terminal());
    assert!(!RequestState::AwaitingResponse.is_terminal());
}

#[test]
fn generated_tokens_carry_a_full_uuid() {
    let fx = fixture();
    let token = fx
        .correlator
        .begin(fx.channel.sender(), confirm("x"))
        .unwrap();
    assert_eq!(token.as_str().len(), 32);
    assert!(token.as_str().chars().all(|c| c.is_ascii_hexdigit()));
}
