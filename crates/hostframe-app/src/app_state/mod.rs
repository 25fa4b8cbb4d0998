//! Top-level application state.
//!
//! Implements `winit::application::ApplicationHandler` to drive the main
//! event loop. Owns the app registry, launched sessions and the native
//! windows their frames live in.

mod core;
mod event_handler;
mod polling;
mod shutdown;
mod types;

pub use core::HostframeApp;
