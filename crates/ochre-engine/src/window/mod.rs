//! Window runtime.
//!
//! Owns the winit event loop and the single game window, drives the
//! [`App`](crate::core::App) callbacks, and translates platform events into
//! the engine's input events.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig};
