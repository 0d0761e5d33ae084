//! Core engine-facing contracts.
//!
//! Defines the stable interface between the runtime (platform loop) and game
//! code: the per-frame callback and the frame context it receives.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::{FrameCtx, WindowCtx};
