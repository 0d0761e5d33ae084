//! Ochre engine crate.
//!
//! Bootstrap pieces for small games: window + GPU runtime, an immediate-mode
//! gizmo renderer for debug geometry, and a batched 2D sprite/text renderer.

pub mod device;
pub mod window;
pub mod input;
pub mod time;
pub mod core;

pub mod logging;
pub mod color;
pub mod render;
pub mod texture;
pub mod text;

pub mod gizmo;
pub mod sprite;
