//! Immediate-mode debug geometry ("gizmos").
//!
//! Responsibilities:
//! - fixed-capacity arenas for line and triangle records (`arena`)
//! - an owned accumulator decomposing shapes into those records (`Gizmos`)
//! - a wgpu submitter drawing the used portion of each buffer (`GizmoRenderer`)
//!
//! Geometry lives for exactly one frame: callers `clear()` at the start of a
//! frame, issue `add_*` calls, then draw once per space (3D, then 2D).

mod arena;
mod gizmos;
mod renderer;
mod vertex;

pub use arena::PrimArena;
pub use gizmos::{GizmoConfig, Gizmos};
pub use renderer::GizmoRenderer;
pub use vertex::{GizmoVertex, LineSeg, Tri};
