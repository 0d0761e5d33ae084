//! Batched 2D sprite, shape and text rendering.
//!
//! Responsibilities:
//! - a begin/end-scoped CPU accumulator building quads in strict call order,
//!   sealing a new draw segment whenever the per-segment vertex/index bound
//!   or the texture-slot stack would overflow (`SpriteBatch`)
//! - a wgpu submitter issuing exactly one indexed draw call per sealed
//!   segment (`SpriteRenderer`)
//! - a camera defining the screen-space orthographic projection (`Camera2D`)

mod batch;
mod camera;
mod renderer;

pub use batch::{SpriteBatch, SpriteBatchConfig, SpriteVertex, TEXTURE_SLOTS};
pub use camera::Camera2D;
pub use renderer::SpriteRenderer;
