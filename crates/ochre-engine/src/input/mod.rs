//! Input polling.
//!
//! Thin, platform-agnostic wrapper over window-system events: the runtime
//! translates winit events into [`InputEvent`]s, [`InputState`] folds them
//! into "currently down" sets plus per-frame pressed/released transitions,
//! and game code polls the state each frame.

mod state;
mod types;

pub use state::InputState;
pub use types::{InputEvent, Key, Modifiers, MouseButton};
