#![warn(missing_docs)]
//! Scene-side collaborators of the pointer: props, cameras, renderers, the
//! render window and the per-frame hook loop.

mod camera;
mod frame;
mod prop;
mod renderer;
mod window;

pub use camera::Camera;
pub use frame::{FrameContext, FrameError, FrameHook, FrameReport, HookId, HookPtr, RenderLoop};
pub use prop::{Prop, PropFlags, PropTable};
pub use renderer::{Renderer, RendererId, Viewport};
pub use window::RenderWindow;
