#![warn(missing_docs)]
//! Controller pointer-ray interaction.
//!
//! Each rendered frame the [`PointerStyle`] picks the controller that drives
//! the pointer, casts a ray from its pose, resolves the ray length and
//! publishes it to the device's visual model. Button and motion events feed
//! the same object to select and manipulate props.
//!
//! # Example
//!
//! ```rust
//! use raypoint_interaction::{PointerSettings, PointerStyle};
//! use raypoint_scene::{HookPtr, PropTable, RenderLoop, RenderWindow, Viewport};
//! use raypoint_tracking::{ControllerRole, MockTracker};
//! use raypoint_core::Pose;
//! use std::{cell::RefCell, rc::Rc};
//!
//! let mut window = RenderWindow::new(1280, 720);
//! window.add_renderer(Viewport::FULL);
//! let mut props = PropTable::new();
//! let mut tracker = MockTracker::new();
//! let right = tracker.add_controller(ControllerRole::RightHand, Some(Pose::IDENTITY)).unwrap();
//!
//! let style = Rc::new(RefCell::new(PointerStyle::new(PointerSettings::default())));
//! let mut render_loop = RenderLoop::new();
//! let hook: HookPtr = style.clone();
//! render_loop.register(hook, 0);
//!
//! render_loop.render(&mut window, &mut props, Some(&tracker));
//! // Nothing was hit, so the ray reaches the far clipping plane.
//! assert_eq!(window.device_models().get(right).unwrap().ray_length, 1000.0);
//! ```

mod length;
pub mod manipulate;
mod picker;
mod style;

pub use length::{resolve_length, LengthSource, ResolvedLength};
pub use picker::{PickHit, PropPicker};
pub use style::{
    ControllerButton, ControllerEvent, InteractionState, PointerSettings, PointerStyle,
    POINTER_HOOK_NAME,
};
