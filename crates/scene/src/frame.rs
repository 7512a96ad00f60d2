//! Per-frame hooks run synchronously by the render loop.

use crate::prop::PropTable;
use crate::window::RenderWindow;
use raypoint_core::FrameNumber;
use raypoint_tracking::DeviceTracker;
use std::cell::RefCell;
use std::rc::Rc;
use thiserror::Error;

/// Context handed to hooks for one frame.
pub struct FrameContext<'a> {
    /// Frame being rendered.
    pub frame: FrameNumber,
    /// Window being rendered.
    pub window: &'a mut RenderWindow,
    /// Props owned by the scene.
    pub props: &'a mut PropTable,
    /// Tracking runtime handle, absent when the runtime is unavailable.
    pub tracker: Option<&'a dyn DeviceTracker>,
}

/// Reasons a hook skips a frame. None of them are fatal.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FrameError {
    /// The window has no current renderer.
    #[error("unable to get a renderer; set a current renderer on the window")]
    MissingRenderer,
    /// The tracking runtime is unavailable this frame.
    #[error("unable to get the device tracking handle")]
    MissingTracker,
}

/// A callback invoked once per render pass.
pub trait FrameHook {
    /// Name used in diagnostics.
    fn name(&self) -> &str;

    /// Run for the current frame. Errors skip the frame for this hook only.
    fn on_render(&mut self, ctx: &mut FrameContext<'_>) -> Result<(), FrameError>;
}

/// Shared handle to a registered hook. The application keeps a clone to feed
/// input into the same object the render loop drives.
pub type HookPtr = Rc<RefCell<dyn FrameHook>>;

/// Identifier returned by [`RenderLoop::register`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HookId(u64);

struct Registration {
    id: HookId,
    priority: i32,
    hook: HookPtr,
    last_failure: Option<FrameError>,
}

/// Outcome of one [`RenderLoop::render`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameReport {
    /// Frame that was rendered.
    pub frame: FrameNumber,
    /// Hooks that skipped the frame, with the reason.
    pub failures: Vec<(String, FrameError)>,
}

/// Drives registered hooks once per frame, highest priority first.
pub struct RenderLoop {
    hooks: Vec<Registration>,
    next_id: u64,
    frame: FrameNumber,
}

impl Default for RenderLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderLoop {
    /// Create a loop with no hooks.
    pub fn new() -> Self {
        Self {
            hooks: Vec::new(),
            next_id: 0,
            frame: FrameNumber::ZERO,
        }
    }

    /// Register `hook`. Equal priorities run in registration order.
    pub fn register(&mut self, hook: HookPtr, priority: i32) -> HookId {
        let id = HookId(self.next_id);
        self.next_id += 1;
        self.hooks.push(Registration {
            id,
            priority,
            hook,
            last_failure: None,
        });
        // Stable sort keeps registration order within a priority.
        self.hooks.sort_by(|a, b| b.priority.cmp(&a.priority));
        id
    }

    /// Remove a hook. Returns `false` if it was not registered.
    pub fn unregister(&mut self, id: HookId) -> bool {
        let before = self.hooks.len();
        self.hooks.retain(|registration| registration.id != id);
        before != self.hooks.len()
    }

    /// Number of registered hooks.
    pub fn hook_count(&self) -> usize {
        self.hooks.len()
    }

    /// Number of frames rendered so far.
    pub fn frame(&self) -> FrameNumber {
        self.frame
    }

    /// Render one frame: sync cameras to the headset, then run every hook.
    pub fn render(
        &mut self,
        window: &mut RenderWindow,
        props: &mut PropTable,
        tracker: Option<&dyn DeviceTracker>,
    ) -> FrameReport {
        self.frame = self.frame.advance(1);
        if let Some(tracker) = tracker {
            window.sync_cameras_to_headset(tracker);
        }

        let mut ctx = FrameContext {
            frame: self.frame,
            window,
            props,
            tracker,
        };
        let mut failures = Vec::new();

        for registration in &mut self.hooks {
            let Ok(mut hook) = registration.hook.try_borrow_mut() else {
                tracing::warn!(frame = ctx.frame.0, "hook is busy; skipping this frame");
                continue;
            };
            match hook.on_render(&mut ctx) {
                Ok(()) => {
                    if registration.last_failure.take().is_some() {
                        tracing::info!(hook = hook.name(), frame = ctx.frame.0, "hook recovered");
                    }
                }
                Err(err) => {
                    if registration.last_failure.as_ref() == Some(&err) {
                        tracing::debug!(hook = hook.name(), frame = ctx.frame.0, %err, "frame skipped");
                    } else {
                        tracing::error!(hook = hook.name(), frame = ctx.frame.0, %err, "frame skipped");
                    }
                    failures.push((hook.name().to_string(), err.clone()));
                    registration.last_failure = Some(err);
                }
            }
        }

        FrameReport {
            frame: self.frame,
            failures,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::Viewport;
    use raypoint_tracking::MockTracker;

    struct Recorder {
        name: &'static str,
        log: Rc<RefCell<Vec<&'static str>>>,
        fail_without_renderer: bool,
    }

    impl FrameHook for Recorder {
        fn name(&self) -> &str {
            self.name
        }

        fn on_render(&mut self, ctx: &mut FrameContext<'_>) -> Result<(), FrameError> {
            if self.fail_without_renderer && ctx.window.current_renderer().is_none() {
                return Err(FrameError::MissingRenderer);
            }
            self.log.borrow_mut().push(self.name);
            Ok(())
        }
    }

    fn recorder(name: &'static str, log: &Rc<RefCell<Vec<&'static str>>>) -> HookPtr {
        Rc::new(RefCell::new(Recorder {
            name,
            log: log.clone(),
            fail_without_renderer: true,
        }))
    }

    #[test]
    fn hooks_run_by_priority_then_registration() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut render_loop = RenderLoop::new();
        render_loop.register(recorder("low", &log), 0);
        render_loop.register(recorder("high", &log), 10);
        render_loop.register(recorder("low-2", &log), 0);

        let mut window = RenderWindow::new(100, 100);
        window.add_renderer(Viewport::FULL);
        let mut props = PropTable::new();
        let tracker = MockTracker::new();
        let report = render_loop.render(&mut window, &mut props, Some(&tracker));

        assert_eq!(report.frame, FrameNumber(1));
        assert!(report.failures.is_empty());
        assert_eq!(*log.borrow(), vec!["high", "low", "low-2"]);
    }

    #[test]
    fn failing_hook_skips_frame_and_retries() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut render_loop = RenderLoop::new();
        render_loop.register(recorder("pointer", &log), 0);

        let mut window = RenderWindow::new(100, 100);
        let mut props = PropTable::new();
        let first = render_loop.render(&mut window, &mut props, None);
        assert_eq!(
            first.failures,
            vec![("pointer".to_string(), FrameError::MissingRenderer)]
        );
        let second = render_loop.render(&mut window, &mut props, None);
        assert_eq!(second.failures.len(), 1);

        window.add_renderer(Viewport::FULL);
        let third = render_loop.render(&mut window, &mut props, None);
        assert!(third.failures.is_empty());
        assert_eq!(third.frame, FrameNumber(3));
        assert_eq!(*log.borrow(), vec!["pointer"]);
    }

    #[test]
    fn busy_hook_is_skipped() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let hook = recorder("busy", &log);
        let mut render_loop = RenderLoop::new();
        let id = render_loop.register(hook.clone(), 0);

        let mut window = RenderWindow::new(100, 100);
        window.add_renderer(Viewport::FULL);
        let mut props = PropTable::new();
        {
            let _held = hook.borrow_mut();
            render_loop.render(&mut window, &mut props, None);
        }
        assert!(log.borrow().is_empty());
        assert!(render_loop.unregister(id));
        assert!(!render_loop.unregister(id));
        assert_eq!(render_loop.hook_count(), 0);
    }
}
