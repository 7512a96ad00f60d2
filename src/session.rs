//! Headless pointer session: builds a scene from a script, drives the
//! render loop frame by frame and records what the pointer did.

use crate::config::PointerConfig;
use crate::script::{ScriptFile, ScriptPlayer, ScriptStep};
use anyhow::{Context, Result};
use glam::{Quat, Vec3};
use raypoint_core::{Aabb, DeviceIndex, FrameNumber};
use raypoint_interaction::{ControllerEvent, PointerStyle};
use raypoint_scene::{
    FrameContext, FrameError, HookPtr, Prop, PropFlags, PropTable, RenderLoop, RenderWindow,
};
use raypoint_testkit::{FrameRecord, JsonlSink, SessionSummary};
use raypoint_tracking::{DeviceClass, MockTracker};
use std::{cell::RefCell, path::PathBuf, rc::Rc};
use tracing::{debug, info, warn};

/// Window size used for headless sessions.
const WINDOW_SIZE: (u32, u32) = (1280, 720);

/// Everything [`run`] needs.
pub struct SessionConfig {
    /// Pointer and window options.
    pub pointer: PointerConfig,
    /// Scene and per-frame input.
    pub script: ScriptFile,
    /// Frames to run; the script's length when absent.
    pub frames: Option<u64>,
    /// JSONL file receiving one [`FrameRecord`] per frame.
    pub record: Option<PathBuf>,
}

/// A scene, a mock tracker and a render loop with the pointer style hooked in.
pub struct Session {
    window: RenderWindow,
    props: PropTable,
    tracker: MockTracker,
    devices: Vec<DeviceIndex>,
    style: Rc<RefCell<PointerStyle>>,
    render_loop: RenderLoop,
}

impl Session {
    /// Build the scene described by `script`.
    pub fn new(pointer: &PointerConfig, script: &ScriptFile) -> Result<Self> {
        let (width, height) = WINDOW_SIZE;
        let mut window = pointer.build_window(width, height);

        let mut props = PropTable::new();
        for entry in &script.props {
            let mut flags = PropFlags::empty();
            flags.set(PropFlags::VISIBLE, entry.visible);
            flags.set(PropFlags::PICKABLE, entry.pickable);
            flags.set(PropFlags::DRAGGABLE, entry.draggable);
            let prop = Prop::new(entry.name.clone(), Vec3::from_array(entry.position))
                .with_bounds(Aabb::from_center_size(Vec3::ZERO, Vec3::from_array(entry.size)))
                .with_orientation(Quat::from_rotation_y(entry.yaw_degrees.to_radians()))
                .with_flags(flags);
            let id = props.insert(prop);

            let renderer_ids: Vec<_> = window.renderers().iter().map(|r| r.id()).collect();
            let targets: Vec<_> = match entry.viewport {
                Some(index) => {
                    let id = renderer_ids.get(index).copied().with_context(|| {
                        format!(
                            "prop {} wants viewport {index} but only {} exist",
                            entry.name,
                            renderer_ids.len()
                        )
                    })?;
                    vec![id]
                }
                None => renderer_ids,
            };
            for renderer in targets {
                if let Some(renderer) = window.renderer_mut(renderer) {
                    renderer.add_view_prop(id);
                }
            }
        }

        if pointer.fit_clipping_to_props {
            let ids: Vec<_> = window.renderers().iter().map(|r| r.id()).collect();
            for id in ids {
                if let Some(renderer) = window.renderer_mut(id) {
                    renderer.reset_camera_clipping_range(&props);
                    let (near, far) = renderer.camera().clipping_range();
                    debug!(renderer = id.0, near, far, "clipping range fitted to props");
                }
            }
        }

        let mut tracker = MockTracker::new();
        let mut devices = Vec::with_capacity(script.devices.len());
        for device in &script.devices {
            let role = if device.class == DeviceClass::Controller {
                device.role
            } else {
                Default::default()
            };
            let index = tracker.add_device(device.class, role, device.pose.map(|p| p.to_pose()))?;
            devices.push(index);
        }

        let style = Rc::new(RefCell::new(PointerStyle::new(pointer.settings())));
        let mut render_loop = RenderLoop::new();
        let hook: HookPtr = style.clone();
        render_loop.register(hook, 0);

        info!(
            props = props.len(),
            devices = devices.len(),
            renderers = window.renderers().len(),
            policy = %pointer.selector_policy,
            "session ready"
        );

        Ok(Self {
            window,
            props,
            tracker,
            devices,
            style,
            render_loop,
        })
    }

    /// Shared handle to the pointer style.
    pub fn style(&self) -> &Rc<RefCell<PointerStyle>> {
        &self.style
    }

    /// Window holding the renderers and device models.
    pub fn window(&self) -> &RenderWindow {
        &self.window
    }

    /// Props of the scene.
    pub fn props(&self) -> &PropTable {
        &self.props
    }

    /// Tracker slot assigned to script device `index`.
    pub fn device(&self, index: usize) -> Option<DeviceIndex> {
        self.devices.get(index).copied()
    }

    /// Apply a step's changes (when `entered`) and render one frame.
    pub fn step(&mut self, step: &ScriptStep, entered: bool) -> FrameRecord {
        if entered {
            self.apply(step);
        }
        let report = self.render_loop.render(
            &mut self.window,
            &mut self.props,
            Some(&self.tracker),
        );
        self.record(report.frame, &report.failures)
    }

    fn apply(&mut self, step: &ScriptStep) {
        {
            let mut style = self.style.borrow_mut();
            if let Some(show) = step.show_ray {
                style.set_show_ray(show);
            }
            if let Some(policy) = step.policy {
                style.set_selector_policy(policy);
            }
        }
        if let Some(places) = step.cycle_renderer {
            self.window.cycle_current_renderer(places);
        }

        let mut events = Vec::new();
        for update in &step.poses {
            let Some(device) = self.device(update.device) else {
                continue;
            };
            if let Err(err) = self.tracker.set_pose(device, update.pose.map(|p| p.to_pose())) {
                warn!(%device, %err, "pose update ignored");
                continue;
            }
            events.push(ControllerEvent::Move { device });
        }
        // Presses pick from the new poses; moves then drag whatever was grabbed
        // earlier, and releases come last.
        let presses = step.press.iter().filter_map(|b| {
            self.device(b.device).map(|device| ControllerEvent::Press {
                device,
                button: b.button,
            })
        });
        let mut ordered: Vec<_> = presses.collect();
        ordered.append(&mut events);
        ordered.extend(step.release.iter().filter_map(|b| {
            self.device(b.device).map(|device| ControllerEvent::Release {
                device,
                button: b.button,
            })
        }));

        let mut ctx = FrameContext {
            frame: self.render_loop.frame(),
            window: &mut self.window,
            props: &mut self.props,
            tracker: Some(&self.tracker),
        };
        let mut style = self.style.borrow_mut();
        for event in &ordered {
            if let Err(err) = style.handle_event(event, &mut ctx) {
                warn!(?event, %err, "controller event dropped");
            }
        }
    }

    fn record(&self, frame: FrameNumber, failures: &[(String, FrameError)]) -> FrameRecord {
        let style = self.style.borrow();
        let device = style.active_device();
        let show_ray = device.is_some_and(|d| self.window.device_models().shows_ray(d));
        let resolved = style.last_resolution();
        FrameRecord {
            frame,
            device,
            show_ray,
            ray_length: resolved.map(|r| r.length),
            source: resolved.map(|r| r.source.as_str().to_string()),
            target: style
                .current_target()
                .and_then(|id| self.props.get(id))
                .map(|prop| prop.name.clone()),
            state: format!("{:?}", style.state()).to_lowercase(),
            failures: failures
                .iter()
                .map(|(hook, err)| format!("{hook}: {err}"))
                .collect(),
        }
    }
}

/// Run a whole session and return its summary.
pub fn run(cfg: SessionConfig) -> Result<SessionSummary> {
    let mut session = Session::new(&cfg.pointer, &cfg.script)?;
    let mut player = ScriptPlayer::new(&cfg.script);
    let frames = cfg.frames.unwrap_or_else(|| cfg.script.total_frames());

    let mut sink = match cfg.record.as_ref() {
        Some(path) => Some(
            JsonlSink::create(path)
                .with_context(|| format!("Failed to open record file {}", path.display()))?,
        ),
        None => None,
    };

    let mut summary = SessionSummary::new("raypoint");
    for _ in 0..frames {
        let Some(frame) = player.advance() else {
            break;
        };
        let record = session.step(frame.step, frame.entered);
        summary.record(&record);
        if let Some(sink) = sink.as_mut() {
            sink.write(&record)?;
        }
    }
    if let Some(sink) = sink.as_mut() {
        sink.flush()?;
        info!(lines = sink.lines(), "frame records written");
    }

    info!(
        frames = summary.frames,
        hits = summary.count("hit"),
        idle = summary.idle_frames,
        "session finished"
    );
    Ok(summary)
}
