//! The pointer interaction style: device selection, ray length and the
//! select / rotate state machine.

use crate::length::{resolve_length, ResolvedLength};
use crate::manipulate;
use crate::picker::{PickHit, PropPicker};
use raypoint_core::{DeviceIndex, Pose, PropId};
use raypoint_scene::{FrameContext, FrameError, FrameHook, PropTable};
use raypoint_tracking::{select_device, SelectorPolicy};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Name the style reports to the render loop.
pub const POINTER_HOOK_NAME: &str = "pointer";

/// User-facing pointer options.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointerSettings {
    /// How the driving controller is chosen.
    pub selector_policy: SelectorPolicy,
    /// Whether the selected controller draws its ray.
    pub show_ray: bool,
}

impl Default for PointerSettings {
    fn default() -> Self {
        Self {
            selector_policy: SelectorPolicy::default(),
            show_ray: true,
        }
    }
}

/// What the pointer is doing with its target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionState {
    /// No button held.
    #[default]
    Idle,
    /// Primary held: the target follows the controller.
    Rotate,
    /// Secondary held: the target is selected.
    Select,
}

/// Controller buttons the pointer reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControllerButton {
    /// Trigger.
    Primary,
    /// Grip.
    Secondary,
}

/// Input event from a tracked controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ControllerEvent {
    /// Button went down.
    Press {
        /// Source controller.
        device: DeviceIndex,
        /// Button pressed.
        button: ControllerButton,
    },
    /// Button went up.
    Release {
        /// Source controller.
        device: DeviceIndex,
        /// Button released.
        button: ControllerButton,
    },
    /// Controller pose changed.
    Move {
        /// Source controller.
        device: DeviceIndex,
    },
}

impl ControllerEvent {
    /// Controller that produced the event.
    pub fn device(&self) -> DeviceIndex {
        match *self {
            Self::Press { device, .. } | Self::Release { device, .. } | Self::Move { device } => {
                device
            }
        }
    }
}

/// Pointer interaction style for tracked controllers.
///
/// Register it with a [`raypoint_scene::RenderLoop`] to keep the ray length
/// current every frame, and feed it [`ControllerEvent`]s to select and drag
/// props.
#[derive(Debug, Clone)]
pub struct PointerStyle {
    settings: PointerSettings,
    picker: PropPicker,
    current_target: Option<PropId>,
    state: InteractionState,
    grab_pose: Option<Pose>,
    active_device: Option<DeviceIndex>,
    length: f32,
    last_resolution: Option<ResolvedLength>,
}

impl Default for PointerStyle {
    fn default() -> Self {
        Self::new(PointerSettings::default())
    }
}

impl PointerStyle {
    /// Create an idle style.
    pub fn new(settings: PointerSettings) -> Self {
        Self {
            settings,
            picker: PropPicker::new(),
            current_target: None,
            state: InteractionState::Idle,
            grab_pose: None,
            active_device: None,
            length: 0.0,
            last_resolution: None,
        }
    }

    /// Current options.
    pub fn settings(&self) -> PointerSettings {
        self.settings
    }

    /// Toggle the ray of the selected controller.
    pub fn set_show_ray(&mut self, show: bool) {
        self.settings.show_ray = show;
    }

    /// Change how the driving controller is chosen.
    pub fn set_selector_policy(&mut self, policy: SelectorPolicy) {
        self.settings.selector_policy = policy;
    }

    /// Prop the pointer is acting on.
    pub fn current_target(&self) -> Option<PropId> {
        self.current_target
    }

    /// Force the target prop.
    pub fn set_current_target(&mut self, target: Option<PropId>) {
        self.current_target = target;
    }

    /// Current interaction state.
    pub fn state(&self) -> InteractionState {
        self.state
    }

    /// Controller chosen on the last frame.
    pub fn active_device(&self) -> Option<DeviceIndex> {
        self.active_device
    }

    /// Ray length computed on the last frame that reached the resolver.
    pub fn length(&self) -> f32 {
        self.length
    }

    /// Length and rule resolved on the most recent frame, `None` when that
    /// frame stopped before resolving.
    pub fn last_resolution(&self) -> Option<ResolvedLength> {
        self.last_resolution
    }

    /// Picker state from the last pick.
    pub fn picker(&self) -> &PropPicker {
        &self.picker
    }

    /// Drag the current target with the controller.
    ///
    /// Does nothing and returns `false` when there is no target, the target
    /// was removed, or it is not draggable.
    pub fn rotate(&mut self, props: &mut PropTable, controller_pose: Pose) -> bool {
        let Some(target) = self.current_target else {
            return false;
        };
        let Some(prop) = props.get_mut(target) else {
            return false;
        };
        if !prop.is_draggable() {
            return false;
        }

        let previous = self.grab_pose.replace(controller_pose).unwrap_or(controller_pose);
        manipulate::rotate_with_controller(prop, &previous, &controller_pose);
        true
    }

    /// Feed one controller event.
    ///
    /// Returns `Ok(true)` when the event changed the style. Presses and
    /// motion from controllers other than the selected one are ignored.
    /// Releases always end the interaction.
    pub fn handle_event(
        &mut self,
        event: &ControllerEvent,
        ctx: &mut FrameContext<'_>,
    ) -> Result<bool, FrameError> {
        if let ControllerEvent::Release { button, .. } = *event {
            let had_target = self.current_target.take().is_some();
            let was_active = self.state != InteractionState::Idle;
            self.state = InteractionState::Idle;
            self.grab_pose = None;
            debug!(?button, "pointer released");
            return Ok(had_target || was_active);
        }

        let tracker = ctx.tracker.ok_or(FrameError::MissingTracker)?;
        let selection = select_device(tracker, self.settings.selector_policy, self.settings.show_ray);
        if selection.active != Some(event.device()) {
            return Ok(false);
        }
        let Some(pose) = ctx.window.world_pose(tracker, event.device()) else {
            return Ok(false);
        };

        match *event {
            ControllerEvent::Press { button, device } => {
                let hit = self.pick_from(ctx, &pose)?;
                self.current_target = hit.map(|hit| hit.prop);
                self.state = match button {
                    ControllerButton::Primary => InteractionState::Rotate,
                    ControllerButton::Secondary => InteractionState::Select,
                };
                self.grab_pose = Some(pose);
                debug!(
                    %device,
                    ?button,
                    target = ?self.current_target,
                    "pointer pressed"
                );
                Ok(true)
            }
            ControllerEvent::Move { .. } if self.state == InteractionState::Rotate => {
                Ok(self.rotate(ctx.props, pose))
            }
            _ => Ok(false),
        }
    }

    fn pick_from(
        &mut self,
        ctx: &FrameContext<'_>,
        pose: &Pose,
    ) -> Result<Option<PickHit>, FrameError> {
        let renderer = ctx
            .window
            .current_renderer()
            .ok_or(FrameError::MissingRenderer)?;
        let candidates = renderer.visible_props(ctx.props);
        let far_clip = renderer.camera().far_clip();
        Ok(self.picker.pick(&pose.ray(), ctx.props, &candidates, far_clip))
    }
}

impl FrameHook for PointerStyle {
    fn name(&self) -> &str {
        POINTER_HOOK_NAME
    }

    fn on_render(&mut self, ctx: &mut FrameContext<'_>) -> Result<(), FrameError> {
        self.last_resolution = None;
        if ctx.window.current_renderer().is_none() {
            return Err(FrameError::MissingRenderer);
        }
        let tracker = ctx.tracker.ok_or(FrameError::MissingTracker)?;

        let selection = select_device(tracker, self.settings.selector_policy, self.settings.show_ray);
        selection.apply(ctx.window.device_models_mut());
        self.active_device = selection.active;

        if !self.settings.show_ray {
            return Ok(());
        }
        let Some(device) = selection.active else {
            return Ok(());
        };
        let Some(pose) = ctx.window.world_pose(tracker, device) else {
            trace!(%device, "no valid pose");
            return Ok(());
        };

        let hit = self.pick_from(ctx, &pose)?;
        let far_clip = ctx
            .window
            .current_renderer()
            .map(|renderer| renderer.camera().far_clip())
            .ok_or(FrameError::MissingRenderer)?;
        let target_position = self
            .current_target
            .and_then(|id| ctx.props.get(id))
            .map(|prop| prop.position);

        let resolved = resolve_length(pose.position, hit.as_ref(), target_position, far_clip);
        self.length = resolved.length;
        self.last_resolution = Some(resolved);
        ctx.window
            .device_models_mut()
            .model_mut(device)
            .set_ray_length(resolved.length);
        trace!(
            frame = ctx.frame.0,
            %device,
            length = resolved.length,
            source = resolved.source.as_str(),
            "ray length"
        );
        Ok(())
    }
}
