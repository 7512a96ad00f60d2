//! JSON session scripts: the props in the scene, the tracked devices and a
//! timeline of controller poses and button presses.

use anyhow::{Context, Result};
use glam::{EulerRot, Quat, Vec3};
use raypoint_core::Pose;
use raypoint_interaction::ControllerButton;
use raypoint_tracking::{ControllerRole, DeviceClass, SelectorPolicy};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

/// A complete script: scene contents plus the step timeline.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ScriptFile {
    #[serde(default)]
    pub props: Vec<ScriptProp>,
    #[serde(default)]
    pub devices: Vec<ScriptDevice>,
    pub steps: Vec<ScriptStep>,
}

fn yes() -> bool {
    true
}

fn unit_size() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}

/// A box-shaped prop.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ScriptProp {
    pub name: String,
    pub position: [f32; 3],
    #[serde(default = "unit_size")]
    pub size: [f32; 3],
    #[serde(default)]
    pub yaw_degrees: f32,
    #[serde(default = "yes")]
    pub visible: bool,
    #[serde(default = "yes")]
    pub pickable: bool,
    #[serde(default = "yes")]
    pub draggable: bool,
    /// Renderer index showing the prop; every renderer when absent.
    #[serde(default)]
    pub viewport: Option<usize>,
}

/// A tracked device added after the headset.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ScriptDevice {
    #[serde(default = "controller_class")]
    pub class: DeviceClass,
    #[serde(default)]
    pub role: ControllerRole,
    #[serde(default)]
    pub pose: Option<ScriptPose>,
}

fn controller_class() -> DeviceClass {
    DeviceClass::Controller
}

/// Tracking-space pose; angles in degrees, applied yaw then pitch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ScriptPose {
    pub position: [f32; 3],
    pub yaw_degrees: f32,
    pub pitch_degrees: f32,
}

impl ScriptPose {
    /// Convert to a [`Pose`] in tracking space.
    pub fn to_pose(self) -> Pose {
        let orientation = Quat::from_euler(
            EulerRot::YXZ,
            self.yaw_degrees.to_radians(),
            self.pitch_degrees.to_radians(),
            0.0,
        );
        Pose::new(Vec3::from_array(self.position), orientation)
    }
}

/// Pose change for one device. `pose: null` marks tracking as lost.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct PoseUpdate {
    /// Index into [`ScriptFile::devices`].
    pub device: usize,
    pub pose: Option<ScriptPose>,
}

/// Button change for one device.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct ButtonUpdate {
    /// Index into [`ScriptFile::devices`].
    pub device: usize,
    pub button: ControllerButton,
}

fn one_frame() -> u32 {
    1
}

/// One segment of the timeline. Poses and buttons are applied on the first
/// frame of the step and then held for `frames` frames.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ScriptStep {
    #[serde(default = "one_frame")]
    pub frames: u32,
    #[serde(default)]
    pub poses: Vec<PoseUpdate>,
    #[serde(default)]
    pub press: Vec<ButtonUpdate>,
    #[serde(default)]
    pub release: Vec<ButtonUpdate>,
    #[serde(default)]
    pub show_ray: Option<bool>,
    #[serde(default)]
    pub policy: Option<SelectorPolicy>,
    /// Move interaction to another renderer by this many places.
    #[serde(default)]
    pub cycle_renderer: Option<i32>,
}

impl ScriptFile {
    /// Read and validate a script file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read script {}", path.display()))?;
        let script = Self::parse(&contents)
            .with_context(|| format!("Invalid script {}", path.display()))?;
        Ok(script)
    }

    pub fn parse(contents: &str) -> Result<Self> {
        let script: ScriptFile = serde_json::from_str(contents)?;
        script.validate()?;
        Ok(script)
    }

    fn validate(&self) -> Result<()> {
        if self.steps.is_empty() {
            anyhow::bail!("script contains no steps");
        }
        let devices = self.devices.len();
        for (index, step) in self.steps.iter().enumerate() {
            let referenced = step
                .poses
                .iter()
                .map(|p| p.device)
                .chain(step.press.iter().map(|b| b.device))
                .chain(step.release.iter().map(|b| b.device));
            for device in referenced {
                if device >= devices {
                    anyhow::bail!(
                        "step {index} refers to device {device} but only {devices} are declared"
                    );
                }
            }
        }
        Ok(())
    }

    /// Frames covered by all steps.
    pub fn total_frames(&self) -> u64 {
        self.steps.iter().map(|s| u64::from(s.frames.max(1))).sum()
    }

    /// Built-in demo: two controllers and two boxes. The right hand sweeps
    /// across the near box, grabs it, swings it aside and lets go.
    pub fn demo() -> Self {
        let controller = |role, x: f32| ScriptDevice {
            class: DeviceClass::Controller,
            role,
            pose: Some(ScriptPose {
                position: [x, 1.2, 0.0],
                ..ScriptPose::default()
            }),
        };
        let prop = |name: &str, position: [f32; 3]| ScriptProp {
            name: name.to_string(),
            position,
            size: unit_size(),
            yaw_degrees: 0.0,
            visible: true,
            pickable: true,
            draggable: true,
            viewport: None,
        };
        let aim = |yaw: f32| PoseUpdate {
            device: 0,
            pose: Some(ScriptPose {
                position: [0.2, 1.2, 0.0],
                yaw_degrees: yaw,
                pitch_degrees: 0.0,
            }),
        };
        let trigger = ButtonUpdate {
            device: 0,
            button: ControllerButton::Primary,
        };

        Self {
            props: vec![
                prop("near-box", [0.2, 1.2, -4.0]),
                prop("far-box", [3.0, 1.2, -12.0]),
            ],
            devices: vec![
                controller(ControllerRole::RightHand, 0.2),
                controller(ControllerRole::LeftHand, -0.2),
            ],
            steps: vec![
                ScriptStep {
                    frames: 10,
                    poses: vec![aim(45.0)],
                    ..ScriptStep::default()
                },
                ScriptStep {
                    frames: 10,
                    poses: vec![aim(0.0)],
                    ..ScriptStep::default()
                },
                ScriptStep {
                    frames: 5,
                    press: vec![trigger],
                    ..ScriptStep::default()
                },
                ScriptStep {
                    frames: 10,
                    poses: vec![aim(30.0)],
                    ..ScriptStep::default()
                },
                ScriptStep {
                    frames: 10,
                    release: vec![trigger],
                    ..ScriptStep::default()
                },
            ],
        }
    }
}

/// Walks a script frame by frame. Past the end the last step is held.
pub struct ScriptPlayer {
    steps: Vec<ScriptStep>,
    index: usize,
    frame_in_step: u32,
    started: bool,
}

/// What to apply on one frame.
pub struct ScriptFrame<'a> {
    pub step: &'a ScriptStep,
    /// True on the first frame of the step; changes are applied only then.
    pub entered: bool,
}

impl ScriptPlayer {
    pub fn new(script: &ScriptFile) -> Self {
        Self {
            steps: script.steps.clone(),
            index: 0,
            frame_in_step: 0,
            started: false,
        }
    }

    pub fn advance(&mut self) -> Option<ScriptFrame<'_>> {
        if self.steps.is_empty() {
            return None;
        }
        if !self.started {
            self.started = true;
            self.frame_in_step = 1;
            return self.steps.first().map(|step| ScriptFrame {
                step,
                entered: true,
            });
        }

        let length = self.steps[self.index].frames.max(1);
        let entered = if self.frame_in_step >= length && self.index + 1 < self.steps.len() {
            self.index += 1;
            self.frame_in_step = 1;
            true
        } else {
            self.frame_in_step = self.frame_in_step.saturating_add(1);
            false
        };
        self.steps.get(self.index).map(|step| ScriptFrame { step, entered })
    }

    /// Whether the last step has run for its full length.
    pub fn finished(&self) -> bool {
        self.started
            && self.index + 1 >= self.steps.len()
            && self
                .steps
                .get(self.index)
                .map_or(true, |step| self.frame_in_step >= step.frames.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_script() {
        let script = ScriptFile::parse(
            r#"{
                "props": [{ "name": "box", "position": [0, 0, -5] }],
                "devices": [{ "role": "right_hand" }],
                "steps": [
                    { "frames": 3, "poses": [{ "device": 0, "pose": { "yaw_degrees": 90 } }] },
                    { "press": [{ "device": 0, "button": "primary" }] }
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(script.props[0].size, [1.0, 1.0, 1.0]);
        assert!(script.props[0].draggable);
        assert_eq!(script.devices[0].class, DeviceClass::Controller);
        assert_eq!(script.total_frames(), 4);
    }

    #[test]
    fn rejects_empty_and_dangling_scripts() {
        assert!(ScriptFile::parse(r#"{ "steps": [] }"#).is_err());
        let err = ScriptFile::parse(
            r#"{ "steps": [{ "press": [{ "device": 2, "button": "secondary" }] }] }"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("refers to device 2"));
    }

    #[test]
    fn yaw_turns_forward_axis() {
        let pose = ScriptPose {
            yaw_degrees: 90.0,
            ..ScriptPose::default()
        }
        .to_pose();
        assert!((pose.forward() - Vec3::NEG_X).length() < 1e-5);
    }

    #[test]
    fn player_enters_each_step_once_then_holds() {
        let script = ScriptFile {
            props: Vec::new(),
            devices: Vec::new(),
            steps: vec![
                ScriptStep {
                    frames: 2,
                    ..ScriptStep::default()
                },
                ScriptStep {
                    frames: 1,
                    show_ray: Some(false),
                    ..ScriptStep::default()
                },
            ],
        };
        let mut player = ScriptPlayer::new(&script);
        let mut entered = Vec::new();
        for _ in 0..5 {
            let frame = player.advance().unwrap();
            entered.push((frame.entered, frame.step.show_ray));
        }
        assert_eq!(
            entered,
            vec![
                (true, None),
                (false, None),
                (true, Some(false)),
                (false, Some(false)),
                (false, Some(false)),
            ]
        );
        assert!(player.finished());
    }

    #[test]
    fn demo_is_valid() {
        let demo = ScriptFile::demo();
        assert!(demo.validate().is_ok());
        assert_eq!(demo.total_frames(), 45);
    }
}
