//! Pointer behaviour driven through the render loop, frame by frame.

use glam::{Quat, Vec3};
use raypoint_core::Pose;
use raypoint_interaction::{
    ControllerButton, ControllerEvent, InteractionState, LengthSource, PointerSettings,
    PointerStyle, POINTER_HOOK_NAME,
};
use raypoint_scene::{FrameContext, FrameError, HookPtr, RenderLoop};
use raypoint_testkit::{assert_frame_trace, PointerRig, TraceSnapshotConfig};
use raypoint_tracking::{ControllerRole, SelectorPolicy};
use serde::Serialize;
use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

fn pointer_loop(settings: PointerSettings) -> (Rc<RefCell<PointerStyle>>, RenderLoop) {
    let style = Rc::new(RefCell::new(PointerStyle::new(settings)));
    let mut render_loop = RenderLoop::new();
    let hook: HookPtr = style.clone();
    render_loop.register(hook, 0);
    (style, render_loop)
}

fn send(rig: &mut PointerRig, style: &Rc<RefCell<PointerStyle>>, event: ControllerEvent) -> bool {
    let mut ctx = FrameContext {
        frame: raypoint_core::FrameNumber::ZERO,
        window: &mut rig.window,
        props: &mut rig.props,
        tracker: Some(&rig.tracker),
    };
    style
        .borrow_mut()
        .handle_event(&event, &mut ctx)
        .expect("context is complete")
}

#[test]
fn right_hand_drives_the_ray_under_role_priority() {
    let mut rig = PointerRig::new();
    let (style, mut render_loop) = pointer_loop(PointerSettings::default());

    let report = rig.render(&mut render_loop);
    assert!(report.failures.is_empty());

    assert!(rig.shows_ray(rig.right));
    assert!(!rig.shows_ray(rig.left));
    assert_eq!(style.borrow().active_device(), Some(rig.right));
    assert_eq!(rig.ray_length(rig.right), Some(1000.0));
}

#[test]
fn last_right_hand_wins() {
    let mut rig = PointerRig::new();
    let second_right = rig
        .tracker
        .add_controller(ControllerRole::RightHand, Some(Pose::IDENTITY))
        .unwrap();
    let (style, mut render_loop) = pointer_loop(PointerSettings::default());

    rig.render(&mut render_loop);
    assert_eq!(style.borrow().active_device(), Some(second_right));
    assert!(rig.shows_ray(rig.right));
    assert!(rig.shows_ray(second_right));
}

#[test]
fn first_valid_role_picks_lowest_slot_and_leaves_others() {
    let mut rig = PointerRig::new();
    rig.tracker.set_role(rig.right, ControllerRole::Invalid).unwrap();
    let (style, mut render_loop) = pointer_loop(PointerSettings {
        selector_policy: SelectorPolicy::FirstValidRole,
        show_ray: true,
    });

    rig.render(&mut render_loop);
    assert_eq!(style.borrow().active_device(), Some(rig.left));
    assert!(rig.shows_ray(rig.left));
    // No model was ever created for the skipped controller.
    assert!(rig.window.device_models().get(rig.right).is_none());
}

#[test]
fn ray_shortens_to_hit_and_tracks_motion() {
    let mut rig = PointerRig::new();
    rig.add_cube("near", Vec3::new(0.0, 0.0, -5.5));
    let (style, mut render_loop) = pointer_loop(PointerSettings::default());

    rig.render(&mut render_loop);
    let length = rig.ray_length(rig.right).unwrap();
    assert!((length - 5.0).abs() < 1e-4);
    assert_eq!(
        style.borrow().last_resolution().map(|r| r.source),
        Some(LengthSource::Hit)
    );

    // Point away: the ray reaches the far clip again.
    rig.set_pose(rig.right, Some(Pose::new(Vec3::ZERO, Quat::from_rotation_y(1.0))));
    rig.render(&mut render_loop);
    assert_eq!(rig.ray_length(rig.right), Some(1000.0));
}

#[test]
fn missing_tracker_skips_frame_and_recovers() {
    let mut rig = PointerRig::new();
    let (style, mut render_loop) = pointer_loop(PointerSettings::default());

    let report = rig.render_without_tracker(&mut render_loop);
    assert_eq!(
        report.failures,
        vec![(POINTER_HOOK_NAME.to_string(), FrameError::MissingTracker)]
    );
    assert!(style.borrow().last_resolution().is_none());

    let report = rig.render(&mut render_loop);
    assert!(report.failures.is_empty());
    assert_eq!(rig.ray_length(rig.right), Some(1000.0));
}

#[test]
fn drag_keeps_ray_anchored_to_target() {
    let mut rig = PointerRig::new();
    let cube = rig.add_cube("cube", Vec3::new(0.0, 0.0, -5.0));
    let (style, mut render_loop) = pointer_loop(PointerSettings::default());
    let right = rig.right;

    let press = ControllerEvent::Press {
        device: right,
        button: ControllerButton::Primary,
    };
    assert!(send(&mut rig, &style, press));
    assert_eq!(style.borrow().state(), InteractionState::Rotate);
    assert_eq!(style.borrow().current_target(), Some(cube));

    // Swing a quarter turn to the left; the cube follows to (-5, 0, 0).
    rig.set_pose(right, Some(Pose::new(Vec3::ZERO, Quat::from_rotation_y(std::f32::consts::FRAC_PI_2))));
    assert!(send(&mut rig, &style, ControllerEvent::Move { device: right }));
    let position = rig.props.get(cube).unwrap().position;
    assert!((position - Vec3::new(-5.0, 0.0, 0.0)).length() < 1e-4);

    // Hide the cube from picking: the ray falls back to the target distance.
    rig.props.get_mut(cube).unwrap().flags = raypoint_scene::PropFlags::VISIBLE
        | raypoint_scene::PropFlags::DRAGGABLE;
    rig.render(&mut render_loop);
    let resolution = style.borrow().last_resolution().unwrap();
    assert_eq!(resolution.source, LengthSource::Target);
    assert!((resolution.length - 5.0).abs() < 1e-4);

    let release = ControllerEvent::Release {
        device: right,
        button: ControllerButton::Primary,
    };
    assert!(send(&mut rig, &style, release));
    rig.render(&mut render_loop);
    assert_eq!(style.borrow().current_target(), None);
    assert_eq!(rig.ray_length(right), Some(1000.0));
}

#[derive(Serialize)]
struct SweepFrame {
    length_cm: Option<i64>,
    show_ray: bool,
    source: Option<&'static str>,
}

#[test]
fn sweeping_controller_trace() {
    let mut rig = PointerRig::new();
    rig.add_cube("ahead", Vec3::new(0.0, 0.0, -3.5));
    let (style, render_loop) = pointer_loop(PointerSettings::default());
    let observed = style.clone();

    // Turn 2 degrees per frame. The front face at z = -3 is hit at 3 / cos(yaw)
    // until its edge passes the ray near 9.5 degrees.
    let config = TraceSnapshotConfig {
        name: "sweep".into(),
        frames: 6,
        snapshot_path: Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/golden/sweep_trace.json"),
    };
    assert_frame_trace(
        config,
        (rig, render_loop),
        |frame, (rig, render_loop)| {
            let yaw = (frame.0 as f32 * 2.0).to_radians();
            rig.set_pose(rig.right, Some(Pose::new(Vec3::ZERO, Quat::from_rotation_y(yaw))));
            rig.render(render_loop);
        },
        |_, (rig, _)| SweepFrame {
            length_cm: rig.ray_length(rig.right).map(|l| (l * 100.0).round() as i64),
            show_ray: rig.shows_ray(rig.right),
            source: observed.borrow().last_resolution().map(|r| r.source.as_str()),
        },
    )
    .unwrap();
    assert_eq!(style.borrow().length(), 1000.0);
}
