//! Props: the pickable objects of a scene, owned by a [`PropTable`].

use generational_arena::Arena;
use glam::{Quat, Vec3};
use raypoint_core::{Aabb, Pose, PropId};

bitflags::bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    /// Interaction flags of a prop.
    pub struct PropFlags: u8 {
        /// Drawn and considered by pickers.
        const VISIBLE = 0b0000_0001;
        /// May be returned by a pick.
        const PICKABLE = 0b0000_0010;
        /// May be moved or rotated interactively.
        const DRAGGABLE = 0b0000_0100;
    }
}

impl Default for PropFlags {
    fn default() -> Self {
        PropFlags::VISIBLE | PropFlags::PICKABLE | PropFlags::DRAGGABLE
    }
}

/// A scene object with a pose, a uniform-per-axis scale and local bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct Prop {
    /// Display name used in logs.
    pub name: String,
    /// World position of the prop origin.
    pub position: Vec3,
    /// World orientation.
    pub orientation: Quat,
    /// Per-axis scale applied before rotation.
    pub scale: Vec3,
    /// Bounds in the prop's local frame.
    pub bounds: Aabb,
    /// Interaction flags.
    pub flags: PropFlags,
}

impl Prop {
    /// Unit-cube prop at `position` with default flags.
    pub fn new(name: impl Into<String>, position: Vec3) -> Self {
        Self {
            name: name.into(),
            position,
            orientation: Quat::IDENTITY,
            scale: Vec3::ONE,
            bounds: Aabb::unit(),
            flags: PropFlags::default(),
        }
    }

    /// Replace the local bounds.
    pub fn with_bounds(mut self, bounds: Aabb) -> Self {
        self.bounds = bounds;
        self
    }

    /// Replace the flags.
    pub fn with_flags(mut self, flags: PropFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Replace the orientation.
    pub fn with_orientation(mut self, orientation: Quat) -> Self {
        self.orientation = orientation.normalize();
        self
    }

    /// Replace the scale.
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Whether the prop is drawn.
    pub fn is_visible(&self) -> bool {
        self.flags.contains(PropFlags::VISIBLE)
    }

    /// Whether pickers may return this prop.
    pub fn is_pickable(&self) -> bool {
        self.flags.contains(PropFlags::VISIBLE | PropFlags::PICKABLE)
    }

    /// Whether the prop may be manipulated.
    pub fn is_draggable(&self) -> bool {
        self.flags.contains(PropFlags::DRAGGABLE)
    }

    /// Pose of the prop origin.
    pub fn pose(&self) -> Pose {
        Pose::new(self.position, self.orientation)
    }

    /// Set position and orientation together.
    pub fn set_pose(&mut self, pose: Pose) {
        self.position = pose.position;
        self.orientation = pose.orientation.normalize();
    }

    /// Map a world-space point into the prop's local frame.
    pub fn world_to_local(&self, point: Vec3) -> Vec3 {
        let unrotated = self.orientation.inverse() * (point - self.position);
        unrotated / self.safe_scale()
    }

    /// Map a world-space direction into the prop's local frame (not normalized).
    pub fn world_dir_to_local(&self, dir: Vec3) -> Vec3 {
        (self.orientation.inverse() * dir) / self.safe_scale()
    }

    /// World-space bounds enclosing the rotated and scaled local bounds.
    pub fn world_bounds(&self) -> Aabb {
        let center = self.position + self.orientation * (self.bounds.center() * self.scale);
        let half = self.bounds.size() * self.scale.abs() * 0.5;
        let axes = [
            self.orientation * Vec3::X,
            self.orientation * Vec3::Y,
            self.orientation * Vec3::Z,
        ];
        let extent = axes[0].abs() * half.x + axes[1].abs() * half.y + axes[2].abs() * half.z;
        Aabb::new(center - extent, center + extent)
    }

    fn safe_scale(&self) -> Vec3 {
        Vec3::select(self.scale.abs().cmplt(Vec3::splat(1e-6)), Vec3::splat(1e-6), self.scale)
    }
}

/// Owner of all props. Hands out generation-checked [`PropId`] handles.
#[derive(Default)]
pub struct PropTable {
    props: Arena<Prop>,
}

impl PropTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a prop and return its handle.
    pub fn insert(&mut self, prop: Prop) -> PropId {
        PropId::from(self.props.insert(prop))
    }

    /// Remove a prop. Outstanding handles to it stop resolving.
    pub fn remove(&mut self, id: PropId) -> Option<Prop> {
        self.props.remove(id.index())
    }

    /// Resolve a handle.
    pub fn get(&self, id: PropId) -> Option<&Prop> {
        self.props.get(id.index())
    }

    /// Resolve a handle mutably.
    pub fn get_mut(&mut self, id: PropId) -> Option<&mut Prop> {
        self.props.get_mut(id.index())
    }

    /// Whether `id` still resolves.
    pub fn contains(&self, id: PropId) -> bool {
        self.props.contains(id.index())
    }

    /// Iterate live props with their handles, in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (PropId, &Prop)> {
        self.props.iter().map(|(index, prop)| (PropId::from(index), prop))
    }

    /// Handles of every live prop, in slot order.
    pub fn ids(&self) -> Vec<PropId> {
        self.iter().map(|(id, _)| id).collect()
    }

    /// Number of live props.
    pub fn len(&self) -> usize {
        self.props.len()
    }

    /// Whether the table holds no props.
    pub fn is_empty(&self) -> bool {
        self.props.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_4;

    #[test]
    fn removed_handles_do_not_alias_new_props() {
        let mut table = PropTable::new();
        let a = table.insert(Prop::new("a", Vec3::ZERO));
        assert!(table.remove(a).is_some());
        let b = table.insert(Prop::new("b", Vec3::X));

        assert_eq!(a.slot(), b.slot());
        assert_ne!(a.generation(), b.generation());
        assert!(table.get(a).is_none());
        assert_eq!(table.get(b).map(|p| p.name.as_str()), Some("b"));
        assert!(table.remove(a).is_none());
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn default_flags_allow_everything() {
        let prop = Prop::new("box", Vec3::ZERO);
        assert!(prop.is_visible());
        assert!(prop.is_pickable());
        assert!(prop.is_draggable());

        let hidden = prop.clone().with_flags(PropFlags::PICKABLE);
        assert!(!hidden.is_pickable());
        assert!(!hidden.is_draggable());
    }

    #[test]
    fn local_frame_round_trip() {
        let prop = Prop::new("box", Vec3::new(1.0, 2.0, 3.0))
            .with_orientation(Quat::from_rotation_z(FRAC_PI_4))
            .with_scale(Vec3::new(2.0, 1.0, 1.0));
        let local = prop.world_to_local(prop.position);
        assert!(local.length() < 1e-6);

        let world = prop.position + prop.orientation * Vec3::new(2.0, 0.0, 0.0);
        let local = prop.world_to_local(world);
        assert!((local - Vec3::X).length() < 1e-5);
    }

    #[test]
    fn world_bounds_grow_under_rotation() {
        let prop = Prop::new("box", Vec3::ZERO).with_orientation(Quat::from_rotation_y(FRAC_PI_4));
        let bounds = prop.world_bounds();
        let expected = std::f32::consts::SQRT_2 * 0.5;
        assert!((bounds.max.x - expected).abs() < 1e-5);
        assert!((bounds.max.y - 0.5).abs() < 1e-5);
    }
}
