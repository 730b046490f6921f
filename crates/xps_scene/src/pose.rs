//! Minimal armature model for applying decoded bone deltas
//!
//! Hosts with their own skeleton representation can use the functions in
//! [`crate::transform`] directly. This is what the import planner and tests use.

use crate::{
    transform::{bone_location_delta, bone_rotation_delta, bone_scale_delta},
    BoneRecord,
};
use ahash::AHashMap;
use glam::{Quat, Vec3};
use log::trace;

/// Local pose of a bone on top of its bind pose.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BonePose {
    pub location: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for BonePose {
    fn default() -> Self {
        Self {
            location: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PoseBone {
    /// Local rest orientation.
    pub bind: Quat,
    pub pose: BonePose,
}

impl PoseBone {
    pub fn new(bind: Quat) -> Self {
        Self {
            bind,
            pose: BonePose::default(),
        }
    }

    /// Applies a decoded delta. Rotation, location and scale are independent, and any of them
    /// that carries no change leaves the matching pose component untouched.
    pub fn apply(&mut self, delta: &BoneRecord) {
        if let Some(rotation) = bone_rotation_delta(self.bind, delta.rotation) {
            self.pose.rotation = (rotation * self.pose.rotation).normalize();
        }
        if let Some(location) = bone_location_delta(self.bind, delta.location) {
            self.pose.location += location;
        }
        if let Some(scale) = bone_scale_delta(delta.scale) {
            self.pose.scale *= scale;
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Armature {
    pub name: String,
    bones: AHashMap<String, PoseBone>,
}

impl Armature {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bones: AHashMap::new(),
        }
    }

    pub fn add_bone(&mut self, name: impl Into<String>, bind: Quat) {
        self.bones.insert(name.into(), PoseBone::new(bind));
    }

    pub fn bone(&self, name: &str) -> Option<&PoseBone> {
        self.bones.get(name)
    }

    pub fn bone_count(&self) -> usize {
        self.bones.len()
    }

    /// Applies a list of bone deltas, returning how many of them matched a bone. Deltas for
    /// unknown bones are skipped, scenes routinely carry bones a model doesn't have.
    pub fn apply_pose(&mut self, deltas: &[BoneRecord]) -> usize {
        let mut applied = 0;
        for delta in deltas {
            match self.bones.get_mut(&delta.name) {
                Some(bone) => {
                    bone.apply(delta);
                    applied += 1;
                }
                None => trace!(
                    "Armature '{}' has no bone '{}', skipping its pose",
                    self.name,
                    delta.name
                ),
            }
        }
        applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn delta(name: &str, rotation: Vec3, location: Vec3, scale: Vec3) -> BoneRecord {
        BoneRecord {
            name: name.into(),
            rotation,
            location,
            scale,
        }
    }

    #[test]
    fn zero_rotation_keeps_existing_rotation() {
        let mut bone = PoseBone::new(Quat::from_rotation_x(0.3));
        bone.pose.rotation = Quat::from_rotation_y(0.7);
        let before = bone.pose.rotation;

        bone.apply(&delta(
            "arm",
            Vec3::ZERO,
            Vec3::new(0.5, 0.0, 0.0),
            Vec3::new(2.0, 1.0, 1.0),
        ));

        assert_eq!(bone.pose.rotation, before);
        assert_ne!(bone.pose.location, Vec3::ZERO);
        assert_eq!(bone.pose.scale, Vec3::new(2.0, 1.0, 1.0));
    }

    #[test]
    fn all_zero_delta_is_a_noop() {
        let mut bone = PoseBone::new(Quat::from_rotation_z(FRAC_PI_2));
        let before = bone.clone();
        bone.apply(&delta("arm", Vec3::ZERO, Vec3::ZERO, Vec3::ZERO));
        assert_eq!(bone, before);
    }

    #[test]
    fn rotation_composes_with_existing_pose() {
        let mut bone = PoseBone::new(Quat::IDENTITY);
        let step = delta("arm", Vec3::new(10.0, 0.0, 0.0), Vec3::ZERO, Vec3::ONE);
        bone.apply(&step);
        bone.apply(&step);
        let expected = Quat::from_rotation_x(20f32.to_radians());
        assert!(bone.pose.rotation.abs_diff_eq(expected, 1e-5));
    }

    #[test]
    fn scale_axes_are_swapped() {
        let mut bone = PoseBone::new(Quat::IDENTITY);
        bone.apply(&delta("arm", Vec3::ZERO, Vec3::ZERO, Vec3::new(1.0, 2.0, 3.0)));
        assert_eq!(bone.pose.scale, Vec3::new(1.0, 3.0, 2.0));
    }

    #[test]
    fn unknown_bones_are_skipped() {
        let mut armature = Armature::new("lara");
        armature.add_bone("root hips", Quat::IDENTITY);
        let applied = armature.apply_pose(&[
            delta("root hips", Vec3::new(0.0, 5.0, 0.0), Vec3::ZERO, Vec3::ONE),
            delta("tail", Vec3::new(0.0, 5.0, 0.0), Vec3::ZERO, Vec3::ONE),
        ]);
        assert_eq!(applied, 1);
        assert_eq!(armature.bone_count(), 1);
        assert_ne!(
            armature.bone("root hips").unwrap().pose.rotation,
            Quat::IDENTITY
        );
    }
}
