//! Conversions from the tool's coordinate space into a right-handed, Z-up target space
//!
//! The tool is Y-up. Most vectors get re-expressed with a fixed 90° rotation around X, which
//! boils down to the axis swap `(x, y, z) -> (x, -z, y)`. Scales swap axes without the sign flip.
//!
//! Bone rotations are Euler angles in degrees, applied by the tool in Y, X, Z order.

use crate::{CameraRecord, ItemRecord, LightRecord};
use glam::{Mat3, Quat, Vec3};
use std::f32::consts::FRAC_PI_2;
use xps_utils::math::{AngleExt, Radians};

/// Rotation (degrees) taking tool space directions into the target space.
pub const TOOL_TO_TARGET_ROTATION: Vec3 = Vec3::new(90.0, 0.0, 0.0);

/// Distance of a point light from its controller, along the negated light direction.
pub const LIGHT_DISTANCE: f32 = 3.0;
/// Height of a light controller above the scene origin.
pub const LIGHT_CONTROLLER_HEIGHT: f32 = 1.0;
/// Light energy per unit of tool intensity.
pub const LIGHT_ENERGY_FACTOR: f32 = 2.4;

/// Rotates the vector by `Rx · Ry · Rz` built from the given angles in degrees.
pub fn rotate(vector: Vec3, rotation_degrees: Vec3) -> Vec3 {
    let x = rotation_degrees.x.degrees().to_radians();
    let y = rotation_degrees.y.degrees().to_radians();
    let z = rotation_degrees.z.degrees().to_radians();
    let matrix = Mat3::from_rotation_x(x) * Mat3::from_rotation_y(y) * Mat3::from_rotation_z(z);
    matrix * vector
}

/// Re-expresses a tool space direction or position in the target space.
#[inline]
pub fn tool_to_target(vector: Vec3) -> Vec3 {
    rotate(vector, TOOL_TO_TARGET_ROTATION)
}

/// `(x, y, z) -> (x, -z, y)`
#[inline]
pub fn swap_location(v: Vec3) -> Vec3 {
    Vec3::new(v.x, -v.z, v.y)
}

/// `(x, y, z) -> (x, z, y)`
#[inline]
pub fn swap_scale(v: Vec3) -> Vec3 {
    Vec3::new(v.x, v.z, v.y)
}

/// Builds the orientation for tool Euler angles (degrees, already axis swapped), applying Y
/// first, then X, then Z.
pub fn yxz_euler_to_quat(degrees: Vec3) -> Quat {
    let x = degrees.x.degrees().to_radians();
    let y = degrees.y.degrees().to_radians();
    let z = degrees.z.degrees().to_radians();
    Quat::from_rotation_z(z) * Quat::from_rotation_x(x) * Quat::from_rotation_y(y)
}

/// Rotation delta of a bone, expressed relative to its bind orientation:
/// `bind⁻¹ · delta · bind`. `None` for an all-zero rotation.
pub fn bone_rotation_delta(bind: Quat, rotation_degrees: Vec3) -> Option<Quat> {
    if rotation_degrees == Vec3::ZERO {
        return None;
    }
    let delta = yxz_euler_to_quat(swap_location(rotation_degrees));
    Some((bind.inverse() * delta * bind).normalize())
}

/// Translation delta of a bone in its local space. `None` for an all-zero location.
pub fn bone_location_delta(bind: Quat, location: Vec3) -> Option<Vec3> {
    if location == Vec3::ZERO {
        return None;
    }
    Some(bind.inverse() * swap_location(location))
}

/// Multiplicative scale delta of a bone. `None` for identity and all-zero scales, as neither
/// changes anything in the tool.
pub fn bone_scale_delta(scale: Vec3) -> Option<Vec3> {
    if scale == Vec3::ONE || scale == Vec3::ZERO {
        return None;
    }
    Some(swap_scale(scale))
}

/// Placement of a whole item in the target space. Bone poses are local to this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemTransform {
    pub location: Vec3,
    pub scale: Vec3,
}

impl From<&ItemRecord> for ItemTransform {
    fn from(item: &ItemRecord) -> Self {
        Self {
            location: swap_location(item.location),
            scale: swap_scale(item.scale),
        }
    }
}

/// The tool's orbit camera, rebuilt as a controller at the target with the camera parented
/// to it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPlacement {
    /// Controller location.
    pub target: Vec3,
    /// Controller Euler rotation in radians, XYZ order.
    pub controller_rotation: Vec3,
    /// Camera offset along the controller's local Z axis.
    pub distance: f32,
    pub angle: Radians,
}

impl From<&CameraRecord> for CameraPlacement {
    fn from(camera: &CameraRecord) -> Self {
        Self {
            target: tool_to_target(camera.target),
            controller_rotation: Vec3::new(
                FRAC_PI_2 - camera.rotation_vertical,
                0.0,
                camera.rotation_horizontal,
            ),
            distance: camera.distance,
            angle: camera.effective_angle(),
        }
    }
}

/// A tool light, rebuilt as a point light orbiting a controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightPlacement {
    pub direction: Vec3,
    /// Controller location.
    pub controller: Vec3,
    /// Light location relative to its controller.
    pub location: Vec3,
    pub energy: f32,
    pub color: [f32; 3],
}

impl From<&LightRecord> for LightPlacement {
    fn from(light: &LightRecord) -> Self {
        let direction = tool_to_target(light.direction);
        Self {
            direction,
            controller: Vec3::new(0.0, 0.0, LIGHT_CONTROLLER_HEIGHT),
            location: -direction * LIGHT_DISTANCE,
            energy: light.intensity * LIGHT_ENERGY_FACTOR,
            color: light.color.to_normalized(),
        }
    }
}
