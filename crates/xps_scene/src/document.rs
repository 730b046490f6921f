//! Decoded scene file contents
//!
//! Everything here mirrors what's on disk, in the source tool's coordinate space. Conversions
//! into the target space live in [`crate::transform`].

use crate::{grammar::LIGHT_COUNT, Version, Warnings};
use glam::Vec3;
use serde::Serialize;
use xps_utils::{color::RGB8, math::Radians};

/// Width or height above which a window resolution is considered a sign of misaligned decoding.
pub const MAX_WINDOW_DIMENSION: u32 = 10000;

/// Size of a single field of view "angle step", in radians.
pub const FOV_ANGLE_UNIT: f64 = 0.0872664600610733 / 5.0;

/// Texture path the reference tool writes for the ground, which doesn't exist as a file.
pub const PLACEHOLDER_GROUND_TEXTURE: &str = "data/ground.png";
/// Directory of the built-in floor model, used in place of [`PLACEHOLDER_GROUND_TEXTURE`].
pub const BUILTIN_GROUND_MODEL_DIR: &str = "data\\Floor\\Floor";
/// File name of the built-in floor model.
pub const BUILTIN_GROUND_MODEL_FILE: &str = "generic_item";

/// Splits a backslash separated tool path into its non-empty segments.
pub fn split_tool_path(path: &str) -> impl Iterator<Item = &str> {
    path.split('\\').filter(|segment| !segment.is_empty())
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SceneDocument {
    pub version: Version,
    pub items: Vec<ItemRecord>,
    pub camera: CameraRecord,
    pub lights: [LightRecord; LIGHT_COUNT],
    pub post_processing: Option<PostProcessingRecord>,
    pub background: BackgroundRecord,
    pub sky_dome: Option<SkyDomeRecord>,
    pub window: Option<WindowRecord>,
    /// Recoverable problems found while decoding.
    pub warnings: Warnings,
}

impl SceneDocument {
    /// Returns lights paired with their 1-based index, as the tool numbers them.
    pub fn numbered_lights(&self) -> impl Iterator<Item = (u8, &LightRecord)> {
        self.lights
            .iter()
            .zip(1u8..)
            .map(|(light, index)| (index, light))
    }
}

/// A placed character or object.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ItemRecord {
    /// Model name, usually the mesh file name without extension.
    pub name: String,
    /// Backslash separated model directory, as the tool saw it. Not a host path.
    pub path: String,
    pub visible: bool,
    pub scale: Vec3,
    pub bones: Vec<BoneRecord>,
    pub location: Vec3,
    pub accessories: Vec<AccessoryRecord>,
    pub secondary_accessories: Vec<AccessoryRecord>,
    /// Present since 1.11.
    pub glow_colors: Option<[f32; 6]>,
}

impl ItemRecord {
    /// Splits [`Self::path`] into its segments.
    ///
    /// ## Example
    /// ```
    /// # use xps_scene::ItemRecord;
    /// let item = ItemRecord { path: "data\\Lara\\Outfit\\".into(), ..Default::default() };
    /// assert_eq!(item.path_segments().collect::<Vec<_>>(), ["data", "Lara", "Outfit"]);
    /// assert_eq!(item.folder_name(), Some("Outfit"));
    /// ```
    pub fn path_segments(&self) -> impl Iterator<Item = &str> {
        split_tool_path(&self.path)
    }

    /// Last segment of the path, the model's own folder.
    pub fn folder_name(&self) -> Option<&str> {
        self.path_segments().last()
    }
}

/// Pose delta of a single bone. All components are rounded to 4 decimal places.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct BoneRecord {
    pub name: String,
    /// Euler angles in degrees, in the tool's own axis convention.
    pub rotation: Vec3,
    pub location: Vec3,
    pub scale: Vec3,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct AccessoryRecord {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct CameraRecord {
    /// Field of view in the tool's internal unit, see [`FOV_ANGLE_UNIT`].
    pub fov: f32,
    pub target: Vec3,
    pub distance: f32,
    /// Radians
    pub rotation_horizontal: f32,
    /// Radians
    pub rotation_vertical: f32,
}

impl CameraRecord {
    /// Number of whole angle steps in the stored field of view, truncated like the tool does.
    /// An `f32` meant to hold an exact multiple of [`FOV_ANGLE_UNIT`] may land just below it
    /// and lose a step.
    pub fn fov_angle_steps(&self) -> i64 {
        (self.fov as f64 / FOV_ANGLE_UNIT).floor() as i64
    }

    /// The field of view as the tool displays it: every angle step counts as one degree.
    pub fn effective_angle(&self) -> Radians {
        Radians::from_degrees(self.fov_angle_steps() as f32)
    }

    /// Focal length matching [`Self::effective_angle`] for a sensor of the given width.
    pub fn focal_length(&self, sensor_width: f32) -> f32 {
        sensor_width / 2.0 / (self.effective_angle().to_radians() / 2.0).tan()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LightRecord {
    /// Rounded to 6 decimal places.
    pub direction: Vec3,
    /// Rounded to 2 decimal places, 1.0 in files older than 1.2.
    pub intensity: f32,
    pub color: RGB8,
    /// Rounded to 2 decimal places.
    pub shadow_depth: f32,
}

impl Default for LightRecord {
    fn default() -> Self {
        Self {
            direction: Vec3::ZERO,
            intensity: 1.0,
            color: RGB8::WHITE,
            shadow_depth: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct PostProcessingRecord {
    /// Only stored in files newer than 1.21.
    pub enabled: Option<bool>,
    pub brightness: f32,
    pub gamma: f32,
    pub contrast: f32,
    pub saturation: f32,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct BackgroundRecord {
    pub ground_visible: bool,
    /// Kept verbatim, see [`PLACEHOLDER_GROUND_TEXTURE`].
    pub ground_texture_path: String,
    /// Present since 1.1.
    pub color: Option<RGB8>,
    pub texture_path: String,
    /// Only stored in files newer than 1.21.
    pub texture_type: Option<String>,
    /// Only stored in files newer than 1.21.
    pub hud_texture_path: Option<String>,
}

impl BackgroundRecord {
    /// Whether the ground texture is the placeholder that stands for the built-in floor model.
    pub fn uses_builtin_ground(&self) -> bool {
        self.ground_texture_path.is_empty()
            || self
                .ground_texture_path
                .eq_ignore_ascii_case(PLACEHOLDER_GROUND_TEXTURE)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SkyDomeRecord {
    pub display: bool,
    pub kind: String,
    pub rotation: f32,
    pub elevation: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct WindowRecord {
    pub maximized: bool,
    pub width: u32,
    pub height: u32,
}

impl WindowRecord {
    /// Whether the resolution is believable. Huge values mean the decoder lost track of the
    /// layout somewhere earlier in the file.
    pub fn is_plausible(&self) -> bool {
        self.width <= MAX_WINDOW_DIMENSION && self.height <= MAX_WINDOW_DIMENSION
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fov_quantization() {
        let camera = CameraRecord {
            fov: (5.0 * FOV_ANGLE_UNIT) as f32,
            ..Default::default()
        };
        assert_eq!(camera.fov_angle_steps(), 5);
        assert!((camera.effective_angle().to_degrees() - 5.0).abs() < 1e-4);

        let camera = CameraRecord {
            fov: (5.5 * FOV_ANGLE_UNIT) as f32,
            ..Default::default()
        };
        assert_eq!(camera.fov_angle_steps(), 5);
    }

    #[test]
    fn fov_steps_are_truncated() {
        // Stored as an f32 a hair below 3 steps
        let camera = CameraRecord {
            fov: (3.0 * FOV_ANGLE_UNIT) as f32,
            ..Default::default()
        };
        assert_eq!(camera.fov_angle_steps(), 2);

        let camera = CameraRecord {
            fov: (90.0 * FOV_ANGLE_UNIT) as f32,
            ..Default::default()
        };
        assert_eq!(camera.fov_angle_steps(), 89);
    }

    #[test]
    fn focal_length_of_a_right_angle() {
        let camera = CameraRecord {
            fov: (90.5 * FOV_ANGLE_UNIT) as f32,
            ..Default::default()
        };
        assert_eq!(camera.fov_angle_steps(), 90);
        // tan(45 deg) == 1, so the focal length is half the sensor
        assert!((camera.focal_length(36.0) - 18.0).abs() < 1e-3);
    }

    #[test]
    fn window_plausibility() {
        let ok = WindowRecord {
            maximized: false,
            width: 800,
            height: 600,
        };
        assert!(ok.is_plausible());
        assert!(!WindowRecord { width: 50000, ..ok }.is_plausible());
        assert!(!WindowRecord { height: 10001, ..ok }.is_plausible());
    }

    #[test]
    fn ground_placeholder() {
        let mut background = BackgroundRecord {
            ground_texture_path: "data/ground.png".into(),
            ..Default::default()
        };
        assert!(background.uses_builtin_ground());
        background.ground_texture_path = "custom\\floor.png".into();
        assert!(!background.uses_builtin_ground());
    }

    #[test]
    fn lights_are_numbered_from_one() {
        let document = SceneDocument::default();
        let indices: Vec<u8> = document.numbered_lights().map(|(i, _)| i).collect();
        assert_eq!(indices, [1, 2, 3]);
    }
}
