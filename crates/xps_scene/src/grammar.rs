//! Version gated layout of a scene file
//!
//! The file has no tags, offsets or chunk sizes. Every block is a flat run of fields and the only
//! thing deciding whether a field exists is the format version from the header. Instead of
//! spreading `if version >= ...` checks through the decoder, each block's layout is written down
//! here as an ordered table of [`FieldSpec`]s. The decoder walks [`active`] fields in order and
//! reads whatever each one stands for.
//!
//! Supporting a new format version should only ever mean adding or re-gating rows.
//!
//! ```text
//! Header(major u16, minor u16)
//! Items(count u32, Item[count])
//! Camera
//! Lights(reserved[4], Light[3])
//! PostProcessing    >= 1.9
//! Background
//! SkyDome           >= 1.6
//! Window            >= 1.7
//! ```

use crate::Version;

const V1_1: Version = Version::new(1, 1);
const V1_2: Version = Version::new(1, 2);
const V1_6: Version = Version::new(1, 6);
const V1_7: Version = Version::new(1, 7);
const V1_8: Version = Version::new(1, 8);
const V1_9: Version = Version::new(1, 9);
const V1_11: Version = Version::new(1, 11);
const V1_21: Version = Version::new(1, 21);
const V1_30: Version = Version::new(1, 30);

/// Predicate over the file version deciding whether a field is present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    Always,
    /// Present from this version on (inclusive).
    Since(Version),
    /// Present only in versions strictly newer than this one.
    After(Version),
    /// Present only in versions strictly older than this one.
    Before(Version),
}

impl Gate {
    pub const fn admits(self, version: Version) -> bool {
        // `Ord` isn't usable in const fns, hence the manual comparisons
        const fn less(a: Version, b: Version) -> bool {
            a.major < b.major || (a.major == b.major && a.minor < b.minor)
        }

        match self {
            Gate::Always => true,
            Gate::Since(v) => !less(version, v),
            Gate::After(v) => less(v, version),
            Gate::Before(v) => less(version, v),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec<F> {
    pub field: F,
    pub gate: Gate,
}

impl<F> FieldSpec<F> {
    pub const fn always(field: F) -> Self {
        Self {
            field,
            gate: Gate::Always,
        }
    }

    pub const fn gated(field: F, gate: Gate) -> Self {
        Self { field, gate }
    }
}

/// Iterates over the fields of a layout that exist in the given version, in file order.
pub fn active<F: Copy>(
    layout: &'static [FieldSpec<F>],
    version: Version,
) -> impl Iterator<Item = F> {
    layout
        .iter()
        .filter(move |spec| spec.gate.admits(version))
        .map(|spec| spec.field)
}

/// Top level blocks following the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Block {
    Items,
    Camera,
    Lights,
    PostProcessing,
    Background,
    SkyDome,
    Window,
}

pub const SCENE_LAYOUT: &[FieldSpec<Block>] = &[
    FieldSpec::always(Block::Items),
    FieldSpec::always(Block::Camera),
    FieldSpec::always(Block::Lights),
    FieldSpec::gated(Block::PostProcessing, Gate::Since(V1_9)),
    FieldSpec::always(Block::Background),
    FieldSpec::gated(Block::SkyDome, Gate::Since(V1_6)),
    FieldSpec::gated(Block::Window, Gate::Since(V1_7)),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemField {
    Name,
    Path,
    Visibility,
    /// Three floats, one per axis.
    Scale,
    /// A single float used for all three axes.
    UniformScale,
    Bones,
    Location,
    Accessories,
    SecondaryAccessories,
    GlowColors,
}

pub const ITEM_LAYOUT: &[FieldSpec<ItemField>] = &[
    FieldSpec::always(ItemField::Name),
    FieldSpec::always(ItemField::Path),
    FieldSpec::always(ItemField::Visibility),
    FieldSpec::gated(ItemField::Scale, Gate::Since(V1_8)),
    FieldSpec::gated(ItemField::UniformScale, Gate::Before(V1_8)),
    FieldSpec::always(ItemField::Bones),
    FieldSpec::always(ItemField::Location),
    FieldSpec::always(ItemField::Accessories),
    FieldSpec::always(ItemField::SecondaryAccessories),
    FieldSpec::gated(ItemField::GlowColors, Gate::Since(V1_11)),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoneField {
    Name,
    Rotation,
    Location,
    Scale,
}

pub const BONE_LAYOUT: &[FieldSpec<BoneField>] = &[
    FieldSpec::always(BoneField::Name),
    FieldSpec::always(BoneField::Rotation),
    FieldSpec::always(BoneField::Location),
    FieldSpec::always(BoneField::Scale),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraField {
    Fov,
    Target,
    Distance,
    RotationHorizontal,
    RotationVertical,
}

pub const CAMERA_LAYOUT: &[FieldSpec<CameraField>] = &[
    FieldSpec::always(CameraField::Fov),
    FieldSpec::always(CameraField::Target),
    FieldSpec::always(CameraField::Distance),
    FieldSpec::always(CameraField::RotationHorizontal),
    FieldSpec::always(CameraField::RotationVertical),
];

/// Number of lights in every scene file.
pub const LIGHT_COUNT: usize = 3;
/// Reserved bytes in front of the first light.
pub const LIGHTS_RESERVED: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightField {
    /// Unknown single byte in front of every light except the first one.
    Marker,
    Direction,
    Intensity,
    Color,
    ShadowDepth,
}

pub const LIGHT_LAYOUT: &[FieldSpec<LightField>] = &[
    FieldSpec::gated(LightField::Marker, Gate::Since(V1_30)),
    FieldSpec::always(LightField::Direction),
    FieldSpec::gated(LightField::Intensity, Gate::Since(V1_2)),
    FieldSpec::always(LightField::Color),
    FieldSpec::always(LightField::ShadowDepth),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostProcessingField {
    Enabled,
    Brightness,
    Gamma,
    Contrast,
    Saturation,
    /// Reserved bytes, skipped without interpretation.
    Padding(usize),
}

pub const POST_PROCESSING_LAYOUT: &[FieldSpec<PostProcessingField>] = &[
    FieldSpec::gated(PostProcessingField::Enabled, Gate::After(V1_21)),
    FieldSpec::always(PostProcessingField::Brightness),
    FieldSpec::always(PostProcessingField::Gamma),
    FieldSpec::always(PostProcessingField::Contrast),
    FieldSpec::always(PostProcessingField::Saturation),
    FieldSpec::always(PostProcessingField::Padding(1)),
    FieldSpec::gated(PostProcessingField::Padding(4), Gate::After(V1_21)),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackgroundField {
    GroundVisible,
    GroundTexture,
    Color,
    Texture,
    TextureType,
    HudTexture,
}

pub const BACKGROUND_LAYOUT: &[FieldSpec<BackgroundField>] = &[
    FieldSpec::always(BackgroundField::GroundVisible),
    FieldSpec::always(BackgroundField::GroundTexture),
    FieldSpec::gated(BackgroundField::Color, Gate::Since(V1_1)),
    FieldSpec::always(BackgroundField::Texture),
    FieldSpec::gated(BackgroundField::TextureType, Gate::After(V1_21)),
    FieldSpec::gated(BackgroundField::HudTexture, Gate::After(V1_21)),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkyDomeField {
    Display,
    Kind,
    Rotation,
    Elevation,
}

pub const SKY_DOME_LAYOUT: &[FieldSpec<SkyDomeField>] = &[
    FieldSpec::always(SkyDomeField::Display),
    FieldSpec::always(SkyDomeField::Kind),
    FieldSpec::always(SkyDomeField::Rotation),
    FieldSpec::always(SkyDomeField::Elevation),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowField {
    Maximized,
    Width,
    Height,
}

pub const WINDOW_LAYOUT: &[FieldSpec<WindowField>] = &[
    FieldSpec::always(WindowField::Maximized),
    FieldSpec::always(WindowField::Width),
    FieldSpec::always(WindowField::Height),
];
