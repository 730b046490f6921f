use crate::Version;
use serde::Deserialize;

/// How the end of a bone list is found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoneListMode {
    /// Trust the `u32` count in front of the list.
    #[default]
    Counted,
    /// Ignore the count and keep reading bones until the next byte is zero. Some older
    /// readers of this format did this, and it's kept around for files with broken counts.
    Lookahead,
}

/// Settings of the decoder itself. Nothing here changes what a valid file decodes to, except
/// for which files are accepted at all.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DecoderOptions {
    /// Files older than this are rejected with [`crate::DecodeError::UnsupportedVersion`].
    pub minimum_version: Version,
    pub bone_list: BoneListMode,
}

impl Default for DecoderOptions {
    fn default() -> Self {
        Self {
            minimum_version: Version::DEFAULT_MINIMUM,
            bone_list: BoneListMode::Counted,
        }
    }
}

/// Policy applied by [`crate::import_scene`] when handing a decoded document to a
/// [`crate::SceneBuilder`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ImportOptions {
    pub import_models: bool,
    pub import_lights: bool,
    pub import_camera: bool,
    pub import_ground: bool,
    /// Skip items that are hidden in the scene file.
    pub exclude_hidden_models: bool,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            import_models: true,
            import_lights: true,
            import_camera: true,
            import_ground: true,
            exclude_hidden_models: true,
        }
    }
}
