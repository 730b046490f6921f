//! Scene file decoder
//!
//! A single linear pass over the file. The layout of every block comes from
//! [`crate::grammar`], the decoder only knows how to read each kind of field.

use crate::{
    grammar::{self, *},
    AccessoryRecord, BackgroundRecord, BoneListMode, BoneRecord, CameraRecord, DataQualityWarning,
    DecodeError, DecoderOptions, ItemRecord, LightRecord, PostProcessingRecord, SceneDocument,
    SkyDomeRecord, Version, WindowRecord,
};
use byteorder::LE;
use glam::Vec3;
use log::{debug, info, trace};
use xps_utils::{color::RGB8, PrimitiveReader, ReadError};

/// Decimal places kept for bone transforms.
const BONE_PRECISION: u32 = 4;
/// Decimal places kept for light directions.
const LIGHT_DIRECTION_PRECISION: u32 = 6;
/// Decimal places kept for light intensity, shadow depth and glow colors.
const COARSE_PRECISION: u32 = 2;

pub struct SceneDecoder<'s> {
    r: PrimitiveReader<'s, LE>,
    options: DecoderOptions,
    version: Version,
}

impl<'s> SceneDecoder<'s> {
    pub fn new(data: &'s [u8], options: DecoderOptions) -> Self {
        Self {
            r: PrimitiveReader::new(data),
            options,
            version: Version::default(),
        }
    }

    /// Decodes the whole file. The returned document doesn't borrow from the input.
    pub fn decode(mut self) -> Result<SceneDocument, DecodeError> {
        self.version = self.read_header()?;

        let mut document = SceneDocument {
            version: self.version,
            ..Default::default()
        };

        for block in grammar::active(SCENE_LAYOUT, self.version) {
            let start = self.r.offset();
            match block {
                Block::Items => document.items = self.read_items()?,
                Block::Camera => document.camera = self.read_camera()?,
                Block::Lights => document.lights = self.read_lights()?,
                Block::PostProcessing => {
                    document.post_processing = Some(self.read_post_processing()?)
                }
                Block::Background => document.background = self.read_background()?,
                Block::SkyDome => document.sky_dome = Some(self.read_sky_dome()?),
                Block::Window => document.window = Some(self.read_window()?),
            }
            trace!("{block:?} block spans bytes {start}..{}", self.r.offset());
            document.warnings.extend(self.r.take_issues());
        }

        if let Some(window) = document.window {
            if !window.is_plausible() {
                document
                    .warnings
                    .push(DataQualityWarning::OversizedWindow {
                        width: window.width,
                        height: window.height,
                    });
            }
        }

        if !self.r.is_at_end() {
            debug!("{} trailing bytes left unread", self.r.remaining_bytes());
        }

        Ok(document)
    }

    fn read_header(&mut self) -> Result<Version, DecodeError> {
        let major = self.r.read_u16()?;
        let minor = self.r.read_u16()?;
        let version = Version::new(major, minor);
        info!("Scene file version: {version}");

        let minimum = self.options.minimum_version;
        if version < minimum {
            return Err(DecodeError::UnsupportedVersion {
                found: version,
                minimum,
            });
        }

        Ok(version)
    }

    fn read_vec3(&mut self, precision: Option<u32>) -> Result<Vec3, ReadError> {
        Ok(Vec3::from_array(self.r.read_f32_array(precision)?))
    }

    fn read_bool(&mut self) -> Result<bool, ReadError> {
        Ok(self.r.read_u8()? != 0)
    }

    fn read_items(&mut self) -> Result<Vec<ItemRecord>, ReadError> {
        let count = self.r.read_u32()?;
        info!("Item count: {count}");

        let mut items = Vec::new();
        for index in 0..count {
            items.push(self.read_item(index)?);
        }
        Ok(items)
    }

    fn read_item(&mut self, index: u32) -> Result<ItemRecord, ReadError> {
        let mut item = ItemRecord::default();

        for field in grammar::active(ITEM_LAYOUT, self.version) {
            match field {
                ItemField::Name => item.name = self.r.read_string()?,
                ItemField::Path => item.path = self.r.read_string()?,
                ItemField::Visibility => item.visible = self.read_bool()?,
                ItemField::Scale => item.scale = self.read_vec3(None)?,
                ItemField::UniformScale => item.scale = Vec3::splat(self.r.read_f32()?),
                ItemField::Bones => item.bones = self.read_bones()?,
                ItemField::Location => item.location = self.read_vec3(None)?,
                ItemField::Accessories => {
                    let count = self.r.read_u32()? as usize;
                    item.accessories = self.read_accessories(count)?;
                }
                ItemField::SecondaryAccessories => {
                    let count = self.r.read_u16()? as usize;
                    item.secondary_accessories = self.read_accessories(count)?;
                }
                ItemField::GlowColors => {
                    item.glow_colors = Some(self.r.read_f32_array(Some(COARSE_PRECISION))?)
                }
            }
        }

        debug!(
            "Item {index}: '{}' from '{}' (visible: {}, {} bones, {}+{} accessories)",
            item.name,
            item.path,
            item.visible,
            item.bones.len(),
            item.accessories.len(),
            item.secondary_accessories.len(),
        );
        Ok(item)
    }

    fn read_bones(&mut self) -> Result<Vec<BoneRecord>, ReadError> {
        let count = self.r.read_u32()?;

        match self.options.bone_list {
            BoneListMode::Counted => {
                let mut bones = Vec::new();
                for _ in 0..count {
                    bones.push(self.read_bone()?);
                }
                Ok(bones)
            }
            BoneListMode::Lookahead => {
                // There's always at least one bone in this mode, the terminator is only checked
                // after reading one
                let mut bones = Vec::new();
                loop {
                    bones.push(self.read_bone()?);
                    if self.r.peek_u8()? == 0 {
                        break;
                    }
                }
                if bones.len() != count as usize {
                    debug!(
                        "Bone list has {} entries but its count says {count}",
                        bones.len()
                    );
                }
                Ok(bones)
            }
        }
    }

    fn read_bone(&mut self) -> Result<BoneRecord, ReadError> {
        let mut bone = BoneRecord::default();
        for field in grammar::active(BONE_LAYOUT, self.version) {
            match field {
                BoneField::Name => bone.name = self.r.read_string()?,
                BoneField::Rotation => bone.rotation = self.read_vec3(Some(BONE_PRECISION))?,
                BoneField::Location => bone.location = self.read_vec3(Some(BONE_PRECISION))?,
                BoneField::Scale => bone.scale = self.read_vec3(Some(BONE_PRECISION))?,
            }
        }
        trace!(
            "Bone '{}': rotation {}, location {}, scale {}",
            bone.name,
            bone.rotation,
            bone.location,
            bone.scale
        );
        Ok(bone)
    }

    fn read_accessories(&mut self, count: usize) -> Result<Vec<AccessoryRecord>, ReadError> {
        let mut accessories = Vec::new();
        for _ in 0..count {
            let name = self.r.read_string()?;
            // Unused flag
            self.r.skip(1)?;
            trace!("Accessory '{name}'");
            accessories.push(AccessoryRecord { name });
        }
        Ok(accessories)
    }

    fn read_camera(&mut self) -> Result<CameraRecord, ReadError> {
        let mut camera = CameraRecord::default();
        for field in grammar::active(CAMERA_LAYOUT, self.version) {
            match field {
                CameraField::Fov => camera.fov = self.r.read_f32()?,
                CameraField::Target => camera.target = self.read_vec3(None)?,
                CameraField::Distance => camera.distance = self.r.read_f32()?,
                CameraField::RotationHorizontal => camera.rotation_horizontal = self.r.read_f32()?,
                CameraField::RotationVertical => camera.rotation_vertical = self.r.read_f32()?,
            }
        }
        debug!("Camera: {camera:?}");
        Ok(camera)
    }

    fn read_lights(&mut self) -> Result<[LightRecord; LIGHT_COUNT], ReadError> {
        self.r.skip(LIGHTS_RESERVED)?;

        let mut lights: [LightRecord; LIGHT_COUNT] = Default::default();
        for (index, light) in lights.iter_mut().enumerate() {
            for field in grammar::active(LIGHT_LAYOUT, self.version) {
                match field {
                    LightField::Marker if index == 0 => {}
                    LightField::Marker => self.r.skip(1)?,
                    LightField::Direction => {
                        light.direction = self.read_vec3(Some(LIGHT_DIRECTION_PRECISION))?
                    }
                    LightField::Intensity => {
                        light.intensity = self.r.read_f32_rounded(COARSE_PRECISION)?
                    }
                    LightField::Color => light.color = RGB8::from(self.r.read_bytes::<3>()?),
                    LightField::ShadowDepth => {
                        light.shadow_depth = self.r.read_f32_rounded(COARSE_PRECISION)?
                    }
                }
            }
            debug!("Light {}: {light:?}", index + 1);
        }
        Ok(lights)
    }

    fn read_post_processing(&mut self) -> Result<PostProcessingRecord, ReadError> {
        let mut post = PostProcessingRecord::default();
        for field in grammar::active(POST_PROCESSING_LAYOUT, self.version) {
            match field {
                PostProcessingField::Enabled => post.enabled = Some(self.read_bool()?),
                PostProcessingField::Brightness => post.brightness = self.r.read_f32()?,
                PostProcessingField::Gamma => post.gamma = self.r.read_f32()?,
                PostProcessingField::Contrast => post.contrast = self.r.read_f32()?,
                PostProcessingField::Saturation => post.saturation = self.r.read_f32()?,
                PostProcessingField::Padding(count) => self.r.skip(count)?,
            }
        }
        debug!("Post processing: {post:?}");
        Ok(post)
    }

    fn read_background(&mut self) -> Result<BackgroundRecord, ReadError> {
        let mut background = BackgroundRecord::default();
        for field in grammar::active(BACKGROUND_LAYOUT, self.version) {
            match field {
                BackgroundField::GroundVisible => background.ground_visible = self.read_bool()?,
                BackgroundField::GroundTexture => {
                    background.ground_texture_path = self.r.read_string()?
                }
                BackgroundField::Color => {
                    background.color = Some(RGB8::from(self.r.read_bytes::<3>()?))
                }
                BackgroundField::Texture => background.texture_path = self.r.read_string()?,
                BackgroundField::TextureType => {
                    background.texture_type = Some(self.r.read_string()?)
                }
                BackgroundField::HudTexture => {
                    background.hud_texture_path = Some(self.r.read_string()?)
                }
            }
        }
        debug!("Background: {background:?}");
        Ok(background)
    }

    fn read_sky_dome(&mut self) -> Result<SkyDomeRecord, ReadError> {
        let mut sky_dome = SkyDomeRecord::default();
        for field in grammar::active(SKY_DOME_LAYOUT, self.version) {
            match field {
                SkyDomeField::Display => sky_dome.display = self.read_bool()?,
                SkyDomeField::Kind => sky_dome.kind = self.r.read_string()?,
                SkyDomeField::Rotation => sky_dome.rotation = self.r.read_f32()?,
                SkyDomeField::Elevation => sky_dome.elevation = self.r.read_f32()?,
            }
        }
        debug!("Sky dome: {sky_dome:?}");
        Ok(sky_dome)
    }

    fn read_window(&mut self) -> Result<WindowRecord, ReadError> {
        let mut window = WindowRecord::default();
        for field in grammar::active(WINDOW_LAYOUT, self.version) {
            match field {
                WindowField::Maximized => window.maximized = self.read_bool()?,
                WindowField::Width => window.width = self.r.read_u32()?,
                WindowField::Height => window.height = self.r.read_u32()?,
            }
        }
        debug!("Window: {window:?}");
        Ok(window)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xps_utils::discriminant_matches;

    #[test]
    fn old_versions_are_rejected() {
        let data = [1, 0, 20, 0];
        let result = SceneDecoder::new(&data, DecoderOptions::default()).decode();
        assert_eq!(
            result,
            Err(DecodeError::UnsupportedVersion {
                found: Version::new(1, 20),
                minimum: Version::new(1, 21),
            })
        );
    }

    #[test]
    fn configurable_floor() {
        let data = [1, 0, 5, 0];
        let options = DecoderOptions {
            minimum_version: Version::new(1, 0),
            ..Default::default()
        };
        // Accepted, but the file ends right after the header
        let result = SceneDecoder::new(&data, options).decode();
        assert!(discriminant_matches!(
            result,
            Err(DecodeError::TruncatedInput(_))
        ));
    }

    #[test]
    fn empty_input_is_truncated() {
        let result = SceneDecoder::new(&[], DecoderOptions::default()).decode();
        assert!(matches!(
            result,
            Err(DecodeError::TruncatedInput(ReadError::TruncatedInput { offset: 0, .. }))
        ));
    }
}
