//! Handing a decoded document over to a scene building host
//!
//! The decoder never looks at the filesystem or at any host state. Whatever turns the records
//! into actual objects implements [`SceneBuilder`], and [`import_scene`] drives it: it applies
//! the [`ImportOptions`] policy, calls the builder in file order, and collects everything that
//! went wrong into an [`ImportReport`] instead of failing.

use crate::{
    split_tool_path, transform::ItemTransform, BackgroundRecord, BoneRecord, BuildStage,
    CameraRecord, DataQualityWarning, ImportOptions, ItemRecord, LightRecord,
    PostProcessingRecord, SceneDocument, SkyDomeRecord, Warning, Warnings,
};
use glam::Vec3;
use log::{debug, info};
use xps_utils::{ok, AnyResult};

/// Everything a host needs to place one character.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CharacterPlacement<'d> {
    /// Tool path of the model directory. Resolving it is up to the host.
    pub path: &'d str,
    pub display_name: &'d str,
    pub visible: bool,
    /// Target space scale.
    pub scale: Vec3,
    /// Target space location.
    pub location: Vec3,
    pub bone_deltas: &'d [BoneRecord],
}

impl<'d> CharacterPlacement<'d> {
    pub fn new(item: &'d ItemRecord) -> Self {
        let transform = ItemTransform::from(item);
        Self {
            path: &item.path,
            display_name: &item.name,
            visible: item.visible,
            scale: transform.scale,
            location: transform.location,
            bone_deltas: &item.bones,
        }
    }

    /// Last segment of the tool path.
    pub fn folder_name(&self) -> Option<&'d str> {
        split_tool_path(self.path).last()
    }
}

/// Host side of an import. Every call may fail; failures end up as warnings in the
/// [`ImportReport`]. Returning a [`DataQualityWarning`] as the error reports it verbatim.
pub trait SceneBuilder {
    fn build_character_placement(&mut self, character: CharacterPlacement<'_>) -> AnyResult;

    fn build_camera(&mut self, camera: &CameraRecord) -> AnyResult;

    /// `index` is 1-based.
    fn build_light(&mut self, index: u8, light: &LightRecord) -> AnyResult;

    /// `include_ground` is false if the ground shouldn't be built, whatever the record says.
    fn build_background(&mut self, background: &BackgroundRecord, include_ground: bool)
        -> AnyResult;

    fn build_sky_dome(&mut self, _sky_dome: &SkyDomeRecord) -> AnyResult {
        ok()
    }

    fn apply_window_resolution(&mut self, _width: u32, _height: u32) -> AnyResult {
        ok()
    }

    fn apply_post_processing(&mut self, _post: &PostProcessingRecord) -> AnyResult {
        ok()
    }
}

/// Outcome of [`import_scene`].
#[derive(Debug, Clone, Default)]
pub struct ImportReport {
    /// Document warnings followed by everything reported during the import.
    pub warnings: Warnings,
    pub characters_built: usize,
    pub characters_skipped: usize,
}

impl ImportReport {
    pub fn has_errors(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Whether anything beyond string decoding issues went wrong.
    pub fn has_data_quality_issues(&self) -> bool {
        self.warnings
            .iter()
            .any(|w| xps_utils::discriminant_matches!(w, Warning::DataQuality(_)))
    }

    /// Bullet list of all warnings, for showing to a user.
    pub fn error_message(&self) -> String {
        let mut message = String::from("Errors while importing scene:\n");
        for warning in &self.warnings {
            message.push_str(&format!("- {warning}\n"));
        }
        message
    }

    fn record(&mut self, stage: BuildStage, result: AnyResult) {
        if let Err(error) = result {
            let warning = match error.downcast::<DataQualityWarning>() {
                Ok(warning) => warning,
                Err(error) => DataQualityWarning::BuildFailed {
                    stage,
                    message: format!("{error:#}"),
                },
            };
            self.warnings.push(warning);
        }
    }
}

/// Feeds a decoded document to the builder.
pub fn import_scene(
    document: &SceneDocument,
    builder: &mut impl SceneBuilder,
    options: &ImportOptions,
) -> ImportReport {
    let mut report = ImportReport {
        warnings: document.warnings.clone(),
        ..Default::default()
    };

    for item in &document.items {
        if !options.import_models {
            report.characters_skipped += 1;
            continue;
        }
        if !item.visible && options.exclude_hidden_models {
            debug!("Skipping hidden item '{}'", item.name);
            report.characters_skipped += 1;
            continue;
        }

        info!("Building character '{}' from '{}'", item.name, item.path);
        let result = builder.build_character_placement(CharacterPlacement::new(item));
        if result.is_ok() {
            report.characters_built += 1;
        }
        report.record(BuildStage::Character(item.name.clone()), result);
    }

    if options.import_camera {
        let result = builder.build_camera(&document.camera);
        report.record(BuildStage::Camera, result);
    }

    if options.import_lights {
        for (index, light) in document.numbered_lights() {
            let result = builder.build_light(index, light);
            report.record(BuildStage::Light(index), result);
        }
    }

    if let Some(post) = &document.post_processing {
        let result = builder.apply_post_processing(post);
        report.record(BuildStage::PostProcessing, result);
    }

    let result = builder.build_background(&document.background, options.import_ground);
    report.record(BuildStage::Background, result);

    if let Some(sky_dome) = &document.sky_dome {
        let result = builder.build_sky_dome(sky_dome);
        report.record(BuildStage::SkyDome, result);
    }

    if let Some(window) = &document.window {
        if window.is_plausible() {
            let result = builder.apply_window_resolution(window.width, window.height);
            report.record(BuildStage::WindowResolution, result);
        } else {
            // Already reported by the decoder, this only makes sure of it
            report.warnings.push(DataQualityWarning::OversizedWindow {
                width: window.width,
                height: window.height,
            });
        }
    }

    info!(
        "Import finished: {} characters built, {} skipped, {} warnings",
        report.characters_built,
        report.characters_skipped,
        report.warnings.len()
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::WindowRecord;
    use anyhow::bail;

    #[derive(Default)]
    struct Recorder {
        calls: Vec<String>,
        fail_paths: Vec<String>,
        missing_armature: bool,
        no_importer: bool,
    }

    impl SceneBuilder for Recorder {
        fn build_character_placement(&mut self, character: CharacterPlacement<'_>) -> AnyResult {
            self.calls.push(format!("character {}", character.display_name));
            if self.no_importer {
                return Err(DataQualityWarning::ImporterUnavailable.into());
            }
            if self.fail_paths.iter().any(|path| path == character.path) {
                return Err(DataQualityWarning::MissingAsset {
                    folder: character.folder_name().unwrap_or_default().into(),
                    path: character.path.into(),
                }
                .into());
            }
            if self.missing_armature {
                return Err(DataQualityWarning::MissingArmature {
                    name: character.display_name.into(),
                }
                .into());
            }
            ok()
        }

        fn build_camera(&mut self, _camera: &CameraRecord) -> AnyResult {
            self.calls.push("camera".into());
            ok()
        }

        fn build_light(&mut self, index: u8, _light: &LightRecord) -> AnyResult {
            self.calls.push(format!("light {index}"));
            if index == 2 {
                bail!("light rig broke");
            }
            ok()
        }

        fn build_background(
            &mut self,
            _background: &BackgroundRecord,
            include_ground: bool,
        ) -> AnyResult {
            self.calls.push(format!("background {include_ground}"));
            ok()
        }

        fn apply_window_resolution(&mut self, width: u32, height: u32) -> AnyResult {
            self.calls.push(format!("window {width}x{height}"));
            ok()
        }
    }

    fn item(name: &str, path: &str, visible: bool) -> ItemRecord {
        ItemRecord {
            name: name.into(),
            path: path.into(),
            visible,
            scale: Vec3::ONE,
            ..Default::default()
        }
    }

    fn document() -> SceneDocument {
        SceneDocument {
            items: vec![
                item("lara", "data\\Lara", true),
                item("ghost", "data\\Ghost", false),
            ],
            window: Some(WindowRecord {
                maximized: false,
                width: 800,
                height: 600,
            }),
            ..Default::default()
        }
    }

    #[test]
    fn calls_in_file_order() {
        let mut recorder = Recorder::default();
        let report = import_scene(&document(), &mut recorder, &ImportOptions::default());

        assert_eq!(
            recorder.calls,
            [
                "character lara",
                "camera",
                "light 1",
                "light 2",
                "light 3",
                "background true",
                "window 800x600"
            ]
        );
        assert_eq!(report.characters_built, 1);
        assert_eq!(report.characters_skipped, 1);
        // Light 2 failed
        assert_eq!(report.warnings.len(), 1);
        assert!(report.error_message().contains("light 2"));
    }

    #[test]
    fn hidden_items_can_be_included() {
        let mut recorder = Recorder::default();
        let options = ImportOptions {
            exclude_hidden_models: false,
            import_lights: false,
            import_camera: false,
            import_ground: false,
            ..Default::default()
        };
        let report = import_scene(&document(), &mut recorder, &options);
        assert_eq!(
            recorder.calls,
            [
                "character lara",
                "character ghost",
                "background false",
                "window 800x600"
            ]
        );
        assert_eq!(report.characters_built, 2);
        assert!(!report.has_errors());
    }

    #[test]
    fn builder_warnings_are_kept_verbatim() {
        let mut recorder = Recorder {
            fail_paths: vec!["data\\Lara".into()],
            ..Default::default()
        };
        let options = ImportOptions {
            import_lights: false,
            ..Default::default()
        };
        let report = import_scene(&document(), &mut recorder, &options);
        assert_eq!(report.characters_built, 0);
        assert_eq!(
            report.warnings.as_slice(),
            [Warning::DataQuality(DataQualityWarning::MissingAsset {
                folder: "Lara".into(),
                path: "data\\Lara".into(),
            })]
        );
        assert!(report.has_data_quality_issues());
    }

    #[test]
    fn missing_armature_still_counts_as_a_warning() {
        let mut recorder = Recorder {
            missing_armature: true,
            ..Default::default()
        };
        let options = ImportOptions {
            import_lights: false,
            ..Default::default()
        };
        let report = import_scene(&document(), &mut recorder, &options);
        assert!(matches!(
            report.warnings.as_slice(),
            [Warning::DataQuality(DataQualityWarning::MissingArmature { .. })]
        ));
    }

    #[test]
    fn missing_importer_is_reported_once() {
        let mut recorder = Recorder {
            no_importer: true,
            ..Default::default()
        };
        let options = ImportOptions {
            exclude_hidden_models: false,
            import_lights: false,
            ..Default::default()
        };
        let report = import_scene(&document(), &mut recorder, &options);
        assert_eq!(report.characters_built, 0);
        assert_eq!(
            report.warnings.as_slice(),
            [Warning::DataQuality(DataQualityWarning::ImporterUnavailable)]
        );
    }

    #[test]
    fn oversized_window_isnt_applied() {
        let mut document = document();
        document.window = Some(WindowRecord {
            maximized: false,
            width: 50000,
            height: 600,
        });
        let mut recorder = Recorder::default();
        let options = ImportOptions {
            import_lights: false,
            ..Default::default()
        };
        let report = import_scene(&document, &mut recorder, &options);
        assert!(!recorder.calls.iter().any(|call| call.starts_with("window")));
        assert!(report.has_data_quality_issues());
    }

    #[test]
    fn placement_is_in_target_space() {
        let mut item = item("lara", "data\\Lara", true);
        item.location = Vec3::new(1.0, 2.0, 3.0);
        item.scale = Vec3::new(1.0, 2.0, 3.0);
        let placement = CharacterPlacement::new(&item);
        assert_eq!(placement.location, Vec3::new(1.0, -3.0, 2.0));
        assert_eq!(placement.scale, Vec3::new(1.0, 3.0, 2.0));
    }
}
