use crate::Settings;
use anyhow::bail;
use clap::Args;
use glam::{EulerRot, Quat, Vec3};
use log::debug;
use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};
use xps_scene::{
    import_scene,
    pose::{Armature, BonePose},
    split_tool_path,
    transform::{CameraPlacement, LightPlacement},
    BackgroundRecord, BoneRecord, CameraRecord, CharacterPlacement, DataQualityWarning,
    LightRecord, PostProcessingRecord, SceneBuilder, SkyDomeRecord, BUILTIN_GROUND_MODEL_DIR,
    BUILTIN_GROUND_MODEL_FILE,
};
use xps_utils::{ok, AnyResult};

/// Width of the camera sensor focal lengths are computed for, in millimeters.
pub const SENSOR_WIDTH: f32 = 36.0;

/// Model file extensions, in order of preference.
pub const MODEL_EXTENSIONS: &[&str] = &["xps", "mesh", "ascii"];

#[derive(Args)]
pub struct PlanCommand {
    /// Directory to search for model folders, can be repeated. Adds to the config file's list.
    #[arg(long = "asset-dir")]
    pub asset_dirs: Vec<PathBuf>,
    /// Scene file to read
    pub file: PathBuf,
}

impl crate::Command for PlanCommand {
    fn run(self, settings: &Settings) -> AnyResult {
        let document = settings.open_scene(&self.file)?;

        let mut asset_dirs = settings.asset_dirs.clone();
        asset_dirs.extend(self.asset_dirs);

        let stdout = io::stdout();
        let mut printer = PlanPrinter::new(stdout.lock(), &asset_dirs);
        let report = import_scene(&document, &mut printer, &settings.import);

        println!(
            "{} character(s) built, {} skipped",
            report.characters_built, report.characters_skipped
        );
        if report.has_errors() {
            eprint!("{}", report.error_message());
        }
        settings.check_warnings(&report.warnings)
    }
}

/// A [`SceneBuilder`] that builds nothing and instead writes down every object an import
/// would create. Models are looked up in the asset directories, if there are any.
pub struct PlanPrinter<'a, W: Write> {
    out: W,
    asset_dirs: &'a [PathBuf],
}

impl<'a, W: Write> PlanPrinter<'a, W> {
    pub fn new(out: W, asset_dirs: &'a [PathBuf]) -> Self {
        Self { out, asset_dirs }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Finds the model folder of a tool path in the first asset directory containing it.
    /// `None` if there are no asset directories to search.
    fn find_model_folder(&self, tool_path: &str) -> Option<Option<PathBuf>> {
        if self.asset_dirs.is_empty() {
            return None;
        }
        let relative: PathBuf = split_tool_path(tool_path).collect();
        let found = self
            .asset_dirs
            .iter()
            .map(|dir| dir.join(&relative))
            .find(|candidate| candidate.is_dir());
        Some(found)
    }

    fn write_model_file(&mut self, folder: &Path, stem: Option<&str>) -> AnyResult {
        match find_model_file(folder, stem)? {
            Some(file) => writeln!(self.out, "  model file: {}", file.display())?,
            None => bail!(
                "no {} file in {}",
                MODEL_EXTENSIONS.join("/"),
                folder.display()
            ),
        }
        ok()
    }

    fn write_bone_deltas(&mut self, name: &str, deltas: &[BoneRecord]) -> AnyResult {
        if deltas.is_empty() {
            return ok();
        }

        // Rest poses live in the model files, so this shows the pose on top of an identity one
        let mut armature = Armature::new(name);
        for delta in deltas {
            armature.add_bone(delta.name.as_str(), Quat::IDENTITY);
        }
        let applied = armature.apply_pose(deltas);
        writeln!(
            self.out,
            "  pose: {applied} bone delta(s) over {} bone(s)",
            armature.bone_count()
        )?;

        for delta in deltas {
            let Some(bone) = armature.bone(&delta.name) else {
                continue;
            };
            let pose = bone.pose;
            if pose == BonePose::default() {
                continue;
            }
            let (x, y, z) = pose.rotation.to_euler(EulerRot::XYZ);
            writeln!(
                self.out,
                "    '{}': rotation {}, location {}, scale {}",
                delta.name,
                to_degrees(Vec3::new(x, y, z)),
                pose.location,
                pose.scale
            )?;
        }
        ok()
    }
}

fn to_degrees(radians: Vec3) -> Vec3 {
    Vec3::new(radians.x.to_degrees(), radians.y.to_degrees(), radians.z.to_degrees())
}

/// Looks for a model file in a folder. With a `stem`, only files named like it (case
/// insensitive) count.
pub fn find_model_file(folder: &Path, stem: Option<&str>) -> AnyResult<Option<PathBuf>> {
    let mut candidates = Vec::new();
    for entry in fs::read_dir(folder)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let Some(extension) = path.extension().and_then(|e| e.to_str()) else {
            continue;
        };
        let Some(rank) = MODEL_EXTENSIONS
            .iter()
            .position(|known| known.eq_ignore_ascii_case(extension))
        else {
            continue;
        };
        if let Some(stem) = stem {
            let matches = path
                .file_stem()
                .and_then(|s| s.to_str())
                .is_some_and(|s| s.eq_ignore_ascii_case(stem));
            if !matches {
                continue;
            }
        }
        candidates.push((rank, path));
    }
    candidates.sort();
    Ok(candidates.into_iter().next().map(|(_, path)| path))
}

impl<'a, W: Write> SceneBuilder for PlanPrinter<'a, W> {
    fn build_character_placement(&mut self, character: CharacterPlacement<'_>) -> AnyResult {
        writeln!(
            self.out,
            "Character '{}'{}",
            character.display_name,
            if character.visible { "" } else { " (hidden)" }
        )?;
        writeln!(self.out, "  path: {}", character.path)?;

        if let Some(folder) = self.find_model_folder(character.path) {
            let Some(folder) = folder else {
                return Err(DataQualityWarning::MissingAsset {
                    folder: character.folder_name().unwrap_or_default().into(),
                    path: character.path.into(),
                }
                .into());
            };
            debug!("Model folder of '{}': {}", character.display_name, folder.display());
            self.write_model_file(&folder, None)?;
        }

        writeln!(self.out, "  location: {}", character.location)?;
        writeln!(self.out, "  scale: {}", character.scale)?;
        self.write_bone_deltas(character.display_name, character.bone_deltas)
    }

    fn build_camera(&mut self, camera: &CameraRecord) -> AnyResult {
        let placement = CameraPlacement::from(camera);
        writeln!(self.out, "Camera")?;
        writeln!(self.out, "  controller location: {}", placement.target)?;
        writeln!(
            self.out,
            "  controller rotation: {}",
            to_degrees(placement.controller_rotation)
        )?;
        writeln!(self.out, "  distance: {}", placement.distance)?;
        writeln!(
            self.out,
            "  field of view: {}° (focal length {:.2}mm on a {SENSOR_WIDTH}mm sensor)",
            camera.fov_angle_steps(),
            camera.focal_length(SENSOR_WIDTH)
        )?;
        ok()
    }

    fn build_light(&mut self, index: u8, light: &LightRecord) -> AnyResult {
        let placement = LightPlacement::from(light);
        writeln!(self.out, "Light {index}")?;
        writeln!(self.out, "  controller location: {}", placement.controller)?;
        writeln!(self.out, "  location: {}", placement.location)?;
        writeln!(self.out, "  direction: {}", placement.direction)?;
        writeln!(
            self.out,
            "  energy: {}, color: {:?}, shadow depth: {}",
            placement.energy, placement.color, light.shadow_depth
        )?;
        ok()
    }

    fn build_background(
        &mut self,
        background: &BackgroundRecord,
        include_ground: bool,
    ) -> AnyResult {
        writeln!(self.out, "Background")?;
        if let Some(color) = background.color {
            writeln!(self.out, "  color: {:?}", color.to_normalized())?;
        }
        if !background.texture_path.is_empty() {
            writeln!(self.out, "  texture: {}", background.texture_path)?;
        }
        if let Some(texture_type) = &background.texture_type {
            writeln!(self.out, "  texture type: {texture_type}")?;
        }

        if !include_ground {
            return ok();
        }

        if !background.uses_builtin_ground() {
            writeln!(
                self.out,
                "  ground texture: {}{}",
                background.ground_texture_path,
                if background.ground_visible { "" } else { " (hidden)" }
            )?;
            return ok();
        }

        writeln!(
            self.out,
            "  ground model: {BUILTIN_GROUND_MODEL_DIR}\\{BUILTIN_GROUND_MODEL_FILE}{}",
            if background.ground_visible { "" } else { " (hidden)" }
        )?;
        if let Some(folder) = self.find_model_folder(BUILTIN_GROUND_MODEL_DIR) {
            let Some(folder) = folder else {
                bail!(
                    "couldn't find the ground model, the XPS install directory is likely not \
                     an asset directory"
                );
            };
            self.write_model_file(&folder, Some(BUILTIN_GROUND_MODEL_FILE))?;
        }
        ok()
    }

    fn build_sky_dome(&mut self, sky_dome: &SkyDomeRecord) -> AnyResult {
        writeln!(
            self.out,
            "Sky dome '{}'{}: rotation {}, elevation {}",
            sky_dome.kind,
            if sky_dome.display { "" } else { " (hidden)" },
            sky_dome.rotation,
            sky_dome.elevation
        )?;
        ok()
    }

    fn apply_window_resolution(&mut self, width: u32, height: u32) -> AnyResult {
        writeln!(self.out, "Render resolution: {width}x{height}")?;
        ok()
    }

    fn apply_post_processing(&mut self, post: &PostProcessingRecord) -> AnyResult {
        writeln!(
            self.out,
            "Post processing{}: brightness {}, gamma {}, contrast {}, saturation {}",
            match post.enabled {
                Some(false) => " (disabled)",
                _ => "",
            },
            post.brightness,
            post.gamma,
            post.contrast,
            post.saturation
        )?;
        ok()
    }
}
