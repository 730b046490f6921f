//! Settings file and command line overrides
//!
//! ```toml
//! asset_dirs = ["C:/XPS/data", "D:/assets"]
//!
//! [decoder]
//! minimum_version = "1.21"
//! bone_list = "counted"
//!
//! [import]
//! exclude_hidden_models = false
//! ```

use crate::GlobalArgs;
use anyhow::bail;
use log::{debug, warn};
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use xps_scene::{
    load_scene_file, BoneListMode, DecoderOptions, ImportOptions, SceneDocument, Warnings,
};
use xps_utils::{ok, AnyResult, AnyhowResultExt};

/// Extension every scene file is expected to have.
pub const SCENE_EXTENSION: &str = "scene";

/// Contents of a `--config` file. Every section is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub decoder: DecoderOptions,
    pub import: ImportOptions,
    /// Directories searched for model folders, in order.
    pub asset_dirs: Vec<PathBuf>,
}

impl ConfigFile {
    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }
}

/// Final settings, the config file with command line flags applied on top.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub decoder: DecoderOptions,
    pub import: ImportOptions,
    pub asset_dirs: Vec<PathBuf>,
    pub any_extension: bool,
    pub strict: bool,
}

impl Settings {
    pub fn load(args: &GlobalArgs) -> AnyResult<Self> {
        let file = match &args.config {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .otherwise_with(|| format!("couldn't read config file {}", path.display()))?;
                ConfigFile::parse(&text)
                    .otherwise_with(|| format!("couldn't parse config file {}", path.display()))?
            }
            None => ConfigFile::default(),
        };

        let mut settings = Settings {
            decoder: file.decoder,
            import: file.import,
            asset_dirs: file.asset_dirs,
            any_extension: args.any_extension,
            strict: args.strict,
        };
        if let Some(version) = args.min_version {
            settings.decoder.minimum_version = version;
        }
        if args.lookahead_bones {
            settings.decoder.bone_list = BoneListMode::Lookahead;
        }

        debug!("Settings: {settings:?}");
        Ok(settings)
    }

    /// Checks the file name and decodes the file.
    pub fn open_scene(&self, path: &Path) -> AnyResult<SceneDocument> {
        if !self.any_extension && !has_scene_extension(path) {
            bail!(
                "{} isn't a .{SCENE_EXTENSION} file (pass --any-extension to read it anyway)",
                path.display()
            );
        }
        load_scene_file(path, &self.decoder)
    }

    /// Fails in strict mode if there were any warnings.
    pub fn check_warnings(&self, warnings: &Warnings) -> AnyResult {
        if warnings.is_empty() {
            return ok();
        }
        if self.strict {
            bail!("{} warning(s) reported in strict mode", warnings.len());
        }
        warn!("{} warning(s) reported", warnings.len());
        ok()
    }
}

pub fn has_scene_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(SCENE_EXTENSION))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::tempdir;
    use xps_scene::{DataQualityWarning, Version};

    fn global_args(args: &[&str]) -> GlobalArgs {
        let mut argv = vec!["xps-inspect"];
        argv.extend_from_slice(args);
        argv.extend(["dump", "lara.scene"]);
        crate::Cli::try_parse_from(argv).unwrap().global
    }

    #[test]
    fn partial_config() {
        let config = ConfigFile::parse(
            r#"
            asset_dirs = ["assets"]

            [decoder]
            minimum_version = "1.9"
            bone_list = "lookahead"

            [import]
            import_lights = false
            "#,
        )
        .unwrap();
        assert_eq!(config.decoder.minimum_version, Version::new(1, 9));
        assert_eq!(config.decoder.bone_list, BoneListMode::Lookahead);
        assert!(!config.import.import_lights);
        assert!(config.import.import_models);
        assert_eq!(config.asset_dirs, [PathBuf::from("assets")]);
    }

    #[test]
    fn empty_config_is_default() {
        assert_eq!(ConfigFile::parse("").unwrap(), ConfigFile::default());
        assert!(ConfigFile::parse("[decoder]\nminimum_version = \"one\"").is_err());
        assert!(ConfigFile::parse("colour = 1").is_err());
    }

    #[test]
    fn flags_override_config_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("xps.toml");
        let text = r#"
            asset_dirs = ["assets"]

            [decoder]
            minimum_version = "1.9"

            [import]
            import_camera = false
        "#;
        fs::write(&path, text).unwrap();
        let config = path.to_str().unwrap();

        let settings = Settings::load(&global_args(&["--config", config])).unwrap();
        assert_eq!(settings.decoder.minimum_version, Version::new(1, 9));
        assert_eq!(settings.decoder.bone_list, BoneListMode::Counted);
        assert!(!settings.import.import_camera);
        assert_eq!(settings.asset_dirs, [PathBuf::from("assets")]);

        let settings = Settings::load(&global_args(&[
            "--config",
            config,
            "--min-version",
            "1.0",
            "--lookahead-bones",
            "--strict",
        ]))
        .unwrap();
        assert_eq!(settings.decoder.minimum_version, Version::new(1, 0));
        assert_eq!(settings.decoder.bone_list, BoneListMode::Lookahead);
        assert!(settings.strict);
    }

    #[test]
    fn broken_config_file_is_reported() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("xps.toml");
        fs::write(&path, "[decoder]\nminimum_version = \"one\"\n").unwrap();

        let error = Settings::load(&global_args(&["--config", path.to_str().unwrap()]))
            .unwrap_err();
        assert!(error.to_string().starts_with("couldn't parse config file"));

        let missing = dir.path().join("missing.toml");
        let error = Settings::load(&global_args(&["--config", missing.to_str().unwrap()]))
            .unwrap_err();
        assert!(error.to_string().starts_with("couldn't read config file"));
    }

    #[test]
    fn extension_check() {
        assert!(has_scene_extension(Path::new("poses/lara.scene")));
        assert!(has_scene_extension(Path::new("LARA.SCENE")));
        assert!(!has_scene_extension(Path::new("lara.pose")));
        assert!(!has_scene_extension(Path::new("scene")));

        let settings = Settings::default();
        let error = settings.open_scene(Path::new("lara.pose")).unwrap_err();
        assert!(error.to_string().contains("--any-extension"));
    }

    #[test]
    fn strict_mode() {
        let mut warnings = Warnings::new();
        warnings.push(DataQualityWarning::ImporterUnavailable);

        let mut settings = Settings::default();
        assert!(settings.check_warnings(&warnings).is_ok());
        settings.strict = true;
        assert!(settings.check_warnings(&warnings).is_err());
        assert!(settings.check_warnings(&Warnings::new()).is_ok());
    }
}
