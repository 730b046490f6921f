use crate::Settings;
use clap::{Args, ValueEnum};
use std::path::PathBuf;
use xps_scene::SceneDocument;
use xps_utils::AnyResult;

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum DumpFormat {
    /// Rust debug notation
    #[default]
    Debug,
    Toml,
}

#[derive(Args)]
pub struct DumpCommand {
    /// Output format
    #[arg(long, short = 'f', value_enum, default_value_t)]
    pub format: DumpFormat,
    /// Scene file to read
    pub file: PathBuf,
}

impl crate::Command for DumpCommand {
    fn run(self, settings: &Settings) -> AnyResult {
        let document = settings.open_scene(&self.file)?;
        print!("{}", render(&document, self.format)?);

        if !document.warnings.is_empty() {
            eprintln!("Warnings:");
            for warning in &document.warnings {
                eprintln!("  - {warning}");
            }
        }
        settings.check_warnings(&document.warnings)
    }
}

/// Formats the whole document, warnings included.
pub fn render(document: &SceneDocument, format: DumpFormat) -> AnyResult<String> {
    Ok(match format {
        DumpFormat::Debug => format!("{document:#?}\n"),
        DumpFormat::Toml => toml::to_string_pretty(document)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use xps_scene::{DataQualityWarning, ItemRecord, Version, WindowRecord};

    fn document() -> SceneDocument {
        let mut document = SceneDocument {
            version: Version::new(1, 21),
            items: vec![ItemRecord {
                name: "lara".into(),
                path: "data\\Lara".into(),
                visible: true,
                scale: Vec3::ONE,
                ..Default::default()
            }],
            window: Some(WindowRecord {
                maximized: false,
                width: 50000,
                height: 600,
            }),
            ..Default::default()
        };
        document.warnings.push(DataQualityWarning::OversizedWindow {
            width: 50000,
            height: 600,
        });
        document
    }

    #[test]
    fn toml_dump() {
        let text = render(&document(), DumpFormat::Toml).unwrap();
        assert!(text.contains(r#"version = "1.21""#), "{text}");
        assert!(text.contains(r#"name = "lara""#), "{text}");
        assert!(text.contains("OversizedWindow"), "{text}");
        assert!(text.contains("width = 50000"), "{text}");
    }

    #[test]
    fn debug_dump() {
        let text = render(&document(), DumpFormat::Debug).unwrap();
        assert!(text.starts_with("SceneDocument {"));
        assert!(text.contains("OversizedWindow"));
    }
}
