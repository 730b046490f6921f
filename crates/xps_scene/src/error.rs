use crate::Version;
use log::warn;
use serde::Serialize;
use std::fmt;
use thiserror::Error;
use xps_utils::{ReadError, StringIssue};

/// Fatal decoding failures. Either of these aborts the whole decode, no partial document is
/// produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("scene file ended unexpectedly: {0}")]
    TruncatedInput(#[from] ReadError),
    #[error("unsupported scene file version {found}, only {minimum} and newer are supported")]
    UnsupportedVersion { found: Version, minimum: Version },
}

/// Recoverable problems, attached to the decoded document or the import report.
#[derive(Debug, Clone, PartialEq, Serialize, Error)]
pub enum Warning {
    #[error("string at offset {offset} contains a NUL byte after {decoded} of {declared} bytes")]
    MalformedString {
        offset: usize,
        declared: usize,
        decoded: usize,
    },
    #[error("string at offset {offset} isn't valid UTF-8")]
    InvalidUtf8 { offset: usize },
    #[error(transparent)]
    DataQuality(#[from] DataQualityWarning),
}

impl From<StringIssue> for Warning {
    fn from(issue: StringIssue) -> Self {
        match issue {
            StringIssue::EmbeddedNul {
                offset,
                declared,
                decoded,
            } => Warning::MalformedString {
                offset,
                declared,
                decoded,
            },
            StringIssue::InvalidUtf8 { offset } => Warning::InvalidUtf8 { offset },
        }
    }
}

/// Problems with the data itself rather than its encoding. Collaborators may return these from
/// their build calls (wrapped in an [`anyhow::Error`]) to have them reported as is.
#[derive(Debug, Clone, PartialEq, Serialize, Error)]
pub enum DataQualityWarning {
    #[error(
        "window resolution {width}x{height} is too big (>{}), the scene file was likely read incorrectly",
        crate::MAX_WINDOW_DIMENSION
    )]
    OversizedWindow { width: u32, height: u32 },
    #[error("model '{folder}' was not found in any asset directory (full original path: '{path}')")]
    MissingAsset { folder: String, path: String },
    /// Host side: the loaded model has no armature to pose. Only a host that actually loads
    /// model files can tell.
    #[error("character '{name}' doesn't contain an armature, skipping its pose")]
    MissingArmature { name: String },
    /// Host side: there's no model importer to build characters with.
    #[error("character importer isn't available, skipping character import")]
    ImporterUnavailable,
    #[error("building {stage} failed: {message}")]
    BuildFailed { stage: BuildStage, message: String },
}

/// Which collaborator call a [`DataQualityWarning::BuildFailed`] came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum BuildStage {
    Character(String),
    Camera,
    Light(u8),
    PostProcessing,
    Background,
    SkyDome,
    WindowResolution,
}

impl fmt::Display for BuildStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildStage::Character(name) => write!(f, "character '{name}'"),
            BuildStage::Camera => f.write_str("camera"),
            BuildStage::Light(index) => write!(f, "light {index}"),
            BuildStage::PostProcessing => f.write_str("post processing"),
            BuildStage::Background => f.write_str("background"),
            BuildStage::SkyDome => f.write_str("sky dome"),
            BuildStage::WindowResolution => f.write_str("window resolution"),
        }
    }
}

/// Ordered warning list. Every warning is logged once when added, duplicates are dropped.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Warnings(Vec<Warning>);

impl Warnings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, warning: impl Into<Warning>) {
        let warning = warning.into();
        if !self.0.contains(&warning) {
            warn!("{warning}");
            self.0.push(warning);
        }
    }

    pub fn extend(&mut self, warnings: impl IntoIterator<Item = impl Into<Warning>>) {
        for warning in warnings {
            self.push(warning);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Warning> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Warning] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<Warning> {
        self.0
    }
}

impl<'a> IntoIterator for &'a Warnings {
    type Item = &'a Warning;
    type IntoIter = std::slice::Iter<'a, Warning>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicates_are_dropped() {
        let mut warnings = Warnings::new();
        warnings.push(DataQualityWarning::ImporterUnavailable);
        warnings.push(DataQualityWarning::ImporterUnavailable);
        warnings.push(Warning::InvalidUtf8 { offset: 3 });
        assert_eq!(warnings.len(), 2);
    }

    #[test]
    fn messages() {
        let warning: Warning = DataQualityWarning::OversizedWindow {
            width: 50000,
            height: 600,
        }
        .into();
        assert!(warning.to_string().contains("50000x600"));
        assert!(warning.to_string().contains(">10000"));

        let failed = DataQualityWarning::BuildFailed {
            stage: BuildStage::Light(2),
            message: "no".into(),
        };
        assert_eq!(failed.to_string(), "building light 2 failed: no");
    }
}
