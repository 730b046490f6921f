//! Reader for XNALara/XPS `.scene` files
//!
//! A scene file is a flat, little endian stream with no tags or offsets, whose layout depends
//! entirely on the version stored in its first four bytes. [`decode_scene`] turns one into a
//! [`SceneDocument`], [`import_scene`] hands that document to a [`SceneBuilder`] host, and
//! [`transform`] converts the tool's Y-up coordinates into a Z-up, right-handed space.
//!
//! ```no_run
//! use xps_scene::{decode_scene, DecoderOptions};
//!
//! let data = std::fs::read("lara.scene").unwrap();
//! let document = decode_scene(&data, &DecoderOptions::default()).unwrap();
//! println!("{} items, version {}", document.items.len(), document.version);
//! ```

use std::{fs, path::Path};
use xps_utils::{AnyResult, AnyhowResultExt};

pub mod grammar;
pub mod pose;
pub mod transform;

mod builder;
pub use builder::*;
mod decoder;
pub use decoder::*;
mod document;
pub use document::*;
mod error;
pub use error::*;
mod options;
pub use options::*;
mod version;
pub use version::*;

/// Decodes a complete scene file held in memory.
pub fn decode_scene(data: &[u8], options: &DecoderOptions) -> Result<SceneDocument, DecodeError> {
    SceneDecoder::new(data, options.clone()).decode()
}

/// Reads the whole file into memory and decodes it.
pub fn load_scene_file(path: &Path, options: &DecoderOptions) -> AnyResult<SceneDocument> {
    let data = fs::read(path).otherwise_with(|| format!("couldn't read {}", path.display()))?;
    let document = decode_scene(&data, options)
        .otherwise_with(|| format!("couldn't decode {}", path.display()))?;
    Ok(document)
}
