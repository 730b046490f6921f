use anyhow::anyhow;
use std::{error::Error, fmt::Display};

use crate::AnyResult;

/// Attaches a human readable context message to fallible values, turning them into
/// [`AnyResult`]s.
pub trait AnyhowResultExt<T> {
    fn otherwise(self, s: impl Display) -> AnyResult<T>;

    /// Lazy variant of [`Self::otherwise`], for messages that are expensive to format.
    fn otherwise_with<D: Display>(self, f: impl FnOnce() -> D) -> AnyResult<T>;
}

impl<T, E: Error + Send + Sync + 'static> AnyhowResultExt<T> for Result<T, E> {
    fn otherwise(self, s: impl Display) -> AnyResult<T> {
        self.map_err(|e| anyhow::Error::from(e).context(s.to_string()))
    }

    fn otherwise_with<D: Display>(self, f: impl FnOnce() -> D) -> AnyResult<T> {
        self.map_err(|e| anyhow::Error::from(e).context(f().to_string()))
    }
}

impl<T> AnyhowResultExt<T> for Option<T> {
    fn otherwise(self, s: impl Display) -> AnyResult<T> {
        self.ok_or_else(|| anyhow!("{s}"))
    }

    fn otherwise_with<D: Display>(self, f: impl FnOnce() -> D) -> AnyResult<T> {
        self.ok_or_else(|| anyhow!("{}", f()))
    }
}
