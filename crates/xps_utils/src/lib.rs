//! Various utilities used by the XPS scene crates

pub mod color;
pub mod math;

mod ascii_display;
pub use ascii_display::*;

mod primitive_reader;
pub use primitive_reader::*;

mod result_ext;
pub use result_ext::AnyhowResultExt;

pub type AnyResult<T = (), E = anyhow::Error> = anyhow::Result<T, E>;

/// Shorthand for `Ok(())`, cause it looks ugly
pub const fn ok<E>() -> Result<(), E> {
    Ok(())
}

/// Generates a match statement that verifies a discriminant value as a single "expression".
///
/// ## Example
/// ```
/// # use xps_utils::discriminant_matches;
/// enum Example { Simple, Tupled(u32) }
///
/// let a = Example::Simple;
/// assert!(discriminant_matches!(a, Example::Simple));
///
/// // Tupled variants must match the parameters. Don't name them to not get warnings.
/// let b = Example::Tupled(123);
/// assert!(discriminant_matches!(b, Example::Tupled(_)));
/// ```
#[macro_export]
macro_rules! discriminant_matches {
    ($value:expr, $discriminant:pat) => {
        match $value {
            $discriminant => true,
            _ => false,
        }
    };
}
