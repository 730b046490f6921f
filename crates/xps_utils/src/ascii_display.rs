use std::fmt::{self, Display};

/// Wrapper type for displaying raw string bytes in log messages. Printable ASCII is shown as is,
/// anything else as `\xNN`, and `\` as `\\`. Long buffers are cut off after
/// [`AsciiDisplay::LIMIT`] bytes with a trailing `...`.
///
/// ## Example
/// ```
/// # use xps_utils::AsciiDisplay;
/// let a = AsciiDisplay(b"data\\Floor");
/// assert_eq!(a.to_string(), "data\\\\Floor");
///
/// let b = AsciiDisplay(b"\xEF\xBB\xBFab c");
/// assert_eq!(b.to_string(), "\\xEF\\xBB\\xBFab c");
/// ```
pub struct AsciiDisplay<'a>(pub &'a [u8]);

impl AsciiDisplay<'_> {
    pub const LIMIT: usize = 64;
}

impl<'a> From<&'a [u8]> for AsciiDisplay<'a> {
    fn from(value: &'a [u8]) -> Self {
        Self(value)
    }
}

impl Display for AsciiDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &byte in self.0.iter().take(Self::LIMIT) {
            match byte {
                b'\\' => f.write_str("\\\\")?,
                b' ' => f.write_str(" ")?,
                _ if byte.is_ascii_graphic() => write!(f, "{}", byte as char)?,
                _ => write!(f, r"\x{byte:02X}")?,
            }
        }
        if self.0.len() > Self::LIMIT {
            f.write_str("...")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::AsciiDisplay;

    #[test]
    fn long_buffers_are_cut() {
        let long = [b'a'; 100];
        let shown = AsciiDisplay(&long).to_string();
        assert_eq!(shown.len(), AsciiDisplay::LIMIT + 3);
        assert!(shown.ends_with("..."));
    }
}
