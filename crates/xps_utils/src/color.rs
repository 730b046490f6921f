use serde::Serialize;

/// Plain 8-bit per channel color, as stored in scene files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct RGB8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl RGB8 {
    pub const WHITE: RGB8 = RGB8::new(255, 255, 255);
    pub const BLACK: RGB8 = RGB8::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Converts the color into normalized `[0, 1]` floats.
    ///
    /// ## Example
    /// ```
    /// use xps_utils::color::RGB8;
    /// assert_eq!(RGB8::new(255, 0, 51).to_normalized(), [1.0, 0.0, 0.2]);
    /// ```
    pub fn to_normalized(self) -> [f32; 3] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        ]
    }
}

impl From<[u8; 3]> for RGB8 {
    #[inline]
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self { r, g, b }
    }
}

impl From<RGB8> for [u8; 3] {
    #[inline]
    fn from(value: RGB8) -> Self {
        [value.r, value.g, value.b]
    }
}
