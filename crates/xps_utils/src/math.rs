use serde::Serialize;

/// Type-safe wrapper for an angle specified in radians, so that you don't
/// make the mistake of passing in degrees.
///
/// Included is [`AngleExt`] which allows to use `.radians()` and `.degrees()`
/// on f32 values and literals.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize)]
pub struct Radians(pub f32);

impl Radians {
    #[inline]
    pub fn from_radians(r: f32) -> Self {
        Self(r)
    }

    #[inline]
    pub fn from_degrees(r: f32) -> Self {
        Self(r.to_radians())
    }

    #[inline]
    pub fn to_radians(self) -> f32 {
        self.0
    }

    #[inline]
    pub fn to_degrees(self) -> f32 {
        self.0.to_degrees()
    }
}

pub trait AngleExt {
    /// Interprets this float as a radian angle value
    fn radians(self) -> Radians;
    /// Interprets this float as a degree angle value
    fn degrees(self) -> Radians;
}

impl AngleExt for f32 {
    #[inline]
    fn radians(self) -> Radians {
        Radians::from_radians(self)
    }

    #[inline]
    fn degrees(self) -> Radians {
        Radians::from_degrees(self)
    }
}

/// Rounds the value to the given amount of decimal places. The math is done in `f64`, so the
/// result is the `f32` closest to the rounded decimal.
///
/// ## Example
/// ```
/// use xps_utils::math::round_to;
/// assert_eq!(round_to(0.123456, 2), 0.12);
/// assert_eq!(round_to(-1.005, 0), -1.0);
/// ```
pub fn round_to(value: f32, digits: u32) -> f32 {
    let factor = 10f64.powi(digits as i32);
    ((value as f64 * factor).round() / factor) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn angle_conversions() {
        assert_eq!(90f32.degrees().to_radians(), std::f32::consts::FRAC_PI_2);
        assert_eq!(1.5f32.radians().to_radians(), 1.5);
        assert!((Radians(std::f32::consts::PI).to_degrees() - 180.0).abs() < 1e-4);
    }

    #[test]
    fn rounding_stays_within_precision() {
        for (value, digits) in [(0.333333, 2), (12.345678, 4), (-0.987654321, 6), (5.0, 0)] {
            let rounded = round_to(value, digits);
            assert!(((value as f64) - (rounded as f64)).abs() < 10f64.powi(-(digits as i32)));
        }
    }
}
