//! Length units used by WordprocessingML
//!
//! Lengths are kept in EMU (English Metric Units) and converted to the unit
//! each attribute expects: twips (1/20 pt) for page setup, spacing and
//! indentation, half-points for font sizes.

/// EMU per centimetre
pub const EMU_PER_CM: i64 = 360_000;
/// EMU per point
pub const EMU_PER_PT: i64 = 12_700;
/// EMU per twip
pub const EMU_PER_TWIP: i64 = 635;

/// A length in EMU
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Length(i64);

impl Length {
    /// Zero length
    pub const ZERO: Length = Length(0);

    /// Length from centimetres
    pub fn cm(value: f64) -> Self {
        Self((value * EMU_PER_CM as f64).round() as i64)
    }

    /// Length from points
    pub fn pt(value: f64) -> Self {
        Self((value * EMU_PER_PT as f64).round() as i64)
    }

    /// Length from twips
    pub const fn from_twips(twips: i64) -> Self {
        Self(twips * EMU_PER_TWIP)
    }

    /// Value in twips, rounded to the nearest twip
    pub fn twips(self) -> i64 {
        (self.0 as f64 / EMU_PER_TWIP as f64).round() as i64
    }

    /// Value in half-points, rounded to the nearest half-point
    pub fn half_points(self) -> i64 {
        (self.0 as f64 / (EMU_PER_PT as f64 / 2.0)).round() as i64
    }

    /// Value in points
    pub fn points(self) -> f64 {
        self.0 as f64 / EMU_PER_PT as f64
    }
}
