//! 256-entry gamma lookup tables and the quantized key they are cached under.
//!
//! # Algorithm
//! For every 8-bit level `i`:
//! ```text
//! lut[i] = saturate((i / 255)^g × 255)
//! ```
//! where `saturate` rounds to the nearest integer and clamps to `[0, 255]`.
//! `powf(0, 0)` is 1, so `g = 0` yields a table of 255s with no special case.
//!
//! # Complexity
//! - Build: O(256) `powf` calls
//! - Apply: one table read per channel value

use std::fmt;

/// Number of entries in an 8-bit lookup table.
pub const LUT_SIZE: usize = 256;

/// A gamma exponent quantized to tenths (`2.04` → `20`).
///
/// Exponents that round to the same tenth share one table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LutKey(i32);

impl LutKey {
    /// Round `exponent × 10` to the nearest integer, halves away from zero.
    pub fn quantize(exponent: f64) -> Self {
        Self((exponent * 10.0).round() as i32)
    }

    pub const fn tenths(self) -> i32 {
        self.0
    }

    /// The exponent this key stands for; tables are built from it.
    pub fn exponent(self) -> f64 {
        f64::from(self.0) / 10.0
    }
}

impl fmt::Display for LutKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}", self.exponent())
    }
}

/// An immutable 8-bit → 8-bit power-curve table.
#[derive(Debug, Clone, PartialEq)]
pub struct GammaLut {
    exponent: f64,
    table: [u8; LUT_SIZE],
}

impl GammaLut {
    /// Evaluate the power curve at every 8-bit level.
    pub fn build(exponent: f64) -> Self {
        let mut table = [0u8; LUT_SIZE];
        for (i, entry) in table.iter_mut().enumerate() {
            let normalized = i as f64 / 255.0;
            *entry = saturate(normalized.powf(exponent) * 255.0);
        }
        Self { exponent, table }
    }

    /// Exponent the table was evaluated with.
    pub fn exponent(&self) -> f64 {
        self.exponent
    }

    #[inline]
    pub fn get(&self, level: u8) -> u8 {
        self.table[usize::from(level)]
    }

    pub fn as_array(&self) -> &[u8; LUT_SIZE] {
        &self.table
    }

    /// Map every value of `src` through the table into `dst`.
    ///
    /// Both slices must have the same length.
    pub fn map_into(&self, src: &[u8], dst: &mut [u8]) {
        debug_assert_eq!(src.len(), dst.len());
        for (out, &level) in dst.iter_mut().zip(src) {
            *out = self.table[usize::from(level)];
        }
    }
}

/// Round to nearest and clamp into the `u8` range. NaN maps to 0.
#[inline]
pub fn saturate(value: f64) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}
