//! Floating point precision tag shared by all decomposition entry points.

use crate::error::DecompError;

/// Precision of the arithmetic used for a decomposition call.
///
/// The tag is fixed for the whole call: inputs are evaluated, the solver
/// runs, and results are produced at the selected width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precision {
    /// 32-bit floats.
    Single,
    /// 64-bit floats.
    Double,
}

impl Precision {
    /// Build a precision tag from a float bit width.
    ///
    /// Anything other than 32 or 64 is rejected before any solver call.
    pub fn from_bit_width(bits: usize) -> Result<Self, DecompError> {
        match bits {
            32 => Ok(Precision::Single),
            64 => Ok(Precision::Double),
            other => Err(DecompError::UnsupportedPrecision(other)),
        }
    }

    /// The float bit width of this precision.
    pub fn bit_width(&self) -> usize {
        match self {
            Precision::Single => 32,
            Precision::Double => 64,
        }
    }

    /// Default number of solver sweeps for the 3x3 path.
    ///
    /// The counts trade accuracy for bounded, input-independent cost:
    /// 5 sweeps in single precision, 8 in double.
    pub fn default_sweeps(&self) -> u32 {
        match self {
            Precision::Single => 5,
            Precision::Double => 8,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_width_roundtrip() {
        assert_eq!(Precision::from_bit_width(32), Ok(Precision::Single));
        assert_eq!(Precision::from_bit_width(64), Ok(Precision::Double));
        assert_eq!(Precision::Single.bit_width(), 32);
        assert_eq!(Precision::Double.bit_width(), 64);
    }

    #[test]
    fn test_unsupported_bit_width() {
        assert_eq!(
            Precision::from_bit_width(16),
            Err(DecompError::UnsupportedPrecision(16))
        );
    }

    #[test]
    fn test_default_sweeps() {
        assert_eq!(Precision::Single.default_sweeps(), 5);
        assert_eq!(Precision::Double.default_sweeps(), 8);
    }
}
