//! A probability in (0, 1], stored in log space.
//!
//! Zero is rejected at construction: a zero probability would silently
//! eliminate every Viterbi path passing through it, so smoothers must floor
//! their estimates instead.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum ProbabilityError {
    #[error("probability out of range (0, 1]: {0}")]
    OutOfRange(f64),
}

/// Probability value with its natural logarithm cached.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Probability {
    value: f64,
    ln: f64,
}

impl Probability {
    pub const ONE: Probability = Probability { value: 1.0, ln: 0.0 };

    pub fn new(value: f64) -> Result<Self, ProbabilityError> {
        if value.is_finite() && value > 0.0 && value <= 1.0 {
            Ok(Self {
                value,
                ln: value.ln(),
            })
        } else {
            Err(ProbabilityError::OutOfRange(value))
        }
    }

    /// Clamp into (0, 1], mapping anything at or below zero (and NaN) to `floor`.
    pub fn floored(value: f64, floor: Probability) -> Self {
        if value.is_nan() || value <= floor.value {
            floor
        } else if value >= 1.0 {
            Self::ONE
        } else {
            Self {
                value,
                ln: value.ln(),
            }
        }
    }

    pub fn value(self) -> f64 {
        self.value
    }

    /// Natural logarithm, always `<= 0`.
    pub fn ln(self) -> f64 {
        self.ln
    }
}

impl fmt::Display for Probability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}
