use ndarray::Array2;
use num_traits::{Float, ToPrimitive};
use serde::{Deserialize, Serialize};

use crate::error::{Result, UltraspeckleError};
use crate::frame::{min_max, Sample};

/// How `norm_check_with` decides whether a frame lies in [0, 1].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RangeCheck {
    /// Every sample must satisfy `0 <= v <= 1`.
    #[default]
    Strict,
    /// Historical guard: rejects only when some sample is negative *and*
    /// every sample is at most one. Frames with values above one pass as
    /// long as nothing is negative.
    Legacy,
}

impl std::fmt::Display for RangeCheck {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Strict => write!(f, "Strict"),
            Self::Legacy => write!(f, "Legacy"),
        }
    }
}

/// Rescale a frame to [0, 1] using its own minimum and maximum.
///
/// A constant frame divides by zero and yields NaN everywhere; use
/// [`try_normalize`] when the input is not known to vary.
pub fn normalize<F: Float>(frame: &Array2<F>) -> Array2<F> {
    let Some((mn, mx)) = min_max(frame) else {
        return frame.clone();
    };
    let range = mx - mn;
    frame.mapv(|v| (v - mn) / range)
}

/// Like [`normalize`], but rejects empty and constant frames.
pub fn try_normalize<F: Float>(frame: &Array2<F>) -> Result<Array2<F>> {
    let (mn, mx) = min_max(frame).ok_or_else(|| {
        UltraspeckleError::InvalidParameter("cannot normalize an empty frame".into())
    })?;
    if mx <= mn {
        return Err(UltraspeckleError::DegenerateFrame {
            value: mn.to_f64().unwrap_or(f64::NAN),
        });
    }
    Ok(normalize(frame))
}

/// Check that a frame holds floats normalized to [0, 1].
pub fn norm_check<T: Sample>(frame: &Array2<T>) -> Result<()> {
    norm_check_with(frame, RangeCheck::Strict)
}

/// Check that a frame holds floats normalized to [0, 1] under `policy`.
///
/// Non-float frames fail with [`UltraspeckleError::NotFloat`] before any
/// range test runs.
pub fn norm_check_with<T: Sample>(frame: &Array2<T>, policy: RangeCheck) -> Result<()> {
    if !T::IS_FLOAT {
        return Err(UltraspeckleError::NotFloat { dtype: T::DTYPE });
    }

    let values = || frame.iter().map(|v| v.to_f64().unwrap_or(f64::NAN));
    let all_non_negative = values().all(|v| v >= 0.0);
    let all_at_most_one = values().all(|v| v <= 1.0);

    let rejected = match policy {
        RangeCheck::Strict => !(all_non_negative && all_at_most_one),
        RangeCheck::Legacy => !all_non_negative && all_at_most_one,
    };

    if rejected {
        let (min, max) = values().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
        return Err(UltraspeckleError::NotNormalized { min, max });
    }
    Ok(())
}
