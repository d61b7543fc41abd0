use std::fmt::Debug;

use ndarray::Array2;
use num_traits::{Bounded, Float, NumCast};

/// Element type of an ultrasound frame.
///
/// Frames arrive from acquisition storage as integer or float arrays. The
/// filtering stages need to know whether a frame already holds real-valued
/// samples and what the largest representable value of its type is.
pub trait Sample: Copy + PartialOrd + Bounded + NumCast + Debug + Send + Sync + 'static {
    /// Human-readable element type name, used in error messages.
    const DTYPE: &'static str;
    /// Whether the type is a floating-point representation.
    const IS_FLOAT: bool;
}

macro_rules! impl_sample {
    ($($t:ty => $is_float:expr),* $(,)?) => {
        $(
            impl Sample for $t {
                const DTYPE: &'static str = stringify!($t);
                const IS_FLOAT: bool = $is_float;
            }
        )*
    };
}

impl_sample! {
    u8 => false,
    u16 => false,
    u32 => false,
    i8 => false,
    i16 => false,
    i32 => false,
    i64 => false,
    f32 => true,
    f64 => true,
}

/// Coerce a frame of any sample type to floating point.
///
/// Values that cannot be represented in `F` become NaN.
pub fn to_float<T: Sample, F: Float>(frame: &Array2<T>) -> Array2<F> {
    frame.mapv(|v| F::from(v).unwrap_or_else(F::nan))
}

/// Minimum and maximum sample of a frame, or `None` for an empty frame.
///
/// NaN samples are skipped.
pub fn min_max<F: Float>(frame: &Array2<F>) -> Option<(F, F)> {
    frame
        .iter()
        .filter(|v| !v.is_nan())
        .fold(None, |acc, &v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}
