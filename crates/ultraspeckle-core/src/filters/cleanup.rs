use ndarray::{Array2, Zip};
use num_traits::{Bounded, Float};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::consts::{DEFAULT_LOG_SIGMA, DEFAULT_MEDIAN_RADIUS};
use crate::error::Result;
use crate::frame::{to_float, Sample};
use crate::normalize::{norm_check_with, RangeCheck};

use super::gaussian_laplace::gaussian_laplace;
use super::median::median_filter;

/// Parameters for post-SRAD cleanup.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanupParams {
    /// Side length of the square median window (default: 6).
    pub median_radius: usize,
    /// Sigma of the Laplacian-of-Gaussian sharpening mask (default: 4.0).
    pub log_sigma: f64,
    /// Range test applied to the input before filtering (default: Strict).
    pub range_check: RangeCheck,
}

impl Default for CleanupParams {
    fn default() -> Self {
        Self {
            median_radius: DEFAULT_MEDIAN_RADIUS,
            log_sigma: DEFAULT_LOG_SIGMA,
            range_check: RangeCheck::default(),
        }
    }
}

/// Median-filter a diffused frame, then add a Laplacian-of-Gaussian mask.
///
/// The mask is inverted against the largest value of `T` and any pixel
/// above the inverted mask is clamped to it before the mask is added back,
/// so the addition cannot overflow `T`.
pub fn clean_frame<T>(frame: &Array2<T>, params: &CleanupParams) -> Result<Array2<T>>
where
    T: Sample + Float,
{
    norm_check_with(frame, params.range_check)?;

    let mut cleaned = median_filter(frame, params.median_radius)?;

    let mask = gaussian_laplace(&to_float::<T, f64>(&cleaned), params.log_sigma)?;
    let ceil = <T as Bounded>::max_value();
    let log_mask: Array2<T> = mask.mapv(|m| ceil - T::from(m).unwrap_or_else(T::nan));

    Zip::from(&mut cleaned).and(&log_mask).for_each(|c, &lm| {
        if lm < *c {
            *c = lm;
        }
    });
    Zip::from(&mut cleaned)
        .and(&log_mask)
        .for_each(|c, &lm| *c = *c + (ceil - lm));

    debug!(
        median = params.median_radius,
        sigma = params.log_sigma,
        "Frame cleanup complete"
    );
    Ok(cleaned)
}
