use ndarray::{s, Array2};
use num_traits::Zero;
use serde::{Deserialize, Serialize};

use crate::error::{Result, UltraspeckleError};
use crate::frame::Sample;

/// Band of scan lines `[lower, upper)` kept by region selection.
///
/// `lower` is the bound closer to the probe. In scan-converted images the
/// band becomes the area between two arcs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoiBounds {
    pub lower: usize,
    pub upper: usize,
}

impl RoiBounds {
    pub fn new(lower: usize, upper: usize) -> Self {
        Self { lower, upper }
    }

    /// Check the band against a frame with `rows` rows.
    pub fn validated(&self, rows: usize) -> Result<RoiBounds> {
        if self.lower >= self.upper {
            return Err(UltraspeckleError::InvalidRoi {
                lower: self.lower,
                upper: self.upper,
            });
        }
        if self.upper > rows {
            return Err(UltraspeckleError::RoiOutOfBounds {
                upper: self.upper,
                rows,
            });
        }
        Ok(*self)
    }

    /// Zero every row outside the band.
    pub fn apply<T: Sample + Zero>(&self, frame: &Array2<T>) -> Result<Array2<T>> {
        roi_select(frame, self.lower, self.upper)
    }
}

/// Keep rows `[lower, upper)` of a frame and zero the rest.
///
/// The output has the input's shape and sample type.
pub fn roi_select<T: Sample + Zero>(frame: &Array2<T>, lower: usize, upper: usize) -> Result<Array2<T>> {
    roi_select_with_fill(frame, lower, upper, T::zero())
}

/// Keep rows `[lower, upper)` of a frame and set the rest to `fill`.
pub fn roi_select_with_fill<T: Sample>(
    frame: &Array2<T>,
    lower: usize,
    upper: usize,
    fill: T,
) -> Result<Array2<T>> {
    let bounds = RoiBounds::new(lower, upper).validated(frame.nrows())?;

    let mut region = Array2::from_elem(frame.dim(), fill);
    region
        .slice_mut(s![bounds.lower..bounds.upper, ..])
        .assign(&frame.slice(s![bounds.lower..bounds.upper, ..]));

    Ok(region)
}
