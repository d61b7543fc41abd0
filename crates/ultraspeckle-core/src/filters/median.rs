use std::cmp::Ordering;

use ndarray::{Array2, ArrayViewMut1, Axis};
use rayon::prelude::*;

use crate::consts::PARALLEL_PIXEL_THRESHOLD;
use crate::error::{Result, UltraspeckleError};
use crate::frame::Sample;

use super::reflect_index;

/// Spatial median filter over a square `size` x `size` window.
///
/// The window spans offsets `-size/2 ..= size - size/2 - 1` around each
/// pixel, so even sizes lean towards the top-left. For even windows the
/// upper of the two middle values is taken; no averaging happens, so the
/// output keeps the input's sample type. Borders are reflected.
///
/// Parallelizes at the row level for images >= 256x256.
pub fn median_filter<T: Sample>(frame: &Array2<T>, size: usize) -> Result<Array2<T>> {
    if size == 0 {
        return Err(UltraspeckleError::InvalidParameter(
            "median window size must be at least 1".into(),
        ));
    }
    let (h, w) = frame.dim();
    if h == 0 || w == 0 || size == 1 {
        return Ok(frame.clone());
    }

    let start = -((size / 2) as isize);
    let rank = size * size / 2;
    let mut result = frame.clone();

    let fill_row = |row: usize, mut out: ArrayViewMut1<T>| {
        let mut window: Vec<T> = Vec::with_capacity(size * size);
        for col in 0..w {
            window.clear();
            for dr in 0..size as isize {
                let src_row = reflect_index(row as isize + start + dr, h);
                for dc in 0..size as isize {
                    let src_col = reflect_index(col as isize + start + dc, w);
                    window.push(frame[[src_row, src_col]]);
                }
            }
            out[col] = select_rank(&mut window, rank);
        }
    };

    if h * w >= PARALLEL_PIXEL_THRESHOLD {
        result
            .axis_iter_mut(Axis(0))
            .into_par_iter()
            .enumerate()
            .for_each(|(row, out)| fill_row(row, out));
    } else {
        for (row, out) in result.axis_iter_mut(Axis(0)).enumerate() {
            fill_row(row, out);
        }
    }

    Ok(result)
}

/// O(n) selection of the `rank`-th smallest value.
fn select_rank<T: Sample>(values: &mut [T], rank: usize) -> T {
    *values
        .select_nth_unstable_by(rank, |a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal))
        .1
}
