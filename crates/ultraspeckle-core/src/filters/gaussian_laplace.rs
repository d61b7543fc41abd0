use ndarray::{Array2, ArrayViewMut1, Axis};
use rayon::prelude::*;

use crate::consts::{GAUSSIAN_TRUNCATE, PARALLEL_PIXEL_THRESHOLD};
use crate::error::{Result, UltraspeckleError};

use super::reflect_index;

/// Laplacian of Gaussian of a frame.
///
/// Sum of the second Gaussian derivative along each axis, computed with
/// separable 1D correlations and reflected boundaries. The response is
/// negative on bright blobs and positive just outside them.
pub fn gaussian_laplace(data: &Array2<f64>, sigma: f64) -> Result<Array2<f64>> {
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(UltraspeckleError::InvalidParameter(format!(
            "LoG sigma must be positive and finite, got {sigma}"
        )));
    }
    let (h, w) = data.dim();
    if h == 0 || w == 0 {
        return Ok(data.clone());
    }

    let radius = (GAUSSIAN_TRUNCATE * sigma + 0.5) as usize;
    let smooth = make_gaussian_kernel(sigma, radius);
    let second = make_second_derivative_kernel(sigma, &smooth);

    let d2_rows = correlate_axis(&correlate_axis(data, &second, Axis(0)), &smooth, Axis(1));
    let d2_cols = correlate_axis(&correlate_axis(data, &smooth, Axis(0)), &second, Axis(1));

    Ok(d2_rows + d2_cols)
}

fn make_gaussian_kernel(sigma: f64, radius: usize) -> Vec<f64> {
    let size = 2 * radius + 1;
    let mut kernel = vec![0.0f64; size];
    let s2 = 2.0 * sigma * sigma;
    let mut sum = 0.0f64;

    for (i, k) in kernel.iter_mut().enumerate() {
        let x = i as f64 - radius as f64;
        *k = (-x * x / s2).exp();
        sum += *k;
    }

    for v in &mut kernel {
        *v /= sum;
    }

    kernel
}

/// `(x^2 / sigma^4 - 1 / sigma^2) * g(x)` over the normalized Gaussian `g`.
fn make_second_derivative_kernel(sigma: f64, gaussian: &[f64]) -> Vec<f64> {
    let radius = gaussian.len() / 2;
    let s2 = sigma * sigma;
    let s4 = s2 * s2;

    gaussian
        .iter()
        .enumerate()
        .map(|(i, &g)| {
            let x = i as f64 - radius as f64;
            (x * x / s4 - 1.0 / s2) * g
        })
        .collect()
}

/// Correlate every row (`Axis(1)`) or column (`Axis(0)`) with a symmetric kernel.
fn correlate_axis(data: &Array2<f64>, kernel: &[f64], axis: Axis) -> Array2<f64> {
    let (h, w) = data.dim();
    let radius = kernel.len() / 2;
    let mut result = Array2::<f64>::zeros((h, w));

    let fill_row = |row: usize, mut out: ArrayViewMut1<f64>| {
        for col in 0..w {
            let mut sum = 0.0f64;
            for (ki, &kv) in kernel.iter().enumerate() {
                let offset = ki as isize - radius as isize;
                let v = if axis == Axis(0) {
                    data[[reflect_index(row as isize + offset, h), col]]
                } else {
                    data[[row, reflect_index(col as isize + offset, w)]]
                };
                sum += v * kv;
            }
            out[col] = sum;
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

    result
}
