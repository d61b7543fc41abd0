use ndarray::Array2;
use num_traits::Float;

/// Total variation of a frame; lower means smoother.
///
/// Sum of absolute differences between each sample and its right and
/// lower neighbours.
pub fn total_variation<F: Float>(data: &Array2<F>) -> f64 {
    let (h, w) = data.dim();
    let mut sum = 0.0f64;

    for row in 0..h {
        for col in 0..w {
            let v = data[[row, col]].to_f64().unwrap_or(f64::NAN);
            if col + 1 < w {
                sum += (data[[row, col + 1]].to_f64().unwrap_or(f64::NAN) - v).abs();
            }
            if row + 1 < h {
                sum += (data[[row + 1, col]].to_f64().unwrap_or(f64::NAN) - v).abs();
            }
        }
    }

    sum
}
