use std::sync::atomic::{AtomicBool, Ordering};

use ndarray::Array2;
use num_traits::Float;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::consts::{DEFAULT_SRAD_ITERATIONS, DEFAULT_SRAD_LAMBDA, SRAD_STABILITY_LIMIT};
use crate::error::{Result, UltraspeckleError};
use crate::normalize::normalize;

/// Parameters for speckle-reducing anisotropic diffusion.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SradParams {
    /// Number of diffusion iterations (default: 300). Always run in full.
    pub iterations: usize,
    /// Time step of the explicit update (default: 0.05). Values above 0.25
    /// make the update unstable; this is not validated.
    pub lambda: f64,
}

impl Default for SradParams {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_SRAD_ITERATIONS,
            lambda: DEFAULT_SRAD_LAMBDA,
        }
    }
}

/// Neumann boundary index maps for an axis of length `n`.
///
/// Returns `(before, after)`: `before[i]` is the index of the preceding
/// sample (north / west) and `after[i]` of the following one (south / east).
/// The first and last entries map to themselves.
pub fn neighbor_indices(n: usize) -> (Vec<usize>, Vec<usize>) {
    let last = n.saturating_sub(1);
    let before = (0..n).map(|i| i.saturating_sub(1)).collect();
    let after = (0..n).map(|i| (i + 1).min(last)).collect();
    (before, after)
}

/// Speckle-reducing anisotropic diffusion (Yu & Acton, 2002).
///
/// The frame is rescaled to [0, 1], exponentiated, diffused for
/// `params.iterations` steps, and log-compressed again. Output is in the
/// log domain with the same shape as the input.
pub fn srad<F: Float>(frame: &Array2<F>, params: &SradParams) -> Array2<F> {
    diffuse_normalized(&normalize(frame), params)
}

/// Run SRAD on a frame that is already normalized to [0, 1].
pub fn diffuse_normalized<F: Float>(normalized: &Array2<F>, params: &SradParams) -> Array2<F> {
    let mut diffusion = Diffusion::new(normalized, params);
    for _ in 0..params.iterations {
        diffusion.step();
    }
    diffusion.finish()
}

/// [`srad`] with a cancellation flag checked before every iteration.
///
/// Returns [`UltraspeckleError::Cancelled`] once the flag is observed set.
/// Iterations that did run are numerically identical to [`srad`].
pub fn srad_cancellable<F: Float>(
    frame: &Array2<F>,
    params: &SradParams,
    cancel: &AtomicBool,
) -> Result<Array2<F>> {
    diffuse_normalized_cancellable(&normalize(frame), params, cancel)
}

pub(crate) fn diffuse_normalized_cancellable<F: Float>(
    normalized: &Array2<F>,
    params: &SradParams,
    cancel: &AtomicBool,
) -> Result<Array2<F>> {
    let mut diffusion = Diffusion::new(normalized, params);
    for completed in 0..params.iterations {
        if cancel.load(Ordering::Relaxed) {
            debug!(completed, total = params.iterations, "SRAD cancelled");
            return Err(UltraspeckleError::Cancelled {
                completed,
                total: params.iterations,
            });
        }
        diffusion.step();
    }
    Ok(diffusion.finish())
}

/// Working state for one SRAD call.
///
/// `image` holds the exponentiated intensities; `next` and `coeff` are
/// scratch buffers reused across iterations.
struct Diffusion<F> {
    image: Array2<F>,
    next: Array2<F>,
    coeff: Array2<F>,
    north: Vec<usize>,
    south: Vec<usize>,
    west: Vec<usize>,
    east: Vec<usize>,
    step: F,
    eps: F,
}

impl<F: Float> Diffusion<F> {
    fn new(normalized: &Array2<F>, params: &SradParams) -> Self {
        let (rows, cols) = normalized.dim();
        if params.lambda > SRAD_STABILITY_LIMIT {
            warn!(
                lambda = params.lambda,
                limit = SRAD_STABILITY_LIMIT,
                "SRAD lambda above stability limit, update may diverge"
            );
        }
        debug!(rows, cols, iterations = params.iterations, lambda = params.lambda, "Running SRAD");

        let (north, south) = neighbor_indices(rows);
        let (west, east) = neighbor_indices(cols);

        // Log uncompress
        let image = normalized.mapv(F::exp);

        Self {
            next: Array2::zeros((rows, cols)),
            coeff: Array2::zeros((rows, cols)),
            image,
            north,
            south,
            west,
            east,
            step: cast::<F>(params.lambda) / cast(4.0),
            // Fixed machine epsilon of F; f64::EPSILON for double frames.
            eps: F::epsilon(),
        }
    }

    /// Directional differences (N, S, W, E) at `(r, c)`.
    #[inline]
    fn differences(&self, r: usize, c: usize) -> (F, F, F, F) {
        let i = self.image[[r, c]];
        (
            self.image[[self.north[r], c]] - i,
            self.image[[self.south[r], c]] - i,
            self.image[[r, self.west[c]]] - i,
            self.image[[r, self.east[c]]] - i,
        )
    }

    fn step(&mut self) {
        let (rows, cols) = self.image.dim();
        if rows == 0 || cols == 0 {
            return;
        }
        let n = cast::<F>((rows * cols) as f64);

        // Speckle scale function over the whole image.
        let mean = self.image.iter().fold(F::zero(), |acc, &v| acc + v) / n;
        let var = self
            .image
            .iter()
            .fold(F::zero(), |acc, &v| acc + (v - mean) * (v - mean))
            / n;
        let q0_squared = var / (mean * mean);

        let half = cast::<F>(0.5);
        let sixteenth = cast::<F>(1.0 / 16.0);
        let quarter = cast::<F>(0.25);
        let one = F::one();

        for r in 0..rows {
            for c in 0..cols {
                let i = self.image[[r, c]];
                let (dn, ds, dw, de) = self.differences(r, c);

                // Normalized gradient magnitude squared and Laplacian.
                let g2 = (dn * dn + ds * ds + dw * dw + de * de) / (i * i);
                let l = (dn + ds + dw + de) / i;

                // Instantaneous coefficient of variation.
                let num = half * g2 - sixteenth * l * l;
                let den = (one + quarter * l) * (one + quarter * l);
                let q_squared = num / (den + self.eps);

                let den = (q_squared - q0_squared) / (q0_squared * (q0_squared + one) + self.eps);
                let coeff = one / (den + one);

                // Saturate: negative stops diffusion, positive diffuses fully.
                self.coeff[[r, c]] = if coeff < F::zero() {
                    F::zero()
                } else if coeff > F::zero() {
                    one
                } else {
                    coeff
                };
            }
        }

        for r in 0..rows {
            for c in 0..cols {
                let (dn, ds, dw, de) = self.differences(r, c);
                let coeff = self.coeff[[r, c]];
                let coeff_s = self.coeff[[self.south[r], c]];
                let coeff_e = self.coeff[[r, self.east[c]]];

                let divergence = coeff * dn + coeff_s * ds + coeff * dw + coeff_e * de;
                self.next[[r, c]] = self.image[[r, c]] + self.step * divergence;
            }
        }

        std::mem::swap(&mut self.image, &mut self.next);
    }

    /// Log (re)compress.
    fn finish(self) -> Array2<F> {
        self.image.mapv(F::ln)
    }
}

fn cast<F: Float>(v: f64) -> F {
    F::from(v).unwrap_or_else(F::nan)
}
