/// Minimum pixel count (h*w) to use row-level Rayon parallelism.
pub const PARALLEL_PIXEL_THRESHOLD: usize = 65_536;

/// Minimum frame count to use frame-level Rayon parallelism.
pub const PARALLEL_FRAME_THRESHOLD: usize = 4;

/// Default SRAD iteration count (Yu & Acton use 300).
pub const DEFAULT_SRAD_ITERATIONS: usize = 300;

/// Default SRAD time step, delta-t in Yu & Acton.
pub const DEFAULT_SRAD_LAMBDA: f64 = 0.05;

/// Largest time step for which the explicit SRAD update is stable.
/// Larger values are logged, not rejected.
pub const SRAD_STABILITY_LIMIT: f64 = 0.25;

/// Default side length of the square median window used by frame cleanup.
pub const DEFAULT_MEDIAN_RADIUS: usize = 6;

/// Default Laplacian-of-Gaussian sigma used by frame cleanup.
pub const DEFAULT_LOG_SIGMA: f64 = 4.0;

/// Gaussian kernels are truncated at this many standard deviations.
pub const GAUSSIAN_TRUNCATE: f64 = 4.0;
