use ndarray::Array2;

/// Deterministic xorshift generator so noisy fixtures are reproducible.
pub struct XorShift(u64);

impl XorShift {
    pub fn new(seed: u64) -> Self {
        Self(seed.max(1))
    }

    /// Uniform sample in [0, 1).
    pub fn next_f64(&mut self) -> f64 {
        self.0 ^= self.0 << 13;
        self.0 ^= self.0 >> 7;
        self.0 ^= self.0 << 17;
        (self.0 >> 11) as f64 / (1u64 << 53) as f64
    }
}

pub fn make_frame(h: usize, w: usize, fill: f64) -> Array2<f64> {
    Array2::from_elem((h, w), fill)
}

/// Linear ramp in [0, 1).
pub fn make_ramp_frame(h: usize, w: usize) -> Array2<f64> {
    Array2::from_shape_fn((h, w), |(row, col)| (row * w + col) as f64 / (h * w) as f64)
}

/// Clean B-mode-like pattern: dim background with a bright curved band,
/// roughly where a tongue surface would sit.
pub fn make_tongue_frame(h: usize, w: usize) -> Array2<f64> {
    Array2::from_shape_fn((h, w), |(row, col)| {
        let x = col as f64 / w as f64;
        let surface = h as f64 * (0.35 + 0.2 * (x * std::f64::consts::PI).sin());
        let dist = (row as f64 - surface).abs();
        if dist < 3.0 {
            200.0
        } else {
            60.0 + 20.0 * x
        }
    })
}

/// Apply multiplicative speckle: `pixel * (1 + noise)`, noise uniform in
/// `[-amplitude, amplitude]`.
pub fn add_speckle(base: &Array2<f64>, amplitude: f64, seed: u64) -> Array2<f64> {
    let mut rng = XorShift::new(seed);
    base.mapv(|v| v * (1.0 + amplitude * (2.0 * rng.next_f64() - 1.0)))
}

pub fn speckle_frame(h: usize, w: usize, seed: u64) -> Array2<f64> {
    add_speckle(&make_tongue_frame(h, w), 0.3, seed)
}
