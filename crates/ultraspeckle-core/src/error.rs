use thiserror::Error;

#[derive(Error, Debug)]
pub enum UltraspeckleError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid pipeline config: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Input data must be float arrays (got {dtype})")]
    NotFloat { dtype: &'static str },

    #[error("Input data must be normalized to range 0,1 (observed {min}..{max})")]
    NotNormalized { min: f64, max: f64 },

    #[error("Cannot normalize a constant frame (every sample is {value})")]
    DegenerateFrame { value: f64 },

    #[error("ROI lower bound must be below upper bound (lower {lower}, upper {upper})")]
    InvalidRoi { lower: usize, upper: usize },

    #[error("ROI upper bound {upper} exceeds frame height {rows}")]
    RoiOutOfBounds { upper: usize, rows: usize },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Cancelled after {completed} of {total} iterations")]
    Cancelled { completed: usize, total: usize },
}

impl UltraspeckleError {
    /// Wrong element representation for the requested arithmetic.
    pub fn is_type_error(&self) -> bool {
        matches!(self, Self::NotFloat { .. })
    }

    /// Values or bounds outside the domain a stage accepts.
    pub fn is_value_error(&self) -> bool {
        matches!(
            self,
            Self::NotNormalized { .. }
                | Self::DegenerateFrame { .. }
                | Self::InvalidRoi { .. }
                | Self::RoiOutOfBounds { .. }
                | Self::InvalidParameter(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, UltraspeckleError>;
