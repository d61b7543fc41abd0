//! Ultrasound frame denoising: normalization, speckle-reducing anisotropic
//! diffusion, median + Laplacian-of-Gaussian cleanup, and scan-line region
//! selection. Every stage is a pure function over an `ndarray::Array2`.

pub mod consts;
pub mod error;
pub mod filters;
pub mod frame;
pub mod normalize;
pub mod pipeline;
pub mod quality;

pub use error::{Result, UltraspeckleError};
pub use filters::cleanup::{clean_frame, CleanupParams};
pub use filters::roi::{roi_select, RoiBounds};
pub use filters::srad::{srad, SradParams};
pub use normalize::{norm_check, normalize, RangeCheck};
