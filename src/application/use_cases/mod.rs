pub mod apply_path;

pub use apply_path::{ApplyPathConfig, ApplyPathError, ApplyPathUseCase};
