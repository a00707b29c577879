pub mod error;
pub mod result;

pub use error::GkError;
pub use result::GkResult;
