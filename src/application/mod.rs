//! Application layer: planning services and the apply use case
pub mod services;
pub mod use_cases;
