pub mod gateway;
pub mod kubectl;
pub mod printer;

// Re-export main types for convenience
pub use gateway::{ClusterGateway, GatewayError};
pub use kubectl::{KubectlConfig, KubectlGateway};
pub use printer::PrinterGateway;
