/// Infrastructure layer modules
///
/// This layer provides concrete implementations for external system interactions:
/// - File system operations (directory listing, config files)
/// - Cluster operations (kubectl, dry-run printer)
/// - Process execution (command runner with timeouts)
pub mod filesystem;
pub mod kubernetes;
pub mod process;

// Re-export commonly used types
pub use filesystem::{ConfigStore, EntryLister, WalkDirLister};
pub use kubernetes::{ClusterGateway, GatewayError, KubectlGateway, PrinterGateway};
pub use process::CommandExecutor;
