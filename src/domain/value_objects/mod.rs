pub mod namespace_name;

pub use namespace_name::{NamespaceName, NamespaceNameError};
