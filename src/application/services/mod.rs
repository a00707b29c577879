pub mod apply_planner;
pub mod manifest_classifier;
pub mod namespace_resolver;

pub use apply_planner::build_plan;
pub use manifest_classifier::classify_manifests;
pub use namespace_resolver::{resolve_namespace, NamespaceResolver, Unresolvable};
