//! # gk - namespace-grouped manifest apply
//!
//! `gk` walks a directory tree, treats every top-level subdirectory as a
//! Kubernetes namespace and applies each `*.yaml` / `*.yml` file below it
//! into that namespace. Namespaces are created on demand before their
//! manifests are applied.
//!
//! ```text
//! manifests/
//! ├── readme.txt            ignored
//! ├── team-a/
//! │   ├── deploy.yaml       -> namespace team-a
//! │   └── sub/svc.yml       -> namespace team-a
//! └── team-b/
//!     └── cfg.YAML          -> namespace team-b
//! ```
//!
//! A failure in one namespace or file never stops the rest of the run.
//! Every outcome ends up in a [`domain::entities::RunReport`], and the run
//! as a whole fails if any single operation failed.
//!
//! ## Architecture
//!
//! - [`domain`]: Entries, manifests, the apply plan and the run report
//! - [`application`]: Classification, namespace resolution, planning and the apply use case
//! - [`infrastructure`]: Directory listing, kubectl and dry-run gateways, config files
//! - [`presentation`]: CLI interface and terminal output
//! - [`common`]: Shared error handling
//!
//! ## Using the Library
//!
//! ```rust,no_run
//! use std::path::Path;
//! use std::sync::Arc;
//! use gk::application::use_cases::{ApplyPathConfig, ApplyPathUseCase};
//! use gk::infrastructure::{PrinterGateway, WalkDirLister};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let use_case = ApplyPathUseCase::new(
//!     Arc::new(WalkDirLister::new()),
//!     Arc::new(PrinterGateway::stdout()),
//!     ApplyPathConfig::new(),
//! );
//!
//! let report = use_case.execute(Path::new("manifests")).await?;
//! println!("{}", report.summary_line());
//! # Ok(())
//! # }
//! ```

pub mod application;
pub mod common;
pub mod domain;
pub mod infrastructure;
pub mod presentation;

// Re-export commonly used types for convenience
pub use crate::common::error::GkError;
pub use crate::common::result::GkResult as Result;
