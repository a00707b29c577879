use async_trait::async_trait;
use std::io::Write;
use std::sync::Mutex;

use super::gateway::{ClusterGateway, GatewayError};
use crate::domain::entities::Manifest;
use crate::domain::value_objects::NamespaceName;

/// Dry-run gateway that prints each operation instead of touching a cluster
///
/// Every call succeeds unless the output cannot be written.
pub struct PrinterGateway<W: Write + Send = std::io::Stdout> {
    out: Mutex<W>,
}

impl PrinterGateway<std::io::Stdout> {
    /// Print to standard output
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> PrinterGateway<W> {
    /// Print to the given writer
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    /// Take the writer back, e.g. to inspect captured output
    pub fn into_inner(self) -> W {
        match self.out.into_inner() {
            Ok(out) => out,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn print(&self, line: String) -> Result<(), GatewayError> {
        let mut out = self
            .out
            .lock()
            .map_err(|_| GatewayError::rejected("dry-run output lock poisoned"))?;
        writeln!(out, "{}", line)
            .and_then(|_| out.flush())
            .map_err(|e| GatewayError::rejected(format!("failed to write dry-run output: {}", e)))
    }
}

#[async_trait]
impl<W: Write + Send> ClusterGateway for PrinterGateway<W> {
    async fn ensure_namespace(&self, namespace: &NamespaceName) -> Result<(), GatewayError> {
        self.print(format!("namespace {}", namespace))
    }

    async fn apply_manifest(
        &self,
        namespace: &NamespaceName,
        manifest: &Manifest,
    ) -> Result<(), GatewayError> {
        self.print(format!(
            "namespace {} file {}",
            namespace,
            manifest.relative_path()
        ))
    }
}
