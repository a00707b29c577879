use async_trait::async_trait;

use crate::domain::entities::Manifest;
use crate::domain::value_objects::NamespaceName;
use crate::infrastructure::process::CommandExecutorError;

/// Operations the orchestrator needs from a cluster
///
/// Both calls may be slow; callers must not assume any latency bound.
#[async_trait]
pub trait ClusterGateway: Send + Sync {
    /// Make sure the namespace exists, creating it if needed.
    ///
    /// Succeeds whether the namespace already existed or was just created.
    async fn ensure_namespace(&self, namespace: &NamespaceName) -> Result<(), GatewayError>;

    /// Apply one manifest's resources into the namespace
    async fn apply_manifest(
        &self,
        namespace: &NamespaceName,
        manifest: &Manifest,
    ) -> Result<(), GatewayError>;
}

/// Errors reported by a cluster gateway
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("Invalid namespace name '{name}': {reason}")]
    InvalidNamespace { name: String, reason: String },

    #[error("Command failed: {command}, exit code: {exit_code}, stderr: {stderr}")]
    CommandFailed {
        command: String,
        exit_code: i32,
        stderr: String,
    },

    #[error("Failed to run {command}: {source}")]
    Execution {
        command: String,
        #[source]
        source: CommandExecutorError,
    },

    #[error("{message}")]
    Rejected { message: String },
}

impl GatewayError {
    /// Create an invalid namespace error
    pub fn invalid_namespace(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidNamespace {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create a command failed error
    pub fn command_failed(
        command: impl Into<String>,
        exit_code: i32,
        stderr: impl Into<String>,
    ) -> Self {
        Self::CommandFailed {
            command: command.into(),
            exit_code,
            stderr: stderr.into(),
        }
    }

    /// Create an execution error
    pub fn execution(command: impl Into<String>, source: CommandExecutorError) -> Self {
        Self::Execution {
            command: command.into(),
            source,
        }
    }

    /// Create a generic rejection
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
        }
    }
}
