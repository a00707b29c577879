use async_trait::async_trait;
use regex::Regex;
use std::path::PathBuf;
use std::sync::OnceLock;
use tracing::debug;

use super::gateway::{ClusterGateway, GatewayError};
use crate::domain::entities::Manifest;
use crate::domain::value_objects::NamespaceName;
use crate::infrastructure::process::{CommandExecutor, ExecutionConfig, ExecutionResult};

/// Maximum length of a Kubernetes namespace name
const MAX_NAMESPACE_LENGTH: usize = 63;

fn namespace_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[a-z0-9]([-a-z0-9]*[a-z0-9])?$").expect("namespace pattern is valid")
    })
}

/// Settings for invoking kubectl
#[derive(Debug, Clone)]
pub struct KubectlConfig {
    /// kubectl executable name or path
    pub executable: String,

    /// kubeconfig context to use
    pub context: Option<String>,

    /// Explicit kubeconfig file
    pub kubeconfig: Option<PathBuf>,

    /// Timeout for each kubectl invocation in seconds
    pub timeout_seconds: Option<u64>,
}

impl Default for KubectlConfig {
    fn default() -> Self {
        Self {
            executable: "kubectl".to_string(),
            context: None,
            kubeconfig: None,
            timeout_seconds: None,
        }
    }
}

impl KubectlConfig {
    /// Create a config with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom kubectl executable
    pub fn with_executable(mut self, executable: impl Into<String>) -> Self {
        self.executable = executable.into();
        self
    }

    /// Use a specific kubeconfig context
    pub fn with_context(mut self, context: Option<String>) -> Self {
        self.context = context;
        self
    }

    /// Use a specific kubeconfig file
    pub fn with_kubeconfig(mut self, kubeconfig: Option<PathBuf>) -> Self {
        self.kubeconfig = kubeconfig;
        self
    }

    /// Limit each kubectl invocation
    pub fn with_timeout(mut self, timeout_seconds: Option<u64>) -> Self {
        self.timeout_seconds = timeout_seconds;
        self
    }
}

/// Cluster gateway backed by the kubectl CLI
pub struct KubectlGateway {
    config: KubectlConfig,
}

impl Default for KubectlGateway {
    fn default() -> Self {
        Self::new(KubectlConfig::default())
    }
}

impl KubectlGateway {
    /// Create a new kubectl gateway
    pub fn new(config: KubectlConfig) -> Self {
        Self { config }
    }

    /// Gateway settings
    pub fn config(&self) -> &KubectlConfig {
        &self.config
    }

    /// Check that the namespace is a valid RFC 1123 label
    pub fn validate_namespace(namespace: &NamespaceName) -> Result<(), GatewayError> {
        let name = namespace.as_str();

        if name.len() > MAX_NAMESPACE_LENGTH {
            return Err(GatewayError::invalid_namespace(
                name,
                format!("must be at most {} characters", MAX_NAMESPACE_LENGTH),
            ));
        }

        if !namespace_pattern().is_match(name) {
            return Err(GatewayError::invalid_namespace(
                name,
                "must consist of lowercase alphanumerics or '-', and start and end with an alphanumeric",
            ));
        }

        Ok(())
    }

    /// Global arguments placed before every subcommand
    fn global_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        if let Some(context) = &self.config.context {
            args.push("--context".to_string());
            args.push(context.clone());
        }
        if let Some(kubeconfig) = &self.config.kubeconfig {
            args.push("--kubeconfig".to_string());
            args.push(kubeconfig.display().to_string());
        }
        args
    }

    /// Run kubectl and return the raw result
    async fn run(&self, subcommand: &[&str]) -> Result<(String, ExecutionResult), GatewayError> {
        let mut args = self.global_args();
        args.extend(subcommand.iter().map(|s| s.to_string()));

        let command = CommandExecutor::display_command(&self.config.executable, &args);
        let execution =
            ExecutionConfig::new().with_optional_timeout(self.config.timeout_seconds);

        let result = CommandExecutor::execute(&self.config.executable, &args, &execution)
            .await
            .map_err(|e| GatewayError::execution(command.clone(), e))?;

        for line in result.stdout.lines().filter(|l| !l.trim().is_empty()) {
            debug!(command = %command, "{}", line);
        }

        Ok((command, result))
    }

    /// Run kubectl and fail on a non-zero exit code
    async fn run_checked(&self, subcommand: &[&str]) -> Result<String, GatewayError> {
        let (command, result) = self.run(subcommand).await?;

        if !result.success {
            return Err(GatewayError::command_failed(
                command,
                result.exit_code,
                result.stderr.trim(),
            ));
        }

        Ok(result.stdout)
    }
}

#[async_trait]
impl ClusterGateway for KubectlGateway {
    async fn ensure_namespace(&self, namespace: &NamespaceName) -> Result<(), GatewayError> {
        Self::validate_namespace(namespace)?;

        let (lookup, existing) = self.run(&["get", "namespace", namespace.as_str()]).await?;
        if existing.success {
            debug!(namespace = %namespace, "Namespace already exists");
            return Ok(());
        }

        // Only a NotFound lookup falls through to create
        if !existing.stderr.contains("NotFound") {
            return Err(GatewayError::command_failed(
                lookup,
                existing.exit_code,
                existing.stderr.trim(),
            ));
        }

        let (command, created) = self.run(&["create", "namespace", namespace.as_str()]).await?;
        if created.success {
            debug!(namespace = %namespace, "Namespace created");
            return Ok(());
        }

        // Another client may have created it between get and create
        if created.stderr.contains("AlreadyExists") {
            return Ok(());
        }

        Err(GatewayError::command_failed(
            command,
            created.exit_code,
            created.stderr.trim(),
        ))
    }

    async fn apply_manifest(
        &self,
        namespace: &NamespaceName,
        manifest: &Manifest,
    ) -> Result<(), GatewayError> {
        let file = manifest.absolute_path().display().to_string();
        self.run_checked(&["apply", "-n", namespace.as_str(), "-f", file.as_str()])
            .await
            .map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Entry;

    fn ns(name: &str) -> NamespaceName {
        NamespaceName::new(name).unwrap()
    }

    #[test]
    fn test_validate_namespace_accepts_rfc1123_labels() {
        for name in ["team-a", "a", "prod01", "0abc"] {
            assert!(KubectlGateway::validate_namespace(&ns(name)).is_ok(), "{}", name);
        }
    }

    #[test]
    fn test_validate_namespace_rejects_invalid_labels() {
        for name in ["Team-A", "team_a", "-team", "team-", "my.ns"] {
            assert!(
                matches!(
                    KubectlGateway::validate_namespace(&ns(name)),
                    Err(GatewayError::InvalidNamespace { .. })
                ),
                "{}",
                name
            );
        }

        let long = "a".repeat(64);
        assert!(KubectlGateway::validate_namespace(&ns(&long)).is_err());
    }

    #[test]
    fn test_global_args() {
        let gateway = KubectlGateway::new(
            KubectlConfig::new()
                .with_context(Some("staging".to_string()))
                .with_kubeconfig(Some(PathBuf::from("/tmp/kubeconfig"))),
        );
        assert_eq!(
            gateway.global_args(),
            vec!["--context", "staging", "--kubeconfig", "/tmp/kubeconfig"]
        );
        assert!(KubectlGateway::default().global_args().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_namespace_never_reaches_kubectl() {
        let gateway =
            KubectlGateway::new(KubectlConfig::new().with_executable("gk-no-such-kubectl"));
        let result = gateway.ensure_namespace(&ns("Bad_Name")).await;
        assert!(matches!(result, Err(GatewayError::InvalidNamespace { .. })));
    }

    #[cfg(unix)]
    mod fake_kubectl {
        use super::*;
        use std::os::unix::fs::PermissionsExt;
        use tempfile::TempDir;

        /// Write a shell script standing in for kubectl that logs its arguments
        fn write_script(dir: &TempDir, body: &str) -> PathBuf {
            let path = dir.path().join("kubectl");
            let log = dir.path().join("calls.log");
            let script = format!(
                "#!/bin/sh\necho \"$@\" >> {}\n{}\n",
                log.display(),
                body
            );
            std::fs::write(&path, script).unwrap();
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
            path
        }

        fn calls(dir: &TempDir) -> Vec<String> {
            std::fs::read_to_string(dir.path().join("calls.log"))
                .unwrap_or_default()
                .lines()
                .map(str::to_string)
                .collect()
        }

        fn gateway(script: &std::path::Path) -> KubectlGateway {
            KubectlGateway::new(
                KubectlConfig::new().with_executable(script.display().to_string()),
            )
        }

        #[tokio::test]
        async fn test_existing_namespace_is_not_created() {
            let dir = TempDir::new().unwrap();
            let script = write_script(&dir, "exit 0");

            gateway(&script)
                .ensure_namespace(&ns("team-a"))
                .await
                .unwrap();

            assert_eq!(calls(&dir), vec!["get namespace team-a"]);
        }

        #[tokio::test]
        async fn test_missing_namespace_is_created() {
            let dir = TempDir::new().unwrap();
            let script = write_script(
                &dir,
                "if [ \"$1\" = \"get\" ]; then echo 'NotFound' >&2; exit 1; fi\nexit 0",
            );

            gateway(&script)
                .ensure_namespace(&ns("team-a"))
                .await
                .unwrap();

            assert_eq!(
                calls(&dir),
                vec!["get namespace team-a", "create namespace team-a"]
            );
        }

        #[tokio::test]
        async fn test_create_failure_is_reported() {
            let dir = TempDir::new().unwrap();
            let script = write_script(
                &dir,
                "if [ \"$1\" = \"get\" ]; then echo 'NotFound' >&2; exit 1; fi\necho 'quota exceeded' >&2; exit 1",
            );

            let result = gateway(&script).ensure_namespace(&ns("team-b")).await;

            match result {
                Err(GatewayError::CommandFailed {
                    command,
                    exit_code,
                    stderr,
                }) => {
                    assert!(command.ends_with("create namespace team-b"), "{}", command);
                    assert_eq!(exit_code, 1);
                    assert_eq!(stderr, "quota exceeded");
                }
                other => panic!("Expected CommandFailed, got {:?}", other),
            }
        }

        #[tokio::test]
        async fn test_lookup_failure_does_not_create() {
            let dir = TempDir::new().unwrap();
            let script = write_script(
                &dir,
                "echo 'error: You must be logged in to the server (Unauthorized)' >&2; exit 1",
            );

            let result = gateway(&script).ensure_namespace(&ns("team-a")).await;

            match result {
                Err(GatewayError::CommandFailed {
                    command, stderr, ..
                }) => {
                    assert!(command.ends_with("get namespace team-a"), "{}", command);
                    assert!(stderr.contains("Unauthorized"));
                }
                other => panic!("Expected CommandFailed, got {:?}", other),
            }
            assert_eq!(calls(&dir), vec!["get namespace team-a"]);
        }

        #[tokio::test]
        async fn test_apply_passes_namespace_and_file() {
            let dir = TempDir::new().unwrap();
            let script = write_script(&dir, "exit 0");
            let manifest = Manifest::from_entry(Entry::file(
                "/srv/manifests/team-a/deploy.yaml",
                "team-a/deploy.yaml",
            ))
            .unwrap();

            gateway(&script)
                .apply_manifest(&ns("team-a"), &manifest)
                .await
                .unwrap();

            assert_eq!(
                calls(&dir),
                vec!["apply -n team-a -f /srv/manifests/team-a/deploy.yaml"]
            );
        }

        #[tokio::test]
        async fn test_context_is_forwarded() {
            let dir = TempDir::new().unwrap();
            let script = write_script(&dir, "exit 0");
            let gateway = KubectlGateway::new(
                KubectlConfig::new()
                    .with_executable(script.display().to_string())
                    .with_context(Some("prod".to_string())),
            );

            gateway.ensure_namespace(&ns("team-a")).await.unwrap();

            assert_eq!(calls(&dir), vec!["--context prod get namespace team-a"]);
        }
    }
}
