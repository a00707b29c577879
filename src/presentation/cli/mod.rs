use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};
use std::process::exit;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::application::use_cases::{ApplyPathConfig, ApplyPathError, ApplyPathUseCase};
use crate::domain::entities::RunReport;
use crate::infrastructure::filesystem::{ConfigStore, GkConfigFile, WalkDirLister};
use crate::infrastructure::kubernetes::{
    ClusterGateway, KubectlConfig, KubectlGateway, PrinterGateway,
};
use crate::presentation::ui::DisplayHelper;

/// Output format options for the run report
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output (default)
    Text,
    /// JSON output
    Json,
    /// YAML output
    Yaml,
}

/// gk - Apply Kubernetes manifests grouped into namespaces by directory
///
/// Every subdirectory of the root is a namespace; every *.yaml / *.yml file
/// below it is applied into that namespace.
#[derive(Debug, Parser)]
#[command(name = "gk")]
#[command(about = "Apply Kubernetes manifests grouped into namespaces by directory")]
#[command(version)]
#[command(long_version = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("GIT_HASH"),
    ", built ",
    env!("BUILD_DATE"),
    ")"
))]
pub struct Cli {
    /// Root directory to scan (defaults to current directory)
    #[arg(short, long, env = "GK_PATH")]
    pub path: Option<PathBuf>,

    /// Print the operations instead of running kubectl
    #[arg(long)]
    pub dry_run: bool,

    /// kubectl executable
    #[arg(long, env = "GK_KUBECTL")]
    pub kubectl: Option<String>,

    /// kubeconfig context to use
    #[arg(long, env = "GK_CONTEXT")]
    pub context: Option<String>,

    /// kubeconfig file to use
    #[arg(long)]
    pub kubeconfig: Option<PathBuf>,

    /// Maximum number of concurrent kubectl calls (0 = number of CPUs)
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Timeout for each kubectl call in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// YAML configuration file
    #[arg(long, env = "GK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Report format (text, json, yaml)
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

/// Effective settings after merging the config file and the command line
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub root: PathBuf,
    pub dry_run: bool,
    pub kubectl: String,
    pub context: Option<String>,
    pub kubeconfig: Option<PathBuf>,
    pub jobs: usize,
    pub timeout_seconds: Option<u64>,
}

impl Settings {
    /// Command-line values win over config file values
    pub fn resolve(cli: &Cli, file: GkConfigFile, cwd: &Path) -> Self {
        let root = match &cli.path {
            Some(path) if path.is_absolute() => path.clone(),
            Some(path) => cwd.join(path),
            None => cwd.to_path_buf(),
        };

        Self {
            root,
            dry_run: cli.dry_run || file.dry_run.unwrap_or(false),
            kubectl: cli
                .kubectl
                .clone()
                .or(file.kubectl)
                .unwrap_or_else(|| KubectlConfig::default().executable),
            context: cli.context.clone().or(file.context),
            kubeconfig: cli.kubeconfig.clone().or(file.kubeconfig),
            jobs: cli.jobs.or(file.jobs).unwrap_or(1),
            timeout_seconds: cli.timeout.or(file.timeout_seconds),
        }
    }

    fn gateway(&self, output: OutputFormat) -> Arc<dyn ClusterGateway> {
        // Keep stdout clean for machine-readable reports
        if self.dry_run && output != OutputFormat::Text {
            return Arc::new(PrinterGateway::new(std::io::stderr()));
        }
        if self.dry_run {
            return Arc::new(PrinterGateway::stdout());
        }

        Arc::new(KubectlGateway::new(
            KubectlConfig::new()
                .with_executable(self.kubectl.clone())
                .with_context(self.context.clone())
                .with_kubeconfig(self.kubeconfig.clone())
                .with_timeout(self.timeout_seconds),
        ))
    }
}

/// CLI application runner
pub struct CliApp {
    cli: Cli,
}

impl CliApp {
    pub fn new() -> Self {
        Self { cli: Cli::parse() }
    }

    pub fn from_cli(cli: Cli) -> Self {
        Self { cli }
    }

    pub fn verbose(&self) -> bool {
        self.cli.verbose
    }

    pub async fn run(self) -> Result<()> {
        let display = if self.cli.no_color {
            DisplayHelper::new(false)
        } else {
            DisplayHelper::auto_display()
        };

        match self.apply(&display).await {
            Ok(report) if report.has_failures() => exit(1),
            Ok(_) => Ok(()),
            Err(e) => {
                display.error(&format!("{:#}", e));
                exit(1);
            }
        }
    }

    async fn apply(&self, display: &DisplayHelper) -> Result<RunReport> {
        let settings = self.load_settings()?;
        debug!(?settings, "Resolved settings");

        let cancel = CancellationToken::new();
        let interrupt = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupted; waiting for running kubectl calls to finish");
                interrupt.cancel();
            }
        });

        let config = ApplyPathConfig::new()
            .with_max_parallel(settings.jobs)
            .with_verbose(self.cli.verbose);

        let use_case = ApplyPathUseCase::new(
            Arc::new(WalkDirLister::new()),
            settings.gateway(self.cli.output),
            config,
        )
        .with_cancellation(cancel);

        let report = match use_case.execute(&settings.root).await {
            Ok(report) => report,
            Err(ApplyPathError::NoNamespaces(root)) => {
                anyhow::bail!(
                    "No manifests found in namespace directories under {}",
                    display.format_path(&root)
                )
            }
            Err(e) => return Err(e.into()),
        };

        self.print_report(display, &report)?;
        Ok(report)
    }

    fn load_settings(&self) -> Result<Settings> {
        let file = match &self.cli.config {
            Some(path) => ConfigStore::new()
                .load(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
            None => GkConfigFile::default(),
        };

        let cwd = std::env::current_dir().context("Failed to resolve current directory")?;
        Ok(Settings::resolve(&self.cli, file, &cwd))
    }

    fn print_report(&self, display: &DisplayHelper, report: &RunReport) -> Result<()> {
        match self.cli.output {
            OutputFormat::Text => display.print_report(report),
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(report)?),
            OutputFormat::Yaml => print!("{}", serde_yaml::to_string(report)?),
        }
        Ok(())
    }
}

impl Default for CliApp {
    fn default() -> Self {
        Self::new()
    }
}
