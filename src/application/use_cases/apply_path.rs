use futures::future::join_all;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tokio::sync::{Mutex, Semaphore, SemaphorePermit};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::application::services::{build_plan, classify_manifests, NamespaceResolver};
use crate::common::error::GkError;
use crate::domain::entities::{ApplyOutcome, ApplyPlan, Manifest, OutcomeStatus, RunReport};
use crate::domain::value_objects::NamespaceName;
use crate::infrastructure::filesystem::EntryLister;
use crate::infrastructure::kubernetes::ClusterGateway;

/// ApplyPath関連のエラー
///
/// 実行そのものを続けられない場合のみ返す。個々の操作の失敗は
/// [`RunReport`]に記録される。
#[derive(Debug, Error)]
pub enum ApplyPathError {
    #[error("Failed to discover manifests: {0}")]
    Discovery(#[from] GkError),

    #[error("No namespace directories with manifests found under {0}")]
    NoNamespaces(String),
}

/// ApplyPath実行の設定
#[derive(Debug, Clone)]
pub struct ApplyPathConfig {
    /// ゲートウェイ呼び出しの最大並列数（1なら順次実行）
    pub max_parallel: usize,

    /// 詳細ログを出力するか
    pub verbose: bool,
}

impl Default for ApplyPathConfig {
    fn default() -> Self {
        Self {
            max_parallel: 1,
            verbose: false,
        }
    }
}

impl ApplyPathConfig {
    /// 新しいApplyPathConfigインスタンスを作成
    pub fn new() -> Self {
        Self::default()
    }

    /// 最大並列数を設定（0ならCPU数）
    pub fn with_max_parallel(mut self, max_parallel: usize) -> Self {
        self.max_parallel = if max_parallel == 0 {
            num_cpus::get()
        } else {
            max_parallel
        };
        self
    }

    /// 詳細ログを有効化
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// 並列実行するか
    pub fn is_parallel(&self) -> bool {
        self.max_parallel > 1
    }
}

/// ディレクトリ配下のマニフェストをネームスペースごとに適用するユースケース
pub struct ApplyPathUseCase<L: ?Sized, G: ?Sized> {
    lister: Arc<L>,
    gateway: Arc<G>,
    config: ApplyPathConfig,
    cancel: CancellationToken,
}

impl<L, G> ApplyPathUseCase<L, G>
where
    L: EntryLister + ?Sized,
    G: ClusterGateway + ?Sized,
{
    /// 新しいApplyPathUseCaseインスタンスを作成
    pub fn new(lister: Arc<L>, gateway: Arc<G>, config: ApplyPathConfig) -> Self {
        Self {
            lister,
            gateway,
            config,
            cancel: CancellationToken::new(),
        }
    }

    /// キャンセル用トークンを差し替える
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// キャンセル用トークン
    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// 適用計画を作成（ゲートウェイは呼ばない）
    pub fn plan(&self, root: &Path) -> Result<ApplyPlan, ApplyPathError> {
        let root = absolute_root(root)?;

        // 1. エントリ列挙
        let entries = self.lister.list_entries(&root)?;
        debug!(root = %root.display(), entries = entries.len(), "Discovered entries");

        // 2. マニフェスト分類
        let manifests = classify_manifests(entries);

        // 3. ネームスペースごとにまとめる
        let resolver = NamespaceResolver::new(&root);
        let plan = build_plan(&resolver, manifests);

        if plan.is_empty() {
            return Err(ApplyPathError::NoNamespaces(root.display().to_string()));
        }

        info!(
            namespaces = plan.namespace_count(),
            manifests = plan.manifest_count(),
            "Built apply plan"
        );
        Ok(plan)
    }

    /// 計画を作成して全ネームスペースに適用
    ///
    /// 個々の失敗で中断することはなく、全ての結果を[`RunReport`]に集める。
    pub async fn execute(&self, root: &Path) -> Result<RunReport, ApplyPathError> {
        let plan = self.plan(root)?;

        let report = Mutex::new(RunReport::new(plan.namespace_count()));
        let limiter = Semaphore::new(self.config.max_parallel.max(1));

        if self.config.is_parallel() {
            debug!(max_parallel = self.config.max_parallel, "Applying in parallel");
            join_all(plan.into_iter().map(|(namespace, manifests)| {
                self.apply_namespace(namespace, manifests, &limiter, &report)
            }))
            .await;
        } else {
            for (namespace, manifests) in plan {
                self.apply_namespace(namespace, manifests, &limiter, &report)
                    .await;
            }
        }

        let mut report = report.into_inner();
        report.finish();

        debug!(
            succeeded = report.success_count,
            failed = report.failure_count,
            "Run finished"
        );

        Ok(report)
    }

    /// 1つのネームスペースを確保してからマニフェストを適用
    async fn apply_namespace(
        &self,
        namespace: NamespaceName,
        manifests: Vec<Manifest>,
        limiter: &Semaphore,
        report: &Mutex<RunReport>,
    ) {
        let outcome = self.ensure_namespace(&namespace, limiter).await;

        if !outcome.is_success() {
            let mut report = report.lock().await;
            let cancelled = outcome.status == OutcomeStatus::Cancelled;
            let cause = outcome.error_message.clone().unwrap_or_default();
            report.add_outcome(outcome);

            for manifest in &manifests {
                let skipped = ApplyOutcome::apply(namespace.clone(), manifest);
                report.add_outcome(if cancelled {
                    skipped.with_cancelled()
                } else {
                    skipped.with_ensure_failed(&cause)
                });
            }
            return;
        }

        report.lock().await.add_outcome(outcome);

        if self.config.is_parallel() {
            let outcomes = join_all(
                manifests
                    .iter()
                    .map(|manifest| self.apply_manifest(&namespace, manifest, limiter)),
            )
            .await;

            let mut report = report.lock().await;
            for outcome in outcomes {
                report.add_outcome(outcome);
            }
        } else {
            for manifest in &manifests {
                let outcome = self.apply_manifest(&namespace, manifest, limiter).await;
                report.lock().await.add_outcome(outcome);
            }
        }
    }

    async fn ensure_namespace(
        &self,
        namespace: &NamespaceName,
        limiter: &Semaphore,
    ) -> ApplyOutcome {
        let outcome = ApplyOutcome::ensure(namespace.clone());

        let Some(_permit) = self.acquire(limiter).await else {
            debug!(namespace = %namespace, "Cancelled before ensuring namespace");
            return outcome.with_cancelled();
        };

        info!(namespace = %namespace, "Ensuring namespace");
        let start_time = Instant::now();

        match self.gateway.ensure_namespace(namespace).await {
            Ok(()) => outcome.with_success(elapsed_ms(start_time)),
            Err(e) => {
                error!(namespace = %namespace, error = %e, "Failed to ensure namespace");
                outcome.with_failure(e.to_string(), elapsed_ms(start_time))
            }
        }
    }

    async fn apply_manifest(
        &self,
        namespace: &NamespaceName,
        manifest: &Manifest,
        limiter: &Semaphore,
    ) -> ApplyOutcome {
        let outcome = ApplyOutcome::apply(namespace.clone(), manifest);

        let Some(_permit) = self.acquire(limiter).await else {
            debug!(
                namespace = %namespace,
                file = %manifest.relative_path(),
                "Cancelled before applying manifest"
            );
            return outcome.with_cancelled();
        };

        if self.config.verbose {
            info!(namespace = %namespace, file = %manifest.relative_path(), "Applying manifest");
        } else {
            debug!(namespace = %namespace, file = %manifest.relative_path(), "Applying manifest");
        }
        let start_time = Instant::now();

        match self.gateway.apply_manifest(namespace, manifest).await {
            Ok(()) => outcome.with_success(elapsed_ms(start_time)),
            Err(e) => {
                error!(
                    namespace = %namespace,
                    file = %manifest.relative_path(),
                    error = %e,
                    "Failed to apply manifest"
                );
                outcome.with_failure(e.to_string(), elapsed_ms(start_time))
            }
        }
    }

    /// ゲートウェイ呼び出しの枠を取得（キャンセル済みならNone）
    async fn acquire<'a>(&self, limiter: &'a Semaphore) -> Option<SemaphorePermit<'a>> {
        if self.cancel.is_cancelled() {
            return None;
        }

        let permit = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return None,
            permit = limiter.acquire() => permit.ok()?,
        };

        if self.cancel.is_cancelled() {
            return None;
        }
        Some(permit)
    }
}

fn absolute_root(root: &Path) -> Result<PathBuf, GkError> {
    if root.is_absolute() {
        return Ok(root.to_path_buf());
    }
    let cwd = std::env::current_dir().map_err(|e| {
        GkError::filesystem_error_with_source(
            "Failed to resolve current directory",
            Some(root.to_path_buf()),
            e,
        )
    })?;
    Ok(cwd.join(root))
}

fn elapsed_ms(start_time: Instant) -> u64 {
    start_time.elapsed().as_millis() as u64
}
