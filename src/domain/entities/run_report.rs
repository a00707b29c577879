use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use super::entry::Manifest;
use crate::domain::value_objects::NamespaceName;

/// 操作の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    /// ネームスペースの存在保証
    EnsureNamespace,
    /// マニフェストの適用
    ApplyManifest,
}

/// 操作結果の状態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    /// 成功
    Succeeded,
    /// 失敗
    Failed,
    /// ネームスペースの保証に失敗したため未実行
    SkippedEnsureFailed,
    /// キャンセルにより未実行
    Cancelled,
}

/// 1操作（ネームスペース保証またはマニフェスト適用）の結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplyOutcome {
    /// 対象ネームスペース
    pub namespace: NamespaceName,

    /// 対象マニフェストのルートからの相対パス（適用操作のみ）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manifest: Option<String>,

    /// 対象マニフェストの絶対パス（適用操作のみ）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manifest_path: Option<PathBuf>,

    /// 操作の種類
    pub kind: OperationKind,

    /// 結果の状態
    pub status: OutcomeStatus,

    /// エラーメッセージ（成功以外）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,

    /// 実行時間（ミリ秒）
    pub execution_time_ms: u64,
}

impl ApplyOutcome {
    /// ネームスペース保証操作の結果を作成（初期状態はキャンセル扱い）
    pub fn ensure(namespace: NamespaceName) -> Self {
        Self {
            namespace,
            manifest: None,
            manifest_path: None,
            kind: OperationKind::EnsureNamespace,
            status: OutcomeStatus::Cancelled,
            error_message: None,
            execution_time_ms: 0,
        }
    }

    /// マニフェスト適用操作の結果を作成（初期状態はキャンセル扱い）
    pub fn apply(namespace: NamespaceName, manifest: &Manifest) -> Self {
        Self {
            namespace,
            manifest: Some(manifest.relative_path().to_string()),
            manifest_path: Some(manifest.absolute_path().to_path_buf()),
            kind: OperationKind::ApplyManifest,
            status: OutcomeStatus::Cancelled,
            error_message: None,
            execution_time_ms: 0,
        }
    }

    /// 成功状態に設定
    pub fn with_success(mut self, execution_time: u64) -> Self {
        self.status = OutcomeStatus::Succeeded;
        self.error_message = None;
        self.execution_time_ms = execution_time;
        self
    }

    /// 失敗状態に設定
    pub fn with_failure(mut self, error: impl Into<String>, execution_time: u64) -> Self {
        self.status = OutcomeStatus::Failed;
        self.error_message = Some(error.into());
        self.execution_time_ms = execution_time;
        self
    }

    /// ネームスペース保証失敗による未実行に設定
    pub fn with_ensure_failed(mut self, cause: impl fmt::Display) -> Self {
        self.status = OutcomeStatus::SkippedEnsureFailed;
        self.error_message = Some(format!(
            "skipped: namespace '{}' could not be ensured: {}",
            self.namespace, cause
        ));
        self
    }

    /// キャンセルによる未実行に設定
    pub fn with_cancelled(mut self) -> Self {
        self.status = OutcomeStatus::Cancelled;
        self.error_message = Some("cancelled before execution".to_string());
        self
    }

    /// 成功したか
    pub fn is_success(&self) -> bool {
        matches!(self.status, OutcomeStatus::Succeeded)
    }

    /// 失敗として数えるか（未実行も失敗に含む）
    pub fn is_failure(&self) -> bool {
        !self.is_success()
    }

    /// 対象の表示用識別子（`namespace` または `namespace: file`）
    pub fn target(&self) -> String {
        match &self.manifest {
            Some(file) => format!("{}: {}", self.namespace, file),
            None => self.namespace.to_string(),
        }
    }
}

impl fmt::Display for ApplyOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let operation = match self.kind {
            OperationKind::EnsureNamespace => "ensure namespace",
            OperationKind::ApplyManifest => "apply",
        };
        write!(f, "[{}] {}", self.namespace, operation)?;
        if let Some(file) = &self.manifest {
            write!(f, " {}", file)?;
        }
        match &self.error_message {
            Some(message) if self.is_failure() => write!(f, ": {}", message),
            _ => Ok(()),
        }
    }
}

/// 1回の実行全体の集計結果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// 処理対象のネームスペース数
    pub namespace_count: usize,

    /// 保証に成功したネームスペース数
    pub ensured_count: usize,

    /// 適用に成功したマニフェスト数
    pub success_count: usize,

    /// 失敗数（保証失敗・未実行・適用失敗の合計）
    pub failure_count: usize,

    /// 全操作の結果
    pub outcomes: Vec<ApplyOutcome>,

    /// 開始時刻
    pub started_at: DateTime<Utc>,

    /// 終了時刻
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
}

impl RunReport {
    /// 新しいRunReportを作成
    pub fn new(namespace_count: usize) -> Self {
        Self {
            namespace_count,
            ensured_count: 0,
            success_count: 0,
            failure_count: 0,
            outcomes: Vec::new(),
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    /// 操作結果を追加
    pub fn add_outcome(&mut self, outcome: ApplyOutcome) {
        match (outcome.kind, outcome.is_success()) {
            (OperationKind::EnsureNamespace, true) => self.ensured_count += 1,
            (OperationKind::ApplyManifest, true) => self.success_count += 1,
            (_, false) => self.failure_count += 1,
        }
        self.outcomes.push(outcome);
    }

    /// 終了時刻を記録
    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// 失敗が1つでもあったか
    pub fn has_failures(&self) -> bool {
        self.failure_count > 0
    }

    /// 全体として成功したか
    pub fn is_success(&self) -> bool {
        !self.has_failures()
    }

    /// 失敗した結果のみを取得
    pub fn failed_outcomes(&self) -> Vec<&ApplyOutcome> {
        self.outcomes.iter().filter(|o| o.is_failure()).collect()
    }

    /// 指定ネームスペースに帰属する結果を取得
    pub fn outcomes_for(&self, namespace: &str) -> Vec<&ApplyOutcome> {
        self.outcomes
            .iter()
            .filter(|o| o.namespace.as_str() == namespace)
            .collect()
    }

    /// 失敗をまとめた複合エラーを取得（失敗がなければNone）
    pub fn failures(&self) -> Option<ApplyFailures> {
        if !self.has_failures() {
            return None;
        }
        Some(ApplyFailures {
            failures: self.failed_outcomes().into_iter().cloned().collect(),
        })
    }

    /// 複合エラーに変換（失敗がなければOk）
    pub fn into_result(self) -> Result<RunReport, ApplyFailures> {
        match self.failures() {
            Some(failures) => Err(failures),
            None => Ok(self),
        }
    }

    /// 実行時間（ミリ秒）
    pub fn elapsed_ms(&self) -> Option<i64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_milliseconds())
    }

    /// 1行サマリー
    pub fn summary_line(&self) -> String {
        format!(
            "Summary: {} namespaces, {} succeeded, {} failed",
            self.namespace_count, self.success_count, self.failure_count
        )
    }
}

/// 実行中に記録された全ての失敗をまとめた複合エラー
#[derive(Debug, Clone, Error)]
#[error("{} operation(s) failed:{}", .failures.len(), render_failures(.failures))]
pub struct ApplyFailures {
    /// 個々の失敗
    pub failures: Vec<ApplyOutcome>,
}

impl ApplyFailures {
    /// 失敗数
    pub fn len(&self) -> usize {
        self.failures.len()
    }

    /// 空か
    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }
}

fn render_failures(failures: &[ApplyOutcome]) -> String {
    failures
        .iter()
        .map(|failure| format!("\n  {}", failure))
        .collect()
}
