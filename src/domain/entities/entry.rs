use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// マニフェストとして扱うファイルの拡張子（小文字）
pub const MANIFEST_SUFFIXES: &[&str] = &[".yaml", ".yml"];

/// ファイルシステム上の1ノード
///
/// エントリリスタが発見したノードごとに一度だけ生成され、以後変更されない。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// 解決済みの絶対パス
    pub absolute_path: PathBuf,

    /// スキャンルートからの相対パス（区切り文字は`/`に正規化）
    pub relative_path: String,

    /// ディレクトリかどうか
    pub is_directory: bool,
}

impl Entry {
    /// 新しいEntryを作成
    ///
    /// 相対パスの区切り文字は`/`に正規化される。
    pub fn new(
        absolute_path: impl Into<PathBuf>,
        relative_path: impl AsRef<str>,
        is_directory: bool,
    ) -> Self {
        Self {
            absolute_path: absolute_path.into(),
            relative_path: normalize_separators(relative_path.as_ref()),
            is_directory,
        }
    }

    /// ファイルエントリを作成
    pub fn file(absolute_path: impl Into<PathBuf>, relative_path: impl AsRef<str>) -> Self {
        Self::new(absolute_path, relative_path, false)
    }

    /// ディレクトリエントリを作成
    pub fn directory(absolute_path: impl Into<PathBuf>, relative_path: impl AsRef<str>) -> Self {
        Self::new(absolute_path, relative_path, true)
    }

    /// マニフェストの拡張子を持つか（大文字小文字を区別しない）
    pub fn has_manifest_suffix(&self) -> bool {
        let lower = self.relative_path.to_lowercase();
        MANIFEST_SUFFIXES.iter().any(|suffix| lower.ends_with(suffix))
    }
}

/// マニフェストファイル
///
/// ディレクトリではなく、マニフェストの拡張子を持つ[`Entry`]。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Manifest {
    entry: Entry,
}

impl Manifest {
    /// Entryをマニフェストとして扱えるなら変換する
    pub fn from_entry(entry: Entry) -> Option<Self> {
        if entry.is_directory || !entry.has_manifest_suffix() {
            return None;
        }
        Some(Self { entry })
    }

    /// 絶対パス
    pub fn absolute_path(&self) -> &Path {
        &self.entry.absolute_path
    }

    /// ルートからの相対パス
    pub fn relative_path(&self) -> &str {
        &self.entry.relative_path
    }

    /// 元のEntry
    pub fn entry(&self) -> &Entry {
        &self.entry
    }
}

fn normalize_separators(path: &str) -> String {
    if std::path::MAIN_SEPARATOR == '/' {
        path.to_string()
    } else {
        path.replace(std::path::MAIN_SEPARATOR, "/")
    }
}
