use std::path::{Component, Path, PathBuf};
use thiserror::Error;

use crate::domain::entities::Manifest;
use crate::domain::value_objects::NamespaceName;

/// ネームスペースを決定できない理由
///
/// いずれもエラーではなく「適用対象外」として扱われる。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Unresolvable {
    #[error("path cannot be expressed relative to the root")]
    NoRelativePath,

    #[error("path lies outside the root")]
    OutsideRoot,

    #[error("file sits directly under the root")]
    RootLevel,

    #[error("first path segment is not a usable namespace name")]
    InvalidSegment,
}

/// マニフェストのパスからネームスペースを導出する
#[derive(Debug, Clone)]
pub struct NamespaceResolver {
    /// スキャンルート
    root: PathBuf,
}

impl NamespaceResolver {
    /// 新しいNamespaceResolverを作成
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// スキャンルート
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// マニフェストのネームスペースを解決
    pub fn resolve(&self, manifest: &Manifest) -> Result<NamespaceName, Unresolvable> {
        resolve_namespace(&self.root, manifest.absolute_path())
    }
}

/// ルートからの相対パスの先頭セグメントをネームスペースとして返す
///
/// ルート直下のファイル（セグメントが1つ）は解決不能。
pub fn resolve_namespace(root: &Path, manifest_path: &Path) -> Result<NamespaceName, Unresolvable> {
    let relative = pathdiff::diff_paths(manifest_path, root).ok_or(Unresolvable::NoRelativePath)?;

    let mut segments = relative
        .components()
        .filter(|component| !matches!(component, Component::CurDir));

    let first = match segments.next() {
        Some(Component::Normal(segment)) => segment,
        Some(Component::ParentDir) | Some(Component::RootDir) | Some(Component::Prefix(_)) => {
            return Err(Unresolvable::OutsideRoot)
        }
        _ => return Err(Unresolvable::InvalidSegment),
    };

    if segments.next().is_none() {
        return Err(Unresolvable::RootLevel);
    }

    let first = first.to_str().ok_or(Unresolvable::InvalidSegment)?;
    NamespaceName::new(first).map_err(|_| Unresolvable::InvalidSegment)
}
