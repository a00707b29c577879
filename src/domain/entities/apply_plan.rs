use indexmap::IndexMap;
use serde::Serialize;

use super::entry::Manifest;
use crate::domain::value_objects::NamespaceName;

/// ネームスペースごとにまとめたマニフェストの適用計画
///
/// 実行ごとに新しく構築され、オーケストレータが一度だけ消費する。
/// 現在の実装は発見順（最初に見つかったネームスペースが先、各グループ内は
/// リスタの列挙順）を保持するが、呼び出し側がこの順序に依存してはならない。
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ApplyPlan {
    groups: IndexMap<NamespaceName, Vec<Manifest>>,
}

impl ApplyPlan {
    /// 空の計画を作成
    pub fn new() -> Self {
        Self::default()
    }

    /// マニフェストをネームスペースのグループに追加
    ///
    /// 重複排除は行わない。
    pub fn push(&mut self, namespace: NamespaceName, manifest: Manifest) {
        self.groups.entry(namespace).or_default().push(manifest);
    }

    /// ネームスペースの数
    pub fn namespace_count(&self) -> usize {
        self.groups.len()
    }

    /// 全グループのマニフェスト数の合計
    pub fn manifest_count(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    /// 計画が空か
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// ネームスペースのマニフェスト一覧を取得
    pub fn manifests(&self, namespace: &NamespaceName) -> Option<&[Manifest]> {
        self.groups.get(namespace).map(Vec::as_slice)
    }

    /// グループを走査
    pub fn iter(&self) -> impl Iterator<Item = (&NamespaceName, &[Manifest])> {
        self.groups.iter().map(|(ns, files)| (ns, files.as_slice()))
    }
}

impl IntoIterator for ApplyPlan {
    type Item = (NamespaceName, Vec<Manifest>);
    type IntoIter = indexmap::map::IntoIter<NamespaceName, Vec<Manifest>>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.into_iter()
    }
}
