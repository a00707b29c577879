use crate::domain::entities::{Entry, Manifest};

/// エントリ列からマニフェストファイルのみを抽出する
///
/// ディレクトリと、`.yaml`/`.yml`（大文字小文字を区別しない）以外の
/// ファイルを除外する。入力順は保持される。
pub fn classify_manifests<I>(entries: I) -> Vec<Manifest>
where
    I: IntoIterator<Item = Entry>,
{
    entries.into_iter().filter_map(Manifest::from_entry).collect()
}
