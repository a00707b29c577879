use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

use crate::common::error::GkError;
use crate::common::result::{GkResult, ResultExt};
use crate::domain::entities::Entry;

/// ルート配下のエントリを列挙する能力
///
/// 実装はルート自身を含めず、ルート配下の全ノードを返す。
pub trait EntryLister: Send + Sync {
    /// ルート配下の全エントリを列挙
    fn list_entries(&self, root: &Path) -> GkResult<Vec<Entry>>;
}

/// `walkdir`によるディレクトリ走査（シンボリックリンクは辿らない）
#[derive(Debug, Clone, Default)]
pub struct WalkDirLister;

impl WalkDirLister {
    /// 新しいリスタを作成
    pub fn new() -> Self {
        Self
    }

    fn to_entry(root: &Path, path: &Path, is_directory: bool) -> GkResult<Entry> {
        let relative = pathdiff::diff_paths(path, root).ok_or_else(|| {
            GkError::filesystem_error(
                format!("Cannot relativize path against {}", root.display()),
                Some(path.to_path_buf()),
            )
        })?;

        // UTF-8でない名前は置換文字で表す。絶対パスは元のまま保持
        Ok(Entry::new(path, relative.to_string_lossy(), is_directory))
    }
}

impl EntryLister for WalkDirLister {
    fn list_entries(&self, root: &Path) -> GkResult<Vec<Entry>> {
        let metadata = std::fs::metadata(root)
            .with_filesystem_error("Failed to read scan root", Some(root.to_path_buf()))?;
        if !metadata.is_dir() {
            return Err(GkError::filesystem_error(
                "Scan root is not a directory",
                Some(root.to_path_buf()),
            ));
        }

        let root: PathBuf = if root.is_absolute() {
            root.to_path_buf()
        } else {
            std::env::current_dir()
                .with_filesystem_error("Failed to resolve current directory", None)?
                .join(root)
        };

        let mut entries = Vec::new();
        for item in WalkDir::new(&root)
            .min_depth(1)
            .follow_links(false)
            .sort_by_file_name()
        {
            let item = item?;
            entries.push(Self::to_entry(&root, item.path(), item.file_type().is_dir())?);
        }

        debug!(root = %root.display(), count = entries.len(), "Listed entries");
        Ok(entries)
    }
}
