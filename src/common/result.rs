use crate::common::error::GkError;

/// gk全体で使用するResult型のエイリアス
///
/// # Examples
///
/// ```
/// use gk::common::result::GkResult;
/// use gk::common::error::GkError;
///
/// fn example_function() -> GkResult<String> {
///     Ok("success".to_string())
/// }
///
/// fn example_with_error() -> GkResult<()> {
///     Err(GkError::timeout(30))
/// }
/// ```
pub type GkResult<T> = Result<T, GkError>;

/// Resultのエラー変換ヘルパー
pub trait ResultExt<T, E> {
    /// ファイルシステムエラーとしてGkResultに変換
    ///
    /// # Examples
    ///
    /// ```
    /// use gk::common::result::{GkResult, ResultExt};
    ///
    /// let result: Result<String, std::io::Error> = Err(std::io::Error::new(
    ///     std::io::ErrorKind::NotFound, "file not found"
    /// ));
    /// let gk_result: GkResult<String> = result.with_filesystem_error("Read failed", None);
    /// assert!(gk_result.is_err());
    /// ```
    fn with_filesystem_error(
        self,
        message: impl Into<String>,
        path: Option<std::path::PathBuf>,
    ) -> GkResult<T>
    where
        E: Into<std::io::Error>;
}

impl<T, E> ResultExt<T, E> for Result<T, E> {
    fn with_filesystem_error(
        self,
        message: impl Into<String>,
        path: Option<std::path::PathBuf>,
    ) -> GkResult<T>
    where
        E: Into<std::io::Error>,
    {
        self.map_err(|e| GkError::filesystem_error_with_source(message, path, e.into()))
    }
}

/// async関数用のヘルパー
pub mod async_helpers {
    use super::{GkError, GkResult};
    use std::future::Future;

    /// タイムアウト付きasync実行
    pub async fn with_timeout<F, T>(f: F, timeout_secs: u64) -> GkResult<T>
    where
        F: Future<Output = T>,
    {
        let timeout_duration = std::time::Duration::from_secs(timeout_secs);

        match tokio::time::timeout(timeout_duration, f).await {
            Ok(result) => Ok(result),
            Err(_) => Err(GkError::timeout(timeout_secs)),
        }
    }
}
