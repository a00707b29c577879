use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// NamespaceName関連のエラー
#[derive(Debug, Error, PartialEq)]
pub enum NamespaceNameError {
    #[error("Namespace name cannot be empty")]
    Empty,

    #[error("Namespace name cannot be the current directory marker '.'")]
    CurrentDirectory,

    #[error("Namespace name cannot contain a path separator: {0}")]
    ContainsSeparator(String),
}

/// ネームスペース識別子の値オブジェクト
///
/// ディレクトリ名からそのまま導出されるため、クラスタ側の命名規則
/// （RFC 1123ラベル）はここでは検証しない。検証はゲートウェイの責務。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NamespaceName {
    /// 検証済みネームスペース名
    name: String,
}

impl NamespaceName {
    /// 新しいNamespaceNameインスタンスを作成
    pub fn new(name: &str) -> Result<Self, NamespaceNameError> {
        Self::validate(name)?;
        Ok(Self {
            name: name.to_string(),
        })
    }

    /// ネームスペース名の妥当性を検証
    fn validate(name: &str) -> Result<(), NamespaceNameError> {
        if name.is_empty() {
            return Err(NamespaceNameError::Empty);
        }

        if name == "." {
            return Err(NamespaceNameError::CurrentDirectory);
        }

        if name.contains('/') || name.contains('\\') {
            return Err(NamespaceNameError::ContainsSeparator(name.to_string()));
        }

        Ok(())
    }

    /// ネームスペース名を文字列として取得
    pub fn as_str(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for NamespaceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl AsRef<str> for NamespaceName {
    fn as_ref(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_namespace_names() {
        for name in ["team-a", "prod", "Team_B", "a"] {
            let ns = NamespaceName::new(name).unwrap();
            assert_eq!(ns.as_str(), name);
            assert_eq!(ns.to_string(), name);
        }
    }

    #[test]
    fn test_invalid_namespace_names() {
        assert_eq!(NamespaceName::new(""), Err(NamespaceNameError::Empty));
        assert_eq!(
            NamespaceName::new("."),
            Err(NamespaceNameError::CurrentDirectory)
        );
        assert!(matches!(
            NamespaceName::new("a/b"),
            Err(NamespaceNameError::ContainsSeparator(_))
        ));
    }

    #[test]
    fn test_cluster_rules_are_not_enforced_here() {
        // Uppercase and dots are rejected by the cluster, not by the planner
        assert!(NamespaceName::new("My.Namespace").is_ok());
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let ns = NamespaceName::new("team-a").unwrap();
        assert_eq!(serde_json::to_string(&ns).unwrap(), "\"team-a\"");
    }
}
