use thiserror::Error;

use crate::domain::BookId;
use crate::domain::loan::Inconsistency;

/// 貸出台帳アプリケーション層のエラー
#[derive(Debug, Error)]
pub enum LedgerError {
    /// 既に貸出中
    #[error("Book {0} is already borrowed")]
    AlreadyBorrowed(BookId),

    /// 貸出中ではない
    #[error("Book {0} is not currently borrowed")]
    NotBorrowed(BookId),

    /// キーバリューストアのエラー（読み書き・シリアライズ）
    #[error("Storage error")]
    StorageError(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// 保存された値が期待する形式ではない
    #[error("Malformed record under key `{key}`")]
    MalformedRecord {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl LedgerError {
    /// 利用者の操作が業務ルールで拒否されたか
    pub fn is_business_rule(&self) -> bool {
        matches!(
            self,
            LedgerError::AlreadyBorrowed(_) | LedgerError::NotBorrowed(_)
        )
    }
}

/// 前回の読み込みで読めなかったキーへの書き込みを拒否した
///
/// 読めなかった値はメモリ上では空になっている。そのまま書き込むと
/// ストアに残っている記録を上書きしてしまうため、`load()` が成功するまで書き込まない。
#[derive(Debug, Error)]
#[error("`{key}` could not be read at last load; reload before writing")]
pub struct StaleRecord {
    pub key: &'static str,
}

/// 読み込み時の警告
///
/// 読み込みは寛容に行い、失敗しても空のデータとして続行する。
/// ただし実際の破損を隠さないよう、何が起きたかをここに残す。
#[derive(Debug)]
pub enum LoadWarning {
    /// キー全体が読めなかった（空として扱った）
    Unreadable {
        key: &'static str,
        error: LedgerError,
    },
    /// 配列内の1件が解析できず破棄した
    DroppedEntry {
        key: &'static str,
        index: usize,
        error: LedgerError,
    },
    /// 3つの記録の間の不整合を解消した
    Inconsistent(Inconsistency),
}

/// アプリケーション層の Result型
pub type Result<T> = std::result::Result<T, LedgerError>;
