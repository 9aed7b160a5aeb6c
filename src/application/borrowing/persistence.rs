use serde::de::DeserializeOwned;

use crate::domain::loan::LedgerState;
use crate::ports::KeyValueStore;

use super::errors::{LedgerError, LoadWarning, Result};

/// 台帳が所有する永続化キー
///
/// 3つとも同じ `LedgerState` から導出される。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerKey {
    /// 貸出中の書籍IDの配列
    BorrowedBooks,
    /// 貸出記録の配列（貸出順）
    CurrentBorrowed,
    /// 履歴記録の配列（新しい順）
    BorrowHistory,
}

impl LedgerKey {
    /// 元アプリと同じ書き込み順
    pub const ALL: [LedgerKey; 3] = [
        LedgerKey::BorrowedBooks,
        LedgerKey::CurrentBorrowed,
        LedgerKey::BorrowHistory,
    ];

    /// ストア上のキー名
    pub fn as_str(&self) -> &'static str {
        match self {
            LedgerKey::BorrowedBooks => "borrowedBooks",
            LedgerKey::CurrentBorrowed => "currentBorrowed",
            LedgerKey::BorrowHistory => "borrowHistory",
        }
    }

    /// このキーの書き込み内容が依存するキー
    ///
    /// `borrowedBooks` は `currentBorrowed` から導出される。
    pub fn derived_from(&self) -> LedgerKey {
        match self {
            LedgerKey::BorrowedBooks | LedgerKey::CurrentBorrowed => LedgerKey::CurrentBorrowed,
            LedgerKey::BorrowHistory => LedgerKey::BorrowHistory,
        }
    }

    fn from_key(key: &str) -> Option<LedgerKey> {
        LedgerKey::ALL.into_iter().find(|k| k.as_str() == key)
    }

    /// 状態からこのキーのJSONを導出する
    pub fn encode(&self, state: &LedgerState) -> Result<String> {
        let encoded = match self {
            LedgerKey::BorrowedBooks => serde_json::to_string(&state.borrowed_ids()),
            LedgerKey::CurrentBorrowed => serde_json::to_string(state.current()),
            LedgerKey::BorrowHistory => serde_json::to_string(state.history()),
        };

        encoded.map_err(|e| LedgerError::StorageError(Box::new(e)))
    }
}

/// 状態から指定キーの書き込みエントリを作る
pub(super) fn encode_entries(
    state: &LedgerState,
    keys: &[LedgerKey],
) -> Result<Vec<(&'static str, String)>> {
    keys.iter()
        .map(|key| Ok((key.as_str(), key.encode(state)?)))
        .collect()
}

/// ストアから読めなかったキー
///
/// 破損した値（配列でない）は含めない。読み直しても回復しないため、
/// 次の書き込みで置き換える。
pub(super) fn unreadable_keys(warnings: &[LoadWarning]) -> Vec<LedgerKey> {
    warnings
        .iter()
        .filter_map(|warning| match warning {
            LoadWarning::Unreadable {
                key,
                error: LedgerError::StorageError(_),
            } => LedgerKey::from_key(key),
            _ => None,
        })
        .collect()
}

/// JSON配列を寛容に読み込む
///
/// - 値がない → 空（初回起動）
/// - 読み込み失敗・配列でない → 空 + 警告
/// - 1件だけ解析できない → その1件を捨てて続行 + 警告
pub(super) async fn read_list<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &'static str,
    warnings: &mut Vec<LoadWarning>,
) -> Vec<T> {
    let raw = match store.get(key).await {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            tracing::warn!(key, error = %e, "failed to read key, treating as empty");
            warnings.push(LoadWarning::Unreadable {
                key,
                error: LedgerError::StorageError(e),
            });
            return Vec::new();
        }
    };

    decode_list(key, &raw, warnings)
}

/// 読み込み済みのJSON文字列を配列として解析する
pub(super) fn decode_list<T: DeserializeOwned>(
    key: &'static str,
    raw: &str,
    warnings: &mut Vec<LoadWarning>,
) -> Vec<T> {
    let entries: Vec<serde_json::Value> = match serde_json::from_str(raw) {
        Ok(entries) => entries,
        Err(source) => {
            tracing::warn!(key, error = %source, "stored value is not a JSON array, treating as empty");
            warnings.push(LoadWarning::Unreadable {
                key,
                error: LedgerError::MalformedRecord { key, source },
            });
            return Vec::new();
        }
    };

    let mut items = Vec::with_capacity(entries.len());
    for (index, entry) in entries.into_iter().enumerate() {
        match serde_json::from_value(entry) {
            Ok(item) => items.push(item),
            Err(source) => {
                tracing::warn!(key, index, error = %source, "dropping malformed entry");
                warnings.push(LoadWarning::DroppedEntry {
                    key,
                    index,
                    error: LedgerError::MalformedRecord { key, source },
                });
            }
        }
    }
    items
}
