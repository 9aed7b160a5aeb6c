use std::sync::Arc;

use crate::domain::commands::{BorrowCommand, ReturnCommand};
use crate::domain::loan::{self, HistoryRecord, LedgerState, LoanRecord};
use crate::domain::{Book, BookId, BorrowBookError, ReturnBookError};
use crate::ports::KeyValueStore;

use super::errors::{LedgerError, LoadWarning, Result, StaleRecord};
use super::persistence::{LedgerKey, encode_entries, read_list, unreadable_keys};

/// プロフィール画面に表示する件数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerStats {
    /// 貸出中の冊数
    pub borrowed: usize,
    /// 返却済みの件数
    pub returned: usize,
}

/// 貸出台帳
///
/// `borrowedBooks`・`currentBorrowed`・`borrowHistory` の3つの記録を所有する。
/// メモリ上の `LedgerState` を唯一の真実とし、3つの永続化形式は書き込み時に導出する。
///
/// # 一貫性保証
///
/// 各操作は次の状態を純粋関数で計算し、`KeyValueStore::set_many` で永続化した後に
/// メモリ上の状態を置き換える。書き込みに失敗した場合は何もコミットされない。
///
/// 複数キーの原子的な書き込みはストア次第。SQLite・インメモリのアダプターは原子的。
/// `set_many` のデフォルト実装を使うストアでは途中で中断すると記録が食い違うが、
/// 次の `load()` で `currentBorrowed` を正として修復される。
///
/// # 読み込み失敗後の書き込み
///
/// 読み込みに失敗したキーはメモリ上で空になっている。ストアの記録を空で上書きしないよう、
/// そのキー（および導出元がそのキーであるキー）への書き込みは次に `load()` が成功するまで
/// `StorageError(StaleRecord)` で拒否する。
///
/// # 並行性
///
/// 変更操作は `&mut self` を取るため、1つの台帳に対する操作が交互に実行されることはない。
/// 複数プロセス・複数端末の間の調整は行わない。
pub struct LoanLedger {
    store: Arc<dyn KeyValueStore>,
    state: LedgerState,
    warnings: Vec<LoadWarning>,
    unreadable: Vec<LedgerKey>,
}

impl LoanLedger {
    /// ストアから読み込んで台帳を開く
    pub async fn open(store: Arc<dyn KeyValueStore>) -> Self {
        let mut ledger = Self {
            store,
            state: LedgerState::default(),
            warnings: Vec::new(),
            unreadable: Vec::new(),
        };
        ledger.load().await;
        ledger
    }

    /// 3つの記録を読み直す
    ///
    /// 読み込みエラーや破損した値は「まだデータがない」として扱い、
    /// 警告として返す。読み込み自体は失敗しない。
    pub async fn load(&mut self) -> &[LoadWarning] {
        let mut warnings = Vec::new();
        let store = &*self.store;

        let borrowed_ids: Vec<BookId> =
            read_list(store, LedgerKey::BorrowedBooks.as_str(), &mut warnings).await;
        let current: Vec<LoanRecord> =
            read_list(store, LedgerKey::CurrentBorrowed.as_str(), &mut warnings).await;
        let history: Vec<HistoryRecord> =
            read_list(store, LedgerKey::BorrowHistory.as_str(), &mut warnings).await;

        let (state, inconsistencies) = loan::reconcile(borrowed_ids, current, history);
        for inconsistency in inconsistencies {
            tracing::warn!(?inconsistency, "reconciled inconsistent loan records");
            warnings.push(LoadWarning::Inconsistent(inconsistency));
        }

        tracing::debug!(
            borrowed = state.current().len(),
            returned = state.history().len(),
            warnings = warnings.len(),
            "loan ledger loaded"
        );

        self.state = state;
        self.unreadable = unreadable_keys(&warnings);
        self.warnings = warnings;
        &self.warnings
    }

    /// メモリ上の状態から3つの記録すべてを書き込む
    ///
    /// 読み込み時に修復した不整合をストアに反映する場合などに使う。
    pub async fn flush(&mut self) -> Result<()> {
        self.persist(&self.state, &LedgerKey::ALL).await
    }

    /// 3つの記録を削除して空の状態に戻す
    pub async fn reset(&mut self) -> Result<()> {
        for key in LedgerKey::ALL {
            self.store
                .remove(key.as_str())
                .await
                .map_err(LedgerError::StorageError)?;
        }

        self.state = LedgerState::default();
        self.warnings.clear();
        self.unreadable.clear();
        tracing::info!("loan ledger reset");
        Ok(())
    }

    // ========================================================================
    // コマンド
    // ========================================================================

    /// 書籍を借りる（現在時刻）
    pub async fn borrow(&mut self, book: &Book) -> Result<LoanRecord> {
        self.execute_borrow(BorrowCommand::new(book.clone())).await
    }

    /// 書籍を返却する（現在時刻）
    pub async fn return_book(&mut self, book_id: &BookId) -> Result<HistoryRecord> {
        self.execute_return(ReturnCommand::new(book_id.clone())).await
    }

    /// 貸出コマンドを実行する
    ///
    /// ビジネスルール：
    /// - 貸出中の書籍は借りられない（`AlreadyBorrowed`、状態は変わらない）
    ///
    /// 成功時は `borrowedBooks` と `currentBorrowed` を書き込む。
    pub async fn execute_borrow(&mut self, cmd: BorrowCommand) -> Result<LoanRecord> {
        let book_id = cmd.book.id.clone();

        let (next, record) = loan::borrow_book(&self.state, cmd.book, cmd.borrowed_at)
            .map_err(|e| match e {
                BorrowBookError::AlreadyBorrowed => LedgerError::AlreadyBorrowed(book_id.clone()),
            })?;

        if let Err(e) = self
            .persist(&next, &[LedgerKey::BorrowedBooks, LedgerKey::CurrentBorrowed])
            .await
        {
            tracing::error!(%book_id, error = %e, "failed to persist borrow");
            return Err(e);
        }

        self.state = next;
        tracing::info!(%book_id, title = %record.title, "book borrowed");
        Ok(record)
    }

    /// 返却コマンドを実行する
    ///
    /// ビジネスルール：
    /// - 貸出中の記録がなければ返却できない（`NotBorrowed`、状態は変わらない）
    /// - 履歴は先頭に追加される
    ///
    /// 成功時は3つの記録すべてを書き込む。
    pub async fn execute_return(&mut self, cmd: ReturnCommand) -> Result<HistoryRecord> {
        let book_id = cmd.book_id;

        let (next, record) = loan::return_book(&self.state, &book_id, cmd.returned_at)
            .map_err(|e| match e {
                ReturnBookError::NotBorrowed => LedgerError::NotBorrowed(book_id.clone()),
            })?;

        if let Err(e) = self.persist(&next, &LedgerKey::ALL).await {
            tracing::error!(%book_id, error = %e, "failed to persist return");
            return Err(e);
        }

        self.state = next;
        tracing::info!(%book_id, title = %record.title, "book returned");
        Ok(record)
    }

    // ========================================================================
    // クエリ
    // ========================================================================

    pub fn is_available(&self, book_id: &BookId) -> bool {
        self.state.is_available(book_id)
    }

    /// 貸出中の記録（貸出順）
    pub fn list_current(&self) -> &[LoanRecord] {
        self.state.current()
    }

    /// 返却履歴（新しい順）
    pub fn list_history(&self) -> &[HistoryRecord] {
        self.state.history()
    }

    pub fn borrowed_ids(&self) -> Vec<BookId> {
        self.state.borrowed_ids()
    }

    pub fn stats(&self) -> LedgerStats {
        LedgerStats {
            borrowed: self.state.current().len(),
            returned: self.state.history().len(),
        }
    }

    /// 直近の読み込みで記録された警告
    pub fn load_warnings(&self) -> &[LoadWarning] {
        &self.warnings
    }

    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    async fn persist(&self, state: &LedgerState, keys: &[LedgerKey]) -> Result<()> {
        if let Some(stale) = keys
            .iter()
            .map(LedgerKey::derived_from)
            .find(|key| self.unreadable.contains(key))
        {
            tracing::warn!(key = stale.as_str(), "refusing to overwrite unread record");
            return Err(LedgerError::StorageError(Box::new(StaleRecord {
                key: stale.as_str(),
            })));
        }

        let entries = encode_entries(state, keys)?;

        self.store
            .set_many(&entries)
            .await
            .map_err(LedgerError::StorageError)
    }
}
