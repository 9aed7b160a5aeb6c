use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Book, BookId, BorrowBookError, ReturnBookError};

// ============================================================================
// 貸出記録
// ============================================================================

/// 貸出中の記録
///
/// 書籍情報のコピーと貸出日時を持つ。返却されると履歴に移る。
/// 永続化形式は元アプリと同じく書籍オブジェクトを展開した形
/// （`{id, title, author, category, borrowDate}`）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanRecord {
    #[serde(flatten)]
    pub book: Book,
    #[serde(rename = "borrowDate")]
    pub borrow_date: DateTime<Utc>,
}

impl LoanRecord {
    pub fn book_id(&self) -> &BookId {
        &self.book.id
    }
}

impl std::ops::Deref for LoanRecord {
    type Target = Book;

    fn deref(&self) -> &Self::Target {
        &self.book
    }
}

/// 返却済みの記録（履歴）
///
/// ビジネスルール：
/// - 作成後は変更されない
/// - return_date >= borrow_date
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    #[serde(flatten)]
    pub loan: LoanRecord,
    #[serde(rename = "returnDate")]
    pub return_date: DateTime<Utc>,
}

impl std::ops::Deref for HistoryRecord {
    type Target = LoanRecord;

    fn deref(&self) -> &Self::Target {
        &self.loan
    }
}

// ============================================================================
// 台帳の状態
// ============================================================================

/// 台帳の唯一の真実
///
/// 貸出中IDの集合は `current` から導出するため、
/// 「IDがあるのに貸出記録がない」状態はこの型では表現できない。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LedgerState {
    current: Vec<LoanRecord>,
    history: Vec<HistoryRecord>,
}

impl LedgerState {
    /// 貸出中の記録（貸出順）
    pub fn current(&self) -> &[LoanRecord] {
        &self.current
    }

    /// 返却履歴（新しい順）
    pub fn history(&self) -> &[HistoryRecord] {
        &self.history
    }

    /// 貸出中の書籍ID（貸出順）
    pub fn borrowed_ids(&self) -> Vec<BookId> {
        self.current.iter().map(|loan| loan.book_id().clone()).collect()
    }

    /// 書籍が貸出可能か
    pub fn is_available(&self, book_id: &BookId) -> bool {
        self.find_loan(book_id).is_none()
    }

    pub fn find_loan(&self, book_id: &BookId) -> Option<&LoanRecord> {
        self.current.iter().find(|loan| loan.book_id() == book_id)
    }
}

/// 読み込み時に見つかった不整合
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inconsistency {
    /// IDリストにあるが貸出記録がない（破棄される）
    OrphanBorrowedId(BookId),
    /// 貸出記録があるがIDリストにない（IDは再導出される）
    MissingBorrowedId(BookId),
    /// 同じ書籍の貸出記録が重複している（最初の1件のみ残す）
    DuplicateLoan(BookId),
}

// ============================================================================
// 純粋関数
// ============================================================================

/// 純粋関数：書籍を借りる
///
/// ビジネスルール：
/// - 貸出中の書籍は借りられない
/// - 貸出記録は末尾に追加される
///
/// 副作用なし。新しい状態と作成された貸出記録を返す。
pub fn borrow_book(
    state: &LedgerState,
    book: Book,
    borrowed_at: DateTime<Utc>,
) -> Result<(LedgerState, LoanRecord), BorrowBookError> {
    if !state.is_available(&book.id) {
        return Err(BorrowBookError::AlreadyBorrowed);
    }

    let record = LoanRecord {
        book,
        borrow_date: borrowed_at,
    };

    let mut next = state.clone();
    next.current.push(record.clone());

    Ok((next, record))
}

/// 純粋関数：書籍を返却する
///
/// ビジネスルール：
/// - 貸出中の記録がなければ返却できない
/// - 履歴は先頭に追加される（新しい順）
/// - 返却日時が貸出日時より前なら貸出日時に揃える
///
/// 副作用なし。新しい状態と作成された履歴記録を返す。
pub fn return_book(
    state: &LedgerState,
    book_id: &BookId,
    returned_at: DateTime<Utc>,
) -> Result<(LedgerState, HistoryRecord), ReturnBookError> {
    let position = state
        .current
        .iter()
        .position(|loan| loan.book_id() == book_id)
        .ok_or(ReturnBookError::NotBorrowed)?;

    let mut next = state.clone();
    let loan = next.current.remove(position);
    let return_date = returned_at.max(loan.borrow_date);

    let record = HistoryRecord { loan, return_date };
    next.history.insert(0, record.clone());

    Ok((next, record))
}

/// 純粋関数：永続化された3つの記録から一貫した状態を復元する
///
/// 貸出記録（currentBorrowed）を正とする。
/// 書き込みの途中で中断された場合など、IDリストとの食い違いは
/// ここで解消し、見つかった不整合を返す。
pub fn reconcile(
    borrowed_ids: Vec<BookId>,
    current: Vec<LoanRecord>,
    history: Vec<HistoryRecord>,
) -> (LedgerState, Vec<Inconsistency>) {
    let mut inconsistencies = Vec::new();
    let mut seen = HashSet::new();
    let mut loans = Vec::with_capacity(current.len());

    for loan in current {
        if seen.insert(loan.book_id().clone()) {
            loans.push(loan);
        } else {
            inconsistencies.push(Inconsistency::DuplicateLoan(loan.book_id().clone()));
        }
    }

    let listed: HashSet<&BookId> = borrowed_ids.iter().collect();
    for loan in &loans {
        if !listed.contains(loan.book_id()) {
            inconsistencies.push(Inconsistency::MissingBorrowedId(loan.book_id().clone()));
        }
    }

    let mut reported = HashSet::new();
    for id in &borrowed_ids {
        if !seen.contains(id) && reported.insert(id) {
            inconsistencies.push(Inconsistency::OrphanBorrowedId(id.clone()));
        }
    }

    let state = LedgerState {
        current: loans,
        history,
    };

    (state, inconsistencies)
}
