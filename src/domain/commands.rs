use chrono::{DateTime, Utc};

use super::{Book, BookId};

/// コマンド：書籍を借りる
///
/// 利用者の確認を得た後にプレゼンテーション層が組み立てる。
/// 確認ダイアログと状態変更を切り離すためのデータ構造。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BorrowCommand {
    pub book: Book,
    pub borrowed_at: DateTime<Utc>,
}

impl BorrowCommand {
    /// 現在時刻で貸出コマンドを作る
    pub fn new(book: Book) -> Self {
        Self {
            book,
            borrowed_at: Utc::now(),
        }
    }
}

/// コマンド：書籍を返却する
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnCommand {
    pub book_id: BookId,
    pub returned_at: DateTime<Utc>,
}

impl ReturnCommand {
    /// 現在時刻で返却コマンドを作る
    pub fn new(book_id: BookId) -> Self {
        Self {
            book_id,
            returned_at: Utc::now(),
        }
    }
}
