use crate::domain::{Book, BookId, CatalogRegistry};

use super::borrowing::LoanLedger;

/// カタログ一覧・詳細画面用のビュー
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub book: Book,
    /// 貸出中でなければtrue
    pub available: bool,
}

/// カタログ一覧画面の件数表示
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogSummary {
    pub available: usize,
    pub borrowed: usize,
}

/// カタログ全体を貸出可否付きで返す（カタログの登録順）
pub fn browse_catalog(catalog: &CatalogRegistry, ledger: &LoanLedger) -> Vec<CatalogEntry> {
    catalog
        .list_all()
        .iter()
        .map(|book| CatalogEntry {
            book: book.clone(),
            available: ledger.is_available(&book.id),
        })
        .collect()
}

/// カタログ内の貸出可能・貸出中の冊数
///
/// カタログにない書籍の貸出は数えない。
pub fn summarize_catalog(catalog: &CatalogRegistry, ledger: &LoanLedger) -> CatalogSummary {
    let borrowed = catalog
        .list_all()
        .iter()
        .filter(|book| !ledger.is_available(&book.id))
        .count();

    CatalogSummary {
        available: catalog.len() - borrowed,
        borrowed,
    }
}

/// 1冊分の詳細を返す。カタログにない書籍は `None`
pub fn book_detail(
    catalog: &CatalogRegistry,
    ledger: &LoanLedger,
    book_id: &BookId,
) -> Option<CatalogEntry> {
    catalog.find(book_id).map(|book| CatalogEntry {
        book: book.clone(),
        available: ledger.is_available(book_id),
    })
}
