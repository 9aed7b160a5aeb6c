#![allow(dead_code)]

use pocket_library::adapters::memory::InMemoryKeyValueStore;
use pocket_library::adapters::sqlite::SqliteKeyValueStore;
use pocket_library::application::LoanLedger;
use pocket_library::config::AppConfig;
use pocket_library::domain::{Book, CatalogRegistry};
use std::sync::Arc;

/// テスト用のインメモリSQLiteストアを作成し、マイグレーションを実行
///
/// 本番と同じ `connect` を通すことで、マイグレーションも同じものを使う。
pub async fn create_test_store() -> SqliteKeyValueStore {
    let config = AppConfig {
        database_url: "sqlite::memory:".to_string(),
        ..AppConfig::default()
    };

    SqliteKeyValueStore::open(&config)
        .await
        .expect("Failed to open in-memory SQLite store")
}

/// インメモリストアと、そのストアで開いた台帳を返す
///
/// ストアは障害注入のためにテスト側でも保持する。
pub async fn open_memory_ledger() -> (Arc<InMemoryKeyValueStore>, LoanLedger) {
    let store = Arc::new(InMemoryKeyValueStore::new());
    let ledger = LoanLedger::open(store.clone()).await;
    (store, ledger)
}

/// 参照カタログから書籍を取り出す
pub fn book(id: &str) -> Book {
    CatalogRegistry::reference()
        .find(&id.into())
        .cloned()
        .expect("book not in reference catalog")
}

/// 台帳の一貫性（IDリスト ⇔ 貸出記録）を検証する
pub fn assert_consistent(ledger: &LoanLedger) {
    let ids = ledger.borrowed_ids();
    let loans = ledger.list_current();

    assert_eq!(ids.len(), loans.len());
    for (id, loan) in ids.iter().zip(loans) {
        assert_eq!(id, loan.book_id());
        assert!(!ledger.is_available(id));
    }
}
