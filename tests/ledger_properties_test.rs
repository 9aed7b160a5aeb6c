mod common;

use pocket_library::adapters::memory::InMemoryKeyValueStore;
use pocket_library::application::{LedgerError, LoanLedger};
use pocket_library::domain::{BookId, CatalogRegistry};
use proptest::prelude::*;
use std::collections::BTreeSet;
use std::sync::Arc;

use common::assert_consistent;

/// ランダムに生成する操作
#[derive(Debug, Clone)]
enum Op {
    Borrow(usize),
    Return(usize),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0usize..6).prop_map(Op::Borrow),
        (0usize..6).prop_map(Op::Return),
    ]
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("Failed to build runtime")
}

proptest! {
    /// どの操作列でも、各操作の後で
    /// 「IDリストにある ⇔ 貸出記録がある」が成り立ち、
    /// 単純なモデル（貸出中IDの集合）と一致する
    #[test]
    fn prop_ledger_stays_consistent(ops in prop::collection::vec(op_strategy(), 0..40)) {
        let rt = runtime();
        rt.block_on(async {
            let catalog = CatalogRegistry::reference();
            let store = Arc::new(InMemoryKeyValueStore::new());
            let mut ledger = LoanLedger::open(store.clone()).await;
            let mut model: BTreeSet<BookId> = BTreeSet::new();
            let mut returned = 0usize;

            for op in ops {
                match op {
                    Op::Borrow(i) => {
                        let book = &catalog.list_all()[i];
                        let result = ledger.borrow(book).await;
                        if model.insert(book.id.clone()) {
                            assert!(result.is_ok());
                        } else {
                            assert!(matches!(result, Err(LedgerError::AlreadyBorrowed(_))));
                        }
                    }
                    Op::Return(i) => {
                        let id = catalog.list_all()[i].id.clone();
                        let result = ledger.return_book(&id).await;
                        if model.remove(&id) {
                            let record = result.unwrap();
                            assert!(record.return_date >= record.borrow_date);
                            returned += 1;
                        } else {
                            assert!(matches!(result, Err(LedgerError::NotBorrowed(_))));
                        }
                    }
                }

                assert_consistent(&ledger);
                let actual: BTreeSet<BookId> = ledger.borrowed_ids().into_iter().collect();
                assert_eq!(actual, model);
                assert_eq!(ledger.list_current().len(), model.len());
                assert_eq!(ledger.list_history().len(), returned);
            }

            // 永続化された記録からも同じ状態が復元できる
            let reopened = LoanLedger::open(store).await;
            assert!(reopened.load_warnings().is_empty());
            assert_eq!(reopened.list_current(), ledger.list_current());
            assert_eq!(reopened.list_history(), ledger.list_history());
        });
    }
}
