pub mod key_value_store;

// パブリックに型を再エクスポート
pub use key_value_store::KeyValueStore as SqliteKeyValueStore;
pub use key_value_store::connect;
