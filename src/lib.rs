//! 小さな図書館アプリの貸出台帳
//!
//! 固定のカタログから書籍を借り・返し、貸出中の記録と返却履歴を
//! 端末ローカルのキーバリューストアに保存する。
//!
//! - `domain`: 書籍・貸出記録と、状態遷移の純粋関数
//! - `ports`: キーバリューストアの抽象
//! - `adapters`: インメモリ・SQLiteのストア実装
//! - `application`: 貸出台帳と画面向けのクエリ

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod telemetry;
