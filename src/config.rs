use std::env;

/// デフォルトのデータベースURL（端末ローカルのSQLiteファイル）
pub const DEFAULT_DATABASE_URL: &str = "sqlite://pocket_library.db";

/// デフォルトのログフィルタ
pub const DEFAULT_LOG_FILTER: &str = "pocket_library=debug,sqlx=warn";

/// アプリケーション設定
///
/// 環境変数から読み込む。未設定の項目はデフォルト値を使う。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// キーバリューストアの保存先（DATABASE_URL）
    pub database_url: String,
    /// tracingのフィルタ（RUST_LOG）
    pub log_filter: String,
    /// SQLiteファイルがなければ作成する（POCKET_LIBRARY_CREATE_DB）
    pub create_if_missing: bool,
}

impl AppConfig {
    /// 環境変数から設定を読み込む
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// 任意の参照関数から設定を組み立てる
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let database_url = lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.into());
        let log_filter = lookup("RUST_LOG").unwrap_or_else(|| DEFAULT_LOG_FILTER.into());
        let create_if_missing = lookup("POCKET_LIBRARY_CREATE_DB")
            .map(|v| !matches!(v.trim().to_ascii_lowercase().as_str(), "0" | "false" | "no"))
            .unwrap_or(true);

        Self {
            database_url,
            log_filter,
            create_if_missing,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}
